use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chatrelay::auth::{SessionResolver, StaticResolver, TokenResolver};
use chatrelay::config::RelayConfig;
use chatrelay::handlers::AppState;
use chatrelay::llm::create_provider;
use chatrelay::routes::configure_routes;
use chatrelay::store::{ChatStore, MemoryStore, PostgresStore, StoreConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = RelayConfig::from_env()?;
    info!(backend = config.backend.name(), "Starting chat relay");

    let provider = create_provider(config.backend.clone())?;

    let store: Arc<dyn ChatStore> = match &config.database_url {
        Some(url) => {
            let store_config = StoreConfig::from_connection_string(url)?;
            Arc::new(PostgresStore::new(store_config).await?)
        }
        None => {
            info!("No DATABASE_URL set; chats are kept in memory");
            Arc::new(MemoryStore::new())
        }
    };

    // Without a token map every request runs as a single local user, which
    // is the behavior the UI expects when no auth provider is wired up.
    let sessions: Arc<dyn SessionResolver> = if config.api_tokens.is_empty() {
        Arc::new(StaticResolver::allow("local-user"))
    } else {
        Arc::new(TokenResolver::new(config.api_tokens.clone()))
    };

    let state = AppState {
        provider: Arc::from(provider),
        store,
        sessions,
        system_prompt: config.system_prompt.clone(),
    };

    let routes = configure_routes(state);

    info!(addr = %config.bind_addr, "Listening");
    warp::serve(routes).run(config.bind_addr).await;

    Ok(())
}
