//! Session resolution
//!
//! The auth provider is an external collaborator; the relay only needs a
//! user id out of it. `SessionResolver` is the seam: production resolves
//! bearer tokens against a configured token map, tests plug in a stub.

use async_trait::async_trait;
use std::collections::HashMap;

/// An authenticated caller, opaque beyond the user id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
}

/// Interface for resolving a session from an incoming request
#[async_trait]
pub trait SessionResolver: Send + Sync {
    /// Resolve the `Authorization: Bearer <token>` value to a session
    ///
    /// `None` means unauthenticated; the handlers turn that into a 401.
    async fn resolve(&self, bearer: Option<&str>) -> Option<Session>;
}

/// Resolver backed by a static token-to-user map
///
/// Built from the `CHAT_API_TOKENS` environment value at startup
/// (`token1:user1,token2:user2`).
pub struct TokenResolver {
    tokens: HashMap<String, String>,
}

impl TokenResolver {
    pub fn new(tokens: HashMap<String, String>) -> Self {
        Self { tokens }
    }

    /// Parse the `token:user` comma-separated form
    pub fn from_spec(spec: &str) -> Self {
        let tokens = spec
            .split(',')
            .filter_map(|pair| {
                let (token, user) = pair.trim().split_once(':')?;
                if token.is_empty() || user.is_empty() {
                    return None;
                }
                Some((token.to_string(), user.to_string()))
            })
            .collect();
        Self { tokens }
    }
}

#[async_trait]
impl SessionResolver for TokenResolver {
    async fn resolve(&self, bearer: Option<&str>) -> Option<Session> {
        let token = bearer?;
        self.tokens.get(token).map(|user_id| Session {
            user_id: user_id.clone(),
        })
    }
}

/// Resolver that authenticates every request as a fixed user
///
/// Used for local runs without an auth provider and as the test stub.
pub struct StaticResolver {
    session: Option<Session>,
}

impl StaticResolver {
    /// Every request resolves to `user_id`
    pub fn allow(user_id: impl Into<String>) -> Self {
        Self {
            session: Some(Session {
                user_id: user_id.into(),
            }),
        }
    }

    /// Every request is unauthenticated
    pub fn deny() -> Self {
        Self { session: None }
    }
}

#[async_trait]
impl SessionResolver for StaticResolver {
    async fn resolve(&self, _bearer: Option<&str>) -> Option<Session> {
        self.session.clone()
    }
}

/// Strip the `Bearer ` scheme from an Authorization header value
pub fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
