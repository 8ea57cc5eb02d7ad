//! Route definitions and rejection mapping

use std::collections::HashMap;
use std::convert::Infallible;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::handlers::{self, ApiError, AppState};
use crate::models::ErrorBody;

const INDEX_HTML: &str = include_str!("../static/index.html");

pub fn configure_routes(
    state: AppState,
) -> impl Filter<Extract = impl warp::Reply, Error = Infallible> + Clone {
    let with_state = {
        let state = state.clone();
        warp::any().map(move || state.clone())
    };

    let authorization = warp::header::optional::<String>("authorization");

    let api_chat = warp::path("api").and(warp::path("chat")).and(warp::path::end());

    // POST /api/chat
    let send_message = api_chat
        .and(warp::post())
        .and(authorization)
        .and(warp::body::content_length_limit(1024 * 1024))
        .and(warp::body::json())
        .and(with_state.clone())
        .and_then(handlers::send_message_handler);

    // GET /api/chat?id=<uuid>
    let get_chat = api_chat
        .and(warp::get())
        .and(authorization)
        .and(warp::query::<HashMap<String, String>>())
        .and(with_state.clone())
        .and_then(handlers::get_chat_handler);

    // DELETE /api/chat?id=<uuid>
    let delete_chat = api_chat
        .and(warp::delete())
        .and(authorization)
        .and(warp::query::<HashMap<String, String>>())
        .and(with_state)
        .and_then(handlers::delete_chat_handler);

    // GET / — embedded chat UI
    let index = warp::path::end()
        .and(warp::get())
        .map(|| warp::reply::html(INDEX_HTML));

    send_message
        .or(get_chat)
        .or(delete_chat)
        .or(index)
        .recover(handle_rejection)
}

/// Map rejections to HTTP statuses with generic bodies
async fn handle_rejection(rejection: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if let Some(api_error) = rejection.find::<ApiError>() {
        match api_error {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not Found".to_string()),
            ApiError::Upstream | ApiError::Persistence => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to get a response. Please try again.".to_string(),
            ),
        }
    } else if rejection.is_not_found() {
        (StatusCode::NOT_FOUND, "Not Found".to_string())
    } else if rejection
        .find::<warp::filters::body::BodyDeserializeError>()
        .is_some()
    {
        (StatusCode::BAD_REQUEST, "Malformed request body".to_string())
    } else if rejection.find::<warp::reject::InvalidQuery>().is_some() {
        (StatusCode::BAD_REQUEST, "Invalid query string".to_string())
    } else if rejection.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "Method Not Allowed".to_string(),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error".to_string(),
        )
    };

    let body = warp::reply::json(&ErrorBody { message });
    Ok(warp::reply::with_status(body, status))
}
