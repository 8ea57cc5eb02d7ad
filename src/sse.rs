//! SSE event constructors for the streaming relay response

use std::convert::Infallible;
use warp::sse::Event;

/// Create a `text` SSE event carrying an answer token chunk
pub fn create_text_event(chunk: String) -> Result<Event, Infallible> {
    let payload = serde_json::json!({ "chunk": chunk });
    Ok(Event::default().event("text").data(payload.to_string()))
}

/// Create a `reasoning` SSE event carrying a thinking token chunk
pub fn create_reasoning_event(chunk: String) -> Result<Event, Infallible> {
    let payload = serde_json::json!({ "chunk": chunk });
    Ok(Event::default()
        .event("reasoning")
        .data(payload.to_string()))
}

/// Create a `done` SSE event to signal stream completion
pub fn create_done_event() -> Result<Event, Infallible> {
    let payload = serde_json::json!({});
    Ok(Event::default().event("done").data(payload.to_string()))
}

/// Create an `error` SSE event with a generic client-safe message
pub fn create_error_event() -> Result<Event, Infallible> {
    let payload = serde_json::json!({
        "message": "Failed to get a response. Please try again."
    });
    Ok(Event::default().event("error").data(payload.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_text_event() {
        assert!(create_text_event("Hello".to_string()).is_ok());
    }

    #[test]
    fn test_create_reasoning_event() {
        assert!(create_reasoning_event("thinking".to_string()).is_ok());
    }

    #[test]
    fn test_create_done_event() {
        assert!(create_done_event().is_ok());
    }

    #[test]
    fn test_error_payload_is_generic() {
        // The payload must never reflect upstream detail
        let payload = serde_json::json!({
            "message": "Failed to get a response. Please try again."
        });
        assert_eq!(payload["message"], "Failed to get a response. Please try again.");
    }
}
