//! Server-Sent Events parser for OpenRouter streaming responses

use bytes::{Bytes, BytesMut};
use futures::stream::Stream;
use futures::StreamExt;
use std::pin::Pin;

use crate::llm::core::error::LlmError;

use super::types::StreamChunk;

/// Parse a stream of bytes as OpenRouter SSE chunks
///
/// OpenRouter uses the OpenAI streaming format:
/// ```text
/// data: {"choices":[{"delta":{"content":"Hel"}}]}
///
/// data: {"choices":[{"delta":{"content":"lo"}}]}
///
/// data: [DONE]
/// ```
///
/// This parser:
/// 1. Buffers raw bytes across chunk boundaries, so a multibyte character
///    split between network chunks is reassembled before decoding
/// 2. Scans for event boundaries (double newline)
/// 3. Strips the `data:` prefix and parses the JSON payload
/// 4. Stops at the `[DONE]` sentinel
pub fn parse_sse_stream(
    byte_stream: Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>,
) -> Pin<Box<dyn Stream<Item = Result<StreamChunk, LlmError>> + Send>> {
    // Buffer to accumulate partial events
    let mut buffer = BytesMut::new();

    let chunk_stream = byte_stream.flat_map(move |chunk_result| {
        let chunk = match chunk_result {
            Ok(bytes) => bytes,
            Err(e) => {
                return futures::stream::iter(vec![Err(LlmError::StreamError(e.to_string()))]);
            }
        };

        buffer.extend_from_slice(&chunk);

        // Process complete events (delimited by \n\n); only complete events
        // are decoded as UTF-8
        let mut chunks = Vec::new();
        while let Some(event_end) = buffer.windows(2).position(|w| w == b"\n\n") {
            let event = buffer.split_to(event_end + 2);

            match std::str::from_utf8(&event[..event_end]) {
                Ok(event_text) => {
                    if let Some(parsed) = parse_event(event_text) {
                        chunks.push(parsed);
                    }
                }
                Err(e) => {
                    chunks.push(Err(LlmError::StreamError(format!(
                        "Invalid UTF-8 in stream: {}",
                        e
                    ))));
                }
            }
        }

        futures::stream::iter(chunks)
    });

    Box::pin(chunk_stream)
}

/// Parse a single SSE event from its text representation
///
/// Returns `None` for comment lines, keep-alive events, and the `[DONE]`
/// sentinel; the end of generation is signaled by the final chunk's
/// `finish_reason` instead.
fn parse_event(event_text: &str) -> Option<Result<StreamChunk, LlmError>> {
    let mut data: Option<&str> = None;

    for line in event_text.lines() {
        let line = line.trim();

        // OpenRouter sends ": OPENROUTER PROCESSING" comments as keep-alives
        if line.is_empty() || line.starts_with(':') {
            continue;
        }

        if let Some(data_val) = line.strip_prefix("data:") {
            data = Some(data_val.trim());
        }
    }

    let data = data?;
    if data.is_empty() || data == "[DONE]" {
        return None;
    }

    match serde_json::from_str::<StreamChunk>(data) {
        Ok(chunk) => Some(Ok(chunk)),
        Err(e) => Some(Err(LlmError::SerializationError(format!(
            "Failed to parse SSE chunk: {}. Data: {}",
            e, data
        )))),
    }
}
