//! Reasoning-token extraction
//!
//! DeepSeek-R1 style models emit their chain of thought inside a leading
//! `<think>...</think>` block, before the final answer. Backends that do not
//! tag reasoning separately on the wire (Cloudflare Workers AI) get it split
//! out here so the relay can deliver it as a distinct token stream.

const OPEN_TAG: &str = "<think>";
const CLOSE_TAG: &str = "</think>";

/// Split a leading `<think>...</think>` block from a completion.
///
/// Returns `(reasoning, answer)`. Text without the tag is returned unchanged.
/// An unterminated open tag means the model never reached its answer; the
/// entire remainder is treated as reasoning and the answer is empty.
pub fn split_reasoning(text: &str) -> (Option<String>, String) {
    let trimmed = text.trim_start();
    let Some(rest) = trimmed.strip_prefix(OPEN_TAG) else {
        return (None, text.to_string());
    };

    match rest.find(CLOSE_TAG) {
        Some(end) => {
            let reasoning = rest[..end].trim().to_string();
            let answer = rest[end + CLOSE_TAG.len()..].trim_start().to_string();
            let reasoning = (!reasoning.is_empty()).then_some(reasoning);
            (reasoning, answer)
        }
        None => {
            let reasoning = rest.trim().to_string();
            ((!reasoning.is_empty()).then_some(reasoning), String::new())
        }
    }
}
