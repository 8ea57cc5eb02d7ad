//! Chat title derivation
//!
//! New chats get their title from the first user message: a title-model
//! completion when the backend cooperates, a plain truncation when it does
//! not. Title generation is best-effort and must never fail a submit.

use tracing::debug;

use crate::llm::{ChatMessage, ChatProvider, CompletionRequest};

const MAX_TITLE_CHARS: usize = 80;
const TITLE_PROMPT: &str = "Generate a short title (at most 80 characters) summarizing the \
     user's message. Respond with the title only, no quotes or punctuation around it.";

/// Derive a title for a new chat from its first user message
pub async fn generate_title(provider: &dyn ChatProvider, user_message: &str) -> String {
    let request = CompletionRequest::new(
        provider.resolve_model(Some("title-model")),
        vec![ChatMessage::user(user_message)],
    )
    .with_system(TITLE_PROMPT)
    .with_max_tokens(64);

    match provider.complete(request).await {
        Ok(completion) if !completion.text.trim().is_empty() => {
            truncate_title(completion.text.trim())
        }
        Ok(_) => truncate_title(user_message),
        Err(e) => {
            debug!(error = %e, "Title generation failed, falling back to truncation");
            truncate_title(user_message)
        }
    }
}

/// Truncate at a word boundary, appending an ellipsis when text was cut
fn truncate_title(text: &str) -> String {
    let text = text.trim();
    if text.chars().count() <= MAX_TITLE_CHARS {
        return text.to_string();
    }

    let cut: String = text.chars().take(MAX_TITLE_CHARS).collect();
    let truncated = match cut.rfind(' ') {
        Some(space) if space > 0 => &cut[..space],
        _ => cut.as_str(),
    };
    format!("{}…", truncated.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::stub::StubProvider;

    #[test]
    fn test_short_text_unchanged() {
        assert_eq!(truncate_title("What is 2+2?"), "What is 2+2?");
        assert_eq!(truncate_title("  padded  "), "padded");
    }

    #[test]
    fn test_long_text_cut_at_word_boundary() {
        let long = "word ".repeat(40);
        let title = truncate_title(&long);
        assert!(title.chars().count() <= MAX_TITLE_CHARS + 1);
        assert!(title.ends_with('…'));
        // The cut lands between words, never inside one
        let kept = title.trim_end_matches('…');
        assert!(!kept.is_empty());
        assert!(kept.split(' ').all(|w| w == "word"));
    }

    #[test]
    fn test_long_unbroken_text() {
        let long = "a".repeat(200);
        let title = truncate_title(&long);
        assert_eq!(title.chars().count(), MAX_TITLE_CHARS + 1);
    }

    #[tokio::test]
    async fn test_title_from_provider() {
        let stub = StubProvider::new("Simple arithmetic");
        let title = generate_title(&stub, "What is 2+2?").await;
        assert_eq!(title, "Simple arithmetic");
    }

    #[tokio::test]
    async fn test_title_falls_back_on_upstream_failure() {
        let stub = StubProvider::failing();
        let title = generate_title(&stub, "What is 2+2?").await;
        assert_eq!(title, "What is 2+2?");
    }

    #[tokio::test]
    async fn test_title_falls_back_on_empty_completion() {
        let stub = StubProvider::new("   ");
        let title = generate_title(&stub, "What is 2+2?").await;
        assert_eq!(title, "What is 2+2?");
    }
}
