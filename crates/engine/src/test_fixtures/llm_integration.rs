//! Helpers for running tests against a live OpenAI-compatible endpoint.
//!
//! Live tests are `#[ignore]`d and read their endpoint from the environment.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_fixtures::llm_integration::*;
//!
//! #[tokio::test]
//! #[ignore = "requires OPENAI_API_KEY"]
//! async fn test_live_rules() {
//!     let client = create_test_openai_client();
//!     // ... test logic
//! }
//! ```

use crate::infrastructure::openai::{OpenAiClient, DEFAULT_OPENAI_BASE_URL, DEFAULT_TEXT_MODEL};
use crate::infrastructure::ports::{ChatMessage, LlmPort, LlmRequest};

/// Creates an OpenAiClient configured for integration testing.
///
/// Uses environment variables for configuration:
/// - `OPENAI_API_KEY`: API key (required for live calls)
/// - `OPENAI_BASE_URL`: Base URL (default: https://api.openai.com)
/// - `CARDFORGE_TEXT_MODEL`: Model to use (default: gpt-4o)
pub fn create_test_openai_client() -> OpenAiClient {
    let base_url =
        std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string());
    let api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
    let model =
        std::env::var("CARDFORGE_TEXT_MODEL").unwrap_or_else(|_| DEFAULT_TEXT_MODEL.to_string());
    OpenAiClient::new(&base_url, &api_key, &model)
}

/// Check if the endpoint answers a minimal request.
pub async fn openai_available() -> bool {
    if std::env::var("OPENAI_API_KEY").is_err() {
        return false;
    }

    let request = LlmRequest::new(vec![ChatMessage::user("Hi")]);

    create_test_openai_client().generate(request).await.is_ok()
}

/// Panic with a clear message when the endpoint is not reachable.
pub async fn skip_if_openai_unavailable() {
    if !openai_available().await {
        panic!("OpenAI endpoint is not available - skipping test");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::use_cases::{CardContentGenerator, RulesGenerator};

    #[tokio::test]
    #[ignore = "requires OPENAI_API_KEY"]
    async fn live_rules_and_one_card() {
        skip_if_openai_unavailable().await;
        let llm: Arc<dyn LlmPort> = Arc::new(create_test_openai_client());

        let spec = RulesGenerator::new(llm.clone())
            .generate("a simple trading game")
            .await
            .expect("rules");
        assert!(!spec.card_types.is_empty());

        let card = CardContentGenerator::new(llm)
            .generate("a simple trading game", &spec.card_types[0], 1)
            .await
            .expect("card");
        assert!(!card.title.is_empty());
        assert!(!card.illustration_prompt.is_empty());
    }
}
