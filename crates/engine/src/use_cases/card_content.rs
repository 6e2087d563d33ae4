//! Card content generation use case.

use std::sync::Arc;
use std::time::Duration;

use cardforge_domain::{card_tool, parse_card, CardContent, CardTypeQuota, SchemaOutcome};

use super::completion::{rejection, trace_reply};
use super::error::GenerationError;
use crate::infrastructure::ports::{ChatMessage, LlmPort, LlmRequest, ToolDefinition};

/// Attempts per card before giving up.
pub const DEFAULT_CONTENT_ATTEMPTS: u32 = 3;

/// Wait between content attempts.
pub const DEFAULT_CONTENT_BACKOFF: Duration = Duration::from_secs(1);

/// Generate the text content of one card.
///
/// Exactly one [`CardContent`] comes back per call. The quantity hint is passed
/// through to the prompt but the card tool only describes a single card, so
/// callers invoke this once per card they want.
pub struct CardContentGenerator {
    llm: Arc<dyn LlmPort>,
    max_attempts: u32,
    backoff: Duration,
}

impl CardContentGenerator {
    pub fn new(llm: Arc<dyn LlmPort>) -> Self {
        Self {
            llm,
            max_attempts: DEFAULT_CONTENT_ATTEMPTS,
            backoff: DEFAULT_CONTENT_BACKOFF,
        }
    }

    pub fn with_retry(mut self, max_attempts: u32, backoff: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.backoff = backoff;
        self
    }

    pub async fn generate(
        &self,
        concept: &str,
        quota: &CardTypeQuota,
        quantity_hint: u32,
    ) -> Result<CardContent, GenerationError> {
        let mut last_error = None;

        for attempt in 1..=self.max_attempts {
            match self.attempt(concept, quota, quantity_hint).await {
                Ok(content) => {
                    if attempt > 1 {
                        tracing::info!(
                            attempt,
                            card_type = %quota.card_type,
                            "Card content generated after retry"
                        );
                    }
                    return Ok(content);
                }
                Err(e) => {
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        card_type = %quota.card_type,
                        error = %e,
                        "Card content generation failed"
                    );
                    last_error = Some(e);
                    if attempt < self.max_attempts && !self.backoff.is_zero() {
                        tokio::time::sleep(self.backoff).await;
                    }
                }
            }
        }

        let last = last_error.unwrap_or_else(|| GenerationError::Schema {
            reason: cardforge_domain::RejectReason::MissingToolCall,
            detail: "no attempt was made".to_string(),
        });
        Err(GenerationError::AttemptsExhausted {
            attempts: self.max_attempts,
            last: Box::new(last),
        })
    }

    async fn attempt(
        &self,
        concept: &str,
        quota: &CardTypeQuota,
        quantity_hint: u32,
    ) -> Result<CardContent, GenerationError> {
        let request = LlmRequest::new(vec![ChatMessage::user(format!(
            "Generate {quantity_hint} card(s) for this card-only game concept: {concept}"
        ))])
        .with_system_prompt(card_system_prompt(quota))
        .with_required_tool(ToolDefinition::from(card_tool()));

        let response = self.llm.generate(request).await?;
        trace_reply("card", &response);

        match parse_card(response.first_tool_call()) {
            SchemaOutcome::Parsed(content) => Ok(content),
            SchemaOutcome::Rejected { reason, detail } => Err(rejection(&response, reason, detail)),
        }
    }
}

fn card_system_prompt(quota: &CardTypeQuota) -> String {
    format!(
        "You are a card game designer specializing in card-only games. \
         Generate a {} card that matches this description: {}. \
         For the image_prompt, create a family-friendly, safe-for-work image description. \
         The image should be clear, visually striking, and suitable for a card game. \
         Avoid any potentially controversial or adult themes.",
        quota.card_type, quota.description
    )
}
