//! Rules generation use case.
//!
//! One forced-tool request turns a free-text concept into a full
//! [`GameSpecification`]. Failures are returned as-is; the caller decides
//! whether the run can continue (it cannot).

use std::fmt::Write as _;
use std::sync::Arc;

use cardforge_domain::{parse_rules, rules_tool, GameSpecification, SchemaOutcome};

use super::completion::{rejection, trace_reply};
use super::error::GenerationError;
use crate::infrastructure::ports::{ChatMessage, LlmPort, LlmRequest, ToolDefinition};

const RULES_SYSTEM_PROMPT: &str = "You are a professional card game designer. \
Create clear, concise rules for a card-only game (no board, no dice, just cards). \
Design a balanced and engaging game with an appropriate number of cards.";

/// Generate a game specification from a concept.
pub struct RulesGenerator {
    llm: Arc<dyn LlmPort>,
}

impl RulesGenerator {
    pub fn new(llm: Arc<dyn LlmPort>) -> Self {
        Self { llm }
    }

    pub async fn generate(&self, concept: &str) -> Result<GameSpecification, GenerationError> {
        let request = LlmRequest::new(vec![ChatMessage::user(format!(
            "Create rules for this card game concept: {concept}"
        ))])
        .with_system_prompt(RULES_SYSTEM_PROMPT)
        .with_required_tool(ToolDefinition::from(rules_tool()));

        let response = self.llm.generate(request).await?;
        trace_reply("rules", &response);

        match parse_rules(response.first_tool_call()) {
            SchemaOutcome::Parsed(specification) => {
                tracing::debug!(
                    title = %specification.title,
                    card_types = specification.card_types.len(),
                    total_cards = specification.total_cards,
                    "Generated game rules"
                );
                for quota in &specification.card_types {
                    tracing::debug!(
                        card_type = %quota.card_type,
                        quantity = quota.quantity,
                        "Card distribution"
                    );
                }
                if !specification.has_consistent_total() {
                    tracing::warn!(
                        reported = specification.total_cards,
                        actual = specification.quota_total(),
                        "Reported card total does not match the card type quantities"
                    );
                }
                Ok(specification)
            }
            SchemaOutcome::Rejected { reason, detail } => Err(rejection(&response, reason, detail)),
        }
    }
}

/// Render a specification as the lightly-marked text the rules document is
/// laid out from. Each header sits in its own paragraph.
pub fn format_rules_markdown(specification: &GameSpecification) -> String {
    let mut text = String::new();

    let _ = write!(text, "**{}**\n\n", specification.title);
    let _ = write!(text, "**Objective:**\n\n{}\n\n", specification.objective);

    text.push_str("**Components:**\n\n");
    let _ = writeln!(text, "Total Cards: {}", specification.total_cards);
    for quota in &specification.card_types {
        let _ = writeln!(
            text,
            "- {} {} Cards: {}",
            quota.quantity, quota.card_type, quota.description
        );
    }
    text.push('\n');

    let _ = write!(text, "**Setup:**\n\n{}\n\n", specification.setup);
    let _ = write!(text, "**Gameplay:**\n\n{}\n\n", specification.gameplay);
    let _ = write!(
        text,
        "**Winning Conditions:**\n\n{}\n",
        specification.winning_conditions
    );

    text
}
