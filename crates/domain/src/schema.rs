//! Structured-output contract with the text service.
//!
//! The text service is asked to answer by "calling" one of two tools whose
//! parameter schemas are defined here. Its reply is parsed back into domain
//! types through [`SchemaOutcome`], so callers match on a tagged result instead
//! of juggling serde errors.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::{CardContent, CardTypeQuota, GameSpecification};

pub const RULES_TOOL_NAME: &str = "define_game_rules";
pub const CARD_TOOL_NAME: &str = "generate_card";

/// A tool definition offered to the text service.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSchema {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

/// Schema for the one-shot rules request.
pub fn rules_tool() -> ToolSchema {
    ToolSchema {
        name: RULES_TOOL_NAME,
        description: "Define the rules and card specifications for a card game",
        parameters: json!({
            "type": "object",
            "properties": {
                "game_title": {
                    "type": "string",
                    "description": "The title of the card game"
                },
                "objective": {
                    "type": "string",
                    "description": "The main objective of the game"
                },
                "cards": {
                    "type": "object",
                    "description": "Specification of all card types and their quantities",
                    "properties": {
                        "card_types": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "type": {
                                        "type": "string",
                                        "description": "The type of card (e.g., Action, Item)"
                                    },
                                    "quantity": {
                                        "type": "integer",
                                        "description": "Number of cards of this type"
                                    },
                                    "description": {
                                        "type": "string",
                                        "description": "Description of what this type of card does"
                                    }
                                },
                                "required": ["type", "quantity", "description"]
                            }
                        },
                        "total_cards": {
                            "type": "integer",
                            "description": "Total number of cards in the game"
                        }
                    },
                    "required": ["card_types", "total_cards"]
                },
                "setup": {
                    "type": "string",
                    "description": "How to set up the game"
                },
                "gameplay": {
                    "type": "string",
                    "description": "How to play the game"
                },
                "winning_conditions": {
                    "type": "string",
                    "description": "How to win the game"
                }
            },
            "required": ["game_title", "objective", "cards", "setup", "gameplay", "winning_conditions"]
        }),
    }
}

/// Schema for a single card's content.
pub fn card_tool() -> ToolSchema {
    ToolSchema {
        name: CARD_TOOL_NAME,
        description: "Generate content for a game card",
        parameters: json!({
            "type": "object",
            "properties": {
                "title": {
                    "type": "string",
                    "description": "The title of the card"
                },
                "type": {
                    "type": "string",
                    "description": "The type of card (e.g., Action, Item)"
                },
                "description": {
                    "type": "string",
                    "description": "The card's effect or description"
                },
                "image_prompt": {
                    "type": "string",
                    "description": "A detailed prompt for the image service to generate the card's background illustration"
                }
            },
            "required": ["title", "type", "description", "image_prompt"]
        }),
    }
}

// =============================================================================
// Tagged parse outcome
// =============================================================================

/// Why a structured reply could not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The service answered with free text instead of a tool call
    MissingToolCall,
    /// The service called a tool other than the one requested
    WrongTool,
    /// The arguments did not deserialize into the wire payload
    MalformedArguments,
    /// The arguments deserialized but break a contract rule
    SchemaViolation,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingToolCall => write!(f, "missing_tool_call"),
            Self::WrongTool => write!(f, "wrong_tool"),
            Self::MalformedArguments => write!(f, "malformed_arguments"),
            Self::SchemaViolation => write!(f, "schema_violation"),
        }
    }
}

/// Result of checking a structured reply against a schema.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaOutcome<T> {
    Parsed(T),
    Rejected { reason: RejectReason, detail: String },
}

impl<T> SchemaOutcome<T> {
    fn rejected(reason: RejectReason, detail: impl Into<String>) -> Self {
        Self::Rejected {
            reason,
            detail: detail.into(),
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, Self::Parsed(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SchemaOutcome<U> {
        match self {
            Self::Parsed(value) => SchemaOutcome::Parsed(f(value)),
            Self::Rejected { reason, detail } => SchemaOutcome::Rejected { reason, detail },
        }
    }
}

/// A tool call as returned by the service: the tool name and its JSON arguments.
pub type ToolInvocation<'a> = (&'a str, &'a Value);

/// Parse a rules reply. `None` means the service returned no tool call.
pub fn parse_rules(call: Option<ToolInvocation<'_>>) -> SchemaOutcome<GameSpecification> {
    parse_payload::<RulesPayload>(call, RULES_TOOL_NAME).and_then_validate(RulesPayload::validate)
}

/// Parse a card reply. `None` means the service returned no tool call.
pub fn parse_card(call: Option<ToolInvocation<'_>>) -> SchemaOutcome<CardContent> {
    parse_payload::<CardPayload>(call, CARD_TOOL_NAME).and_then_validate(CardPayload::validate)
}

fn parse_payload<P>(call: Option<ToolInvocation<'_>>, expected: &str) -> SchemaOutcome<P>
where
    P: for<'de> Deserialize<'de>,
{
    let Some((name, arguments)) = call else {
        return SchemaOutcome::rejected(
            RejectReason::MissingToolCall,
            format!("expected a call to '{expected}'"),
        );
    };

    if name != expected {
        return SchemaOutcome::rejected(
            RejectReason::WrongTool,
            format!("expected '{expected}', got '{name}'"),
        );
    }

    match P::deserialize(arguments) {
        Ok(payload) => SchemaOutcome::Parsed(payload),
        Err(e) => SchemaOutcome::rejected(RejectReason::MalformedArguments, e.to_string()),
    }
}

impl<P> SchemaOutcome<P> {
    fn and_then_validate<T>(self, validate: impl FnOnce(P) -> Result<T, String>) -> SchemaOutcome<T> {
        match self {
            Self::Parsed(payload) => match validate(payload) {
                Ok(value) => SchemaOutcome::Parsed(value),
                Err(detail) => SchemaOutcome::rejected(RejectReason::SchemaViolation, detail),
            },
            Self::Rejected { reason, detail } => SchemaOutcome::Rejected { reason, detail },
        }
    }
}

// =============================================================================
// Wire payloads
// =============================================================================

#[derive(Debug, Deserialize)]
struct RulesPayload {
    game_title: String,
    objective: String,
    cards: CardsPayload,
    setup: String,
    gameplay: String,
    winning_conditions: String,
}

#[derive(Debug, Deserialize)]
struct CardsPayload {
    #[serde(default)]
    card_types: Vec<CardTypePayload>,
    total_cards: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct CardTypePayload {
    #[serde(rename = "type")]
    card_type: String,
    quantity: i64,
    #[serde(default)]
    description: String,
}

impl RulesPayload {
    fn validate(self) -> Result<GameSpecification, String> {
        let mut card_types = Vec::with_capacity(self.cards.card_types.len());
        for entry in self.cards.card_types {
            let quantity = u32::try_from(entry.quantity).map_err(|_| {
                format!(
                    "card type '{}' has invalid quantity {}",
                    entry.card_type, entry.quantity
                )
            })?;
            card_types.push(CardTypeQuota::new(entry.card_type, quantity, entry.description));
        }

        let quota_sum = card_types
            .iter()
            .fold(0u32, |acc, quota: &CardTypeQuota| acc.saturating_add(quota.quantity));

        // A missing or negative total falls back to the quota sum; a present
        // but wrong total is kept as reported.
        let total_cards = self
            .cards
            .total_cards
            .and_then(|total| u32::try_from(total).ok())
            .unwrap_or(quota_sum);

        Ok(GameSpecification {
            title: self.game_title,
            objective: self.objective,
            setup: self.setup,
            gameplay: self.gameplay,
            winning_conditions: self.winning_conditions,
            card_types,
            total_cards,
        })
    }
}

#[derive(Debug, Deserialize)]
struct CardPayload {
    title: String,
    #[serde(rename = "type")]
    card_type: String,
    description: String,
    image_prompt: String,
}

impl CardPayload {
    fn validate(self) -> Result<CardContent, String> {
        if self.title.trim().is_empty() {
            return Err("card title is empty".to_string());
        }
        if self.image_prompt.trim().is_empty() {
            return Err(format!("card '{}' has an empty image_prompt", self.title));
        }

        Ok(CardContent {
            title: self.title,
            card_type: self.card_type,
            description: self.description,
            illustration_prompt: self.image_prompt,
        })
    }
}
