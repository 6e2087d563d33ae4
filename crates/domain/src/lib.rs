//! CardForge domain: the game specification, card records, the per-unit
//! lifecycle, and the structured-output contract with the text service.
//!
//! Everything here is pure data. No I/O, no async.

pub mod entities;
pub mod error;
pub mod schema;
pub mod types;

pub use entities::{
    CardBatch, CardContent, CardRecord, CardTypeQuota, GameSpecification, Illustration,
};
pub use error::DomainError;
pub use schema::{
    card_tool, parse_card, parse_rules, rules_tool, RejectReason, SchemaOutcome, ToolSchema,
    CARD_TOOL_NAME, RULES_TOOL_NAME,
};
pub use types::UnitState;
