//! Canned text-service replies and a scripted fake for pipeline tests.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use cardforge_domain::{CARD_TOOL_NAME, RULES_TOOL_NAME};

use crate::infrastructure::ports::{
    FinishReason, LlmError, LlmPort, LlmRequest, LlmResponse, ToolCall,
};

/// A reply that calls `name` with `arguments`.
pub fn tool_response(name: &str, arguments: Value) -> LlmResponse {
    LlmResponse {
        content: String::new(),
        tool_calls: vec![ToolCall {
            name: name.to_string(),
            arguments,
        }],
        finish_reason: FinishReason::ToolCalls,
        usage: None,
    }
}

/// A free-text reply with no tool call.
pub fn text_response(text: &str) -> LlmResponse {
    LlmResponse {
        content: text.to_string(),
        tool_calls: Vec::new(),
        finish_reason: FinishReason::Stop,
        usage: None,
    }
}

/// Rules tool arguments with the given card types and reported total.
pub fn rules_arguments(title: &str, card_types: &[(&str, u32)], total_cards: u32) -> Value {
    let card_types: Vec<Value> = card_types
        .iter()
        .map(|(card_type, quantity)| {
            json!({
                "type": card_type,
                "quantity": quantity,
                "description": format!("{card_type} cards")
            })
        })
        .collect();

    json!({
        "game_title": title,
        "objective": "Finish the market day with the most coins.",
        "cards": {"card_types": card_types, "total_cards": total_cards},
        "setup": "Shuffle all cards and deal five to each player.",
        "gameplay": "On your turn draw a card, then trade or play one card.",
        "winning_conditions": "When the deck runs out the richest player wins."
    })
}

/// "Market Day": 5 Goods and 3 Event cards.
pub fn trading_game_rules() -> Value {
    rules_arguments("Market Day", &[("Goods", 5), ("Event", 3)], 8)
}

pub fn card_arguments(title: &str, card_type: &str) -> Value {
    json!({
        "title": title,
        "type": card_type,
        "description": format!("Play {title} to swap a card with a neighbour."),
        "image_prompt": format!("{card_type} artwork showing {title}")
    })
}

/// Fake text service that answers rules and card requests from a script.
///
/// Card replies take their type from the system prompt and are numbered in
/// call order. The first N card calls can be made to fail, and card calls can
/// be given a latency so overlapping calls show up in
/// [`ScriptedLlm::max_card_calls_in_flight`].
pub struct ScriptedLlm {
    rules: Option<Value>,
    card_failures_left: AtomicUsize,
    card_latency: Duration,
    rules_calls: AtomicUsize,
    card_calls: AtomicUsize,
    card_calls_in_flight: AtomicUsize,
    max_card_calls_in_flight: AtomicUsize,
}

impl ScriptedLlm {
    pub fn new(rules: Value) -> Self {
        Self {
            rules: Some(rules),
            card_failures_left: AtomicUsize::new(0),
            card_latency: Duration::ZERO,
            rules_calls: AtomicUsize::new(0),
            card_calls: AtomicUsize::new(0),
            card_calls_in_flight: AtomicUsize::new(0),
            max_card_calls_in_flight: AtomicUsize::new(0),
        }
    }

    /// A service that answers rules requests with free text.
    pub fn without_rules() -> Self {
        Self {
            rules: None,
            ..Self::new(Value::Null)
        }
    }

    pub fn failing_first_card_calls(self, count: usize) -> Self {
        self.card_failures_left.store(count, Ordering::SeqCst);
        self
    }

    pub fn failing_all_card_calls(self) -> Self {
        self.failing_first_card_calls(usize::MAX)
    }

    pub fn with_card_latency(mut self, latency: Duration) -> Self {
        self.card_latency = latency;
        self
    }

    pub fn rules_calls(&self) -> usize {
        self.rules_calls.load(Ordering::SeqCst)
    }

    pub fn card_calls(&self) -> usize {
        self.card_calls.load(Ordering::SeqCst)
    }

    /// Most card calls ever running at the same time.
    pub fn max_card_calls_in_flight(&self) -> usize {
        self.max_card_calls_in_flight.load(Ordering::SeqCst)
    }

    fn card_type_from(request: &LlmRequest) -> String {
        request
            .system_prompt
            .as_deref()
            .and_then(|prompt| prompt.split_once("Generate a "))
            .and_then(|(_, rest)| rest.split_once(" card that"))
            .map(|(card_type, _)| card_type.to_string())
            .unwrap_or_else(|| "Card".to_string())
    }
}

#[async_trait]
impl LlmPort for ScriptedLlm {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        match request.forced_tool.as_deref() {
            Some(RULES_TOOL_NAME) => {
                self.rules_calls.fetch_add(1, Ordering::SeqCst);
                Ok(match &self.rules {
                    Some(rules) => tool_response(RULES_TOOL_NAME, rules.clone()),
                    None => text_response("I'd rather describe the game in prose."),
                })
            }
            Some(CARD_TOOL_NAME) => {
                let number = self.card_calls.fetch_add(1, Ordering::SeqCst) + 1;
                let in_flight = self.card_calls_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                self.max_card_calls_in_flight
                    .fetch_max(in_flight, Ordering::SeqCst);
                if !self.card_latency.is_zero() {
                    tokio::time::sleep(self.card_latency).await;
                }
                self.card_calls_in_flight.fetch_sub(1, Ordering::SeqCst);

                let failing = self
                    .card_failures_left
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| {
                        left.checked_sub(1)
                    })
                    .is_ok();
                if failing {
                    return Err(LlmError::RequestFailed(format!(
                        "scripted failure on card call {number}"
                    )));
                }

                let card_type = Self::card_type_from(&request);
                Ok(tool_response(
                    CARD_TOOL_NAME,
                    card_arguments(&format!("{card_type} {number}"), &card_type),
                ))
            }
            _ => Ok(text_response("")),
        }
    }
}
