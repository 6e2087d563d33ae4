//! Bookkeeping shared by the steps that call the text service.

use cardforge_domain::RejectReason;

use super::error::GenerationError;
use crate::infrastructure::ports::{FinishReason, LlmResponse};

/// Log token usage and any early stop for one reply.
pub(crate) fn trace_reply(step: &'static str, response: &LlmResponse) {
    if let Some(usage) = &response.usage {
        tracing::debug!(
            step,
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            total_tokens = usage.total_tokens,
            "Text service usage"
        );
    }
    if let Some(note) = stop_note(&response.finish_reason) {
        tracing::warn!(step, "Text service reply {note}");
    }
}

/// Schema rejection of `response`, noting an early stop in the detail.
pub(crate) fn rejection(
    response: &LlmResponse,
    reason: RejectReason,
    detail: String,
) -> GenerationError {
    let detail = match stop_note(&response.finish_reason) {
        Some(note) => format!("{detail} (reply {note})"),
        None => detail,
    };
    GenerationError::Schema { reason, detail }
}

fn stop_note(finish_reason: &FinishReason) -> Option<&'static str> {
    match finish_reason {
        FinishReason::Length => Some("hit the token limit"),
        FinishReason::ContentFilter => Some("was stopped by the content filter"),
        FinishReason::Stop | FinishReason::ToolCalls | FinishReason::Unknown => None,
    }
}
