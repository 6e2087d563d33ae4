//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - LLM calls (could swap OpenAI -> Ollama/any OpenAI-compatible server)
//! - Image generation (could swap DALL-E -> ComfyUI)

mod error;
mod external;

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::{
    ChatMessage, FinishReason, ImageGenPort, ImageRequest, ImageResult, LlmPort, LlmRequest,
    LlmResponse, TokenUsage, ToolCall, ToolDefinition,
};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use external::{MockImageGenPort, MockLlmPort};

// =============================================================================
// Error Types
// =============================================================================
pub use error::{ImageGenError, LlmError};
