//! External service port traits (text generation, image generation).

use async_trait::async_trait;
use cardforge_domain::ToolSchema;

use super::error::{ImageGenError, LlmError};

// =============================================================================
// LLM Types
// =============================================================================

/// LLM request/response types
#[derive(Debug, Clone)]
pub struct LlmRequest {
    /// The conversation history
    pub messages: Vec<ChatMessage>,
    /// System prompt / context
    pub system_prompt: Option<String>,
    /// Tools the model may call
    pub tools: Vec<ToolDefinition>,
    /// Name of the tool the model is forced to call
    pub forced_tool: Option<String>,
}

impl LlmRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            system_prompt: None,
            tools: Vec::new(),
            forced_tool: None,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Offer exactly one tool and force the model to answer through it.
    pub fn with_required_tool(mut self, tool: ToolDefinition) -> Self {
        self.forced_tool = Some(tool.name.clone());
        self.tools = vec![tool];
        self
    }
}

/// A user message in the conversation
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Definition of a tool the LLM can call
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

impl From<ToolSchema> for ToolDefinition {
    fn from(schema: ToolSchema) -> Self {
        Self {
            name: schema.name.to_string(),
            description: schema.description.to_string(),
            parameters: schema.parameters,
        }
    }
}

/// A tool call proposed by the LLM
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub name: String,
    pub arguments: serde_json::Value,
}

/// Response from the LLM
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// The generated text content
    pub content: String,
    /// Tool calls proposed by the model
    pub tool_calls: Vec<ToolCall>,
    /// Finish reason
    pub finish_reason: FinishReason,
    /// Token usage
    pub usage: Option<TokenUsage>,
}

impl LlmResponse {
    /// The first tool call as `(name, arguments)`, the shape the schema parsers take.
    pub fn first_tool_call(&self) -> Option<(&str, &serde_json::Value)> {
        self.tool_calls
            .first()
            .map(|call| (call.name.as_str(), &call.arguments))
    }
}

/// Reason the generation finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Stop,
    Length,
    ToolCalls,
    ContentFilter,
    Unknown,
}

/// Token usage information
#[derive(Debug, Clone)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmPort: Send + Sync {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, LlmError>;
}

// =============================================================================
// Image Generation Types
// =============================================================================

/// Image generation request
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub prompt: String,
    pub width: u32,
    pub height: u32,
    /// Quality tier understood by the service (e.g. "standard")
    pub quality: String,
}

impl ImageRequest {
    /// One square image at the standard quality tier.
    pub fn square(prompt: impl Into<String>, size: u32) -> Self {
        Self {
            prompt: prompt.into(),
            width: size,
            height: size,
            quality: "standard".to_string(),
        }
    }
}

/// Raw bytes of a generated image, format as served.
#[derive(Debug, Clone)]
pub struct ImageResult {
    pub image_data: Vec<u8>,
}

/// Generates one image and returns its downloaded bytes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageGenPort: Send + Sync {
    async fn generate(&self, request: ImageRequest) -> Result<ImageResult, ImageGenError>;
}
