//! Errors raised by the generation use cases.

use cardforge_domain::{DomainError, RejectReason};

use crate::infrastructure::ports::{ImageGenError, LlmError};
use crate::render::RenderError;

/// The text service failed or its structured reply was unusable.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Text service error: {0}")]
    Llm(#[from] LlmError),

    #[error("Structured reply rejected ({reason}): {detail}")]
    Schema { reason: RejectReason, detail: String },

    #[error("Gave up after {attempts} attempts: {last}")]
    AttemptsExhausted {
        attempts: u32,
        last: Box<GenerationError>,
    },
}

/// One illustration attempt failed. Never leaves the illustration provider.
#[derive(Debug, thiserror::Error)]
pub enum IllustrationError {
    #[error("Image service error: {0}")]
    ImageGen(#[from] ImageGenError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

/// Failure of a whole pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Rules generation failed: {0}")]
    Rules(#[source] GenerationError),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Why one attempt at a card unit failed. The unit is restarted or abandoned.
#[derive(Debug, thiserror::Error)]
pub enum UnitError {
    #[error(transparent)]
    Content(#[from] GenerationError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}
