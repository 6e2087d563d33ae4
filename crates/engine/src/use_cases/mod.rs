//! Use cases - the generation steps and the pipeline that sequences them.
//!
//! Each step talks to the outside world only through the ports in
//! `infrastructure::ports`.

pub mod card_content;
mod completion;
pub mod error;
pub mod illustration;
pub mod pipeline;
pub mod rules;

// Re-export main types
pub use card_content::CardContentGenerator;
pub use error::{GenerationError, IllustrationError, PipelineError, UnitError};
pub use illustration::IllustrationProvider;
pub use pipeline::{AbandonedUnit, PipelineOrchestrator, PipelineReport, RenderedDocument};
pub use rules::{format_rules_markdown, RulesGenerator};
