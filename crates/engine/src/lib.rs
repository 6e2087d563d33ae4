//! CardForge engine library.
//!
//! Turns a one-line game concept into a rules document and a printable card
//! sheet.
//!
//! ## Structure
//!
//! - `use_cases/` - Rules, card content, illustrations and the pipeline
//! - `render/` - PDF layout and writing
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `config` - Environment configuration
//! - `app` - Application composition

pub mod app;
pub mod config;
pub mod infrastructure;
pub mod render;
pub mod use_cases;

/// Test fixtures module for unit and integration testing.
#[cfg(test)]
pub mod test_fixtures;

pub use app::App;
pub use config::{AppConfig, ConfigError};
