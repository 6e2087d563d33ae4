//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod openai;
pub mod openai_images;
pub mod ports;
pub mod retry;
