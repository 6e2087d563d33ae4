//! Environment configuration.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::infrastructure::openai::{DEFAULT_OPENAI_BASE_URL, DEFAULT_TEXT_MODEL};
use crate::infrastructure::openai_images::DEFAULT_IMAGE_MODEL;
use crate::infrastructure::retry::DEFAULT_UNIT_MAX_ATTEMPTS;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
pub const TEXT_MODEL_VAR: &str = "CARDFORGE_TEXT_MODEL";
pub const IMAGE_MODEL_VAR: &str = "CARDFORGE_IMAGE_MODEL";
pub const OUTPUT_DIR_VAR: &str = "CARDFORGE_OUTPUT_DIR";
pub const UNIT_MAX_ATTEMPTS_VAR: &str = "CARDFORGE_UNIT_MAX_ATTEMPTS";
pub const ILLUSTRATION_CONCURRENCY_VAR: &str = "CARDFORGE_ILLUSTRATION_CONCURRENCY";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    MissingVar(&'static str),
    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_key: String,
    pub base_url: String,
    pub text_model: String,
    pub image_model: String,
    pub output_dir: PathBuf,
    /// Attempts per card before it is abandoned; 0 retries forever
    pub unit_max_attempts: u32,
    pub illustration_concurrency: usize,
}

impl AppConfig {
    /// Read the configuration from the process environment.
    ///
    /// Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an explicit variable map (tests, embedding).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_lookup(|name| vars.get(name).cloned())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_key = var(API_KEY_VAR).ok_or(ConfigError::MissingVar(API_KEY_VAR))?;

        Ok(Self {
            api_key,
            base_url: var(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            text_model: var(TEXT_MODEL_VAR).unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string()),
            image_model: var(IMAGE_MODEL_VAR).unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            output_dir: var(OUTPUT_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            unit_max_attempts: parse_number(
                UNIT_MAX_ATTEMPTS_VAR,
                var(UNIT_MAX_ATTEMPTS_VAR),
                DEFAULT_UNIT_MAX_ATTEMPTS,
            )?,
            illustration_concurrency: parse_number(
                ILLUSTRATION_CONCURRENCY_VAR,
                var(ILLUSTRATION_CONCURRENCY_VAR),
                1,
            )?
            .max(1),
        })
    }
}

fn parse_number<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            var: name,
            value: raw,
        }),
    }
}
