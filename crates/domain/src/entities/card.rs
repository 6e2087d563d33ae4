//! Card entities - Generated card content and finished card records

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Text content for one card, as returned by the text service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardContent {
    pub title: String,
    pub card_type: String,
    pub description: String,
    /// Prompt handed to the image service for this card's illustration
    pub illustration_prompt: String,
}

/// Where a card's picture comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Illustration {
    /// An image file on disk
    File(PathBuf),
    /// No file could be written; the renderer draws the fallback gradient
    Fallback,
}

impl Illustration {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Fallback => None,
        }
    }
}

impl From<PathBuf> for Illustration {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

impl From<&Path> for Illustration {
    fn from(path: &Path) -> Self {
        Self::File(path.to_path_buf())
    }
}

impl From<String> for Illustration {
    fn from(path: String) -> Self {
        Self::File(PathBuf::from(path))
    }
}

impl From<&str> for Illustration {
    fn from(path: &str) -> Self {
        Self::File(PathBuf::from(path))
    }
}

/// A card being assembled by the pipeline.
///
/// Created with content only; the illustration is attached exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRecord {
    pub title: String,
    pub card_type: String,
    pub description: String,
    pub illustration_prompt: String,
    illustration: Option<Illustration>,
}

impl CardRecord {
    /// Create a record that still needs its illustration.
    pub fn from_content(content: CardContent) -> Self {
        Self {
            title: content.title,
            card_type: content.card_type,
            description: content.description,
            illustration_prompt: content.illustration_prompt,
            illustration: None,
        }
    }

    /// Attach the illustration. Fails if one is already attached.
    pub fn attach_illustration(
        &mut self,
        illustration: impl Into<Illustration>,
    ) -> Result<(), DomainError> {
        if self.illustration.is_some() {
            return Err(DomainError::invalid_state_transition(format!(
                "card '{}' already has an illustration attached",
                self.title
            )));
        }
        self.illustration = Some(illustration.into());
        Ok(())
    }

    /// Builder-style variant of [`CardRecord::attach_illustration`].
    pub fn with_illustration(
        mut self,
        illustration: impl Into<Illustration>,
    ) -> Result<Self, DomainError> {
        self.attach_illustration(illustration)?;
        Ok(self)
    }

    pub fn illustration(&self) -> Option<&Illustration> {
        self.illustration.as_ref()
    }

    /// Path of the illustration file, if the card has one on disk.
    pub fn illustration_path(&self) -> Option<&Path> {
        self.illustration.as_ref().and_then(Illustration::path)
    }

    pub fn is_complete(&self) -> bool {
        self.illustration.is_some()
    }
}
