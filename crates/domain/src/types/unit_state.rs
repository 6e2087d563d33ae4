//! Lifecycle of a single card unit inside the generation pipeline.

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Where one requested card currently is in the pipeline.
///
/// ```text
/// ContentPending -> ContentReady -> IllustrationPending -> Complete
///        \________________\_________________\-> Failed -> ContentPending (retry)
///                                                  \-> Abandoned
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitState {
    #[default]
    ContentPending,
    ContentReady,
    IllustrationPending,
    Complete,
    Failed,
    Abandoned,
}

impl UnitState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Abandoned)
    }

    /// Card text arrived.
    pub fn content_ready(self) -> Result<Self, DomainError> {
        self.transition(Self::ContentPending, Self::ContentReady)
    }

    /// Illustration request issued for the ready content.
    pub fn request_illustration(self) -> Result<Self, DomainError> {
        self.transition(Self::ContentReady, Self::IllustrationPending)
    }

    /// Illustration attached; the card can be rendered.
    pub fn complete(self) -> Result<Self, DomainError> {
        self.transition(Self::IllustrationPending, Self::Complete)
    }

    /// Any step of the unit failed. Allowed from every non-terminal, non-failed state.
    pub fn fail(self) -> Result<Self, DomainError> {
        match self {
            Self::ContentPending | Self::ContentReady | Self::IllustrationPending => {
                Ok(Self::Failed)
            }
            other => Err(Self::illegal(other, Self::Failed)),
        }
    }

    /// Restart a failed unit from the beginning.
    pub fn retry(self) -> Result<Self, DomainError> {
        self.transition(Self::Failed, Self::ContentPending)
    }

    /// Give up on a failed unit.
    pub fn abandon(self) -> Result<Self, DomainError> {
        self.transition(Self::Failed, Self::Abandoned)
    }

    fn transition(self, from: Self, to: Self) -> Result<Self, DomainError> {
        if self == from {
            Ok(to)
        } else {
            Err(Self::illegal(self, to))
        }
    }

    fn illegal(from: Self, to: Self) -> DomainError {
        DomainError::invalid_state_transition(format!("{from:?} -> {to:?}"))
    }
}

impl std::fmt::Display for UnitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ContentPending => write!(f, "content_pending"),
            Self::ContentReady => write!(f, "content_ready"),
            Self::IllustrationPending => write!(f, "illustration_pending"),
            Self::Complete => write!(f, "complete"),
            Self::Failed => write!(f, "failed"),
            Self::Abandoned => write!(f, "abandoned"),
        }
    }
}
