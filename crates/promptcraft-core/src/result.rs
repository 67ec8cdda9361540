//! Result shape returned across the relay boundary.
//!
//! A failure never carries text or metadata and a success always carries text with
//! metadata matching its kind; the enum makes any other combination unrepresentable.

use crate::error::RelayError;
use crate::kind::ArtifactKind;
use serde::{Deserialize, Serialize};

pub const PROMPT_REQUIRED_MESSAGE: &str = "Prompt is required.";
pub const WEBSITE_FAILURE_MESSAGE: &str =
    "Failed to generate website. Please try a different prompt or check server logs.";
pub const APP_FAILURE_MESSAGE: &str =
    "Failed to generate app. Please try a different prompt or check server logs.";
pub const PERSISTENCE_FAILURE_MESSAGE: &str =
    "Failed to save the generated website. Please check server logs.";

/// Error category surfaced to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Validation,
    Upstream,
    Persistence,
}

/// Kind-specific data attached to a successful generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactMetadata {
    /// Public path of the persisted copy, e.g. `/generated/1718000000000.html`.
    Website { preview_path: String },
    /// Synthetic build. `download_url` is never backed by a file.
    App { build_id: String, download_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub kind: ArtifactKind,
    pub text: String,
    pub metadata: ArtifactMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl GenerationFailure {
    /// User-facing failure for `err`. Upstream details stay in the server log.
    pub fn from_error(artifact: ArtifactKind, err: &RelayError) -> Self {
        let message = match err {
            RelayError::Validation => PROMPT_REQUIRED_MESSAGE,
            RelayError::Upstream(_) => match artifact {
                ArtifactKind::Website => WEBSITE_FAILURE_MESSAGE,
                ArtifactKind::App => APP_FAILURE_MESSAGE,
            },
            RelayError::Persistence(_) => PERSISTENCE_FAILURE_MESSAGE,
        };
        Self {
            kind: err.failure_kind(),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationResult {
    Succeeded(GeneratedArtifact),
    Failed(GenerationFailure),
}

impl GenerationResult {
    pub fn succeeded(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Succeeded(a) => Some(a.text.as_str()),
            Self::Failed(_) => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Succeeded(_) => None,
            Self::Failed(f) => Some(f.message.as_str()),
        }
    }

    pub fn metadata(&self) -> Option<&ArtifactMetadata> {
        match self {
            Self::Succeeded(a) => Some(&a.metadata),
            Self::Failed(_) => None,
        }
    }
}
