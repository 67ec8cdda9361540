//! Error types for the relay and its model collaborator.

use crate::result::FailureKind;
use thiserror::Error;

/// Failures reported by a [`crate::ModelCollaborator`].
#[derive(Error, Debug)]
pub enum CollaboratorError {
    #[error("model API key not configured (set {0})")]
    MissingCredentials(&'static str),

    #[error("model request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("model API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed model response: {0}")]
    MalformedResponse(String),

    #[error("model returned no text")]
    EmptyResponse,
}

/// Everything that can go wrong inside one generation call.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Prompt is required.")]
    Validation,

    #[error("upstream model call failed: {0}")]
    Upstream(#[from] CollaboratorError),

    #[error("failed to persist artifact: {0}")]
    Persistence(#[from] std::io::Error),
}

impl RelayError {
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::Validation => FailureKind::Validation,
            Self::Upstream(_) => FailureKind::Upstream,
            Self::Persistence(_) => FailureKind::Persistence,
        }
    }
}
