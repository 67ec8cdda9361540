//! PromptCraft core: the relay between a prompt and an external generative model.
//!
//! A [`RelayService`] takes an [`ArtifactKind`] and a prompt, attaches the fixed system
//! instruction for that kind, calls a [`ModelCollaborator`] exactly once and shapes the
//! reply into a [`GenerationResult`]. Websites are persisted to the [`ArtifactStore`];
//! apps get a simulated build id and a download URL that never resolves.

pub mod artifact;
pub mod collaborator;
pub mod config;
pub mod error;
pub mod ids;
pub mod kind;
pub mod relay;
pub mod result;
pub mod wire;

pub use artifact::{generated_segment, ArtifactStore, StoredArtifact, ARTIFACT_EXTENSION};
pub use collaborator::{
    build_collaborator, CollaboratorError, GeminiClient, MockCollaborator, ModelCollaborator,
    OpenRouterClient,
};
pub use crate::config::{LlmMode, LlmProvider, RelayConfig};
pub use error::RelayError;
pub use ids::MonotonicIds;
pub use kind::ArtifactKind;
pub use relay::{GenerationRequest, RelayService, DOWNLOADS_PREFIX};
pub use result::{
    ArtifactMetadata, FailureKind, GeneratedArtifact, GenerationFailure, GenerationResult,
    APP_FAILURE_MESSAGE, PERSISTENCE_FAILURE_MESSAGE, PROMPT_REQUIRED_MESSAGE, WEBSITE_FAILURE_MESSAGE,
};
pub use wire::{
    endpoint_segment, success_body, ApkResponse, BuildStatus, ErrorResponse, GenerateBody, WebsiteResponse,
};
