//! The relay: one prompt in, one collaborator call, one shaped result out.

use crate::artifact::ArtifactStore;
use crate::collaborator::ModelCollaborator;
use crate::error::RelayError;
use crate::ids::MonotonicIds;
use crate::kind::ArtifactKind;
use crate::result::{ArtifactMetadata, GeneratedArtifact, GenerationFailure, GenerationResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;

/// URL segment for synthetic app downloads. The gateway never mounts it.
pub const DOWNLOADS_PREFIX: &str = "/downloads";

/// A validated generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    kind: ArtifactKind,
    prompt: String,
}

impl GenerationRequest {
    /// Rejects prompts that are empty after trimming. The prompt itself is kept as given.
    pub fn new(kind: ArtifactKind, prompt: impl Into<String>) -> Result<Self, RelayError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(RelayError::Validation);
        }
        Ok(Self { kind, prompt })
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

pub struct RelayService {
    collaborator: Arc<dyn ModelCollaborator>,
    artifacts: ArtifactStore,
    ids: Arc<MonotonicIds>,
    build_delay: Duration,
}

impl RelayService {
    pub fn new(
        collaborator: Arc<dyn ModelCollaborator>,
        artifacts: ArtifactStore,
        ids: Arc<MonotonicIds>,
        build_delay: Duration,
    ) -> Self {
        Self {
            collaborator,
            artifacts,
            ids,
            build_delay,
        }
    }

    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    /// Generate and shape the result. Never fails: every error becomes `Failed`.
    pub async fn generate(&self, kind: ArtifactKind, prompt: &str) -> GenerationResult {
        match self.try_generate(kind, prompt).await {
            Ok(artifact) => GenerationResult::Succeeded(artifact),
            Err(err) => {
                match &err {
                    RelayError::Validation => tracing::debug!(%kind, "rejected empty prompt"),
                    other => tracing::error!(%kind, error = %other, "generation failed"),
                }
                GenerationResult::Failed(GenerationFailure::from_error(kind, &err))
            }
        }
    }

    /// Typed variant of [`RelayService::generate`].
    pub async fn try_generate(&self, kind: ArtifactKind, prompt: &str) -> Result<GeneratedArtifact, RelayError> {
        let request = GenerationRequest::new(kind, prompt)?;
        let span = tracing::info_span!(
            "generate",
            request_id = %uuid::Uuid::new_v4(),
            kind = %kind,
            collaborator = self.collaborator.name(),
        );
        self.run(request).instrument(span).await
    }

    async fn run(&self, request: GenerationRequest) -> Result<GeneratedArtifact, RelayError> {
        let kind = request.kind();
        tracing::info!(prompt_chars = request.prompt().chars().count(), "relaying prompt to model");

        let text = self
            .collaborator
            .complete(kind.system_instruction(), request.prompt())
            .await?;

        let metadata = match kind {
            ArtifactKind::Website => {
                let stored = self.artifacts.write(&text).await?;
                ArtifactMetadata::Website {
                    preview_path: stored.public_path,
                }
            }
            ArtifactKind::App => {
                let build_id = format!("build_{}", self.ids.next());
                if !self.build_delay.is_zero() {
                    tracing::debug!(%build_id, delay_ms = self.build_delay.as_millis() as u64, "simulating build");
                    tokio::time::sleep(self.build_delay).await;
                }
                ArtifactMetadata::App {
                    download_url: format!("{}/{}.apk", DOWNLOADS_PREFIX, build_id),
                    build_id,
                }
            }
        };

        tracing::info!(chars = text.len(), "generation complete");
        Ok(GeneratedArtifact { kind, text, metadata })
    }
}
