//! JSON bodies of the HTTP API, shared by the gateway and the shell client.

use crate::kind::ArtifactKind;
use crate::result::{ArtifactMetadata, FailureKind, GeneratedArtifact, GenerationFailure};
use serde::{Deserialize, Serialize};

/// Request body for both generate endpoints. A missing prompt reads as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateBody {
    #[serde(default)]
    pub prompt: String,
}

/// `POST /api/generate/website` success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteResponse {
    pub success: bool,
    pub code: String,
    pub preview_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildStatus {
    Completed,
}

/// `POST /api/generate/apk` success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApkResponse {
    pub success: bool,
    pub build_id: String,
    pub status: BuildStatus,
    pub download_url: String,
    pub code_preview: String,
}

/// Failure body for 400 and 500 responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<FailureKind>,
}

impl From<&GenerationFailure> for ErrorResponse {
    fn from(f: &GenerationFailure) -> Self {
        Self {
            success: false,
            error: f.message.clone(),
            error_kind: Some(f.kind),
        }
    }
}

/// Success body for a generated artifact, as a JSON value ready to send.
pub fn success_body(artifact: GeneratedArtifact) -> serde_json::Value {
    let json = match artifact.metadata {
        ArtifactMetadata::Website { preview_path } => serde_json::to_value(WebsiteResponse {
            success: true,
            code: artifact.text,
            preview_url: preview_path,
        }),
        ArtifactMetadata::App {
            build_id,
            download_url,
        } => serde_json::to_value(ApkResponse {
            success: true,
            build_id,
            status: BuildStatus::Completed,
            download_url,
            code_preview: artifact.text,
        }),
    };
    // Both bodies are plain string structs; serialization cannot fail.
    json.unwrap_or_default()
}

/// Endpoint path segment for a kind (`website` or `apk`).
pub fn endpoint_segment(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::Website => "website",
        ArtifactKind::App => "apk",
    }
}
