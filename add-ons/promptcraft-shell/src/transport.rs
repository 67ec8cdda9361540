//! Gateway transport: one POST per submission, body decoded by the `success` flag.

use async_trait::async_trait;
use promptcraft_core::{endpoint_segment, ApkResponse, ArtifactKind, ErrorResponse, GenerateBody, WebsiteResponse};
use thiserror::Error;

/// What the gateway answered. Server-side failures are replies, not transport errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationReply {
    Website(WebsiteResponse),
    App(ApkResponse),
    Failure(ErrorResponse),
}

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("gateway unreachable: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected gateway response (HTTP {status}): {message}")]
    Decode { status: u16, message: String },
}

#[async_trait]
pub trait GenerationTransport: Send + Sync {
    async fn send(&self, kind: ArtifactKind, prompt: &str) -> Result<GenerationReply, TransportError>;
}

pub struct HttpTransport {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, kind: ArtifactKind) -> String {
        format!("{}/api/generate/{}", self.base_url, endpoint_segment(kind))
    }
}

#[async_trait]
impl GenerationTransport for HttpTransport {
    async fn send(&self, kind: ArtifactKind, prompt: &str) -> Result<GenerationReply, TransportError> {
        let body = GenerateBody {
            prompt: prompt.to_string(),
        };
        let res = self.client.post(self.endpoint(kind)).json(&body).send().await?;
        let status = res.status().as_u16();
        let bytes = res.bytes().await?;
        tracing::debug!(%kind, status, bytes = bytes.len(), "gateway replied");
        parse_reply(kind, status, &bytes)
    }
}

/// Decode a gateway body. `success: true` selects the kind's success shape; anything
/// else must be an error body.
pub fn parse_reply(kind: ArtifactKind, status: u16, body: &[u8]) -> Result<GenerationReply, TransportError> {
    let decode = |e: serde_json::Error| TransportError::Decode {
        status,
        message: e.to_string(),
    };
    let value: serde_json::Value = serde_json::from_slice(body).map_err(decode)?;

    if value.get("success").and_then(serde_json::Value::as_bool) == Some(true) {
        return match kind {
            ArtifactKind::Website => serde_json::from_value(value).map(GenerationReply::Website),
            ArtifactKind::App => serde_json::from_value(value).map(GenerationReply::App),
        }
        .map_err(decode);
    }
    serde_json::from_value(value)
        .map(GenerationReply::Failure)
        .map_err(decode)
}
