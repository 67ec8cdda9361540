//! Client state as one value instead of independent loading/error/result flags.

use promptcraft_core::ArtifactKind;

/// Website result: editable code plus a preview surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebsiteView {
    pub code: String,
    pub preview_url: String,
    /// Bumped on every new result so the preview re-renders even for identical code.
    pub preview_key: u64,
}

/// App result: read-only code and a download link that leads nowhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppView {
    pub code: String,
    pub build_id: String,
    pub download_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellResult {
    Website(WebsiteView),
    App(AppView),
}

impl ShellResult {
    pub fn kind(&self) -> ArtifactKind {
        match self {
            Self::Website(_) => ArtifactKind::Website,
            Self::App(_) => ArtifactKind::App,
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::Website(w) => &w.code,
            Self::App(a) => &a.code,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ShellState {
    #[default]
    Idle,
    Submitting { kind: ArtifactKind },
    Succeeded(ShellResult),
    Failed { message: String },
}

impl ShellState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting { .. })
    }
}
