//! Write-once storage for generated websites.
//!
//! Files live under `<public_dir>/<generated_dir>/<id>.html` and are served by the
//! gateway under `/<generated_dir>/`. Nothing here reads or deletes them again.

use crate::ids::MonotonicIds;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};

pub const ARTIFACT_EXTENSION: &str = ".html";

/// Attempts before giving up when every candidate name is already taken.
const MAX_CREATE_ATTEMPTS: usize = 16;

/// A freshly written artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    pub file_name: String,
    pub path: PathBuf,
    /// URL path under which the gateway serves the file.
    pub public_path: String,
}

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
    url_prefix: String,
    ids: Arc<MonotonicIds>,
}

impl ArtifactStore {
    /// Store rooted at `public_dir/generated_dir`, served as `/<generated_dir>/...`.
    ///
    /// `generated_dir` must name a sub-directory; artifacts cannot be served from `/`.
    pub fn new(public_dir: impl AsRef<Path>, generated_dir: &str, ids: Arc<MonotonicIds>) -> std::io::Result<Self> {
        let segment = generated_segment(generated_dir).ok_or_else(|| {
            std::io::Error::new(
                ErrorKind::InvalidInput,
                format!("generated_dir {generated_dir:?} does not name a sub-directory"),
            )
        })?;
        Ok(Self {
            dir: public_dir.as_ref().join(segment),
            url_prefix: format!("/{segment}"),
            ids,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    /// Create the artifact directory if missing. Returns true when it was created.
    pub fn ensure_dirs(&self) -> std::io::Result<bool> {
        if self.dir.is_dir() {
            return Ok(false);
        }
        std::fs::create_dir_all(&self.dir)?;
        tracing::info!(dir = %self.dir.display(), "created artifact directory");
        Ok(true)
    }

    /// Persist `text` under a new, never-before-used name.
    pub async fn write(&self, text: &str) -> std::io::Result<StoredArtifact> {
        for _ in 0..MAX_CREATE_ATTEMPTS {
            let file_name = format!("{}{}", self.ids.next(), ARTIFACT_EXTENSION);
            let path = self.dir.join(&file_name);

            let file = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(f) => f,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    tracing::warn!(file = %file_name, "artifact name taken, retrying with next id");
                    continue;
                }
                Err(e) => return Err(e),
            };
            fill_or_discard(&path, file, text).await?;

            tracing::info!(path = %path.display(), bytes = text.len(), "artifact saved");
            return Ok(StoredArtifact {
                public_path: format!("{}/{}", self.url_prefix, file_name),
                file_name,
                path,
            });
        }
        Err(std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("no free artifact name after {MAX_CREATE_ATTEMPTS} attempts"),
        ))
    }
}

/// The URL/directory segment for `generated_dir`, or `None` when it is blank or `/`.
pub fn generated_segment(generated_dir: &str) -> Option<&str> {
    Some(generated_dir.trim_matches('/')).filter(|s| !s.trim().is_empty())
}

/// Write `text` to a freshly created file; on failure remove it so no partial
/// artifact is ever served.
async fn fill_or_discard<W: AsyncWrite + Unpin>(path: &Path, mut writer: W, text: &str) -> std::io::Result<()> {
    let written = match writer.write_all(text.as_bytes()).await {
        Ok(()) => writer.flush().await,
        Err(e) => Err(e),
    };
    if let Err(e) = written {
        drop(writer);
        if let Err(rm) = tokio::fs::remove_file(path).await {
            tracing::warn!(path = %path.display(), "could not remove partial artifact: {}", rm);
        }
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(tmp: &TempDir) -> ArtifactStore {
        ArtifactStore::new(tmp.path(), "generated", Arc::new(MonotonicIds::new())).unwrap()
    }

    #[test]
    fn test_ensure_dirs_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        assert!(store.ensure_dirs().unwrap());
        assert!(!store.ensure_dirs().unwrap());
        assert!(tmp.path().join("generated").is_dir());
    }

    #[test]
    fn test_prefix_strips_slashes() {
        let store = ArtifactStore::new("/srv/public", "/out/", Arc::new(MonotonicIds::new())).unwrap();
        assert_eq!(store.url_prefix(), "/out");
        assert_eq!(store.dir(), Path::new("/srv/public/out"));
    }

    #[test]
    fn test_root_prefix_is_rejected() {
        for dir in ["", "/", "//", " "] {
            let err = ArtifactStore::new("/srv/public", dir, Arc::new(MonotonicIds::new())).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput, "generated_dir {dir:?}");
        }
        assert_eq!(generated_segment("/previews/"), Some("previews"));
    }

    #[tokio::test]
    async fn test_written_bytes_match_text() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        store.ensure_dirs().unwrap();

        let text = "<!DOCTYPE html><html><body>héllo</body></html>";
        let stored = store.write(text).await.unwrap();

        assert!(stored.file_name.ends_with(ARTIFACT_EXTENSION));
        assert_eq!(stored.public_path, format!("/generated/{}", stored.file_name));
        assert_eq!(std::fs::read_to_string(&stored.path).unwrap(), text);
    }

    #[tokio::test]
    async fn test_taken_name_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let floor = i64::MAX / 2;
        let store = ArtifactStore::new(
            tmp.path(),
            "generated",
            Arc::new(MonotonicIds::starting_after(floor)),
        )
        .unwrap();
        store.ensure_dirs().unwrap();

        let squatter = store.dir().join(format!("{}{}", floor + 1, ARTIFACT_EXTENSION));
        std::fs::write(&squatter, "already here").unwrap();

        let stored = store.write("fresh").await.unwrap();
        assert_eq!(stored.file_name, format!("{}{}", floor + 2, ARTIFACT_EXTENSION));
        assert_eq!(std::fs::read_to_string(&squatter).unwrap(), "already here");
    }

    struct FullDisk;

    impl AsyncWrite for FullDisk {
        fn poll_write(
            self: std::pin::Pin<&mut Self>,
            _: &mut std::task::Context<'_>,
            _: &[u8],
        ) -> std::task::Poll<std::io::Result<usize>> {
            std::task::Poll::Ready(Err(std::io::Error::other("no space left on device")))
        }

        fn poll_flush(
            self: std::pin::Pin<&mut Self>,
            _: &mut std::task::Context<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::task::Poll::Ready(Ok(()))
        }

        fn poll_shutdown(
            self: std::pin::Pin<&mut Self>,
            _: &mut std::task::Context<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::task::Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_failed_write_leaves_no_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("1.html");
        std::fs::write(&path, "").unwrap();

        let err = fill_or_discard(&path, FullDisk, "<html></html>").await.unwrap_err();
        assert_eq!(err.to_string(), "no space left on device");
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_missing_directory_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        assert!(store.write("x").await.is_err());
    }
}
