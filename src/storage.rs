use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// StorageError
///
/// Failures of the file persistence layer. Upload handlers log the cause and
/// answer with a generic server error.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage write failed: {0}")]
    Write(#[from] std::io::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// StorageService
///
/// Abstract contract for persisting uploaded files. The trait allows swapping
/// the real local-disk implementation for the in-memory mock during testing
/// without affecting the calling handlers.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Ensures the backing location exists. Called once at startup; a no-op
    /// when the upload directory is already there.
    async fn ensure_ready(&self);

    /// Persists `bytes` under `filename`. Callers derive filenames from fresh
    /// UUIDs, so a save never overwrites an existing file and concurrent
    /// uploads never collide.
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<(), StorageError>;
}

/// The concrete type used to share the storage service across the application state.
pub type StorageState = Arc<dyn StorageService>;

/// sanitize_filename
///
/// Collapses a client-influenced name to a single path segment, dropping
/// directory navigation components so a crafted filename cannot escape the
/// upload directory.
fn sanitize_filename(name: &str) -> String {
    name.split(['/', '\\'])
        .filter(|segment| !segment.is_empty() && *segment != ".." && *segment != ".")
        .next_back()
        .unwrap_or("file")
        .to_string()
}

// --- The Real Implementation (Local Disk) ---

/// LocalStorageService
///
/// Writes uploads into the configured directory, from where they are served
/// back at the `/api/uploads` static mount.
#[derive(Clone)]
pub struct LocalStorageService {
    root: PathBuf,
}

impl LocalStorageService {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl StorageService for LocalStorageService {
    async fn ensure_ready(&self) {
        if let Err(e) = tokio::fs::create_dir_all(&self.root).await {
            tracing::error!("Failed to create upload directory {:?}: {:?}", self.root, e);
        }
    }

    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let path = self.root.join(sanitize_filename(filename));
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!(file = %path.display(), size = bytes.len(), "Stored upload");
        Ok(())
    }
}

// --- The Mock Implementation (For Tests) ---

/// MockStorageService
///
/// Records saved filenames instead of touching the disk, and can simulate a
/// failing backend. Used exclusively by tests.
#[derive(Default)]
pub struct MockStorageService {
    /// When true, every save returns a simulated failure.
    pub should_fail: bool,
    /// Filenames passed to `save`, for assertions.
    pub saved: Mutex<Vec<String>>,
}

impl MockStorageService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            saved: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn ensure_ready(&self) {
        // No-op in mock environment.
    }

    async fn save(&self, filename: &str, _bytes: &[u8]) -> Result<(), StorageError> {
        if self.should_fail {
            return Err(StorageError::Unavailable(
                "simulated storage failure".to_string(),
            ));
        }
        if let Ok(mut saved) = self.saved.lock() {
            saved.push(sanitize_filename(filename));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_traversal_components() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("photo.jpg"), "photo.jpg");
        assert_eq!(sanitize_filename("a/b/./c.png"), "c.png");
        assert_eq!(sanitize_filename(".."), "file");
    }

    #[tokio::test]
    async fn local_storage_writes_inside_its_root() {
        let dir = tempfile::tempdir().unwrap();
        let service = LocalStorageService::new(dir.path());
        service.ensure_ready().await;

        service.save("pic.jpg", b"abc").await.unwrap();
        assert_eq!(std::fs::read(dir.path().join("pic.jpg")).unwrap(), b"abc");

        // A traversal-shaped name still lands inside the root.
        service.save("../escape.jpg", b"x").await.unwrap();
        assert!(dir.path().join("escape.jpg").exists());
        assert!(!dir.path().parent().unwrap().join("escape.jpg").exists());
    }
}
