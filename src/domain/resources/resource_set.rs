use std::io;
use std::path::PathBuf;
use uuid::Uuid;

/// Role an artifact plays in a single generate request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    RawUpload,
    NormalizedSample,
    SynthesisOutput,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::RawUpload => "raw",
            ArtifactKind::NormalizedSample => "normalized",
            ArtifactKind::SynthesisOutput => "output",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A file written to temporary storage while handling one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporaryArtifact {
    pub path: PathBuf,
    pub kind: ArtifactKind,
}

/// Every temporary file created for one request.
///
/// Artifacts are deleted in tracking order by [`ResourceSet::release_all`].
/// Dropping the set releases whatever is still tracked, so an early return,
/// a panic or a dropped response body all end in the same sweep.
///
/// Nothing here returns an error: a file that cannot be removed is logged
/// and the sweep moves on to the next one.
#[derive(Debug)]
pub struct ResourceSet {
    dir: PathBuf,
    artifacts: Vec<TemporaryArtifact>,
}

impl ResourceSet {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            artifacts: Vec::new(),
        }
    }

    /// Register a path for later release.
    ///
    /// A path already tracked is not added twice.
    pub fn track(&mut self, path: impl Into<PathBuf>, kind: ArtifactKind) {
        let path = path.into();
        if self.artifacts.iter().any(|a| a.path == path) {
            return;
        }
        tracing::debug!(path = %path.display(), kind = %kind, "Tracking temporary artifact");
        self.artifacts.push(TemporaryArtifact { path, kind });
    }

    /// Reserve a unique path in the temporary directory and track it.
    ///
    /// Nothing is written; the caller materializes the file.
    pub fn allocate(&mut self, kind: ArtifactKind, extension: &str) -> PathBuf {
        let path = self.dir.join(format!(
            "voice-clone-{}-{}.{}",
            kind.as_str(),
            Uuid::new_v4(),
            extension
        ));
        self.track(path.clone(), kind);
        path
    }

    pub fn artifacts(&self) -> &[TemporaryArtifact] {
        &self.artifacts
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Delete every tracked artifact, oldest first.
    ///
    /// Missing files count as released. Calling this again after a sweep is
    /// a no-op. Blocks on the filesystem; async callers use
    /// [`ResourceSet::release`].
    pub fn release_all(&mut self) {
        remove_artifacts(std::mem::take(&mut self.artifacts));
    }

    /// Same sweep as [`ResourceSet::release_all`], run on the blocking pool.
    pub async fn release(&mut self) {
        let artifacts = std::mem::take(&mut self.artifacts);
        if artifacts.is_empty() {
            return;
        }

        if let Err(e) = tokio::task::spawn_blocking(move || remove_artifacts(artifacts)).await {
            tracing::warn!(error = %e, "Temporary artifact sweep did not complete");
        }
    }
}

fn remove_artifacts(artifacts: Vec<TemporaryArtifact>) {
    if artifacts.is_empty() {
        return;
    }

    let mut removed = 0usize;
    let mut failed = 0usize;

    for artifact in artifacts {
        match std::fs::remove_file(&artifact.path) {
            Ok(()) => removed += 1,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                failed += 1;
                tracing::warn!(
                    error = %e,
                    path = %artifact.path.display(),
                    kind = %artifact.kind,
                    "Failed to remove temporary artifact"
                );
            }
        }
    }

    tracing::debug!(removed, failed, "Temporary artifacts released");
}

impl Drop for ResourceSet {
    fn drop(&mut self) {
        self.release_all();
    }
}
