use crate::{ManifestKind, ManifestSource, SourceError};
use std::path::PathBuf;
use tracing::debug;

/// Reads the manifests from a local checkout of the upstream repository.
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path(&self, kind: ManifestKind) -> PathBuf {
        self.root.join(kind.relative_path())
    }
}

impl ManifestSource for DirSource {
    fn fetch(&self, kind: ManifestKind) -> Result<Vec<u8>, SourceError> {
        let path = self.path(kind);
        debug!("reading {}", path.display());
        std::fs::read(&path).map_err(|source| SourceError::Io { path, source })
    }

    fn location(&self, kind: ManifestKind) -> String {
        self.path(kind).display().to_string()
    }
}
