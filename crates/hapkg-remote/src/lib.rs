//! Sources for the requirement manifests of a platform release.
//!
//! A release is read either over HTTP from the raw file host of the upstream
//! repository (one URL per manifest, built from the release version) or from
//! a local checkout of that repository.

pub mod config;
pub mod dir;
pub mod http;

pub use config::SourceConfig;
pub use dir::DirSource;
pub use http::HttpSource;

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to download from URL '{url}': {reason}")]
    Http { url: String, reason: String },
    #[error("failed while downloading from URL '{url}', status code: {status}, body: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("source config error: {0}")]
    Config(String),
}

/// The three manifests every release carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifestKind {
    CoreConstraints,
    CoreRequirements,
    Integrations,
}

impl ManifestKind {
    /// Location of the manifest relative to the repository root.
    pub fn relative_path(self) -> &'static str {
        match self {
            ManifestKind::CoreConstraints => "homeassistant/package_constraints.txt",
            ManifestKind::CoreRequirements => "requirements.txt",
            ManifestKind::Integrations => "requirements_all.txt",
        }
    }
}

impl fmt::Display for ManifestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ManifestKind::CoreConstraints => "core constraints",
            ManifestKind::CoreRequirements => "core requirements",
            ManifestKind::Integrations => "integrations",
        })
    }
}

/// Byte source for release manifests.
pub trait ManifestSource {
    /// Read the whole manifest. Partial content is never returned.
    fn fetch(&self, kind: ManifestKind) -> Result<Vec<u8>, SourceError>;

    /// Human readable location (URL or path) used in logs.
    fn location(&self, kind: ManifestKind) -> String;
}
