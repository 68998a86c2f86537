//! Core operations of hapkgutil.
//!
//! This crate ties the manifest parsers and the manifest sources together
//! into the `Engine`, which offers the two operations of the tool: generating
//! the filtered requirements and constraints files, and updating the
//! enabled/disabled selection files after the release integration list
//! changed. It also holds the reconciliation rules and the output emitter.

pub mod emit;
pub mod engine;
pub mod output;
pub mod reconcile;

pub use emit::{emit, requirements_for};
pub use engine::{
    Engine, GenerateOptions, GenerateResult, ReleaseManifests, UpdateOptions, UpdateResult,
};
pub use output::write_atomic;
pub use reconcile::{update, validate, SelectionReport, UpdateSummary, ValidationError};

use hapkg_remote::{ManifestKind, SourceError};
use hapkg_schema::ManifestError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("config error: {0}")]
    Config(String),
    #[error("source error: {0}")]
    Source(#[from] SourceError),
    #[error("manifest error: {kind} manifest: {source}")]
    Manifest {
        kind: ManifestKind,
        #[source]
        source: ManifestError,
    },
    #[error("selection error: {0}")]
    Validation(#[from] ValidationError),
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
