//! Parsers for the requirement manifests shipped with a platform release.
//!
//! Two shapes exist: a flat list (core requirements and constraints) and the
//! integration keyed list (`requirements_all.txt`), where each run of
//! `# homeassistant.<integration>` markers is followed by the dependencies
//! shared by every integration in that run.

use crate::line::{classify, LineKind};
use crate::types::{Dependency, IntegrationId, Integrations};
use std::io::BufRead;
use thiserror::Error;
use tracing::debug;

/// First content line of `requirements.txt`.
pub const CONSTRAINTS_INCLUDE: &str = "-c homeassistant/package_constraints.txt";

/// First content line of `requirements_all.txt`.
pub const REQUIREMENTS_INCLUDE: &str = "-r requirements.txt";

const END_OF_INPUT: &str = "<end of input>";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest: {0}")]
    Io(#[from] std::io::Error),
    #[error("first line must contain '{expected}', found '{found}' instead")]
    Format { expected: String, found: String },
    #[error(
        "blank line {line} inside the integration block of [{}] before any dependency",
        pending.join(", ")
    )]
    BlankLineInBatch { line: usize, pending: Vec<String> },
    #[error("integration marker on line {line} has no integration name")]
    EmptyIntegrationName { line: usize },
}

/// Parse a flat requirements or constraints list.
///
/// With a `sentinel`, the first content line must match it and is not
/// returned as a dependency. The result is sorted; duplicates are kept.
pub fn parse_flat(
    reader: impl BufRead,
    sentinel: Option<&str>,
) -> Result<Vec<Dependency>, ManifestError> {
    let mut deps = Vec::new();
    let mut sentinel = sentinel;

    for line in reader.lines() {
        let line = line?;
        let LineKind::Dependency(dep) = classify(&line) else {
            continue;
        };
        if let Some(expected) = sentinel.take() {
            if dep != expected {
                return Err(ManifestError::Format {
                    expected: expected.to_owned(),
                    found: dep.to_owned(),
                });
            }
            continue;
        }
        deps.push(Dependency::new(dep));
    }

    if let Some(expected) = sentinel {
        return Err(ManifestError::Format {
            expected: expected.to_owned(),
            found: END_OF_INPUT.to_owned(),
        });
    }

    deps.sort();
    Ok(deps)
}

#[derive(Debug, Default)]
struct Batch {
    names: Vec<IntegrationId>,
    has_deps: bool,
}

impl Batch {
    fn is_pending(&self) -> bool {
        !self.names.is_empty() && !self.has_deps
    }

    fn reset(&mut self) {
        self.names.clear();
        self.has_deps = false;
    }
}

/// Parse `requirements_all.txt` into the per-integration dependency map.
///
/// The parser is single pass and keeps only the current marker batch. A
/// blank line between a batch's markers and its first dependency means the
/// manifest does not follow the expected layout and is rejected.
pub fn parse_integrations(reader: impl BufRead) -> Result<Integrations, ManifestError> {
    let mut lines = reader.lines().enumerate();

    let mut header = None;
    for (_, line) in lines.by_ref() {
        let line = line?;
        if let LineKind::Dependency(first) = classify(&line) {
            header = Some(first.to_owned());
            break;
        }
    }
    match header {
        Some(ref first) if first == REQUIREMENTS_INCLUDE => {}
        other => {
            return Err(ManifestError::Format {
                expected: REQUIREMENTS_INCLUDE.to_owned(),
                found: other.unwrap_or_else(|| END_OF_INPUT.to_owned()),
            });
        }
    }

    let mut integrations = Integrations::new();
    let mut batch = Batch::default();

    for (idx, line) in lines {
        let line = line?;
        match classify(&line) {
            LineKind::Blank => {
                if batch.is_pending() {
                    return Err(ManifestError::BlankLineInBatch {
                        line: idx + 1,
                        pending: batch.names.iter().map(ToString::to_string).collect(),
                    });
                }
                batch.reset();
            }
            LineKind::Comment => {}
            LineKind::IntegrationMarker("") => {
                return Err(ManifestError::EmptyIntegrationName { line: idx + 1 });
            }
            LineKind::IntegrationMarker(name) => {
                if batch.has_deps {
                    batch.reset();
                }
                batch.names.push(IntegrationId::new(name));
            }
            LineKind::Dependency(dep) | LineKind::CommentedDependency(dep) => {
                if batch.names.is_empty() {
                    debug!("line {}: '{dep}' belongs to no integration, skipping", idx + 1);
                    continue;
                }
                for name in &batch.names {
                    integrations
                        .entry(name.clone())
                        .or_default()
                        .push(Dependency::new(dep));
                }
                batch.has_deps = true;
            }
        }
    }

    for deps in integrations.values_mut() {
        deps.sort();
    }
    Ok(integrations)
}
