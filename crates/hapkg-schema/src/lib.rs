//! Manifest parsing and integration selection lists for hapkgutil.
//!
//! This crate defines the text formats: the line classifier shared by all
//! manifests, the flat and integration keyed manifest parsers, and the
//! selection files listing enabled or disabled integrations.

pub mod line;
pub mod manifest;
pub mod selection;
pub mod types;

pub use line::{classify, LineKind};
pub use manifest::{
    parse_flat, parse_integrations, ManifestError, CONSTRAINTS_INCLUDE, REQUIREMENTS_INCLUDE,
};
pub use selection::{
    complement_of, normalize_entry, parse_selection, render_selection, SelectedSet, SelectionFile,
    COMPONENT_PREFIX,
};
pub use types::{Dependency, IntegrationId, Integrations, PlatformPin};
