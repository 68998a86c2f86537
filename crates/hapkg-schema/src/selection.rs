//! User maintained lists of enabled or disabled integrations.

use crate::types::{IntegrationId, Integrations};
use std::collections::BTreeSet;
use std::fs;
use std::io::BufRead;
use std::path::Path;

/// Prefix added to short entries such as `zwave`.
pub const COMPONENT_PREFIX: &str = "components.";

pub type SelectedSet = BTreeSet<IntegrationId>;

/// Map a selection file entry to the identifier used in the manifests.
pub fn normalize_entry(entry: &str) -> IntegrationId {
    if entry.contains('.') {
        IntegrationId::new(entry)
    } else {
        IntegrationId::new(format!("{COMPONENT_PREFIX}{entry}"))
    }
}

pub fn parse_selection(reader: impl BufRead) -> std::io::Result<SelectedSet> {
    let mut selected = SelectedSet::new();
    for line in reader.lines() {
        let line = line?;
        let entry = line.trim();
        if entry.is_empty() || entry.starts_with("# ") {
            continue;
        }
        selected.insert(normalize_entry(entry));
    }
    Ok(selected)
}

/// A selection file as read from disk.
#[derive(Debug, Clone)]
pub struct SelectionFile {
    pub selected: SelectedSet,
    /// Raw content, compared against the rendering before rewriting.
    pub content: String,
}

impl SelectionFile {
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let content = fs::read_to_string(path)?;
        let selected = parse_selection(content.as_bytes())?;
        Ok(Self { selected, content })
    }

    /// True when `selected` renders to exactly the current content.
    pub fn matches(&self, selected: &SelectedSet) -> bool {
        render_selection(selected) == self.content
    }
}

/// Render a set back into the selection file layout: sorted, one entry per
/// line, with the component prefix stripped.
pub fn render_selection(selected: &SelectedSet) -> String {
    let mut entries: Vec<&str> = selected
        .iter()
        .map(|id| {
            let id = id.as_str();
            id.strip_prefix(COMPONENT_PREFIX).unwrap_or(id)
        })
        .collect();
    entries.sort_unstable();

    let mut out = String::new();
    for entry in entries {
        out.push_str(entry);
        out.push('\n');
    }
    out
}

/// Every integration of the release that is not in `enabled`.
pub fn complement_of(universe: &Integrations, enabled: &SelectedSet) -> SelectedSet {
    universe
        .keys()
        .filter(|id| !enabled.contains(*id))
        .cloned()
        .collect()
}
