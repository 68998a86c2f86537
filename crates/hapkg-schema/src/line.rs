//! Classification of a single raw manifest line.

/// Marker that opens a new integration block in `requirements_all.txt`.
pub const INTEGRATION_MARKER: &str = "# homeassistant.";

/// Prefix of a commented-out dependency (platform specific packages).
pub const COMMENTED_DEPENDENCY: &str = "# ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    Comment,
    /// Integration name with the marker stripped, e.g. `components.zwave`.
    IntegrationMarker(&'a str),
    CommentedDependency(&'a str),
    Dependency(&'a str),
}

pub fn classify(raw: &str) -> LineKind<'_> {
    let line = raw.trim();
    if line.is_empty() {
        return LineKind::Blank;
    }
    if let Some(name) = line.strip_prefix(INTEGRATION_MARKER) {
        return LineKind::IntegrationMarker(name.trim());
    }
    if let Some(dep) = line.strip_prefix(COMMENTED_DEPENDENCY) {
        let dep = dep.trim();
        if dep.is_empty() {
            return LineKind::Comment;
        }
        return LineKind::CommentedDependency(dep);
    }
    if line.starts_with('#') {
        return LineKind::Comment;
    }
    LineKind::Dependency(line)
}
