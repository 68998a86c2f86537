pub mod completions;
pub mod generate;
pub mod man_pages;
pub mod update;

use crate::ReleaseArgs;
use console::Style;
use hapkg_core::Engine;
use hapkg_remote::{DirSource, HttpSource, ManifestKind, ManifestSource, SourceConfig};
use hapkg_schema::{IntegrationId, PlatformPin};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_MANIFEST_ERROR: u8 = 2;
pub const EXIT_SELECTION_ERROR: u8 = 3;

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

pub fn spinner(msg: &str) -> Result<ProgressBar, String> {
    let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .map_err(|e| format!("progress template: {e}"))?
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
    let pb = ProgressBar::new_spinner();
    pb.set_style(style);
    pb.set_message(msg.to_owned());
    pb.enable_steady_tick(Duration::from_millis(80));
    Ok(pb)
}

fn finish(pb: &ProgressBar, msg: String) {
    if let Ok(style) = ProgressStyle::with_template("{msg}") {
        pb.set_style(style);
    }
    pb.finish_with_message(msg);
}

pub fn spin_ok(pb: &ProgressBar, msg: &str) {
    finish(pb, format!("✓ {msg}"));
}

pub fn spin_fail(pb: &ProgressBar, msg: &str) {
    finish(pb, format!("✗ {msg}"));
}

/// One line per integration, `+`/`-` prefixed and coloured.
pub fn format_changes(sign: char, ids: &[IntegrationId]) -> Vec<String> {
    let style = if sign == '+' {
        Style::new().yellow()
    } else {
        Style::new().red()
    };
    ids.iter()
        .map(|id| style.apply_to(format!("  {sign} {id}")).to_string())
        .collect()
}

pub fn make_engine(release: &ReleaseArgs, config_path: Option<&Path>) -> Result<Engine, String> {
    let mut config = match config_path {
        Some(path) => SourceConfig::load(path).map_err(|e| format!("config error: {e}"))?,
        None => SourceConfig::default(),
    };
    if let Some(url) = release.base_url.as_deref() {
        config = config.with_base_url(url);
    }

    let version = release.ha_version.trim();
    let source: Box<dyn ManifestSource> = match release.source_dir.as_deref() {
        Some(dir) => Box::new(DirSource::new(dir)),
        None => Box::new(HttpSource::new(&config, version)),
    };
    let pin = PlatformPin::new(config.platform_name, version);
    let engine = Engine::new(source, pin).map_err(|e| e.to_string())?;
    tracing::debug!(
        "integrations manifest: {}",
        engine.location(ManifestKind::Integrations)
    );
    Ok(engine)
}
