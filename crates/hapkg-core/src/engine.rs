use crate::emit::{emit, requirements_for};
use crate::output::write_atomic;
use crate::reconcile::{update, validate, UpdateSummary};
use crate::CoreError;
use hapkg_remote::{ManifestKind, ManifestSource};
use hapkg_schema::{
    complement_of, parse_flat, parse_integrations, render_selection, Dependency, Integrations,
    ManifestError, PlatformPin, SelectedSet, SelectionFile, CONSTRAINTS_INCLUDE,
};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

/// Runs the generate and update operations against one platform release.
pub struct Engine {
    source: Box<dyn ManifestSource>,
    pin: PlatformPin,
}

/// The parsed manifests of a release.
#[derive(Debug, Clone)]
pub struct ReleaseManifests {
    pub constraints: Vec<Dependency>,
    pub requirements: Vec<Dependency>,
    pub integrations: Integrations,
}

#[derive(Debug, Clone, Copy)]
pub struct GenerateOptions<'a> {
    pub enabled: &'a Path,
    /// Without a disabled list every integration not enabled counts as disabled.
    pub disabled: Option<&'a Path>,
    pub output_requirements: &'a Path,
    pub output_constraints: &'a Path,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateResult {
    pub integrations: usize,
    pub enabled: usize,
    pub disabled: usize,
    pub requirements: usize,
    pub requirements_bytes: usize,
    pub constraints: usize,
    pub constraints_bytes: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct UpdateOptions<'a> {
    pub enabled: &'a Path,
    pub disabled: &'a Path,
    /// Compute the changes without rewriting the selection files.
    pub check: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateResult {
    pub summary: UpdateSummary,
    pub enabled: usize,
    pub disabled: usize,
    /// A selection file differs from its sorted, prefix stripped rendering.
    pub outdated: bool,
    pub written: bool,
}

impl Engine {
    pub fn new(source: Box<dyn ManifestSource>, pin: PlatformPin) -> Result<Self, CoreError> {
        if pin.version.trim().is_empty() {
            return Err(CoreError::Config("release version must not be empty".to_owned()));
        }
        if pin.name.trim().is_empty() {
            return Err(CoreError::Config("platform name must not be empty".to_owned()));
        }
        Ok(Self { source, pin })
    }

    pub fn pin(&self) -> &PlatformPin {
        &self.pin
    }

    /// Where the manifest of `kind` is read from.
    pub fn location(&self, kind: ManifestKind) -> String {
        self.source.location(kind)
    }

    fn fetch(&self, kind: ManifestKind) -> Result<Vec<u8>, CoreError> {
        debug!("loading {kind} manifest from {}", self.source.location(kind));
        Ok(self.source.fetch(kind)?)
    }

    /// Fetch and parse the three manifests of the release.
    pub fn load_release(&self) -> Result<ReleaseManifests, CoreError> {
        let kind = ManifestKind::CoreConstraints;
        let constraints =
            parse_flat(self.fetch(kind)?.as_slice(), None).map_err(manifest_err(kind))?;
        debug!("core constraints: {constraints:?}");
        info!("core constraints: {}", constraints.len());

        let kind = ManifestKind::CoreRequirements;
        let requirements = parse_flat(self.fetch(kind)?.as_slice(), Some(CONSTRAINTS_INCLUDE))
            .map_err(manifest_err(kind))?;
        debug!("core requirements: {requirements:?}");
        info!("core requirements: {}", requirements.len());

        let kind = ManifestKind::Integrations;
        let integrations =
            parse_integrations(self.fetch(kind)?.as_slice()).map_err(manifest_err(kind))?;
        info!("integrations: {}", integrations.len());

        Ok(ReleaseManifests {
            constraints,
            requirements,
            integrations,
        })
    }

    /// Write the constraints and the filtered requirements files.
    ///
    /// The selection must partition the release integrations; nothing is
    /// written otherwise.
    pub fn generate(&self, options: &GenerateOptions<'_>) -> Result<GenerateResult, CoreError> {
        let release = self.load_release()?;
        self.generate_from(&release, options)
    }

    pub fn generate_from(
        &self,
        release: &ReleaseManifests,
        options: &GenerateOptions<'_>,
    ) -> Result<GenerateResult, CoreError> {
        let enabled = load_selection(options.enabled)?;
        info!("enabled integrations: {}", enabled.len());
        let disabled = match options.disabled {
            Some(path) => load_selection(path)?,
            None => {
                let implied = complement_of(&release.integrations, &enabled);
                info!(
                    "no disabled integrations list, treating the remaining {} as disabled",
                    implied.len()
                );
                implied
            }
        };
        info!("disabled integrations: {}", disabled.len());

        validate(&release.integrations, &enabled, &disabled)?;

        let pin = self.pin.dependency();

        let mut buf = Vec::new();
        let constraints_bytes = emit(&mut buf, &release.constraints, &pin).map_err(|source| {
            CoreError::Write {
                path: options.output_constraints.to_path_buf(),
                source,
            }
        })?;
        write_atomic(options.output_constraints, &buf)?;
        info!(
            "wrote constraints to {}, {constraints_bytes} bytes",
            options.output_constraints.display()
        );

        let requirements = requirements_for(&release.requirements, &release.integrations, &enabled);
        let mut buf = Vec::new();
        let requirements_bytes = emit(&mut buf, &requirements, &pin).map_err(|source| {
            CoreError::Write {
                path: options.output_requirements.to_path_buf(),
                source,
            }
        })?;
        write_atomic(options.output_requirements, &buf)?;
        info!(
            "wrote requirements to {}, {requirements_bytes} bytes",
            options.output_requirements.display()
        );

        Ok(GenerateResult {
            integrations: release.integrations.len(),
            enabled: enabled.len(),
            disabled: disabled.len(),
            requirements: requirements.len() + 1,
            requirements_bytes,
            constraints: release.constraints.len() + 1,
            constraints_bytes,
        })
    }

    /// Bring the selection files in line with the release integrations.
    pub fn update(&self, options: &UpdateOptions<'_>) -> Result<UpdateResult, CoreError> {
        let release = self.load_release()?;
        self.update_from(&release, options)
    }

    pub fn update_from(
        &self,
        release: &ReleaseManifests,
        options: &UpdateOptions<'_>,
    ) -> Result<UpdateResult, CoreError> {
        let enabled_file = read_selection(options.enabled)?;
        let disabled_file = read_selection(options.disabled)?;
        let mut enabled = enabled_file.selected.clone();
        let mut disabled = disabled_file.selected.clone();
        info!(
            "before update: {} enabled, {} disabled",
            enabled.len(),
            disabled.len()
        );

        let summary = update(&release.integrations, &mut enabled, &mut disabled)?;
        validate(&release.integrations, &enabled, &disabled)?;
        info!(
            "after update: {} enabled, {} disabled",
            enabled.len(),
            disabled.len()
        );

        let outdated = !summary.is_empty()
            || !enabled_file.matches(&enabled)
            || !disabled_file.matches(&disabled);
        if outdated && summary.is_empty() {
            info!("selection files are not sorted or contain duplicate entries");
        }

        let written = !options.check && outdated;
        if written {
            write_selection(options.enabled, &enabled)?;
            write_selection(options.disabled, &disabled)?;
        }

        Ok(UpdateResult {
            summary,
            enabled: enabled.len(),
            disabled: disabled.len(),
            outdated,
            written,
        })
    }
}

fn manifest_err(kind: ManifestKind) -> impl Fn(ManifestError) -> CoreError {
    move |source| CoreError::Manifest { kind, source }
}

fn read_selection(path: &Path) -> Result<SelectionFile, CoreError> {
    let file = SelectionFile::read(path).map_err(|source| CoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("{}: {:?}", path.display(), file.selected);
    Ok(file)
}

fn load_selection(path: &Path) -> Result<SelectedSet, CoreError> {
    read_selection(path).map(|file| file.selected)
}

fn write_selection(path: &Path, selected: &SelectedSet) -> Result<(), CoreError> {
    let content = render_selection(selected);
    write_atomic(path, content.as_bytes())?;
    info!(
        "updated integrations file {}, wrote {} bytes",
        path.display(),
        content.len()
    );
    Ok(())
}
