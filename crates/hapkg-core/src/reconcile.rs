//! Rules tying the enabled and disabled selection sets to the integrations
//! of a release.
//!
//! The two sets must partition the release integrations: every integration
//! is in exactly one of them, and neither names an unknown integration.

use hapkg_schema::{IntegrationId, Integrations, SelectedSet};
use serde::Serialize;
use std::fmt::Write;
use thiserror::Error;
use tracing::info;

fn format_ids(ids: &[IntegrationId]) -> String {
    let mut out = String::from("[");
    for (i, id) in ids.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{id}");
    }
    out.push(']');
    out
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error(
        "integrations {} are specified in both enabled and disabled integrations lists",
        format_ids(.0)
    )]
    Overlap(Vec<IntegrationId>),
    #[error(
        "cannot find the specified enabled integrations {} in the full list of integrations",
        format_ids(.0)
    )]
    UnknownEnabled(Vec<IntegrationId>),
    #[error(
        "cannot find the specified disabled integrations {} in the full list of integrations",
        format_ids(.0)
    )]
    UnknownDisabled(Vec<IntegrationId>),
    #[error(
        "integrations {} found in the full integrations list are not part of either enabled or disabled integrations lists",
        format_ids(.0)
    )]
    Unassigned(Vec<IntegrationId>),
}

/// Every way the selection sets currently fail to partition the release.
/// All lists are sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionReport {
    pub unknown_enabled: Vec<IntegrationId>,
    pub unknown_disabled: Vec<IntegrationId>,
    pub overlap: Vec<IntegrationId>,
    pub unassigned: Vec<IntegrationId>,
}

impl SelectionReport {
    pub fn diagnose(
        universe: &Integrations,
        enabled: &SelectedSet,
        disabled: &SelectedSet,
    ) -> Self {
        // BTreeSet/BTreeMap iteration keeps every list sorted.
        let unknown = |set: &SelectedSet| -> Vec<IntegrationId> {
            set.iter()
                .filter(|id| !universe.contains_key(*id))
                .cloned()
                .collect()
        };
        Self {
            unknown_enabled: unknown(enabled),
            unknown_disabled: unknown(disabled),
            overlap: enabled.intersection(disabled).cloned().collect(),
            unassigned: universe
                .keys()
                .filter(|id| !enabled.contains(*id) && !disabled.contains(*id))
                .cloned()
                .collect(),
        }
    }

    /// First failing rule. Overlap is checked first so a conflict between
    /// the two files is reported whatever else is wrong.
    pub fn into_result(self) -> Result<(), ValidationError> {
        if !self.overlap.is_empty() {
            return Err(ValidationError::Overlap(self.overlap));
        }
        if !self.unknown_enabled.is_empty() {
            return Err(ValidationError::UnknownEnabled(self.unknown_enabled));
        }
        if !self.unknown_disabled.is_empty() {
            return Err(ValidationError::UnknownDisabled(self.unknown_disabled));
        }
        if !self.unassigned.is_empty() {
            return Err(ValidationError::Unassigned(self.unassigned));
        }
        Ok(())
    }
}

pub fn validate(
    universe: &Integrations,
    enabled: &SelectedSet,
    disabled: &SelectedSet,
) -> Result<(), ValidationError> {
    SelectionReport::diagnose(universe, enabled, disabled).into_result()
}

/// Changes applied by [`update`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateSummary {
    pub removed_from_enabled: Vec<IntegrationId>,
    pub removed_from_disabled: Vec<IntegrationId>,
    pub added_to_disabled: Vec<IntegrationId>,
}

impl UpdateSummary {
    pub fn is_empty(&self) -> bool {
        self.removed_from_enabled.is_empty()
            && self.removed_from_disabled.is_empty()
            && self.added_to_disabled.is_empty()
    }
}

/// Repair the selection sets in place.
///
/// Unknown entries are dropped from both sets and integrations missing from
/// both are added to `disabled`, so newly released integrations stay off
/// until someone enables them. An entry present in both sets is an error;
/// nothing is modified in that case.
pub fn update(
    universe: &Integrations,
    enabled: &mut SelectedSet,
    disabled: &mut SelectedSet,
) -> Result<UpdateSummary, ValidationError> {
    let report = SelectionReport::diagnose(universe, enabled, disabled);
    if !report.overlap.is_empty() {
        return Err(ValidationError::Overlap(report.overlap));
    }

    for id in &report.unknown_enabled {
        enabled.remove(id);
    }
    for id in &report.unknown_disabled {
        disabled.remove(id);
    }
    disabled.extend(report.unassigned.iter().cloned());

    info!(
        "removed from enabled integrations: {}",
        format_ids(&report.unknown_enabled)
    );
    info!(
        "removed from disabled integrations: {}",
        format_ids(&report.unknown_disabled)
    );
    info!(
        "added to disabled integrations: {}",
        format_ids(&report.unassigned)
    );

    Ok(UpdateSummary {
        removed_from_enabled: report.unknown_enabled,
        removed_from_disabled: report.unknown_disabled,
        added_to_disabled: report.unassigned,
    })
}
