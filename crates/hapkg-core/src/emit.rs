use hapkg_schema::{Dependency, Integrations, SelectedSet};
use std::io::{self, BufWriter, Write};

/// Write `deps` plus the platform `pin`, sorted, one per line.
///
/// Duplicates are written as many times as they occur. Returns the number of
/// bytes written.
pub fn emit(writer: impl Write, deps: &[Dependency], pin: &Dependency) -> io::Result<usize> {
    let mut rows: Vec<&str> = deps.iter().map(Dependency::as_str).collect();
    rows.push(pin.as_str());
    rows.sort_unstable();

    let mut w = BufWriter::new(writer);
    let mut count = 0;
    for row in rows {
        w.write_all(row.as_bytes())?;
        w.write_all(b"\n")?;
        count += row.len() + 1;
    }
    w.flush()?;
    Ok(count)
}

/// Core requirements followed by the dependencies of every enabled integration.
pub fn requirements_for(
    core: &[Dependency],
    integrations: &Integrations,
    enabled: &SelectedSet,
) -> Vec<Dependency> {
    let mut deps = core.to_vec();
    for (id, integration_deps) in integrations {
        if enabled.contains(id) {
            deps.extend(integration_deps.iter().cloned());
        }
    }
    deps
}
