use super::{format_changes, json_pretty, spin_fail, spin_ok, spinner, EXIT_SUCCESS};
use hapkg_core::{Engine, UpdateOptions};

pub fn run(engine: &Engine, options: &UpdateOptions<'_>, json: bool) -> Result<u8, String> {
    let pb = if json {
        None
    } else {
        Some(spinner("loading release manifests...")?)
    };
    let result = engine.update(options).map_err(|e| {
        if let Some(ref pb) = pb {
            spin_fail(pb, "update failed");
        }
        e.to_string()
    })?;
    if let Some(ref pb) = pb {
        spin_ok(pb, "integration lists reconciled");
    }

    let summary = &result.summary;
    if json {
        let status = if !result.outdated {
            "up-to-date"
        } else if result.written {
            "updated"
        } else {
            "outdated"
        };
        let payload = serde_json::json!({
            "status": status,
            "version": engine.pin().version,
            "result": result,
        });
        println!("{}", json_pretty(&payload)?);
    } else if !result.outdated {
        println!("integration lists are up to date");
    } else {
        if summary.is_empty() {
            println!("integration lists are not in sorted form");
        }
        let sections = [
            ("removed from enabled integrations", '-', &summary.removed_from_enabled),
            ("removed from disabled integrations", '-', &summary.removed_from_disabled),
            ("added to disabled integrations", '+', &summary.added_to_disabled),
        ];
        for (title, sign, ids) in sections {
            if ids.is_empty() {
                continue;
            }
            println!("{title}:");
            for line in format_changes(sign, ids) {
                println!("{line}");
            }
        }
        if result.written {
            println!(
                "updated {} ({} enabled) and {} ({} disabled)",
                options.enabled.display(),
                result.enabled,
                options.disabled.display(),
                result.disabled
            );
        }
    }

    if options.check && result.outdated {
        return Err("integration lists are out of date (run 'hapkgutil update')".to_owned());
    }
    Ok(EXIT_SUCCESS)
}
