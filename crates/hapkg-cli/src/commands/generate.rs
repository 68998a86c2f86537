use super::{json_pretty, spin_fail, spin_ok, spinner, EXIT_SUCCESS};
use hapkg_core::{Engine, GenerateOptions};

pub fn run(engine: &Engine, options: &GenerateOptions<'_>, json: bool) -> Result<u8, String> {
    let pb = if json {
        None
    } else {
        Some(spinner("loading release manifests...")?)
    };
    let release = match engine.load_release() {
        Ok(r) => {
            if let Some(ref pb) = pb {
                spin_ok(pb, "release manifests loaded");
            }
            r
        }
        Err(e) => {
            if let Some(ref pb) = pb {
                spin_fail(pb, "loading release manifests failed");
            }
            return Err(e.to_string());
        }
    };

    let result = engine
        .generate_from(&release, options)
        .map_err(|e| e.to_string())?;

    if json {
        let payload = serde_json::json!({
            "status": "generated",
            "version": engine.pin().version,
            "requirements_file": options.output_requirements,
            "constraints_file": options.output_constraints,
            "result": result,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!(
            "{} of {} integrations enabled",
            result.enabled, result.integrations
        );
        println!(
            "wrote {} requirements to {} ({} bytes)",
            result.requirements,
            options.output_requirements.display(),
            result.requirements_bytes
        );
        println!(
            "wrote {} constraints to {} ({} bytes)",
            result.constraints,
            options.output_constraints.display(),
            result.constraints_bytes
        );
    }
    Ok(EXIT_SUCCESS)
}
