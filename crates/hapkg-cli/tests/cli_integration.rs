//! CLI subprocess integration tests.
//!
//! These tests invoke the `hapkgutil` binary against a local checkout layout
//! (`--source-dir`) and verify exit codes, written files, and JSON output.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn hapkgutil_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_hapkgutil"));
    cmd.env_remove("HAPKG_LOG");
    cmd
}

const CONSTRAINTS: &str = "\
# Automatically generated by gen_requirements_all.py, do not edit

aiohttp==3.9.1
yarl==1.9.4
";

const REQUIREMENTS: &str = "\
# Home Assistant Core
-c homeassistant/package_constraints.txt

aiohttp==3.9.1
PyJWT==2.8.0
";

const REQUIREMENTS_ALL: &str = "\
# Home Assistant Core, full manifest
-r requirements.txt

# homeassistant.components.dhcp
# homeassistant.components.network
ifaddr==0.2.0

# homeassistant.components.zwave_js
zwave-js-server-python==0.55.3

# homeassistant.components.bluetooth_tracker
# pybluez==0.22
";

struct Project {
    dir: tempfile::TempDir,
}

impl Project {
    fn new() -> Self {
        Self::with_integrations(REQUIREMENTS_ALL)
    }

    fn with_integrations(requirements_all: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let core = dir.path().join("core");
        std::fs::create_dir_all(core.join("homeassistant")).unwrap();
        std::fs::write(core.join("homeassistant/package_constraints.txt"), CONSTRAINTS).unwrap();
        std::fs::write(core.join("requirements.txt"), REQUIREMENTS).unwrap();
        std::fs::write(core.join("requirements_all.txt"), requirements_all).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.path(name)).unwrap()
    }

    fn source_dir(&self) -> String {
        self.path("core").to_string_lossy().into_owned()
    }

    fn generate(&self, extra: &[&str]) -> Output {
        let mut args = vec![
            "generate".to_owned(),
            "--ha-version".to_owned(),
            "2024.1.0".to_owned(),
            "--source-dir".to_owned(),
            self.source_dir(),
            "--enabled-integrations".to_owned(),
            path_arg(&self.path("enabled.txt")),
            "--output-requirements".to_owned(),
            path_arg(&self.path("requirements.txt")),
            "--output-constraints".to_owned(),
            path_arg(&self.path("constraints.txt")),
        ];
        args.extend(extra.iter().map(|s| (*s).to_owned()));
        hapkgutil_bin().args(&args).output().unwrap()
    }

    fn update(&self, extra: &[&str]) -> Output {
        let mut args = vec![
            "update".to_owned(),
            "--ha-version".to_owned(),
            "2024.1.0".to_owned(),
            "--source-dir".to_owned(),
            self.source_dir(),
            "--enabled-integrations".to_owned(),
            path_arg(&self.path("enabled.txt")),
            "--disabled-integrations".to_owned(),
            path_arg(&self.path("disabled.txt")),
        ];
        args.extend(extra.iter().map(|s| (*s).to_owned()));
        hapkgutil_bin().args(&args).output().unwrap()
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn cli_version_exits_zero() {
    let output = hapkgutil_bin().arg("--version").output().unwrap();
    assert!(output.status.success(), "hapkgutil --version must exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("hapkgutil"), "version output: {stdout}");
}

#[test]
fn cli_help_lists_modes() {
    let output = hapkgutil_bin().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("generate"), "help must list 'generate'");
    assert!(stdout.contains("update"), "help must list 'update'");
}

#[test]
fn cli_without_mode_fails_before_io() {
    let output = hapkgutil_bin().output().unwrap();
    assert!(!output.status.success(), "a mode is required");
}

#[test]
fn cli_generate_requires_output_paths() {
    let project = Project::new();
    project.write("enabled.txt", "dhcp\n");
    let output = hapkgutil_bin()
        .args([
            "generate",
            "--ha-version",
            "2024.1.0",
            "--source-dir",
            &project.source_dir(),
            "--enabled-integrations",
            &path_arg(&project.path("enabled.txt")),
        ])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(stderr(&output).contains("--output-requirements"));
}

#[test]
fn cli_source_dir_conflicts_with_base_url() {
    let project = Project::new();
    project.write("enabled.txt", "dhcp\n");
    let output = project.generate(&["--base-url", "http://127.0.0.1:1"]);
    assert!(!output.status.success());
    assert!(!project.path("requirements.txt").exists());
}

#[test]
fn cli_empty_version_is_config_error() {
    let project = Project::new();
    project.write("enabled.txt", "dhcp\n");
    let output = hapkgutil_bin()
        .args([
            "generate",
            "--ha-version",
            "",
            "--source-dir",
            &project.source_dir(),
            "--enabled-integrations",
            &path_arg(&project.path("enabled.txt")),
            "--output-requirements",
            &path_arg(&project.path("requirements.txt")),
            "--output-constraints",
            &path_arg(&project.path("constraints.txt")),
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("config error"));
}

#[test]
fn cli_generate_writes_requirements_and_constraints() {
    let project = Project::new();
    project.write("enabled.txt", "# keep these\ndhcp\n");
    project.write("disabled.txt", "network\nzwave_js\nbluetooth_tracker\n");

    let disabled = path_arg(&project.path("disabled.txt"));
    let output = project.generate(&["--disabled-integrations", &disabled]);
    assert!(
        output.status.success(),
        "generate must exit 0. stderr: {}",
        stderr(&output)
    );
    assert_eq!(
        project.read("requirements.txt"),
        "PyJWT==2.8.0\naiohttp==3.9.1\nhomeassistant==2024.1.0\nifaddr==0.2.0\n"
    );
    assert_eq!(
        project.read("constraints.txt"),
        "aiohttp==3.9.1\nhomeassistant==2024.1.0\nyarl==1.9.4\n"
    );
}

#[test]
fn cli_generate_json_summary() {
    let project = Project::new();
    project.write("enabled.txt", "zwave_js\nbluetooth_tracker\n");

    let output = project.generate(&["--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("generate --json must produce valid JSON: {e}\n{stdout}"));
    assert_eq!(json["status"], "generated");
    assert_eq!(json["result"]["enabled"], 2);
    assert_eq!(json["result"]["disabled"], 2);
    assert!(project.read("requirements.txt").contains("pybluez==0.22\n"));
}

#[test]
fn cli_generate_unknown_integration_is_selection_error() {
    let project = Project::new();
    project.write("enabled.txt", "dhcp\nnot_a_real_integration\n");

    let output = project.generate(&[]);
    assert_eq!(output.status.code(), Some(3), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("components.not_a_real_integration"));
    assert!(!project.path("requirements.txt").exists());
}

#[test]
fn cli_generate_malformed_manifest_is_manifest_error() {
    let project = Project::with_integrations(
        "-r requirements.txt\n# homeassistant.components.dhcp\n\nifaddr==0.2.0\n",
    );
    project.write("enabled.txt", "dhcp\n");

    let output = project.generate(&[]);
    assert_eq!(output.status.code(), Some(2), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("components.dhcp"));
}

#[test]
fn cli_generate_missing_source_dir_fails() {
    let project = Project::new();
    project.write("enabled.txt", "dhcp\n");
    std::fs::remove_dir_all(project.path("core")).unwrap();

    let output = project.generate(&[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("package_constraints.txt"));
}

#[test]
fn cli_update_rewrites_lists_then_is_idempotent() {
    let project = Project::new();
    project.write("enabled.txt", "dhcp\nretired_integration\n");
    project.write("disabled.txt", "network\n");

    let first = project.update(&[]);
    assert!(first.status.success(), "stderr: {}", stderr(&first));
    assert_eq!(project.read("enabled.txt"), "dhcp\n");
    assert_eq!(
        project.read("disabled.txt"),
        "bluetooth_tracker\nnetwork\nzwave_js\n"
    );

    let second = project.update(&["--check"]);
    assert!(
        second.status.success(),
        "second run must find nothing to change. stderr: {}",
        stderr(&second)
    );

    let disabled = path_arg(&project.path("disabled.txt"));
    let generate = project.generate(&["--disabled-integrations", &disabled]);
    assert!(generate.status.success(), "stderr: {}", stderr(&generate));
}

#[test]
fn cli_update_check_fails_when_outdated() {
    let project = Project::new();
    project.write("enabled.txt", "dhcp\n");
    project.write("disabled.txt", "network\n");

    let output = project.update(&["--check", "--json"]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["status"], "outdated");
    assert_eq!(json["result"]["summary"]["added_to_disabled"][0], "components.bluetooth_tracker");
    assert_eq!(project.read("disabled.txt"), "network\n");
}

#[test]
fn cli_update_sorts_valid_lists() {
    let project = Project::new();
    project.write("enabled.txt", "zwave_js\ndhcp\n");
    project.write("disabled.txt", "network\nbluetooth_tracker\n");

    let check = project.update(&["--check", "--json"]);
    assert_eq!(check.status.code(), Some(1));
    let json: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&check.stdout)).unwrap();
    assert_eq!(json["status"], "outdated");
    assert_eq!(project.read("enabled.txt"), "zwave_js\ndhcp\n");

    let output = project.update(&[]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(project.read("enabled.txt"), "dhcp\nzwave_js\n");
    assert_eq!(project.read("disabled.txt"), "bluetooth_tracker\nnetwork\n");
}

#[test]
fn cli_update_overlap_is_selection_error() {
    let project = Project::new();
    project.write("enabled.txt", "dhcp\n");
    project.write("disabled.txt", "dhcp\nnetwork\n");

    let output = project.update(&[]);
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("both enabled and disabled"));
    assert_eq!(project.read("disabled.txt"), "dhcp\nnetwork\n");
}

#[test]
fn cli_man_pages_written() {
    let project = Project::new();
    let dir = project.path("man");
    let output = hapkgutil_bin()
        .args(["man-pages", &path_arg(&dir)])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(dir.join("hapkgutil.1").exists());
    assert!(dir.join("hapkgutil-generate.1").exists());
}

#[test]
fn cli_completions_for_bash() {
    let output = hapkgutil_bin().args(["completions", "bash"]).output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("hapkgutil"));
}
