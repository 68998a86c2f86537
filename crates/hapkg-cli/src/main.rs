mod commands;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use commands::{EXIT_FAILURE, EXIT_MANIFEST_ERROR, EXIT_SELECTION_ERROR};
use hapkg_core::{GenerateOptions, UpdateOptions};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "hapkgutil",
    version,
    about = "Generate Home Assistant requirements and constraints for a subset of integrations"
)]
struct Cli {
    /// JSON file configuring the manifest source (base_url, timeout_secs, platform_name).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where the release manifests come from.
#[derive(Debug, Args)]
struct ReleaseArgs {
    /// Home Assistant release version, e.g. 2024.1.0.
    #[arg(long)]
    ha_version: String,
    /// Read the manifests from a local checkout of the core repository.
    #[arg(long, conflicts_with = "base_url")]
    source_dir: Option<PathBuf>,
    /// Raw file host to download the manifests from (overrides config file).
    #[arg(long)]
    base_url: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Write requirements and constraints files for the enabled integrations.
    Generate {
        #[command(flatten)]
        release: ReleaseArgs,
        /// Integrations to enable among the full list of integrations.
        #[arg(long)]
        enabled_integrations: PathBuf,
        /// Integrations explicitly disabled; defaults to every integration not enabled.
        #[arg(long)]
        disabled_integrations: Option<PathBuf>,
        /// Output requirements file.
        #[arg(long)]
        output_requirements: PathBuf,
        /// Output constraints file.
        #[arg(long)]
        output_constraints: PathBuf,
    },
    /// Update the enabled/disabled integration lists to match a release.
    Update {
        #[command(flatten)]
        release: ReleaseArgs,
        /// Enabled integrations file, rewritten in place.
        #[arg(long)]
        enabled_integrations: PathBuf,
        /// Disabled integrations file, rewritten in place.
        #[arg(long)]
        disabled_integrations: PathBuf,
        /// Exit non-zero if the lists are out of date instead of rewriting them.
        #[arg(long, default_value_t = false)]
        check: bool,
    },
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
    /// Generate man pages in the specified directory.
    ManPages {
        /// Output directory for man pages.
        #[arg(default_value = "man")]
        dir: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("HAPKG_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!("hapkgutil {}", env!("CARGO_PKG_VERSION"));

    let json_output = cli.json;
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Generate {
            release,
            enabled_integrations,
            disabled_integrations,
            output_requirements,
            output_constraints,
        } => commands::make_engine(&release, config).and_then(|engine| {
            commands::generate::run(
                &engine,
                &GenerateOptions {
                    enabled: &enabled_integrations,
                    disabled: disabled_integrations.as_deref(),
                    output_requirements: &output_requirements,
                    output_constraints: &output_constraints,
                },
                json_output,
            )
        }),
        Commands::Update {
            release,
            enabled_integrations,
            disabled_integrations,
            check,
        } => commands::make_engine(&release, config).and_then(|engine| {
            commands::update::run(
                &engine,
                &UpdateOptions {
                    enabled: &enabled_integrations,
                    disabled: &disabled_integrations,
                    check,
                },
                json_output,
            )
        }),
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
        Commands::ManPages { dir } => commands::man_pages::run::<Cli>(&dir),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            let code = if msg.starts_with("manifest error:") {
                EXIT_MANIFEST_ERROR
            } else if msg.starts_with("selection error:") {
                EXIT_SELECTION_ERROR
            } else {
                EXIT_FAILURE
            };
            ExitCode::from(code)
        }
    }
}
