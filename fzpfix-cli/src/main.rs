mod config;

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Parser;
use config::ConfigMerger;
use fzpfix_core::adapters::FsWritePort;
use fzpfix_core::pipeline::write_report_artifacts;
use fzpfix_core::RunSettings;
use fzpfix_render::render_summary_line;
use fzpfix_types::report::ToolInfo;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "fzpfix",
    version,
    about = "Repair corrupted part definitions inside Fritzing .fzpz/.fzbz archives."
)]
struct Cli {
    /// Directory to scan recursively for archives (default: current directory).
    #[arg(long, default_value = ".")]
    root: Utf8PathBuf,

    /// Only insert the separator after hybrid='yes' where it is missing.
    /// Safe to run repeatedly.
    #[arg(long, default_value_t = false)]
    strict: bool,

    /// Repair in scratch directories only; never rewrite archives.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Stop at the first archive that cannot be processed.
    #[arg(long, default_value_t = false)]
    fail_fast: bool,

    /// Write report.json and report.md into this directory.
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,
}

fn main() -> ExitCode {
    match real_main() {
        Ok(code) => code,
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(1)
        }
    }
}

fn real_main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let file_config = config::load_or_default(&cli.root).context("load fzpfix.toml config")?;
    let merged = ConfigMerger::new(file_config).merge_run_args(
        &cli.root,
        cli.strict,
        cli.dry_run,
        cli.fail_fast,
        cli.out_dir,
    );

    debug!(
        "merged config: mode={}, dry_run={}, fail_fast={}, out_dir={:?}",
        merged.mode, merged.dry_run, merged.fail_fast, merged.out_dir
    );

    let settings = RunSettings {
        root: cli.root,
        mode: merged.mode,
        dry_run: merged.dry_run,
        fail_fast: merged.fail_fast,
    };
    let report = fzpfix_core::run(&settings, tool_info())?;

    if let Some(out_dir) = &merged.out_dir {
        write_report_artifacts(out_dir, &report, &FsWritePort)
            .with_context(|| format!("write report artifacts to {}", out_dir))?;
    }

    println!("{}", render_summary_line(&report));

    if report.has_failures() {
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}

fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "fzpfix".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    }
}
