//! Run pipeline: locate every archive under a root and patch each one.
//!
//! Archives are processed one at a time. A failing archive is recorded in the
//! report and the run moves on, unless `fail_fast` is set.

use crate::archive::{patch_archive, PatchOptions};
use crate::locate::find_archives;
use crate::ports::WritePort;
use crate::settings::RunSettings;
use anyhow::Context;
use camino::Utf8Path;
use chrono::Utc;
use fzpfix_types::report::{ArchiveResult, RunReport, ToolInfo};
use tracing::{error, info};

/// Locate and patch every archive under `settings.root`.
///
/// Only problems with the run itself (e.g. a missing root) are returned as
/// errors; per-archive failures end up in the report.
pub fn run(settings: &RunSettings, tool: ToolInfo) -> anyhow::Result<RunReport> {
    let mut report = RunReport::new(
        tool,
        settings.root.clone(),
        settings.mode,
        settings.dry_run,
    );
    report.run.started_at = Some(Utc::now());

    let archives = find_archives(&settings.root)
        .with_context(|| format!("scan {} for archives", settings.root))?;
    info!(root = %settings.root, count = archives.len(), "archive scan complete");
    report.summary.found = archives.len() as u64;

    let opts = PatchOptions {
        mode: settings.mode,
        dry_run: settings.dry_run,
    };

    for path in archives {
        match patch_archive(&path, &opts) {
            Ok(result) => report.push(result),
            Err(err) => {
                error!(archive = %path, error = %err, "failed to process archive");
                report.push(ArchiveResult::failed(path, err.to_string()));
                if settings.fail_fast {
                    info!("stopping after first failure (fail-fast)");
                    break;
                }
            }
        }
    }

    report.run.ended_at = Some(Utc::now());
    let s = &report.summary;
    info!(
        found = s.found,
        rewritten = s.rewritten,
        unchanged = s.unchanged,
        would_rewrite = s.would_rewrite,
        failed = s.failed,
        "run complete"
    );
    Ok(report)
}

/// Write `report.json` (and `report.md` with the `reporting` feature) into
/// `out_dir`.
pub fn write_report_artifacts(
    out_dir: &Utf8Path,
    report: &RunReport,
    writer: &dyn WritePort,
) -> anyhow::Result<()> {
    writer.create_dir_all(out_dir)?;

    let json = serde_json::to_string_pretty(report).context("serialize report")?;
    writer.write_file(&out_dir.join("report.json"), json.as_bytes())?;

    #[cfg(feature = "reporting")]
    {
        let md = fzpfix_render::render_report_md(report);
        writer.write_file(&out_dir.join("report.md"), md.as_bytes())?;
    }

    info!(out_dir = %out_dir, "wrote report artifacts");
    Ok(())
}
