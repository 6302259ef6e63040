//! Rendering helpers for human-readable run output.

use fzpfix_types::report::{ArchiveStatus, RunReport};

/// One-line console summary printed at the end of a run.
pub fn render_summary_line(report: &RunReport) -> String {
    let s = &report.summary;
    let mut line = format!(
        "{} archive(s) found: {} rewritten, {} unchanged, {} failed",
        s.found, s.rewritten, s.unchanged, s.failed
    );
    if report.dry_run {
        line.push_str(&format!(", {} would be rewritten (dry run)", s.would_rewrite));
    }
    line
}

pub fn render_report_md(report: &RunReport) -> String {
    let s = &report.summary;
    let mut out = String::new();
    out.push_str("# fzpfix report\n\n");
    out.push_str(&format!("- Root: `{}`\n", report.root));
    out.push_str(&format!("- Mode: `{}`\n", report.mode));
    if report.dry_run {
        out.push_str("- Dry run: yes\n");
    }
    out.push_str(&format!(
        "- Found: {}\n- Rewritten: {}\n- Unchanged: {}\n- Would rewrite: {}\n- Failed: {}\n- Definitions changed: {}\n\n",
        s.found, s.rewritten, s.unchanged, s.would_rewrite, s.failed, s.definitions_changed
    ));

    out.push_str("## Archives\n\n");
    if report.archives.is_empty() {
        out.push_str("_No archives found._\n");
        return out;
    }

    for (i, a) in report.archives.iter().enumerate() {
        out.push_str(&format!("### {}. {}\n\n", i + 1, a.path));
        out.push_str(&format!("- Status: `{}`\n", a.status.as_str()));
        if let Some(err) = &a.error {
            out.push_str(&format!("- Error: {}\n", err));
        }
        if a.status == ArchiveStatus::Rewritten {
            let before = a.sha256_before.as_deref().unwrap_or("-");
            let after = a.sha256_after.as_deref().unwrap_or("-");
            out.push_str(&format!("- sha256: {} → {}\n", before, after));
        }

        let changed: Vec<_> = a.definitions.iter().filter(|d| d.changed).collect();
        if !changed.is_empty() {
            out.push_str("\n**Definitions changed**\n\n");
            for d in changed {
                out.push_str(&format!(
                    "- `{}`: {} null byte(s), {} invalid byte(s), {} separator(s)\n",
                    d.path, d.nulls_removed, d.invalid_bytes_dropped, d.separators_inserted
                ));
            }
        }
        out.push('\n');
    }

    out
}
