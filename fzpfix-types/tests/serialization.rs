use fzpfix_types::report::{
    ArchiveResult, ArchiveStatus, DefinitionResult, RunReport, RunSummary, ToolInfo,
};
use fzpfix_types::PatchMode;
use pretty_assertions::assert_eq;

fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "fzpfix".to_string(),
        version: Some("0.0.0".to_string()),
    }
}

fn rewritten(path: &str) -> ArchiveResult {
    ArchiveResult {
        path: path.into(),
        status: ArchiveStatus::Rewritten,
        definitions: vec![DefinitionResult {
            path: "part.fzp".to_string(),
            nulls_removed: 1,
            invalid_bytes_dropped: 0,
            separators_inserted: 1,
            changed: true,
        }],
        entries: 2,
        sha256_before: Some("aa".to_string()),
        sha256_after: Some("bb".to_string()),
        error: None,
    }
}

#[test]
fn archive_status_serializes_snake_case() {
    let cases = [
        (ArchiveStatus::Rewritten, "rewritten"),
        (ArchiveStatus::Unchanged, "unchanged"),
        (ArchiveStatus::WouldRewrite, "would_rewrite"),
        (ArchiveStatus::Failed, "failed"),
    ];
    for (status, expected) in cases {
        let value = serde_json::to_value(status).expect("serialize");
        assert_eq!(value, serde_json::json!(expected));
        assert_eq!(status.as_str(), expected);
    }
}

#[test]
fn patch_mode_serializes_snake_case() {
    assert_eq!(
        serde_json::to_value(PatchMode::Legacy).unwrap(),
        serde_json::json!("legacy")
    );
    assert_eq!(
        serde_json::to_value(PatchMode::Strict).unwrap(),
        serde_json::json!("strict")
    );
    assert_eq!(PatchMode::default(), PatchMode::Legacy);
}

#[test]
fn new_report_sets_schema_and_empty_summary() {
    let report = RunReport::new(tool_info(), "root".into(), PatchMode::Strict, true);

    assert_eq!(report.schema, fzpfix_types::schema::FZPFIX_REPORT_V1);
    assert_eq!(report.summary, RunSummary::default());
    assert!(report.archives.is_empty());
    assert!(report.dry_run);
    assert!(!report.has_failures());
}

#[test]
fn push_updates_summary_counters() {
    let mut report = RunReport::new(tool_info(), ".".into(), PatchMode::Legacy, false);
    report.summary.found = 3;
    report.push(rewritten("a.fzpz"));
    report.push(ArchiveResult::failed("b.fzbz".into(), "boom".to_string()));

    assert_eq!(
        report.summary,
        RunSummary {
            found: 3,
            rewritten: 1,
            unchanged: 0,
            would_rewrite: 0,
            failed: 1,
            definitions_changed: 1,
        }
    );
    assert!(report.has_failures());
}

#[test]
fn failed_result_omits_hashes_and_keeps_error() {
    let result = ArchiveResult::failed("bad.fzpz".into(), "invalid zip".to_string());
    let value = serde_json::to_value(&result).expect("serialize");

    assert!(value.get("sha256_before").is_none());
    assert!(value.get("sha256_after").is_none());
    assert_eq!(value["error"], serde_json::json!("invalid zip"));
    assert_eq!(value["status"], serde_json::json!("failed"));
}

#[test]
fn report_roundtrips_through_json() {
    let mut report = RunReport::new(tool_info(), "parts".into(), PatchMode::Legacy, false);
    report.push(rewritten("parts/a.fzpz"));

    let json = serde_json::to_string_pretty(&report).expect("serialize");
    let back: RunReport = serde_json::from_str(&json).expect("deserialize");

    assert_eq!(back.root.as_str(), "parts");
    assert_eq!(back.archives.len(), 1);
    assert_eq!(back.archives[0].definitions[0].separators_inserted, 1);
    assert_eq!(back.summary, report.summary);
}
