use crate::mode::PatchMode;
use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one fzpfix run over a directory tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub schema: String,
    pub tool: ToolInfo,
    pub run: RunInfo,
    pub root: Utf8PathBuf,
    pub mode: PatchMode,

    #[serde(default)]
    pub dry_run: bool,

    #[serde(default)]
    pub archives: Vec<ArchiveResult>,

    pub summary: RunSummary,
}

impl RunReport {
    pub fn new(tool: ToolInfo, root: Utf8PathBuf, mode: PatchMode, dry_run: bool) -> Self {
        Self {
            schema: crate::schema::FZPFIX_REPORT_V1.to_string(),
            tool,
            run: RunInfo::default(),
            root,
            mode,
            dry_run,
            archives: vec![],
            summary: RunSummary::default(),
        }
    }

    /// Record an archive result and bump the matching counters.
    pub fn push(&mut self, result: ArchiveResult) {
        self.summary.record(&result);
        self.archives.push(result);
    }

    pub fn has_failures(&self) -> bool {
        self.summary.failed > 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveStatus {
    /// At least one definition changed and the archive was repacked in place.
    Rewritten,
    /// Nothing needed fixing; the archive bytes were not touched.
    Unchanged,
    /// Dry run: the archive would have been repacked.
    WouldRewrite,
    Failed,
}

impl ArchiveStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ArchiveStatus::Rewritten => "rewritten",
            ArchiveStatus::Unchanged => "unchanged",
            ArchiveStatus::WouldRewrite => "would_rewrite",
            ArchiveStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveResult {
    pub path: Utf8PathBuf,
    pub status: ArchiveStatus,

    #[serde(default)]
    pub definitions: Vec<DefinitionResult>,

    /// Number of file entries extracted from the archive.
    #[serde(default)]
    pub entries: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256_before: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256_after: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ArchiveResult {
    pub fn failed(path: Utf8PathBuf, error: String) -> Self {
        Self {
            path,
            status: ArchiveStatus::Failed,
            definitions: vec![],
            entries: 0,
            sha256_before: None,
            sha256_after: None,
            error: Some(error),
        }
    }

    pub fn definitions_changed(&self) -> u64 {
        self.definitions.iter().filter(|d| d.changed).count() as u64
    }
}

/// Per-definition-file repair counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionResult {
    /// Entry path inside the archive, `/`-separated.
    pub path: String,
    pub nulls_removed: u64,
    pub invalid_bytes_dropped: u64,
    pub separators_inserted: u64,
    pub changed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Archives located by the scan.
    pub found: u64,
    pub rewritten: u64,
    pub unchanged: u64,
    pub would_rewrite: u64,
    pub failed: u64,
    pub definitions_changed: u64,
}

impl RunSummary {
    /// Count one processed archive. `found` is set by the caller from the
    /// scan, so archives skipped by fail-fast still show up there.
    pub fn record(&mut self, result: &ArchiveResult) {
        match result.status {
            ArchiveStatus::Rewritten => self.rewritten += 1,
            ArchiveStatus::Unchanged => self.unchanged += 1,
            ArchiveStatus::WouldRewrite => self.would_rewrite += 1,
            ArchiveStatus::Failed => self.failed += 1,
        }
        self.definitions_changed += result.definitions_changed();
    }
}
