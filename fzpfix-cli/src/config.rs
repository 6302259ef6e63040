//! Configuration file loading for fzpfix.
//!
//! Discovers and loads `fzpfix.toml` from the scan root.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use fzpfix_types::PatchMode;
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "fzpfix.toml";

/// Top-level configuration from fzpfix.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FzpfixConfig {
    pub patch: PatchConfig,
    pub run: RunConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PatchConfig {
    /// `legacy` (default) or `strict`.
    pub mode: PatchMode,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Stop at the first archive that fails.
    pub fail_fast: bool,

    /// Never rewrite archives.
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Where to write report.json / report.md. Relative paths are resolved
    /// against the scan root.
    pub out_dir: Option<Utf8PathBuf>,
}

/// Discover the fzpfix.toml config file.
///
/// Returns `None` if no config file is found in `root`.
pub fn discover_config(root: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = root.join(CONFIG_FILE_NAME);
    if config_path.is_file() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a fzpfix.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<FzpfixConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<FzpfixConfig> {
    let config: FzpfixConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from the scan root, or return default if not found.
pub fn load_or_default(root: &Utf8Path) -> anyhow::Result<FzpfixConfig> {
    match discover_config(root) {
        Some(path) => load_config(&path),
        None => Ok(FzpfixConfig::default()),
    }
}

/// Config file and CLI arguments combined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedConfig {
    pub mode: PatchMode,
    pub fail_fast: bool,
    pub dry_run: bool,
    pub out_dir: Option<Utf8PathBuf>,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: FzpfixConfig,
}

impl ConfigMerger {
    pub fn new(config: FzpfixConfig) -> Self {
        Self { config }
    }

    /// Boolean CLI flags force an option on; when unset the config file value
    /// applies. A CLI `out_dir` replaces the configured one.
    pub fn merge_run_args(
        self,
        root: &Utf8Path,
        cli_strict: bool,
        cli_dry_run: bool,
        cli_fail_fast: bool,
        cli_out_dir: Option<Utf8PathBuf>,
    ) -> MergedConfig {
        let mode = if cli_strict {
            PatchMode::Strict
        } else {
            self.config.patch.mode
        };

        let out_dir = cli_out_dir.or_else(|| {
            self.config.report.out_dir.map(|dir| {
                if dir.is_absolute() {
                    dir
                } else {
                    root.join(dir)
                }
            })
        });

        MergedConfig {
            mode,
            fail_fast: cli_fail_fast || self.config.run.fail_fast,
            dry_run: cli_dry_run || self.config.run.dry_run,
            out_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let contents = r#"
[patch]
mode = "strict"

[run]
fail_fast = true
dry_run = true

[report]
out_dir = "artifacts/fzpfix"
"#;

        let config = parse_config(contents).unwrap();
        assert_eq!(config.patch.mode, PatchMode::Strict);
        assert!(config.run.fail_fast);
        assert!(config.run.dry_run);
        assert_eq!(
            config.report.out_dir,
            Some(Utf8PathBuf::from("artifacts/fzpfix"))
        );
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config("").unwrap();
        assert_eq!(config.patch.mode, PatchMode::Legacy);
        assert!(!config.run.fail_fast);
        assert!(!config.run.dry_run);
        assert!(config.report.out_dir.is_none());
    }

    #[test]
    fn test_unknown_keys_are_tolerated() {
        let config = parse_config("[patch]\nmode = \"legacy\"\nextra = 1\n").unwrap();
        assert_eq!(config.patch.mode, PatchMode::Legacy);
    }

    #[test]
    fn test_invalid_mode_is_rejected() {
        let err = parse_config("[patch]\nmode = \"loose\"\n").unwrap_err();
        assert!(err.to_string().contains("invalid TOML"));
    }

    #[test]
    fn test_cli_flags_override_config() {
        let merged = ConfigMerger::new(FzpfixConfig::default()).merge_run_args(
            Utf8Path::new("root"),
            true,
            true,
            true,
            Some(Utf8PathBuf::from("out")),
        );

        assert_eq!(
            merged,
            MergedConfig {
                mode: PatchMode::Strict,
                fail_fast: true,
                dry_run: true,
                out_dir: Some(Utf8PathBuf::from("out")),
            }
        );
    }

    #[test]
    fn test_config_used_when_cli_unset() {
        let config = FzpfixConfig {
            patch: PatchConfig {
                mode: PatchMode::Strict,
            },
            run: RunConfig {
                fail_fast: true,
                dry_run: false,
            },
            report: ReportConfig {
                out_dir: Some(Utf8PathBuf::from("reports")),
            },
        };

        let merged = ConfigMerger::new(config).merge_run_args(
            Utf8Path::new("root"),
            false,
            false,
            false,
            None,
        );

        assert_eq!(merged.mode, PatchMode::Strict);
        assert!(merged.fail_fast);
        assert!(!merged.dry_run);
        assert_eq!(merged.out_dir, Some(Utf8PathBuf::from("root").join("reports")));
    }

    #[test]
    fn test_discover_config_some_and_none() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        assert!(discover_config(&root).is_none());

        std::fs::write(root.join(CONFIG_FILE_NAME), "").expect("write config");
        assert!(discover_config(&root).is_some());
    }

    #[test]
    fn test_load_or_default_returns_default_when_missing() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        let cfg = load_or_default(&root).expect("load default");
        assert_eq!(cfg.patch.mode, PatchMode::Legacy);
    }
}
