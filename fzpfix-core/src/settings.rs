//! Clap-free settings for a repair run.

use camino::Utf8PathBuf;
use fzpfix_types::PatchMode;

#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Directory scanned recursively for archives.
    pub root: Utf8PathBuf,
    pub mode: PatchMode,
    pub dry_run: bool,
    /// Stop at the first archive that fails instead of moving on.
    pub fail_fast: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            root: Utf8PathBuf::from("."),
            mode: PatchMode::default(),
            dry_run: false,
            fail_fast: false,
        }
    }
}
