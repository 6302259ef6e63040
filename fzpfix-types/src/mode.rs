//! Separator repair modes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the `hybrid='yes'` separator fix is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchMode {
    /// Every occurrence gets a trailing space, even one that already has it.
    /// Running the repair twice inserts a second space.
    #[default]
    Legacy,
    /// A space is inserted only where the attribute is glued to the next token.
    /// Running the repair twice is a no-op.
    Strict,
}

impl PatchMode {
    pub fn as_str(self) -> &'static str {
        match self {
            PatchMode::Legacy => "legacy",
            PatchMode::Strict => "strict",
        }
    }
}

impl fmt::Display for PatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
