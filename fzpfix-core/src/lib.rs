//! Embeddable core library for fzpfix.
//!
//! Provides a clap-free entry point that finds Fritzing part archives
//! (`.fzpz`, `.fzbz`) under a root directory and repairs the `.fzp`
//! definitions inside them.
//!
//! # Entry points
//!
//! - [`run`](pipeline::run) - locate and patch every archive under a root
//! - [`patch_archive`](archive::patch_archive) - patch a single archive
//! - [`find_archives`](locate::find_archives) - locate archives only
//!
//! Report artifacts are written through the [`WritePort`](ports::WritePort)
//! trait; [`adapters`] has the filesystem implementation.

pub mod adapters;
pub mod archive;
pub mod error;
pub mod locate;
pub mod pipeline;
pub mod ports;
pub mod scratch;
pub mod settings;

pub use archive::{patch_archive, PatchOptions, DEFINITION_EXTENSION};
pub use error::ArchiveError;
pub use locate::{find_archives, is_archive_name, ARCHIVE_EXTENSIONS};
pub use pipeline::run;
pub use scratch::{ScratchDir, SCRATCH_SUFFIX};
pub use settings::RunSettings;
