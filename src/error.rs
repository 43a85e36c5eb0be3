//! Error types for the fallible surfaces: preset loading and page layout.
//!
//! The reveal core itself never fails; bad parameters degrade to safe values.

use std::path::PathBuf;

/// Error computing the page layout.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("taffy layout error: {0}")]
    Taffy(#[from] taffy::TaffyError),
}

/// Error mounting a page.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("failed to read preset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("duplicate section id: {0}")]
    DuplicateSection(String),
    #[error("a page named {0:?} is already mounted")]
    AlreadyMounted(String),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}
