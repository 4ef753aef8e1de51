use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop a batch before any output file is written.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("No program tree available at {0}")]
    NoTree(PathBuf),

    #[error("Nothing selected. Pass --select with a group or operation name.")]
    NothingSelected,

    #[error("Selection not found in program tree: {0}")]
    SelectionNotFound(String),

    #[error("Selected operation {0} is not owned by any group of the program tree")]
    Unresolvable(String),

    #[error("Group {0} has no child groups to postprocess")]
    NoChildGroups(String),

    #[error("No output directory chosen")]
    NoOutputDirectory,

    #[error("Failed to create output directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cancelled by user")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl BatchError {
    /// Conditions reported to the user without marking the run as failed.
    pub fn is_informational(&self) -> bool {
        matches!(self, BatchError::NoChildGroups(_) | BatchError::Cancelled)
    }
}
