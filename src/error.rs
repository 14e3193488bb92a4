use std::path::PathBuf;

use thiserror::Error;

/// Hard failure of a selection string. No partial selection survives it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("invalid selection {input:?}: use letters, names separated by commas, or \"all\"")]
    Format { input: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScaffoldError {
    #[error("catalog {0:?} has no options")]
    EmptyCatalog(String),

    #[error("at least one {0} must be selected")]
    EmptySelection(String),

    #[error("{label} directory does not exist: {path:?}")]
    MissingRoot { label: &'static str, path: PathBuf },

    #[error("invalid {label} name {name:?}: must be a single directory name")]
    InvalidName { label: String, name: String },

    #[error("{label} {name:?} is listed more than once")]
    DuplicateOption { label: String, name: String },

    #[error("invalid layout: {0}")]
    InvalidLayout(String),
}
