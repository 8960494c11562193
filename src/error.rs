use std::path::PathBuf;
use thiserror::Error;

/// Failures while building or persisting a bundle.
#[derive(Error, Debug)]
pub enum BundleError {
    #[error("Invalid selector pattern '{pattern}': {reason}")]
    InvalidSelector { pattern: String, reason: String },

    #[error("Error writing to {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),
}

impl BundleError {
    pub fn invalid_selector(pattern: &str, err: regex::Error) -> Self {
        BundleError::InvalidSelector {
            pattern: pattern.to_string(),
            reason: err.to_string(),
        }
    }
}

/// Failures while loading a definition file or resolving its selectors.
///
/// None of these abort a run: load failures fall back to the defaults and
/// selector failures are recorded against their layer.
#[derive(Error, Debug)]
pub enum DefinitionError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Definition must be a JSON object, found {0}")]
    NotAnObject(&'static str),

    #[error("Invalid selectors for layer '{layer}': {reason}")]
    InvalidSelectors { layer: String, reason: String },
}

impl DefinitionError {
    pub fn invalid_selectors(layer: &str, reason: impl Into<String>) -> Self {
        DefinitionError::InvalidSelectors {
            layer: layer.to_string(),
            reason: reason.into(),
        }
    }
}
