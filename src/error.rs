//! Error types

use thiserror::Error;

/// Failures while building or checking a maze
#[derive(Error, Debug)]
pub enum MazeError {
    #[error("maze dimensions {width}x{height} are too small (both must be at least 2)")]
    InvalidDimensions { width: usize, height: usize },

    #[error("no {size}x{size} maze with a path of at least {min_length} cells after {attempts} attempts")]
    UnsolvableAfterRetries {
        size: usize,
        attempts: u32,
        min_length: usize,
    },

    #[error("path is broken between cells {index} and {}", .index + 1)]
    BrokenPath { index: usize },

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Failures while loading or validating settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
