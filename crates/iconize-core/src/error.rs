use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IconizeError {
    #[error("Rule index {index} out of range (rules: {len})")]
    RuleIndexOutOfRange { index: usize, len: usize },

    #[error("Rule pattern must not be empty")]
    EmptyPattern,

    #[error("Rule icon must not be empty")]
    EmptyIcon,

    #[error("Invalid scope: '{value}' - expected everything, files or folders")]
    InvalidScope { value: String },

    #[error("Invalid entry kind: '{value}' - expected file or folder")]
    InvalidEntryKind { value: String },

    #[error("Failed to parse data file {path}: {message}")]
    DataParse { path: PathBuf, message: String },

    #[error("Failed to parse config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Config key not found: {key}")]
    ConfigKeyNotFound { key: String },

    #[error("Invalid value for {key}: '{value}'")]
    InvalidConfigValue { key: String, value: String },

    #[error("Root directory does not exist: {path}")]
    RootNotFound { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, IconizeError>;

impl IconizeError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::RuleIndexOutOfRange { .. } => 2,
            Self::RootNotFound { .. } => 3,
            Self::DataParse { .. } | Self::ConfigParse { .. } => 4,
            Self::EmptyPattern
            | Self::EmptyIcon
            | Self::InvalidScope { .. }
            | Self::InvalidEntryKind { .. }
            | Self::InvalidConfigValue { .. } => 5,
            Self::ConfigKeyNotFound { .. } => 6,
            _ => 1,
        }
    }
}
