//! Error taxonomy for the documentation pipeline.
//!
//! Every stage returns [`Result`]; `main` is the only place that handles a
//! failure, by printing it and exiting non-zero.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocsError {
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid source pattern {pattern}: {message}")]
    Glob { pattern: String, message: String },

    #[error("failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parsing engine `{engine}` failed on {path}: {message}")]
    Engine {
        engine: String,
        path: PathBuf,
        message: String,
    },

    #[error("failed to decode engine output for {path}: {source}")]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("entry `{name}` has no category")]
    MissingCategory { name: String },

    #[error("entry `{name}` references unconfigured category `{category}`")]
    UnknownCategory { name: String, category: String },

    #[error("failed to read static doc {path}: {source}")]
    StaticDoc {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize documentation: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, DocsError>;
