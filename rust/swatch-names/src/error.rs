//! Error types for training and generation.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SwatchError {
    #[error("reference color vocabulary is empty")]
    EmptyVocabulary,

    #[error("pattern table has no patterns eligible for sampling")]
    EmptyPatternTable,

    #[error("cannot train a language model on an empty corpus")]
    EmptyCorpus,

    #[error("markov state size must be at least 1, got {0}")]
    InvalidStateSize(usize),

    #[error("invalid color '{input}': {reason}")]
    InvalidColor { input: String, reason: String },

    #[error("malformed corpus record: {0}")]
    Csv(#[from] csv_async::Error),

    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("artifact {path:?} holds a '{found}' payload, expected '{expected}'")]
    ArtifactMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },

    #[error("artifact {path:?} has unsupported format version {found}")]
    ArtifactVersion { path: PathBuf, found: u32 },
}
