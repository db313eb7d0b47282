//! Error types for quiz operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A module's question file could not be turned into a usable question set.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} must contain at least one question", .path.display())]
    Empty { path: PathBuf },

    #[error("{}: question {} is invalid: {reason}", .path.display(), .index + 1)]
    InvalidQuestion {
        path: PathBuf,
        index: usize,
        reason: String,
    },
}

/// A module resolved to zero questions when a session was started.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no questions found for module '{module}'")]
pub struct NoQuestionsError {
    pub module: String,
}

/// The configuration could not be assembled.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Extract(#[from] Box<figment::Error>),

    #[error("module id '{0}' is configured more than once")]
    DuplicateModule(String),

    #[error("no modules configured")]
    NoModules,
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Extract(Box::new(err))
    }
}

/// Progress file access failed. Never escapes the progress store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("progress file I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("progress file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Top-level error for running the quiz.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to load questions: {0}")]
    Load(#[from] LoadError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
