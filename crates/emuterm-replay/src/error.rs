#![forbid(unsafe_code)]

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReplayError>;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("trace line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: emuterm_core::ConfigError,
    },
}

impl ReplayError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Parse { .. } | Self::Config { .. } => 2,
        }
    }
}
