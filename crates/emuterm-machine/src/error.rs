#![forbid(unsafe_code)]

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MachineError {
    #[error("no machine description (machine.toml or machine.json) in {}", bundle.display())]
    MissingDescription { bundle: PathBuf },
    #[error("invalid machine description: {0}")]
    InvalidDescription(String),
    #[error("machine config I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
