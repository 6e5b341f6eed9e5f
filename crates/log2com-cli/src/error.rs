use log2com::core::io::error::IoError;
use log2com::core::models::molecule::MoleculeError;
use log2com::workflows::convert::WorkflowError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Molecule(#[from] MoleculeError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<IoError> for CliError {
    fn from(e: IoError) -> Self {
        match e {
            IoError::UnknownSetting(key) => {
                CliError::Config(format!("Unknown job setting '{}'", key))
            }
            other => CliError::Other(other.into()),
        }
    }
}
