use crate::utils::parser::ParseError;
use msjgen::engine::config::ConfigError;
use msjgen::workflows::prepare::WorkflowError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid argument: {0}")]
    Argument(#[from] ParseError),

    #[error("Schrödinger query '{query}' failed: {message}")]
    Query { query: String, message: String },

    #[error("Script '{path}' exited with {status}", path = path.display())]
    Script { path: PathBuf, status: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
