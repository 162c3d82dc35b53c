use crate::pendulum::ModelError;
use thiserror::Error;

/// Failures of the viewer application around the real-time core
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown channel `{name}`, available: {available}")]
    UnknownChannel { name: String, available: String },

    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ViewerError>;
