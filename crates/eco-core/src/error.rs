//! Error types for the simulation.

use crate::types::{AgentId, Position};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Agent {id} is already placed at {position}")]
    AlreadyPlaced { id: AgentId, position: Position },

    #[error("Agent {0} is already registered")]
    AlreadyRegistered(AgentId),

    #[error("Agent {0} not found")]
    NotFound(AgentId),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
