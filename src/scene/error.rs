//! Error types for scene building and loading

use thiserror::Error;

use crate::routing::ConfigError;

/// Errors that can occur while building or loading a scene
#[derive(Debug, Error)]
pub enum SceneError {
    /// Reference to a port name that was never declared
    #[error("unknown port '{0}'")]
    UnknownPort(String),

    /// Endpoint handle that does not belong to this scene
    #[error("unknown endpoint #{0}")]
    UnknownEndpoint(usize),

    /// Reference to a component name that was never declared
    #[error("unknown component '{0}'")]
    UnknownComponent(String),

    /// Connection handle that does not belong to this scene
    #[error("unknown connection #{0}")]
    UnknownConnection(usize),

    /// Two ports or two components declared with the same name
    #[error("duplicate name '{0}'")]
    DuplicateName(String),

    /// Direction that is zero, non-finite or an unknown keyword
    #[error("invalid direction for port '{port}': {reason}")]
    InvalidDirection { port: String, reason: String },

    /// Malformed `--move` argument
    #[error("invalid move '{0}', expected <PORT>=<DX>,<DY>")]
    InvalidMove(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to read scene file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scene TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

impl SceneError {
    /// Create an invalid direction error
    pub fn invalid_direction(port: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDirection {
            port: port.into(),
            reason: reason.into(),
        }
    }
}
