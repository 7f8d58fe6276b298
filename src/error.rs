//! Top-level error type for the routing pipeline

use thiserror::Error;

use crate::routing::ConfigError;
use crate::scene::SceneError;

/// Errors that can occur while loading, routing and reporting a scene
#[derive(Debug, Error)]
pub enum Error {
    /// Error while loading or editing the scene
    #[error("scene error: {0}")]
    Scene(#[from] SceneError),

    /// Error in a standalone router configuration file
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Error while writing the TOML report
    #[error("failed to write report: {0}")]
    Report(#[from] toml::ser::Error),
}
