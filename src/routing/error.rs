//! Error types for the routing engine

use thiserror::Error;

use super::types::Point;

/// Internal routing failures. Public entry points never surface these; they
/// log them and fall back to a best-effort route.
#[derive(Debug, Error)]
pub enum RouteError {
    /// Route synthesis did not reach its target within the step cap
    #[error("route synthesis exceeded {steps} steps ({} points accumulated)", partial.len())]
    StepLimitExceeded { steps: usize, partial: Vec<Point> },
}

/// Errors that can occur when loading or validating router configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for '{key}': {reason}")]
    Invalid { key: String, reason: String },
}

impl ConfigError {
    /// Create an invalid value error
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_limit_display() {
        let err = RouteError::StepLimitExceeded {
            steps: 32,
            partial: vec![Point::new(0.0, 0.0), Point::new(20.0, 0.0)],
        };
        assert_eq!(
            err.to_string(),
            "route synthesis exceeded 32 steps (2 points accumulated)"
        );
    }

    #[test]
    fn test_invalid_display() {
        let err = ConfigError::invalid("grid_size", "must be positive, got 0");
        assert!(err.to_string().contains("grid_size"));
    }
}
