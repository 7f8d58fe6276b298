//! Configuration for the routing engine

use std::path::Path;

use serde::Deserialize;

use super::error::ConfigError;

/// Tunable constants consumed by the router
#[derive(Debug, Clone, PartialEq)]
pub struct RouterConfig {
    /// Grid unit every interior route point snaps to
    pub grid_size: f64,

    /// Shortest straight run a route makes out of an endpoint before turning
    pub min_stub_length: f64,

    /// Shortest segment inserted while synthesizing or adjusting a route
    pub min_segment_length: f64,

    /// Underpass clearance on each side of a crossing
    pub crossing_gap: f64,

    /// Underpass clearance when both crossing lines are thick
    pub thick_crossing_gap: f64,

    /// Hard upper bound on synthesis steps for a single route
    pub max_steps: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            grid_size: 10.0,
            min_stub_length: 20.0,
            min_segment_length: 10.0,
            crossing_gap: 4.0,
            thick_crossing_gap: 6.0,
            max_steps: 4096,
        }
    }
}

/// `[router]` table as it appears in TOML; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RouterTable {
    grid_size: Option<f64>,
    min_stub_length: Option<f64>,
    min_segment_length: Option<f64>,
    crossing_gap: Option<f64>,
    thick_crossing_gap: Option<f64>,
    max_steps: Option<usize>,
}

#[derive(Deserialize)]
struct TomlConfig {
    router: Option<RouterTable>,
}

impl RouterTable {
    /// Overlay the present keys on top of `base`
    pub(crate) fn apply(&self, base: RouterConfig) -> RouterConfig {
        RouterConfig {
            grid_size: self.grid_size.unwrap_or(base.grid_size),
            min_stub_length: self.min_stub_length.unwrap_or(base.min_stub_length),
            min_segment_length: self.min_segment_length.unwrap_or(base.min_segment_length),
            crossing_gap: self.crossing_gap.unwrap_or(base.crossing_gap),
            thick_crossing_gap: self.thick_crossing_gap.unwrap_or(base.thick_crossing_gap),
            max_steps: self.max_steps.unwrap_or(base.max_steps),
        }
    }
}

impl RouterConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the grid unit
    pub fn with_grid_size(mut self, size: f64) -> Self {
        self.grid_size = size;
        self
    }

    /// Set the minimum stub length
    pub fn with_min_stub_length(mut self, length: f64) -> Self {
        self.min_stub_length = length;
        self
    }

    /// Set the minimum segment length
    pub fn with_min_segment_length(mut self, length: f64) -> Self {
        self.min_segment_length = length;
        self
    }

    /// Set both crossing clearances
    pub fn with_crossing_gaps(mut self, normal: f64, thick: f64) -> Self {
        self.crossing_gap = normal;
        self.thick_crossing_gap = thick;
        self
    }

    /// Set the synthesis step bound
    pub fn with_max_steps(mut self, steps: usize) -> Self {
        self.max_steps = steps;
        self
    }

    /// Parse a `[router]` table from TOML source. Missing keys keep defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(source)?;
        let config = parsed
            .router
            .map(|table| table.apply(RouterConfig::default()))
            .unwrap_or_default();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Reject values the routing algorithms cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let lengths = [
            ("grid_size", self.grid_size),
            ("min_stub_length", self.min_stub_length),
            ("min_segment_length", self.min_segment_length),
            ("crossing_gap", self.crossing_gap),
            ("thick_crossing_gap", self.thick_crossing_gap),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::invalid(name, format!("must be positive, got {}", value)));
            }
        }
        if self.min_stub_length < self.min_segment_length {
            return Err(ConfigError::invalid(
                "min_stub_length",
                "must not be shorter than min_segment_length",
            ));
        }
        if self.max_steps == 0 {
            return Err(ConfigError::invalid("max_steps", "must be at least 1"));
        }
        Ok(())
    }

    /// Step cap for one synthesis between `distance`-apart endpoints
    pub fn step_limit(&self, distance: f64) -> usize {
        let proportional = (distance / self.min_segment_length).ceil();
        let proportional = if proportional.is_finite() && proportional > 0.0 {
            proportional as usize
        } else {
            0
        };
        (16 + proportional).min(self.max_steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RouterConfig::default();
        assert_eq!(config.grid_size, 10.0);
        assert_eq!(config.min_stub_length, 20.0);
        assert_eq!(config.min_segment_length, 10.0);
        assert_eq!(config.crossing_gap, 4.0);
        assert_eq!(config.thick_crossing_gap, 6.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = RouterConfig::new()
            .with_grid_size(5.0)
            .with_min_stub_length(15.0)
            .with_crossing_gaps(3.0, 5.0);

        assert_eq!(config.grid_size, 5.0);
        assert_eq!(config.min_stub_length, 15.0);
        assert_eq!(config.crossing_gap, 3.0);
        assert_eq!(config.thick_crossing_gap, 5.0);
    }

    #[test]
    fn test_from_toml_partial_table() {
        let config = RouterConfig::from_toml_str(
            r#"
            [router]
            min_stub_length = 30
            thick_crossing_gap = 8.5
            "#,
        )
        .unwrap();
        assert_eq!(config.min_stub_length, 30.0);
        assert_eq!(config.thick_crossing_gap, 8.5);
        assert_eq!(config.grid_size, 10.0);
    }

    #[test]
    fn test_from_toml_rejects_unknown_key() {
        let result = RouterConfig::from_toml_str(
            r#"
            [router]
            stub = 30
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_from_toml_without_table_uses_defaults() {
        let config = RouterConfig::from_toml_str("").unwrap();
        assert_eq!(config, RouterConfig::default());
    }

    #[test]
    fn test_validate_rejects_short_stub() {
        let config = RouterConfig::new().with_min_stub_length(5.0);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("min_stub_length"));
    }

    #[test]
    fn test_validate_rejects_non_positive() {
        let config = RouterConfig::new().with_grid_size(0.0);
        assert!(config.validate().is_err());
        let config = RouterConfig::new().with_min_segment_length(f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_step_limit_scales_with_distance() {
        let config = RouterConfig::default();
        assert_eq!(config.step_limit(0.0), 16);
        assert_eq!(config.step_limit(100.0), 26);
        assert_eq!(config.step_limit(1e12), config.max_steps);
    }
}
