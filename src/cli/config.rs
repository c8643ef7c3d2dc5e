//! TOML configuration file support for repeat runs.
//!
//! Instead of passing ranges and the mode as flags every time, users can
//! keep them in a config file:
//!
//! ```toml
//! # chronorm.toml
//! [processing]
//! mode = "both"
//! ranges = [[0.0, 28.0], [30.0, 55.0]]
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use chronorm::range::TimeRange;
use chronorm::results::Mode;

/// Root configuration structure for chronorm.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Processing-specific settings.
    #[serde(default)]
    pub processing: ProcessingConfig,
}

/// Configuration for the process command.
#[derive(Debug, Default, Deserialize)]
pub struct ProcessingConfig {
    /// Normalization mode (height, kinetic, both).
    pub mode: Option<Mode>,

    /// Time ranges to extract, as [start, stop] pairs.
    #[serde(default)]
    pub ranges: Vec<[f64; 2]>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Validated time ranges declared in the config.
    pub fn ranges(&self) -> Result<Vec<TimeRange>> {
        self.processing
            .ranges
            .iter()
            .map(|[start, stop]| {
                TimeRange::new(*start, *stop)
                    .with_context(|| format!("Invalid range in config: [{start}, {stop}]"))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [processing]
            mode = "kinetic"
            ranges = [[0.0, 28.0], [30.0, 55.0]]
        "#;

        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.processing.mode, Some(Mode::Kinetic));
        let ranges = config.ranges().unwrap();
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0].start(), 0.0);
        assert_eq!(ranges[1].stop(), 55.0);
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [processing]
            mode = "height"
        "#;

        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.processing.mode, Some(Mode::Height));
        assert!(config.processing.ranges.is_empty());
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.processing.mode, None);
        assert!(config.processing.ranges.is_empty());
    }

    #[test]
    fn test_inverted_range_in_config_is_rejected() {
        let toml = r#"
            [processing]
            ranges = [[28.0, 0.0]]
        "#;

        let config = Config::from_toml(toml).unwrap();
        assert!(config.ranges().is_err());
    }
}
