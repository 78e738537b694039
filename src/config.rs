//! Configuration file support for scancrop
//!
//! Supports TOML configuration files with the following search order:
//! 1. `--config <path>` - explicitly specified path
//! 2. `./scancrop.toml` - current directory
//! 3. `~/.config/scancrop/config.toml` - user config
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [general]
//! threads = 4
//! verbose = 1
//!
//! [crop]
//! margin = 16
//! threshold = 0.8
//! strategy = "min-max"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::bounds::{BoundsStrategy, ForegroundConvention};
use crate::pipeline::CropConfig;

/// Configuration file errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// File not found
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
}

/// General configuration options
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// Number of threads for parallel processing
    #[serde(default)]
    pub threads: Option<usize>,

    /// Verbosity level (0-2)
    #[serde(default)]
    pub verbose: Option<u8>,
}

/// Crop detection configuration options
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CropSection {
    /// Margin in pixels around the detected content
    #[serde(default)]
    pub margin: Option<u32>,

    /// Adaptive threshold relative-difference ratio
    #[serde(default)]
    pub threshold: Option<f64>,

    /// Bounding-box strategy: "min-max" or "corner-distance"
    #[serde(default)]
    pub strategy: Option<BoundsStrategy>,

    /// Foreground convention: "black" or "white"
    #[serde(default)]
    pub foreground: Option<ForegroundConvention>,

    /// Write thresholded intermediates next to the outputs
    #[serde(default)]
    pub save_debug: Option<bool>,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,

    /// Crop detection settings
    #[serde(default)]
    pub crop: CropSection,
}

impl Config {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from the default search path
    ///
    /// Search order:
    /// 1. `./scancrop.toml`
    /// 2. `~/.config/scancrop/config.toml`
    /// 3. Default values (if no file found)
    pub fn load() -> Result<Self, ConfigError> {
        for path in Self::search_paths() {
            if path.exists() {
                return Self::load_from_path(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Convert to CropConfig
    pub fn to_crop_config(&self) -> CropConfig {
        let mut config = CropConfig::default();

        if let Some(threads) = self.general.threads {
            config.threads = Some(threads);
        }

        if let Some(margin) = self.crop.margin {
            config = config.with_margin(margin);
        }
        if let Some(threshold) = self.crop.threshold {
            config = config.with_diff_ratio(threshold);
        }
        if let Some(strategy) = self.crop.strategy {
            config = config.with_strategy(strategy);
        }
        if let Some(foreground) = self.crop.foreground {
            config = config.with_foreground(foreground);
        }
        if let Some(save_debug) = self.crop.save_debug {
            config = config.with_save_debug(save_debug);
        }

        config
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&self, cli: &CliOverrides) -> CropConfig {
        let mut config = self.to_crop_config();

        if let Some(margin) = cli.margin {
            config = config.with_margin(margin);
        }
        if let Some(threshold) = cli.threshold {
            config = config.with_diff_ratio(threshold);
        }
        if let Some(strategy) = cli.strategy {
            config = config.with_strategy(strategy);
        }
        if let Some(foreground) = cli.foreground {
            config = config.with_foreground(foreground);
        }
        if let Some(save_debug) = cli.save_debug {
            config = config.with_save_debug(save_debug);
        }
        if let Some(threads) = cli.threads {
            config.threads = Some(threads);
        }

        config
    }

    /// Get config file search paths
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("scancrop.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("scancrop").join("config.toml"));
        }

        paths
    }
}

/// CLI override values for merging with config file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub margin: Option<u32>,
    pub threshold: Option<f64>,
    pub strategy: Option<BoundsStrategy>,
    pub foreground: Option<ForegroundConvention>,
    pub save_debug: Option<bool>,
    pub threads: Option<usize>,
}

impl CliOverrides {
    /// Create new empty overrides
    pub fn new() -> Self {
        Self::default()
    }

    /// Set margin override
    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = Some(margin);
        self
    }

    /// Set threshold ratio override
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Set strategy override
    pub fn with_strategy(mut self, strategy: BoundsStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Set foreground convention override
    pub fn with_foreground(mut self, foreground: ForegroundConvention) -> Self {
        self.foreground = Some(foreground);
        self
    }

    /// Set save-debug override
    pub fn with_save_debug(mut self, save_debug: bool) -> Self {
        self.save_debug = Some(save_debug);
        self
    }

    /// Set thread count override
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::DEFAULT_MARGIN;
    use crate::threshold::DEFAULT_DIFF_RATIO;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.general.threads, None);
        assert_eq!(config.general.verbose, None);
        assert_eq!(config.crop.margin, None);
        assert_eq!(config.crop.threshold, None);
        assert_eq!(config.crop.strategy, None);
    }

    #[test]
    fn test_config_load_from_path_existing() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            r#"
[general]
threads = 4

[crop]
margin = 24
"#,
        )
        .unwrap();

        let config = Config::load_from_path(&config_path).unwrap();
        assert_eq!(config.general.threads, Some(4));
        assert_eq!(config.crop.margin, Some(24));
    }

    #[test]
    fn test_config_load_from_path_not_found() {
        let result = Config::load_from_path(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_config_search_paths() {
        let paths = Config::search_paths();
        assert!(!paths.is_empty());
        assert_eq!(paths[0], PathBuf::from("scancrop.toml"));
    }

    #[test]
    fn test_config_merge_cli_priority() {
        let config = Config {
            crop: CropSection {
                margin: Some(8),
                threshold: Some(0.6),
                ..Default::default()
            },
            ..Default::default()
        };

        let cli = CliOverrides::new().with_margin(32).with_threshold(0.9);

        let crop = config.merge_with_cli(&cli);
        assert_eq!(crop.margin, 32); // CLI wins
        assert_eq!(crop.diff_ratio, 0.9); // CLI wins
    }

    #[test]
    fn test_config_to_crop_config() {
        let config = Config {
            general: GeneralConfig {
                threads: Some(8),
                ..Default::default()
            },
            crop: CropSection {
                margin: Some(24),
                threshold: Some(0.7),
                strategy: Some(BoundsStrategy::CornerDistance),
                foreground: Some(ForegroundConvention::White),
                save_debug: Some(true),
            },
        };

        let crop = config.to_crop_config();
        assert_eq!(crop.threads, Some(8));
        assert_eq!(crop.margin, 24);
        assert!((crop.diff_ratio - 0.7).abs() < f64::EPSILON);
        assert_eq!(crop.strategy, BoundsStrategy::CornerDistance);
        assert_eq!(crop.foreground, ForegroundConvention::White);
        assert!(crop.save_debug);
    }

    #[test]
    fn test_config_toml_parse_complete() {
        let toml = r#"
[general]
threads = 4
verbose = 2

[crop]
margin = 16
threshold = 0.8
strategy = "corner-distance"
foreground = "white"
save_debug = true
"#;

        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.general.threads, Some(4));
        assert_eq!(config.general.verbose, Some(2));
        assert_eq!(config.crop.margin, Some(16));
        assert_eq!(config.crop.threshold, Some(0.8));
        assert_eq!(config.crop.strategy, Some(BoundsStrategy::CornerDistance));
        assert_eq!(config.crop.foreground, Some(ForegroundConvention::White));
        assert_eq!(config.crop.save_debug, Some(true));
    }

    #[test]
    fn test_config_toml_parse_partial() {
        let toml = r#"
[crop]
margin = 4
"#;

        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.crop.margin, Some(4));
        assert_eq!(config.crop.threshold, None);
        assert_eq!(config.general.threads, None);
    }

    #[test]
    fn test_config_toml_parse_empty() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_toml_parse_invalid() {
        let result = Config::from_toml("this is not valid toml [[[");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config {
            crop: CropSection {
                margin: Some(16),
                ..Default::default()
            },
            ..Default::default()
        };

        let toml_str = config.to_toml().unwrap();
        assert!(toml_str.contains("margin = 16"));
    }

    #[test]
    fn test_cli_overrides_builder() {
        let overrides = CliOverrides::new()
            .with_margin(8)
            .with_threshold(0.5)
            .with_strategy(BoundsStrategy::MinMax)
            .with_foreground(ForegroundConvention::Black)
            .with_save_debug(true)
            .with_threads(2);

        assert_eq!(overrides.margin, Some(8));
        assert_eq!(overrides.threshold, Some(0.5));
        assert_eq!(overrides.strategy, Some(BoundsStrategy::MinMax));
        assert_eq!(overrides.foreground, Some(ForegroundConvention::Black));
        assert_eq!(overrides.save_debug, Some(true));
        assert_eq!(overrides.threads, Some(2));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::NotFound(PathBuf::from("/test/path"));
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_config_merge_empty_cli() {
        let config = Config {
            crop: CropSection {
                margin: Some(12),
                ..Default::default()
            },
            ..Default::default()
        };

        let cli = CliOverrides::new();
        let crop = config.merge_with_cli(&cli);
        assert_eq!(crop.margin, 12); // Config value preserved
    }

    #[test]
    fn test_config_merge_partial_cli() {
        let config = Config {
            general: GeneralConfig {
                threads: Some(4),
                ..Default::default()
            },
            crop: CropSection {
                margin: Some(8),
                threshold: Some(0.6),
                ..Default::default()
            },
        };

        let cli = CliOverrides::new().with_margin(32);
        let crop = config.merge_with_cli(&cli);
        assert_eq!(crop.margin, 32); // CLI wins
        assert_eq!(crop.threads, Some(4)); // Config preserved
        assert!((crop.diff_ratio - 0.6).abs() < f64::EPSILON); // Config preserved
    }

    #[test]
    fn test_empty_config_yields_defaults() {
        let crop = Config::default().to_crop_config();
        assert_eq!(crop.margin, DEFAULT_MARGIN);
        assert_eq!(crop.diff_ratio, DEFAULT_DIFF_RATIO);
        assert_eq!(crop.strategy, BoundsStrategy::MinMax);
        assert_eq!(crop.foreground, ForegroundConvention::Black);
        assert!(!crop.save_debug);
        assert!(crop.threads.is_none());
    }
}
