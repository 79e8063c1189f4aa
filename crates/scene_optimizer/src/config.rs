//! Configuration system

pub use serde::{Deserialize, Serialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Batch threshold below the allowed minimum
    #[error("batch threshold must be at least 1, got {0}")]
    InvalidThreshold(usize),
}

/// Default bucket size above which primitives are packed into a batch
pub const DEFAULT_BATCH_THRESHOLD: usize = 5;

/// Tuning knobs for the scene optimizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Buckets with more primitives than this are packed into one batch;
    /// buckets at or below it emit individual drawables. Must be ≥ 1.
    pub batch_threshold: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            batch_threshold: DEFAULT_BATCH_THRESHOLD,
        }
    }
}

impl OptimizerConfig {
    /// Create a configuration with the given batch threshold
    pub fn new(batch_threshold: usize) -> Result<Self, ConfigError> {
        let config = Self { batch_threshold };
        config.validate()?;
        Ok(config)
    }

    /// Check configuration invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_threshold < 1 {
            return Err(ConfigError::InvalidThreshold(self.batch_threshold));
        }
        Ok(())
    }
}

impl Config for OptimizerConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_threshold() {
        assert_eq!(OptimizerConfig::default().batch_threshold, 5);
        assert!(OptimizerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_threshold_is_rejected() {
        assert!(matches!(
            OptimizerConfig::new(0),
            Err(ConfigError::InvalidThreshold(0))
        ));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = OptimizerConfig::new(9).unwrap();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: OptimizerConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.batch_threshold, 9);
    }

    #[test]
    fn test_unsupported_format() {
        let err = OptimizerConfig::load_from_file("optimizer.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_) | ConfigError::Io(_)));
    }
}
