use std::{fs, num::NonZeroUsize, path::Path};

use serde::{Deserialize, Serialize};

use crate::{MlErr, Result};

const DEFAULT_LEARNING_RATE: f64 = 0.01;
const DEFAULT_ITERATIONS: usize = 1000;
const DEFAULT_LOG_EVERY: NonZeroUsize = NonZeroUsize::new(100).unwrap();

/// Hyper parameters for a single training run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrainingConfig {
    #[serde(default = "default_learning_rate")]
    learning_rate: f64,
    #[serde(default = "default_iterations")]
    iterations: usize,
    /// How often progress is logged, in iterations.
    #[serde(default = "default_log_every")]
    log_every: NonZeroUsize,
}

fn default_learning_rate() -> f64 {
    DEFAULT_LEARNING_RATE
}

fn default_iterations() -> usize {
    DEFAULT_ITERATIONS
}

fn default_log_every() -> NonZeroUsize {
    DEFAULT_LOG_EVERY
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: DEFAULT_LEARNING_RATE,
            iterations: DEFAULT_ITERATIONS,
            log_every: DEFAULT_LOG_EVERY,
        }
    }
}

impl TrainingConfig {
    /// Creates a new training configuration.
    ///
    /// # Args
    /// * `learning_rate` - Step size for gradient descent, must be finite and positive.
    /// * `iterations` - Number of gradient descent iterations, at least one.
    ///
    /// # Errors
    /// Returns `MlErr::InvalidConfig` if any bound is violated.
    pub fn new(learning_rate: f64, iterations: usize) -> Result<Self> {
        let config = Self {
            learning_rate,
            iterations,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration from a JSON file, missing keys take their default value.
    ///
    /// # Errors
    /// `MlErr::Io` if the file can't be read, `MlErr::InvalidConfig` if it can't be parsed
    /// or holds invalid values.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)
            .map_err(|e| MlErr::InvalidConfig(format!("invalid JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_log_every(mut self, log_every: NonZeroUsize) -> Self {
        self.log_every = log_every;
        self
    }

    /// Checks the bounds every configuration must satisfy.
    pub fn validate(&self) -> Result<()> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(MlErr::InvalidConfig(format!(
                "learning rate must be a positive number, got {}",
                self.learning_rate
            )));
        }

        if self.iterations == 0 {
            return Err(MlErr::InvalidConfig(
                "iterations must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    #[inline]
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    #[inline]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    #[inline]
    pub fn log_every(&self) -> NonZeroUsize {
        self.log_every
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_calling_convention() {
        let config = TrainingConfig::default();
        assert_eq!(config.learning_rate(), 0.01);
        assert_eq!(config.iterations(), 1000);
        assert_eq!(config.log_every().get(), 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn new_rejects_bad_learning_rates() {
        for lr in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(TrainingConfig::new(lr, 10), Err(MlErr::InvalidConfig(_))),
                "{lr} was accepted"
            );
        }
    }

    #[test]
    fn new_rejects_zero_iterations() {
        assert!(matches!(
            TrainingConfig::new(0.1, 0),
            Err(MlErr::InvalidConfig(_))
        ));
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let config = TrainingConfig::from_json_str(r#"{ "learning_rate": 0.1 }"#).unwrap();
        assert_eq!(config.learning_rate(), 0.1);
        assert_eq!(config.iterations(), 1000);
    }

    #[test]
    fn json_is_validated() {
        assert!(matches!(
            TrainingConfig::from_json_str(r#"{ "iterations": 0 }"#),
            Err(MlErr::InvalidConfig(_))
        ));
        assert!(matches!(
            TrainingConfig::from_json_str(r#"{ "momentum": 0.9 }"#),
            Err(MlErr::InvalidConfig(_))
        ));
        assert!(matches!(
            TrainingConfig::from_json_str("not json"),
            Err(MlErr::InvalidConfig(_))
        ));
    }
}
