//! Engine configuration

use crate::engine::error::EngineError;
use hobart_output::ConfidenceTier;
use serde::{Deserialize, Serialize};

/// Run-level policy that is not part of the factor model itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum number of factors with data for a security to be scored.
    pub min_factor_count: usize,

    /// Completeness at or above which a security with every factor is high confidence.
    pub high_confidence_completeness: f64,

    /// Completeness at or above which a security is medium confidence.
    pub medium_confidence_completeness: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_factor_count: 1,
            high_confidence_completeness: 0.75,
            medium_confidence_completeness: 0.40,
        }
    }
}

impl EngineConfig {
    /// Require at least `count` factors with data.
    pub const fn with_min_factor_count(mut self, count: usize) -> Self {
        self.min_factor_count = count;
        self
    }

    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        serde_json::from_str(json).map_err(|e| EngineError::InvalidConfig(e.to_string()))
    }

    /// Check the thresholds against each other and against the model size.
    pub fn validate(&self, factor_count: usize) -> Result<(), EngineError> {
        if self.min_factor_count == 0 {
            return Err(EngineError::InvalidConfig(
                "min_factor_count must be at least 1".to_string(),
            ));
        }
        if self.min_factor_count > factor_count {
            return Err(EngineError::InvalidConfig(format!(
                "min_factor_count {} exceeds the {} factors in the model",
                self.min_factor_count, factor_count
            )));
        }
        for (name, value) in [
            ("high_confidence_completeness", self.high_confidence_completeness),
            ("medium_confidence_completeness", self.medium_confidence_completeness),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(EngineError::InvalidConfig(format!(
                    "{name} must lie in [0, 1], got {value}"
                )));
            }
        }
        if self.medium_confidence_completeness > self.high_confidence_completeness {
            return Err(EngineError::InvalidConfig(
                "medium_confidence_completeness exceeds high_confidence_completeness".to_string(),
            ));
        }
        Ok(())
    }

    /// Confidence tier for a security's completeness and factor coverage.
    pub fn confidence(
        &self,
        completeness: f64,
        factors_used: usize,
        factor_count: usize,
    ) -> ConfidenceTier {
        if completeness >= self.high_confidence_completeness && factors_used == factor_count {
            ConfidenceTier::High
        } else if completeness >= self.medium_confidence_completeness {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }
}
