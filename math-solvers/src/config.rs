//! Configuration for the LU factorization engine

use crate::error::{Result, SolverError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// LU factorization configuration
///
/// # Example JSON
///
/// ```json
/// { "alpha": 1.0, "pivot_tolerance": 1, "singular_tolerance": 1 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LuConfig {
    /// Diagonal value of L (usually 1)
    pub alpha: f64,
    /// Epsilon multiplier used when matching the scaled pivot candidate
    pub pivot_tolerance: usize,
    /// Epsilon multiplier per elimination step for the singularity test
    pub singular_tolerance: usize,
}

impl Default for LuConfig {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            pivot_tolerance: 1,
            singular_tolerance: 1,
        }
    }
}

impl LuConfig {
    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !self.alpha.is_finite() || self.alpha == 0.0 {
            return Err(SolverError::InvalidConfig(format!(
                "alpha must be finite and non-zero, got {}",
                self.alpha
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: LuConfig = serde_json::from_str(json)
            .map_err(|e| SolverError::InvalidConfig(format!("failed to parse JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref()).map_err(|e| {
            SolverError::InvalidConfig(format!(
                "failed to read {}: {e}",
                path.as_ref().display()
            ))
        })?;
        Self::from_json_str(&text)
    }
}
