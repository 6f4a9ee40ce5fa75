//! Minimax configuration parameters.

use thiserror::Error;
use tracing::warn;

/// Depths above this grow the tree combinatorially.
pub const RECOMMENDED_MAX_DEPTH: u32 = 2;

/// Rejected search configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("depth must be at least 1")]
    ZeroDepth,

    #[error("samples must be at least 1")]
    ZeroSamples,
}

/// Configuration for the minimax agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinimaxConfig {
    /// Max/min round trips before the heuristic is applied.
    /// Depth 1 searches 3 plies (max, min, evaluate), depth 2 searches 5.
    pub depth: u32,

    /// Number of top-ranked moves the final choice is sampled from.
    /// 1 makes the agent deterministic.
    pub samples: usize,
}

impl Default for MinimaxConfig {
    fn default() -> Self {
        Self {
            depth: 1,
            samples: 3,
        }
    }
}

impl MinimaxConfig {
    pub fn new(depth: u32, samples: usize) -> Self {
        Self { depth, samples }
    }

    /// Builder pattern: set search depth.
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    /// Builder pattern: set the number of sampled moves.
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    /// Check that the search can run with these parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        if self.samples == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        if self.depth > RECOMMENDED_MAX_DEPTH {
            warn!(
                depth = self.depth,
                recommended = RECOMMENDED_MAX_DEPTH,
                "Minimax depth above the recommended maximum, searches may be very slow"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MinimaxConfig::default();
        assert_eq!(config.depth, 1);
        assert_eq!(config.samples, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        assert_eq!(
            MinimaxConfig::default().with_depth(0).validate(),
            Err(ConfigError::ZeroDepth)
        );
        assert_eq!(
            MinimaxConfig::default().with_samples(0).validate(),
            Err(ConfigError::ZeroSamples)
        );
        // Deep searches are discouraged, not forbidden
        assert!(MinimaxConfig::new(4, 1).validate().is_ok());
    }
}
