//! MCTS configuration parameters.

use std::time::Duration;

use thiserror::Error;

/// Rejected search configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("time_limit must be finite, non-negative and representable, got {0}")]
    InvalidTimeLimit(f64),

    #[error("c_param must be finite and non-negative, got {0}")]
    InvalidExploration(f64),

    #[error("log_base must be finite and greater than 1, got {0}")]
    InvalidLogBase(f64),

    #[error("min_iterations must be at least 1")]
    ZeroMinIterations,

    #[error("max_iterations ({max}) is below min_iterations ({min})")]
    IterationBounds { min: u32, max: u32 },

    #[error("max_rollout_plies must be at least 1")]
    ZeroRolloutPlies,
}

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone)]
pub struct MctsConfig {
    /// Wall-clock budget per decision. Checked between iterations only.
    pub time_limit: Duration,

    /// Exploration constant of the UCT formula.
    /// Higher values favor rarely visited children.
    pub c_param: f64,

    /// Base of the logarithm in the exploration term.
    /// Changing it rescales exploration the same way for every child.
    pub log_base: f64,

    /// Iterations run even when the time budget is already spent.
    pub min_iterations: u32,

    /// Hard cap on iterations, mostly for reproducible tests and benchmarks.
    pub max_iterations: Option<u32>,

    /// Rollouts longer than this are scored as a draw.
    pub max_rollout_plies: u32,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(1),
            c_param: 1.5,
            log_base: 10.0,
            min_iterations: 1,
            max_iterations: None,
            max_rollout_plies: 10_000,
        }
    }
}

impl MctsConfig {
    /// Create a fast config for testing: iteration bound instead of a clock.
    pub fn for_testing() -> Self {
        Self {
            time_limit: Duration::ZERO,
            min_iterations: 200,
            max_iterations: Some(200),
            ..Self::default()
        }
    }

    /// Builder pattern: set the time budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = limit;
        self
    }

    /// Builder pattern: set the exploration constant.
    pub fn with_c_param(mut self, c: f64) -> Self {
        self.c_param = c;
        self
    }

    /// Builder pattern: set the logarithm base of the exploration term.
    pub fn with_log_base(mut self, base: f64) -> Self {
        self.log_base = base;
        self
    }

    /// Builder pattern: run exactly `n` iterations regardless of the clock.
    pub fn with_iterations(mut self, n: u32) -> Self {
        self.min_iterations = n;
        self.max_iterations = Some(n);
        self.time_limit = Duration::ZERO;
        self
    }

    /// Builder pattern: set the minimum number of iterations.
    pub fn with_min_iterations(mut self, n: u32) -> Self {
        self.min_iterations = n;
        self
    }

    /// Builder pattern: set the rollout length cap.
    pub fn with_max_rollout_plies(mut self, plies: u32) -> Self {
        self.max_rollout_plies = plies;
        self
    }

    /// Build a config from a time limit in seconds and an exploration constant.
    ///
    /// Negative, non-finite and out-of-range limits are rejected.
    pub fn from_secs(time_limit_secs: f64, c_param: f64) -> Result<Self, ConfigError> {
        let time_limit = Duration::try_from_secs_f64(time_limit_secs)
            .map_err(|_| ConfigError::InvalidTimeLimit(time_limit_secs))?;
        let config = Self::default()
            .with_time_limit(time_limit)
            .with_c_param(c_param);
        config.validate()?;
        Ok(config)
    }

    /// Check that the search can run with these parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.c_param.is_finite() || self.c_param < 0.0 {
            return Err(ConfigError::InvalidExploration(self.c_param));
        }
        if !self.log_base.is_finite() || self.log_base <= 1.0 {
            return Err(ConfigError::InvalidLogBase(self.log_base));
        }
        if self.min_iterations == 0 {
            return Err(ConfigError::ZeroMinIterations);
        }
        if let Some(max) = self.max_iterations {
            if max < self.min_iterations {
                return Err(ConfigError::IterationBounds {
                    min: self.min_iterations,
                    max,
                });
            }
        }
        if self.max_rollout_plies == 0 {
            return Err(ConfigError::ZeroRolloutPlies);
        }
        Ok(())
    }
}
