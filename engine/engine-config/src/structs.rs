//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_rows() -> usize {
    defaults::rows()
}
fn d_cols() -> usize {
    defaults::cols()
}
fn d_backend() -> String {
    defaults::backend().into()
}
fn d_depth() -> u32 {
    defaults::depth()
}
fn d_samples() -> usize {
    defaults::samples()
}
fn d_time_limit() -> f64 {
    defaults::time_limit_secs()
}
fn d_c_param() -> f64 {
    defaults::c_param()
}
fn d_log_base() -> f64 {
    defaults::log_base()
}
fn d_min_iterations() -> u32 {
    defaults::min_iterations()
}
fn d_max_rollout_plies() -> u32 {
    defaults::max_rollout_plies()
}
fn d_player_one() -> String {
    defaults::player_one().into()
}
fn d_player_two() -> String {
    defaults::player_two().into()
}
fn d_games() -> u32 {
    defaults::games()
}
fn d_animate() -> bool {
    defaults::animate()
}
fn d_frame_delay() -> u64 {
    defaults::frame_delay_ms()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub minimax: MinimaxConfig,
    #[serde(default)]
    pub mcts: MctsConfig,
    #[serde(default)]
    pub arena: ArenaConfig,
}

/// Board shape, propagation backend and logging shared by all components
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_log_level")]
    pub log_level: String,
    #[serde(default = "d_rows")]
    pub rows: usize,
    #[serde(default = "d_cols")]
    pub cols: usize,
    /// Propagation backend name, parsed by the engine
    #[serde(default = "d_backend")]
    pub backend: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::log_level().into(),
            rows: defaults::rows(),
            cols: defaults::cols(),
            backend: defaults::backend().into(),
        }
    }
}

/// Minimax agent configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MinimaxConfig {
    #[serde(default = "d_depth")]
    pub depth: u32,
    #[serde(default = "d_samples")]
    pub samples: usize,
}

impl Default for MinimaxConfig {
    fn default() -> Self {
        Self {
            depth: defaults::depth(),
            samples: defaults::samples(),
        }
    }
}

/// MCTS (Monte Carlo Tree Search) configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MctsConfig {
    /// Wall-clock budget per decision in seconds
    #[serde(default = "d_time_limit")]
    pub time_limit_secs: f64,
    #[serde(default = "d_c_param")]
    pub c_param: f64,
    #[serde(default = "d_log_base")]
    pub log_base: f64,
    #[serde(default = "d_min_iterations")]
    pub min_iterations: u32,
    /// Fixed iteration count; overrides the time limit when set
    #[serde(default)]
    pub max_iterations: Option<u32>,
    #[serde(default = "d_max_rollout_plies")]
    pub max_rollout_plies: u32,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: defaults::time_limit_secs(),
            c_param: defaults::c_param(),
            log_base: defaults::log_base(),
            min_iterations: defaults::min_iterations(),
            max_iterations: None,
            max_rollout_plies: defaults::max_rollout_plies(),
        }
    }
}

/// Match driver configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ArenaConfig {
    /// Agent kind in the first seat: human, random, minimax or mcts
    #[serde(default = "d_player_one")]
    pub player_one: String,
    #[serde(default = "d_player_two")]
    pub player_two: String,
    #[serde(default = "d_games")]
    pub games: u32,
    /// RNG seed; None seeds from entropy
    #[serde(default)]
    pub seed: Option<u64>,
    /// Play moves layer by layer and print every explosion wave
    #[serde(default = "d_animate")]
    pub animate: bool,
    #[serde(default = "d_frame_delay")]
    pub frame_delay_ms: u64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            player_one: defaults::player_one().into(),
            player_two: defaults::player_two().into(),
            games: defaults::games(),
            seed: None,
            animate: defaults::animate(),
            frame_delay_ms: defaults::frame_delay_ms(),
        }
    }
}
