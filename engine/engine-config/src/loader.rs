//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use crate::CentralConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",    // Current directory
    "../config.toml", // Parent directory (when running from subdirectory)
];

/// Load the central configuration from config.toml.
///
/// Searches for config.toml in the following order:
/// 1. Path specified by CHAIN_CONFIG environment variable
/// 2. Current directory (config.toml)
/// 3. Parent directory (../config.toml)
///
/// After loading, environment variable overrides are applied.
pub fn load_config() -> CentralConfig {
    // Check for explicit config path
    if let Ok(path) = std::env::var("CHAIN_CONFIG") {
        let path = PathBuf::from(&path);
        if path.exists() {
            info!("Loading config from CHAIN_CONFIG: {}", path.display());
            return load_from_path(&path);
        }
        warn!(
            "CHAIN_CONFIG={} not found, searching defaults",
            path.display()
        );
    }

    // Search default locations
    for path_str in CONFIG_SEARCH_PATHS {
        let path = PathBuf::from(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(&path);
        }
    }

    // Fall back to defaults
    debug!("No config.toml found, using built-in defaults");
    apply_env_overrides(CentralConfig::default())
}

/// Load configuration from a specific path.
pub fn load_from_path(path: &Path) -> CentralConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => apply_env_overrides(config),
            Err(e) => {
                warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                apply_env_overrides(CentralConfig::default())
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}, using defaults", path.display(), e);
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (u32, usize, f64, bool, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        if let Ok(v) =
            std::env::var($key).and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            $config.$section.$field = v;
        }
    };
    // Optional parseable field (Option<u32>, Option<u64>, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, optional_parse) => {
        if let Ok(v) =
            std::env::var($key).and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            $config.$section.$field = Some(v);
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: CHAIN_<SECTION>_<KEY>.
/// Values that fail to parse are ignored.
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    // Common
    env_override!(config, common.log_level, "CHAIN_COMMON_LOG_LEVEL");
    env_override!(config, common.rows, "CHAIN_COMMON_ROWS", parse);
    env_override!(config, common.cols, "CHAIN_COMMON_COLS", parse);
    env_override!(config, common.backend, "CHAIN_COMMON_BACKEND");

    // Minimax
    env_override!(config, minimax.depth, "CHAIN_MINIMAX_DEPTH", parse);
    env_override!(config, minimax.samples, "CHAIN_MINIMAX_SAMPLES", parse);

    // MCTS
    env_override!(
        config,
        mcts.time_limit_secs,
        "CHAIN_MCTS_TIME_LIMIT_SECS",
        parse
    );
    env_override!(config, mcts.c_param, "CHAIN_MCTS_C_PARAM", parse);
    env_override!(config, mcts.log_base, "CHAIN_MCTS_LOG_BASE", parse);
    env_override!(
        config,
        mcts.min_iterations,
        "CHAIN_MCTS_MIN_ITERATIONS",
        parse
    );
    env_override!(
        config,
        mcts.max_iterations,
        "CHAIN_MCTS_MAX_ITERATIONS",
        optional_parse
    );
    env_override!(
        config,
        mcts.max_rollout_plies,
        "CHAIN_MCTS_MAX_ROLLOUT_PLIES",
        parse
    );

    // Arena
    env_override!(config, arena.player_one, "CHAIN_ARENA_PLAYER_ONE");
    env_override!(config, arena.player_two, "CHAIN_ARENA_PLAYER_TWO");
    env_override!(config, arena.games, "CHAIN_ARENA_GAMES", parse);
    env_override!(config, arena.seed, "CHAIN_ARENA_SEED", optional_parse);
    env_override!(config, arena.animate, "CHAIN_ARENA_ANIMATE", parse);
    env_override!(
        config,
        arena.frame_delay_ms,
        "CHAIN_ARENA_FRAME_DELAY_MS",
        parse
    );

    config
}
