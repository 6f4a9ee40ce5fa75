//! Centralized configuration loading from config.toml.
//!
//! This crate provides configuration structs and loading logic shared
//! by the engine crates and the arena binary.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`CHAIN_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults (config.defaults.toml, embedded at compile time)
//!
//! Command-line flags of the arena binary sit above all three.
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! CHAIN_<SECTION>_<KEY>=value
//!
//! Examples:
//!     CHAIN_COMMON_ROWS=5
//!     CHAIN_COMMON_BACKEND=fixed
//!     CHAIN_MINIMAX_DEPTH=2
//!     CHAIN_MCTS_TIME_LIMIT_SECS=0.5
//!     CHAIN_ARENA_SEED=42
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{apply_env_overrides, load_config, load_from_path, CONFIG_SEARCH_PATHS};
pub use structs::*;
