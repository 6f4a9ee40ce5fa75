//! Configuration for the arena driver
//!
//! Configuration is loaded from config.toml with environment variable overrides.
//! CLI arguments take highest priority, followed by env vars, then config.toml.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use engine_config::{load_config, CentralConfig};
use engine_core::{Backend, BoardGeometry};
use mcts::MctsConfig;
use minimax::MinimaxConfig;
use once_cell::sync::Lazy;
use std::sync::Arc;
use std::time::Duration;
use tracing::level_filters::LevelFilter;

use crate::agent::AgentKind;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

// Default value functions that read from central config
fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}

fn default_rows() -> usize {
    CENTRAL_CONFIG.common.rows
}

fn default_cols() -> usize {
    CENTRAL_CONFIG.common.cols
}

fn default_backend() -> String {
    CENTRAL_CONFIG.common.backend.clone()
}

fn default_player_one() -> String {
    CENTRAL_CONFIG.arena.player_one.clone()
}

fn default_player_two() -> String {
    CENTRAL_CONFIG.arena.player_two.clone()
}

fn default_games() -> u32 {
    CENTRAL_CONFIG.arena.games
}

fn default_animate() -> bool {
    CENTRAL_CONFIG.arena.animate
}

fn default_frame_delay() -> u64 {
    CENTRAL_CONFIG.arena.frame_delay_ms
}

fn default_depth() -> u32 {
    CENTRAL_CONFIG.minimax.depth
}

fn default_samples() -> usize {
    CENTRAL_CONFIG.minimax.samples
}

fn default_time_limit() -> f64 {
    CENTRAL_CONFIG.mcts.time_limit_secs
}

fn default_c_param() -> f64 {
    CENTRAL_CONFIG.mcts.c_param
}

fn default_log_base() -> f64 {
    CENTRAL_CONFIG.mcts.log_base
}

fn default_min_iterations() -> u32 {
    CENTRAL_CONFIG.mcts.min_iterations
}

fn default_max_rollout_plies() -> u32 {
    CENTRAL_CONFIG.mcts.max_rollout_plies
}

#[derive(Parser, Debug, Clone)]
#[command(name = "chain-arena")]
#[command(about = "Chain Reaction - play matches between humans and search agents")]
#[command(
    long_about = "Plays Chain Reaction on an R x C grid. Each seat is taken by a human
(reading 'row col' from stdin), a random mover, the minimax agent or the MCTS agent.

Configuration is loaded from config.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,

    /// Board rows
    #[arg(long, default_value_t = default_rows())]
    pub rows: usize,

    /// Board columns
    #[arg(long, default_value_t = default_cols())]
    pub cols: usize,

    /// Propagation backend (reference, fixed)
    #[arg(long, default_value_t = default_backend())]
    pub backend: String,

    /// Agent in the first seat (human, random, minimax, mcts)
    #[arg(long, default_value_t = default_player_one())]
    pub player_one: String,

    /// Agent in the second seat (human, random, minimax, mcts)
    #[arg(long, default_value_t = default_player_two())]
    pub player_two: String,

    /// Number of games to play
    #[arg(long, default_value_t = default_games())]
    pub games: u32,

    /// RNG seed for reproducible matches (entropy when absent)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Play every move one explosion wave at a time
    #[arg(long, default_value_t = default_animate())]
    pub animate: bool,

    /// Pause between animation frames in milliseconds
    #[arg(long, default_value_t = default_frame_delay())]
    pub frame_delay_ms: u64,

    /// Minimax depth in max/min round trips
    #[arg(long, default_value_t = default_depth())]
    pub depth: u32,

    /// Number of top minimax moves to sample from
    #[arg(long, default_value_t = default_samples())]
    pub samples: usize,

    /// MCTS time budget per move in seconds
    #[arg(long, default_value_t = default_time_limit())]
    pub time_limit_secs: f64,

    /// MCTS exploration constant
    #[arg(long, default_value_t = default_c_param())]
    pub c_param: f64,

    /// Base of the logarithm in the MCTS exploration term
    #[arg(long, default_value_t = default_log_base())]
    pub log_base: f64,

    /// Minimum MCTS iterations per move, even past the time budget
    #[arg(long, default_value_t = default_min_iterations())]
    pub min_iterations: u32,

    /// Fixed MCTS iteration count per move; replaces the time budget
    #[arg(long)]
    pub max_iterations: Option<u32>,

    /// Random rollouts longer than this count as draws
    #[arg(long, default_value_t = default_max_rollout_plies())]
    pub max_rollout_plies: u32,
}

impl Config {
    /// Parse the command line, filling optional values from the central config.
    pub fn load() -> Self {
        let mut config = Self::parse();
        config.seed = config.seed.or(CENTRAL_CONFIG.arena.seed);
        config.max_iterations = config.max_iterations.or(CENTRAL_CONFIG.mcts.max_iterations);
        config
    }

    pub fn validate(&self) -> Result<()> {
        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        if self.games == 0 {
            return Err(anyhow!("games must be greater than 0"));
        }

        self.backend()?
            .build(self.geometry()?)
            .context("backend does not support this board")?;
        self.seats()?;
        self.minimax_config()
            .validate()
            .context("invalid minimax settings")?;
        self.mcts_config()?;

        Ok(())
    }

    pub fn backend(&self) -> Result<Backend> {
        self.backend
            .parse()
            .with_context(|| format!("invalid backend '{}'", self.backend))
    }

    pub fn geometry(&self) -> Result<Arc<BoardGeometry>> {
        let geometry = BoardGeometry::new(self.rows, self.cols)
            .with_context(|| format!("invalid board shape {}x{}", self.rows, self.cols))?;
        Ok(Arc::new(geometry))
    }

    /// Agent kinds for the first and second seat.
    pub fn seats(&self) -> Result<[AgentKind; 2]> {
        Ok([self.player_one.parse()?, self.player_two.parse()?])
    }

    pub fn minimax_config(&self) -> MinimaxConfig {
        MinimaxConfig::new(self.depth, self.samples)
    }

    pub fn mcts_config(&self) -> Result<MctsConfig> {
        let mut config = MctsConfig::from_secs(self.time_limit_secs, self.c_param)
            .context("invalid MCTS settings")?
            .with_log_base(self.log_base)
            .with_min_iterations(self.min_iterations)
            .with_max_rollout_plies(self.max_rollout_plies);
        if let Some(n) = self.max_iterations {
            config = config.with_iterations(n);
        }
        config.validate().context("invalid MCTS settings")?;
        Ok(config)
    }

    pub fn frame_delay(&self) -> Duration {
        Duration::from_millis(self.frame_delay_ms)
    }
}
