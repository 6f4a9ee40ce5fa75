//! Arena - Chain Reaction match runner
//!
//! Seats two agents (human, random, minimax or MCTS) at one board and plays
//! one or more games:
//! 1. Loads settings from config.toml, `CHAIN_*` variables and the command line
//! 2. Builds the board geometry and the propagation backend
//! 3. Alternates the agents until a player captures every rival cell
//! 4. Logs a per-seat summary of the match

use anyhow::Result;
use engine_core::Player;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::sync::Arc;
use tracing::info;

mod agent;
mod arena;
mod config;
mod render;
mod stats;

use crate::agent::build_agent;
use crate::arena::{Arena, ArenaOptions};
use crate::config::Config;

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    // Parse and validate configuration
    let config = Config::load();
    config.validate()?;

    // Initialize tracing
    init_tracing(&config.log_level)?;
    info!(log_level = %config.log_level, "Tracing initialized");

    let geometry = config.geometry()?;
    let backend = config.backend()?;
    let engine = backend.build(Arc::clone(&geometry))?;
    info!(
        rows = geometry.rows(),
        cols = geometry.cols(),
        backend = %backend,
        "Board ready"
    );

    let mut seeder = match config.seed {
        Some(seed) => {
            info!(seed, "Using fixed seed");
            ChaCha20Rng::seed_from_u64(seed)
        }
        None => ChaCha20Rng::from_entropy(),
    };

    let [first, second] = config.seats()?;
    let agents = [
        build_agent(first, Player::First, &config, &engine, seeder.gen())?,
        build_agent(second, Player::Second, &config, &engine, seeder.gen())?,
    ];
    let names = [agents[0].name().to_string(), agents[1].name().to_string()];

    let options = ArenaOptions {
        animate: config.animate,
        frame_delay: config.frame_delay(),
        show_boards: config.animate || config.games == 1,
    };

    let mut arena = Arena::new(geometry, engine, agents, options);
    let stats = arena.run(config.games, &mut std::io::stdout().lock())?;
    stats.log_summary([names[0].as_str(), names[1].as_str()]);

    Ok(())
}
