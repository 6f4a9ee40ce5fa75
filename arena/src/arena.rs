//! Match loop alternating two agents on one board.

use anyhow::{Context, Result};
use engine_core::{BoardGeometry, GameState, Outcome, PropagationEngine};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::agent::Agent;
use crate::render::{render_board, render_frame};
use crate::stats::MatchStats;

#[derive(Debug, Clone, Default)]
pub struct ArenaOptions {
    /// Play each move one explosion wave at a time and print every wave
    pub animate: bool,
    /// Pause after each printed wave
    pub frame_delay: Duration,
    /// Print the board before every move
    pub show_boards: bool,
}

/// Result of one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameRecord {
    pub outcome: Outcome,
    pub plies: u32,
}

pub struct Arena {
    geometry: Arc<BoardGeometry>,
    engine: Arc<dyn PropagationEngine>,
    agents: [Box<dyn Agent>; 2],
    options: ArenaOptions,
    stats: MatchStats,
}

impl Arena {
    pub fn new(
        geometry: Arc<BoardGeometry>,
        engine: Arc<dyn PropagationEngine>,
        agents: [Box<dyn Agent>; 2],
        options: ArenaOptions,
    ) -> Self {
        Self {
            geometry,
            engine,
            agents,
            options,
            stats: MatchStats::new(),
        }
    }

    /// Play `games` games with fixed seats and return the accumulated stats.
    pub fn run<W: Write>(&mut self, games: u32, out: &mut W) -> Result<MatchStats> {
        info!(
            games,
            first = self.agents[0].name(),
            second = self.agents[1].name(),
            "Starting match"
        );

        // Progress bar for multi-game runs (only when stderr is a TTY)
        let progress = if games > 1 && std::io::IsTerminal::is_terminal(&std::io::stderr()) {
            let pb = ProgressBar::new(games as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} games ({eta})")?
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        for game in 1..=games {
            let record = self.play_game(out)?;
            self.stats.record_game(record.outcome, record.plies);
            debug!(game, outcome = ?record.outcome, plies = record.plies, "Game finished");

            if self.options.show_boards {
                match record.outcome {
                    Outcome::Win(player) => writeln!(
                        out,
                        "{} wins after {} moves",
                        self.agents[player.id() as usize].name(),
                        record.plies
                    )?,
                    Outcome::Draw => writeln!(out, "Draw after {} moves", record.plies)?,
                }
            }

            if let Some(ref pb) = progress {
                pb.inc(1);
            }
        }

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        Ok(self.stats.clone())
    }

    /// Play a single game from an empty board.
    pub fn play_game<W: Write>(&mut self, out: &mut W) -> Result<GameRecord> {
        let mut state = GameState::new(Arc::clone(&self.geometry));

        loop {
            if let Some(outcome) = state.outcome() {
                if self.options.show_boards {
                    writeln!(out, "{}", render_board(&self.geometry, state.board()))?;
                }
                return Ok(GameRecord {
                    outcome,
                    plies: state.moves_played(),
                });
            }

            let seat = state.to_move();
            let agent = &mut self.agents[seat.id() as usize];
            if self.options.show_boards || agent.is_interactive() {
                writeln!(out, "{}", render_board(&self.geometry, state.board()))?;
            }

            let start = Instant::now();
            let cell = agent
                .choose(&state)
                .with_context(|| format!("{} failed to choose a move", agent.name()))?;
            self.stats.record_decision(seat, start.elapsed());

            let (row, col) = self.geometry.coords(cell);
            debug!(agent = agent.name(), cell, row, col, "Move chosen");
            if self.options.show_boards {
                writeln!(out, "{} plays ({}, {})", agent.name(), row, col)?;
            }

            if self.options.animate {
                let mut cascade = state.start_move(cell)?;
                while !cascade.is_settled() {
                    let frame = state.advance(&mut cascade);
                    if frame.exploded.is_empty() {
                        continue;
                    }
                    writeln!(
                        out,
                        "{}",
                        render_frame(&self.geometry, state.board(), &frame)
                    )?;
                    if !self.options.frame_delay.is_zero() {
                        std::thread::sleep(self.options.frame_delay);
                    }
                }
            } else {
                state.play(&*self.engine, cell)?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{HumanAgent, RandomAgent};
    use engine_core::{Player, ReferenceEngine};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::io::Cursor;

    fn random_arena(rows: usize, cols: usize, seed: u64, options: ArenaOptions) -> Arena {
        let geometry = Arc::new(BoardGeometry::new(rows, cols).unwrap());
        let engine: Arc<dyn PropagationEngine> = Arc::new(ReferenceEngine::new(Arc::clone(&geometry)));
        let agents: [Box<dyn Agent>; 2] = [
            Box::new(RandomAgent::new("one", ChaCha20Rng::seed_from_u64(seed))),
            Box::new(RandomAgent::new("two", ChaCha20Rng::seed_from_u64(seed + 1))),
        ];
        Arena::new(geometry, engine, agents, options)
    }

    #[test]
    fn test_random_game_ends_with_a_winner() {
        let mut arena = random_arena(3, 3, 11, ArenaOptions::default());
        let mut out = Vec::new();

        let record = arena.play_game(&mut out).unwrap();
        assert!(matches!(record.outcome, Outcome::Win(_)));
        // A win needs at least one move from each side
        assert!(record.plies >= 3);
        assert!(out.is_empty());
    }

    #[test]
    fn test_animated_play_matches_atomic_play() {
        for seed in 0..5 {
            let mut atomic = random_arena(4, 4, seed, ArenaOptions::default());
            let mut animated = random_arena(
                4,
                4,
                seed,
                ArenaOptions {
                    animate: true,
                    ..ArenaOptions::default()
                },
            );

            let a = atomic.play_game(&mut Vec::new()).unwrap();
            let b = animated.play_game(&mut Vec::new()).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_run_accumulates_stats() {
        let mut arena = random_arena(3, 3, 5, ArenaOptions::default());
        let stats = arena.run(4, &mut Vec::new()).unwrap();

        assert_eq!(stats.games(), 4);
        assert_eq!(
            stats.wins(Player::First) + stats.wins(Player::Second) + stats.draws(),
            4
        );
        assert!(stats.avg_plies() >= 3.0);
    }

    #[test]
    fn test_show_boards_reports_result() {
        let mut arena = random_arena(
            2,
            2,
            3,
            ArenaOptions {
                show_boards: true,
                ..ArenaOptions::default()
            },
        );
        let mut out = Vec::new();
        arena.run(1, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(" plays ("));
        assert!(text.contains("wins after"));
    }

    #[test]
    fn test_agent_failure_aborts_game() {
        let geometry = Arc::new(BoardGeometry::new(3, 3).unwrap());
        let engine: Arc<dyn PropagationEngine> = Arc::new(ReferenceEngine::new(Arc::clone(&geometry)));
        let agents: [Box<dyn Agent>; 2] = [
            Box::new(HumanAgent::new("human", Cursor::new("1 1\n"), Vec::new())),
            Box::new(RandomAgent::new("random", ChaCha20Rng::seed_from_u64(0))),
        ];
        let mut arena = Arena::new(geometry, engine, agents, ArenaOptions::default());

        let mut out = Vec::new();
        let err = arena.play_game(&mut out).unwrap_err();
        assert!(err.to_string().contains("human failed to choose a move"));
        // The interactive seat always sees the board
        assert!(String::from_utf8(out).unwrap().contains(" 0 "));
    }
}
