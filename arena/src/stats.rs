//! Match statistics.
//!
//! Tracks game outcomes per seat, game lengths and the time each seat spends
//! choosing moves.

use engine_core::{Outcome, Player};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Default, Clone)]
pub struct MatchStats {
    games: u32,
    wins: [u32; 2],
    draws: u32,
    total_plies: u64,
    decisions: [u32; 2],
    decision_time: [Duration; 2],
}

impl MatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished game.
    pub fn record_game(&mut self, outcome: Outcome, plies: u32) {
        self.games += 1;
        self.total_plies += plies as u64;
        match outcome {
            Outcome::Win(player) => self.wins[player.id() as usize] += 1,
            Outcome::Draw => self.draws += 1,
        }
    }

    /// Record one move decision by `seat`.
    pub fn record_decision(&mut self, seat: Player, elapsed: Duration) {
        let idx = seat.id() as usize;
        self.decisions[idx] += 1;
        self.decision_time[idx] += elapsed;
    }

    pub fn games(&self) -> u32 {
        self.games
    }

    pub fn wins(&self, seat: Player) -> u32 {
        self.wins[seat.id() as usize]
    }

    pub fn draws(&self) -> u32 {
        self.draws
    }

    pub fn avg_plies(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_plies as f64 / self.games as f64
        }
    }

    /// Mean decision time of `seat` in milliseconds.
    pub fn avg_decision_ms(&self, seat: Player) -> f64 {
        let idx = seat.id() as usize;
        if self.decisions[idx] == 0 {
            0.0
        } else {
            self.decision_time[idx].as_secs_f64() * 1000.0 / self.decisions[idx] as f64
        }
    }

    /// Log a summary of the match.
    pub fn log_summary(&self, names: [&str; 2]) {
        info!(
            games = self.games,
            draws = self.draws,
            avg_plies = format!("{:.1}", self.avg_plies()),
            "Match finished"
        );
        for seat in Player::BOTH {
            info!(
                agent = names[seat.id() as usize],
                wins = self.wins(seat),
                avg_decision_ms = format!("{:.1}", self.avg_decision_ms(seat)),
                "Seat summary"
            );
        }
    }
}
