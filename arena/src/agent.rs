//! Move selection for each seat of a match.

use anyhow::{anyhow, bail, Context, Result};
use engine_core::{GameState, Player, PropagationEngine};
use mcts::{run_mcts, MctsConfig};
use minimax::{MinimaxConfig, MinimaxSearch, PositionalHeuristic};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::fmt;
use std::io::{BufRead, Write};
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

use crate::config::Config;

/// Something that picks a cell for the player to act.
pub trait Agent {
    fn name(&self) -> &str;

    /// Pick a legal cell for `state.to_move()`.
    fn choose(&mut self, state: &GameState) -> Result<usize>;

    /// Interactive agents need the board printed before every turn.
    fn is_interactive(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    Human,
    Random,
    Minimax,
    Mcts,
}

impl AgentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AgentKind::Human => "human",
            AgentKind::Random => "random",
            AgentKind::Minimax => "minimax",
            AgentKind::Mcts => "mcts",
        }
    }
}

impl FromStr for AgentKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "human" => Ok(AgentKind::Human),
            "random" => Ok(AgentKind::Random),
            "minimax" => Ok(AgentKind::Minimax),
            "mcts" => Ok(AgentKind::Mcts),
            other => Err(anyhow!(
                "unknown agent '{}', expected one of human, random, minimax, mcts",
                other
            )),
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the agent for `seat`. Search agents get their own RNG stream.
pub fn build_agent(
    kind: AgentKind,
    seat: Player,
    config: &Config,
    engine: &Arc<dyn PropagationEngine>,
    seed: u64,
) -> Result<Box<dyn Agent>> {
    let name = format!("{} ({})", kind, seat);
    let rng = ChaCha20Rng::seed_from_u64(seed);

    Ok(match kind {
        AgentKind::Human => Box::new(HumanAgent::new(
            name,
            std::io::stdin().lock(),
            std::io::stdout(),
        )),
        AgentKind::Random => Box::new(RandomAgent::new(name, rng)),
        AgentKind::Minimax => Box::new(MinimaxAgent::new(
            name,
            Arc::clone(engine),
            config.minimax_config(),
            rng,
        )?),
        AgentKind::Mcts => Box::new(MctsAgent::new(
            name,
            Arc::clone(engine),
            config.mcts_config()?,
            rng,
        )),
    })
}

/// Uniform choice among the legal cells.
#[derive(Debug)]
pub struct RandomAgent {
    name: String,
    rng: ChaCha20Rng,
}

impl RandomAgent {
    pub fn new(name: impl Into<String>, rng: ChaCha20Rng) -> Self {
        Self {
            name: name.into(),
            rng,
        }
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose(&mut self, state: &GameState) -> Result<usize> {
        state
            .valid_moves()
            .choose(&mut self.rng)
            .copied()
            .ok_or_else(|| anyhow!("{} has no legal move", state.to_move()))
    }
}

pub struct MinimaxAgent {
    name: String,
    engine: Arc<dyn PropagationEngine>,
    config: MinimaxConfig,
    rng: ChaCha20Rng,
}

impl MinimaxAgent {
    pub fn new(
        name: impl Into<String>,
        engine: Arc<dyn PropagationEngine>,
        config: MinimaxConfig,
        rng: ChaCha20Rng,
    ) -> Result<Self> {
        config.validate().context("invalid minimax settings")?;
        Ok(Self {
            name: name.into(),
            engine,
            config,
            rng,
        })
    }
}

impl Agent for MinimaxAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose(&mut self, state: &GameState) -> Result<usize> {
        let mut search =
            MinimaxSearch::new(&*self.engine, &PositionalHeuristic, self.config.clone())?;
        let result = search.run(state.board(), state.to_move(), &mut self.rng)?;
        debug!(
            agent = %self.name,
            cell = result.cell,
            score = result.score,
            nodes = result.stats.nodes,
            "Minimax move"
        );
        Ok(result.cell)
    }
}

pub struct MctsAgent {
    name: String,
    engine: Arc<dyn PropagationEngine>,
    config: MctsConfig,
    rng: ChaCha20Rng,
}

impl MctsAgent {
    pub fn new(
        name: impl Into<String>,
        engine: Arc<dyn PropagationEngine>,
        config: MctsConfig,
        rng: ChaCha20Rng,
    ) -> Self {
        Self {
            name: name.into(),
            engine,
            config,
            rng,
        }
    }
}

impl Agent for MctsAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose(&mut self, state: &GameState) -> Result<usize> {
        let result = run_mcts(
            &*self.engine,
            self.config.clone(),
            state.board(),
            state.to_move(),
            &mut self.rng,
        )?;
        debug!(
            agent = %self.name,
            cell = result.cell,
            value = result.value,
            iterations = result.iterations,
            "MCTS move"
        );
        Ok(result.cell)
    }
}

/// Reads `row col` lines until a legal cell is entered.
pub struct HumanAgent<R, W> {
    name: String,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> HumanAgent<R, W> {
    pub fn new(name: impl Into<String>, input: R, output: W) -> Self {
        Self {
            name: name.into(),
            input,
            output,
        }
    }
}

impl<R: BufRead, W: Write> Agent for HumanAgent<R, W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose(&mut self, state: &GameState) -> Result<usize> {
        let geometry = state.geometry();
        let player = state.to_move();
        let mut line = String::new();

        loop {
            write!(self.output, "{} (row col): ", player)?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                bail!("input closed while waiting for {}", player);
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            let cell = match parts.as_slice() {
                [row, col] => match (row.parse::<usize>(), col.parse::<usize>()) {
                    (Ok(row), Ok(col)) => geometry.index(row, col),
                    _ => None,
                },
                _ => None,
            };

            match cell {
                Some(cell) if state.board().is_valid_move(cell, player) => return Ok(cell),
                Some(_) => writeln!(self.output, "That cell belongs to {}", player.opponent())?,
                None => writeln!(
                    self.output,
                    "Enter a row below {} and a column below {}",
                    geometry.rows(),
                    geometry.cols()
                )?,
            }
        }
    }

    fn is_interactive(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::{Board, BoardGeometry, ReferenceEngine};
    use std::io::Cursor;

    fn setup(rows: usize, cols: usize) -> (Arc<dyn PropagationEngine>, GameState) {
        let geometry = Arc::new(BoardGeometry::new(rows, cols).unwrap());
        (
            Arc::new(ReferenceEngine::new(Arc::clone(&geometry))),
            GameState::new(geometry),
        )
    }

    #[test]
    fn test_agent_kind_parsing() {
        assert_eq!("MCTS".parse::<AgentKind>().unwrap(), AgentKind::Mcts);
        assert_eq!("human".parse::<AgentKind>().unwrap(), AgentKind::Human);
        let err = "oracle".parse::<AgentKind>().unwrap_err();
        assert!(err.to_string().contains("oracle"));
        assert_eq!(AgentKind::Minimax.to_string(), "minimax");
    }

    #[test]
    fn test_random_agent_picks_legal_cells() {
        let (engine, mut state) = setup(3, 3);
        let mut agent = RandomAgent::new("random", ChaCha20Rng::seed_from_u64(3));

        for _ in 0..6 {
            if state.is_over() {
                break;
            }
            let cell = agent.choose(&state).unwrap();
            assert!(state.board().is_valid_move(cell, state.to_move()));
            state.play(&*engine, cell).unwrap();
        }
    }

    #[test]
    fn test_search_agents_pick_legal_cells() {
        let (engine, state) = setup(4, 4);
        let mut minimax = MinimaxAgent::new(
            "minimax",
            Arc::clone(&engine),
            MinimaxConfig::default(),
            ChaCha20Rng::seed_from_u64(1),
        )
        .unwrap();
        let mut mcts = MctsAgent::new(
            "mcts",
            Arc::clone(&engine),
            MctsConfig::default().with_iterations(50),
            ChaCha20Rng::seed_from_u64(1),
        );

        let cell = minimax.choose(&state).unwrap();
        assert!(cell < 16);
        let cell = mcts.choose(&state).unwrap();
        assert!(cell < 16);
    }

    #[test]
    fn test_minimax_agent_rejects_zero_depth() {
        let (engine, _) = setup(3, 3);
        assert!(MinimaxAgent::new(
            "minimax",
            engine,
            MinimaxConfig::new(0, 3),
            ChaCha20Rng::seed_from_u64(1),
        )
        .is_err());
    }

    #[test]
    fn test_human_agent_reprompts_until_legal() {
        let (engine, mut state) = setup(3, 3);
        // First takes the corner, so Second cannot play there
        state.play(&*engine, 0).unwrap();
        assert_eq!(state.board(), &Board::from_cells(vec![1, 0, 0, 0, 0, 0, 0, 0, 0]));

        let input = Cursor::new("nonsense\n5 5\n0 0\n2 1\n");
        let mut output = Vec::new();
        let cell = {
            let mut agent = HumanAgent::new("human", input, &mut output);
            assert!(agent.is_interactive());
            agent.choose(&state).unwrap()
        };
        assert_eq!(cell, 7);

        let transcript = String::from_utf8(output).unwrap();
        assert_eq!(transcript.matches("(row col)").count(), 4);
        assert!(transcript.contains("belongs to player 0"));
    }

    #[test]
    fn test_human_agent_fails_on_closed_input() {
        let (_, state) = setup(3, 3);
        let mut agent = HumanAgent::new("human", Cursor::new(""), Vec::new());
        assert!(agent.choose(&state).is_err());
    }
}
