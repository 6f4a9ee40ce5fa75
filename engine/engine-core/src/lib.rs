//! Core rules for the Chain Reaction board game
//!
//! This crate provides the game model shared by the agents and the driver:
//! - `BoardGeometry`: neighbor table and cell capacities for an R x C grid
//! - `Board` / `Player`: signed orb counts and the two players
//! - `PropagationEngine`: applies a move and its chain reaction, with a
//!   reference backend for any shape and a fixed 9x6 backend
//! - `Cascade`: the same chain reaction one explosion wave at a time
//! - `GameState`: turn order, winner tracking and animated play

pub mod board;
pub mod fixed;
pub mod game;
pub mod geometry;
pub mod propagation;

// Re-export main types for convenience
pub use board::{Board, Player};
pub use fixed::{FixedGridEngine, FIXED_COLS, FIXED_ROWS};
pub use game::{AnimationFrame, GameState, MoveError, Outcome};
pub use geometry::{BoardGeometry, GeometryError, MAX_CELLS};
pub use propagation::{
    place_orb, Backend, Cascade, CascadeStep, EngineError, OwnershipTally, PropagationEngine,
    ReferenceEngine,
};
