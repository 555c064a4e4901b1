//! # ludo-engine
//!
//! Rules engine and unattended simulator for four-color Ludo on a 15x15 board.
//!
//! ## Design Principles
//!
//! 1. **Static geometry, mutable tokens**: every path, yard and safe square
//!    is computed once into a shared [`PathTable`]. Only token positions and
//!    per-player flags live in [`BoardState`].
//!
//! 2. **Outcomes, not errors**: a blocked or impossible move is a
//!    [`MoveOutcome`]. Errors are reserved for bad configuration and commands
//!    issued out of sequence.
//!
//! 3. **One lock**: manual play and the threaded simulation drive the same
//!    [`TurnSequencer`] over a single mutex-guarded [`GameState`].
//!
//! ## Modules
//!
//! - `core`: Players, squares, RNG, configuration, errors
//! - `board`: Path tables and token state
//! - `rules`: Movement resolution and captures
//! - `turn`: Turn state machine, move history, standings
//! - `sim`: Threaded simulation (player workers, line watchers, supervisor)
//! - `game`: The [`LudoGame`] facade

pub mod core;
pub mod board;
pub mod rules;
pub mod turn;
pub mod sim;
pub mod game;

// Re-export commonly used types
pub use crate::core::{
    GameRng, LudoConfig, LudoError, PlayerId, PlayerMap, Result, Square, TeamId,
};

pub use crate::board::{BoardState, Color, PathMode, PathTable, Token};

pub use crate::rules::{CaptureEngine, MoveOutcome, MovementResolver};

pub use crate::turn::{
    GameResult, GameState, MoveRecord, Placement, Standings, TurnPhase, TurnReport, TurnSequencer,
};

pub use crate::sim::{
    ScanLine, SimulationConfig, SimulationCoordinator, SimulationReport, TokenPolicy,
};

pub use crate::game::LudoGame;
