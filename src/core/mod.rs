//! Core engine types: players, squares, RNG, configuration, errors.
//!
//! Everything here is independent of the Ludo rules themselves.

pub mod player;
pub mod square;
pub mod rng;
pub mod config;
pub mod error;

pub use player::{PlayerId, PlayerMap, TeamId, MAX_PLAYERS};
pub use square::{Square, GRID_SIZE};
pub use rng::{GameRng, DIE_FACES};
pub use config::{LudoConfig, MIN_PLAYERS};
pub use error::{LudoError, Result};
