//! Turn sequencing: whose turn it is, what they may do, and when the game
//! ends.

pub mod state;
pub mod sequencer;
pub mod standings;

pub use state::{GameState, MoveRecord, TurnPhase};
pub use sequencer::{TurnReport, TurnSequencer};
pub use standings::{GameResult, Placement, Standings};
