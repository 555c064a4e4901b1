//! Unattended play on worker threads.

pub mod config;
pub mod coordinator;
pub mod policy;

pub use config::{ScanLine, SimulationConfig};
pub use coordinator::{lock, share, SharedGame, SimulationCoordinator, SimulationReport};
pub use policy::{FurthestFirst, TokenPolicy, UniformRandom};
