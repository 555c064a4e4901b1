//! Simulation configuration parameters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{Square, GRID_SIZE};

/// One board line watched by a capture scanner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScanLine {
    Row(u8),
    Col(u8),
}

impl ScanLine {
    /// Every row and every column of the grid.
    pub fn all() -> impl Iterator<Item = ScanLine> {
        (0..GRID_SIZE).map(ScanLine::Row).chain((0..GRID_SIZE).map(ScanLine::Col))
    }

    /// Whether `square` lies on this line.
    #[must_use]
    pub fn contains(self, square: Square) -> bool {
        match self {
            ScanLine::Row(r) => square.row == r,
            ScanLine::Col(c) => square.col == c,
        }
    }
}

impl std::fmt::Display for ScanLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanLine::Row(r) => write!(f, "row {r}"),
            ScanLine::Col(c) => write!(f, "col {c}"),
        }
    }
}

/// Simulation configuration parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// How often each line watcher sweeps its line for overlaps.
    pub scan_interval: Duration,

    /// Supervisor tick.
    pub supervisor_interval: Duration,

    /// Consecutive supervisor ticks without a six or capture before a player
    /// is eliminated (0 = never).
    pub stall_threshold: u32,

    /// Upper bound on how long a player worker sleeps before re-checking
    /// whether it may move.
    pub poll_interval: Duration,

    /// Pause after each move, outside the lock.
    pub move_delay: Duration,

    /// Lines watched by capture scanners, one thread each.
    pub scan_lines: Vec<ScanLine>,

    /// Seed for token choice. `None` forks the game's dice RNG.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            scan_interval: Duration::from_millis(10),
            supervisor_interval: Duration::from_millis(25),
            stall_threshold: 20,
            poll_interval: Duration::from_millis(50),
            move_delay: Duration::from_millis(1),
            scan_lines: ScanLine::all().collect(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with a custom per-move delay.
    #[must_use]
    pub fn with_move_delay(mut self, delay: Duration) -> Self {
        self.move_delay = delay;
        self
    }

    /// Create a new config with a custom stall threshold.
    #[must_use]
    pub fn with_stall_threshold(mut self, ticks: u32) -> Self {
        self.stall_threshold = ticks;
        self
    }

    /// Create a new config with custom scanner lines.
    #[must_use]
    pub fn with_scan_lines(mut self, lines: impl IntoIterator<Item = ScanLine>) -> Self {
        self.scan_lines = lines.into_iter().collect();
        self
    }

    /// Create a new config with a custom token-choice seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
