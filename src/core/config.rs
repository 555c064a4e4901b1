//! Game configuration.
//!
//! The view or CLI collects three values from the user (player count, team
//! mode, manual vs. simulated play) and hands them to the engine as a
//! `LudoConfig`. The engine never prompts for them itself.

use serde::{Deserialize, Serialize};

use super::error::{LudoError, Result};
use super::player::MAX_PLAYERS;

/// Fewest players a game can start with.
pub const MIN_PLAYERS: usize = 2;

/// Complete game configuration.
///
/// ```
/// use ludo_engine::core::LudoConfig;
///
/// let config = LudoConfig::new(4).with_team_mode(true).with_seed(7);
/// assert!(config.validate().is_ok());
/// assert!(LudoConfig::new(5).validate().is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LudoConfig {
    /// Number of seated players (2-4). Player `i` plays color `i`.
    pub player_count: usize,

    /// Pair players by parity (0 & 2 vs 1 & 3).
    pub team_mode: bool,

    /// Play unattended via the threaded simulation coordinator.
    pub simulation_mode: bool,

    /// Dice seed. `None` draws one from the operating system.
    pub seed: Option<u64>,
}

impl Default for LudoConfig {
    fn default() -> Self {
        Self {
            player_count: MAX_PLAYERS,
            team_mode: false,
            simulation_mode: false,
            seed: None,
        }
    }
}

impl LudoConfig {
    /// Create a configuration for `player_count` players.
    ///
    /// The count is checked by [`validate`](Self::validate), not here, so a
    /// bad value read from a prompt can be reported instead of panicking.
    pub fn new(player_count: usize) -> Self {
        Self {
            player_count,
            ..Self::default()
        }
    }

    /// Enable or disable team mode.
    #[must_use]
    pub fn with_team_mode(mut self, team_mode: bool) -> Self {
        self.team_mode = team_mode;
        self
    }

    /// Enable or disable simulated play.
    #[must_use]
    pub fn with_simulation(mut self, simulation_mode: bool) -> Self {
        self.simulation_mode = simulation_mode;
        self
    }

    /// Fix the dice seed for reproducible games.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the configuration. Errors here are fatal at startup.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.player_count) {
            return Err(LudoError::InvalidPlayerCount(self.player_count));
        }
        Ok(())
    }
}
