//! Public facade.
//!
//! `LudoGame` is what a view, a CLI or a test drives. It owns the shared game
//! state; manual commands lock it for the duration of one call, and
//! [`run_simulation`](LudoGame::run_simulation) hands it to the threaded
//! coordinator.
//!
//! ```
//! use ludo_engine::{LudoConfig, LudoGame, PlayerId};
//!
//! let game = LudoGame::configure(LudoConfig::new(2).with_seed(3)).unwrap();
//! let player = game.current_player();
//! game.roll_dice().unwrap();
//! let report = game.select_token(player, 0).unwrap();
//! assert_eq!(report.player, PlayerId::new(0));
//! assert!(!game.has_rolled());
//! ```

use std::sync::MutexGuard;

use im::Vector;
use rustc_hash::FxHashMap;

use crate::board::{Token, TOKENS_PER_PLAYER};
use crate::core::{GameRng, LudoConfig, LudoError, PlayerId, PlayerMap, Result, Square};
use crate::sim::{self, SharedGame, SimulationConfig, SimulationCoordinator, SimulationReport};
use crate::turn::{GameState, MoveRecord, Standings, TurnPhase, TurnReport, TurnSequencer};

/// A configured game.
pub struct LudoGame {
    shared: SharedGame,
    sequencer: TurnSequencer,
    simulation: SimulationConfig,
    /// Token choice for [`play_random_turn`](Self::play_random_turn).
    choice_rng: GameRng,
}

impl LudoGame {
    /// One-time setup. Fails if the player count is out of range.
    pub fn configure(config: LudoConfig) -> Result<Self> {
        let mut state = GameState::new(config)?;
        let choice_rng = state.rng.fork();

        Ok(Self {
            shared: sim::share(state),
            sequencer: TurnSequencer::new(),
            simulation: SimulationConfig::default(),
            choice_rng,
        })
    }

    /// Replace the simulation parameters used by [`run_simulation`](Self::run_simulation).
    #[must_use]
    pub fn with_simulation_config(mut self, simulation: SimulationConfig) -> Self {
        self.simulation = simulation;
        self
    }

    /// Lock the underlying state for inspection.
    pub fn state(&self) -> MutexGuard<'_, GameState> {
        sim::lock(&self.shared)
    }

    /// Run `f` against the locked state and wake any waiting workers.
    fn with_state<T>(&self, f: impl FnOnce(&mut GameState) -> T) -> T {
        let mut state = self.state();
        let result = f(&mut state);
        drop(state);
        self.shared.1.notify_all();
        result
    }

    // === Queries ===

    /// The configuration this game was created with.
    #[must_use]
    pub fn config(&self) -> LudoConfig {
        self.state().config().clone()
    }

    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.state().current_player()
    }

    /// Last value rolled, 0 before the first roll.
    #[must_use]
    pub fn dice_value(&self) -> u8 {
        self.state().dice_value()
    }

    #[must_use]
    pub fn has_rolled(&self) -> bool {
        self.state().has_rolled()
    }

    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.state().phase()
    }

    /// Every player's tokens: square plus finished flag.
    #[must_use]
    pub fn token_positions(&self) -> PlayerMap<[Token; TOKENS_PER_PLAYER]> {
        let state = self.state();
        PlayerMap::new(state.player_count(), |p| *state.board.tokens(p))
    }

    #[must_use]
    pub fn finishing_order(&self) -> Vec<PlayerId> {
        self.state().board.finishing_order().to_vec()
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state().is_game_over()
    }

    /// Number of tokens on each occupied square.
    #[must_use]
    pub fn occupancy(&self) -> FxHashMap<Square, u8> {
        self.state().board.occupancy()
    }

    /// First unfinished token of `player` on `square`, for mapping a click to
    /// a [`select_token`](Self::select_token) call.
    #[must_use]
    pub fn token_at(&self, player: PlayerId, square: Square) -> Option<usize> {
        self.state().board.token_at(player, square)
    }

    #[must_use]
    pub fn standings(&self) -> Standings {
        Standings::from_state(&self.state())
    }

    /// Applied moves, oldest first.
    #[must_use]
    pub fn history(&self) -> Vector<MoveRecord> {
        self.state().history().clone()
    }

    // === Commands ===

    /// Roll for the current player.
    pub fn roll_dice(&self) -> Result<u8> {
        self.with_state(|state| self.sequencer.roll(state))
    }

    /// Move `token` of `player` by the rolled value.
    pub fn select_token(&self, player: PlayerId, token: usize) -> Result<TurnReport> {
        self.with_state(|state| self.sequencer.move_token(state, player, token))
    }

    /// Roll if needed and move a random unfinished token of the current
    /// player.
    pub fn play_random_turn(&mut self) -> Result<TurnReport> {
        let rng = &mut self.choice_rng;
        let mut state = sim::lock(&self.shared);
        let report = self.sequencer.play_random_turn(&mut state, rng);
        drop(state);
        self.shared.1.notify_all();
        report
    }

    /// Play the game out on worker threads, blocking until it is over.
    ///
    /// Only available for games configured with `simulation_mode`.
    pub fn run_simulation(&self) -> Result<SimulationReport> {
        if !self.state().config().simulation_mode {
            return Err(LudoError::NotSimulationMode);
        }
        SimulationCoordinator::new(self.simulation.clone()).run(&self.shared)
    }
}

impl std::fmt::Debug for LudoGame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("LudoGame")
            .field("players", &state.player_count())
            .field("phase", &state.phase())
            .field("finishing_order", &state.board.finishing_order())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::board::{Color, PathTable};

    fn p(i: u8) -> PlayerId {
        PlayerId::new(i)
    }

    #[test]
    fn test_configure_rejects_bad_player_count() {
        assert_eq!(
            LudoGame::configure(LudoConfig::new(5)).unwrap_err(),
            LudoError::InvalidPlayerCount(5)
        );
        assert!(LudoGame::configure(LudoConfig::new(0)).is_err());
    }

    #[test]
    fn test_initial_queries() {
        let game = LudoGame::configure(LudoConfig::new(3).with_seed(1)).unwrap();

        assert_eq!(game.current_player(), p(0));
        assert_eq!(game.dice_value(), 0);
        assert!(!game.has_rolled());
        assert!(!game.is_game_over());
        assert!(game.finishing_order().is_empty());

        let positions = game.token_positions();
        assert_eq!(positions.player_count(), 3);
        let green_yard = PathTable::get().yard_squares(Color::Green);
        for (i, token) in positions[p(1)].iter().enumerate() {
            assert_eq!(token.square, green_yard[i]);
            assert!(!token.finished);
        }
        assert_eq!(game.occupancy().len(), 12);
        assert_eq!(game.token_at(p(1), green_yard[2]), Some(2));
        assert_eq!(game.token_at(p(3), green_yard[2]), None);
    }

    #[test]
    fn test_double_roll_is_rejected() {
        let game = LudoGame::configure(LudoConfig::new(2).with_seed(1)).unwrap();
        let dice = game.roll_dice().unwrap();

        assert_eq!(game.roll_dice(), Err(LudoError::AlreadyRolled(dice)));
        assert_eq!(game.dice_value(), dice);
        assert!(game.has_rolled());
    }

    #[test]
    fn test_random_turns_until_game_over() {
        let mut game = LudoGame::configure(LudoConfig::new(2).with_seed(8)).unwrap();

        while !game.is_game_over() {
            game.play_random_turn().unwrap();
        }

        let standings = game.standings();
        assert_eq!(standings.winner(), game.finishing_order().first().copied());
        assert!(standings.result().is_some());
        assert!(!game.history().is_empty());
    }

    #[test]
    fn test_simulation_requires_simulation_mode() {
        let game = LudoGame::configure(LudoConfig::new(2).with_seed(1)).unwrap();
        assert_eq!(game.run_simulation().unwrap_err(), LudoError::NotSimulationMode);
    }

    #[test]
    fn test_run_simulation() {
        let config = LudoConfig::new(3).with_simulation(true).with_seed(2);
        let sim = SimulationConfig::default()
            .with_move_delay(Duration::ZERO)
            .with_stall_threshold(0);
        let game = LudoGame::configure(config).unwrap().with_simulation_config(sim);

        let report = game.run_simulation().unwrap();
        assert!(game.is_game_over());
        assert_eq!(report.finishing_order, game.finishing_order());
        assert_eq!(report.finishing_order.len(), 2);
    }
}
