//! Game state: the board plus everything the turn sequencer tracks.
//!
//! ## GameState
//!
//! - Configuration (player count, team mode, simulation mode)
//! - Board (token positions, has-captured flags, finishing order)
//! - Turn phase: whose turn, and whether the dice is out
//! - Per-player progress counters read by the simulation supervisor
//! - Move history
//! - Dice RNG
//!
//! `GameState` exclusively owns every token and player record. The
//! simulation wraps one `GameState` behind a single lock.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::board::BoardState;
use crate::core::{GameRng, LudoConfig, PlayerId, PlayerMap, Result, Square};
use crate::rules::MoveOutcome;

/// Where the turn state machine stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    /// `player` must roll.
    AwaitingRoll(PlayerId),
    /// `player` rolled `dice` and must pick a token.
    AwaitingMove(PlayerId, u8),
    /// No further turns.
    GameOver,
}

/// One applied move, kept for replay and display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// 1-based move number.
    pub number: u32,
    pub player: PlayerId,
    pub token: usize,
    pub dice: u8,
    pub from: Square,
    pub outcome: MoveOutcome,
    /// Opposing tokens sent home by this move.
    pub captured: u8,
}

/// Full game state.
#[derive(Clone, Debug)]
pub struct GameState {
    config: LudoConfig,

    /// Token positions and per-player flags.
    pub board: BoardState,

    pub(crate) phase: TurnPhase,
    pub(crate) current: PlayerId,
    pub(crate) dice_value: u8,

    /// Sixes rolled plus captures made, per player.
    pub(crate) progress: PlayerMap<u64>,

    pub(crate) history: Vector<MoveRecord>,

    /// Dice RNG.
    pub rng: GameRng,
}

impl GameState {
    /// Create the initial state: all tokens in their yards, player 0 to roll.
    ///
    /// Fails if the configuration is invalid.
    pub fn new(config: LudoConfig) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        };
        let first = PlayerId::new(0);

        Ok(Self {
            board: BoardState::new(config.player_count, config.team_mode),
            phase: TurnPhase::AwaitingRoll(first),
            current: first,
            dice_value: 0,
            progress: PlayerMap::with_value(config.player_count, 0),
            history: Vector::new(),
            rng,
            config,
        })
    }

    /// The configuration this game was created with.
    #[must_use]
    pub fn config(&self) -> &LudoConfig {
        &self.config
    }

    /// Number of seated players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.config.player_count
    }

    /// Current turn phase.
    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Player whose turn it is (the last one, once the game is over).
    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.current
    }

    /// Last dice value rolled, 0 before the first roll.
    #[must_use]
    pub fn dice_value(&self) -> u8 {
        self.dice_value
    }

    /// Whether the current player has rolled and not yet moved.
    #[must_use]
    pub fn has_rolled(&self) -> bool {
        matches!(self.phase, TurnPhase::AwaitingMove(..))
    }

    /// Whether the game has ended.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.phase == TurnPhase::GameOver
    }

    /// Progress events (sixes and captures) credited to `player`.
    #[must_use]
    pub fn progress(&self, player: PlayerId) -> u64 {
        self.progress[player]
    }

    /// Applied moves, oldest first. Cloning is O(1).
    #[must_use]
    pub fn history(&self) -> &Vector<MoveRecord> {
        &self.history
    }

    /// Players still competing: not in the finishing order, not eliminated.
    pub fn contenders(&self) -> impl Iterator<Item = PlayerId> + '_ {
        PlayerId::all(self.player_count())
            .filter(|&p| !self.board.is_eliminated(p) && !self.board.finishing_order().contains(&p))
    }

    /// Whether no two contenders are opponents: at most one is left, or in
    /// team mode all of them play for the same team.
    ///
    /// Teammates never capture each other, so a team-only remainder may have
    /// no way to reach the home column.
    #[must_use]
    pub fn is_decided(&self) -> bool {
        let mut contenders = self.contenders();
        match contenders.next() {
            Some(first) => contenders.all(|p| self.board.is_friendly(first, p)),
            None => true,
        }
    }
}
