//! Turn state machine.
//!
//! ```text
//! AwaitingRoll(p) --roll--> AwaitingMove(p, d) --move_token--> AwaitingRoll(p)     six or capture
//!                                                          \-> AwaitingRoll(mate)  p done, team mode
//!                                                          \-> AwaitingRoll(p + 1)
//!                                                          \-> GameOver
//! ```
//!
//! Handing the turn to a player skips anyone finished or eliminated; a
//! finished player is appended to the finishing order the first time the
//! sequencer reaches them. The game is over once no two players still
//! competing are opponents: without eliminations that means `player_count - 1`
//! players have finished, or in team mode one whole team is home.

use tracing::{debug, info, warn};

use super::state::{GameState, MoveRecord, TurnPhase};
use crate::board::{TokenList, TOKENS_PER_PLAYER};
use crate::core::{GameRng, LudoError, PlayerId, Result, Square, DIE_FACES};
use crate::rules::{CaptureEngine, CaptureEvent, MoveOutcome, MovementResolver};

/// What a `move_token` call did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnReport {
    pub player: PlayerId,
    pub token: usize,
    pub dice: u8,
    pub from: Square,
    pub outcome: MoveOutcome,
    /// Opposing tokens sent back to their yards.
    pub captured: TokenList,
    /// The mover keeps the dice.
    pub extra_turn: bool,
    /// Phase after the move.
    pub next: TurnPhase,
}

/// Stateless turn rules over a [`GameState`].
#[derive(Clone, Copy, Debug, Default)]
pub struct TurnSequencer {
    movement: MovementResolver,
    captures: CaptureEngine,
}

impl TurnSequencer {
    /// Create a sequencer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Movement rules used by this sequencer.
    #[must_use]
    pub fn movement(&self) -> &MovementResolver {
        &self.movement
    }

    /// Roll the dice for the current player.
    pub fn roll(&self, state: &mut GameState) -> Result<u8> {
        self.check_can_roll(state)?;
        let dice = state.rng.roll_die();
        self.accept_roll(state, dice)
    }

    /// Record `dice` as the current player's roll, e.g. from a physical die.
    ///
    /// Rejected without touching state if the game is over, the player has
    /// already rolled, or the value is not a die face.
    pub fn accept_roll(&self, state: &mut GameState, dice: u8) -> Result<u8> {
        self.check_can_roll(state)?;
        if !(1..=DIE_FACES).contains(&dice) {
            return Err(LudoError::InvalidDice(dice));
        }

        let player = state.current;
        state.dice_value = dice;
        state.phase = TurnPhase::AwaitingMove(player, dice);
        if dice == DIE_FACES {
            state.progress[player] += 1;
        }
        debug!(%player, dice, "rolled");
        Ok(dice)
    }

    fn check_can_roll(&self, state: &GameState) -> Result<()> {
        match state.phase {
            TurnPhase::AwaitingRoll(_) => Ok(()),
            TurnPhase::AwaitingMove(_, dice) => {
                warn!(player = %state.current, dice, "roll rejected: already rolled");
                Err(LudoError::AlreadyRolled(dice))
            }
            TurnPhase::GameOver => Err(LudoError::GameOver),
        }
    }

    /// Move `token` of `player` by the rolled value, apply captures, and
    /// advance the turn.
    ///
    /// Errors only for out-of-sequence commands; the state is unchanged in
    /// that case. A blocked or impossible move is reported in the outcome and
    /// still ends the turn.
    pub fn move_token(&self, state: &mut GameState, player: PlayerId, token: usize) -> Result<TurnReport> {
        let dice = match state.phase {
            TurnPhase::AwaitingMove(current, dice) if current == player => dice,
            TurnPhase::AwaitingMove(current, _) | TurnPhase::AwaitingRoll(current) if current != player => {
                warn!(%player, expected = %current, "move rejected: not this player's turn");
                return Err(LudoError::NotYourTurn {
                    expected: current,
                    actual: player,
                });
            }
            TurnPhase::AwaitingRoll(_) => {
                warn!(%player, "move rejected: dice not rolled");
                return Err(LudoError::NotRolled);
            }
            _ => return Err(LudoError::GameOver),
        };
        if token >= TOKENS_PER_PLAYER {
            return Err(LudoError::InvalidToken(token));
        }
        if state.board.token(player, token).finished {
            return Err(LudoError::TokenFinished { player, token });
        }

        let from = state.board.token(player, token).square;
        let outcome = self.movement.resolve(&state.board, player, token, dice);
        self.movement.apply(&mut state.board, player, token, outcome);

        let captured = match outcome {
            MoveOutcome::Moved(square) => self.captures.capture_at(&mut state.board, player, square),
            _ => TokenList::new(),
        };
        if !captured.is_empty() {
            state.progress[player] += 1;
        }

        let number = state.history.len() as u32 + 1;
        state.history.push_back(MoveRecord {
            number,
            player,
            token,
            dice,
            from,
            outcome,
            captured: captured.len() as u8,
        });
        debug!(%player, token, dice, %from, ?outcome, captured = captured.len(), "moved");

        if outcome == MoveOutcome::Finished {
            self.mark_finished(state, player);
        }

        let done = state.board.all_finished(player);
        let extra_turn = !done && (dice == DIE_FACES || !captured.is_empty());

        let next = if extra_turn {
            player
        } else if done && state.board.team_mode() {
            self.unfinished_teammate(state, player)
                .inspect(|mate| info!(%player, teammate = %mate, "all tokens home, passing the dice to teammate"))
                .unwrap_or_else(|| player.next(state.player_count()))
        } else {
            player.next(state.player_count())
        };
        self.begin_turn(state, next);

        Ok(TurnReport {
            player,
            token,
            dice,
            from,
            outcome,
            captured,
            extra_turn,
            next: state.phase,
        })
    }

    fn unfinished_teammate(&self, state: &GameState, player: PlayerId) -> Option<PlayerId> {
        PlayerId::all(state.player_count())
            .find(|&p| state.board.are_teammates(player, p) && state.board.in_contention(p))
    }

    /// Hand the turn to `candidate`, or the first player after it who can
    /// still play.
    fn begin_turn(&self, state: &mut GameState, candidate: PlayerId) {
        let mut player = candidate;

        for _ in 0..state.player_count() {
            if self.check_game_over(state) {
                return;
            }
            if state.board.all_finished(player) {
                self.mark_finished(state, player);
                player = player.next(state.player_count());
                continue;
            }
            if state.board.is_eliminated(player) {
                player = player.next(state.player_count());
                continue;
            }

            state.current = player;
            state.phase = TurnPhase::AwaitingRoll(player);
            return;
        }

        state.phase = TurnPhase::GameOver;
    }

    /// Switch to `GameOver` once the remaining contenders have no opponents.
    fn check_game_over(&self, state: &mut GameState) -> bool {
        if state.phase == TurnPhase::GameOver {
            return true;
        }

        if state.is_decided() {
            info!(order = ?state.board.finishing_order(), "game over");
            state.phase = TurnPhase::GameOver;
            return true;
        }
        false
    }

    /// Append `player` to the finishing order if all their tokens are home,
    /// passing the turn on if it was theirs.
    ///
    /// Idempotent. Returns true only the first time.
    pub fn record_finish(&self, state: &mut GameState, player: PlayerId) -> bool {
        if !self.mark_finished(state, player) {
            return false;
        }
        if state.current == player && state.phase != TurnPhase::GameOver {
            self.begin_turn(state, player.next(state.player_count()));
        }
        true
    }

    fn mark_finished(&self, state: &mut GameState, player: PlayerId) -> bool {
        if !state.board.all_finished(player) || !state.board.record_finish(player) {
            return false;
        }

        let place = state.board.finishing_order().len();
        info!(%player, place, "all tokens home");
        self.check_game_over(state);
        true
    }

    /// Remove `player` from further turns.
    ///
    /// If it is their turn, the turn passes on immediately. Returns false if
    /// the player was already eliminated.
    pub fn eliminate(&self, state: &mut GameState, player: PlayerId) -> bool {
        if !state.board.eliminate(player) {
            return false;
        }
        warn!(%player, "eliminated");

        if state.current == player && state.phase != TurnPhase::GameOver {
            self.begin_turn(state, player.next(state.player_count()));
        } else {
            self.check_game_over(state);
        }
        true
    }

    /// Resolve overlapping opposing tokens on watched squares.
    ///
    /// Each resolved overlap credits the capturer with progress.
    pub fn sweep_captures(&self, state: &mut GameState, watch: impl Fn(Square) -> bool) -> usize {
        if state.phase == TurnPhase::GameOver {
            return 0;
        }

        let events = self.captures.resolve_overlaps(&mut state.board, watch);
        for CaptureEvent { capturer, square, captured } in &events {
            state.progress[*capturer] += 1;
            debug!(%capturer, %square, count = captured.len(), "overlap resolved by sweep");
        }
        events.len()
    }

    /// Pick uniformly among the current player's unfinished tokens.
    #[must_use]
    pub fn pick_token(&self, state: &GameState, rng: &mut GameRng) -> Option<usize> {
        let tokens = state.board.unfinished_tokens(state.current);
        rng.choose(&tokens).copied()
    }

    /// Roll if needed, then move a random unfinished token of the current
    /// player.
    pub fn play_random_turn(&self, state: &mut GameState, rng: &mut GameRng) -> Result<TurnReport> {
        if let TurnPhase::AwaitingRoll(_) = state.phase {
            self.roll(state)?;
        }

        let player = state.current;
        let token = self.pick_token(state, rng).ok_or(LudoError::GameOver)?;
        self.move_token(state, player, token)
    }
}
