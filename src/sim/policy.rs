//! Token choice for unattended players.
//!
//! Policies are trait-based so workers can be driven by something smarter
//! than a coin flip:
//! - `UniformRandom`: any unfinished token, uniformly
//! - `FurthestFirst`: the token that can move furthest along its path

use crate::core::{GameRng, PlayerId};
use crate::rules::MoveOutcome;
use crate::turn::{GameState, TurnSequencer};

/// Policy for choosing which token a simulated player moves.
pub trait TokenPolicy: Send + Sync {
    /// Choose a token of `player` to move with the rolled `dice`.
    ///
    /// Returns `None` if every token has finished.
    fn choose_token(
        &self,
        sequencer: &TurnSequencer,
        state: &GameState,
        player: PlayerId,
        dice: u8,
        rng: &mut GameRng,
    ) -> Option<usize>;
}

/// Uniform random token policy.
///
/// Selects uniformly from unfinished tokens, whether or not they can move.
#[derive(Clone, Debug, Default)]
pub struct UniformRandom;

impl TokenPolicy for UniformRandom {
    fn choose_token(
        &self,
        _sequencer: &TurnSequencer,
        state: &GameState,
        player: PlayerId,
        _dice: u8,
        rng: &mut GameRng,
    ) -> Option<usize> {
        let tokens = state.board.unfinished_tokens(player);
        rng.choose(&tokens).copied()
    }
}

/// Prefer the token whose move changes the board, breaking ties by how far
/// along its path the token already is.
#[derive(Clone, Debug, Default)]
pub struct FurthestFirst;

impl TokenPolicy for FurthestFirst {
    fn choose_token(
        &self,
        sequencer: &TurnSequencer,
        state: &GameState,
        player: PlayerId,
        dice: u8,
        _rng: &mut GameRng,
    ) -> Option<usize> {
        let movement = sequencer.movement();
        state
            .board
            .unfinished_tokens(player)
            .into_iter()
            .max_by_key(|&token| {
                let outcome = movement.resolve(&state.board, player, token, dice);
                let progress = match outcome {
                    MoveOutcome::Finished => usize::MAX,
                    _ if state.board.is_in_yard(player, token) => 0,
                    _ => movement.current_index(&state.board, player, token).0 + 1,
                };
                (outcome.changes_board(), progress)
            })
    }
}
