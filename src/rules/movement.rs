//! Movement resolution.
//!
//! Given a token and a dice value, work out where the token ends up without
//! touching the board. [`MovementResolver::apply`] commits the outcome.
//!
//! ## Rules
//!
//! - A yard token leaves only on a six, onto its color's start square.
//! - On the main loop the target index wraps; on the home-run path it never
//!   does, and a roll that would carry the token past the center is void.
//! - From the target, scan forward for the first square that is not blocked.
//!   An opposing color with two or more tokens on a non-safe square blocks it;
//!   so do two or more of the mover's own (or a teammate's) tokens. An
//!   opposing block on the target itself rejects the whole move.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::{BoardState, Color, PathMode, PathTable, LOOP_LEN};
use crate::core::{PlayerId, Square, DIE_FACES};

/// Result of resolving one move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// The token lands on this square.
    Moved(Square),
    /// The target square holds an opposing block.
    Blocked,
    /// The token reaches the center and leaves play.
    Finished,
    /// Nothing happens (yard without a six, overshoot, exhausted scan).
    NoOp,
}

impl MoveOutcome {
    /// Whether the board changes when this outcome is applied.
    #[must_use]
    pub fn changes_board(self) -> bool {
        matches!(self, MoveOutcome::Moved(_) | MoveOutcome::Finished)
    }
}

/// Why a candidate square cannot be landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Blockage {
    /// Two or more tokens of one opposing color.
    Opposing,
    /// Two or more of the mover's own and teammates' tokens.
    Friendly,
}

/// Stateless movement rules over the shared path table.
#[derive(Clone, Copy, Debug)]
pub struct MovementResolver {
    table: &'static PathTable,
}

impl Default for MovementResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl MovementResolver {
    /// Create a resolver over the process-wide path table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: PathTable::get(),
        }
    }

    /// Index of the token on its player's current path.
    ///
    /// When the square is not on that path (the player's path switched under
    /// the token after a capture), falls back to the nearest path square by
    /// Manhattan distance. The flag reports whether the fallback was used.
    #[must_use]
    pub fn current_index(&self, board: &BoardState, player: PlayerId, token: usize) -> (usize, bool) {
        let color = Color::of(player);
        let mode = board.path_mode(player);
        let square = board.token(player, token).square;

        match self.table.index_of(color, mode, square) {
            Some(index) => (index, false),
            None => (self.table.nearest_index(color, mode, square), true),
        }
    }

    /// Work out the outcome of moving `token` by `dice` steps.
    #[must_use]
    pub fn resolve(&self, board: &BoardState, player: PlayerId, token: usize, dice: u8) -> MoveOutcome {
        if !(1..=DIE_FACES).contains(&dice) || board.is_eliminated(player) {
            return MoveOutcome::NoOp;
        }
        if board.token(player, token).finished {
            return MoveOutcome::NoOp;
        }

        let color = Color::of(player);

        if board.is_in_yard(player, token) {
            return if dice == DIE_FACES {
                MoveOutcome::Moved(self.table.start_square(color))
            } else {
                MoveOutcome::NoOp
            };
        }

        let mode = board.path_mode(player);
        let path = self.table.path(color, mode);
        let (current, fallback) = self.current_index(board, player, token);
        if fallback {
            debug!(%player, token, square = %board.token(player, token).square, current, "token off path, using nearest square");
        }

        let target = current + dice as usize;

        match mode {
            PathMode::MainLoop => {
                for (step, index) in (target..target + LOOP_LEN).enumerate() {
                    let square = path[index % LOOP_LEN];
                    match self.blockage(board, player, token, square) {
                        None => return MoveOutcome::Moved(square),
                        Some(Blockage::Opposing) if step == 0 => return MoveOutcome::Blocked,
                        Some(_) => continue,
                    }
                }
                MoveOutcome::NoOp
            }
            PathMode::HomeRun => {
                let last = path.len() - 1;
                if board.token(player, token).square == path[last] {
                    return MoveOutcome::Finished;
                }
                if target > last {
                    return MoveOutcome::NoOp;
                }
                for index in target..=last {
                    if index == last {
                        return MoveOutcome::Finished;
                    }
                    let square = path[index];
                    match self.blockage(board, player, token, square) {
                        None => return MoveOutcome::Moved(square),
                        Some(Blockage::Opposing) if index == target => return MoveOutcome::Blocked,
                        Some(_) => continue,
                    }
                }
                MoveOutcome::NoOp
            }
        }
    }

    /// Whether `square` blocks `player`'s `token` from landing there.
    ///
    /// Safe squares never block. The moving token itself is not counted.
    #[must_use]
    pub fn blockage(&self, board: &BoardState, player: PlayerId, token: usize, square: Square) -> Option<Blockage> {
        if self.table.is_safe(square) {
            return None;
        }

        let mut friendly = 0usize;
        let mut opposing = [0usize; crate::core::MAX_PLAYERS];

        for (owner, index) in board.tokens_at(square) {
            if owner == player && index == token {
                continue;
            }
            if board.is_friendly(player, owner) {
                friendly += 1;
            } else {
                opposing[owner.index()] += 1;
            }
        }

        if opposing.iter().any(|&count| count >= 2) {
            Some(Blockage::Opposing)
        } else if friendly > 1 {
            Some(Blockage::Friendly)
        } else {
            None
        }
    }

    /// Commit an outcome to the board.
    pub fn apply(&self, board: &mut BoardState, player: PlayerId, token: usize, outcome: MoveOutcome) {
        match outcome {
            MoveOutcome::Moved(square) => board.place_token(player, token, square),
            MoveOutcome::Finished => board.finish_token(player, token),
            MoveOutcome::Blocked | MoveOutcome::NoOp => {}
        }
    }
}
