//! Captures.
//!
//! Two entry points share the same rules:
//!
//! - [`CaptureEngine::apply_captures`] runs right after a move, with the
//!   mover known.
//! - [`CaptureEngine::resolve_overlaps`] is the periodic sweep used by the
//!   simulation's line watchers. It finds squares where opposing tokens
//!   overlap and lets the most recent arrival capture the rest.
//!
//! No capture ever happens on a safe square or on the center.

use smallvec::SmallVec;
use tracing::debug;

use crate::board::{BoardState, PathTable, TokenList};
use crate::core::{PlayerId, Square};

/// One capture: who captured, where, and which tokens went home.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptureEvent {
    pub capturer: PlayerId,
    pub square: Square,
    pub captured: TokenList,
}

/// Capture rules over the shared path table.
#[derive(Clone, Copy, Debug)]
pub struct CaptureEngine {
    table: &'static PathTable,
}

impl Default for CaptureEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureEngine {
    /// Create a capture engine over the process-wide path table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: PathTable::get(),
        }
    }

    /// Whether captures may happen on `square` at all.
    #[must_use]
    pub fn is_capture_square(&self, square: Square) -> bool {
        !self.table.is_safe(square) && !self.table.is_terminal(square)
    }

    /// Send every opposing token on `landed` back to its yard.
    ///
    /// Returns the tokens captured. Any capture sets the mover's
    /// has-captured flag for good.
    pub fn capture_at(&self, board: &mut BoardState, mover: PlayerId, landed: Square) -> TokenList {
        if !self.is_capture_square(landed) {
            return TokenList::new();
        }

        let victims: TokenList = board
            .tokens_at(landed)
            .into_iter()
            .filter(|&(owner, _)| !board.is_friendly(mover, owner))
            .collect();

        for &(owner, index) in &victims {
            let slot = board.send_to_yard(owner, index);
            debug!(%mover, victim = %owner, token = index, square = %landed, yard = %slot, "token captured");
        }

        if !victims.is_empty() {
            board.mark_captured(mover);
        }
        victims
    }

    /// [`capture_at`](Self::capture_at), reporting only whether anything was
    /// captured.
    pub fn apply_captures(&self, board: &mut BoardState, mover: PlayerId, landed: Square) -> bool {
        !self.capture_at(board, mover, landed).is_empty()
    }

    /// Sweep the board for overlapping opposing tokens on squares accepted by
    /// `watch`, and resolve each overlap as a capture by the latest arrival.
    pub fn resolve_overlaps(
        &self,
        board: &mut BoardState,
        watch: impl Fn(Square) -> bool,
    ) -> SmallVec<[CaptureEvent; 2]> {
        let mut contested: SmallVec<[Square; 4]> = board
            .occupancy()
            .into_iter()
            .filter(|&(square, count)| count >= 2 && watch(square) && self.is_capture_square(square))
            .map(|(square, _)| square)
            .collect();
        contested.sort_unstable();

        let mut events = SmallVec::new();
        for square in contested {
            let occupants = board.tokens_at(square);
            let Some(&(capturer, _)) = occupants
                .iter()
                .max_by_key(|&&(owner, index)| board.token(owner, index).arrived)
            else {
                continue;
            };

            let captured = self.capture_at(board, capturer, square);
            if !captured.is_empty() {
                events.push(CaptureEvent {
                    capturer,
                    square,
                    captured,
                });
            }
        }
        events
    }
}
