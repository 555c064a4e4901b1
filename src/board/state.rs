//! Mutable board state: token positions and per-player flags.
//!
//! `BoardState` holds no rules. Its mutation helpers only keep its own
//! invariants: a finished token stays finished, the has-captured flag never
//! resets, and the finishing order never repeats a player.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::path::{Color, PathMode, PathTable, TOKENS_PER_PLAYER};
use crate::core::{PlayerId, PlayerMap, Square};

/// Tokens sharing one square. Four inline slots covers every legal stack
/// except the rare fully stacked color.
pub type TokenList = SmallVec<[(PlayerId, usize); 4]>;

/// A single token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Current square. Yard slot while waiting, the center once finished.
    pub square: Square,

    /// Reached the terminal square; out of play for good.
    pub finished: bool,

    /// Board clock value when the token last arrived on `square`.
    /// The most recent arrival on a contested square is the capturer.
    pub arrived: u64,
}

/// Token positions, finished flags and per-player status.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BoardState {
    team_mode: bool,
    tokens: PlayerMap<[Token; TOKENS_PER_PLAYER]>,
    has_captured: PlayerMap<bool>,
    eliminated: PlayerMap<bool>,
    finishing_order: Vec<PlayerId>,
    clock: u64,
}

impl BoardState {
    /// Fresh board with every token in its owner's yard.
    #[must_use]
    pub fn new(player_count: usize, team_mode: bool) -> Self {
        let table = PathTable::get();
        let tokens = PlayerMap::new(player_count, |player| {
            table.yard_squares(Color::of(player)).map(|square| Token {
                square,
                finished: false,
                arrived: 0,
            })
        });

        Self {
            team_mode,
            tokens,
            has_captured: PlayerMap::with_value(player_count, false),
            eliminated: PlayerMap::with_value(player_count, false),
            finishing_order: Vec::with_capacity(player_count),
            clock: 0,
        }
    }

    /// Number of seated players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.tokens.player_count()
    }

    /// Whether players are paired into teams.
    #[must_use]
    pub fn team_mode(&self) -> bool {
        self.team_mode
    }

    /// Whether `a` and `b` are distinct players on the same team.
    #[must_use]
    pub fn are_teammates(&self, a: PlayerId, b: PlayerId) -> bool {
        self.team_mode && a != b && a.team() == b.team()
    }

    /// Same player or teammate.
    #[must_use]
    pub fn is_friendly(&self, a: PlayerId, b: PlayerId) -> bool {
        a == b || self.are_teammates(a, b)
    }

    // === Tokens ===

    /// All four tokens of `player`.
    #[must_use]
    pub fn tokens(&self, player: PlayerId) -> &[Token; TOKENS_PER_PLAYER] {
        &self.tokens[player]
    }

    /// One token.
    #[must_use]
    pub fn token(&self, player: PlayerId, index: usize) -> &Token {
        &self.tokens[player][index]
    }

    /// Whether the token sits in its owner's yard.
    #[must_use]
    pub fn is_in_yard(&self, player: PlayerId, index: usize) -> bool {
        let token = self.token(player, index);
        !token.finished && PathTable::get().is_yard(Color::of(player), token.square)
    }

    /// Move a token to `square`, stamping its arrival.
    pub fn place_token(&mut self, player: PlayerId, index: usize, square: Square) {
        self.clock += 1;
        let token = &mut self.tokens[player][index];
        debug_assert!(!token.finished, "finished tokens never move");
        token.square = square;
        token.arrived = self.clock;
    }

    /// Mark a token finished and park it on the terminal square.
    pub fn finish_token(&mut self, player: PlayerId, index: usize) {
        self.clock += 1;
        let token = &mut self.tokens[player][index];
        token.square = PathTable::get().terminal_square();
        token.finished = true;
        token.arrived = self.clock;
    }

    /// Return a token to the first of its owner's yard slots not held by
    /// another token of that color. Returns the slot used.
    pub fn send_to_yard(&mut self, player: PlayerId, index: usize) -> Square {
        let yard = PathTable::get().yard_squares(Color::of(player));
        let tokens = &self.tokens[player];
        let slot = yard
            .iter()
            .copied()
            .find(|slot| {
                !tokens
                    .iter()
                    .enumerate()
                    .any(|(i, t)| i != index && !t.finished && t.square == *slot)
            })
            // Four slots and at most three other tokens: a slot is always free.
            .unwrap_or(yard[index]);

        self.place_token(player, index, slot);
        slot
    }

    /// Whether every token of `player` has finished.
    #[must_use]
    pub fn all_finished(&self, player: PlayerId) -> bool {
        self.tokens[player].iter().all(|t| t.finished)
    }

    /// Indices of `player`'s tokens still in play or in the yard.
    #[must_use]
    pub fn unfinished_tokens(&self, player: PlayerId) -> SmallVec<[usize; TOKENS_PER_PLAYER]> {
        self.tokens[player]
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.finished)
            .map(|(i, _)| i)
            .collect()
    }

    /// First unfinished token of `player` on `square`. `None` for a seat
    /// not in this game.
    #[must_use]
    pub fn token_at(&self, player: PlayerId, square: Square) -> Option<usize> {
        if player.index() >= self.player_count() {
            return None;
        }
        self.tokens[player]
            .iter()
            .position(|t| !t.finished && t.square == square)
    }

    /// Every unfinished token on `square`.
    #[must_use]
    pub fn tokens_at(&self, square: Square) -> TokenList {
        self.tokens
            .iter()
            .flat_map(|(player, tokens)| {
                tokens
                    .iter()
                    .enumerate()
                    .filter(move |(_, t)| !t.finished && t.square == square)
                    .map(move |(i, _)| (player, i))
            })
            .collect()
    }

    /// Number of unfinished tokens per occupied square.
    #[must_use]
    pub fn occupancy(&self) -> FxHashMap<Square, u8> {
        let mut counts = FxHashMap::default();
        for (_, tokens) in self.tokens.iter() {
            for token in tokens.iter().filter(|t| !t.finished) {
                *counts.entry(token.square).or_insert(0) += 1;
            }
        }
        counts
    }

    // === Player flags ===

    /// Whether `player` has ever captured.
    #[must_use]
    pub fn has_captured(&self, player: PlayerId) -> bool {
        self.has_captured[player]
    }

    /// Set the has-captured flag. It never resets.
    pub fn mark_captured(&mut self, player: PlayerId) {
        self.has_captured[player] = true;
    }

    /// Path `player`'s tokens currently follow.
    #[must_use]
    pub fn path_mode(&self, player: PlayerId) -> PathMode {
        PathMode::from_captured(self.has_captured[player])
    }

    /// Whether `player` was removed for stalling.
    #[must_use]
    pub fn is_eliminated(&self, player: PlayerId) -> bool {
        self.eliminated[player]
    }

    /// Remove `player` from further turns. Returns false if already removed.
    pub fn eliminate(&mut self, player: PlayerId) -> bool {
        !std::mem::replace(&mut self.eliminated[player], true)
    }

    /// Neither finished nor eliminated.
    #[must_use]
    pub fn in_contention(&self, player: PlayerId) -> bool {
        !self.eliminated[player] && !self.all_finished(player)
    }

    // === Finishing order ===

    /// Players who completed all tokens, in completion order.
    #[must_use]
    pub fn finishing_order(&self) -> &[PlayerId] {
        &self.finishing_order
    }

    /// Append `player` to the finishing order. Returns false if already there.
    pub fn record_finish(&mut self, player: PlayerId) -> bool {
        if self.finishing_order.contains(&player) {
            return false;
        }
        debug_assert!(self.finishing_order.len() < self.player_count());
        self.finishing_order.push(player);
        true
    }
}
