//! Final placings and the game result.

use serde::{Deserialize, Serialize};

use super::state::GameState;
use crate::core::{PlayerId, TeamId};

/// Result of a finished game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// First player to bring every token home.
    Winner(PlayerId),
    /// Team game: every member of the first team to get all its players home,
    /// or of the only team left after eliminations.
    Winners(TeamId, Vec<PlayerId>),
    /// Everyone was eliminated before anyone finished.
    Draw,
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
            GameResult::Winners(_, ps) => ps.contains(&player),
            GameResult::Draw => false,
        }
    }
}

/// Placing of one player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub player: PlayerId,
    /// 1-based place. Players still on the board share the next free place.
    pub place: usize,
    pub finished: bool,
    pub eliminated: bool,
}

/// Snapshot of placings: finishers in order, then everyone still playing,
/// then eliminated players.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standings {
    placements: Vec<Placement>,
    team_mode: bool,
    player_count: usize,
    game_over: bool,
}

impl Standings {
    /// Read the standings off a game state.
    #[must_use]
    pub fn from_state(state: &GameState) -> Self {
        let board = &state.board;
        let order = board.finishing_order();
        let mut placements: Vec<Placement> = order
            .iter()
            .enumerate()
            .map(|(i, &player)| Placement {
                player,
                place: i + 1,
                finished: true,
                eliminated: false,
            })
            .collect();

        let next_place = order.len() + 1;
        placements.extend(state.contenders().map(|player| Placement {
            player,
            place: next_place,
            finished: false,
            eliminated: false,
        }));

        let last_place = placements.len() + 1;
        placements.extend(
            PlayerId::all(state.player_count())
                .filter(|&p| board.is_eliminated(p))
                .map(|player| Placement {
                    player,
                    place: last_place,
                    finished: false,
                    eliminated: true,
                }),
        );

        Self {
            placements,
            team_mode: board.team_mode(),
            player_count: state.player_count(),
            game_over: state.is_game_over(),
        }
    }

    /// All placings, best first.
    #[must_use]
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Placing of `player`.
    #[must_use]
    pub fn placement(&self, player: PlayerId) -> Option<&Placement> {
        self.placements.iter().find(|p| p.player == player)
    }

    fn finishers(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.placements.iter().filter(|p| p.finished).map(|p| p.player)
    }

    /// First player home, if any.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.finishers().next()
    }

    /// In team mode, the first team whose members have all finished.
    #[must_use]
    pub fn winning_team(&self) -> Option<TeamId> {
        if !self.team_mode {
            return None;
        }

        let mut finished = Vec::new();
        for player in self.finishers() {
            finished.push(player);
            let team = player.team();
            if team.members(self.player_count).all(|m| finished.contains(&m)) {
                return Some(team);
            }
        }
        None
    }

    /// In team mode, the team of every player not eliminated, if they share
    /// one.
    fn surviving_team(&self) -> Option<TeamId> {
        if !self.team_mode {
            return None;
        }

        let mut teams = self.placements.iter().filter(|p| !p.eliminated).map(|p| p.player.team());
        let team = teams.next()?;
        teams.all(|t| t == team).then_some(team)
    }

    /// The result, once the game is over.
    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        if !self.game_over {
            return None;
        }

        if let Some(team) = self.winning_team().or_else(|| self.surviving_team()) {
            return Some(GameResult::Winners(team, team.members(self.player_count).collect()));
        }
        // With nobody home, a last player standing wins by default.
        let survivor = self.placements.first().filter(|p| !p.eliminated).map(|p| p.player);
        Some(self.winner().or(survivor).map_or(GameResult::Draw, GameResult::Winner))
    }
}
