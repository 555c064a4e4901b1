//! Static path tables.
//!
//! Every color races around the same 52-square loop, starting at its own
//! entry square. Once a color has captured an opponent it switches to its
//! alternate path: the first 50 loop squares from its entry, then its private
//! six-square home column and the shared center.
//!
//! The tables are built once on first use and shared for the lifetime of the
//! process.

use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::core::{PlayerId, Square};

/// Tokens each player owns.
pub const TOKENS_PER_PLAYER: usize = 4;

/// Length of the shared outer loop.
pub const LOOP_LEN: usize = 52;

/// Loop squares a color walks before turning into its home column.
pub const LOOP_SQUARES_BEFORE_HOME: usize = 50;

/// Home column squares plus the terminal center square.
pub const HOME_RUN_LEN: usize = 7;

/// Length of every color's alternate path.
pub const ALT_PATH_LEN: usize = LOOP_SQUARES_BEFORE_HOME + HOME_RUN_LEN;

/// Loop offset between consecutive colors' entry squares.
const ENTRY_STRIDE: usize = 13;

/// Star squares sit this many steps past each entry.
const STAR_OFFSET: usize = 8;

const LOOP: [(u8, u8); LOOP_LEN] = [
    (6, 1), (6, 2), (6, 3), (6, 4), (6, 5), (5, 6), (4, 6), (3, 6), (2, 6), (1, 6), (0, 6), (0, 7), (0, 8),
    (1, 8), (2, 8), (3, 8), (4, 8), (5, 8), (6, 9), (6, 10), (6, 11), (6, 12), (6, 13), (6, 14), (7, 14), (8, 14),
    (8, 13), (8, 12), (8, 11), (8, 10), (8, 9), (9, 8), (10, 8), (11, 8), (12, 8), (13, 8), (14, 8), (14, 7), (14, 6),
    (13, 6), (12, 6), (11, 6), (10, 6), (9, 6), (8, 5), (8, 4), (8, 3), (8, 2), (8, 1), (8, 0), (7, 0), (6, 0),
];

const HOME_COLUMNS: [[(u8, u8); HOME_RUN_LEN - 1]; 4] = [
    [(7, 1), (7, 2), (7, 3), (7, 4), (7, 5), (7, 6)],
    [(1, 7), (2, 7), (3, 7), (4, 7), (5, 7), (6, 7)],
    [(7, 13), (7, 12), (7, 11), (7, 10), (7, 9), (7, 8)],
    [(13, 7), (12, 7), (11, 7), (10, 7), (9, 7), (8, 7)],
];

const CENTER: Square = Square::new(7, 7);

const YARDS: [[(u8, u8); TOKENS_PER_PLAYER]; 4] = [
    [(1, 1), (1, 2), (2, 1), (2, 2)],
    [(1, 12), (1, 13), (2, 12), (2, 13)],
    [(12, 12), (12, 13), (13, 12), (13, 13)],
    [(12, 1), (12, 2), (13, 1), (13, 2)],
];

/// Player colors, in seating order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
}

impl Color {
    /// All colors in seating order.
    pub const ALL: [Color; 4] = [Color::Red, Color::Green, Color::Blue, Color::Yellow];

    /// Color played by `player`.
    #[must_use]
    pub const fn of(player: PlayerId) -> Self {
        Self::ALL[player.index()]
    }

    /// Seat index of this color.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Loop index of this color's entry square.
    #[must_use]
    pub const fn entry_offset(self) -> usize {
        self.index() * ENTRY_STRIDE
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Color::Red => "Red",
            Color::Green => "Green",
            Color::Blue => "Blue",
            Color::Yellow => "Yellow",
        };
        f.write_str(name)
    }
}

/// Which of its two paths a player's tokens currently follow.
///
/// Switches from `MainLoop` to `HomeRun` on a player's first capture and
/// never switches back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathMode {
    /// Closed 52-square ring; movement wraps.
    #[default]
    MainLoop,
    /// Open path ending at the center; movement never wraps.
    HomeRun,
}

impl PathMode {
    /// Mode implied by a player's has-captured flag.
    #[must_use]
    pub const fn from_captured(has_captured: bool) -> Self {
        if has_captured {
            PathMode::HomeRun
        } else {
            PathMode::MainLoop
        }
    }
}

/// Precomputed per-color paths, yards and safe squares.
#[derive(Debug)]
pub struct PathTable {
    main: [Vec<Square>; 4],
    alt: [Vec<Square>; 4],
    yards: [[Square; TOKENS_PER_PLAYER]; 4],
    safe: Vec<Square>,
}

static TABLE: LazyLock<PathTable> = LazyLock::new(PathTable::build);

fn sq((row, col): (u8, u8)) -> Square {
    Square::new(row, col)
}

impl PathTable {
    /// The process-wide table.
    #[must_use]
    pub fn get() -> &'static PathTable {
        &TABLE
    }

    fn build() -> Self {
        let main = Color::ALL.map(|color| {
            (0..LOOP_LEN)
                .map(|i| sq(LOOP[(color.entry_offset() + i) % LOOP_LEN]))
                .collect::<Vec<_>>()
        });

        let alt = Color::ALL.map(|color| {
            let mut path: Vec<Square> = main[color.index()][..LOOP_SQUARES_BEFORE_HOME].to_vec();
            path.extend(HOME_COLUMNS[color.index()].iter().copied().map(sq));
            path.push(CENTER);
            path
        });

        let yards = YARDS.map(|yard| yard.map(sq));

        let safe = Color::ALL
            .iter()
            .flat_map(|color| {
                [
                    sq(LOOP[color.entry_offset()]),
                    sq(LOOP[color.entry_offset() + STAR_OFFSET]),
                ]
            })
            .collect();

        Self { main, alt, yards, safe }
    }

    /// The 52-square loop as seen from `color`'s entry square.
    #[must_use]
    pub fn main_path(&self, color: Color) -> &[Square] {
        &self.main[color.index()]
    }

    /// The 57-square path `color` follows after its first capture.
    #[must_use]
    pub fn alt_path(&self, color: Color) -> &[Square] {
        &self.alt[color.index()]
    }

    /// Path for `color` in the given mode.
    #[must_use]
    pub fn path(&self, color: Color, mode: PathMode) -> &[Square] {
        match mode {
            PathMode::MainLoop => self.main_path(color),
            PathMode::HomeRun => self.alt_path(color),
        }
    }

    /// The four yard slots of `color`.
    #[must_use]
    pub fn yard_squares(&self, color: Color) -> &[Square; TOKENS_PER_PLAYER] {
        &self.yards[color.index()]
    }

    /// Whether `square` is one of `color`'s yard slots.
    #[must_use]
    pub fn is_yard(&self, color: Color, square: Square) -> bool {
        self.yards[color.index()].contains(&square)
    }

    /// Square a token of `color` enters on when leaving the yard.
    #[must_use]
    pub fn start_square(&self, color: Color) -> Square {
        self.main[color.index()][0]
    }

    /// The shared center square every alternate path ends on.
    #[must_use]
    pub fn terminal_square(&self) -> Square {
        CENTER
    }

    /// Whether `square` ends any color's alternate path.
    #[must_use]
    pub fn is_terminal(&self, square: Square) -> bool {
        self.alt.iter().any(|path| path.last() == Some(&square))
    }

    /// Whether captures are forbidden on `square`.
    #[must_use]
    pub fn is_safe(&self, square: Square) -> bool {
        self.safe.contains(&square)
    }

    /// The eight safe squares.
    #[must_use]
    pub fn safe_squares(&self) -> &[Square] {
        &self.safe
    }

    /// Index of `square` on `color`'s path in `mode`, if it lies on it.
    #[must_use]
    pub fn index_of(&self, color: Color, mode: PathMode, square: Square) -> Option<usize> {
        self.path(color, mode).iter().position(|&s| s == square)
    }

    /// Index of the path square closest to `square` by Manhattan distance.
    ///
    /// Ties resolve to the earliest index.
    #[must_use]
    pub fn nearest_index(&self, color: Color, mode: PathMode, square: Square) -> usize {
        self.path(color, mode)
            .iter()
            .enumerate()
            .min_by_key(|(i, s)| (s.manhattan(square), *i))
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_lengths() {
        let table = PathTable::get();
        for color in Color::ALL {
            assert_eq!(table.main_path(color).len(), LOOP_LEN);
            assert_eq!(table.alt_path(color).len(), ALT_PATH_LEN);
        }
    }

    #[test]
    fn test_loop_is_a_closed_walk() {
        let table = PathTable::get();
        let path = table.main_path(Color::Red);
        for i in 0..LOOP_LEN {
            let next = path[(i + 1) % LOOP_LEN];
            assert!(path[i].manhattan(next) <= 2, "gap between {} and {}", path[i], next);
        }
    }

    #[test]
    fn test_loop_squares_are_distinct() {
        let mut squares: Vec<_> = LOOP.iter().copied().map(sq).collect();
        squares.sort();
        squares.dedup();
        assert_eq!(squares.len(), LOOP_LEN);
    }

    #[test]
    fn test_main_path_rotation() {
        let table = PathTable::get();
        assert_eq!(table.start_square(Color::Red), Square::new(6, 1));
        assert_eq!(table.start_square(Color::Green), Square::new(1, 8));
        assert_eq!(table.start_square(Color::Blue), Square::new(8, 13));
        assert_eq!(table.start_square(Color::Yellow), Square::new(13, 6));

        let red = table.main_path(Color::Red);
        let green = table.main_path(Color::Green);
        assert_eq!(green[LOOP_LEN - ENTRY_STRIDE], red[0]);
    }

    #[test]
    fn test_alt_path_shape() {
        let table = PathTable::get();
        for color in Color::ALL {
            let main = table.main_path(color);
            let alt = table.alt_path(color);
            assert_eq!(&alt[..LOOP_SQUARES_BEFORE_HOME], &main[..LOOP_SQUARES_BEFORE_HOME]);
            assert_eq!(alt.last(), Some(&table.terminal_square()));
            // Home column squares are private to the color.
            for &square in &alt[LOOP_SQUARES_BEFORE_HOME..ALT_PATH_LEN - 1] {
                assert!(!main.contains(&square));
            }
        }
        assert_eq!(table.alt_path(Color::Red)[LOOP_SQUARES_BEFORE_HOME], Square::new(7, 1));
        assert_eq!(table.alt_path(Color::Red)[LOOP_SQUARES_BEFORE_HOME - 1], Square::new(8, 0));
    }

    #[test]
    fn test_safe_squares() {
        let table = PathTable::get();
        assert_eq!(table.safe_squares().len(), 8);
        for color in Color::ALL {
            assert!(table.is_safe(table.start_square(color)));
        }
        for star in [(2, 6), (6, 12), (12, 8), (8, 2)] {
            assert!(table.is_safe(sq(star)));
        }
        assert!(!table.is_safe(Square::new(6, 2)));
        assert!(!table.is_safe(table.terminal_square()));
    }

    #[test]
    fn test_yards() {
        let table = PathTable::get();
        assert!(table.is_yard(Color::Red, Square::new(2, 2)));
        assert!(!table.is_yard(Color::Green, Square::new(2, 2)));
        assert_eq!(table.yard_squares(Color::Yellow)[0], Square::new(12, 1));
    }

    #[test]
    fn test_index_lookup_and_nearest_fallback() {
        let table = PathTable::get();
        let home_entry = table.main_path(Color::Red)[LOOP_SQUARES_BEFORE_HOME];
        assert_eq!(home_entry, Square::new(7, 0));

        assert_eq!(table.index_of(Color::Red, PathMode::MainLoop, home_entry), Some(50));
        assert_eq!(table.index_of(Color::Red, PathMode::HomeRun, home_entry), None);

        // (7, 0) is one step from both (8, 0) at index 49 and (7, 1) at 50.
        assert_eq!(table.nearest_index(Color::Red, PathMode::HomeRun, home_entry), 49);
    }

    #[test]
    fn test_terminal() {
        let table = PathTable::get();
        assert!(table.is_terminal(Square::new(7, 7)));
        assert!(!table.is_terminal(Square::new(7, 6)));
        assert_eq!(PathMode::from_captured(true), PathMode::HomeRun);
        assert_eq!(PathMode::from_captured(false), PathMode::MainLoop);
    }
}
