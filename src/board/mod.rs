//! The board: static path tables and mutable token state.

pub mod path;
pub mod state;

pub use path::{
    Color, PathMode, PathTable, ALT_PATH_LEN, HOME_RUN_LEN, LOOP_LEN, LOOP_SQUARES_BEFORE_HOME,
    TOKENS_PER_PLAYER,
};
pub use state::{BoardState, Token, TokenList};
