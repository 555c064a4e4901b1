//! Ludo rules: movement and captures.
//!
//! Both are stateless views over the shared [`PathTable`](crate::board::PathTable).
//! They read and mutate a [`BoardState`](crate::board::BoardState) but never
//! decide whose turn it is; that belongs to the [`turn`](crate::turn) module.

pub mod movement;
pub mod capture;

pub use movement::{Blockage, MoveOutcome, MovementResolver};
pub use capture::{CaptureEngine, CaptureEvent};
