//! Errors reported for violated preconditions.
//!
//! Infeasibility is deliberately not represented here: a melody that no
//! legal pattern can play yields an *empty* automaton, which is a valid
//! negative answer and not a failure of the construction.

use crate::juggling::Note;

/// The ways in which a caller can hand the crate an ill-posed problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Minimization is only defined on deterministic automata.
    #[error("operation requires a deterministic automaton")]
    NotDeterministic,
    /// The melody constructors need at least one beat to anchor the
    /// initial and final configurations.
    #[error("melody must contain at least one beat")]
    EmptyMelody,
    /// A note occurs in the melody for which no ball exists.
    #[error("melody note {0} has no matching ball")]
    UnknownNote(Note),
    /// The airborne slots cannot accommodate the requested number of balls.
    #[error("max height {max_height} cannot keep {balls} balls airborne")]
    MaxHeightTooSmall {
        /// Number of balls that would have to be in flight simultaneously.
        balls: usize,
        /// The offered number of airborne slots.
        max_height: usize,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
