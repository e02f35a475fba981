//! Library for synthesizing and analyzing automata of musical juggling patterns.
//!
//! A juggler playing a melody on pitched balls has to solve a scheduling problem: every
//! beat either sounds a note (some specific ball must land) or stays silent, and the only
//! controls are which ball to throw next and how high. This crate models the problem as a
//! finite automaton whose states are *configurations* — what each hand holds, what is in
//! flight and when it lands, and which hand throws next — and whose edges are the legal
//! one-beat throws. The language of the automaton is exactly the set of throw sequences
//! that reproduce a given melody.
//!
//! Three constructors build such automata. [`forwards`](forwards::forwards) enumerates
//! every admissible opening configuration and expands beat by beat under the melody's
//! note constraints; [`backwards`](backwards::backwards) builds the same language from
//! the closing configurations by predecessor expansion, which tends to meet the note
//! constraints much earlier; and [`Omnimusic`](omnimusic::Omnimusic) drops the melody
//! entirely, enumerating *every* legal configuration for a ball set and maximum height.
//! Projecting the universal automaton onto catch events and running it through
//! [`determinize`](automaton::Automaton::determinize) and
//! [`minimize`](automaton::Automaton::minimize) yields the canonical minimal recognizer
//! of all realizable note sequences, independent of any particular melody.
//!
//! The automaton type itself is generic over value-typed states and edge labels:
//! configurations carry no identity beyond their fields, so they can be shared freely
//! between edges and automata. Construction is incremental; trimming, determinization
//! and minimization always produce new automata and never mutate their input. The
//! [`vanilla`](vanilla::vanilla) and [`multiplex`](multiplex::multiplex) constructors
//! round the family out with the classic melody-free siteswap state graphs over
//! anonymous balls.
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use musical_siteswap::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        automaton::{Automaton, Block, Label, State, Subset},
        backwards::backwards,
        error::{Error, Result},
        forwards::forwards,
        juggling::{melody, Ball, Config, Hand, Note, Throw},
        math,
        multiplex::{multiplex, MultiplexState, MultiplexThrow},
        omnimusic::Omnimusic,
        seq,
        vanilla::{vanilla, SiteswapState},
        Show,
    };
}

/// Definitions of small mathematical objects (sets, maps, partitions) used throughout
/// the crate.
pub mod math;

/// Helpers for shifting and indexing fixed-length sequences.
pub mod seq;

/// Error type for violated preconditions.
pub mod error;
pub use error::{Error, Result};

/// The generic labeled-multigraph automaton and its algebra.
pub mod automaton;

/// The physical model: balls, notes, hands, throws and configurations.
pub mod juggling;

/// Forward melody-constrained construction.
pub mod forwards;

/// Backward melody-constrained construction.
pub mod backwards;

/// The melody-independent universal automaton and its catch-event projection.
pub mod omnimusic;

/// Vanilla siteswap state graphs over anonymous balls.
pub mod vanilla;

/// Multiplex siteswap state graphs, several balls per hand and beat.
pub mod multiplex;

/// Helper trait which can be used to display states and labels.
///
/// Returns a human readable representation of `self`; for a configuration this is the
/// compact hand/airborne picture, for a throw something like `A2`. Mainly used by the
/// DOT export and for debugging purposes.
pub trait Show {
    /// Returns a human readable representation of `self`.
    fn show(&self) -> String;
}

impl Show for usize {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for u8 {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for char {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for String {
    fn show(&self) -> String {
        self.clone()
    }
}

impl<S: Show> Show for &S {
    fn show(&self) -> String {
        S::show(*self)
    }
}
