//! Multiplex siteswap state graphs: several anonymous balls may share a landing
//! beat, bounded by what one hand can hold. Generalizes the vanilla diagram; with a
//! capacity of one it degenerates to it.

use itertools::Itertools;

use crate::automaton::Automaton;
use crate::error::{Error, Result};
use crate::seq::left_shift;
use crate::Show;

/// Ball counts per landing slot: entry `i` is how many balls land in `i` more
/// beats, each entry bounded by the hand capacity.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct MultiplexState(Vec<u8>);

impl MultiplexState {
    /// The per-slot ball counts.
    pub fn counts(&self) -> &[u8] {
        &self.0
    }

    /// Number of balls in the pattern.
    pub fn ball_count(&self) -> usize {
        self.0.iter().map(|&c| c as usize).sum()
    }

    /// The legal multiset throws out of this state: everything landing now is
    /// caught at once and goes up again as a multiset of heights, respecting the
    /// per-slot capacity.
    fn transitions(&self, capacity: u8) -> Vec<(MultiplexThrow, MultiplexState)> {
        let caught = self.0[0] as usize;
        let shifted = left_shift(&self.0, 1);
        if caught == 0 {
            return vec![(MultiplexThrow(Vec::new()), MultiplexState(shifted))];
        }
        let mut transitions = Vec::new();
        for slots in (0..shifted.len()).combinations_with_replacement(caught) {
            let mut next = shifted.clone();
            let mut legal = true;
            for &slot in &slots {
                next[slot] += 1;
                if next[slot] > capacity {
                    legal = false;
                    break;
                }
            }
            if legal {
                let heights = slots.iter().map(|&slot| (slot + 1) as u8).collect();
                transitions.push((MultiplexThrow(heights), MultiplexState(next)));
            }
        }
        transitions
    }
}

impl Show for MultiplexState {
    fn show(&self) -> String {
        self.0.iter().map(|c| c.to_string()).collect()
    }
}

/// The multiset of heights thrown on one beat, sorted ascending. Empty when no
/// ball landed and the beat passes quietly.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct MultiplexThrow(Vec<u8>);

impl MultiplexThrow {
    /// The thrown heights, ascending.
    pub fn heights(&self) -> &[u8] {
        &self.0
    }
}

impl Show for MultiplexThrow {
    fn show(&self) -> String {
        if self.0.is_empty() {
            "0".to_string()
        } else {
            format!("[{}]", self.0.iter().join(""))
        }
    }
}

/// Builds the multiplex-siteswap automaton for `nb_balls` balls, throws up to
/// `max_height` and at most `hand_capacity` balls landing together. All states are
/// initial and final, patterns being cycles. Fails when the slots cannot hold all
/// balls.
pub fn multiplex(
    nb_balls: usize,
    max_height: usize,
    hand_capacity: u8,
) -> Result<Automaton<MultiplexState, MultiplexThrow>> {
    if max_height == 0 || max_height * (hand_capacity as usize) < nb_balls {
        return Err(Error::MaxHeightTooSmall {
            balls: nb_balls,
            max_height,
        });
    }
    let mut aut = Automaton::new();
    for counts in itertools::repeat_n(0..=hand_capacity, max_height).multi_cartesian_product() {
        if counts.iter().map(|&c| c as usize).sum::<usize>() == nb_balls {
            aut.add_state(MultiplexState(counts));
        }
    }
    let states: Vec<MultiplexState> = aut.states().cloned().collect();
    for state in states {
        for (throw, next) in state.transitions(hand_capacity) {
            aut.add_edge(state.clone(), throw, next);
        }
        aut.mark_initial(state.clone());
        aut.mark_final(state);
    }
    Ok(aut)
}
