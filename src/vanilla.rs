//! Vanilla-siteswap state graphs: anonymous balls, one per slot, every landing ball
//! rethrown on the spot. The classic siteswap diagram, melody-free and cyclic.

use itertools::Itertools;

use crate::automaton::Automaton;
use crate::error::{Error, Result};
use crate::seq::cyclic_left_shift;
use crate::Show;

/// Occupancy of the landing slots: `true` at index `i` means some ball lands in
/// `i` more beats. Balls are anonymous here, so the occupancy vector is the whole
/// state.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct SiteswapState(Vec<bool>);

impl SiteswapState {
    /// The slot occupancy vector.
    pub fn slots(&self) -> &[bool] {
        &self.0
    }

    /// Number of balls in the pattern.
    pub fn ball_count(&self) -> usize {
        self.0.iter().filter(|&&occupied| occupied).count()
    }

    /// The legal throws out of this state. An empty slot 0 means nothing lands and
    /// nothing can be thrown, written as throw 0; a landing ball must go up again
    /// immediately, into any slot left empty after the shift.
    fn transitions(&self) -> Vec<(u8, SiteswapState)> {
        if !self.0[0] {
            return vec![(0, SiteswapState(cyclic_left_shift(&self.0, 1)))];
        }
        let mut shifted = cyclic_left_shift(&self.0, 1);
        *shifted.last_mut().expect("at least one slot") = false;
        let mut transitions = Vec::new();
        for slot in 0..shifted.len() {
            if !shifted[slot] {
                let mut next = shifted.clone();
                next[slot] = true;
                transitions.push(((slot + 1) as u8, SiteswapState(next)));
            }
        }
        transitions
    }
}

impl Show for SiteswapState {
    fn show(&self) -> String {
        self.0
            .iter()
            .map(|&occupied| if occupied { '1' } else { '0' })
            .collect()
    }
}

impl std::fmt::Display for SiteswapState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.show())
    }
}

/// Builds the vanilla-siteswap automaton for `nb_balls` balls and throws up to
/// `max_height`. States are all occupancy vectors with `nb_balls` balls; as every
/// siteswap pattern is a cycle, every state is both initial and final. Fails when
/// the balls cannot all be airborne at once.
pub fn vanilla(nb_balls: usize, max_height: usize) -> Result<Automaton<SiteswapState, u8>> {
    if max_height < nb_balls {
        return Err(Error::MaxHeightTooSmall {
            balls: nb_balls,
            max_height,
        });
    }
    let mut aut = Automaton::new();
    aut.set_alphabet((0..=max_height).map(|h| h as u8));
    for occupied in (0..max_height).combinations(nb_balls) {
        let mut slots = vec![false; max_height];
        for slot in occupied {
            slots[slot] = true;
        }
        aut.add_state(SiteswapState(slots));
    }
    let states: Vec<SiteswapState> = aut.states().cloned().collect();
    for state in states {
        for (throw, next) in state.transitions() {
            aut.add_edge(state.clone(), throw, next);
        }
        aut.mark_initial(state.clone());
        aut.mark_final(state);
    }
    Ok(aut)
}
