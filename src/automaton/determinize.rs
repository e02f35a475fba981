//! Subset construction, turning any automaton into a deterministic one over sets of
//! original states.

use std::collections::{BTreeMap, VecDeque};

use itertools::Itertools;
use tracing::debug;

use crate::math::OrderedSet;
use crate::Show;

use super::{Automaton, Label, State};

/// A set of states of the original automaton, acting as a single state of the
/// determinized one. Ordered so that two subsets with the same members always
/// compare and hash equal, which is what merges converging transitions.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Subset<Q: Ord>(OrderedSet<Q>);

impl<Q: Ord> Subset<Q> {
    /// Iterates over the member states.
    pub fn states(&self) -> impl Iterator<Item = &Q> {
        self.0.iter()
    }

    /// The number of member states.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the empty subset, which arises as the start state when the original
    /// automaton has no initial states at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `state` is a member.
    pub fn contains(&self, state: &Q) -> bool {
        self.0.contains(state)
    }
}

impl<Q: Ord> FromIterator<Q> for Subset<Q> {
    fn from_iter<I: IntoIterator<Item = Q>>(iter: I) -> Self {
        Subset(iter.into_iter().collect())
    }
}

impl<Q: Ord + Show> Show for Subset<Q> {
    fn show(&self) -> String {
        format!("{{{}}}", self.0.iter().map(|q| q.show()).join(", "))
    }
}

impl<Q: State, A: Label> Automaton<Q, A> {
    /// Classic subset construction. The set of initial states becomes the single
    /// initial state of the result; from each discovered subset and each label, the
    /// union of label-successors over all members forms the target subset. Subsets are
    /// deduplicated by value and expanded exactly once off a worklist, so the
    /// construction terminates within the powerset of the original state set. A
    /// subset is final iff it intersects the original final set.
    ///
    /// The input is not modified; the result always satisfies
    /// [`Automaton::is_deterministic`].
    pub fn determinize(&self) -> Automaton<Subset<Q>, A> {
        let mut det = Automaton::new();
        det.set_alphabet(self.alphabet().iter().cloned());

        let start: Subset<Q> = self.initial_states().iter().cloned().collect();
        det.mark_initial(start.clone());
        if start.states().any(|q| self.is_final(q)) {
            det.mark_final(start.clone());
        }

        let mut queue = VecDeque::from([start]);
        while let Some(subset) = queue.pop_front() {
            // Gather, per label, the union of successors over all members. The
            // ordered map keeps edge insertion independent of hash order.
            let mut targets: BTreeMap<A, OrderedSet<Q>> = BTreeMap::new();
            for q in subset.states() {
                for (a, t) in self.edges_from(q) {
                    targets.entry(a.clone()).or_default().insert(t.clone());
                }
            }
            for (label, members) in targets {
                let next = Subset(members);
                if !det.contains_state(&next) {
                    det.add_state(next.clone());
                    if next.states().any(|q| self.is_final(q)) {
                        det.mark_final(next.clone());
                    }
                    queue.push_back(next.clone());
                }
                det.add_edge(subset.clone(), label, next);
            }
        }

        debug!(
            states = self.state_count(),
            subsets = det.state_count(),
            "determinized automaton"
        );
        det
    }
}
