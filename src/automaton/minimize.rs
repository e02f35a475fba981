//! Moore partition-refinement minimization of deterministic automata.

use itertools::Itertools;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::math::{Map, OrderedSet, Partition};
use crate::Show;

use super::{Automaton, Label, State};

/// A state of the minimal automaton: a class of original states with pairwise
/// indistinguishable future behavior. The fused originals stay accessible through
/// [`Block::states`] so results can be traced back to the input.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Block<Q: Ord> {
    index: usize,
    states: OrderedSet<Q>,
}

impl<Q: Ord> Block<Q> {
    /// Position of this block in the stable partition.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Iterates over the original states fused into this block.
    pub fn states(&self) -> impl Iterator<Item = &Q> {
        self.states.iter()
    }

    /// Whether `state` was fused into this block.
    pub fn contains(&self, state: &Q) -> bool {
        self.states.contains(state)
    }
}

impl<Q: Ord + Show> Show for Block<Q> {
    fn show(&self) -> String {
        format!(
            "B{}{{{}}}",
            self.index,
            self.states.iter().map(|q| q.show()).join(", ")
        )
    }
}

/// The behavior of one state during a refinement round: for every alphabet symbol,
/// either the class its successor currently lives in, or `None` when the state has
/// no such outgoing edge. A missing edge is a legitimate signature component that
/// distinguishes states, not an error.
type Signature = Vec<Option<usize>>;

impl<Q: State, A: Label> Automaton<Q, A> {
    /// Moore's partition-refinement minimization. Fails with
    /// [`Error::NotDeterministic`] unless the input has exactly one initial state
    /// and label-unique outgoing edges.
    ///
    /// Starting from the two-class partition {final, non-final} (an empty side is
    /// dropped), every round computes each state's signature against the current
    /// partition and splits every class by signature. When a full round splits
    /// nothing the partition is stable: its classes become the states of the result,
    /// with one edge per (source class, label) witnessed by any member. A class is
    /// initial or final if any member was.
    ///
    /// The input automaton is never modified.
    pub fn minimize(&self) -> Result<Automaton<Block<Q>, A>> {
        if !self.is_deterministic() {
            return Err(Error::NotDeterministic);
        }

        let letters: Vec<A> = self.alphabet_of().into_iter().sorted().collect();
        let states: Vec<Q> = self.states().cloned().sorted().collect();

        // Seed partition: final vs. non-final, dropping an empty side.
        let has_final = states.iter().any(|q| self.is_final(q));
        let mut class_of: Map<Q, usize> = states
            .iter()
            .map(|q| {
                let class = if self.is_final(q) {
                    0
                } else {
                    usize::from(has_final)
                };
                (q.clone(), class)
            })
            .collect();
        let mut class_count = class_of.values().copied().collect::<OrderedSet<_>>().len();

        loop {
            // Split every class by the signatures of its members.
            let mut renumber: Map<(usize, Signature), usize> = Map::default();
            let mut refined: Map<Q, usize> = Map::default();
            for q in &states {
                let signature: Signature = letters
                    .iter()
                    .map(|a| self.successor(q, a).map(|t| class_of[t]))
                    .collect();
                let fresh = renumber.len();
                let class = *renumber
                    .entry((class_of[q], signature))
                    .or_insert(fresh);
                refined.insert(q.clone(), class);
            }
            let refined_count = renumber.len();
            trace!(classes = refined_count, "refinement round");
            let stable = refined_count == class_count;
            class_of = refined;
            class_count = refined_count;
            if stable {
                break;
            }
        }

        let mut members: Vec<OrderedSet<Q>> = vec![OrderedSet::new(); class_count];
        for q in &states {
            members[class_of[q]].insert(q.clone());
        }
        let partition = Partition::from(members);
        debug!(
            states = states.len(),
            classes = partition.size(),
            "stable partition reached"
        );

        let blocks: Vec<Block<Q>> = partition
            .iter()
            .cloned()
            .enumerate()
            .map(|(index, states)| Block { index, states })
            .collect();

        let mut min = Automaton::new();
        min.set_alphabet(self.alphabet().iter().cloned());
        for block in &blocks {
            min.add_state(block.clone());
            if block.states().any(|q| self.is_initial(q)) {
                min.mark_initial(block.clone());
            }
            if block.states().any(|q| self.is_final(q)) {
                min.mark_final(block.clone());
            }
            // All members share one signature, so any of them witnesses the edges.
            let witness = block.states().next().expect("no class is empty");
            for (label, target) in self.edges_from(witness) {
                min.add_edge(
                    block.clone(),
                    label.clone(),
                    blocks[class_of[target]].clone(),
                );
            }
        }
        Ok(min)
    }
}

#[cfg(test)]
mod tests {
    use super::super::Automaton;
    use crate::error::Error;

    /// The DFA from Wikipedia's minimization article: six states collapse to three.
    fn wiki_dfa() -> Automaton<usize, char> {
        let mut aut = Automaton::new();
        for (source, label, target) in [
            (0, 'a', 1),
            (0, 'b', 2),
            (1, 'a', 0),
            (1, 'b', 3),
            (2, 'a', 4),
            (2, 'b', 5),
            (3, 'a', 4),
            (3, 'b', 5),
            (4, 'a', 4),
            (4, 'b', 5),
            (5, 'a', 5),
            (5, 'b', 5),
        ] {
            aut.add_edge(source, label, target);
        }
        aut.mark_initial(0);
        for f in [2, 3, 4] {
            aut.mark_final(f);
        }
        aut
    }

    #[test_log::test]
    fn wiki_dfa_minimizes_to_three_blocks() {
        let min = wiki_dfa().minimize().unwrap();
        assert_eq!(min.state_count(), 3);
        assert!(min.is_deterministic());
        // {0,1}, {2,3,4} and the sink {5}.
        assert!(min.states().any(|b| b.contains(&0) && b.contains(&1)));
        assert!(min
            .states()
            .any(|b| b.contains(&2) && b.contains(&3) && b.contains(&4)));
    }

    #[test]
    fn minimization_preserves_bounded_language() {
        let aut = wiki_dfa();
        let min = aut.minimize().unwrap();
        assert_eq!(aut.words_upto(5), min.words_upto(5));
    }

    #[test]
    fn minimization_is_idempotent() {
        let min = wiki_dfa().minimize().unwrap();
        let again = min.minimize().unwrap();
        assert_eq!(min.state_count(), again.state_count());
        assert_eq!(min.edge_count(), again.edge_count());
    }

    #[test]
    fn rejects_nondeterministic_input() {
        let mut aut: Automaton<usize, char> = Automaton::new();
        aut.add_edge(0, 'a', 1);
        aut.add_edge(0, 'a', 2);
        aut.mark_initial(0);
        aut.mark_final(1);
        assert_eq!(aut.minimize(), Err(Error::NotDeterministic));
    }

    #[test]
    fn missing_edges_are_distinguishing() {
        // 1 accepts on 'a', 2 has no edges at all; they must not be merged even
        // though both are non-final, because only one can continue with 'a'.
        let mut aut: Automaton<usize, char> = Automaton::new();
        aut.add_edge(0, 'b', 1);
        aut.add_edge(0, 'a', 2);
        aut.add_edge(1, 'a', 3);
        aut.mark_initial(0);
        aut.mark_final(3);
        let min = aut.minimize().unwrap();
        assert!(min
            .states()
            .all(|b| !(b.contains(&1) && b.contains(&2))));
        assert_eq!(aut.words_upto(3), min.words_upto(3));
    }
}
