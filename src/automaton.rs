//! A directed labeled multigraph with designated initial and final state subsets.
//!
//! States are value objects: two states are the same node exactly when they compare
//! equal, which lets the juggling constructors use configurations directly as nodes
//! without an indirection through indices. Parallel edges between the same ordered
//! pair of states are allowed as long as their labels differ; [`Automaton::add_edge`]
//! silently deduplicates exact `(source, label, target)` repeats.
//!
//! The operations split into two groups. Queries ([`Automaton::reachable`],
//! [`Automaton::is_deterministic`], [`Automaton::alphabet_of`],
//! [`Automaton::words_upto`]) never touch the graph. Reductions come in both
//! flavors the caller may want: [`Automaton::trim`] prunes in place while
//! [`Automaton::trimmed`], [`Automaton::determinize`] and [`Automaton::minimize`]
//! leave their input untouched and hand back a new automaton.

mod determinize;
mod dot;
mod minimize;

pub use determinize::Subset;
pub use minimize::Block;

use std::collections::{BTreeSet, VecDeque};
use std::fmt::Debug;
use std::hash::Hash;

use itertools::Itertools;
use tracing::trace;

use crate::math::{Map, Set};
use crate::Show;

/// Bounds a type must satisfy to act as a state: value equality and hashing, a total
/// order for canonical subsets, and a way to print itself.
pub trait State: Clone + Eq + Ord + Hash + Show + Debug {}
impl<T: Clone + Eq + Ord + Hash + Show + Debug> State for T {}

/// Bounds a type must satisfy to act as an edge label. Identical to [`State`] on
/// purpose: determinization turns label sets into signature indices, which needs the
/// same order and hash structure.
pub trait Label: Clone + Eq + Ord + Hash + Show + Debug {}
impl<T: Clone + Eq + Ord + Hash + Show + Debug> Label for T {}

/// A finite automaton over states `Q` and edge labels `A`.
#[derive(Clone)]
pub struct Automaton<Q, A> {
    succ: Map<Q, Vec<(A, Q)>>,
    pred: Map<Q, Set<Q>>,
    initial: Set<Q>,
    finals: Set<Q>,
    alphabet: Set<A>,
}

impl<Q: State, A: Label> Default for Automaton<Q, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Q: State, A: Label> Automaton<Q, A> {
    /// Creates an automaton with no states, no edges and an empty alphabet.
    pub fn new() -> Self {
        Self {
            succ: Map::default(),
            pred: Map::default(),
            initial: Set::default(),
            finals: Set::default(),
            alphabet: Set::default(),
        }
    }

    /// The number of states.
    pub fn state_count(&self) -> usize {
        self.succ.len()
    }

    /// The number of edges, parallel edges counted separately.
    pub fn edge_count(&self) -> usize {
        self.succ.values().map(Vec::len).sum()
    }

    /// True if the automaton has no states at all. This is the shape of a negative
    /// answer from the melody constructors, so callers should expect it.
    pub fn is_empty(&self) -> bool {
        self.succ.is_empty()
    }

    /// Whether `state` is a node of the automaton.
    pub fn contains_state(&self, state: &Q) -> bool {
        self.succ.contains_key(state)
    }

    /// Iterates over all states.
    pub fn states(&self) -> impl Iterator<Item = &Q> {
        self.succ.keys()
    }

    /// Iterates over all `(source, label, target)` edges.
    pub fn edges(&self) -> impl Iterator<Item = (&Q, &A, &Q)> {
        self.succ
            .iter()
            .flat_map(|(q, out)| out.iter().map(move |(a, t)| (q, a, t)))
    }

    /// Iterates over the `(label, target)` pairs leaving `state`. Empty for unknown
    /// states.
    pub fn edges_from<'a>(&'a self, state: &Q) -> impl Iterator<Item = (&'a A, &'a Q)> {
        self.succ
            .get(state)
            .into_iter()
            .flat_map(|out| out.iter().map(|(a, t)| (a, t)))
    }

    /// The unique `label`-successor of `state`, if one exists. Only meaningful on
    /// deterministic automata, where at most one such edge can be present.
    pub fn successor<'a>(&'a self, state: &Q, label: &A) -> Option<&'a Q> {
        self.succ
            .get(state)?
            .iter()
            .find_map(|(a, t)| (a == label).then_some(t))
    }

    /// Iterates over the distinct predecessor states of `state`.
    pub fn predecessors<'a>(&'a self, state: &Q) -> impl Iterator<Item = &'a Q> {
        self.pred.get(state).into_iter().flatten()
    }

    /// Inserts a state. Returns false if it was already present.
    pub fn add_state(&mut self, state: Q) -> bool {
        if self.succ.contains_key(&state) {
            return false;
        }
        self.pred.insert(state.clone(), Set::default());
        self.succ.insert(state, Vec::new());
        true
    }

    /// Inserts an edge, creating missing endpoints on the fly and recording the label
    /// in the alphabet. A `(source, label, target)` triple that is already present is
    /// not duplicated; returns whether the edge was actually added.
    pub fn add_edge(&mut self, source: Q, label: A, target: Q) -> bool {
        self.add_state(source.clone());
        self.add_state(target.clone());
        let out = self.succ.get_mut(&source).expect("state was just inserted");
        if out.iter().any(|(a, t)| *a == label && *t == target) {
            return false;
        }
        out.push((label.clone(), target.clone()));
        self.pred
            .get_mut(&target)
            .expect("state was just inserted")
            .insert(source);
        self.alphabet.insert(label);
        true
    }

    /// Marks a state as initial, inserting it if necessary.
    pub fn mark_initial(&mut self, state: Q) {
        self.add_state(state.clone());
        self.initial.insert(state);
    }

    /// Marks a state as final, inserting it if necessary.
    pub fn mark_final(&mut self, state: Q) {
        self.add_state(state.clone());
        self.finals.insert(state);
    }

    /// The set of initial states.
    pub fn initial_states(&self) -> &Set<Q> {
        &self.initial
    }

    /// The set of final states.
    pub fn final_states(&self) -> &Set<Q> {
        &self.finals
    }

    /// Whether `state` is initial.
    pub fn is_initial(&self, state: &Q) -> bool {
        self.initial.contains(state)
    }

    /// Whether `state` is final.
    pub fn is_final(&self, state: &Q) -> bool {
        self.finals.contains(state)
    }

    /// The declared alphabet. Grows automatically as edges are added, and can be
    /// extended beyond the labels in use via [`Automaton::set_alphabet`].
    pub fn alphabet(&self) -> &Set<A> {
        &self.alphabet
    }

    /// Declares additional alphabet symbols, typically the full label universe of a
    /// construction of which only a part ends up on edges.
    pub fn set_alphabet<I: IntoIterator<Item = A>>(&mut self, symbols: I) {
        self.alphabet.extend(symbols);
    }

    /// The set of labels actually carried by some edge. A subset of
    /// [`Automaton::alphabet`]; computing it is how a stated alphabet is validated or
    /// rebuilt.
    pub fn alphabet_of(&self) -> Set<A> {
        self.edges().map(|(_, a, _)| a.clone()).collect()
    }

    /// Breadth-first search from `sources` along successor edges, or along
    /// predecessor edges if `reverse`. Returns every state met, including the
    /// sources themselves. The visited set doubles as the dedup that guarantees
    /// termination on any finite graph.
    pub fn reachable<'a, I>(&self, sources: I, reverse: bool) -> Set<Q>
    where
        Q: 'a,
        I: IntoIterator<Item = &'a Q>,
    {
        let mut met: Set<Q> = sources.into_iter().cloned().collect();
        let mut queue: VecDeque<Q> = met.iter().cloned().collect();
        while let Some(state) = queue.pop_front() {
            if reverse {
                for p in self.predecessors(&state) {
                    if met.insert(p.clone()) {
                        queue.push_back(p.clone());
                    }
                }
            } else {
                for (_, t) in self.edges_from(&state) {
                    if met.insert(t.clone()) {
                        queue.push_back(t.clone());
                    }
                }
            }
        }
        met
    }

    /// The states reachable from the initial set.
    pub fn accessible(&self) -> Set<Q> {
        self.reachable(&self.initial, false)
    }

    /// The states from which the final set is reachable.
    pub fn coaccessible(&self) -> Set<Q> {
        self.reachable(&self.finals, true)
    }

    /// Restricts the automaton, in place, to the states lying on some path from an
    /// initial to a final state. Edges touching removed states disappear with them.
    pub fn trim(&mut self) {
        let accessible = self.accessible();
        let coaccessible = self.coaccessible();
        let keep: Set<Q> = accessible.intersection(&coaccessible).cloned().collect();
        trace!(
            before = self.state_count(),
            after = keep.len(),
            "trimming automaton"
        );
        self.retain_states(&keep);
    }

    /// Non-mutating counterpart of [`Automaton::trim`].
    pub fn trimmed(&self) -> Self {
        let mut aut = self.clone();
        aut.trim();
        aut
    }

    /// Removes every state not contained in `keep`, along with its edges.
    pub fn retain_states(&mut self, keep: &Set<Q>) {
        let drop: Vec<Q> = self
            .succ
            .keys()
            .filter(|q| !keep.contains(*q))
            .cloned()
            .collect();
        for state in &drop {
            self.remove_state(state);
        }
    }

    /// Removes a single state and all edges touching it.
    pub fn remove_state(&mut self, state: &Q) {
        let Some(out) = self.succ.remove(state) else {
            return;
        };
        for (_, target) in out {
            if let Some(sources) = self.pred.get_mut(&target) {
                sources.remove(state);
            }
        }
        if let Some(sources) = self.pred.remove(state) {
            for source in sources {
                if let Some(out) = self.succ.get_mut(&source) {
                    out.retain(|(_, t)| t != state);
                }
            }
        }
        self.initial.remove(state);
        self.finals.remove(state);
    }

    /// True iff exactly one initial state exists and no state has two outgoing edges
    /// carrying the same label.
    pub fn is_deterministic(&self) -> bool {
        self.initial.len() == 1
            && self.succ.values().all(|out| {
                let mut seen: Set<&A> = Set::default();
                out.iter().all(|(a, _)| seen.insert(a))
            })
    }

    /// Enumerates every accepted label sequence of length at most `max_len`, i.e.
    /// the labels along paths from an initial to a final state. Intended for
    /// bounded language comparisons in tests and feasibility spot checks; the result
    /// grows quickly with `max_len`, so callers keep the bound small.
    pub fn words_upto(&self, max_len: usize) -> BTreeSet<Vec<A>> {
        let mut words = BTreeSet::new();
        let mut queue: VecDeque<(&Q, Vec<A>)> =
            self.initial.iter().map(|q| (q, Vec::new())).collect();
        while let Some((state, word)) = queue.pop_front() {
            if self.finals.contains(state) {
                words.insert(word.clone());
            }
            if word.len() == max_len {
                continue;
            }
            for (label, target) in self.edges_from(state) {
                let mut extended = word.clone();
                extended.push(label.clone());
                queue.push_back((target, extended));
            }
        }
        words
    }
}

impl<Q: State, A: Label> PartialEq for Automaton<Q, A> {
    fn eq(&self, other: &Self) -> bool {
        self.initial == other.initial
            && self.finals == other.finals
            && self.alphabet == other.alphabet
            && self.succ.len() == other.succ.len()
            && self.succ.iter().all(|(q, out)| {
                other.succ.get(q).is_some_and(|other_out| {
                    out.len() == other_out.len() && {
                        let mut left = out.clone();
                        let mut right = other_out.clone();
                        left.sort();
                        right.sort();
                        left == right
                    }
                })
            })
    }
}

impl<Q: State, A: Label> Eq for Automaton<Q, A> {}

impl<Q: State, A: Label> Debug for Automaton<Q, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "initial: {{{}}}",
            self.initial.iter().map(|q| q.show()).join(", ")
        )?;
        writeln!(
            f,
            "final: {{{}}}",
            self.finals.iter().map(|q| q.show()).join(", ")
        )?;
        for (q, out) in &self.succ {
            writeln!(
                f,
                "{}  {}",
                q.show(),
                out.iter()
                    .map(|(a, t)| format!("{}->{}", a.show(), t.show()))
                    .join(", ")
            )?;
        }
        Ok(())
    }
}
