//! Export to the graphviz DOT format, for more information see the
//! [graphviz documentation](https://graphviz.org/doc/info/lang.html).
//!
//! Only the textual representation is produced here; rendering it to an image is the
//! business of whatever external tool the caller prefers.

use itertools::Itertools;

use crate::math::Map;
use crate::Show;

use super::{Automaton, Label, State};

impl<Q: State, A: Label> Automaton<Q, A> {
    /// Computes the DOT representation of the automaton. States are emitted as
    /// `q0..qn` (in sorted state order, so the output is stable) and carry their
    /// [`Show`] representation as label; final states get a double border and
    /// initial states a bold one.
    pub fn dot_representation(&self) -> String {
        let states: Vec<&Q> = self.states().sorted().collect();
        let ids: Map<&Q, usize> = states.iter().enumerate().map(|(i, q)| (*q, i)).collect();

        let mut lines = vec!["digraph automaton {".to_string(), "  rankdir=LR".to_string()];
        for (i, &q) in states.iter().enumerate() {
            let mut attrs = vec![format!("label=\"{}\"", q.show())];
            if self.is_final(q) {
                attrs.push("peripheries=2".to_string());
            }
            if self.is_initial(q) {
                attrs.push("style=bold".to_string());
            }
            lines.push(format!("  q{} [{}]", i, attrs.iter().join(", ")));
        }
        for (source, label, target) in self.edges() {
            lines.push(format!(
                "  q{} -> q{} [label=\"{}\"]",
                ids[source],
                ids[target],
                label.show()
            ));
        }
        lines.push("}".to_string());
        lines.join("\n")
    }
}
