//! The melody-independent universal automaton: every legal configuration for a
//! fixed ball set and maximum height, connected by every note-satisfiable step.
//!
//! Patterns here are conceived as infinite and cyclic, so configurations carry no
//! time field and every state is simultaneously initial and final. The language is
//! the superset any concrete melody's automaton must stay inside of. Collapsing the
//! edge labels to catch events via [`Omnimusic::project`] and feeding the result
//! through determinization and minimization answers feasibility questions — which
//! note sequences are realizable at all — independent of a specific melody.

use itertools::Itertools;
use tracing::debug;

use crate::automaton::{Automaton, Block, Subset};
use crate::error::Result;
use crate::juggling::{placements, slot_permutations, throw_alphabet, Ball, Config, Hand, Note, Throw};
use crate::math::OrderedSet;

/// The universal automaton over all legal configurations of `balls` with airborne
/// slots up to `max_height`.
#[derive(Debug, Clone)]
pub struct Omnimusic {
    max_height: usize,
    balls: Vec<Ball>,
    /// The underlying automaton; exposed for traversal, export and reduction.
    pub automaton: Automaton<Config, Throw>,
}

impl Omnimusic {
    /// Enumerates the full configuration space and all transitions between the
    /// configurations.
    ///
    /// # Panics
    ///
    /// If edge construction produces a configuration outside the pre-enumerated
    /// space. The enumeration is exhaustive, so this indicates a bug in the
    /// transition generator, not bad input.
    pub fn new(max_height: usize, balls: Vec<Ball>) -> Self {
        let mut this = Self {
            max_height,
            balls,
            automaton: Automaton::new(),
        };
        this.build_states();
        this.build_transitions();
        let states: Vec<Config> = this.automaton.states().cloned().collect();
        for cfg in states {
            this.automaton.mark_initial(cfg.clone());
            this.automaton.mark_final(cfg);
        }
        this.automaton
            .set_alphabet(throw_alphabet(&this.balls, this.max_height));
        this
    }

    /// The maximum throw height.
    pub fn max_height(&self) -> usize {
        self.max_height
    }

    /// The ball set.
    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    /// Adds every way of splitting the balls between hands and air: each ball is
    /// held or flying, held subsets distribute over two hands, flying subsets over
    /// distinct airborne slots, everything crossed with both active hands.
    fn build_states(&mut self) {
        for split in placements(self.balls.len(), 2) {
            let mut held = Vec::new();
            let mut flying = Vec::new();
            for (&ball, &place) in self.balls.iter().zip(&split) {
                if place == 0 {
                    held.push(ball);
                } else {
                    flying.push(ball);
                }
            }

            let mut hand_layouts = Vec::new();
            for assignment in placements(held.len(), 2) {
                let mut hands = [OrderedSet::new(), OrderedSet::new()];
                for (&ball, &hand) in held.iter().zip(&assignment) {
                    hands[hand].insert(ball);
                }
                hand_layouts.push(hands);
            }

            let mut airborne_layouts = Vec::new();
            for slots in slot_permutations(0..self.max_height, flying.len()) {
                let mut airborne = vec![None; self.max_height];
                for (&ball, &slot) in flying.iter().zip(&slots) {
                    airborne[slot] = Some(ball);
                }
                airborne_layouts.push(airborne);
            }

            for (hands, airborne) in hand_layouts.iter().cartesian_product(&airborne_layouts) {
                for active in [Hand::Left, Hand::Right] {
                    self.automaton.add_state(Config {
                        hands: hands.clone(),
                        airborne: airborne.clone(),
                        active,
                        time: None,
                    });
                }
            }
        }
        debug!(
            states = self.automaton.state_count(),
            "enumerated configuration space"
        );
    }

    /// Connects the configurations: one edge per backward candidate, over every
    /// note each configuration could require. The node set must come out of this
    /// unchanged — the space was enumerated exhaustively up front.
    fn build_transitions(&mut self) {
        let before = self.automaton.state_count();
        let states: Vec<Config> = self.automaton.states().cloned().collect();
        for cfg in states {
            for (prev, throw) in cfg.all_notes_back_transitions() {
                self.automaton.add_edge(prev, throw, cfg.clone());
            }
        }
        assert_eq!(
            before,
            self.automaton.state_count(),
            "a back transition escaped the enumerated configuration space"
        );
        debug!(
            edges = self.automaton.edge_count(),
            "built universal transitions"
        );
    }

    /// The catch-event projection: same states, every edge relabeled by the note
    /// its *source* configuration sounds — the landing ball, or a rest. Parallel
    /// throws that sound alike collapse into one edge.
    pub fn project(&self) -> Automaton<Config, Note> {
        let mut projected = Automaton::new();
        for cfg in self.automaton.states() {
            projected.add_state(cfg.clone());
        }
        for (source, _, target) in self.automaton.edges() {
            projected.add_edge(source.clone(), source.landing_note(), target.clone());
        }
        for cfg in self.automaton.initial_states() {
            projected.mark_initial(cfg.clone());
        }
        for cfg in self.automaton.final_states() {
            projected.mark_final(cfg.clone());
        }
        projected.set_alphabet(
            std::iter::once(Note::Rest).chain(self.balls.iter().map(|&b| Note::Ball(b))),
        );
        projected
    }

    /// The canonical minimal recognizer of realizable note sequences: projection,
    /// then subset construction, then Moore minimization.
    pub fn minimize_projected(&self) -> Result<Automaton<Block<Subset<Config>>, Note>> {
        self.project().determinize().minimize()
    }

    /// Determinizes and minimizes the throw-labeled automaton itself, without
    /// collapsing to catch events.
    pub fn minimize_unprojected(&self) -> Result<Automaton<Block<Subset<Config>>, Throw>> {
        self.automaton.determinize().minimize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balls_of(names: &str) -> Vec<Ball> {
        names.chars().map(Ball).collect()
    }

    #[test_log::test]
    fn one_ball_configuration_space() {
        let omni = Omnimusic::new(1, balls_of("a"));
        // a held (2 hands) or airborne (1 slot), times 2 active hands
        assert_eq!(omni.automaton.state_count(), 6);
        assert_eq!(omni.automaton.initial_states().len(), 6);
        assert_eq!(omni.automaton.final_states().len(), 6);
        for cfg in omni.automaton.states() {
            assert_eq!(cfg.ball_count(), 1);
            assert_eq!(cfg.time, None);
        }
    }

    #[test]
    fn node_count_is_stable_under_edge_construction() {
        for (max_height, balls) in [(1, "a"), (2, "a"), (2, "ab"), (3, "ab")] {
            let mut omni = Omnimusic {
                max_height,
                balls: balls_of(balls),
                automaton: Automaton::new(),
            };
            omni.build_states();
            let before = omni.automaton.state_count();
            omni.build_transitions();
            assert_eq!(before, omni.automaton.state_count());
        }
    }

    #[test]
    fn projection_keeps_nodes_and_collapses_labels() {
        let omni = Omnimusic::new(2, balls_of("ab"));
        let projected = omni.project();
        assert_eq!(projected.state_count(), omni.automaton.state_count());
        assert!(projected.edge_count() <= omni.automaton.edge_count());
        assert_eq!(projected.alphabet().len(), 3, "a, b and the rest");
    }

    #[test_log::test]
    fn minimal_recognizer_of_one_ball_rhythms() {
        let omni = Omnimusic::new(1, balls_of("a"));
        let det = omni.project().determinize();
        assert!(det.is_deterministic());
        let min = det.minimize().unwrap();
        // bounded language equivalence of the reduction pipeline
        assert_eq!(det.words_upto(4), min.words_upto(4));
        // minimization is idempotent
        let again = min.minimize().unwrap();
        assert_eq!(min.state_count(), again.state_count());

        let words = min.words_upto(2);
        let a = Note::Ball(Ball('a'));
        assert!(words.contains(&vec![Note::Rest, a]));
        assert!(
            !words.contains(&vec![a, a]),
            "one ball at height one cannot sound twice in a row"
        );
    }

    #[test]
    fn melody_languages_stay_inside_the_universal_language() {
        use crate::forwards::forwards;
        use crate::juggling::melody;

        let balls = balls_of("a");
        let concrete = forwards(&melody("a.a"), 2, &balls).unwrap();
        let universal = Omnimusic::new(2, balls).automaton;
        let horizon = 2;
        let universal_words = universal.words_upto(horizon);
        for word in concrete.words_upto(horizon) {
            assert!(
                universal_words.contains(&word),
                "{word:?} missing from the universal language"
            );
        }
    }
}
