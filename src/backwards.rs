//! Backward construction of the melody automaton: start from every admissible
//! closing configuration and reconstruct predecessors note by note, from the end
//! of the melody to its beginning.
//!
//! The language is the same as the forward construction's; the intermediate state
//! sets differ, and meeting the note constraints from the end often keeps them
//! considerably smaller.

use tracing::debug;

use crate::automaton::Automaton;
use crate::error::Result;
use crate::juggling::{check_melody, placements, throw_alphabet, Ball, Config, Hand, Note, Throw};
use crate::math::{OrderedSet, Set};

/// Builds the automaton of all juggling patterns playing `tune`, working from the
/// final beat towards the first. Accepts the same parameters and produces the same
/// language as [`forwards`](crate::forwards::forwards); an empty result again
/// means "this melody cannot be played", not an error.
pub fn backwards(
    tune: &[Note],
    max_height: usize,
    balls: &[Ball],
) -> Result<Automaton<Config, Throw>> {
    check_melody(tune, max_height, balls)?;
    let mut aut = Automaton::new();
    aut.set_alphabet(throw_alphabet(balls, max_height));

    let finals = final_configurations(tune, max_height, balls);
    debug!(count = finals.len(), "enumerated closing configurations");
    let mut frontier: Set<Config> = finals.into_iter().collect();
    for cfg in &frontier {
        aut.mark_final(cfg.clone());
    }

    for beat in (0..tune.len() - 1).rev() {
        let note = tune[beat];
        let mut prev_frontier: Set<Config> = Set::default();
        for cfg in &frontier {
            for (prev, throw) in cfg.back_transitions(note) {
                aut.add_edge(prev.clone(), throw, cfg.clone());
                prev_frontier.insert(prev);
            }
        }
        debug!(beat, frontier = prev_frontier.len(), "expanded backward");
        frontier = prev_frontier;
    }

    // Whatever the reconstruction reached at beat 0 starts a pattern.
    for cfg in frontier {
        aut.mark_initial(cfg);
    }

    // Co-accessibility holds by construction; only the accessible part survives.
    let keep = aut.accessible();
    aut.retain_states(&keep);
    debug!(
        states = aut.state_count(),
        edges = aut.edge_count(),
        "backward construction finished"
    );
    Ok(aut)
}

/// Every legal configuration for the final beat: the last note's ball occupies slot
/// 0, nothing else is in flight, and the remaining balls sit in either hand. The
/// active hand follows from the melody length, since hands alternate from the left.
fn final_configurations(tune: &[Note], max_height: usize, balls: &[Ball]) -> Vec<Config> {
    let last = *tune.last().expect("melody is non-empty");
    let others: Vec<Ball> = balls
        .iter()
        .copied()
        .filter(|b| last.ball() != Some(*b))
        .collect();
    let mut airborne = vec![None; max_height];
    airborne[0] = last.ball();
    let active = Hand::from_beat(tune.len() - 1);
    let time = Some(tune.len() - 1);

    let mut configurations = Vec::new();
    for split in placements(others.len(), 2) {
        let mut hands = [OrderedSet::new(), OrderedSet::new()];
        for (&ball, &hand) in others.iter().zip(&split) {
            hands[hand].insert(ball);
        }
        configurations.push(Config {
            hands,
            airborne: airborne.clone(),
            active,
            time,
        });
    }
    configurations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forwards::forwards;
    use crate::juggling::melody;

    fn balls_of(names: &str) -> Vec<Ball> {
        names.chars().map(Ball).collect()
    }

    #[test_log::test]
    fn agrees_with_the_forward_construction() {
        for (tune, max_height, balls) in [
            ("a", 1, "a"),
            ("a.a", 2, "a"),
            ("ab", 2, "ab"),
            ("ab.a", 3, "ab"),
            ("a..b.a", 2, "ab"),
        ] {
            let tune = melody(tune);
            let balls = balls_of(balls);
            let fwd = forwards(&tune, max_height, &balls).unwrap();
            let bwd = backwards(&tune, max_height, &balls).unwrap();
            let len = tune.len();
            assert_eq!(
                fwd.words_upto(len),
                bwd.words_upto(len),
                "languages differ for {tune:?}"
            );
        }
    }

    #[test]
    fn single_ball_back_to_back_catches_are_infeasible() {
        let aut = backwards(&melody("aa"), 1, &balls_of("a")).unwrap();
        assert!(aut.is_empty());
    }

    #[test]
    fn ball_conservation_everywhere() {
        let balls = balls_of("ab");
        let aut = backwards(&melody("ab.a"), 3, &balls).unwrap();
        assert!(!aut.is_empty());
        for cfg in aut.states() {
            assert_eq!(cfg.ball_count(), balls.len());
        }
    }

    #[test]
    fn initial_states_sit_on_beat_zero() {
        let aut = backwards(&melody("ab"), 2, &balls_of("ab")).unwrap();
        assert!(!aut.is_empty());
        for cfg in aut.initial_states() {
            assert_eq!(cfg.time, Some(0));
            assert_eq!(cfg.landing_note(), Note::Ball(Ball('a')));
        }
        for cfg in aut.final_states() {
            assert_eq!(cfg.time, Some(1));
        }
    }

    #[test]
    fn backward_reconstruction_may_start_mid_flight() {
        // b sounds on beat 1 while a is caught on beat 0: one realization throws
        // b before the music starts, so an initial state carries it airborne
        let aut = backwards(&melody("ab"), 2, &balls_of("ab")).unwrap();
        assert!(aut
            .initial_states()
            .iter()
            .any(|cfg| cfg.airborne_balls().any(|(_, b)| b == Ball('b'))));
    }
}
