//! Forward construction of the melody automaton: start from every admissible
//! opening configuration and expand beat by beat, keeping only the transitions
//! whose catch matches the melody.

use tracing::debug;

use crate::automaton::Automaton;
use crate::error::Result;
use crate::juggling::{
    check_melody, placements, slot_permutations, throw_alphabet, Ball, Config, Hand, Note, Throw,
};
use crate::math::{OrderedSet, Set};

/// Builds the automaton of all juggling patterns that play `tune` with the given
/// ball set and maximum throw height. States are timed configurations, edges carry
/// the throw performed between two beats; the accepted label sequences are exactly
/// the realizable schedules.
///
/// The result may be empty — that is the negative answer, not an error. Errors are
/// reserved for ill-posed parameters (empty melody, note without a ball, no
/// airspace).
pub fn forwards(tune: &[Note], max_height: usize, balls: &[Ball]) -> Result<Automaton<Config, Throw>> {
    check_melody(tune, max_height, balls)?;
    let mut aut = Automaton::new();
    aut.set_alphabet(throw_alphabet(balls, max_height));

    let initial = initial_configurations(tune[0], max_height, balls);
    debug!(count = initial.len(), "enumerated opening configurations");
    let mut frontier: Set<Config> = initial.into_iter().collect();
    for cfg in &frontier {
        aut.mark_initial(cfg.clone());
    }

    for (beat, &note) in tune.iter().enumerate().skip(1) {
        let mut next_frontier: Set<Config> = Set::default();
        for cfg in &frontier {
            for (throw, succ) in cfg.transitions() {
                if succ.landing_note() != note {
                    continue;
                }
                aut.add_edge(cfg.clone(), throw, succ.clone());
                next_frontier.insert(succ);
            }
        }
        debug!(beat, frontier = next_frontier.len(), "expanded forward");
        frontier = next_frontier;
    }

    // Nothing may remain in flight once the music ends: the closing airborne
    // sequence holds the final note's ball and nothing else.
    let closing = closing_airborne(tune, max_height);
    for cfg in frontier {
        if cfg.airborne == closing {
            aut.mark_final(cfg);
        }
    }

    // Accessibility holds by construction; only the co-accessible part survives.
    let keep = aut.coaccessible();
    aut.retain_states(&keep);
    debug!(
        states = aut.state_count(),
        edges = aut.edge_count(),
        "forward construction finished"
    );
    Ok(aut)
}

/// Every legal configuration for beat 0. The first note's ball sits in slot 0; each
/// remaining ball is either in a hand or already in flight, the flying ones on
/// distinct slots above 0. The left hand starts, by convention.
fn initial_configurations(first: Note, max_height: usize, balls: &[Ball]) -> Vec<Config> {
    let others: Vec<Ball> = balls
        .iter()
        .copied()
        .filter(|b| first.ball() != Some(*b))
        .collect();
    let mut configurations = Vec::new();
    for split in placements(others.len(), 3) {
        let mut hands = [OrderedSet::new(), OrderedSet::new()];
        let mut flying = Vec::new();
        for (&ball, &place) in others.iter().zip(&split) {
            if place < 2 {
                hands[place].insert(ball);
            } else {
                flying.push(ball);
            }
        }
        for slots in slot_permutations(1..max_height, flying.len()) {
            let mut airborne = vec![None; max_height];
            airborne[0] = first.ball();
            for (&ball, &slot) in flying.iter().zip(&slots) {
                airborne[slot] = Some(ball);
            }
            configurations.push(Config {
                hands: hands.clone(),
                airborne,
                active: Hand::Left,
                time: Some(0),
            });
        }
    }
    configurations
}

/// The airborne sequence every accepting configuration must show: the final note's
/// ball about to land, all other slots empty.
fn closing_airborne(tune: &[Note], max_height: usize) -> Vec<Option<Ball>> {
    let mut airborne = vec![None; max_height];
    airborne[0] = tune.last().expect("melody is non-empty").ball();
    airborne
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::juggling::melody;

    lazy_static::lazy_static! {
        // no pitch repeats on adjacent beats: a single ball per pitch cannot
        // sound the same note twice in a row
        static ref TUNE: Vec<Note> = melody("cdc.ede.c");
    }

    fn balls_of(names: &str) -> Vec<Ball> {
        names.chars().map(Ball).collect()
    }

    #[test]
    fn rejects_ill_posed_parameters() {
        let balls = balls_of("a");
        assert_eq!(
            forwards(&[], 2, &balls).unwrap_err(),
            Error::EmptyMelody
        );
        assert_eq!(
            forwards(&melody("ab"), 2, &balls).unwrap_err(),
            Error::UnknownNote(Note::Ball(Ball('b')))
        );
        assert!(matches!(
            forwards(&melody("a"), 0, &balls).unwrap_err(),
            Error::MaxHeightTooSmall { .. }
        ));
    }

    #[test_log::test]
    fn single_ball_catch_rest_catch() {
        let aut = forwards(&melody("a.a"), 2, &balls_of("a")).unwrap();
        assert!(!aut.is_empty());
        let words = aut.words_upto(2);
        // catch and rethrow to height 2, then let it fall back down; holding
        // instead is a dead end, the ball would sit in the inactive hand
        let up_two = vec![
            Throw::Toss {
                ball: Ball('a'),
                height: 2,
            },
            Throw::Hold,
        ];
        assert!(words.contains(&up_two), "missing {up_two:?} in {words:?}");
        assert_eq!(words.len(), 1);
    }

    #[test]
    fn single_ball_back_to_back_catches_are_infeasible() {
        let aut = forwards(&melody("aa"), 1, &balls_of("a")).unwrap();
        assert!(aut.is_empty(), "no rest-free two-catch pattern with one ball");
    }

    #[test]
    fn ball_conservation_everywhere() {
        let balls = balls_of("ab");
        let aut = forwards(&melody("ab.a"), 3, &balls).unwrap();
        assert!(!aut.is_empty());
        for cfg in aut.states() {
            assert_eq!(cfg.ball_count(), balls.len());
        }
    }

    #[test]
    fn every_accepted_word_spans_the_whole_melody() {
        let tune = melody("a.a.");
        let aut = forwards(&tune, 2, &balls_of("a")).unwrap();
        for word in aut.words_upto(tune.len()) {
            assert_eq!(word.len(), tune.len() - 1);
        }
    }

    #[test_log::test]
    fn a_longer_tune_is_playable() {
        let aut = forwards(&TUNE, 3, &balls_of("cde")).unwrap();
        assert!(!aut.is_empty());
        // all surviving states sit on an initial-to-final path
        let trimmed = aut.trimmed();
        assert_eq!(trimmed, aut);
    }
}
