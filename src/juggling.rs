//! The physical model: pitched balls distributed over two hands and a column of
//! airborne slots, and the legal one-beat transitions between such configurations.
//!
//! Time is discrete. A configuration's airborne sequence has one slot per remaining
//! flight beat: slot 0 holds the ball landing on the current beat, slot `i` a ball
//! that lands in `i` more beats. One beat passes by *shifting*: the landing ball (if
//! any) drops into the hand about to throw, everything else falls one slot, and the
//! top slot empties — a ball cannot stay up longer than its throw height. The thrower
//! may then launch one held ball into any empty slot, or nothing at all, after which
//! the other hand becomes active.
//!
//! One physical restriction applies on top of the slot rules: a ball caught on a
//! beat cannot be rethrown on that same beat to height 1. Such a throw would have
//! the ball land again on the immediately following beat with no dwell time in the
//! hand at all. Same-beat rethrows to height 2 or more, and height-1 throws of balls
//! held since an earlier beat, are legal.
//!
//! The backward rule reconstructs predecessors instead, which the backward and
//! universal constructors rely on. Both directions describe the same step relation:
//! every forward transition shows up among the predecessors of its target and vice
//! versa.

use std::fmt;

use itertools::Itertools;

use crate::math::OrderedSet;
use crate::seq::{find_indices, left_shift, right_shift};
use crate::Show;

/// A ball, identified by the pitch it sounds when caught.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Ball(pub char);

impl fmt::Display for Ball {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Show for Ball {
    fn show(&self) -> String {
        self.to_string()
    }
}

/// One beat of a melody: silence, or the ball that must land on that beat.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Note {
    /// No ball may land on this beat.
    Rest,
    /// The ball that has to land on this beat.
    Ball(Ball),
}

impl Note {
    /// The ball behind this note, if it is not a rest.
    pub fn ball(self) -> Option<Ball> {
        match self {
            Note::Rest => None,
            Note::Ball(ball) => Some(ball),
        }
    }

    /// Whether this beat is silent.
    pub fn is_rest(self) -> bool {
        matches!(self, Note::Rest)
    }
}

impl From<Ball> for Note {
    fn from(ball: Ball) -> Self {
        Note::Ball(ball)
    }
}

impl From<Option<Ball>> for Note {
    fn from(ball: Option<Ball>) -> Self {
        match ball {
            None => Note::Rest,
            Some(ball) => Note::Ball(ball),
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Note::Rest => write!(f, "."),
            Note::Ball(ball) => write!(f, "{ball}"),
        }
    }
}

impl Show for Note {
    fn show(&self) -> String {
        self.to_string()
    }
}

/// Parses a melody from a string, one beat per character, `'.'` marking a rest.
pub fn melody(notes: &str) -> Vec<Note> {
    notes
        .chars()
        .map(|c| {
            if c == '.' {
                Note::Rest
            } else {
                Note::Ball(Ball(c))
            }
        })
        .collect()
}

/// One of the juggler's two hands.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Hand {
    /// The hand stored first in a configuration.
    Left,
    /// The hand stored second.
    Right,
}

impl Hand {
    /// The opposite hand.
    pub fn other(self) -> Hand {
        match self {
            Hand::Left => Hand::Right,
            Hand::Right => Hand::Left,
        }
    }

    /// Position of this hand in [`Config::hands`].
    pub fn index(self) -> usize {
        match self {
            Hand::Left => 0,
            Hand::Right => 1,
        }
    }

    /// The hand active on beat `beat` when the left hand starts: hands alternate.
    pub fn from_beat(beat: usize) -> Hand {
        if beat % 2 == 0 {
            Hand::Left
        } else {
            Hand::Right
        }
    }
}

/// What the active hand does during one beat. Either nothing leaves the hand, or
/// one ball is thrown to a given height.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Throw {
    /// No ball is thrown; the beat only advances (and catches, if a ball lands).
    Hold,
    /// `ball` is thrown `height` beats high.
    Toss {
        /// The thrown ball.
        ball: Ball,
        /// Beats until it lands again; between 1 and the configuration's max height.
        height: usize,
    },
}

impl fmt::Display for Throw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Throw::Hold => write!(f, "0"),
            Throw::Toss { ball, height } => write!(f, "{ball}{height}"),
        }
    }
}

impl Show for Throw {
    fn show(&self) -> String {
        self.to_string()
    }
}

/// Every throw expressible with the given balls and maximum height, the hold
/// included. This is the declared alphabet of the melody-constrained and universal
/// automata; a particular construction usually uses only part of it.
pub fn throw_alphabet(balls: &[Ball], max_height: usize) -> Vec<Throw> {
    let mut throws = vec![Throw::Hold];
    for &ball in balls {
        for height in 1..=max_height {
            throws.push(Throw::Toss { ball, height });
        }
    }
    throws
}

/// Validates the shared preconditions of the melody constructors.
pub(crate) fn check_melody(
    tune: &[Note],
    max_height: usize,
    balls: &[Ball],
) -> crate::error::Result<()> {
    use crate::error::Error;
    if tune.is_empty() {
        return Err(Error::EmptyMelody);
    }
    if max_height == 0 {
        return Err(Error::MaxHeightTooSmall {
            balls: balls.len(),
            max_height,
        });
    }
    for note in tune {
        if let Some(ball) = note.ball() {
            if !balls.contains(&ball) {
                return Err(Error::UnknownNote(*note));
            }
        }
    }
    Ok(())
}

/// A snapshot of the juggler between two beats.
///
/// The multiset union of both hands and the occupied airborne slots is the fixed
/// ball set of the construction; transitions move balls around but never create or
/// destroy one. Configurations are immutable value objects: equality and hashing
/// are purely structural, so the same configuration reached twice is the same
/// automaton node.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Config {
    /// Contents of the two hands; unordered, every ball unique.
    pub hands: [OrderedSet<Ball>; 2],
    /// In-flight balls by remaining beats until landing; index 0 lands now.
    pub airborne: Vec<Option<Ball>>,
    /// The hand that performs the next throw.
    pub active: Hand,
    /// Beat index; `None` in the melody-independent universal model, where
    /// otherwise identical configurations at different times are the same state.
    pub time: Option<usize>,
}

impl Config {
    /// The ball landing on the current beat, if any.
    pub fn caught_ball(&self) -> Option<Ball> {
        self.airborne.first().copied().flatten()
    }

    /// The note sounding on the current beat.
    pub fn landing_note(&self) -> Note {
        self.caught_ball().into()
    }

    /// The maximum throw height, i.e. the length of the airborne sequence.
    pub fn max_height(&self) -> usize {
        self.airborne.len()
    }

    /// Iterates over the airborne balls together with their slot index.
    pub fn airborne_balls(&self) -> impl Iterator<Item = (usize, Ball)> + '_ {
        self.airborne
            .iter()
            .enumerate()
            .filter_map(|(slot, ball)| ball.map(|b| (slot, b)))
    }

    /// Total number of balls across both hands and the air.
    pub fn ball_count(&self) -> usize {
        self.hands[0].len() + self.hands[1].len() + self.airborne.iter().flatten().count()
    }

    /// The configuration after one beat has passed: the landing ball is caught into
    /// the active hand and everything in flight falls one slot. Not itself a valid
    /// successor — no throw has happened yet.
    pub fn shifted(&self) -> Config {
        let mut hands = self.hands.clone();
        if let Some(ball) = self.caught_ball() {
            hands[self.active.index()].insert(ball);
        }
        Config {
            hands,
            airborne: left_shift(&self.airborne, 1),
            active: self.active,
            time: self.time,
        }
    }

    /// All legal one-beat successors, each with the throw reaching it. Throwing
    /// nothing is always possible; beyond that, every ball in the active hand can go
    /// into every empty slot, except that the ball just caught cannot go to height 1.
    pub fn transitions(&self) -> Vec<(Throw, Config)> {
        let shifted = self.shifted();
        let next_active = self.active.other();
        let next_time = self.time.map(|t| t + 1);
        let mut transitions = vec![(
            Throw::Hold,
            Config {
                hands: shifted.hands.clone(),
                airborne: shifted.airborne.clone(),
                active: next_active,
                time: next_time,
            },
        )];
        let hand = &shifted.hands[self.active.index()];
        if hand.is_empty() {
            return transitions;
        }
        let caught = self.caught_ball();
        for &ball in hand {
            for slot in find_indices(&shifted.airborne, &None) {
                if slot == 0 && caught == Some(ball) {
                    // no dwell time: the catch cannot land again on the next beat
                    continue;
                }
                let mut hands = shifted.hands.clone();
                let mut airborne = shifted.airborne.clone();
                hands[self.active.index()].remove(&ball);
                airborne[slot] = Some(ball);
                transitions.push((
                    Throw::Toss {
                        ball,
                        height: slot + 1,
                    },
                    Config {
                        hands,
                        airborne,
                        active: next_active,
                        time: next_time,
                    },
                ));
            }
        }
        transitions
    }

    /// Reconstructs the predecessor reached by undoing one beat. `unthrow` names the
    /// airborne slot whose ball the predecessor threw (`None` for a beat without a
    /// throw) and `note` is what sounded on the predecessor's beat. Returns `None`
    /// when no such predecessor exists.
    fn single_back(&self, note: Note, unthrow: Option<usize>) -> Option<Config> {
        let prev_active = self.active.other();
        let prev_time = self.time.map(|t| t - 1);
        let mut hands = self.hands.clone();
        let mut airborne = self.airborne.clone();
        if let Some(slot) = unthrow {
            let ball = airborne[slot].take()?;
            if slot == 0 && note.ball() == Some(ball) {
                // would be a same-beat catch rethrown to height 1
                return None;
            }
            hands[prev_active.index()].insert(ball);
        }
        let mut airborne = right_shift(&airborne, 1);
        if let Note::Ball(ball) = note {
            if !hands[prev_active.index()].remove(&ball) {
                return None;
            }
            airborne[0] = Some(ball);
        }
        Some(Config {
            hands,
            airborne,
            active: prev_active,
            time: prev_time,
        })
    }

    /// All predecessors whose forward step yields `self` while `note` sounds on the
    /// predecessor's beat. A ball sitting at maximum height forces its own throw —
    /// it cannot have gotten there any other way; otherwise "threw nothing" and one
    /// candidate per airborne ball are tried, each filtered by whether `note` can be
    /// satisfied.
    pub fn back_transitions(&self, note: Note) -> Vec<(Config, Throw)> {
        if let Some(&Some(ball)) = self.airborne.last() {
            let top = self.airborne.len() - 1;
            return match self.single_back(note, Some(top)) {
                Some(prev) => vec![(
                    prev,
                    Throw::Toss {
                        ball,
                        height: top + 1,
                    },
                )],
                None => Vec::new(),
            };
        }
        let mut transitions = Vec::new();
        if let Some(prev) = self.single_back(note, None) {
            transitions.push((prev, Throw::Hold));
        }
        for (slot, ball) in self.airborne_balls().collect::<Vec<_>>() {
            if let Some(prev) = self.single_back(note, Some(slot)) {
                transitions.push((
                    prev,
                    Throw::Toss {
                        ball,
                        height: slot + 1,
                    },
                ));
            }
        }
        transitions
    }

    /// Predecessors across every note the step into `self` could have required: a
    /// rest, any ball held by the hand that just caught, or any airborne ball.
    pub fn all_notes_back_transitions(&self) -> Vec<(Config, Throw)> {
        let mut notes = vec![Note::Rest];
        notes.extend(
            self.hands[self.active.other().index()]
                .iter()
                .map(|&ball| Note::Ball(ball)),
        );
        notes.extend(self.airborne_balls().map(|(_, ball)| Note::Ball(ball)));
        let mut transitions = Vec::new();
        for note in notes {
            transitions.extend(self.back_transitions(note));
        }
        transitions
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hand = |h: &OrderedSet<Ball>| -> String {
            if h.is_empty() {
                "X".to_string()
            } else {
                h.iter().map(Ball::to_string).collect()
            }
        };
        write!(f, "{}", hand(&self.hands[0]))?;
        write!(
            f,
            "{}",
            if self.active == Hand::Left {
                "<| "
            } else {
                " |>"
            }
        )?;
        write!(f, "{}", hand(&self.hands[1]))?;
        write!(f, " | ")?;
        for slot in &self.airborne {
            match slot {
                Some(ball) => write!(f, "{ball}")?,
                None => write!(f, "X")?,
            }
        }
        if let Some(time) = self.time {
            write!(f, " | t={time}")?;
        }
        Ok(())
    }
}

impl Show for Config {
    fn show(&self) -> String {
        self.to_string()
    }
}

/// All ways to place `count` distinguishable items into `choices` places, as vectors
/// of place indices. The single empty placement for zero items.
pub(crate) fn placements(count: usize, choices: usize) -> Vec<Vec<usize>> {
    if count == 0 {
        return vec![Vec::new()];
    }
    itertools::repeat_n(0..choices, count)
        .multi_cartesian_product()
        .collect()
}

/// All ways to assign `count` distinguishable items to distinct slots drawn from
/// `slots`, as vectors of slot indices. The single empty assignment for zero items.
pub(crate) fn slot_permutations(
    slots: std::ops::Range<usize>,
    count: usize,
) -> Vec<Vec<usize>> {
    if count == 0 {
        return vec![Vec::new()];
    }
    slots.permutations(count).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(
        left: &str,
        right: &str,
        airborne: &str,
        active: Hand,
        time: Option<usize>,
    ) -> Config {
        let hand = |s: &str| s.chars().map(Ball).collect::<OrderedSet<_>>();
        Config {
            hands: [hand(left), hand(right)],
            airborne: airborne
                .chars()
                .map(|c| (c != '.').then_some(Ball(c)))
                .collect(),
            active,
            time,
        }
    }

    #[test]
    fn melody_parsing() {
        let tune = melody("a.b");
        assert_eq!(
            tune,
            vec![
                Note::Ball(Ball('a')),
                Note::Rest,
                Note::Ball(Ball('b')),
            ]
        );
        assert!(tune[1].is_rest());
    }

    #[test]
    fn shift_catches_into_the_active_hand() {
        let cfg = config("", "b", "a.c", Hand::Left, Some(3));
        let shifted = cfg.shifted();
        assert!(shifted.hands[0].contains(&Ball('a')));
        assert_eq!(shifted.airborne, vec![None, Some(Ball('c')), None]);
        assert_eq!(shifted.time, Some(3), "shifting alone does not advance time");
    }

    #[test]
    fn transitions_always_offer_the_hold() {
        let cfg = config("a", "", "...", Hand::Left, Some(0));
        let transitions = cfg.transitions();
        assert!(transitions.iter().any(|(t, _)| *t == Throw::Hold));
        // ball a can go to heights 1, 2 and 3
        assert_eq!(transitions.len(), 4);
        for (_, succ) in &transitions {
            assert_eq!(succ.active, Hand::Right);
            assert_eq!(succ.time, Some(1));
            assert_eq!(succ.ball_count(), 1);
        }
    }

    #[test]
    fn caught_ball_cannot_return_at_height_one() {
        let cfg = config("", "", "a", Hand::Left, Some(0));
        let throws: Vec<Throw> = cfg.transitions().into_iter().map(|(t, _)| t).collect();
        assert_eq!(throws, vec![Throw::Hold], "height-1 rethrow is excluded");

        // with more airspace the same catch may go higher up
        let cfg = config("", "", "a..", Hand::Left, Some(0));
        let throws: Vec<Throw> = cfg.transitions().into_iter().map(|(t, _)| t).collect();
        assert!(throws.contains(&Throw::Toss {
            ball: Ball('a'),
            height: 2
        }));
        assert!(!throws.contains(&Throw::Toss {
            ball: Ball('a'),
            height: 1
        }));
    }

    #[test]
    fn held_ball_may_be_thrown_to_height_one() {
        let cfg = config("b", "", "a..", Hand::Left, Some(0));
        let throws: Vec<Throw> = cfg.transitions().into_iter().map(|(t, _)| t).collect();
        assert!(throws.contains(&Throw::Toss {
            ball: Ball('b'),
            height: 1
        }));
    }

    #[test]
    fn top_slot_forces_the_backward_throw() {
        let cfg = config("", "", "..a", Hand::Left, Some(2));
        let preds = cfg.back_transitions(Note::Rest);
        assert_eq!(preds.len(), 1);
        let (prev, throw) = &preds[0];
        assert_eq!(
            *throw,
            Throw::Toss {
                ball: Ball('a'),
                height: 3
            }
        );
        assert!(prev.hands[1].contains(&Ball('a')));
        assert_eq!(prev.time, Some(1));
    }

    #[test]
    fn forward_and_backward_steps_agree() {
        // every forward successor lists the source among its predecessors under the
        // note the source sounds, with the identical throw label
        let samples = [
            config("a", "b", "c..", Hand::Left, Some(1)),
            config("", "ab", ".c.", Hand::Right, Some(2)),
            config("ab", "", "...", Hand::Left, Some(1)),
            config("", "", "abc", Hand::Right, Some(5)),
        ];
        for cfg in samples {
            let note = cfg.landing_note();
            for (throw, succ) in cfg.transitions() {
                let preds = succ.back_transitions(note);
                assert!(
                    preds.contains(&(cfg.clone(), throw)),
                    "missing {throw} back from {succ} to {cfg}"
                );
            }
        }
    }

    #[test]
    fn backward_steps_invert_forward_steps() {
        let samples = [
            config("a", "", ".b.", Hand::Right, Some(3)),
            config("", "b", "a..", Hand::Left, Some(2)),
            config("ab", "c", "...", Hand::Right, Some(4)),
        ];
        for cfg in samples {
            for note in [Note::Rest, Note::Ball(Ball('a')), Note::Ball(Ball('b'))] {
                for (prev, throw) in cfg.back_transitions(note) {
                    assert_eq!(prev.landing_note(), note);
                    assert!(
                        prev.transitions().contains(&(throw, cfg.clone())),
                        "{prev} does not step forward to {cfg} via {throw}"
                    );
                }
            }
        }
    }

    #[test]
    fn ball_conservation_through_steps() {
        let cfg = config("a", "bc", "d..", Hand::Left, Some(0));
        assert_eq!(cfg.ball_count(), 4);
        for (_, succ) in cfg.transitions() {
            assert_eq!(succ.ball_count(), 4);
        }
        for (prev, _) in cfg.all_notes_back_transitions() {
            assert_eq!(prev.ball_count(), 4);
        }
    }

    #[test]
    fn display_matches_the_compact_picture() {
        let cfg = config("ab", "", "c.", Hand::Left, Some(7));
        assert_eq!(cfg.to_string(), "ab<| X | cX | t=7");
        let timeless = config("", "a", "..", Hand::Right, None);
        assert_eq!(timeless.to_string(), "X |>a | XX");
    }
}
