use rand::Rng;
use rand::rngs::SmallRng;
use tracing::{debug, info};

use crate::engine::template::Template;
use crate::engine::timing::{ScalarStore, TimingTracker};
use crate::session::input::{self, KeypadEvent};
use crate::session::round::Round;

#[derive(Clone, Debug)]
pub enum Phase {
    Idle,
    Active(Round),
}

/// What the session reports when a round is solved.
#[derive(Clone, Debug, PartialEq)]
pub struct Solve {
    pub title: &'static str,
    pub display_text: String,
    pub answer: Vec<i64>,
    pub elapsed_secs: f64,
    pub average_secs: f64,
}

/// Keypad-driven practice on a single template. Runs indefinitely: every
/// solve immediately starts a new round.
pub struct InputSession<R = SmallRng> {
    template: Template,
    phase: Phase,
    rng: R,
    solved: u32,
}

impl<R: Rng> InputSession<R> {
    pub fn new(template: Template, rng: R) -> Self {
        Self {
            template,
            phase: Phase::Idle,
            rng,
            solved: 0,
        }
    }

    /// Draw a fresh round: new state, blank buffer, first field, timer reset.
    pub fn reset(&mut self) {
        let round = Round::new(&self.template, &mut self.rng);
        debug!(
            title = self.template.title,
            state = ?round.state,
            "new round"
        );
        self.phase = Phase::Active(round);
    }

    /// Handle one keypad event. Edits re-check the answer; on a match the
    /// solve time is folded into `timings` and a new round begins.
    /// Events before the first [`reset`](Self::reset) are ignored.
    pub fn handle<S: ScalarStore>(
        &mut self,
        event: KeypadEvent,
        timings: &mut TimingTracker<S>,
    ) -> Option<Solve> {
        let Phase::Active(round) = &mut self.phase else {
            return None;
        };
        if !input::apply(round, event) {
            return None;
        }
        if !self.template.check(&round.answer, &round.state) {
            return None;
        }

        let elapsed_secs = round.elapsed_secs();
        let average_secs = timings.record_sample(self.template.title, elapsed_secs);
        let solve = Solve {
            title: self.template.title,
            display_text: round.display_text.clone(),
            answer: round.answer.clone(),
            elapsed_secs,
            average_secs,
        };
        self.solved += 1;
        info!(
            title = solve.title,
            elapsed_secs, average_secs, "solved {}", solve.display_text
        );

        self.reset();
        Some(solve)
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn round(&self) -> Option<&Round> {
        match &self.phase {
            Phase::Active(round) => Some(round),
            Phase::Idle => None,
        }
    }

    /// Rounds solved since the session was created.
    pub fn solved(&self) -> u32 {
        self.solved
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::engine::Catalog;
    use crate::session::input::{Digit, keystrokes_for};
    use rand::SeedableRng;

    fn session(title: &str, seed: u64) -> InputSession {
        let catalog = Catalog::builtin().unwrap();
        let template = *catalog.find(title).unwrap();
        InputSession::new(template, SmallRng::seed_from_u64(seed))
    }

    fn tracker() -> TimingTracker {
        TimingTracker::new(BTreeMap::new())
    }

    #[test]
    fn test_idle_until_reset() {
        let mut s = session("1-1 Addition", 1);
        let mut t = tracker();
        assert!(matches!(s.phase(), Phase::Idle));
        let d = KeypadEvent::Digit(Digit::new(3).unwrap());
        assert_eq!(s.handle(d, &mut t), None);
        assert!(s.round().is_none());

        s.reset();
        assert!(s.round().is_some());
    }

    #[test]
    fn test_solving_records_time_and_starts_new_round() {
        let mut s = session("2-2 Multiplication", 8);
        let mut t = tracker();
        s.reset();

        let state = s.round().unwrap().state.clone();
        let answer = s.template().solve(&state);
        let events = keystrokes_for(&answer);
        let (last, rest) = events.split_last().unwrap();
        for &event in rest {
            assert_eq!(s.handle(event, &mut t), None);
        }
        let solve = s.handle(*last, &mut t).expect("final keystroke solves");

        assert_eq!(solve.answer, answer);
        assert_eq!(solve.title, "2-2 Multiplication");
        assert!(solve.elapsed_secs >= 0.0);
        assert_eq!(t.read_average("2-2 Multiplication"), Some(solve.average_secs));
        assert_eq!(s.solved(), 1);

        let next = s.round().unwrap();
        assert!(next.is_blank());
        assert_eq!(next.active_field, 0);
    }

    #[test]
    fn test_wrong_answer_keeps_round() {
        let mut s = session("1-1 Addition", 2);
        let mut t = tracker();
        s.reset();
        let state = s.round().unwrap().state.clone();
        let wrong = s.template().solve(&state)[0] + 1;
        for event in keystrokes_for(&[wrong]) {
            assert_eq!(s.handle(event, &mut t), None);
        }
        assert_eq!(s.round().unwrap().state, state);
        assert_eq!(s.round().unwrap().answer, vec![wrong]);
        assert_eq!(t.read_average("1-1 Addition"), None);
    }

    #[test]
    fn test_fields_fill_in_any_order() {
        let mut s = session("Factor Semiprime", 4);
        let mut t = tracker();
        s.reset();
        let state = s.round().unwrap().state.clone();
        let factors = s.template().solve(&state);

        // enter the second factor into field 1 first, then the first into field 0
        s.handle(KeypadEvent::NextField, &mut t);
        for event in keystrokes_for(&[factors[1]]) {
            assert_eq!(s.handle(event, &mut t), None);
        }
        s.handle(KeypadEvent::PrevField, &mut t);
        let events = keystrokes_for(&[factors[0]]);
        let (last, rest) = events.split_last().unwrap();
        for &event in rest {
            assert_eq!(s.handle(event, &mut t), None);
        }
        assert!(s.handle(*last, &mut t).is_some());
    }

    #[test]
    fn test_repeat_solves_fold_average() {
        let mut s = session("1-1 Multiplication", 6);
        let mut t = tracker();
        s.reset();
        for _ in 0..3 {
            let state = s.round().unwrap().state.clone();
            let answer = s.template().solve(&state);
            let mut solved = None;
            for event in keystrokes_for(&answer) {
                solved = s.handle(event, &mut t).or(solved);
            }
            assert!(solved.is_some());
        }
        assert_eq!(s.solved(), 3);
        assert!(t.read_average("1-1 Multiplication").is_some());
    }
}
