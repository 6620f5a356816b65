use crate::session::round::Round;

/// Field magnitudes are kept strictly below this.
pub const FIELD_LIMIT: i64 = 1_000_000;

/// A single decimal digit. Only constructible from `0..=9`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Digit(u8);

impl Digit {
    pub fn new(d: u8) -> Option<Self> {
        (d <= 9).then_some(Self(d))
    }

    pub fn from_char(ch: char) -> Option<Self> {
        ch.to_digit(10).map(|d| Self(d as u8))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeypadEvent {
    Digit(Digit),
    Backspace,
    ToggleSign,
    NextField,
    PrevField,
}

/// Append `d` as the new least significant digit. A result at or past
/// [`FIELD_LIMIT`] drops its last digit again.
pub fn push_digit(value: i64, d: Digit) -> i64 {
    let next = value
        .saturating_mul(10)
        .saturating_add(i64::from(d.value()));
    if next.abs() >= FIELD_LIMIT {
        next / 10
    } else {
        next
    }
}

/// Apply one keypad event to the round. Returns true if the answer buffer
/// was edited.
pub fn apply(round: &mut Round, event: KeypadEvent) -> bool {
    let arity = round.arity();
    let field = &mut round.answer[round.active_field];
    match event {
        KeypadEvent::Digit(d) => *field = push_digit(*field, d),
        KeypadEvent::Backspace => *field /= 10,
        KeypadEvent::ToggleSign => *field = -*field,
        KeypadEvent::NextField => {
            round.active_field = (round.active_field + 1) % arity;
            return false;
        }
        KeypadEvent::PrevField => {
            round.active_field = (round.active_field + arity - 1) % arity;
            return false;
        }
    }
    true
}

/// The keystrokes that enter `answer` into a blank buffer: each field's
/// digits, then a sign toggle if negative, with `NextField` between fields.
pub fn keystrokes_for(answer: &[i64]) -> Vec<KeypadEvent> {
    let mut events = Vec::new();
    for (i, &value) in answer.iter().enumerate() {
        if i > 0 {
            events.push(KeypadEvent::NextField);
        }
        events.extend(
            value
                .unsigned_abs()
                .to_string()
                .chars()
                .filter_map(Digit::from_char)
                .map(KeypadEvent::Digit),
        );
        if value < 0 {
            events.push(KeypadEvent::ToggleSign);
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    fn round(arity: usize) -> Round {
        Round {
            state: vec![1, 2],
            display_text: "1 + 2".to_string(),
            answer: vec![0; arity],
            active_field: 0,
            started_at: Instant::now(),
        }
    }

    fn digit(d: u8) -> KeypadEvent {
        KeypadEvent::Digit(Digit::new(d).unwrap())
    }

    #[test]
    fn test_digit_constructors() {
        assert_eq!(Digit::new(9).map(Digit::value), Some(9));
        assert_eq!(Digit::new(10), None);
        assert_eq!(Digit::from_char('7').map(Digit::value), Some(7));
        assert_eq!(Digit::from_char('x'), None);
    }

    #[test]
    fn test_digits_append() {
        let mut r = round(1);
        for d in [4, 0, 2] {
            assert!(apply(&mut r, digit(d)));
        }
        assert_eq!(r.answer, vec![402]);
    }

    #[test]
    fn test_digit_ceiling_never_exceeded() {
        let mut r = round(1);
        for i in 0..40 {
            apply(&mut r, digit((i * 7 % 10) as u8));
            assert!(r.active_value().abs() < FIELD_LIMIT, "{}", r.active_value());
        }
        let mut r = round(1);
        for _ in 0..10 {
            apply(&mut r, digit(9));
        }
        assert_eq!(r.answer, vec![999_999]);
    }

    #[test]
    fn test_negative_field_appends_literally() {
        // 10 * (-3) + 5
        assert_eq!(push_digit(-3, Digit::new(5).unwrap()), -25);
        assert_eq!(push_digit(-999_999, Digit::new(9).unwrap()), -999_998);
    }

    #[test]
    fn test_backspace_truncates_toward_zero() {
        let mut r = round(1);
        r.answer[0] = -47;
        apply(&mut r, KeypadEvent::Backspace);
        assert_eq!(r.answer, vec![-4]);
        apply(&mut r, KeypadEvent::Backspace);
        assert_eq!(r.answer, vec![0]);
        apply(&mut r, KeypadEvent::Backspace);
        assert_eq!(r.answer, vec![0]);
    }

    #[test]
    fn test_clear_then_reenter_single_digit() {
        for d in 0..=9 {
            let mut r = round(1);
            r.answer[0] = 8_316;
            for _ in 0..4 {
                apply(&mut r, KeypadEvent::Backspace);
            }
            apply(&mut r, digit(d));
            assert_eq!(r.answer, vec![i64::from(d)]);
        }
    }

    #[test]
    fn test_toggle_sign() {
        let mut r = round(1);
        apply(&mut r, digit(6));
        apply(&mut r, KeypadEvent::ToggleSign);
        assert_eq!(r.answer, vec![-6]);
        apply(&mut r, KeypadEvent::ToggleSign);
        assert_eq!(r.answer, vec![6]);
    }

    #[test]
    fn test_field_navigation_wraps() {
        let mut r = round(2);
        assert!(!apply(&mut r, KeypadEvent::NextField));
        assert_eq!(r.active_field, 1);
        apply(&mut r, KeypadEvent::NextField);
        assert_eq!(r.active_field, 0);
        apply(&mut r, KeypadEvent::PrevField);
        assert_eq!(r.active_field, 1);
    }

    #[test]
    fn test_navigation_on_single_field_stays_put() {
        let mut r = round(1);
        apply(&mut r, KeypadEvent::NextField);
        apply(&mut r, KeypadEvent::PrevField);
        assert_eq!(r.active_field, 0);
    }

    #[test]
    fn test_edits_target_active_field_only() {
        let mut r = round(3);
        apply(&mut r, KeypadEvent::NextField);
        apply(&mut r, digit(5));
        apply(&mut r, KeypadEvent::PrevField);
        apply(&mut r, KeypadEvent::PrevField);
        apply(&mut r, digit(2));
        assert_eq!(r.answer, vec![0, 5, 2]);
    }

    #[test]
    fn test_keystrokes_for_enters_answer() {
        let mut r = round(2);
        for event in keystrokes_for(&[31, -7]) {
            apply(&mut r, event);
        }
        assert_eq!(r.answer, vec![31, -7]);
    }

    #[test]
    fn test_only_edits_report_mutation() {
        let mut r = round(2);
        assert!(apply(&mut r, digit(1)));
        assert!(apply(&mut r, KeypadEvent::Backspace));
        assert!(apply(&mut r, KeypadEvent::ToggleSign));
        assert!(!apply(&mut r, KeypadEvent::NextField));
        assert!(!apply(&mut r, KeypadEvent::PrevField));
    }
}
