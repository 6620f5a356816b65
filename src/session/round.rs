use std::time::Instant;

use rand::Rng;

use crate::engine::template::Template;

/// One concrete problem instance. Replaced wholesale on every solve.
#[derive(Clone, Debug)]
pub struct Round {
    pub state: Vec<i64>,
    pub display_text: String,
    pub answer: Vec<i64>,
    pub active_field: usize,
    pub started_at: Instant,
}

impl Round {
    pub fn new<R: Rng + ?Sized>(template: &Template, rng: &mut R) -> Self {
        let state = template.generate(rng);
        let display_text = template.render(&state);
        Self {
            state,
            display_text,
            answer: vec![0; template.answer_arity],
            active_field: 0,
            started_at: Instant::now(),
        }
    }

    pub fn arity(&self) -> usize {
        self.answer.len()
    }

    pub fn active_value(&self) -> i64 {
        self.answer[self.active_field]
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }

    pub fn is_blank(&self) -> bool {
        self.answer.iter().all(|&v| v == 0)
    }
}
