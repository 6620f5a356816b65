use std::fmt;

use rand::Rng;
use thiserror::Error;

use crate::engine::format::{self, PatternError};
use crate::engine::generate;

// --- Category ---

/// Topic tag shown next to a template. Has no effect on generation or checking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Arithmetic,
    Algebra,
    Calculus,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Arithmetic => "Arithmetic",
            Category::Algebra => "Algebra",
            Category::Calculus => "Calculus",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Generator steps ---

/// Builds the candidate set for a step from the values drawn before it.
pub type CandidateFn = fn(prefix: &[i64]) -> Vec<i64>;

/// Judges a complete answer buffer against a generated state.
pub type PredicateFn = fn(answer: &[i64], state: &[i64]) -> bool;

/// Produces one answer the predicate accepts for a generated state.
pub type SolutionFn = fn(state: &[i64]) -> Vec<i64>;

/// One stage of the generation pipeline. Each step emits exactly one value.
#[derive(Clone, Copy, Debug)]
pub enum Step {
    /// Uniform draw from `lo..=hi`.
    Range { lo: i64, hi: i64 },
    /// Uniform draw from a finite set computed from the already drawn prefix.
    /// The set must never be empty for any prefix the earlier steps can produce.
    Derived(CandidateFn),
    /// Draws `count` primes up to `bound` and emits only their product.
    PrimeProduct { bound: i64, count: usize },
}

// --- Template ---

/// A named problem family. Templates are plain static data and are never
/// mutated after the catalog is built.
#[derive(Clone, Copy, Debug)]
pub struct Template {
    pub title: &'static str,
    pub category: Category,
    pub answer_arity: usize,
    pub steps: &'static [Step],
    pub display_pattern: &'static str,
    pub predicate: PredicateFn,
    pub solution: SolutionFn,
}

impl Template {
    /// Draw a fresh state, one value per step, strictly in step order.
    ///
    /// # Panics
    ///
    /// Panics if a step has nothing to draw from. That is a template
    /// authoring defect, not a runtime condition.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<i64> {
        generate::generate_state(self, rng)
    }

    pub fn render(&self, state: &[i64]) -> String {
        format::render(self.display_pattern, state)
    }

    /// Evaluate the predicate. Buffers of the wrong arity are never correct.
    pub fn check(&self, answer: &[i64], state: &[i64]) -> bool {
        answer.len() == self.answer_arity && (self.predicate)(answer, state)
    }

    pub fn solve(&self, state: &[i64]) -> Vec<i64> {
        (self.solution)(state)
    }

    /// Structural checks that can be made without drawing a state.
    pub fn validate(&self) -> Result<(), TemplateError> {
        let title = self.title.to_string();
        if self.title.trim().is_empty() {
            return Err(TemplateError::EmptyTitle);
        }
        if self.answer_arity == 0 {
            return Err(TemplateError::ZeroArity { title });
        }
        if self.steps.is_empty() {
            return Err(TemplateError::NoSteps { title });
        }

        for (step, kind) in self.steps.iter().enumerate() {
            match *kind {
                Step::Range { lo, hi } if lo > hi => {
                    return Err(TemplateError::EmptyRange { title, step, lo, hi });
                }
                Step::PrimeProduct { bound, count } if bound < 2 || count == 0 => {
                    return Err(TemplateError::NoPrimes { title, step, bound });
                }
                _ => {}
            }
        }

        let segments = format::parse(self.display_pattern).map_err(|reason| {
            TemplateError::MalformedPattern {
                title: title.clone(),
                reason,
            }
        })?;
        let len = self.steps.len();
        if let Some(index) = format::placeholder_indices(&segments)
            .into_iter()
            .find(|&i| i >= len)
        {
            return Err(TemplateError::PlaceholderOutOfRange { title, index, len });
        }

        Ok(())
    }
}

// --- Errors ---

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template title is empty")]
    EmptyTitle,

    #[error("duplicate template title {0:?}")]
    DuplicateTitle(String),

    #[error("template {title:?} needs at least one answer field")]
    ZeroArity { title: String },

    #[error("template {title:?} has no generator steps")]
    NoSteps { title: String },

    #[error("template {title:?} step {step} has an empty range {lo}..={hi}")]
    EmptyRange {
        title: String,
        step: usize,
        lo: i64,
        hi: i64,
    },

    #[error("template {title:?} step {step} has no primes to draw up to {bound}")]
    NoPrimes { title: String, step: usize, bound: i64 },

    #[error("template {title:?} has a malformed display pattern: {reason}")]
    MalformedPattern { title: String, reason: PatternError },

    #[error("template {title:?} references state value {index} but only {len} are generated")]
    PlaceholderOutOfRange {
        title: String,
        index: usize,
        len: usize,
    },
}
