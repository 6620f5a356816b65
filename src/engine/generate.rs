use rand::Rng;
use rand::seq::SliceRandom;

use crate::engine::number_theory;
use crate::engine::template::{Step, Template};

/// Run the template's steps in order. Each step sees only the values drawn
/// before it.
///
/// # Panics
///
/// Panics if a step has nothing to draw from (see [`Template::generate`]).
pub fn generate_state<R: Rng + ?Sized>(template: &Template, rng: &mut R) -> Vec<i64> {
    let mut state = Vec::with_capacity(template.steps.len());
    for (i, step) in template.steps.iter().enumerate() {
        let value = draw(step, &state, rng).unwrap_or_else(|| {
            panic!(
                "template {:?} step {i} has no values to draw from (prefix {state:?})",
                template.title
            )
        });
        state.push(value);
    }
    state
}

/// Draw one value for `step` given the values already produced.
/// Returns `None` when the step's domain is empty.
pub fn draw<R: Rng + ?Sized>(step: &Step, prefix: &[i64], rng: &mut R) -> Option<i64> {
    match *step {
        Step::Range { lo, hi } => {
            if lo > hi {
                return None;
            }
            Some(rng.gen_range(lo..=hi))
        }
        Step::Derived(candidates) => candidates(prefix).choose(rng).copied(),
        Step::PrimeProduct { bound, count } => {
            let primes = number_theory::primes_up_to(bound);
            if primes.is_empty() || count == 0 {
                return None;
            }
            Some(
                (0..count)
                    .map(|_| primes[rng.gen_range(0..primes.len())])
                    .product(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::predicate;
    use crate::engine::template::Category;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn evens_above(prefix: &[i64]) -> Vec<i64> {
        match prefix {
            [x] => (*x + 1..=*x + 10).filter(|n| n % 2 == 0).collect(),
            _ => Vec::new(),
        }
    }

    fn nothing(_prefix: &[i64]) -> Vec<i64> {
        Vec::new()
    }

    const DEPENDENT: &[Step] = &[Step::Range { lo: -5, hi: 5 }, Step::Derived(evens_above)];
    const EMPTY: &[Step] = &[Step::Range { lo: 1, hi: 1 }, Step::Derived(nothing)];

    fn template(steps: &'static [Step]) -> Template {
        Template {
            title: "Dependent",
            category: Category::Algebra,
            answer_arity: 1,
            steps,
            display_pattern: "{} {}",
            predicate: predicate::sum,
            solution: predicate::solve_sum,
        }
    }

    #[test]
    fn test_range_draws_stay_in_bounds() {
        let mut rng = SmallRng::seed_from_u64(7);
        let step = Step::Range { lo: 10, hi: 99 };
        for _ in 0..500 {
            let v = draw(&step, &[], &mut rng).unwrap();
            assert!((10..=99).contains(&v));
        }
    }

    #[test]
    fn test_single_value_range() {
        let mut rng = SmallRng::seed_from_u64(7);
        assert_eq!(draw(&Step::Range { lo: 4, hi: 4 }, &[], &mut rng), Some(4));
    }

    #[test]
    fn test_derived_step_reads_prefix() {
        let mut rng = SmallRng::seed_from_u64(42);
        let t = template(DEPENDENT);
        for _ in 0..200 {
            let state = generate_state(&t, &mut rng);
            assert_eq!(state.len(), 2);
            assert!(state[1] > state[0] && state[1] <= state[0] + 10);
            assert_eq!(state[1] % 2, 0);
        }
    }

    #[test]
    fn test_prime_product_emits_single_value() {
        let mut rng = SmallRng::seed_from_u64(3);
        let step = Step::PrimeProduct { bound: 20, count: 3 };
        for _ in 0..200 {
            let n = draw(&step, &[], &mut rng).unwrap();
            let factors = number_theory::prime_factors(n);
            assert_eq!(factors.len(), 3, "{n} should have three prime factors");
            assert!(factors.iter().all(|&p| p <= 20));
        }
    }

    #[test]
    fn test_empty_domains_yield_none() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(draw(&Step::Range { lo: 2, hi: 1 }, &[], &mut rng), None);
        assert_eq!(draw(&Step::Derived(nothing), &[1], &mut rng), None);
        assert_eq!(
            draw(&Step::PrimeProduct { bound: 1, count: 2 }, &[], &mut rng),
            None
        );
    }

    #[test]
    #[should_panic(expected = "no values to draw from")]
    fn test_empty_derived_set_is_fatal() {
        let mut rng = SmallRng::seed_from_u64(1);
        generate_state(&template(EMPTY), &mut rng);
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let t = template(DEPENDENT);
        let a = generate_state(&t, &mut SmallRng::seed_from_u64(99));
        let b = generate_state(&t, &mut SmallRng::seed_from_u64(99));
        assert_eq!(a, b);
    }
}
