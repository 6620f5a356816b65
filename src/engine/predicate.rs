//! Answer predicates and the reference solutions they accept.
//!
//! Predicates are total: a state or answer of the wrong shape is simply not
//! a solution, and arithmetic that would overflow counts as a mismatch.
//! Fields compare positionally unless a predicate says otherwise.

use crate::engine::number_theory;

pub fn sum(answer: &[i64], state: &[i64]) -> bool {
    match (answer, state) {
        (&[ans], &[x, y]) => x.checked_add(y) == Some(ans),
        _ => false,
    }
}

pub fn difference(answer: &[i64], state: &[i64]) -> bool {
    match (answer, state) {
        (&[ans], &[x, y]) => x.checked_sub(y) == Some(ans),
        _ => false,
    }
}

pub fn product(answer: &[i64], state: &[i64]) -> bool {
    match (answer, state) {
        (&[ans], &[x, y]) => x.checked_mul(y) == Some(ans),
        _ => false,
    }
}

/// State is `[divisor, dividend]`.
pub fn quotient(answer: &[i64], state: &[i64]) -> bool {
    match (answer, state) {
        (&[ans], &[divisor, dividend]) => {
            divisor != 0 && ans.checked_mul(divisor) == Some(dividend)
        }
        _ => false,
    }
}

/// State is `[a, b, c]` for `a·x + b = c`.
pub fn linear_root(answer: &[i64], state: &[i64]) -> bool {
    match (answer, state) {
        (&[x], &[a, b, c]) => a
            .checked_mul(x)
            .and_then(|ax| ax.checked_add(b))
            .is_some_and(|lhs| lhs == c),
        _ => false,
    }
}

/// State is `[sum, product]` of the two roots. Order-insensitive: the pair
/// is matched through the symmetric identities `r1 + r2` and `r1 · r2`.
pub fn quadratic_roots(answer: &[i64], state: &[i64]) -> bool {
    match (answer, state) {
        (&[r1, r2], &[sum, product]) => {
            r1.checked_add(r2) == Some(sum) && r1.checked_mul(r2) == Some(product)
        }
        _ => false,
    }
}

/// State is `[n]`. Accepts any ordering of factors, each greater than one,
/// whose product is `n`. For a product of primes this is exactly the prime
/// factorization.
pub fn unordered_factors(answer: &[i64], state: &[i64]) -> bool {
    let &[n] = state else {
        return false;
    };
    if answer.is_empty() || answer.iter().any(|&f| f <= 1) {
        return false;
    }
    answer
        .iter()
        .try_fold(1i64, |acc, &f| acc.checked_mul(f))
        .is_some_and(|p| p == n)
}

pub fn largest_prime_factor(answer: &[i64], state: &[i64]) -> bool {
    match (answer, state) {
        (&[ans], &[n]) => number_theory::largest_prime_factor(n) == Some(ans),
        _ => false,
    }
}

/// State is `[a, b, x0]`: the derivative of `a·x² + b·x` at `x0`.
pub fn derivative_at(answer: &[i64], state: &[i64]) -> bool {
    match (answer, state) {
        (&[ans], &[a, b, x0]) => derivative_value(a, b, x0) == Some(ans),
        _ => false,
    }
}

/// State is `[k, u]`: the integral of `k·x` from 0 to `u`, i.e. `k·u²/2`.
pub fn definite_integral(answer: &[i64], state: &[i64]) -> bool {
    match (answer, state) {
        (&[ans], &[k, u]) => match (
            ans.checked_mul(2),
            k.checked_mul(u).and_then(|ku| ku.checked_mul(u)),
        ) {
            (Some(twice_ans), Some(twice_area)) => twice_ans == twice_area,
            _ => false,
        },
        _ => false,
    }
}

fn derivative_value(a: i64, b: i64, x0: i64) -> Option<i64> {
    a.checked_mul(2)?.checked_mul(x0)?.checked_add(b)
}

// --- Reference solutions ---

pub fn solve_sum(state: &[i64]) -> Vec<i64> {
    match *state {
        [x, y] => vec![x + y],
        _ => Vec::new(),
    }
}

pub fn solve_difference(state: &[i64]) -> Vec<i64> {
    match *state {
        [x, y] => vec![x - y],
        _ => Vec::new(),
    }
}

pub fn solve_product(state: &[i64]) -> Vec<i64> {
    match *state {
        [x, y] => vec![x * y],
        _ => Vec::new(),
    }
}

pub fn solve_quotient(state: &[i64]) -> Vec<i64> {
    match *state {
        [divisor, dividend] if divisor != 0 => vec![dividend / divisor],
        _ => Vec::new(),
    }
}

pub fn solve_linear(state: &[i64]) -> Vec<i64> {
    match *state {
        [a, b, c] if a != 0 => vec![(c - b) / a],
        _ => Vec::new(),
    }
}

/// Roots of `x² − s·x + p`, larger first. Empty when they are not integers.
pub fn solve_quadratic(state: &[i64]) -> Vec<i64> {
    let [s, p] = *state else {
        return Vec::new();
    };
    let disc = s * s - 4 * p;
    if disc < 0 {
        return Vec::new();
    }
    let root = disc.isqrt();
    if root * root != disc || (s + root) % 2 != 0 {
        return Vec::new();
    }
    vec![(s + root) / 2, (s - root) / 2]
}

pub fn solve_factors(state: &[i64]) -> Vec<i64> {
    match *state {
        [n] => number_theory::prime_factors(n),
        _ => Vec::new(),
    }
}

pub fn solve_largest_prime_factor(state: &[i64]) -> Vec<i64> {
    match *state {
        [n] => number_theory::largest_prime_factor(n).into_iter().collect(),
        _ => Vec::new(),
    }
}

pub fn solve_derivative(state: &[i64]) -> Vec<i64> {
    match *state {
        [a, b, x0] => derivative_value(a, b, x0).into_iter().collect(),
        _ => Vec::new(),
    }
}

pub fn solve_integral(state: &[i64]) -> Vec<i64> {
    match *state {
        [k, u] => vec![k * u * u / 2],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semiprime_factors_any_order() {
        assert!(unordered_factors(&[3, 5], &[15]));
        assert!(unordered_factors(&[5, 3], &[15]));
        assert!(!unordered_factors(&[1, 15], &[15]));
        assert!(!unordered_factors(&[15, 1], &[15]));
    }

    #[test]
    fn test_factors_reject_zero_and_negative_fields() {
        assert!(!unordered_factors(&[0, 0], &[15]));
        assert!(!unordered_factors(&[-3, -5], &[15]));
        assert!(!unordered_factors(&[3, 0], &[15]));
    }

    #[test]
    fn test_three_prime_factors() {
        assert!(unordered_factors(&[2, 7, 3], &[42]));
        assert!(unordered_factors(&[7, 3, 2], &[42]));
        assert!(!unordered_factors(&[6, 7, 1], &[42]));
    }

    #[test]
    fn test_quadratic_roots_unordered() {
        // roots 3 and -2: sum 1, product -6
        assert!(quadratic_roots(&[3, -2], &[1, -6]));
        assert!(quadratic_roots(&[-2, 3], &[1, -6]));
        assert!(!quadratic_roots(&[2, -3], &[1, -6]));
        assert!(!quadratic_roots(&[0, 0], &[1, -6]));
    }

    #[test]
    fn test_positional_predicates() {
        assert!(sum(&[7], &[3, 4]));
        assert!(difference(&[-1], &[3, 4]));
        assert!(!difference(&[1], &[3, 4]));
        assert!(product(&[12], &[3, 4]));
        assert!(quotient(&[7], &[4, 28]));
        assert!(!quotient(&[4], &[4, 28]));
    }

    #[test]
    fn test_linear_root() {
        // 3x + (-4) = 11 -> x = 5
        assert!(linear_root(&[5], &[3, -4, 11]));
        assert!(!linear_root(&[-5], &[3, -4, 11]));
    }

    #[test]
    fn test_calculus_predicates() {
        // d/dx (2x² + 3x) at 4 = 16 + 3
        assert!(derivative_at(&[19], &[2, 3, 4]));
        // ∫₀³ 2x dx = 9
        assert!(definite_integral(&[9], &[2, 3]));
        assert!(!definite_integral(&[8], &[2, 3]));
    }

    #[test]
    fn test_largest_prime_factor_predicate() {
        assert!(largest_prime_factor(&[7], &[84]));
        assert!(!largest_prime_factor(&[3], &[84]));
    }

    #[test]
    fn test_wrong_shapes_are_false_not_panics() {
        assert!(!sum(&[], &[1, 2]));
        assert!(!sum(&[3], &[1, 2, 3]));
        assert!(!quadratic_roots(&[1], &[1, -6]));
        assert!(!unordered_factors(&[3, 5], &[]));
        assert!(!linear_root(&[1], &[]));
    }

    #[test]
    fn test_overflow_is_a_mismatch() {
        assert!(!product(&[0], &[i64::MAX, 2]));
        assert!(!unordered_factors(&[i64::MAX, 2], &[2]));
        assert!(!definite_integral(&[i64::MAX], &[2, 3]));
    }

    #[test]
    fn test_solutions_satisfy_predicates() {
        assert_eq!(solve_quadratic(&[1, -6]), vec![3, -2]);
        assert!(quadratic_roots(&solve_quadratic(&[-4, 4]), &[-4, 4]));
        assert_eq!(solve_linear(&[3, -4, 11]), vec![5]);
        assert_eq!(solve_factors(&[30]), vec![2, 3, 5]);
        assert_eq!(solve_integral(&[2, 3]), vec![9]);
    }
}
