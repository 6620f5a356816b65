/// All primes `<= bound` in ascending order (sieve of Eratosthenes).
pub fn primes_up_to(bound: i64) -> Vec<i64> {
    if bound < 2 {
        return Vec::new();
    }
    let n = bound as usize;
    let mut composite = vec![false; n + 1];
    let mut primes = Vec::new();

    for i in 2..=n {
        if composite[i] {
            continue;
        }
        primes.push(i as i64);
        for multiple in (i * i..=n).step_by(i) {
            composite[multiple] = true;
        }
    }
    primes
}

/// Prime factorization of `|n|` with multiplicity, ascending.
/// Empty for `|n| <= 1`.
pub fn prime_factors(n: i64) -> Vec<i64> {
    let mut rest = n.unsigned_abs();
    let mut factors = Vec::new();
    let mut p: u64 = 2;

    while p * p <= rest {
        while rest % p == 0 {
            factors.push(p as i64);
            rest /= p;
        }
        p += if p == 2 { 1 } else { 2 };
    }
    if rest > 1 {
        factors.push(rest as i64);
    }
    factors
}

pub fn is_prime(n: i64) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    let mut d = 3;
    while d <= n / d {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

pub fn largest_prime_factor(n: i64) -> Option<i64> {
    prime_factors(n).last().copied()
}
