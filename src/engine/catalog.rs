use std::collections::HashSet;

use crate::engine::number_theory;
use crate::engine::predicate as p;
use crate::engine::template::{Category, Step, Template, TemplateError};

// --- Candidate sets for derived steps ---
//
// Each of these must return a non-empty set for every prefix the earlier
// steps of its template can draw.

fn nonzero(limit: i64) -> impl Iterator<Item = i64> {
    (-limit..=limit).filter(|&k| k != 0)
}

/// `y` in `10..x`, so the difference is positive.
fn smaller_two_digit(prefix: &[i64]) -> Vec<i64> {
    match *prefix {
        [x] => (10..x).collect(),
        _ => Vec::new(),
    }
}

/// Dividends with an exact quotient in `2..=12`.
fn dividends(prefix: &[i64]) -> Vec<i64> {
    match *prefix {
        [divisor] => (2..=12).map(|k| divisor * k).collect(),
        _ => Vec::new(),
    }
}

/// Right-hand sides `a·k + b` with a non-zero integer solution `k`.
fn linear_rhs(prefix: &[i64]) -> Vec<i64> {
    match *prefix {
        [a, b] => nonzero(12).map(|k| a * k + b).collect(),
        _ => Vec::new(),
    }
}

/// Products `r·(s − r)` for non-zero integer roots `r` and `s − r`.
fn root_products(prefix: &[i64]) -> Vec<i64> {
    match *prefix {
        [s] => nonzero(9).filter(|&r| r != s).map(|r| r * (s - r)).collect(),
        _ => Vec::new(),
    }
}

fn composites(_prefix: &[i64]) -> Vec<i64> {
    (12..=999).filter(|&n| !number_theory::is_prime(n)).collect()
}

/// Upper bounds `u` for which `k·u²/2` is an integer.
fn even_area_bounds(prefix: &[i64]) -> Vec<i64> {
    match *prefix {
        [k] => (1..=10).filter(|u| (k * u * u) % 2 == 0).collect(),
        _ => Vec::new(),
    }
}

// --- Built-in templates ---

const ONE_ONE: &[Step] = &[Step::Range { lo: 1, hi: 9 }, Step::Range { lo: 1, hi: 9 }];
const TWO_ONE: &[Step] = &[Step::Range { lo: 10, hi: 99 }, Step::Range { lo: 1, hi: 9 }];
const TWO_TWO: &[Step] = &[
    Step::Range { lo: 10, hi: 99 },
    Step::Range { lo: 10, hi: 99 },
];
const ONE_ONE_FACTORS: &[Step] = &[Step::Range { lo: 2, hi: 9 }, Step::Range { lo: 2, hi: 9 }];
const TWO_ONE_FACTORS: &[Step] = &[
    Step::Range { lo: 10, hi: 99 },
    Step::Range { lo: 2, hi: 9 },
];
const SUBTRACTION: &[Step] = &[
    Step::Range { lo: 11, hi: 99 },
    Step::Derived(smaller_two_digit),
];
const DIVISION: &[Step] = &[Step::Range { lo: 2, hi: 12 }, Step::Derived(dividends)];
const LINEAR: &[Step] = &[
    Step::Range { lo: 2, hi: 9 },
    Step::Range { lo: -20, hi: 20 },
    Step::Derived(linear_rhs),
];
const QUADRATIC: &[Step] = &[Step::Range { lo: -8, hi: 8 }, Step::Derived(root_products)];
const SEMIPRIME: &[Step] = &[Step::PrimeProduct {
    bound: 50,
    count: 2,
}];
const THREE_PRIMES: &[Step] = &[Step::PrimeProduct {
    bound: 20,
    count: 3,
}];
const COMPOSITE: &[Step] = &[Step::Derived(composites)];
const DERIVATIVE: &[Step] = &[
    Step::Range { lo: 1, hi: 9 },
    Step::Range { lo: 1, hi: 9 },
    Step::Range { lo: 1, hi: 9 },
];
const INTEGRAL: &[Step] = &[Step::Range { lo: 1, hi: 9 }, Step::Derived(even_area_bounds)];

pub const BUILTIN_TEMPLATES: &[Template] = &[
    Template {
        title: "1-1 Addition",
        category: Category::Arithmetic,
        answer_arity: 1,
        steps: ONE_ONE,
        display_pattern: "{} + {}",
        predicate: p::sum,
        solution: p::solve_sum,
    },
    Template {
        title: "2-1 Addition",
        category: Category::Arithmetic,
        answer_arity: 1,
        steps: TWO_ONE,
        display_pattern: "{} + {}",
        predicate: p::sum,
        solution: p::solve_sum,
    },
    Template {
        title: "2-2 Addition",
        category: Category::Arithmetic,
        answer_arity: 1,
        steps: TWO_TWO,
        display_pattern: "{} + {}",
        predicate: p::sum,
        solution: p::solve_sum,
    },
    Template {
        title: "2-2 Subtraction",
        category: Category::Arithmetic,
        answer_arity: 1,
        steps: SUBTRACTION,
        display_pattern: "{} − {}",
        predicate: p::difference,
        solution: p::solve_difference,
    },
    Template {
        title: "1-1 Multiplication",
        category: Category::Arithmetic,
        answer_arity: 1,
        steps: ONE_ONE_FACTORS,
        display_pattern: "{} × {}",
        predicate: p::product,
        solution: p::solve_product,
    },
    Template {
        title: "2-1 Multiplication",
        category: Category::Arithmetic,
        answer_arity: 1,
        steps: TWO_ONE_FACTORS,
        display_pattern: "{} × {}",
        predicate: p::product,
        solution: p::solve_product,
    },
    Template {
        title: "2-2 Multiplication",
        category: Category::Arithmetic,
        answer_arity: 1,
        steps: TWO_TWO,
        display_pattern: "{} × {}",
        predicate: p::product,
        solution: p::solve_product,
    },
    Template {
        title: "Division",
        category: Category::Arithmetic,
        answer_arity: 1,
        steps: DIVISION,
        display_pattern: "{1} ÷ {0}",
        predicate: p::quotient,
        solution: p::solve_quotient,
    },
    Template {
        title: "Linear Equation",
        category: Category::Algebra,
        answer_arity: 1,
        steps: LINEAR,
        display_pattern: "{}x + ({}) = {}",
        predicate: p::linear_root,
        solution: p::solve_linear,
    },
    Template {
        title: "Quadratic Roots",
        category: Category::Algebra,
        answer_arity: 2,
        steps: QUADRATIC,
        display_pattern: "x² − ({})x + ({}) = 0",
        predicate: p::quadratic_roots,
        solution: p::solve_quadratic,
    },
    Template {
        title: "Factor Semiprime",
        category: Category::Algebra,
        answer_arity: 2,
        steps: SEMIPRIME,
        display_pattern: "{} = a × b",
        predicate: p::unordered_factors,
        solution: p::solve_factors,
    },
    Template {
        title: "Factor Three Primes",
        category: Category::Algebra,
        answer_arity: 3,
        steps: THREE_PRIMES,
        display_pattern: "{} = a × b × c",
        predicate: p::unordered_factors,
        solution: p::solve_factors,
    },
    Template {
        title: "Largest Prime Factor",
        category: Category::Algebra,
        answer_arity: 1,
        steps: COMPOSITE,
        display_pattern: "largest prime factor of {}",
        predicate: p::largest_prime_factor,
        solution: p::solve_largest_prime_factor,
    },
    Template {
        title: "Derivative at a Point",
        category: Category::Calculus,
        answer_arity: 1,
        steps: DERIVATIVE,
        display_pattern: "d/dx [{}x² + {}x] at x = {}",
        predicate: p::derivative_at,
        solution: p::solve_derivative,
    },
    Template {
        title: "Definite Integral",
        category: Category::Calculus,
        answer_arity: 1,
        steps: INTEGRAL,
        display_pattern: "∫ from 0 to {1} of {0}x dx",
        predicate: p::definite_integral,
        solution: p::solve_integral,
    },
];

// --- Catalog ---

/// Ordered, read-only set of templates, built once at startup and passed to
/// whoever needs it.
#[derive(Clone, Debug)]
pub struct Catalog {
    templates: Vec<Template>,
}

impl Catalog {
    pub fn new(templates: Vec<Template>) -> Result<Self, TemplateError> {
        let mut seen = HashSet::new();
        for template in &templates {
            template.validate()?;
            if !seen.insert(template.title) {
                return Err(TemplateError::DuplicateTitle(template.title.to_string()));
            }
        }
        Ok(Self { templates })
    }

    pub fn builtin() -> Result<Self, TemplateError> {
        Self::new(BUILTIN_TEMPLATES.to_vec())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Template> {
        self.templates.get(index)
    }

    pub fn find(&self, title: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.title == title)
    }

    pub fn position(&self, title: &str) -> Option<usize> {
        self.templates.iter().position(|t| t.title == title)
    }

    /// Indices of templates whose title contains `query`, ignoring case.
    /// An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<usize> {
        let needle = query.trim().to_lowercase();
        self.templates
            .iter()
            .enumerate()
            .filter(|(_, t)| needle.is_empty() || t.title.to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect()
    }
}
