use std::collections::BTreeMap;

use tracing::debug;

const AVG_TIME_SUFFIX: &str = ".avg_time";

/// Weight on the previous average.
const PRIOR_WEIGHT: f64 = 0.2;
/// Scale applied after mixing in the new sample.
const DAMPING: f64 = 0.8;

/// Placeholder shown for a template that has never been solved.
pub const NO_DATA: &str = "—";

/// Durable scalar storage keyed by string.
pub trait ScalarStore {
    fn get(&self, key: &str) -> Option<f64>;
    fn set(&mut self, key: &str, value: f64);
}

impl ScalarStore for BTreeMap<String, f64> {
    fn get(&self, key: &str) -> Option<f64> {
        BTreeMap::get(self, key).copied()
    }

    fn set(&mut self, key: &str, value: f64) {
        self.insert(key.to_string(), value);
    }
}

pub fn avg_time_key(title: &str) -> String {
    format!("{title}{AVG_TIME_SUFFIX}")
}

/// Fold a new solve time into the running average.
///
/// This is `0.8 * (0.2 * avg + elapsed)`, which weights the old average by
/// 0.16 and the sample by 0.8. The weights sum to 0.96, not 1.0.
pub fn fold_sample(avg: f64, elapsed_secs: f64) -> f64 {
    DAMPING * (PRIOR_WEIGHT * avg + elapsed_secs)
}

/// `%.2f` seconds, or [`NO_DATA`] before the first solve.
pub fn format_average(average: Option<f64>) -> String {
    match average {
        Some(secs) => format!("{secs:.2}"),
        None => NO_DATA.to_string(),
    }
}

/// Owns the per-template rolling solve time.
#[derive(Clone, Debug, Default)]
pub struct TimingTracker<S = BTreeMap<String, f64>> {
    store: S,
}

impl<S: ScalarStore> TimingTracker<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Record one solve and return the new average.
    pub fn record_sample(&mut self, title: &str, elapsed_secs: f64) -> f64 {
        let key = avg_time_key(title);
        let average = match self.store.get(&key) {
            Some(prev) => fold_sample(prev, elapsed_secs),
            None => elapsed_secs,
        };
        self.store.set(&key, average);
        debug!(title, elapsed_secs, average, "folded solve time");
        average
    }

    pub fn read_average(&self, title: &str) -> Option<f64> {
        self.store.get(&avg_time_key(title))
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> TimingTracker {
        TimingTracker::new(BTreeMap::new())
    }

    #[test]
    fn test_no_data_before_first_solve() {
        let t = tracker();
        assert_eq!(t.read_average("T"), None);
        assert_eq!(format_average(t.read_average("T")), "—");
    }

    #[test]
    fn test_first_sample_is_stored_verbatim() {
        let mut t = tracker();
        assert_eq!(t.record_sample("T", 10.0), 10.0);
        assert_eq!(t.read_average("T"), Some(10.0));
    }

    #[test]
    fn test_second_sample_uses_damped_fold() {
        let mut t = tracker();
        t.record_sample("T", 10.0);
        let avg = t.record_sample("T", 10.0);
        // 0.8 * (0.2 * 10 + 10), not the plain mean of 10
        assert!((avg - 9.6).abs() < 1e-9, "got {avg}");
        assert!((t.read_average("T").unwrap() - 9.6).abs() < 1e-9);
    }

    #[test]
    fn test_steady_input_settles_below_sample() {
        let mut t = tracker();
        for _ in 0..100 {
            t.record_sample("T", 5.0);
        }
        // fixed point of a = 0.16a + 4 is 4 / 0.84
        let avg = t.read_average("T").unwrap();
        assert!((avg - 4.0 / 0.84).abs() < 1e-6, "got {avg}");
    }

    #[test]
    fn test_templates_are_independent() {
        let mut t = tracker();
        t.record_sample("A", 3.0);
        t.record_sample("B", 7.0);
        assert_eq!(t.read_average("A"), Some(3.0));
        assert_eq!(t.read_average("B"), Some(7.0));
    }

    #[test]
    fn test_store_keys_use_avg_time_suffix() {
        let mut t = tracker();
        t.record_sample("2-2 Multiplication", 4.25);
        assert_eq!(
            t.store().get("2-2 Multiplication.avg_time"),
            Some(&4.25)
        );
        assert_eq!(format_average(Some(4.25)), "4.25");
    }
}
