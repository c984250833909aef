//! Custom test assertions

use storefront_monitor::monitoring::PerformanceReport;

/// Assertions for performance reports
pub trait ReportAssertions {
    /// Assert metrics are ordered by timestamp
    fn assert_sorted(&self);

    /// Assert the summary counts `requests` requests and `errors` errors
    fn assert_counts(&self, requests: u64, errors: u64);
}

impl ReportAssertions for PerformanceReport {
    fn assert_sorted(&self) {
        assert!(
            self.metrics
                .windows(2)
                .all(|pair| pair[0].timestamp <= pair[1].timestamp),
            "Expected report metrics to be sorted by timestamp"
        );
    }

    fn assert_counts(&self, requests: u64, errors: u64) {
        assert_eq!(
            self.summary.total_requests, requests,
            "unexpected request count"
        );
        assert_eq!(self.summary.total_errors, errors, "unexpected error count");
    }
}

/// Assert two values are approximately equal (for floats)
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr) => {
        assert_approx_eq!($left, $right, 1e-6_f64)
    };
    ($left:expr, $right:expr, $epsilon:expr) => {
        let left_val: f64 = $left as f64;
        let right_val: f64 = $right as f64;
        let diff = (left_val - right_val).abs();
        assert!(
            diff < $epsilon,
            concat!(
                "assertion failed: `(left ~ right)`\n",
                "  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` (epsilon: `{:?}`)"
            ),
            left_val,
            right_val,
            diff,
            $epsilon
        );
    };
}
