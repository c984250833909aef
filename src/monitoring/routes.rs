//! Per-route request statistics

use super::metrics::helpers::ratio;
use super::types::RouteStat;
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct RouteTable {
    routes: HashMap<String, RouteStat>,
    total_requests: u64,
    total_errors: u64,
}

/// Running per-route and global request counters
///
/// Entries are created on first sight and never evicted.
#[derive(Debug, Default)]
pub struct RouteAggregator {
    table: RwLock<RouteTable>,
}

impl RouteAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one observation into the stat for `route_key`
    pub fn record(&self, route_key: &str, response_time_ms: f64, is_error: bool) -> RouteStat {
        let mut table = self.table.write();
        table.total_requests += 1;
        if is_error {
            table.total_errors += 1;
        }

        let stat = table.routes.entry(route_key.to_string()).or_default();
        stat.count += 1;
        stat.total_time += response_time_ms;
        if is_error {
            stat.errors += 1;
        }
        stat.avg_response_time = stat.total_time / stat.count as f64;
        *stat
    }

    pub fn get(&self, route_key: &str) -> Option<RouteStat> {
        self.table.read().routes.get(route_key).copied()
    }

    pub fn snapshot(&self) -> HashMap<String, RouteStat> {
        self.table.read().routes.clone()
    }

    /// Routes with the highest average response time, slowest first
    pub fn slowest(&self, n: usize) -> Vec<(String, RouteStat)> {
        let mut routes: Vec<(String, RouteStat)> = self
            .table
            .read()
            .routes
            .iter()
            .map(|(key, stat)| (key.clone(), *stat))
            .collect();
        routes.sort_by(|a, b| b.1.avg_response_time.total_cmp(&a.1.avg_response_time));
        routes.truncate(n);
        routes
    }

    /// `(total_requests, total_errors)` across all routes
    pub fn totals(&self) -> (u64, u64) {
        let table = self.table.read();
        (table.total_requests, table.total_errors)
    }

    /// Global error rate, 0.0 before the first request
    pub fn error_rate(&self) -> f64 {
        let (requests, errors) = self.totals();
        ratio(errors, requests)
    }

    pub fn len(&self) -> usize {
        self.table.read().routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_record_creates_stat() {
        let routes = RouteAggregator::new();
        assert!(routes.get("GET /vehicles").is_none());

        let stat = routes.record("GET /vehicles", 120.0, false);

        assert_eq!(stat.count, 1);
        assert_eq!(stat.total_time, 120.0);
        assert_eq!(stat.errors, 0);
        assert_eq!(stat.avg_response_time, 120.0);
        assert_eq!(routes.get("GET /vehicles"), Some(stat));
    }

    #[test]
    fn test_average_recomputed_on_update() {
        let routes = RouteAggregator::new();
        routes.record("GET /vehicles/{id}", 100.0, false);
        routes.record("GET /vehicles/{id}", 300.0, true);

        let stat = routes.get("GET /vehicles/{id}").expect("stat");
        assert_eq!(stat.count, 2);
        assert_eq!(stat.total_time, 400.0);
        assert_eq!(stat.errors, 1);
        assert_eq!(stat.avg_response_time, 200.0);
    }

    #[test]
    fn test_methods_are_separate_keys() {
        let routes = RouteAggregator::new();
        routes.record("GET /cart", 10.0, false);
        routes.record("POST /cart", 20.0, false);

        assert_eq!(routes.len(), 2);
        assert_eq!(routes.get("POST /cart").map(|s| s.count), Some(1));
    }

    #[test]
    fn test_error_rate() {
        let routes = RouteAggregator::new();
        assert_eq!(routes.error_rate(), 0.0);

        routes.record("GET /a", 1.0, false);
        routes.record("GET /b", 1.0, true);
        routes.record("GET /a", 1.0, false);
        routes.record("GET /a", 1.0, false);

        assert_eq!(routes.totals(), (4, 1));
        assert_eq!(routes.error_rate(), 0.25);
    }

    #[test]
    fn test_slowest() {
        let routes = RouteAggregator::new();
        routes.record("GET /fast", 5.0, false);
        routes.record("GET /slow", 900.0, false);
        routes.record("GET /medium", 80.0, false);

        let slowest = routes.slowest(2);
        let keys: Vec<&str> = slowest.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["GET /slow", "GET /medium"]);
    }

    #[test]
    fn test_concurrent_records() {
        let routes = std::sync::Arc::new(RouteAggregator::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let routes = routes.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        routes.record("GET /shared", 1.0, false);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(routes.get("GET /shared").map(|s| s.count), Some(800));
    }
}
