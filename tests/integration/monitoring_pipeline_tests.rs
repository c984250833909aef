//! Monitoring pipeline integration tests
//!
//! Drives metrics through the public `MonitoringSystem` API and checks the
//! route table, alert history and retention behave together.

#[cfg(test)]
mod tests {
    use crate::assert_approx_eq;
    use crate::common::assertions::ReportAssertions;
    use crate::common::{MetricFactory, TestHarness, test_config};
    use std::time::Duration;
    use storefront_monitor::monitoring::{
        AlertSeverity, AlertType, MemorySnapshot, MetricRecord, Sweep,
    };
    use storefront_monitor::utils::time::Clock;

    fn harness() -> TestHarness {
        TestHarness::with_config(test_config())
    }

    fn at_now(harness: &TestHarness, metric: MetricRecord) -> MetricRecord {
        MetricRecord {
            timestamp: harness.clock.now(),
            ..metric
        }
    }

    // ==================== Request Spans ====================

    #[test]
    fn test_sampled_span_produces_one_record() {
        let harness = harness();
        let monitoring = harness.monitoring();

        let span = monitoring
            .begin_request("GET", "/inventory/{id}")
            .expect("sample rate 1.0 always samples");
        assert_eq!(monitoring.collector().in_flight(), 1);

        monitoring.complete_request(span, 200, 2, 1).unwrap();

        assert_eq!(monitoring.collector().in_flight(), 0);
        assert_eq!(monitoring.metric_count(), 1);
        let metric = &monitoring.recent_metrics(1)[0];
        assert_eq!(metric.route_key(), "GET /inventory/{id}");
        assert_eq!(metric.cache_hits, 2);
        assert_eq!(metric.cache_misses, 1);
    }

    #[test]
    fn test_dropped_span_records_nothing() {
        let harness = harness();
        let monitoring = harness.monitoring();

        let span = monitoring.begin_request("GET", "/inventory").unwrap();
        drop(span);

        assert_eq!(monitoring.metric_count(), 0);
        assert_eq!(monitoring.collector().in_flight(), 0);
    }

    #[test]
    fn test_unsampled_requests_record_nothing() {
        let mut config = test_config();
        config.app.monitoring.sample_rate = 0.0;
        let harness = TestHarness::with_config(config);
        let monitoring = harness.monitoring();

        for _ in 0..20 {
            assert!(monitoring.begin_request("GET", "/").is_none());
        }
        assert_eq!(monitoring.metric_count(), 0);
        assert_eq!(monitoring.collector().stats().skipped, 20);
    }

    #[test]
    fn test_disabled_monitoring_records_nothing() {
        let mut config = test_config();
        config.app.monitoring.enabled = false;
        let harness = TestHarness::with_config(config);

        assert!(harness.monitoring().begin_request("GET", "/").is_none());
    }

    // ==================== Route Aggregation ====================

    #[test]
    fn test_route_average_is_total_over_count() {
        let harness = harness();
        let monitoring = harness.monitoring();

        for ms in [120.0, 80.0, 40.0, 10.0] {
            monitoring
                .record(at_now(&harness, MetricFactory::ok("/financing", ms)))
                .unwrap();
            let stat = monitoring.routes().get("GET /financing").unwrap();
            assert_approx_eq!(stat.avg_response_time, stat.total_time / stat.count as f64);
        }

        let stat = monitoring.routes().get("GET /financing").unwrap();
        assert_eq!(stat.count, 4);
        assert_approx_eq!(stat.avg_response_time, 62.5);
    }

    #[test]
    fn test_invalid_response_time_rejected() {
        let harness = harness();
        let monitoring = harness.monitoring();

        let result = monitoring.record(MetricFactory::ok("/", f64::NAN));
        assert!(result.is_err());
        assert_eq!(monitoring.metric_count(), 0);
        assert!(monitoring.routes().is_empty());
    }

    // ==================== Alerts ====================

    #[test]
    fn test_response_time_severity_scenarios() {
        let harness = harness();
        let monitoring = harness.monitoring();

        let alert = monitoring
            .record(at_now(&harness, MetricFactory::ok("/inventory", 1500.0)))
            .unwrap()
            .expect("alert");
        assert_eq!(alert.alert_type, AlertType::ResponseTime);
        assert_eq!(alert.severity, AlertSeverity::Medium);

        harness.clock.advance(Duration::from_secs(301));

        let alert = monitoring
            .record(at_now(&harness, MetricFactory::ok("/inventory", 6000.0)))
            .unwrap()
            .expect("alert");
        assert_eq!(alert.severity, AlertSeverity::Critical);
        assert_eq!(alert.route.as_deref(), Some("GET /inventory"));
    }

    #[test]
    fn test_memory_alert_scenario() {
        let harness = harness();
        let monitoring = harness.monitoring();

        let metric = MetricRecord {
            memory: MemorySnapshot {
                system_used: 95,
                system_total: 100,
                ..MemorySnapshot::default()
            },
            ..at_now(&harness, MetricFactory::ok("/", 20.0))
        };

        let alert = monitoring.record(metric).unwrap().expect("alert");
        assert_eq!(alert.alert_type, AlertType::MemoryUsage);
        assert_eq!(alert.alert_type.as_str(), "memory_usage");
        assert_eq!(alert.severity, AlertSeverity::Critical);
    }

    #[test]
    fn test_cooldown_allows_one_alert_per_window() {
        let harness = harness();
        let monitoring = harness.monitoring();

        let slow = || at_now(&harness, MetricFactory::ok("/inventory", 2500.0));

        assert!(monitoring.record(slow()).unwrap().is_some());
        harness.clock.advance(Duration::from_secs(60));
        assert!(monitoring.record(slow()).unwrap().is_none());

        assert_eq!(monitoring.alert_history(10).len(), 1);
        assert_eq!(monitoring.alerts().stats().suppressed, 1);

        harness.clock.advance(Duration::from_secs(241));
        assert!(monitoring.record(slow()).unwrap().is_some());
        assert_eq!(monitoring.alert_history(10).len(), 2);
    }

    #[test]
    fn test_error_rate_alert_uses_global_rate() {
        let harness = harness();
        let monitoring = harness.monitoring();

        for _ in 0..9 {
            assert!(
                monitoring
                    .record(at_now(&harness, MetricFactory::ok("/", 10.0)))
                    .unwrap()
                    .is_none()
            );
        }

        // 1 error in 10 requests is over the 5% threshold
        let alert = monitoring
            .record(at_now(&harness, MetricFactory::error("/checkout", 502)))
            .unwrap()
            .expect("alert");
        assert_eq!(alert.alert_type, AlertType::ErrorRate);
        assert_approx_eq!(alert.value, 0.1);
    }

    #[test]
    fn test_cpu_alerts_disabled_by_default() {
        let harness = harness();
        let metric = MetricRecord {
            cpu: storefront_monitor::monitoring::CpuUsage { percent: 99.0 },
            ..at_now(&harness, MetricFactory::ok("/", 10.0))
        };

        assert!(harness.monitoring().record(metric).unwrap().is_none());
    }

    // ==================== Retention & Reports ====================

    #[test]
    fn test_retention_evicts_on_record() {
        let harness = harness();
        let monitoring = harness.monitoring();

        monitoring
            .record(at_now(&harness, MetricFactory::ok("/old", 10.0)))
            .unwrap();
        harness.clock.advance(Duration::from_secs(86_401));
        monitoring
            .record(at_now(&harness, MetricFactory::ok("/new", 10.0)))
            .unwrap();

        let routes: Vec<String> = monitoring
            .recent_metrics(10)
            .into_iter()
            .map(|m| m.route)
            .collect();
        assert_eq!(routes, vec!["/new".to_string()]);
    }

    #[test]
    fn test_sweep_evicts_without_new_records() {
        let harness = harness();
        let monitoring = harness.monitoring();

        monitoring
            .record(at_now(&harness, MetricFactory::ok("/", 10.0)))
            .unwrap();
        harness.clock.advance(Duration::from_secs(86_401));

        assert_eq!(harness.state.sweeper.run_once(), 1);
        assert_eq!(monitoring.metric_count(), 0);
        assert_eq!(Sweep::name(monitoring), "monitoring");
    }

    #[test]
    fn test_report_summary() {
        let harness = harness();
        let monitoring = harness.monitoring();

        for ms in [10.0, 20.0, 30.0, 40.0] {
            monitoring
                .record(at_now(&harness, MetricFactory::ok("/inventory", ms)))
                .unwrap();
            harness.clock.advance(Duration::from_secs(1));
        }
        monitoring
            .record(at_now(&harness, MetricFactory::error("/inventory", 500)))
            .unwrap();

        let report = monitoring.report(Duration::from_secs(3600));
        report.assert_sorted();
        report.assert_counts(5, 1);
        assert_approx_eq!(report.summary.error_rate, 0.2);
        assert_approx_eq!(report.summary.p50_response_time_ms, 25.0);
        assert_eq!(report.routes["GET /inventory"].count, 5);
    }

    #[test]
    fn test_report_window_excludes_older_metrics() {
        let harness = harness();
        let monitoring = harness.monitoring();

        monitoring
            .record(at_now(&harness, MetricFactory::ok("/", 10.0)))
            .unwrap();
        harness.clock.advance(Duration::from_secs(120));
        monitoring
            .record(at_now(&harness, MetricFactory::ok("/", 30.0)))
            .unwrap();

        let report = monitoring.report(Duration::from_secs(60));
        report.assert_counts(1, 0);
        assert_approx_eq!(report.summary.avg_response_time_ms, 30.0);
        // The route table is cumulative, not windowed
        assert_eq!(report.routes["GET /"].count, 2);
    }
}
