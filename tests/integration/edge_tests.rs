//! Edge integration tests
//!
//! Serves images from a wiremock origin through the full application, and
//! exercises the cache and rate limiter through their public API.

#[cfg(test)]
mod tests {
    use crate::common::{TestHarness, png_bytes, test_config};
    use actix_web::http::StatusCode;
    use actix_web::{test, web};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use storefront_monitor::config::EdgeRateLimitConfig;
    use storefront_monitor::edge::{EdgeCache, EdgeRateLimiter, fingerprint};
    use storefront_monitor::server::HttpServer;
    use storefront_monitor::utils::error::MonitorError;
    use storefront_monitor::utils::time::MockClock;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn origin() -> MockServer {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/cars/broken.png"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/cars/not-an-image.png"))
            .respond_with(ResponseTemplate::new(200).set_body_string("definitely not a png"))
            .mount(&server)
            .await;

        server
    }

    // ==================== Image Endpoint ====================

    #[actix_web::test]
    async fn test_image_fetched_once_then_served_from_cache() {
        let origin = origin().await;
        Mock::given(method("GET"))
            .and(path("/cars/roadster.png"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(png_bytes(80, 60).to_vec())
                    .insert_header("content-type", "image/png"),
            )
            .expect(1)
            .mount(&origin)
            .await;
        let harness = TestHarness::with_config(test_config());
        let app =
            test::init_service(HttpServer::create_app(web::Data::new(harness.state.clone()))).await;

        let uri = format!(
            "/edge/image?url={}/cars/roadster.png&w=40&h=40&f=jpeg&q=70",
            origin.uri()
        );

        let req = test::TestRequest::get().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get("x-edge-cache").unwrap(), "MISS");
        assert_eq!(resp.headers().get("content-type").unwrap(), "image/jpeg");
        let body = test::read_body(resp).await;
        assert_eq!(&body[..2], &[0xFF, 0xD8]);

        let decoded = image::load_from_memory(&body).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (40, 40));

        let req = test::TestRequest::get().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.headers().get("x-edge-cache").unwrap(), "HIT");

        let stats = harness.state.edge.cache.stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));
    }

    #[actix_web::test]
    async fn test_missing_origin_image_is_not_found() {
        let origin = MockServer::start().await;
        let harness = TestHarness::with_config(test_config());
        let app =
            test::init_service(HttpServer::create_app(web::Data::new(harness.state.clone()))).await;

        let uri = format!("/edge/image?url={}/cars/missing.png", origin.uri());
        let req = test::TestRequest::get().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(harness.state.edge.cache.is_empty());
    }

    #[actix_web::test]
    async fn test_origin_failures_are_server_errors() {
        let origin = origin().await;
        let harness = TestHarness::with_config(test_config());
        let app =
            test::init_service(HttpServer::create_app(web::Data::new(harness.state.clone()))).await;

        for (file, code) in [
            ("broken.png", "FETCH_ERROR"),
            ("not-an-image.png", "TRANSFORM_ERROR"),
        ] {
            let uri = format!("/edge/image?url={}/cars/{}", origin.uri(), file);
            let req = test::TestRequest::get().uri(&uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR, "{}", file);

            let body: serde_json::Value = test::read_body_json(resp).await;
            assert_eq!(body["error"]["code"], code);
        }

        // Neither failure was cached, and both were recorded as errors
        assert!(harness.state.edge.cache.is_empty());
        assert_eq!(harness.monitoring().routes().totals(), (2, 2));
    }

    #[actix_web::test]
    async fn test_rate_limited_client_gets_429() {
        let origin = MockServer::start().await;
        let mut config = test_config();
        config.app.edge.rate_limit.max_requests = 2;
        let harness = TestHarness::with_config(config);
        let app =
            test::init_service(HttpServer::create_app(web::Data::new(harness.state.clone()))).await;

        let uri = format!("/edge/image?url={}/cars/missing.png", origin.uri());
        let statuses: Vec<StatusCode> = {
            let mut statuses = Vec::new();
            for _ in 0..3 {
                let req = test::TestRequest::get()
                    .uri(&uri)
                    .insert_header(("User-Agent", "dealer-crawler/1.0"))
                    .to_request();
                statuses.push(test::call_service(&app, req).await.status());
            }
            statuses
        };
        assert_eq!(
            statuses,
            vec![
                StatusCode::NOT_FOUND,
                StatusCode::NOT_FOUND,
                StatusCode::TOO_MANY_REQUESTS
            ]
        );

        // Another client is unaffected
        let req = test::TestRequest::get()
            .uri(&uri)
            .insert_header(("User-Agent", "Mozilla/5.0"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        // The window slides
        harness.clock.advance(Duration::from_secs(61));
        let req = test::TestRequest::get()
            .uri(&uri)
            .insert_header(("User-Agent", "dealer-crawler/1.0"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    // ==================== Cache ====================

    #[tokio::test]
    async fn test_cache_ttl_expiry_recomputes() {
        let clock = Arc::new(MockClock::new());
        let cache: EdgeCache<String> = EdgeCache::new(clock.clone());
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let ttl = Duration::from_secs(1);

        let compute = move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, MonitorError>("inventory page".to_string())
        };

        cache.get_or_compute("k", ttl, compute).await.unwrap();
        clock.advance(Duration::from_millis(500));
        cache.get_or_compute("k", ttl, compute).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        clock.advance(Duration::from_millis(600));
        cache.get_or_compute("k", ttl, compute).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cache_sweep_removes_expired() {
        let clock = Arc::new(MockClock::new());
        let cache: EdgeCache<u32> = EdgeCache::new(clock.clone());

        cache.insert("short", 1, Duration::from_secs(10));
        cache.insert("long", 2, Duration::from_secs(600));
        clock.advance(Duration::from_secs(60));

        assert_eq!(cache.sweep_expired(), 1);
        assert_eq!(cache.get("long"), Some(2));
        assert_eq!(cache.get("short"), None);
    }

    // ==================== Rate Limiter ====================

    #[tokio::test]
    async fn test_rate_limiter_blocks_at_limit() {
        let clock = Arc::new(MockClock::new());
        let limiter = EdgeRateLimiter::new(
            EdgeRateLimitConfig {
                enabled: true,
                max_requests: 100,
                window_secs: 60,
            },
            clock.clone(),
        );
        let client = fingerprint::client("203.0.113.9", "Mozilla/5.0");

        for _ in 0..100 {
            assert!(!limiter.rate_limited(&client).await.unwrap());
        }
        assert!(limiter.rate_limited(&client).await.unwrap());

        clock.advance(Duration::from_secs(61));
        assert!(!limiter.rate_limited(&client).await.unwrap());
    }

    #[tokio::test]
    async fn test_fingerprints_are_stable_hex() {
        let a = fingerprint::client("203.0.113.9", "Mozilla/5.0");
        let b = fingerprint::client("203.0.113.9", "Mozilla/5.0");
        let c = fingerprint::client("203.0.113.10", "Mozilla/5.0");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|ch| ch.is_ascii_hexdigit()));
    }
}
