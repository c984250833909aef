//! Error handling integration tests
//!
//! Tests that errors map to the expected HTTP statuses and JSON bodies.

#[cfg(test)]
mod tests {
    use actix_web::ResponseError;
    use actix_web::body::to_bytes;
    use storefront_monitor::utils::error::{ErrorResponse, MonitorError};

    async fn body_of(err: &MonitorError) -> ErrorResponse {
        let bytes = to_bytes(err.error_response().into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (MonitorError::not_found("missing.png"), 404),
            (MonitorError::bad_request("url required"), 400),
            (MonitorError::validation("w out of range"), 400),
            (MonitorError::rate_limit("slow down"), 429),
            (MonitorError::fetch("origin returned 502"), 500),
            (MonitorError::transform("bad webp"), 500),
            (MonitorError::monitoring("negative duration"), 500),
            (MonitorError::config("bad yaml"), 500),
            (MonitorError::internal("join error"), 500),
        ];

        for (err, status) in cases {
            assert_eq!(err.status_code().as_u16(), status, "{}", err);
            assert_eq!(err.error_response().status().as_u16(), status);
        }
    }

    #[actix_web::test]
    async fn test_error_body_shape() {
        let body = body_of(&MonitorError::rate_limit("100 requests per 60s exceeded")).await;

        assert_eq!(body.error.code, "RATE_LIMIT_EXCEEDED");
        assert!(body.error.message.contains("100 requests per 60s"));
        assert!(body.error.timestamp > 0);
    }

    #[actix_web::test]
    async fn test_io_details_hidden() {
        let err = MonitorError::from(std::io::Error::other("/etc/storefront/secret.yaml"));
        let body = body_of(&err).await;

        assert_eq!(body.error.code, "INTERNAL_ERROR");
        assert!(!body.error.message.contains("secret"));
    }

    #[test]
    fn test_image_error_is_transform() {
        let err: MonitorError = image::load_from_memory(b"not an image").unwrap_err().into();
        assert!(matches!(err, MonitorError::Transform(_)));
    }
}
