//! Status-code handling shared by the IMDb and Trakt clients.

use crate::error::SourceError;
use reqwest::{Response, StatusCode};

/// Seconds to wait when a 429 carries no usable `Retry-After`
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Map a response onto [`SourceError`] by status, passing successes through.
///
/// `what` names the requested resource and ends up in the error message.
pub async fn check_response(response: Response, what: &str) -> Result<Response, SourceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::NOT_FOUND => Err(SourceError::NotFound(what.to_string())),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Err(SourceError::Unauthorized(format!("{} ({})", what, status)))
        }
        StatusCode::TOO_MANY_REQUESTS => Err(SourceError::RateLimited {
            retry_after_secs: parse_retry_after(&response),
        }),
        _ => {
            let message = response.text().await.unwrap_or_default();
            Err(SourceError::Api {
                status: status.as_u16(),
                message: format!("{}: {}", what, message),
            })
        }
    }
}

fn parse_retry_after(response: &Response) -> u64 {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16) -> Response {
        Response::from(::http::Response::builder().status(status).body("boom").unwrap())
    }

    fn response_with_retry_after(value: &str) -> Response {
        Response::from(
            ::http::Response::builder()
                .status(429)
                .header("Retry-After", value)
                .body("")
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        assert!(check_response(response(200), "list").await.is_ok());
        assert!(check_response(response(204), "list").await.is_ok());
    }

    #[tokio::test]
    async fn test_not_found_is_distinguished() {
        let err = check_response(response(404), "list ls001").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_auth_failures_map_to_unauthorized() {
        let err = check_response(response(401), "ratings").await.unwrap_err();
        assert!(matches!(err, SourceError::Unauthorized(_)));
        let err = check_response(response(403), "ratings").await.unwrap_err();
        assert!(matches!(err, SourceError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_other_status_keeps_body() {
        match check_response(response(500), "watchlist").await.unwrap_err() {
            SourceError::Api { status, message } => {
                assert_eq!(status, 500);
                assert!(message.contains("boom"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rate_limit_reads_retry_after() {
        match check_response(response_with_retry_after("7"), "history").await.unwrap_err() {
            SourceError::RateLimited { retry_after_secs } => assert_eq!(retry_after_secs, 7),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_retry_after_falls_back_when_unparseable() {
        assert_eq!(parse_retry_after(&response_with_retry_after("soon")), 60);
        assert_eq!(parse_retry_after(&response(429)), 60);
    }
}
