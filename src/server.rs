//! HTTP endpoint exposing the crawler as a single request/response call.

use crate::config::CrawlerConfig;
use crate::crawlers::SiteCrawler;
use crate::error::CrawlError;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Body of a crawl request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    pub url: Option<String>,
}

/// Body of a successful crawl
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractResponse {
    pub text: String,
}

/// Body of a failed crawl
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for CrawlError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            CrawlError::MissingUrl => (StatusCode::BAD_REQUEST, "URL is required", None),
            CrawlError::InvalidUrl { .. } | CrawlError::MissingHost { .. } => {
                (StatusCode::BAD_REQUEST, "Invalid URL", Some(self.to_string()))
            }
            CrawlError::Session(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to extract content",
                Some(self.to_string()),
            ),
        };
        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };
        (status, Json(body)).into_response()
    }
}

/// Build the router. Every request gets its own browser session.
pub fn router(config: CrawlerConfig) -> Router {
    let crawler = Arc::new(SiteCrawler::new(config));
    Router::new()
        .route("/api/extract-url", post(extract_url))
        .layer(CorsLayer::permissive())
        .with_state(crawler)
}

async fn extract_url(
    State(crawler): State<Arc<SiteCrawler>>,
    payload: Result<Json<ExtractRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(rejection),
    };

    let Some(url) = request.url.filter(|u| !u.trim().is_empty()) else {
        return CrawlError::MissingUrl.into_response();
    };

    match crawler.crawl(&url).await {
        Ok(outcome) => Json(ExtractResponse { text: outcome.text }).into_response(),
        Err(e) => {
            if !e.is_client_error() {
                ::log::error!("Scraping failed for {}: {}", url, e);
            }
            e.into_response()
        }
    }
}

/// A body that is absent or not JSON carries no URL; one that is JSON but
/// of the wrong shape carries an unusable one
fn rejection_response(rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => "Invalid URL",
        _ => "URL is required",
    };
    let body = ErrorResponse {
        error: error.to_string(),
        details: Some(rejection.body_text()),
    };
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

/// Serve the endpoint until the process is stopped
pub async fn serve(bind: &str, config: CrawlerConfig) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    ::log::info!("Backend server running at http://{}", listener.local_addr()?);
    ::log::info!("Endpoint: POST /api/extract-url");
    ::log::info!(
        "Will crawl up to {} pages per website",
        config.limits.max_pages
    );
    axum::serve(listener, router(config)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn crawler() -> State<Arc<SiteCrawler>> {
        State(Arc::new(SiteCrawler::new(CrawlerConfig::default())))
    }

    #[tokio::test]
    async fn test_missing_url_is_bad_request() {
        let response = extract_url(crawler(), Ok(Json(ExtractRequest::default()))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "URL is required");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_unparseable_url_is_bad_request() {
        let request = ExtractRequest {
            url: Some("not a url".to_string()),
        };
        let response = extract_url(crawler(), Ok(Json(request))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid URL");
        assert!(body["details"].as_str().unwrap().contains("not a url"));
    }

    #[tokio::test]
    async fn test_session_failure_is_server_error() {
        let err = CrawlError::Session(crate::error::DriverError::Connect(
            "connection refused".to_string(),
        ));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Failed to extract content");
        assert!(body["details"]
            .as_str()
            .unwrap()
            .contains("connection refused"));
    }

    async fn post_extract(body: Body, content_type: Option<&str>) -> Response {
        let mut request = Request::builder().method("POST").uri("/api/extract-url");
        if let Some(content_type) = content_type {
            request = request.header("content-type", content_type);
        }
        router(CrawlerConfig::default())
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_route_without_body_answers_with_error_object() {
        let response = post_extract(Body::empty(), None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "URL is required");
        assert!(body["details"].is_string());
    }

    #[tokio::test]
    async fn test_route_with_non_string_url_answers_with_error_object() {
        let response = post_extract(Body::from(r#"{"url":123}"#), Some("application/json")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid URL");
        assert!(body["details"].as_str().unwrap().contains("url"));
    }

    #[tokio::test]
    async fn test_route_with_malformed_json_answers_with_error_object() {
        let response = post_extract(Body::from("{not json"), Some("application/json")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Invalid URL");
    }

    #[tokio::test]
    async fn test_route_with_empty_object_requires_url() {
        let response = post_extract(Body::from("{}"), Some("application/json")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "URL is required");
        assert!(body.get("details").is_none());
    }
}
