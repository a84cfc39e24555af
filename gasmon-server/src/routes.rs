//! HTTP endpoints for the gasmon service
//!
//! Three routes compose the fetch, shaping, and rendering stages into
//! responses: two PNG charts and one JSON summary.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use gasmon_charts::{
    daily_mean, render_daily_mean_line, render_histogram_bars, ChartDimensions, ValueHistogram,
};
use gasmon_common::{GasmonError, ReadingTable};

use crate::fetch::FeedSource;

/// Fixed body returned when the upstream feed yields nothing
pub const FETCH_ERROR_BODY: &str = "Error fetching data";

/// Shared application state for the endpoint layer
#[derive(Clone)]
pub struct AppState {
    /// Upstream feed source
    pub feed_source: Arc<dyn FeedSource>,
    /// Canvas size for rendered charts
    pub chart_dimensions: ChartDimensions,
}

/// Summary statistic response body
#[derive(Debug, Serialize)]
pub struct MaxValueResponse {
    /// Largest value across all readings
    pub max_value: i64,
    /// Number of readings fetched
    pub total_values: usize,
}

/// Error wrapper mapping failures onto HTTP responses
///
/// Fetch failures and an empty upstream feed share one fixed 500 body;
/// everything else surfaces as an unstructured 500.
struct ApiError(GasmonError);

impl From<GasmonError> for ApiError {
    fn from(err: GasmonError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self.0 {
            GasmonError::Fetch { .. } => {
                error!("Error fetching data: {}", self.0);
                (StatusCode::INTERNAL_SERVER_ERROR, FETCH_ERROR_BODY).into_response()
            }
            err => {
                error!("Request failed: {}", err);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// Create the API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/graph1", get(get_graph1))
        .route("/api/graph2", get(get_graph2))
        .route("/api/max_value", get(get_max_value))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Fetch the feed and build the reading table for one request.
///
/// Zero feed entries degrade the same way a failed fetch does.
async fn load_table(state: &AppState) -> Result<ReadingTable, ApiError> {
    let feeds = state.feed_source.fetch_feeds().await?;
    if feeds.is_empty() {
        return Err(GasmonError::fetch("Upstream returned no feed entries").into());
    }
    Ok(ReadingTable::from_feeds(&feeds)?)
}

/// Daily mean line chart
async fn get_graph1(State(state): State<AppState>) -> Result<Response, ApiError> {
    let table = load_table(&state).await?;
    let series = daily_mean(&table);
    let png = render_daily_mean_line(&series, state.chart_dimensions)?;
    Ok(png_response(png))
}

/// Value histogram bar chart
async fn get_graph2(State(state): State<AppState>) -> Result<Response, ApiError> {
    let table = load_table(&state).await?;
    let histogram = ValueHistogram::from_table(&table);
    let png = render_histogram_bars(&histogram, state.chart_dimensions)?;
    Ok(png_response(png))
}

/// Summary statistic over the fetched readings
async fn get_max_value(State(state): State<AppState>) -> Result<Json<MaxValueResponse>, ApiError> {
    let table = load_table(&state).await?;
    let max_value = table
        .max_value()
        .ok_or_else(|| GasmonError::fetch("Upstream returned no feed entries"))?;

    Ok(Json(MaxValueResponse {
        max_value,
        total_values: table.len(),
    }))
}

/// Assemble an image response; charts must never be cached
fn png_response(bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        bytes,
    )
        .into_response()
}

/// Start the API server
pub async fn start_server(state: AppState, bind_address: &str) -> anyhow::Result<()> {
    info!("Starting gasmon API server on {}", bind_address);

    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(bind_address).await?;

    info!("gasmon API server listening on {}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {:?}", e);
        return;
    }
    info!("Received shutdown signal, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use gasmon_common::Feed;
    use tower::ServiceExt;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

    struct StubSource(Vec<Feed>);

    #[async_trait]
    impl FeedSource for StubSource {
        async fn fetch_feeds(&self) -> gasmon_common::Result<Vec<Feed>> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl FeedSource for FailingSource {
        async fn fetch_feeds(&self) -> gasmon_common::Result<Vec<Feed>> {
            Err(GasmonError::fetch("upstream unreachable"))
        }
    }

    fn feed(created_at: &str, field1: &str) -> Feed {
        Feed {
            created_at: created_at.to_string(),
            field1: Some(field1.to_string()),
            entry_id: None,
        }
    }

    fn reference_feeds() -> Vec<Feed> {
        vec![
            feed("2024-01-01T00:00:00Z", "100"),
            feed("2024-01-01T12:00:00Z", "200"),
            feed("2024-01-02T00:00:00Z", "50"),
        ]
    }

    fn router_with(source: impl FeedSource + 'static) -> Router {
        create_router(AppState {
            feed_source: Arc::new(source),
            chart_dimensions: ChartDimensions::default(),
        })
    }

    async fn send(router: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, body.to_vec())
    }

    #[tokio::test]
    async fn test_graph1_returns_png_with_no_cache() {
        let (status, headers, body) =
            send(router_with(StubSource(reference_feeds())), "/api/graph1").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE.as_str()], "image/png");
        assert_eq!(headers[header::CACHE_CONTROL.as_str()], "no-cache");
        assert_eq!(&body[..PNG_SIGNATURE.len()], &PNG_SIGNATURE);
    }

    #[tokio::test]
    async fn test_graph2_returns_png_with_no_cache() {
        let (status, headers, body) =
            send(router_with(StubSource(reference_feeds())), "/api/graph2").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE.as_str()], "image/png");
        assert_eq!(headers[header::CACHE_CONTROL.as_str()], "no-cache");
        assert_eq!(&body[..PNG_SIGNATURE.len()], &PNG_SIGNATURE);
    }

    #[tokio::test]
    async fn test_max_value_reference_scenario() {
        let (status, headers, body) =
            send(router_with(StubSource(reference_feeds())), "/api/max_value").await;

        assert_eq!(status, StatusCode::OK);
        assert!(headers[header::CONTENT_TYPE.as_str()]
            .to_str()
            .unwrap()
            .starts_with("application/json"));

        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed["max_value"], 200);
        assert_eq!(parsed["total_values"], 3);
    }

    #[tokio::test]
    async fn test_empty_feed_yields_fixed_error_on_all_endpoints() {
        for uri in ["/api/graph1", "/api/graph2", "/api/max_value"] {
            let (status, _, body) = send(router_with(StubSource(Vec::new())), uri).await;

            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{}", uri);
            assert_eq!(body, FETCH_ERROR_BODY.as_bytes(), "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_fetch_failure_yields_fixed_error_on_all_endpoints() {
        for uri in ["/api/graph1", "/api/graph2", "/api/max_value"] {
            let (status, _, body) = send(router_with(FailingSource), uri).await;

            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{}", uri);
            assert_eq!(body, FETCH_ERROR_BODY.as_bytes(), "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_malformed_value_yields_generic_500() {
        let feeds = vec![
            feed("2024-01-01T00:00:00Z", "100"),
            feed("2024-01-01T12:00:00Z", "not-a-number"),
        ];

        let (status, _, body) = send(router_with(StubSource(feeds)), "/api/max_value").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        // Distinct from the fixed fetch-failure message
        assert_ne!(body, FETCH_ERROR_BODY.as_bytes());
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (status, _, _) = send(router_with(StubSource(reference_feeds())), "/api/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
