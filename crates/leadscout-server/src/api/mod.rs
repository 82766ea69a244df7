mod discovery;
mod export;
mod validate;

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use leadscout_pipeline::{CsvExporter, DiscoveryPipeline};
use leadscout_sources::ReachabilityProbe;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<DiscoveryPipeline>,
    pub exporter: CsvExporter,
    pub probe: ReachabilityProbe,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    sources: Vec<&'static str>,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }

    pub fn bad_request(request_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(request_id, "bad_request", message)
    }

    pub fn not_found(request_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(request_id, "not_found", message)
    }

    pub fn internal(request_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(request_id, "internal_error", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Unwraps a JSON body, turning axum's rejection into our error shape.
pub(super) fn json_body<T>(
    request_id: &str,
    body: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiError> {
    body.map(|Json(value)| value).map_err(|rejection| {
        tracing::debug!(error = %rejection, "rejected request body");
        ApiError::bad_request(request_id, rejection.body_text())
    })
}

/// Returns the trimmed value, or `None` when missing or blank.
pub(super) fn required(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([
            header::CONTENT_DISPOSITION,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/search", post(discovery::search))
        .route("/api/v1/search", post(discovery::search))
        .route("/export", post(export::export_csv))
        .route("/api/v1/export", post(export::export_csv))
        .route("/api/v1/validate", post(validate::validate_website))
        .fallback(route_not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthData {
        status: "ok",
        sources: state.pipeline.source_names(),
    })
}

async fn route_not_found(Extension(req_id): Extension<RequestId>) -> ApiError {
    ApiError::not_found(req_id.0, "no such route")
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, Response};
    use leadscout_pipeline::{CsvExporter, DiscoveryPipeline};
    use leadscout_sources::{ReachabilityProbe, Source};

    use super::{build_app, AppState};

    pub fn state_with(sources: Vec<Arc<dyn Source>>, export_dir: &std::path::Path) -> AppState {
        AppState {
            pipeline: Arc::new(DiscoveryPipeline::new(sources)),
            exporter: CsvExporter::new(export_dir),
            probe: ReachabilityProbe::new(1, "leadscout-test/0.1").expect("probe"),
        }
    }

    pub fn json_post(uri: &str, body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    pub async fn send(state: AppState, request: Request<Body>) -> Response<Body> {
        use tower::ServiceExt;
        build_app(state).oneshot(request).await.expect("response")
    }

    pub async fn body_json(response: Response<Body>) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&body).expect("json parse")
    }
}
