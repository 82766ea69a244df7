use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{json_body, required, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct ValidateRequest {
    url: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ValidateResponse {
    url: String,
    reachable: bool,
}

pub(super) async fn validate_website(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<ValidateRequest>, JsonRejection>,
) -> Result<Json<ValidateResponse>, ApiError> {
    let request = json_body(&req_id.0, body)?;
    let Some(url) = required(request.url.as_deref()) else {
        return Err(ApiError::bad_request(req_id.0, "url is required"));
    };

    let reachable = state.probe.validate_reachable(url).await;
    tracing::debug!(request_id = %req_id.0, url, reachable, "website validated");

    Ok(Json(ValidateResponse {
        url: url.to_owned(),
        reachable,
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::super::test_support::{body_json, json_post, send, state_with};

    #[tokio::test]
    async fn live_site_is_reachable() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().expect("tempdir");

        let response = send(
            state_with(Vec::new(), dir.path()),
            json_post("/api/v1/validate", &json!({"url": server.uri()})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["url"], server.uri());
        assert_eq!(json["reachable"], true);
    }

    #[tokio::test]
    async fn dead_site_is_unreachable_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().expect("tempdir");

        let response = send(
            state_with(Vec::new(), dir.path()),
            json_post("/api/v1/validate", &json!({"url": server.uri()})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["reachable"], false);
    }

    #[tokio::test]
    async fn missing_url_is_bad_request() {
        let dir = tempfile::tempdir().expect("tempdir");
        let response = send(
            state_with(Vec::new(), dir.path()),
            json_post("/api/v1/validate", &json!({})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
