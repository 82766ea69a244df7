use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use leadscout_core::{BusinessView, DiscoveryQuery, DiscoveryResult};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{json_body, required, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct SearchRequest {
    city: Option<String>,
    state: Option<String>,
    radius: Option<f64>,
    category: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct SearchResponse {
    success: bool,
    total_found: usize,
    without_websites: usize,
    businesses: Vec<BusinessView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    fallback: bool,
}

impl From<DiscoveryResult> for SearchResponse {
    fn from(result: DiscoveryResult) -> Self {
        Self {
            success: true,
            total_found: result.total_found(),
            without_websites: result.without_websites(),
            businesses: result.records().iter().map(BusinessView::from).collect(),
            message: result.message().map(ToOwned::to_owned),
            source: result.source().map(ToOwned::to_owned),
            fallback: result.fallback(),
        }
    }
}

pub(super) async fn search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let request = json_body(&req_id.0, body)?;

    let (Some(city), Some(region)) = (
        required(request.city.as_deref()),
        required(request.state.as_deref()),
    ) else {
        return Err(ApiError::bad_request(req_id.0, "City and state are required"));
    };

    let query = DiscoveryQuery::new(city, region, request.radius, request.category.as_deref());
    tracing::info!(
        request_id = %req_id.0,
        location = %query.location,
        category = %query.category,
        radius_miles = query.radius_miles,
        "search requested"
    );

    let pipeline = state.pipeline.clone();
    let result = tokio::spawn(async move { pipeline.run(&query).await })
        .await
        .map_err(|e| {
            tracing::error!(request_id = %req_id.0, error = %e, "discovery task failed");
            ApiError::internal(req_id.0.clone(), e.to_string())
        })?;

    Ok(Json(SearchResponse::from(result)))
}
