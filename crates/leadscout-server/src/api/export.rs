use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    Extension, Json,
};
use leadscout_core::{BusinessView, ClassifiedRecord};
use leadscout_pipeline::ExportError;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{json_body, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct ExportRequest {
    #[serde(default)]
    businesses: Vec<BusinessView>,
}

/// Writes the posted businesses to the export directory and streams the file
/// back as an attachment.
pub(super) async fn export_csv(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let request = json_body(&req_id.0, body)?;

    let records = request
        .businesses
        .into_iter()
        .enumerate()
        .map(|(index, view)| {
            ClassifiedRecord::try_from(view).map_err(|e| {
                ApiError::new(
                    req_id.0.clone(),
                    "validation_error",
                    format!("business {index}: {e}"),
                )
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let exporter = state.exporter.clone();
    let path = tokio::task::spawn_blocking(move || exporter.export(&records))
        .await
        .map_err(|e| ApiError::internal(req_id.0.clone(), e.to_string()))?
        .map_err(|e| map_export_error(&req_id.0, &e))?;

    let contents = tokio::fs::read(&path).await.map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "failed to read back export");
        ApiError::internal(req_id.0.clone(), "failed to read export file")
    })?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("businesses.csv")
        .to_owned();

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        contents,
    )
        .into_response())
}

fn map_export_error(request_id: &str, error: &ExportError) -> ApiError {
    match error {
        ExportError::Empty => ApiError::bad_request(request_id, "No businesses to export"),
        other => {
            tracing::error!(error = %other, "CSV export failed");
            ApiError::internal(request_id, other.to_string())
        }
    }
}
