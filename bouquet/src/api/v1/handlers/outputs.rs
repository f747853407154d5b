use axum::extract::{Path, State};

use crate::api::v1::dto::{DeleteOutputResponse, OutputResponse};
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode};
use crate::api::AppState;

/// `GET /api/v1/outputs/{outputId}`
#[utoipa::path(
    get,
    path = "/api/v1/outputs/{outputId}",
    tag = "outputs",
    operation_id = "outputs.get",
    params(("outputId" = String, Path, description = "Output ID returned by timeline generation")),
    responses(
        (status = 200, description = "Saved output", body = OutputResponse),
        (status = 404, description = "Output not found", body = ApiError),
    )
)]
pub async fn get_output(
    State(state): State<AppState>,
    Path(output_id): Path<String>,
) -> ApiResponse<OutputResponse> {
    match state.pipeline.outputs().fetch(&output_id).await {
        Ok(Some(output)) => ApiResponse::success(output.into()),
        Ok(None) => ApiResponse::error(
            ErrorCode::NotFound,
            format!("Output {output_id} not found"),
        ),
        Err(e) => e.into(),
    }
}

/// `DELETE /api/v1/outputs/{outputId}`
#[utoipa::path(
    delete,
    path = "/api/v1/outputs/{outputId}",
    tag = "outputs",
    operation_id = "outputs.delete",
    params(("outputId" = String, Path, description = "Output ID")),
    responses(
        (status = 200, description = "Output deleted", body = DeleteOutputResponse),
        (status = 404, description = "Output not found", body = ApiError),
    )
)]
pub async fn delete_output(
    State(state): State<AppState>,
    Path(output_id): Path<String>,
) -> ApiResponse<DeleteOutputResponse> {
    match state.pipeline.outputs().delete(&output_id).await {
        Ok(true) => ApiResponse::success(DeleteOutputResponse {
            output_id,
            deleted: true,
        }),
        Ok(false) => ApiResponse::error(
            ErrorCode::NotFound,
            format!("Output {output_id} not found"),
        ),
        Err(e) => e.into(),
    }
}
