use axum::extract::State;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::v1::response::ApiResponse;

/// Health data returned inside the v1 envelope.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub llm: BackendStatus,
    pub transcription: BackendStatus,
    pub sessions: usize,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct BackendStatus {
    /// `"available"` or `"unavailable"`.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl BackendStatus {
    fn new(available: bool, model: Option<String>) -> Self {
        Self {
            status: if available { "available" } else { "unavailable" }.to_string(),
            model,
        }
    }
}

/// `GET /api/v1/health`
///
/// The service itself is always `ok`; backend availability is reported
/// separately so uploads can still be analyzed without an LLM.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health status", body = HealthData),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> ApiResponse<HealthData> {
    let llm = BackendStatus::new(
        state.generator.is_available(),
        state.config.llm.as_ref().map(|c| c.model.clone()),
    );
    let transcription = BackendStatus::new(
        state.transcriber.is_available(),
        Some(state.config.transcription.model.clone()),
    );

    ApiResponse::success(HealthData {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        llm,
        transcription,
        sessions: state.sessions.len().await,
    })
}
