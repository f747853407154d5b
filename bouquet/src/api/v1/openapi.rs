use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use super::response;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bouquet API",
        version = "1.0.0",
        description = "Wedding planner assistant. Upload intake documents and meeting recordings, generate day-of timelines, and chat with the planner.",
    ),
    paths(
        handlers::health::health_check,
        handlers::planning::analyze_uploads,
        handlers::planning::generate_timeline,
        handlers::outputs::get_output,
        handlers::outputs::delete_output,
        handlers::chat::create_session,
        handlers::chat::send_message,
        handlers::chat::analyze_file,
        handlers::chat::get_session,
        handlers::chat::delete_session,
    ),
    components(schemas(
        // Response envelope
        response::ErrorCode,
        response::ApiError,
        // Files
        models::ErrorKind,
        dto::common::ArtifactClass,
        dto::common::FileErrorDto,
        dto::common::FileReportDto,
        // Planning
        dto::planning::AnalyzeUploadsResponse,
        dto::planning::GenerateTimelineResponse,
        dto::planning::OutputResponse,
        dto::planning::DeleteOutputResponse,
        // Chat
        models::Role,
        dto::chat::SendMessageRequest,
        dto::chat::CreateSessionResponse,
        dto::chat::ChatReplyResponse,
        dto::chat::ChatFileResponse,
        dto::chat::TurnDto,
        dto::chat::SessionResponse,
        dto::chat::DeleteSessionResponse,
        // Health (handler-local types)
        handlers::health::HealthData,
        handlers::health::BackendStatus,
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "uploads", description = "File extraction and context preview"),
        (name = "timelines", description = "Day-of timeline generation"),
        (name = "outputs", description = "Saved generated outputs"),
        (name = "chat", description = "Planner chat sessions"),
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            utoipa::openapi::security::SecurityScheme::Http(utoipa::openapi::security::Http::new(
                utoipa::openapi::security::HttpAuthScheme::Bearer,
            )),
        );
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
