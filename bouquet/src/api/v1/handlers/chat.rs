//! v1 chat session handlers.
//!
//! Sessions live in the in-memory [`SessionStore`](crate::services::SessionStore).
//! Each handler takes a snapshot of the session, runs the chat call on it and
//! writes it back, so two concurrent messages to one session are
//! last-writer-wins. A session deleted or evicted mid-call is not recreated;
//! the caller gets `not_found`.

use axum::extract::{Multipart, Path, State};
use validator::Validate;

use crate::api::extractors::{read_upload_form, AppJson};
use crate::api::v1::dto::{
    ChatFileResponse, ChatReplyResponse, CreateSessionResponse, DeleteSessionResponse,
    FileReportDto, SendMessageRequest, SessionResponse,
};
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode};
use crate::api::AppState;
use crate::error::BouquetError;
use crate::models::ConversationState;

fn session_not_found<T: serde::Serialize>(session_id: &str) -> ApiResponse<T> {
    ApiResponse::error(
        ErrorCode::NotFound,
        format!("Chat session {session_id} not found"),
    )
}

async fn load_session(state: &AppState, session_id: &str) -> Option<ConversationState> {
    state.sessions.get(session_id).await
}

/// `POST /api/v1/chat/sessions`
#[utoipa::path(
    post,
    path = "/api/v1/chat/sessions",
    tag = "chat",
    operation_id = "chat.createSession",
    responses(
        (status = 201, description = "Session created", body = CreateSessionResponse),
    )
)]
pub async fn create_session(State(state): State<AppState>) -> ApiResponse<CreateSessionResponse> {
    let session = state.sessions.create().await;
    tracing::info!(session_id = %session.session_id, "Chat session created");

    ApiResponse::created(CreateSessionResponse {
        session_id: session.session_id,
        created_at: session.created_at,
    })
}

/// `POST /api/v1/chat/sessions/{sessionId}/messages`
#[utoipa::path(
    post,
    path = "/api/v1/chat/sessions/{sessionId}/messages",
    tag = "chat",
    operation_id = "chat.sendMessage",
    params(("sessionId" = String, Path, description = "Chat session ID")),
    request_body = SendMessageRequest,
    responses(
        (status = 200, description = "Assistant reply", body = ChatReplyResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 404, description = "Session not found", body = ApiError),
        (status = 502, description = "Model provider failed", body = ApiError),
        (status = 503, description = "No LLM configured", body = ApiError),
    )
)]
pub async fn send_message(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    AppJson(request): AppJson<SendMessageRequest>,
) -> ApiResponse<ChatReplyResponse> {
    if let Err(e) = request.validate() {
        return BouquetError::Validation(e.to_string()).into();
    }

    let Some(mut session) = load_session(&state, &session_id).await else {
        return session_not_found(&session_id);
    };

    match state.chat.reply(&mut session, &request.message).await {
        Ok(reply) => {
            let turns = session.len();
            if !state.sessions.replace(session).await {
                return session_not_found(&session_id);
            }
            ApiResponse::success(ChatReplyResponse {
                session_id,
                reply,
                turns,
            })
        }
        Err(e) => e.into(),
    }
}

/// `POST /api/v1/chat/sessions/{sessionId}/files`
///
/// Accepts one `file` part, extracts it and asks the assistant to summarize
/// it inside the conversation.
#[utoipa::path(
    post,
    path = "/api/v1/chat/sessions/{sessionId}/files",
    tag = "chat",
    operation_id = "chat.analyzeFile",
    params(("sessionId" = String, Path, description = "Chat session ID")),
    request_body(content_type = "multipart/form-data", content = String, description = "A single `file` part"),
    responses(
        (status = 200, description = "File report and assistant summary", body = ChatFileResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 413, description = "Request body too large", body = ApiError),
        (status = 404, description = "Session not found", body = ApiError),
    )
)]
pub async fn analyze_file(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    mut multipart: Multipart,
) -> ApiResponse<ChatFileResponse> {
    let Some(mut session) = load_session(&state, &session_id).await else {
        return session_not_found(&session_id);
    };

    let form = match read_upload_form(&mut multipart, &state.config.intake).await {
        Ok(form) => form,
        Err(e) => return e.into(),
    };

    let mut artifacts = form.into_artifacts();
    if artifacts.len() != 1 {
        return ApiResponse::error(
            ErrorCode::InvalidRequest,
            "Exactly one 'file' part is required",
        );
    }
    let artifact = artifacts.remove(0);

    match state.chat.analyze_file(&mut session, artifact).await {
        Ok(analysis) => {
            if analysis.reply.is_some() && !state.sessions.replace(session).await {
                return session_not_found(&session_id);
            }
            ApiResponse::success(ChatFileResponse {
                session_id,
                file: FileReportDto::from_report(
                    &analysis.report,
                    state.config.intake.preview_chars,
                ),
                reply: analysis.reply,
            })
        }
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/chat/sessions/{sessionId}`
#[utoipa::path(
    get,
    path = "/api/v1/chat/sessions/{sessionId}",
    tag = "chat",
    operation_id = "chat.getSession",
    params(("sessionId" = String, Path, description = "Chat session ID")),
    responses(
        (status = 200, description = "Session history", body = SessionResponse),
        (status = 404, description = "Session not found", body = ApiError),
    )
)]
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResponse<SessionResponse> {
    match load_session(&state, &session_id).await {
        Some(session) => ApiResponse::success(SessionResponse::from(&session)),
        None => session_not_found(&session_id),
    }
}

/// `DELETE /api/v1/chat/sessions/{sessionId}`
#[utoipa::path(
    delete,
    path = "/api/v1/chat/sessions/{sessionId}",
    tag = "chat",
    operation_id = "chat.deleteSession",
    params(("sessionId" = String, Path, description = "Chat session ID")),
    responses(
        (status = 200, description = "Session discarded", body = DeleteSessionResponse),
        (status = 404, description = "Session not found", body = ApiError),
    )
)]
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResponse<DeleteSessionResponse> {
    if state.sessions.discard(&session_id).await {
        tracing::info!(session_id = %session_id, "Chat session discarded");
        ApiResponse::success(DeleteSessionResponse {
            session_id,
            deleted: true,
        })
    } else {
        session_not_found(&session_id)
    }
}
