//! Chat session DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::common::FileReportDto;
use crate::models::{ConversationState, Role, Turn};

/// Request body for `POST /v1/chat/sessions/{sessionId}/messages`.
#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    /// The user's message (1-8000 characters).
    #[validate(length(min = 1, max = 8000))]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    pub session_id: String,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatReplyResponse {
    pub session_id: String,
    pub reply: String,
    /// Turns recorded in the session after this exchange.
    pub turns: usize,
}

/// Response for a file dropped into a chat session.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatFileResponse {
    pub session_id: String,
    pub file: FileReportDto,
    /// Assistant's summary. Absent when the file yielded no text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TurnDto {
    pub role: Role,
    pub text: String,
    #[schema(value_type = String)]
    pub at: DateTime<Utc>,
}

impl From<&Turn> for TurnDto {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role,
            text: turn.text.clone(),
            at: turn.at,
        }
    }
}

/// Response for `GET /v1/chat/sessions/{sessionId}`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: String,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String)]
    pub last_active: DateTime<Utc>,
    pub turns: Vec<TurnDto>,
}

impl From<&ConversationState> for SessionResponse {
    fn from(state: &ConversationState) -> Self {
        Self {
            session_id: state.session_id.clone(),
            created_at: state.created_at,
            last_active: state.last_active,
            turns: state.turns().iter().map(TurnDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSessionResponse {
    pub session_id: String,
    pub deleted: bool,
}
