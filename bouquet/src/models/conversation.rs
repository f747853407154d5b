use chrono::{DateTime, Utc};
use nanoid::nanoid;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
    pub at: DateTime<Utc>,
}

/// Turn history for one chat session.
///
/// Turns are only ever appended; the history is never reordered or
/// deduplicated. The state is owned by the caller and threaded through each
/// chat call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationState {
    pub session_id: String,
    turns: Vec<Turn>,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::with_id(nanoid!())
    }

    pub fn with_id(session_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            turns: Vec::new(),
            created_at: now,
            last_active: now,
        }
    }

    pub fn append(&mut self, role: Role, text: impl Into<String>) {
        let now = Utc::now();
        self.turns.push(Turn {
            role,
            text: text.into(),
            at: now,
        });
        self.last_active = now;
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// True until the session has recorded its first exchange.
    pub fn is_first_turn(&self) -> bool {
        self.turns.is_empty()
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}
