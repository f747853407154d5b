use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

mod api;
pub mod prompts;
mod provider;

pub use api::LlmApiClient;
pub use provider::{LlmBackend, LlmProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Hosted text generation. One call, one response, no retries.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn is_available(&self) -> bool;

    async fn generate(&self, messages: &[ChatMessage]) -> Result<String>;
}
