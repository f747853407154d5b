use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::config::ChatConfig;
use crate::error::{BouquetError, Result};
use crate::llm::{prompts, ChatMessage, TextGenerator};
use crate::models::{ArtifactReport, ConversationState, Role, UploadedArtifact};
use crate::processing::UploadIntake;

const MAX_TTL_SECS: u64 = 10 * 365 * 24 * 3600;

/// Result of dropping a file into a chat session.
#[derive(Debug, Clone)]
pub struct FileAnalysis {
    pub report: ArtifactReport,
    /// `None` when the file produced no text, in which case the session is
    /// left untouched.
    pub reply: Option<String>,
}

/// Conversational planner assistant.
///
/// The service holds no per-session state; callers pass the
/// [`ConversationState`] in and it is updated only after a successful
/// generation.
#[derive(Clone)]
pub struct ChatService {
    intake: UploadIntake,
    generator: Arc<dyn TextGenerator>,
}

impl ChatService {
    pub fn new(intake: UploadIntake, generator: Arc<dyn TextGenerator>) -> Self {
        Self { intake, generator }
    }

    pub fn is_available(&self) -> bool {
        self.generator.is_available()
    }

    pub async fn reply(&self, state: &mut ConversationState, message: &str) -> Result<String> {
        let message = message.trim();
        if message.is_empty() {
            return Err(BouquetError::Validation("Message cannot be empty".to_string()));
        }

        let prompt = if state.is_first_turn() {
            prompts::chat_first_turn_prompt(message)
        } else {
            prompts::chat_follow_up_prompt(message)
        };

        let reply = self.generate_with_history(state, prompt).await?;

        state.append(Role::User, message);
        state.append(Role::Assistant, reply.clone());

        debug!(session_id = %state.session_id, turns = state.len(), "Chat turn recorded");
        Ok(reply)
    }

    /// Extract one uploaded file and have the assistant summarize it.
    pub async fn analyze_file(
        &self,
        state: &mut ConversationState,
        artifact: UploadedArtifact,
    ) -> Result<FileAnalysis> {
        let batch = self.intake.ingest(vec![artifact]).await?;
        let report = batch
            .release()
            .await
            .into_iter()
            .next()
            .ok_or_else(|| BouquetError::Internal("Intake returned no report".to_string()))?;

        let text = match report.result.text() {
            Some(text) if !text.trim().is_empty() => text.to_string(),
            _ => return Ok(FileAnalysis { report, reply: None }),
        };

        let prompt = prompts::file_analysis_prompt(&report.name, &text);
        let reply = self.generate_with_history(state, prompt).await?;

        state.append(Role::User, format!("Shared file: {}", report.name));
        state.append(Role::Assistant, reply.clone());

        Ok(FileAnalysis {
            report,
            reply: Some(reply),
        })
    }

    async fn generate_with_history(
        &self,
        state: &ConversationState,
        prompt: String,
    ) -> Result<String> {
        let mut messages: Vec<ChatMessage> = state
            .turns()
            .iter()
            .map(|turn| match turn.role {
                Role::User => ChatMessage::user(turn.text.clone()),
                Role::Assistant => ChatMessage::assistant(turn.text.clone()),
            })
            .collect();
        messages.push(ChatMessage::user(prompt));

        self.generator.generate(&messages).await
    }
}

/// In-memory chat sessions keyed by session id.
///
/// Concurrent writes to the same session are last-writer-wins. A session that
/// was discarded or evicted while a caller held a copy stays gone. Sessions
/// idle longer than the configured TTL are dropped by
/// [`SessionStore::sweep_expired`].
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, ConversationState>>>,
    ttl: Duration,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(config: &ChatConfig) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl: Duration::seconds(config.session_ttl_secs.min(MAX_TTL_SECS) as i64),
            max_sessions: config.max_sessions.max(1),
        }
    }

    /// Start a fresh session. At capacity, the least recently active session
    /// is evicted first.
    pub async fn create(&self) -> ConversationState {
        let state = ConversationState::new();
        let mut sessions = self.sessions.write().await;

        if sessions.len() >= self.max_sessions {
            let oldest = sessions
                .values()
                .min_by_key(|s| s.last_active)
                .map(|s| s.session_id.clone());
            if let Some(id) = oldest {
                sessions.remove(&id);
                info!(session_id = %id, "Evicted least recently active chat session");
            }
        }

        sessions.insert(state.session_id.clone(), state.clone());
        state
    }

    pub async fn get(&self, id: &str) -> Option<ConversationState> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Write back an updated session. Returns `false`, storing nothing, when
    /// the session no longer exists.
    pub async fn replace(&self, state: ConversationState) -> bool {
        match self.sessions.write().await.get_mut(&state.session_id) {
            Some(slot) => {
                *slot = state;
                true
            }
            None => false,
        }
    }

    pub async fn discard(&self, id: &str) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drop sessions idle for longer than the TTL. Returns how many went.
    pub async fn sweep_expired(&self) -> usize {
        let cutoff = Utc::now() - self.ttl;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.last_active >= cutoff);
        let removed = before - sessions.len();

        if removed > 0 {
            info!(removed, remaining = sessions.len(), "Expired idle chat sessions");
        }
        removed
    }

    /// How often the background sweep should run.
    pub fn sweep_interval_secs(&self) -> u64 {
        let ttl = u64::try_from(self.ttl.num_seconds()).unwrap_or(0);
        (ttl / 4).clamp(1, 300)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tempfile::tempdir;

    use super::*;
    use crate::transcription::Transcriber;

    struct NoTranscriber;

    #[async_trait]
    impl Transcriber for NoTranscriber {
        fn is_available(&self) -> bool {
            false
        }

        async fn transcribe(&self, _audio: &Path) -> Result<String> {
            Err(BouquetError::TranscriptionUnavailable("disabled".into()))
        }
    }

    /// Replies with a fixed string and records every request it sees.
    #[derive(Default)]
    struct ScriptedGenerator {
        calls: Mutex<Vec<Vec<ChatMessage>>>,
        fail: bool,
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        fn is_available(&self) -> bool {
            true
        }

        async fn generate(&self, messages: &[ChatMessage]) -> Result<String> {
            self.calls.lock().unwrap().push(messages.to_vec());
            if self.fail {
                return Err(BouquetError::Generation("upstream 503".into()));
            }
            Ok(format!("reply {}", self.calls.lock().unwrap().len()))
        }
    }

    fn service(root: &Path, generator: Arc<ScriptedGenerator>) -> ChatService {
        ChatService::new(UploadIntake::new(root, Arc::new(NoTranscriber)), generator)
    }

    #[tokio::test]
    async fn test_first_turn_uses_greeting_then_history() {
        let dir = tempdir().unwrap();
        let generator = Arc::new(ScriptedGenerator::default());
        let chat = service(dir.path(), generator.clone());
        let mut state = ConversationState::new();

        assert_eq!(chat.reply(&mut state, "Hi there").await.unwrap(), "reply 1");
        chat.reply(&mut state, "Venue ideas?").await.unwrap();

        let calls = generator.calls.lock().unwrap();
        assert_eq!(calls[0].len(), 1);
        assert!(calls[0][0].content.contains("Greet the user"));

        assert_eq!(calls[1].len(), 3);
        assert_eq!(calls[1][0], ChatMessage::user("Hi there"));
        assert_eq!(calls[1][1], ChatMessage::assistant("reply 1"));
        assert!(calls[1][2].content.contains("Venue ideas"));
        assert!(calls[1][2].content.ends_with("User: Venue ideas?"));

        assert_eq!(state.len(), 4);
    }

    #[tokio::test]
    async fn test_failed_generation_leaves_state_untouched() {
        let dir = tempdir().unwrap();
        let generator = Arc::new(ScriptedGenerator {
            fail: true,
            ..ScriptedGenerator::default()
        });
        let chat = service(dir.path(), generator);
        let mut state = ConversationState::new();

        assert!(chat.reply(&mut state, "hello").await.is_err());
        assert!(state.is_first_turn());
    }

    #[tokio::test]
    async fn test_blank_message_rejected() {
        let dir = tempdir().unwrap();
        let chat = service(dir.path(), Arc::new(ScriptedGenerator::default()));
        let mut state = ConversationState::new();

        let err = chat.reply(&mut state, "   ").await.unwrap_err();
        assert!(matches!(err, BouquetError::Validation(_)));
    }

    #[tokio::test]
    async fn test_analyze_file_appends_summary() {
        let dir = tempdir().unwrap();
        let generator = Arc::new(ScriptedGenerator::default());
        let chat = service(dir.path(), generator.clone());
        let mut state = ConversationState::new();

        let analysis = chat
            .analyze_file(
                &mut state,
                UploadedArtifact::new("vendors.txt", "Florist: Petal & Stem"),
            )
            .await
            .unwrap();

        assert_eq!(analysis.reply.as_deref(), Some("reply 1"));
        assert_eq!(state.turns()[0].text, "Shared file: vendors.txt");
        assert!(generator.calls.lock().unwrap()[0][0]
            .content
            .contains("Petal & Stem"));
    }

    #[tokio::test]
    async fn test_analyze_unsupported_file_skips_model() {
        let dir = tempdir().unwrap();
        let generator = Arc::new(ScriptedGenerator::default());
        let chat = service(dir.path(), generator.clone());
        let mut state = ConversationState::new();

        let analysis = chat
            .analyze_file(&mut state, UploadedArtifact::new("seating.xlsx", vec![1u8]))
            .await
            .unwrap();

        assert!(analysis.reply.is_none());
        assert!(analysis.report.result.failure().is_some());
        assert!(state.is_empty());
        assert!(generator.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_lifecycle() {
        let store = SessionStore::new(&ChatConfig::default());
        let mut state = store.create().await;
        assert!(store.get(&state.session_id).await.unwrap().is_empty());

        state.append(Role::User, "hi");
        assert!(store.replace(state.clone()).await);
        assert_eq!(store.get(&state.session_id).await.unwrap().len(), 1);

        assert!(store.discard(&state.session_id).await);
        assert!(!store.discard(&state.session_id).await);
        assert!(store.get(&state.session_id).await.is_none());
    }

    #[tokio::test]
    async fn test_replace_does_not_resurrect_discarded_session() {
        let store = SessionStore::new(&ChatConfig::default());
        let mut state = store.create().await;
        assert!(store.discard(&state.session_id).await);

        state.append(Role::User, "are you still there?");
        assert!(!store.replace(state.clone()).await);
        assert!(store.get(&state.session_id).await.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_replace_after_eviction_keeps_capacity() {
        let store = SessionStore::new(&ChatConfig {
            session_ttl_secs: 3600,
            max_sessions: 1,
        });
        let mut evicted = store.create().await;
        let survivor = store.create().await;

        evicted.append(Role::User, "late reply");
        assert!(!store.replace(evicted).await);
        assert_eq!(store.len().await, 1);
        assert!(store.get(&survivor.session_id).await.is_some());
    }

    #[tokio::test]
    async fn test_store_evicts_oldest_at_capacity() {
        let store = SessionStore::new(&ChatConfig {
            session_ttl_secs: 3600,
            max_sessions: 2,
        });
        let first = store.create().await;
        let second = store.create().await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let mut touched = first.clone();
        touched.append(Role::User, "still here");
        assert!(store.replace(touched).await);

        store.create().await;
        assert_eq!(store.len().await, 2);
        assert!(store.get(&first.session_id).await.is_some());
        assert!(store.get(&second.session_id).await.is_none());
    }

    #[tokio::test]
    async fn test_sweep_drops_idle_sessions() {
        let store = SessionStore::new(&ChatConfig {
            session_ttl_secs: 60,
            max_sessions: 10,
        });
        let fresh = store.create().await;

        let mut stale = store.create().await;
        stale.last_active = Utc::now() - Duration::seconds(120);
        assert!(store.replace(stale.clone()).await);

        assert_eq!(store.sweep_expired().await, 1);
        assert!(store.get(&stale.session_id).await.is_none());
        assert!(store.get(&fresh.session_id).await.is_some());
        assert_eq!(store.sweep_interval_secs(), 15);
    }
}
