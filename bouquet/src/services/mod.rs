mod chat;

pub use chat::{ChatService, FileAnalysis, SessionStore};
