pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod processing;
pub mod services;
pub mod storage;
pub mod transcription;
