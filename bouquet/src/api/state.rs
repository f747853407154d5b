use std::sync::Arc;

use crate::config::Config;
use crate::llm::TextGenerator;
use crate::processing::{PlanningPipeline, UploadIntake};
use crate::services::{ChatService, SessionStore};
use crate::storage::OutputStore;
use crate::transcription::Transcriber;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pipeline: PlanningPipeline,
    pub chat: ChatService,
    pub sessions: SessionStore,
    pub transcriber: Arc<dyn Transcriber>,
    pub generator: Arc<dyn TextGenerator>,
}

impl AppState {
    pub fn new(
        config: Config,
        transcriber: Arc<dyn Transcriber>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        let config = Arc::new(config);
        let intake = UploadIntake::new(&config.storage.upload_dir, transcriber.clone());
        let outputs = OutputStore::new(&config.storage.output_dir);
        let pipeline = PlanningPipeline::new(intake.clone(), generator.clone(), outputs);
        let chat = ChatService::new(intake, generator.clone());
        let sessions = SessionStore::new(&config.chat);

        Self {
            config,
            pipeline,
            chat,
            sessions,
            transcriber,
            generator,
        }
    }
}
