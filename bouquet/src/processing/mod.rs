mod assembler;
mod extractor;
mod intake;
mod pipeline;

pub mod extractors;

pub use assembler::ContextAssembler;
pub use extractor::ContentExtractor;
pub use intake::{IntakeBatch, UploadIntake};
pub use pipeline::{Analysis, PlanningPipeline, TimelineOutcome, TimelineRequest};
