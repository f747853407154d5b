mod outputs;
mod scratch;

pub use outputs::OutputStore;
pub use scratch::{sanitize_file_name, ScratchSpace, StoredArtifact};
