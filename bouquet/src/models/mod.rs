mod artifact;
mod context;
mod conversation;
mod extraction;
mod output;

pub use artifact::*;
pub use context::*;
pub use conversation::*;
pub use extraction::*;
pub use output::*;
