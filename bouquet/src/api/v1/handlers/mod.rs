pub mod chat;
pub(crate) mod health;
pub mod outputs;
pub mod planning;

pub use health::health_check;
