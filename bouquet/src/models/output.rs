use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Generated text persisted for later download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedOutput {
    pub id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}
