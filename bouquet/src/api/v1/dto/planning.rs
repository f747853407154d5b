//! Upload analysis, timeline generation and saved output DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::FileReportDto;
use crate::models::GeneratedOutput;

/// Response for `POST /v1/uploads:analyze`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeUploadsResponse {
    /// One entry per submitted file, in submission order.
    pub files: Vec<FileReportDto>,
    /// Rendered context that a timeline request with the same inputs would use.
    pub context: String,
    /// Number of labelled sections in `context`.
    pub sections: usize,
}

/// Response for `POST /v1/timelines:generate`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTimelineResponse {
    pub files: Vec<FileReportDto>,
    /// The generated day-of timeline.
    pub timeline: String,
    /// Id to fetch the timeline later. Present when `save` was set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_id: Option<String>,
}

/// Response for `GET /v1/outputs/{outputId}`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OutputResponse {
    pub output_id: String,
    pub text: String,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
}

impl From<GeneratedOutput> for OutputResponse {
    fn from(output: GeneratedOutput) -> Self {
        Self {
            output_id: output.id,
            text: output.text,
            created_at: output.created_at,
        }
    }
}

/// Response for `DELETE /v1/outputs/{outputId}`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutputResponse {
    pub output_id: String,
    pub deleted: bool,
}
