//! v1 upload analysis and timeline generation handlers.
//!
//! Both endpoints take a multipart form. Per-file failures are reported in
//! the response data; only request-level problems become envelope errors.

use axum::extract::{Multipart, State};

use crate::api::extractors::{parse_form_bool, read_upload_form, UploadForm};
use crate::api::v1::dto::{AnalyzeUploadsResponse, FileReportDto, GenerateTimelineResponse};
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode};
use crate::api::AppState;
use crate::error::{BouquetError, Result};
use crate::processing::{ContentExtractor, TimelineRequest};

fn instruction_of(form: &UploadForm) -> String {
    form.field("instruction").unwrap_or_default().trim().to_string()
}

/// `POST /api/v1/uploads:analyze`
///
/// Extracts every uploaded file and returns a preview (or a structured
/// error) per file together with the assembled context. No model call.
#[utoipa::path(
    post,
    path = "/api/v1/uploads:analyze",
    tag = "uploads",
    operation_id = "uploads.analyze",
    request_body(content_type = "multipart/form-data", content = String, description = "`files` parts (pdf, docx, txt, csv), optional `audio` parts (mp3, wav, m4a) and an optional `instruction` field"),
    responses(
        (status = 200, description = "Per-file results and assembled context", body = AnalyzeUploadsResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 413, description = "Request body too large", body = ApiError),
    )
)]
pub async fn analyze_uploads(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResponse<AnalyzeUploadsResponse> {
    let form = match read_upload_form(&mut multipart, &state.config.intake).await {
        Ok(form) => form,
        Err(e) => return e.into(),
    };

    if form.artifact_count() == 0 {
        return ApiResponse::error(ErrorCode::InvalidRequest, "At least one file is required");
    }

    let instruction = instruction_of(&form);
    match state
        .pipeline
        .analyze(form.into_artifacts(), &instruction)
        .await
    {
        Ok(analysis) => ApiResponse::success(AnalyzeUploadsResponse {
            files: FileReportDto::from_reports(
                &analysis.reports,
                state.config.intake.preview_chars,
            ),
            sections: analysis.context.sections.len(),
            context: analysis.context.render(),
        }),
        Err(e) => e.into(),
    }
}

/// `POST /api/v1/timelines:generate`
///
/// Runs the full pipeline: intake, context assembly and one generation call.
/// Set `save=true` to keep the timeline for later download.
#[utoipa::path(
    post,
    path = "/api/v1/timelines:generate",
    tag = "timelines",
    operation_id = "timelines.generate",
    request_body(content_type = "multipart/form-data", content = String, description = "`files` and `audio` parts, optional `instruction`, a reference timeline as `referenceExample` text or a `reference` file, and `save`"),
    responses(
        (status = 200, description = "Generated timeline", body = GenerateTimelineResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 413, description = "Request body too large", body = ApiError),
        (status = 429, description = "Model provider rate limit", body = ApiError),
        (status = 502, description = "Model provider failed", body = ApiError),
        (status = 503, description = "No LLM configured", body = ApiError),
    )
)]
pub async fn generate_timeline(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResponse<GenerateTimelineResponse> {
    let form = match read_upload_form(&mut multipart, &state.config.intake).await {
        Ok(form) => form,
        Err(e) => return e.into(),
    };

    let request = match timeline_request(form).await {
        Ok(request) => request,
        Err(e) => return e.into(),
    };

    match state.pipeline.generate_timeline(request).await {
        Ok(outcome) => ApiResponse::success(GenerateTimelineResponse {
            files: FileReportDto::from_reports(&outcome.reports, state.config.intake.preview_chars),
            timeline: outcome.timeline,
            output_id: outcome.output.map(|o| o.id),
        }),
        Err(e) => e.into(),
    }
}

async fn timeline_request(form: UploadForm) -> Result<TimelineRequest> {
    let save_output = match form.field("save") {
        None => false,
        Some(raw) => parse_form_bool(raw).ok_or_else(|| {
            BouquetError::Validation("save must be one of true/false/1/0/yes/no".to_string())
        })?,
    };

    let reference_example = match (&form.reference, form.field("referenceExample")) {
        (Some(file), _) => Some(ContentExtractor::new().extract_upload(file).await?),
        (None, Some(text)) if !text.trim().is_empty() => Some(text.to_string()),
        _ => None,
    };

    let instruction = instruction_of(&form);

    Ok(TimelineRequest {
        artifacts: form.into_artifacts(),
        instruction,
        reference_example,
        save_output,
    })
}
