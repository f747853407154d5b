use axum::extract::multipart::{Field, MultipartError};
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Multipart};
use axum::http::StatusCode;

use crate::config::IntakeConfig;
use crate::error::BouquetError;
use crate::models::UploadedArtifact;

/// JSON body extractor whose rejections become `BouquetError::Validation`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(BouquetError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for BouquetError {
    fn from(rejection: JsonRejection) -> Self {
        map_json_rejection(rejection)
    }
}

fn map_json_rejection(rejection: JsonRejection) -> BouquetError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let message = err.body_text();
            if let Some(field) = extract_missing_field(&message) {
                BouquetError::Validation(format!("Missing required field: {field}"))
            } else {
                BouquetError::Validation(format!("Invalid JSON: {message}"))
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            BouquetError::Validation(format!("JSON syntax error: {err}"))
        }
        JsonRejection::MissingJsonContentType(_) => BouquetError::Validation(
            "Missing `Content-Type: application/json` header".to_string(),
        ),
        JsonRejection::BytesRejection(err) if err.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            BouquetError::PayloadTooLarge("Request body exceeds the configured limit".to_string())
        }
        JsonRejection::BytesRejection(_) => {
            BouquetError::Internal("Failed to read request body".to_string())
        }
        _ => BouquetError::Validation(rejection.to_string()),
    }
}

fn extract_missing_field(message: &str) -> Option<&str> {
    let prefix = "missing field `";
    let start = message.find(prefix)? + prefix.len();
    let remaining = message.get(start..)?;
    let end = remaining.find('`')?;
    remaining.get(..end)
}

/// Accepts the usual spellings of a boolean form field.
pub fn parse_form_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Multipart upload split into files, audio clips and text fields.
#[derive(Debug, Default)]
pub struct UploadForm {
    /// Parts named `files`, `files[]` or `file`, in submission order.
    pub files: Vec<UploadedArtifact>,
    /// Parts named `audio`, in submission order.
    pub audio: Vec<UploadedArtifact>,
    /// A `reference` file part.
    pub reference: Option<UploadedArtifact>,
    /// Every other field, read as text.
    pub fields: Vec<(String, String)>,
}

impl UploadForm {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn artifact_count(&self) -> usize {
        self.files.len() + self.audio.len()
    }

    /// Files followed by audio clips, the order intake reports them in.
    pub fn into_artifacts(self) -> Vec<UploadedArtifact> {
        let mut artifacts = self.files;
        artifacts.extend(self.audio);
        artifacts
    }
}

/// Drain a multipart body, enforcing per-file size and file-count limits.
///
/// Violations are `Validation` errors so they surface as `invalid_request`
/// before any file reaches intake.
pub async fn read_upload_form(
    multipart: &mut Multipart,
    limits: &IntakeConfig,
) -> Result<UploadForm, BouquetError> {
    let mut form = UploadForm::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(multipart_error("Malformed multipart body", e)),
        };

        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "files" | "files[]" | "file" => form.files.push(read_file(field, limits).await?),
            "audio" => form.audio.push(read_file(field, limits).await?),
            "reference" => form.reference = Some(read_file(field, limits).await?),
            "" => continue,
            _ => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| multipart_error(&format!("Invalid field '{name}'"), e))?;
                form.fields.push((name, value));
            }
        }

        if form.artifact_count() > limits.max_files {
            return Err(BouquetError::Validation(format!(
                "Too many files: at most {} per request",
                limits.max_files
            )));
        }
    }

    Ok(form)
}

/// A body cut off by the request size limit is `PayloadTooLarge`; anything
/// else wrong with the multipart stream is the client's malformed input.
fn multipart_error(context: &str, err: MultipartError) -> BouquetError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        BouquetError::PayloadTooLarge("Request body exceeds the configured limit".to_string())
    } else {
        BouquetError::Validation(format!("{context}: {}", err.body_text()))
    }
}

async fn read_file(field: Field<'_>, limits: &IntakeConfig) -> Result<UploadedArtifact, BouquetError> {
    let original_name = field
        .file_name()
        .map(str::to_string)
        .unwrap_or_else(|| "upload".to_string());
    let content_type = field.content_type().map(str::to_string);

    let bytes = field
        .bytes()
        .await
        .map_err(|e| multipart_error(&format!("Failed to read '{original_name}'"), e))?;

    if bytes.len() > limits.max_file_size {
        return Err(BouquetError::Validation(format!(
            "File '{}' too large: {} bytes (max {} bytes)",
            original_name,
            bytes.len(),
            limits.max_file_size
        )));
    }

    let artifact = UploadedArtifact::new(original_name, bytes.to_vec());
    Ok(match content_type {
        Some(content_type) => artifact.with_hint(content_type),
        None => artifact,
    })
}
