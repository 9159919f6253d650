//! Screening client — the single point of entry for resume screening calls.
//!
//! Issues one multipart request per call (no retries: resubmitting a large
//! file would duplicate an expensive inference run) and maps transport,
//! remote, and schema failures to distinct `ApiError` variants.

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::errors::ApiError;
use crate::models::{HealthStatus, JobData, ScreeningResponse};

pub mod validation;

use validation::{is_valid_resume_file, ResumeFile};

/// Shown when the server rejects a screening call without a usable detail.
const SCREEN_FALLBACK_MESSAGE: &str = "Failed to screen resume";

/// Error body shape of the screening service: `{"detail": "..."}`.
#[derive(Debug, Deserialize)]
struct RemoteDetail {
    detail: String,
}

/// HTTP client for the resume screening service.
#[derive(Clone)]
pub struct ScreeningClient {
    http: Client,
    base_url: String,
}

impl ScreeningClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        ScreeningClient {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.screening_api_url.clone())
    }

    /// GET /health — lightweight liveness probe for the status indicator.
    pub async fn health_check(&self) -> Result<HealthStatus, ApiError> {
        let response = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Remote {
                status: status.as_u16(),
                message: "Health check failed".to_string(),
            });
        }

        response
            .json::<HealthStatus>()
            .await
            .map_err(|e| ApiError::Schema(format!("health response did not match contract: {e}")))
    }

    /// POST /screen — screens a resume against form-style job fields.
    ///
    /// `required_skills` (and optional `preferred_skills`) are the
    /// comma-separated strings the service expects; the optional fields are
    /// omitted from the request entirely when absent or blank, which is how
    /// "unspecified" is signalled to the remote.
    pub async fn screen_resume(
        &self,
        file: ResumeFile,
        job_title: &str,
        job_description: &str,
        required_skills: &str,
        preferred_skills: Option<&str>,
        experience_required: Option<&str>,
    ) -> Result<ScreeningResponse, ApiError> {
        ensure_valid_file(&file)?;
        let file_name = file.file_name.clone();

        let mut form = Form::new()
            .part("resume", resume_part(file)?)
            .text("job_title", job_title.to_string())
            .text("job_description", job_description.to_string())
            .text("required_skills", required_skills.to_string());

        if let Some(preferred) = non_blank(preferred_skills) {
            form = form.text("preferred_skills", preferred);
        }
        if let Some(experience) = non_blank(experience_required) {
            form = form.text("experience_required", experience);
        }

        debug!("POST /screen for '{file_name}'");
        let response = self
            .http
            .post(format!("{}/screen", self.base_url))
            .multipart(form)
            .send()
            .await?;

        decode_screening_response(response).await
    }

    /// POST /screen-json — same contract as `/screen`, but the job
    /// description travels as one JSON-encoded `job_data` part.
    pub async fn screen_resume_json(
        &self,
        file: ResumeFile,
        job: &JobData,
    ) -> Result<ScreeningResponse, ApiError> {
        ensure_valid_file(&file)?;
        let file_name = file.file_name.clone();

        let job_data = serde_json::to_string(job)
            .map_err(|e| ApiError::Validation(format!("could not encode job data: {e}")))?;
        let form = Form::new()
            .part("resume", resume_part(file)?)
            .text("job_data", job_data);

        debug!("POST /screen-json for '{file_name}'");
        let response = self
            .http
            .post(format!("{}/screen-json", self.base_url))
            .multipart(form)
            .send()
            .await?;

        decode_screening_response(response).await
    }
}

/// Rejects unsupported file types before any network call is made.
fn ensure_valid_file(file: &ResumeFile) -> Result<(), ApiError> {
    if is_valid_resume_file(file) {
        Ok(())
    } else {
        Err(ApiError::Validation(format!(
            "unsupported resume file type '{}' (accepted: PDF, DOC, DOCX)",
            file.content_type
        )))
    }
}

fn resume_part(file: ResumeFile) -> Result<Part, ApiError> {
    let part = Part::bytes(file.bytes.to_vec())
        .file_name(file.file_name)
        .mime_str(&file.content_type)?;
    Ok(part)
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

async fn decode_screening_response(
    response: reqwest::Response,
) -> Result<ScreeningResponse, ApiError> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<RemoteDetail>(&body)
            .map(|e| e.detail)
            .unwrap_or_else(|_| SCREEN_FALLBACK_MESSAGE.to_string());
        warn!("screening request rejected ({status}): {message}");
        return Err(ApiError::Remote {
            status: status.as_u16(),
            message,
        });
    }

    let body = response.text().await?;
    let mut parsed: ScreeningResponse = serde_json::from_str(&body)
        .map_err(|e| ApiError::Schema(format!("screening response did not match contract: {e}")))?;

    // Defensive bound for display code; the remote model occasionally
    // drifts out of range.
    parsed.decision.clamp_scores();
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_file() -> ResumeFile {
        ResumeFile::new("notes.txt", "text/plain", &b"not a resume"[..])
    }

    #[tokio::test]
    async fn test_screen_resume_rejects_bad_file_type_before_network() {
        // Unroutable base URL: the call must fail on validation, not transport.
        let client = ScreeningClient::new("http://127.0.0.1:1");
        let err = client
            .screen_resume(text_file(), "Engineer", "desc", "Rust", None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_screen_resume_json_rejects_bad_file_type_before_network() {
        let client = ScreeningClient::new("http://127.0.0.1:1");
        let job = JobData {
            title: "Engineer".to_string(),
            description: "desc".to_string(),
            required_skills: vec!["Rust".to_string()],
            preferred_skills: None,
            experience_required: None,
        };
        let err = client
            .screen_resume_json(text_file(), &job)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_non_blank_treats_whitespace_as_absent() {
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(Some(" Docker ")), Some("Docker".to_string()));
    }

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let client = ScreeningClient::new("http://localhost:8000/");
        assert_eq!(client.base_url, "http://localhost:8000");
    }
}
