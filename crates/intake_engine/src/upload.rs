use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::{ResumeSummary, StagedFile, UploadError, UploadFailureKind, UploadReceipt};

#[derive(Debug, Clone)]
pub struct UploadSettings {
    /// Base URL of the recruiting API.
    pub base_url: String,
    /// Multipart field name shared by every file part of a batch.
    pub field_name: String,
    /// Opaque bearer token issued by the session collaborator, if any.
    pub bearer_token: Option<String>,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api/v1".to_string(),
            field_name: "files".to_string(),
            bearer_token: None,
        }
    }
}

impl UploadSettings {
    pub(crate) fn upload_url(&self) -> String {
        format!("{}/file/upload", self.base_url.trim_end_matches('/'))
    }

    pub(crate) fn roster_url(&self) -> String {
        format!("{}/file", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait::async_trait]
pub trait Uploader: Send + Sync {
    /// Send one batch as a single multipart request and return the backend's
    /// acknowledged-file count.
    async fn upload_batch(&self, files: &[StagedFile]) -> Result<UploadReceipt, UploadError>;

    /// List the résumés the backend currently stores.
    async fn list_resumes(&self) -> Result<Vec<ResumeSummary>, UploadError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestUploader {
    settings: UploadSettings,
    client: reqwest::Client,
}

/// Only the length of `results` is consumed; the entries' shape is the
/// backend's contract.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    results: Vec<serde_json::Value>,
}

impl ReqwestUploader {
    pub fn new(settings: UploadSettings) -> Result<Self, UploadError> {
        url::Url::parse(&settings.base_url)
            .map_err(|err| UploadError::new(UploadFailureKind::InvalidUrl, err.to_string()))?;

        // No explicit request timeout: the client's defaults govern.
        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| UploadError::new(UploadFailureKind::Network, err.to_string()))?;

        Ok(Self { settings, client })
    }

    async fn build_form(&self, files: &[StagedFile]) -> Result<Form, UploadError> {
        let mut form = Form::new();
        for file in files {
            let bytes = tokio::fs::read(&file.path).await.map_err(|err| {
                UploadError::new(
                    UploadFailureKind::FileRead {
                        name: file.name.clone(),
                    },
                    err.to_string(),
                )
            })?;
            let part = Part::bytes(bytes)
                .file_name(file.name.clone())
                .mime_str(mime_for(&file.name))
                .map_err(|err| UploadError::new(UploadFailureKind::Network, err.to_string()))?;
            form = form.part(self.settings.field_name.clone(), part);
        }
        Ok(form)
    }

    fn with_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.settings.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait::async_trait]
impl Uploader for ReqwestUploader {
    async fn upload_batch(&self, files: &[StagedFile]) -> Result<UploadReceipt, UploadError> {
        let form = self.build_form(files).await?;
        let response = self
            .with_auth(self.client.post(self.settings.upload_url()))
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::new(
                UploadFailureKind::HttpStatus(status.as_u16()),
                format!("{}: {}", status.as_u16(), body.trim()),
            ));
        }

        let payload: UploadResponse = response
            .json()
            .await
            .map_err(|err| UploadError::new(UploadFailureKind::MalformedResponse, err.to_string()))?;

        Ok(UploadReceipt {
            accepted: payload.results.len(),
        })
    }

    async fn list_resumes(&self) -> Result<Vec<ResumeSummary>, UploadError> {
        let response = self
            .with_auth(self.client.get(self.settings.roster_url()))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::new(
                UploadFailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        response
            .json::<Vec<ResumeSummary>>()
            .await
            .map_err(|err| UploadError::new(UploadFailureKind::MalformedResponse, err.to_string()))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> UploadError {
    if err.is_timeout() {
        return UploadError::new(UploadFailureKind::Timeout, err.to_string());
    }
    UploadError::new(UploadFailureKind::Network, err.to_string())
}

fn mime_for(name: &str) -> &'static str {
    let lower = name.to_ascii_lowercase();
    if lower.ends_with(".pdf") {
        "application/pdf"
    } else if lower.ends_with(".txt") {
        "text/plain"
    } else {
        "application/octet-stream"
    }
}
