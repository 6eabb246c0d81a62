//! SOW Client: the single point of entry for calls to the extraction and
//! recommendation services.
//!
//! ARCHITECTURAL RULE: No other module may call those services directly.
//! The workflow only sees the `SowService` trait.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::extraction::{ExtractedRecord, UploadedFile, PDF_MIME};
use crate::models::form::ProjectForm;
use crate::models::recommendation::RecommendationSet;

#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The two external collaborators behind the wizard.
///
/// Carried in `AppState` as `Arc<dyn SowService>`.
#[async_trait]
pub trait SowService: Send + Sync {
    /// `POST /extract_sow` with the PDF as multipart field `file`.
    async fn extract_sow(&self, file: &UploadedFile) -> Result<ExtractedRecord, CollaboratorError>;

    /// `POST /recommend_employees_clean` with the form as JSON.
    async fn recommend_employees(
        &self,
        form: &ProjectForm,
    ) -> Result<RecommendationSet, CollaboratorError>;
}

/// HTTP implementation of [`SowService`]. No retries: every retry is user-initiated.
#[derive(Clone)]
pub struct SowClient {
    client: Client,
    extract_url: String,
    recommend_url: String,
}

impl SowClient {
    pub fn new(
        extract_url: impl Into<String>,
        recommend_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CollaboratorError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            extract_url: extract_url.into(),
            recommend_url: recommend_url.into(),
        })
    }
}

#[async_trait]
impl SowService for SowClient {
    async fn extract_sow(&self, file: &UploadedFile) -> Result<ExtractedRecord, CollaboratorError> {
        let part = multipart::Part::bytes(file.bytes.to_vec())
            .file_name(file.file_name.clone())
            .mime_str(PDF_MIME)?;
        let form = multipart::Form::new().part("file", part);

        info!(
            url = %self.extract_url,
            file = %file.file_name,
            size = file.bytes.len(),
            "posting SOW for extraction"
        );
        let response = self
            .client
            .post(&self.extract_url)
            .multipart(form)
            .send()
            .await?;

        decode_json(response).await
    }

    async fn recommend_employees(
        &self,
        form: &ProjectForm,
    ) -> Result<RecommendationSet, CollaboratorError> {
        info!(
            url = %self.recommend_url,
            project = %form.name,
            technologies = form.technology.len(),
            "requesting employee recommendations"
        );
        let response = self
            .client
            .post(&self.recommend_url)
            .json(form)
            .send()
            .await?;

        let set: RecommendationSet = decode_json(response).await?;
        debug!(count = set.recommendations.len(), "received recommendations");
        Ok(set)
    }
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, CollaboratorError> {
    let status = response.status();
    if !status.is_success() {
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(status = status.as_u16(), error = %e, "failed to read error response body");
                String::new()
            }
        };
        return Err(CollaboratorError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(CollaboratorError::Decode)
}
