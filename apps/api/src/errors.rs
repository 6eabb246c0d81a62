use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// User-facing workflow failures. Both kinds are recoverable: the session
/// stays in the step that raised them and the message is shown inline.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum WorkflowError {
    /// Bad file type, or a failed extraction call.
    #[error("{0}")]
    Extraction(String),

    /// Failed validation, or a failed recommendation call.
    #[error("{0}")]
    Submission(String),
}

impl WorkflowError {
    pub fn code(&self) -> &'static str {
        match self {
            WorkflowError::Extraction(_) => "EXTRACTION_ERROR",
            WorkflowError::Submission(_) => "SUBMISSION_ERROR",
        }
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Workflow(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.code(), e.to_string()),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workflow_error_displays_bare_message() {
        let err = WorkflowError::Extraction("Please upload a PDF file".to_string());
        assert_eq!(err.to_string(), "Please upload a PDF file");
        assert_eq!(err.code(), "EXTRACTION_ERROR");
    }

    #[test]
    fn test_workflow_error_serializes_kind_and_message() {
        let err = WorkflowError::Submission("Please add at least one technology.".to_string());
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"kind": "submission", "message": "Please add at least one technology."})
        );
    }

    #[test]
    fn test_workflow_error_maps_to_unprocessable_entity() {
        let response =
            AppError::from(WorkflowError::Submission("nope".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let response = AppError::NotFound("Session x not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
