//! REST API types.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::PipelineError;
use crate::table::TablePreview;

/// Response to `POST /api/preview`: one entry per uploaded file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    /// Unique job identifier
    pub job_id: String,

    /// "ready" when every file loaded, "warning" otherwise
    pub status: String,

    pub files: Vec<FilePreview>,
}

/// Preview of one uploaded file, or the reason it could not be loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilePreview {
    pub file_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<TablePreview>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

/// Error details for one file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable kind, e.g. "unsupported_format"
    pub kind: String,
    pub message: String,
}

impl From<&PipelineError> for ApiError {
    fn from(err: &PipelineError) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

impl FilePreview {
    pub fn from_result(file_name: String, result: Result<TablePreview, PipelineError>) -> Self {
        match result {
            Ok(preview) => Self {
                file_name,
                preview: Some(preview),
                error: None,
            },
            Err(err) => Self {
                file_name,
                preview: None,
                error: Some(ApiError::from(&err)),
            },
        }
    }
}

impl PreviewResponse {
    pub fn new(files: Vec<FilePreview>) -> Self {
        let status = if files.iter().all(|f| f.error.is_none()) {
            "ready"
        } else {
            "warning"
        };
        Self {
            job_id: Uuid::new_v4().to_string(),
            status: status.to_string(),
            files,
        }
    }
}

/// Create an error response body
pub fn error_response(kind: &str, error: &str) -> Value {
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": "error",
        "error": {
            "kind": kind,
            "message": error,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{preview, Column, Table};

    #[test]
    fn test_preview_response_status() {
        let table = Table::new(vec![Column::integers("a", vec![Some(1)])]).unwrap();
        let ok = FilePreview::from_result("a.csv".into(), Ok(preview(&table, 5)));
        let failed = FilePreview::from_result(
            "notes.txt".into(),
            Err(PipelineError::UnsupportedFormat(".txt".into())),
        );

        assert_eq!(PreviewResponse::new(vec![ok.clone()]).status, "ready");

        let response = PreviewResponse::new(vec![ok, failed]);
        assert_eq!(response.status, "warning");

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["files"][0]["preview"]["rowCount"], 1);
        assert!(json["files"][0].get("error").is_none());
        assert_eq!(json["files"][1]["error"]["kind"], "unsupported_format");
        assert_eq!(json["files"][1]["fileName"], "notes.txt");
    }

    #[test]
    fn test_error_response_shape() {
        let body = error_response("parse_error", "bad file");
        assert_eq!(body["status"], "error");
        assert_eq!(body["error"]["kind"], "parse_error");
        assert_eq!(body["error"]["message"], "bad file");
        assert!(body["jobId"].is_string());
    }
}
