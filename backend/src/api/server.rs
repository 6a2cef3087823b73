//! HTTP Server for the datasweeper API.
//!
//! Provides REST endpoints for previewing and converting uploaded tables.
//!
//! # API Endpoints
//!
//! | Method | Path              | Description                          |
//! |--------|-------------------|--------------------------------------|
//! | GET    | `/health`         | Health check                         |
//! | POST   | `/api/preview`    | Preview one or more uploaded files   |
//! | POST   | `/api/convert`    | Clean and convert one uploaded file  |
//! | GET    | `/api/logs`       | SSE stream for real-time logs        |

use axum::{
    extract::{DefaultBodyLimit, Multipart},
    http::{header, Method, StatusCode},
    response::{sse::Event, IntoResponse, Json, Response, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_info, LOG_BROADCASTER};
use super::types::{error_response, FilePreview, PreviewResponse};
use crate::error::{PipelineError, ServerError, ServerResult};
use crate::format::Format;
use crate::table::DEFAULT_PREVIEW_ROWS;
use crate::transform::pipeline::{preview_file, process_file, FileJob, ProcessOptions};

/// Largest accepted request body.
const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Build the application router.
pub fn router() -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE, header::CONTENT_DISPOSITION]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/preview", post(preview_upload))
        .route("/api/convert", post(convert_upload))
        .route("/api/logs", get(sse_logs))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
}

/// Start the HTTP server
pub async fn start_server(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = router();

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("🚀 Datasweeper server running on http://localhost:{}", port);
    println!("   POST /api/preview - Preview CSV/Excel files");
    println!("   POST /api/convert - Clean and convert one file");
    println!("   GET  /api/logs    - SSE log stream");
    println!("   GET  /health      - Health check");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Pipeline(PipelineError::UnsupportedFormat(_)) => {
                StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            ServerError::Pipeline(PipelineError::Parse(_))
            | ServerError::Pipeline(PipelineError::Table(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::Pipeline(PipelineError::UnknownColumn(_)) | ServerError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ServerError::Pipeline(PipelineError::Export(_)) | ServerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ServerError::Pipeline(err) => err.kind(),
            ServerError::BadRequest(_) => "bad_request",
            ServerError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let body = error_response(self.kind(), &self.to_string());
        (self.status_code(), Json(body)).into_response()
    }
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "datasweeper",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "preview": "POST /api/preview",
            "convert": "POST /api/convert",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    // Lagged receivers skip what they missed
    let stream = BroadcastStream::new(rx).filter_map(|result| {
        let entry = result.ok()?;
        let json = serde_json::to_string(&entry).ok()?;
        Some(Ok(Event::default().data(json)))
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Uploaded files plus the plain form fields sent alongside them.
#[derive(Debug, Default)]
struct UploadForm {
    files: Vec<FileJob>,
    fields: Vec<(String, String)>,
}

impl UploadForm {
    async fn read(mut multipart: Multipart) -> ServerResult<Self> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ServerError::BadRequest(format!("Multipart error: {}", e)))?
        {
            let name = field.name().unwrap_or("").to_string();

            if name == "file" {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))?;
                form.files.push(FileJob::new(file_name, bytes.to_vec()));
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))?;
                form.fields.push((name, value));
            }
        }

        Ok(form)
    }

    /// Last value sent for `name`.
    fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.trim())
    }

    fn preview_rows(&self) -> ServerResult<usize> {
        match self.field("rows") {
            None | Some("") => Ok(DEFAULT_PREVIEW_ROWS),
            Some(raw) => raw
                .parse()
                .map_err(|_| ServerError::BadRequest(format!("Invalid rows value: {}", raw))),
        }
    }

    fn process_options(&self) -> ServerResult<ProcessOptions> {
        let target = match self.field("target") {
            None | Some("") => Format::default(),
            Some(raw) => raw.parse::<Format>().map_err(ServerError::BadRequest)?,
        };

        let columns = self
            .field("columns")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(ProcessOptions {
            deduplicate: self.field("dedupe").is_some_and(parse_flag),
            fill_missing: self.field("fillMissing").is_some_and(parse_flag),
            columns,
            target,
        })
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "true" | "1" | "on" | "yes")
}

/// Run blocking pipeline work off the async runtime.
async fn run_blocking<T, F>(work: F) -> ServerResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))
}

/// Preview endpoint: one entry per uploaded file, failures included.
async fn preview_upload(multipart: Multipart) -> ServerResult<Json<PreviewResponse>> {
    let form = UploadForm::read(multipart).await?;
    if form.files.is_empty() {
        return Err(ServerError::BadRequest("No file provided".into()));
    }
    let rows = form.preview_rows()?;

    log_info(format!("👀 Previewing {} file(s)", form.files.len()));

    let files = run_blocking(move || {
        form.files
            .into_iter()
            .map(|job| {
                let result = preview_file(&job, rows);
                FilePreview::from_result(job.file_name, result)
            })
            .collect::<Vec<_>>()
    })
    .await?;

    Ok(Json(PreviewResponse::new(files)))
}

/// Convert endpoint: returns the converted file as an attachment.
async fn convert_upload(multipart: Multipart) -> ServerResult<Response> {
    let form = UploadForm::read(multipart).await?;
    let options = form.process_options()?;
    let job = form
        .files
        .into_iter()
        .next()
        .ok_or_else(|| ServerError::BadRequest("No file provided".into()))?;

    let converted = run_blocking(move || process_file(&job, &options)).await??;

    let headers = [
        (header::CONTENT_TYPE, converted.media_type.to_string()),
        (header::CONTENT_DISPOSITION, content_disposition(&converted.file_name)),
    ];
    Ok((headers, converted.bytes).into_response())
}

/// `attachment` disposition for `file_name`. Quotes, backslashes and
/// control characters cannot appear inside the quoted filename.
fn content_disposition(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("attachment; filename=\"{}\"", safe)
}
