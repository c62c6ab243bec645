use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use parking_lot::Mutex;
use tower_http::trace::TraceLayer;
use tracing::warn;

use rollbook_core::{Database, RollbookError};

use crate::export::{self, SharedDatabase};

/// Canonical empty-store message, applied uniformly to both endpoints.
pub const NO_RECORDS_MESSAGE: &str = "No records found.";

/// Base name of the downloaded file; the extension follows the format.
pub const DOWNLOAD_BASENAME: &str = "CSEDepartmentRecords";

const PDF_MIME: &str = "application/pdf";
const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

// Application state
#[derive(Clone)]
pub struct AppState {
    pub db: SharedDatabase,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/records/download", get(download_pdf))
        .route("/api/records/download/excel", get(download_xlsx))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Health check endpoint
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn download_pdf(State(state): State<AppState>) -> Result<Response, ApiError> {
    let bytes = export::export_pdf(state.db.clone()).await?;
    Ok(attachment(
        bytes,
        PDF_MIME,
        &format!("{DOWNLOAD_BASENAME}.pdf"),
    ))
}

async fn download_xlsx(State(state): State<AppState>) -> Result<Response, ApiError> {
    let bytes = export::export_xlsx(state.db.clone()).await?;
    Ok(attachment(
        bytes,
        XLSX_MIME,
        &format!("{DOWNLOAD_BASENAME}.xlsx"),
    ))
}

/// Wrap document bytes as a file-download response.
fn attachment(bytes: Vec<u8>, content_type: &str, filename: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

/// HTTP mapping for pipeline errors.
pub struct ApiError(RollbookError);

impl From<RollbookError> for ApiError {
    fn from(err: RollbookError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            // Empty store is the handled case: a plain not-found with the
            // canonical message, no error logging.
            RollbookError::NoRecords => {
                (StatusCode::NOT_FOUND, NO_RECORDS_MESSAGE).into_response()
            }
            err => {
                warn!("Export failed: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
