//! The export pipeline: fetch the full record set, map each record to a
//! table row, and serialize through the document generators.

use std::sync::Arc;

use chrono::Local;
use parking_lot::Mutex;
use tracing::debug;

use rollbook_core::{Database, RollbookError, StudentRecord};
use rollbook_docs::{Cell, PageDecoration, TableColumn};

/// Shared handle to the record store.
pub type SharedDatabase = Arc<Mutex<Database>>;

/// Title paragraph at the top of the PDF roster.
pub const ROSTER_TITLE: &str = "CSE Department Student List";

/// Worksheet name for the XLSX roster.
pub const SHEET_NAME: &str = "CSE Department";

/// Column headers, in render order.
pub const HEADERS: [&str; 6] = [
    "ID",
    "Student Name",
    "Enrollment No",
    "Course",
    "Year",
    "Contact / Email",
];

// Narrow id/year columns, wide text columns.
const COLUMN_WEIGHTS: [f64; 6] = [1.0, 3.0, 3.0, 2.0, 1.0, 3.0];

/// Page-header timestamp format: `August 04, 2026 09:15 AM`. Month names
/// come from chrono's English tables, so the rendering is locale-independent.
const GENERATED_AT_FORMAT: &str = "%B %d, %Y %I:%M %p";

/// Fetch every record and render the PDF roster.
///
/// Returns [`RollbookError::NoRecords`] when the store is empty; no bytes
/// are produced in that case.
pub async fn export_pdf(db: SharedDatabase) -> Result<Vec<u8>, RollbookError> {
    let records = fetch_records(db).await?;
    debug!("Rendering PDF roster for {} records", records.len());
    roster_pdf(&records)
}

/// Fetch every record and render the XLSX roster.
///
/// Returns [`RollbookError::NoRecords`] when the store is empty; no bytes
/// are produced in that case.
pub async fn export_xlsx(db: SharedDatabase) -> Result<Vec<u8>, RollbookError> {
    let records = fetch_records(db).await?;
    debug!("Rendering XLSX roster for {} records", records.len());
    roster_xlsx(&records)
}

/// Render the PDF roster for an already-fetched record set.
pub fn roster_pdf(records: &[StudentRecord]) -> Result<Vec<u8>, RollbookError> {
    let columns: Vec<TableColumn> = HEADERS
        .iter()
        .zip(COLUMN_WEIGHTS)
        .map(|(header, weight)| TableColumn::new(header, weight))
        .collect();
    let rows = roster_rows(records);

    rollbook_docs::generate_table_pdf(ROSTER_TITLE, &columns, &rows, |page| PageDecoration {
        // The timestamp is taken when the page is decorated, not when the
        // export started.
        header_left: Some(format!(
            "Generated on: {}",
            Local::now().format(GENERATED_AT_FORMAT)
        )),
        footer_right: Some(format!("Page: {page}")),
    })
    .map_err(RollbookError::document)
}

/// Render the XLSX roster for an already-fetched record set.
pub fn roster_xlsx(records: &[StudentRecord]) -> Result<Vec<u8>, RollbookError> {
    let rows = roster_rows(records);
    rollbook_docs::generate_xlsx(SHEET_NAME, &HEADERS, &rows).map_err(RollbookError::document)
}

/// Map records to table rows, preserving input order.
pub fn roster_rows(records: &[StudentRecord]) -> Vec<Vec<Cell>> {
    records
        .iter()
        .map(|record| {
            vec![
                Cell::Int(record.id),
                Cell::from(record.student_name.as_str()),
                Cell::from(record.enrollment_number.as_str()),
                Cell::from(record.course.as_str()),
                Cell::from(record.year),
                Cell::Text(contact_email(record)),
            ]
        })
        .collect()
}

/// Combined contact cell: `"{contact-or-N/A} / {email-or-N/A}"`.
///
/// Missing fields normalize to the literal `N/A` here, at formatting time;
/// stored values are never rewritten.
fn contact_email(record: &StudentRecord) -> String {
    format!(
        "{} / {}",
        record.contact_number.as_deref().unwrap_or("N/A"),
        record.email.as_deref().unwrap_or("N/A")
    )
}

/// Load the export snapshot off the async executor.
///
/// The rusqlite query is the pipeline's only blocking step, so it runs
/// under `spawn_blocking`. An empty result set maps to
/// [`RollbookError::NoRecords`]; a store failure is fatal for the request.
async fn fetch_records(db: SharedDatabase) -> Result<Vec<StudentRecord>, RollbookError> {
    let records = tokio::task::spawn_blocking(move || db.lock().fetch_all())
        .await
        .map_err(RollbookError::internal)?
        .map_err(RollbookError::storage)?;

    if records.is_empty() {
        return Err(RollbookError::NoRecords);
    }
    Ok(records)
}
