use anyhow::{Context, Result};
use rust_xlsxwriter::{Color, Format, Workbook};

use crate::cell::Cell;

/// Solid light-gray fill behind the header row.
const HEADER_FILL: Color = Color::RGB(0xD3D3D3);

/// Generate an XLSX file with a single named worksheet.
///
/// The header row is bold on a light-gray fill; data rows follow in input
/// order; columns are auto-fitted only after every row is written. Returns
/// the raw bytes of the xlsx file (can be written to disk or sent as a
/// download).
pub fn generate_xlsx(sheet_name: &str, headers: &[&str], rows: &[Vec<Cell>]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(sheet_name)
        .with_context(|| format!("Invalid worksheet name: {sheet_name}"))?;

    let header_format = Format::new().set_bold().set_background_color(HEADER_FILL);

    // Write header row
    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .with_context(|| format!("Failed to write header at column {col}"))?;
    }

    // Write data rows
    for (row_idx, row) in rows.iter().enumerate() {
        let excel_row = (row_idx + 1) as u32;
        for (col_idx, cell) in row.iter().enumerate() {
            match cell {
                Cell::Int(n) => worksheet
                    .write_number(excel_row, col_idx as u16, *n as f64)
                    .with_context(|| {
                        format!("Failed to write number at ({excel_row}, {col_idx})")
                    })?,
                Cell::Text(s) => worksheet
                    .write_string(excel_row, col_idx as u16, s)
                    .with_context(|| {
                        format!("Failed to write string at ({excel_row}, {col_idx})")
                    })?,
            };
        }
    }

    // Auto-fit columns for readability
    worksheet.autofit();

    let bytes = workbook
        .save_to_buffer()
        .context("Failed to save workbook to buffer")?;

    Ok(bytes)
}
