//! PDF document generation.
//!
//! Builds minimal but valid multi-page PDF files using raw PDF format
//! construction. Supports titled tables with weighted column widths and a
//! per-page decoration hook for headers and footers. Uses the built-in
//! Helvetica fonts — no external font files required.

use anyhow::{Result, ensure};

use crate::cell::Cell;

// ---------------------------------------------------------------------------
// Page geometry
// ---------------------------------------------------------------------------

const PAGE_WIDTH: f64 = 612.0;
const PAGE_HEIGHT: f64 = 842.0;
const MARGIN: f64 = 72.0;
const USABLE_WIDTH: f64 = PAGE_WIDTH - 2.0 * MARGIN;
const CONTENT_TOP: f64 = 770.0;
const CONTENT_BOTTOM: f64 = 60.0;
const ROW_HEIGHT: f64 = 18.0;

const TITLE_FONT_SIZE: f64 = 18.0;
const TABLE_FONT_SIZE: f64 = 10.0;
const DECORATION_FONT_SIZE: f64 = 9.0;
// Decoration text sits 40pt in from the side edges and 20pt from top/bottom.
const DECORATION_INSET: f64 = 40.0;
const DECORATION_MARGIN: f64 = 20.0;

const BOLD_FONT: &str = "F1";
const BODY_FONT: &str = "F2";

/// A table column: header label plus a relative width weight.
#[derive(Debug, Clone, Copy)]
pub struct TableColumn<'a> {
    pub header: &'a str,
    pub weight: f64,
}

impl<'a> TableColumn<'a> {
    pub fn new(header: &'a str, weight: f64) -> Self {
        Self { header, weight }
    }
}

/// Header/footer text for a single page, produced by the decoration hook.
#[derive(Debug, Clone, Default)]
pub struct PageDecoration {
    /// Drawn left-aligned near the top of the page.
    pub header_left: Option<String>,
    /// Drawn right-aligned near the bottom of the page.
    pub footer_right: Option<String>,
}

/// Generate a multi-page PDF containing a titled table.
///
/// Column widths are distributed over the printable area in proportion to
/// each column's weight. Rows flow onto new pages automatically; the header
/// band (bold text on a light-gray fill) is repeated at the top of every
/// page. The title is drawn centered on the first page only.
///
/// `decorate` is invoked exactly once per page, in page order, at the moment
/// that page is finalized — after its content is laid out, before the
/// document is closed. The hook receives the 1-based page number and the
/// returned text is drawn on that page only.
pub fn generate_table_pdf(
    title: &str,
    columns: &[TableColumn],
    rows: &[Vec<Cell>],
    decorate: impl Fn(usize) -> PageDecoration,
) -> Result<Vec<u8>> {
    ensure!(!columns.is_empty(), "table needs at least one column");

    let widths = column_widths(columns);
    let mut builder = PdfBuilder::new();
    let mut content = String::new();
    let mut y = CONTENT_TOP;

    // Title: centered, bold, first page only
    let title_x = MARGIN.max((PAGE_WIDTH - text_width(title, TITLE_FONT_SIZE)) / 2.0);
    draw_text(&mut content, BOLD_FONT, TITLE_FONT_SIZE, title_x, y, title);
    y -= 30.0;

    let mut table_top = y;
    draw_header_band(&mut content, columns, &widths, y);
    y -= ROW_HEIGHT;

    for (row_idx, row) in rows.iter().enumerate() {
        if y - ROW_HEIGHT < CONTENT_BOTTOM {
            draw_table_border(&mut content, table_top, y);
            builder.finish_page(std::mem::take(&mut content), &decorate);
            y = CONTENT_TOP;
            table_top = y;
            draw_header_band(&mut content, columns, &widths, y);
            y -= ROW_HEIGHT;
        }

        // Alternating background
        if row_idx % 2 == 0 {
            content.push_str("0.96 0.96 0.96 rg\n");
            content.push_str(&format!(
                "{MARGIN:.0} {:.0} {USABLE_WIDTH:.0} {ROW_HEIGHT:.0} re f\n",
                y - ROW_HEIGHT
            ));
        }

        content.push_str("0 0 0 rg\n");
        let mut x = MARGIN;
        for (cell, width) in row.iter().zip(&widths) {
            draw_text(
                &mut content,
                BODY_FONT,
                TABLE_FONT_SIZE,
                x + 4.0,
                y - ROW_HEIGHT + 5.0,
                &cell.to_string(),
            );
            x += width;
        }
        y -= ROW_HEIGHT;
    }

    draw_table_border(&mut content, table_top, y);
    builder.finish_page(content, &decorate);

    Ok(builder.build(title))
}

// ---------------------------------------------------------------------------
// Drawing helpers
// ---------------------------------------------------------------------------

fn draw_text(content: &mut String, font: &str, size: f64, x: f64, y: f64, text: &str) {
    content.push_str("BT\n");
    content.push_str(&format!("/{font} {size:.0} Tf\n"));
    content.push_str(&format!("{x:.0} {y:.0} Td\n"));
    content.push_str(&format!("({}) Tj\n", pdf_escape(text)));
    content.push_str("ET\n");
}

fn draw_header_band(content: &mut String, columns: &[TableColumn], widths: &[f64], y: f64) {
    // Band background (light gray)
    content.push_str("0.9 0.9 0.9 rg\n");
    content.push_str(&format!(
        "{MARGIN:.0} {:.0} {USABLE_WIDTH:.0} {ROW_HEIGHT:.0} re f\n",
        y - ROW_HEIGHT
    ));

    content.push_str("0 0 0 rg\n");
    let mut x = MARGIN;
    for (column, width) in columns.iter().zip(widths) {
        draw_text(
            content,
            BOLD_FONT,
            TABLE_FONT_SIZE,
            x + 4.0,
            y - ROW_HEIGHT + 5.0,
            column.header,
        );
        x += width;
    }
}

fn draw_table_border(content: &mut String, table_top: f64, y: f64) {
    content.push_str("0.6 0.6 0.6 RG\n"); // stroke color
    content.push_str("0.5 w\n"); // line width
    content.push_str(&format!(
        "{MARGIN:.0} {y:.0} {USABLE_WIDTH:.0} {:.0} re S\n",
        table_top - y
    ));
}

fn decoration_ops(decoration: &PageDecoration) -> String {
    let mut ops = String::new();
    if decoration.header_left.is_none() && decoration.footer_right.is_none() {
        return ops;
    }

    ops.push_str("0 0 0 rg\n");
    if let Some(text) = &decoration.header_left {
        draw_text(
            &mut ops,
            BODY_FONT,
            DECORATION_FONT_SIZE,
            DECORATION_INSET,
            PAGE_HEIGHT - DECORATION_MARGIN,
            text,
        );
    }
    if let Some(text) = &decoration.footer_right {
        let x = PAGE_WIDTH - DECORATION_INSET - text_width(text, DECORATION_FONT_SIZE);
        draw_text(
            &mut ops,
            BODY_FONT,
            DECORATION_FONT_SIZE,
            x,
            DECORATION_MARGIN,
            text,
        );
    }
    ops
}

/// Splits the printable width across columns in proportion to their weights.
/// Degenerate weights fall back to an even split.
fn column_widths(columns: &[TableColumn]) -> Vec<f64> {
    let total: f64 = columns.iter().map(|c| c.weight.max(0.0)).sum();
    if total <= 0.0 {
        return vec![USABLE_WIDTH / columns.len() as f64; columns.len()];
    }
    columns
        .iter()
        .map(|c| USABLE_WIDTH * c.weight.max(0.0) / total)
        .collect()
}

/// Rough advance width for the built-in Helvetica faces (the average glyph
/// is about half an em). Close enough to center titles and right-align
/// short decoration strings.
fn text_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * 0.5
}

/// Escape special characters for PDF string literals.
fn pdf_escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
}

// ---------------------------------------------------------------------------
// File builder
// ---------------------------------------------------------------------------

/// Minimal multi-page PDF file builder. Constructs valid PDF 1.4 files.
struct PdfBuilder {
    pages: Vec<String>,
}

impl PdfBuilder {
    fn new() -> Self {
        Self { pages: Vec::new() }
    }

    /// Finalize a page: run the decoration hook with the page's 1-based
    /// number and append the returned operators after the page's primary
    /// content. Each page passes through here exactly once, in page order,
    /// so no page is ever decorated twice.
    fn finish_page(&mut self, mut content: String, decorate: &impl Fn(usize) -> PageDecoration) {
        let page_number = self.pages.len() + 1;
        let decoration = decorate(page_number);
        content.push_str(&decoration_ops(&decoration));
        self.pages.push(content);
    }

    /// Build the complete PDF file as bytes.
    fn build(&self, title: &str) -> Vec<u8> {
        let page_count = self.pages.len();
        let mut pdf = String::new();
        let mut offsets: Vec<usize> = Vec::new();

        // Object ids: 1 catalog, 2 page tree, then a page/content pair per
        // page, then the two fonts and the info dictionary.
        let font_bold_id = 3 + 2 * page_count;
        let font_body_id = font_bold_id + 1;
        let info_id = font_body_id + 1;

        // Header
        pdf.push_str("%PDF-1.4\n");

        // Obj 1: Catalog
        offsets.push(pdf.len());
        pdf.push_str("1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");

        // Obj 2: Page tree
        offsets.push(pdf.len());
        let kids: Vec<String> = (0..page_count)
            .map(|i| format!("{} 0 R", 3 + 2 * i))
            .collect();
        pdf.push_str(&format!(
            "2 0 obj\n<< /Type /Pages /Kids [{}] /Count {page_count} >>\nendobj\n",
            kids.join(" ")
        ));

        for (i, stream) in self.pages.iter().enumerate() {
            let page_id = 3 + 2 * i;
            let content_id = page_id + 1;

            // Page object
            offsets.push(pdf.len());
            pdf.push_str(&format!("{page_id} 0 obj\n<< /Type /Page /Parent 2 0 R "));
            pdf.push_str(&format!(
                "/MediaBox [0 0 {PAGE_WIDTH:.0} {PAGE_HEIGHT:.0}] "
            ));
            pdf.push_str(&format!(
                "/Contents {content_id} 0 R /Resources << /Font << \
                 /F1 {font_bold_id} 0 R /F2 {font_body_id} 0 R >> >> >>\nendobj\n"
            ));

            // Content stream
            offsets.push(pdf.len());
            pdf.push_str(&format!(
                "{content_id} 0 obj\n<< /Length {} >>\nstream\n{}\nendstream\nendobj\n",
                stream.len(),
                stream
            ));
        }

        // Fonts
        offsets.push(pdf.len());
        pdf.push_str(&format!(
            "{font_bold_id} 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold >>\nendobj\n"
        ));
        offsets.push(pdf.len());
        pdf.push_str(&format!(
            "{font_body_id} 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>\nendobj\n"
        ));

        // Info (title)
        offsets.push(pdf.len());
        pdf.push_str(&format!(
            "{info_id} 0 obj\n<< /Title ({}) /Producer (rollbook) >>\nendobj\n",
            pdf_escape(title)
        ));

        // Cross-reference table
        let xref_offset = pdf.len();
        let num_objects = offsets.len() + 1; // +1 for the free entry
        pdf.push_str(&format!("xref\n0 {num_objects}\n"));
        pdf.push_str("0000000000 65535 f \n");
        for offset in &offsets {
            pdf.push_str(&format!("{offset:010} 00000 n \n"));
        }

        // Trailer
        pdf.push_str(&format!(
            "trailer\n<< /Size {num_objects} /Root 1 0 R /Info {info_id} 0 R >>\n"
        ));
        pdf.push_str(&format!("startxref\n{xref_offset}\n%%EOF\n"));

        pdf.into_bytes()
    }
}
