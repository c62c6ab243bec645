use std::sync::Arc;

use chrono::NaiveDateTime;
use parking_lot::Mutex;

use rollbook_core::{Database, NewStudent, RollbookError};
use rollbook_server::export::{self, SharedDatabase};

fn shared(db: Database) -> SharedDatabase {
    Arc::new(Mutex::new(db))
}

fn seed_students(db: &Database, count: usize) {
    for i in 0..count {
        db.insert_student(&NewStudent {
            student_name: &format!("Student {i}"),
            enrollment_number: &format!("EN-{i:03}"),
            course: "CSE",
            year: 2,
            contact_number: Some("5550100"),
            email: Some("student@example.edu"),
        })
        .unwrap();
    }
}

fn pdf_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn page_count(content: &str) -> usize {
    content.matches("/Type /Page ").count()
}

/// Every `Generated on:` header string in the document, without the prefix.
fn generated_on_timestamps(content: &str) -> Vec<String> {
    const PREFIX: &str = "Generated on: ";
    content
        .match_indices(PREFIX)
        .map(|(idx, _)| {
            let rest = &content[idx + PREFIX.len()..];
            let end = rest.find(')').expect("unterminated header string");
            rest[..end].to_string()
        })
        .collect()
}

/// All text-show operators except the per-page timestamps.
fn text_ops_without_timestamps(content: &str) -> Vec<&str> {
    content
        .lines()
        .filter(|line| line.ends_with(" Tj") && !line.contains("Generated on:"))
        .collect()
}

#[tokio::test]
async fn pdf_export_contains_every_record() {
    let db = Database::open_in_memory().unwrap();
    seed_students(&db, 3);

    let bytes = export::export_pdf(shared(db)).await.unwrap();
    assert!(bytes.starts_with(b"%PDF"));

    let content = pdf_text(&bytes);
    assert_eq!(page_count(&content), 1);
    for i in 0..3 {
        assert!(content.contains(&format!("(Student {i}) Tj")));
    }
    assert!(content.contains("(CSE Department Student List) Tj"));
    assert!(content.contains("(Page: 1) Tj"));
}

#[tokio::test]
async fn pdf_header_timestamp_is_parseable() {
    let db = Database::open_in_memory().unwrap();
    seed_students(&db, 1);

    let bytes = export::export_pdf(shared(db)).await.unwrap();
    let timestamps = generated_on_timestamps(&pdf_text(&bytes));
    assert_eq!(timestamps.len(), 1);

    // `August 04, 2026 09:15 AM` must round-trip through the same format.
    NaiveDateTime::parse_from_str(&timestamps[0], "%B %d, %Y %I:%M %p")
        .expect("header timestamp should parse");
}

#[tokio::test]
async fn empty_store_yields_no_records_for_both_formats() {
    let db = shared(Database::open_in_memory().unwrap());

    let pdf = export::export_pdf(db.clone()).await;
    assert!(matches!(pdf, Err(RollbookError::NoRecords)));

    let xlsx = export::export_xlsx(db).await;
    assert!(matches!(xlsx, Err(RollbookError::NoRecords)));
}

#[tokio::test]
async fn xlsx_export_produces_workbook_bytes() {
    let db = Database::open_in_memory().unwrap();
    seed_students(&db, 5);

    let bytes = export::export_xlsx(shared(db)).await.unwrap();
    assert!(bytes.len() > 100);
    assert_eq!(&bytes[0..2], b"PK");
}

#[tokio::test]
async fn multi_page_export_numbers_every_page() {
    let db = Database::open_in_memory().unwrap();
    seed_students(&db, 100);

    let bytes = export::export_pdf(shared(db)).await.unwrap();
    let content = pdf_text(&bytes);

    let pages = page_count(&content);
    assert!(pages >= 2, "100 records should span multiple pages");

    for page in 1..=pages {
        assert!(content.contains(&format!("(Page: {page}) Tj")));
    }
    assert!(!content.contains(&format!("(Page: {}) Tj", pages + 1)));

    // One decoration pass per page, no page decorated twice.
    assert_eq!(generated_on_timestamps(&content).len(), pages);
}

#[tokio::test]
async fn row_content_is_deterministic_across_runs() {
    let db = Database::open_in_memory().unwrap();
    seed_students(&db, 10);
    let db = shared(db);

    let first = export::export_pdf(db.clone()).await.unwrap();
    let second = export::export_pdf(db).await.unwrap();

    let first_text = pdf_text(&first);
    let second_text = pdf_text(&second);
    assert_eq!(
        text_ops_without_timestamps(&first_text),
        text_ops_without_timestamps(&second_text)
    );
}

#[tokio::test]
async fn missing_contact_renders_na_in_the_document() {
    let db = Database::open_in_memory().unwrap();
    db.insert_student(&NewStudent {
        student_name: "Asha",
        enrollment_number: "E1",
        course: "CSE",
        year: 2,
        contact_number: None,
        email: Some("a@x.com"),
    })
    .unwrap();

    let bytes = export::export_pdf(shared(db)).await.unwrap();
    assert!(pdf_text(&bytes).contains("(N/A / a@x.com) Tj"));
}
