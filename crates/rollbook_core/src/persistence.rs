use anyhow::{Context, Result};
use rusqlite::{Connection, params};
use std::path::PathBuf;
use tracing::info;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A department student record as stored in the `students` table.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentRecord {
    pub id: i64,
    pub student_name: String,
    pub enrollment_number: String,
    pub course: String,
    pub year: i32,
    pub contact_number: Option<String>,
    pub email: Option<String>,
}

/// Insertable student fields; the id is assigned by the store.
#[derive(Debug, Clone, Copy)]
pub struct NewStudent<'a> {
    pub student_name: &'a str,
    pub enrollment_number: &'a str,
    pub course: &'a str,
    pub year: i32,
    pub contact_number: Option<&'a str>,
    pub email: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Database
// ---------------------------------------------------------------------------

/// SQLite store for department student records.
///
/// The export endpoints only ever read; [`Database::insert_student`] exists
/// for tests and out-of-band seeding.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (or creates) the SQLite database at the given path.
    pub fn open_at(path: PathBuf) -> Result<Self> {
        let conn = Connection::open(&path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;

        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        let db = Self { conn };
        db.init_schema()?;
        info!("Database opened at {}", path.display());
        Ok(db)
    }

    /// Opens an in-memory database (for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;

        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Creates the schema if it does not already exist.
    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS students (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                student_name TEXT NOT NULL,
                enrollment_number TEXT NOT NULL,
                course TEXT NOT NULL,
                year INTEGER NOT NULL,
                contact_number TEXT,
                email TEXT
            );
            ",
        )?;
        Ok(())
    }

    /// Returns every student record in primary-key order.
    ///
    /// The returned vector is a snapshot: inserts that happen afterwards do
    /// not affect a vector already handed out.
    pub fn fetch_all(&self) -> Result<Vec<StudentRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, student_name, enrollment_number, course, year, contact_number, email
             FROM students
             ORDER BY id",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(StudentRecord {
                id: row.get(0)?,
                student_name: row.get(1)?,
                enrollment_number: row.get(2)?,
                course: row.get(3)?,
                year: row.get(4)?,
                contact_number: row.get(5)?,
                email: row.get(6)?,
            })
        })?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row.context("Failed to read student row")?);
        }
        Ok(result)
    }

    /// Inserts a student and returns the assigned id.
    pub fn insert_student(&self, student: &NewStudent) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO students
                     (student_name, enrollment_number, course, year, contact_number, email)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    student.student_name,
                    student.enrollment_number,
                    student.course,
                    student.year,
                    student.contact_number,
                    student.email,
                ],
            )
            .context("Failed to insert student")?;
        Ok(self.conn.last_insert_rowid())
    }
}
