//! HTTP endpoints that export department student records as downloadable
//! PDF or XLSX documents.

pub mod export;
pub mod routes;

pub use routes::{AppState, router};
