pub mod config;
pub mod error;
pub mod logging;
pub mod persistence;

pub use config::ServerConfig;
pub use error::RollbookError;
pub use persistence::{Database, NewStudent, StudentRecord};
