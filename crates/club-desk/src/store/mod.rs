//! Record store shared by the feedback and registration workflows.
//!
//! Workflows talk to storage through their own repository traits; this module
//! provides the libSQL implementation backing all of them.

mod libsql_store;
mod migrations;

pub use libsql_store::LibSqlStore;

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("stored record is malformed: {0}")]
    Corrupt(String),
}

impl From<libsql::Error> for RepositoryError {
    fn from(value: libsql::Error) -> Self {
        let message = value.to_string();
        if message.contains("UNIQUE constraint failed") {
            Self::Conflict
        } else {
            Self::Unavailable(message)
        }
    }
}
