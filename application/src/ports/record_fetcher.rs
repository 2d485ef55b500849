//! Record fetcher port
//!
//! Retrieves one raw record from a public biochemical database. Mapping the
//! record into document entities is out of scope; the fetcher returns the
//! upstream body as JSON.

use async_trait::async_trait;
use enzymeml_domain::Database;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while fetching a record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("{database} record not found: {id}")]
    NotFound { database: Database, id: String },

    #[error("HTTP {status} from {database}: {message}")]
    Http {
        database: Database,
        status: u16,
        message: String,
    },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Database not configured: {0}")]
    NotConfigured(Database),
}

/// Port for fetching raw database records
#[async_trait]
pub trait RecordFetcher: Send + Sync {
    async fn fetch(&self, database: Database, id: &str) -> Result<Value, FetchError>;
}
