//! Default database search tool.
//!
//! Handler behind the reserved `search_databases` tool. Arguments:
//!
//! ```json
//! {"database": "uniprot", "ids": ["P00722", "P00723"]}
//! ```
//!
//! Ids are fetched through the [`RecordFetcher`] port, at most
//! [`DEFAULT_LOOKUP_CONCURRENCY`] at a time, in request order. The output
//! lists the records found and a per-id error for the rest:
//!
//! ```json
//! {"database": "uniprot", "records": [{"id": "P00722", "record": {...}}], "errors": []}
//! ```
//!
//! Partial failure is a success. When nothing could be fetched and at least
//! one failure was transient, the call fails so the executor retries it.

use crate::ports::record_fetcher::{FetchError, RecordFetcher};
use crate::ports::tool_handler::ToolHandler;
use async_trait::async_trait;
use enzymeml_domain::{Database, ToolError, ToolOutput};
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Lookups in flight at once for one search call.
pub const DEFAULT_LOOKUP_CONCURRENCY: usize = 4;

#[derive(Debug, Deserialize)]
struct SearchArguments {
    database: String,
    ids: Vec<String>,
}

pub struct DatabaseSearchTool {
    fetcher: Arc<dyn RecordFetcher>,
    concurrency: usize,
}

impl DatabaseSearchTool {
    pub fn new(fetcher: Arc<dyn RecordFetcher>) -> Self {
        Self {
            fetcher,
            concurrency: DEFAULT_LOOKUP_CONCURRENCY,
        }
    }

    /// Cap on concurrent lookups. Zero is raised to one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Shared handler, ready for `ToolRegistry::with_default_tool`.
    pub fn handler(fetcher: Arc<dyn RecordFetcher>) -> Arc<dyn ToolHandler> {
        Arc::new(Self::new(fetcher))
    }

    async fn search(&self, database: Database, ids: Vec<String>) -> Result<Value, ToolError> {
        let lookups: Vec<_> = ids.iter().map(|id| self.fetcher.fetch(database, id)).collect();
        let outcomes: Vec<_> = stream::iter(lookups)
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut records = Vec::new();
        let mut errors = Vec::new();
        let mut transient = false;
        for (id, outcome) in ids.iter().zip(outcomes) {
            match outcome {
                Ok(record) => records.push(json!({ "id": id, "record": record })),
                Err(e) => {
                    transient |= is_transient(&e);
                    errors.push(json!({ "id": id, "message": e.to_string() }));
                }
            }
        }
        debug!(
            database = %database,
            found = records.len(),
            failed = errors.len(),
            "Database search finished"
        );

        if records.is_empty() && transient {
            return Err(ToolError::execution_failed(format!(
                "All {} {} lookups failed",
                ids.len(),
                database.display_name()
            ))
            .with_details(Value::Array(errors).to_string()));
        }

        Ok(json!({
            "database": database,
            "records": records,
            "errors": errors,
        }))
    }
}

fn is_transient(error: &FetchError) -> bool {
    match error {
        FetchError::Transport(_) => true,
        FetchError::Http { status, .. } => *status == 429 || *status >= 500,
        _ => false,
    }
}

#[async_trait]
impl ToolHandler for DatabaseSearchTool {
    async fn call(
        &self,
        arguments: Value,
        cancel: CancellationToken,
    ) -> Result<ToolOutput, ToolError> {
        let args: SearchArguments = serde_json::from_value(arguments)
            .map_err(|e| ToolError::invalid_arguments(format!("Invalid search arguments: {}", e)))?;
        let database: Database = args
            .database
            .parse()
            .map_err(|e: enzymeml_domain::DomainError| ToolError::invalid_arguments(e.to_string()))?;
        if args.ids.is_empty() {
            return Err(ToolError::invalid_arguments("No identifiers given"));
        }

        tokio::select! {
            _ = cancel.cancelled() => Err(ToolError::execution_failed("Database search cancelled")),
            result = self.search(database, args.ids) => result.map(ToolOutput::Json),
        }
    }
}
