//! REST record fetcher.
//!
//! | Database | Default endpoint | Request |
//! |----------|------------------|---------|
//! | ChEBI | `www.ebi.ac.uk/webservices/chebi/2.0/test/getCompleteEntity` | `?chebiId={id}` |
//! | PDB | `data.rcsb.org/rest/v1/core/entry` | `/{id}` |
//! | UniProt | `rest.uniprot.org/uniprotkb` | `/{id}.json` |
//! | Rhea | `www.rhea-db.org/rhea` | `?query={id}&format=tsv` |
//! | PubChem | `pubchem.ncbi.nlm.nih.gov/rest/pug/compound/cid` | `/{id}/JSON` |
//!
//! Bodies are returned as-is: JSON responses as JSON, anything else wrapped
//! as `{"text": ...}`. 404 maps to `NotFound`; other non-success statuses
//! map to `Http` with a truncated body.

use crate::config::FileDatabasesConfig;
use async_trait::async_trait;
use enzymeml_application::{FetchError, RecordFetcher};
use enzymeml_domain::Database;
use enzymeml_domain::core::string::truncate;
use reqwest::{StatusCode, Url, header};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Longest error body kept in `FetchError::Http`.
const MAX_ERROR_BODY: usize = 200;

fn default_base_url(database: Database) -> &'static str {
    match database {
        Database::Chebi => "https://www.ebi.ac.uk/webservices/chebi/2.0/test/getCompleteEntity",
        Database::Pdb => "https://data.rcsb.org/rest/v1/core/entry",
        Database::Uniprot => "https://rest.uniprot.org/uniprotkb",
        Database::Rhea => "https://www.rhea-db.org/rhea",
        Database::Pubchem => "https://pubchem.ncbi.nlm.nih.gov/rest/pug/compound/cid",
    }
}

pub struct RestRecordFetcher {
    client: reqwest::Client,
    base_urls: HashMap<Database, String>,
}

impl RestRecordFetcher {
    /// Build a fetcher from the `[databases]` configuration.
    pub fn new(config: &FileDatabasesConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| FetchError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        let base_urls = Database::ALL
            .into_iter()
            .map(|db| {
                let base = config.base_urls.get(db).unwrap_or(default_base_url(db));
                (db, base.trim_end_matches('/').to_string())
            })
            .collect();

        Ok(Self { client, base_urls })
    }

    /// URL of one record.
    pub fn record_url(&self, database: Database, id: &str) -> Result<Url, FetchError> {
        let base = self
            .base_urls
            .get(&database)
            .ok_or(FetchError::NotConfigured(database))?;
        let mut url = Url::parse(base).map_err(|_| FetchError::NotConfigured(database))?;
        let id = id.trim();

        match database {
            Database::Chebi => {
                url.query_pairs_mut().append_pair("chebiId", id);
            }
            Database::Rhea => {
                url.query_pairs_mut()
                    .append_pair("query", id)
                    .append_pair("columns", "rhea-id,equation,chebi-id,ec")
                    .append_pair("format", "tsv");
            }
            Database::Pdb | Database::Uniprot | Database::Pubchem => {
                let mut segments = url
                    .path_segments_mut()
                    .map_err(|_| FetchError::NotConfigured(database))?;
                match database {
                    Database::Uniprot => {
                        segments.push(&format!("{}.json", id));
                    }
                    Database::Pubchem => {
                        segments.push(id).push("JSON");
                    }
                    _ => {
                        segments.push(id);
                    }
                }
            }
        }
        Ok(url)
    }
}

/// Turn a response body into a record value.
fn decode_body(content_type: Option<&str>, body: String) -> Result<Value, FetchError> {
    let is_json = content_type.is_some_and(|ct| ct.contains("json"));
    if is_json {
        serde_json::from_str(&body).map_err(|e| FetchError::InvalidResponse(e.to_string()))
    } else {
        Ok(json!({ "text": body }))
    }
}

#[async_trait]
impl RecordFetcher for RestRecordFetcher {
    async fn fetch(&self, database: Database, id: &str) -> Result<Value, FetchError> {
        let url = self.record_url(database, id)?;
        debug!(database = %database, id, url = %url, "Fetching record");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                database,
                id: id.to_string(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Http {
                database,
                status: status.as_u16(),
                message: truncate(&body, MAX_ERROR_BODY),
            });
        }

        decode_body(content_type.as_deref(), body)
    }
}
