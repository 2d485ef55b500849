//! Database access configuration from TOML (`[databases]` section)

use enzymeml_domain::Database;
use serde::{Deserialize, Serialize};

/// Raw database access configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDatabasesConfig {
    /// HTTP request timeout in seconds
    pub timeout_seconds: u64,
    pub user_agent: String,
    /// Base URL overrides, keyed by database
    pub base_urls: FileDatabaseUrls,
}

impl Default for FileDatabasesConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: format!("enzymeml-llm/{}", env!("CARGO_PKG_VERSION")),
            base_urls: FileDatabaseUrls::default(),
        }
    }
}

/// `[databases.base_urls]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDatabaseUrls {
    pub chebi: Option<String>,
    pub pdb: Option<String>,
    pub uniprot: Option<String>,
    pub rhea: Option<String>,
    pub pubchem: Option<String>,
}

impl FileDatabaseUrls {
    pub fn get(&self, database: Database) -> Option<&str> {
        let url = match database {
            Database::Chebi => &self.chebi,
            Database::Pdb => &self.pdb,
            Database::Uniprot => &self.uniprot,
            Database::Rhea => &self.rhea,
            Database::Pubchem => &self.pubchem,
        };
        url.as_deref()
    }
}
