//! Public biochemical databases reachable through the default tool.
//!
//! | Database | Identifier example |
//! |----------|--------------------|
//! | ChEBI    | `CHEBI:15377`      |
//! | PDB      | `1A0O`             |
//! | UniProt  | `P00722`           |
//! | Rhea     | `RHEA:10000`       |
//! | PubChem  | `962`              |
//!
//! The domain only knows the catalogue and the tool declaration; record
//! retrieval lives behind the application's `RecordFetcher` port.

use crate::core::error::DomainError;
use crate::tool::ToolSpec;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::str::FromStr;

/// Reserved name of the default database search tool.
pub const DATABASE_SEARCH_TOOL: &str = "search_databases";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Chebi,
    Pdb,
    Uniprot,
    Rhea,
    Pubchem,
}

impl Database {
    pub const ALL: [Database; 5] = [
        Database::Chebi,
        Database::Pdb,
        Database::Uniprot,
        Database::Rhea,
        Database::Pubchem,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Database::Chebi => "chebi",
            Database::Pdb => "pdb",
            Database::Uniprot => "uniprot",
            Database::Rhea => "rhea",
            Database::Pubchem => "pubchem",
        }
    }

    /// Human readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Database::Chebi => "ChEBI",
            Database::Pdb => "PDB",
            Database::Uniprot => "UniProt",
            Database::Rhea => "Rhea",
            Database::Pubchem => "PubChem",
        }
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Database {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Database::ALL
            .into_iter()
            .find(|db| db.as_str() == lowered)
            .ok_or_else(|| DomainError::UnknownDatabase(s.to_string()))
    }
}

/// Declaration of the default tool offered to the model.
pub fn database_search_spec() -> ToolSpec {
    let names: Vec<&str> = Database::ALL.iter().map(Database::as_str).collect();
    ToolSpec::new(
        DATABASE_SEARCH_TOOL,
        "Fetch records from public biochemical databases (ChEBI, PDB, UniProt, Rhea, PubChem) by identifier.",
    )
    .with_parameters(json!({
        "type": "object",
        "properties": {
            "database": {
                "type": "string",
                "enum": names,
                "description": "Database to query"
            },
            "ids": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Record identifiers to fetch"
            }
        },
        "required": ["database", "ids"],
        "additionalProperties": false
    }))
    .with_strict(true)
}
