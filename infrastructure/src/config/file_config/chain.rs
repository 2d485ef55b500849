//! Chain configuration from TOML (`[chain]` section)

use serde::{Deserialize, Serialize};

/// Raw chain configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChainConfig {
    /// Depth of the first planning round (1-based)
    pub depth: usize,
    /// Last depth at which another planning round may start
    pub total_depth: usize,
    /// Correlation id stamped on every chain event
    pub conversation_id: Option<String>,
}

impl Default for FileChainConfig {
    fn default() -> Self {
        Self {
            depth: 1,
            total_depth: 1,
            conversation_id: None,
        }
    }
}
