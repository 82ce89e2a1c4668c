use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PokerNodeError, Result};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NodeConfig {
    /// Stable id of this node on the bus.
    pub node_id: String,
    pub topic: Option<String>,
    pub initialization_timeout_secs: Option<u64>,
}

impl NodeConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| PokerNodeError::Config(e.to_string()))?;
        let config: NodeConfig =
            serde_json::from_str(&content).map_err(|e| PokerNodeError::Config(e.to_string()))?;
        if config.node_id.trim().is_empty() {
            return Err(PokerNodeError::Config("node_id must not be empty".to_string()));
        }
        Ok(config)
    }

    pub fn topic(&self) -> &str {
        self.topic.as_deref().unwrap_or("planning-poker")
    }

    pub fn initialization_timeout_secs(&self) -> u64 {
        self.initialization_timeout_secs.unwrap_or(60)
    }
}
