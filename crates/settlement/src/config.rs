//! Engine configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Longest accepted borrow or repay path
    #[serde(default = "default_max_path_len")]
    pub max_path_len: usize,
}

fn default_max_path_len() -> usize {
    16
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_path_len: default_max_path_len(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from JSON file
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}
