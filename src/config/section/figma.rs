//! `[figma]` section configuration.
//!
//! ```toml
//! [figma]
//! api = "https://api.figma.com/v1"
//! file_id = "AbC123"           # or FIGMA_FILE_ID
//! group_node_id = "10:1"       # or GROUP_NODE_ID
//! # token = "..."              # prefer FIGMA_TOKEN
//! ```

use serde::{Deserialize, Serialize};

/// Design document coordinates and credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FigmaConfig {
    /// REST api base url.
    pub api: String,

    /// Document key.
    pub file_id: Option<String>,

    /// Group node containing the icon component set.
    pub group_node_id: Option<String>,

    /// Personal access token.
    #[serde(skip_serializing)]
    pub token: Option<String>,
}

impl Default for FigmaConfig {
    fn default() -> Self {
        Self {
            api: "https://api.figma.com/v1".to_string(),
            file_id: None,
            group_node_id: None,
            token: None,
        }
    }
}

impl FigmaConfig {
    pub fn has_file_id(&self) -> bool {
        self.file_id.as_deref().is_some_and(|v| !v.trim().is_empty())
    }

    pub fn has_group_node_id(&self) -> bool {
        self.group_node_id
            .as_deref()
            .is_some_and(|v| !v.trim().is_empty())
    }
}
