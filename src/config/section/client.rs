//! `[client]` section configuration.
//!
//! ```toml
//! [client]
//! server = "http://localhost:3000"    # Catalog server base url
//! output = "downloads"                # Where exported archives are saved
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Catalog client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub server: String,
    pub output: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: "http://localhost:3000".to_string(),
            output: PathBuf::from("."),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_client_config() {
        let config =
            test_parse_config("[client]\nserver = \"http://icons.local:9000\"\noutput = \"out\"");
        assert_eq!(config.client.server, "http://icons.local:9000");
        assert_eq!(config.client.output, std::path::Path::new("out"));
    }

    #[test]
    fn test_client_config_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.client.server, "http://localhost:3000");
    }
}
