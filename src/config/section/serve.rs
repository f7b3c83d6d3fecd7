//! `[serve]` section configuration.
//!
//! Contains catalog server settings.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! interface = "127.0.0.1"                  # Network interface (127.0.0.1 = localhost only)
//! port = 3000                              # HTTP port number (or PORT)
//! public = "public"                        # Static files served at /
//! cors_origin = "http://localhost:3000"    # Allowed cross-origin caller
//! development = false                      # Attach error details to 500 responses
//! ```

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Catalog server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Network interface to bind.
    pub interface: IpAddr,

    /// HTTP port number.
    pub port: u16,

    /// Directory of static files.
    pub public: PathBuf,

    /// Value of `Access-Control-Allow-Origin`.
    pub cors_origin: String,

    /// Include error chains in failure responses.
    pub development: bool,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 3000,
            public: PathBuf::from("public"),
            cors_origin: "http://localhost:3000".to_string(),
            development: false,
        }
    }
}
