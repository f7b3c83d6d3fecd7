//! Configuration management for `iconpack.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── client     # [client]
//! │   ├── figma      # [figma]
//! │   └── serve      # [serve]
//! ├── types/         # ConfigError, ConfigDiagnostics
//! └── mod.rs         # AppConfig (this file)
//! ```
//!
//! # Precedence
//!
//! defaults < `iconpack.toml` < environment < command line
//!
//! | Variable        | Field                   |
//! |-----------------|-------------------------|
//! | `FIGMA_TOKEN`   | `figma.token`           |
//! | `FIGMA_FILE_ID` | `figma.file_id`         |
//! | `GROUP_NODE_ID` | `figma.group_node_id`   |
//! | `PORT`          | `serve.port`            |
//! | `NODE_ENV`      | `serve.development`     |

pub mod section;
pub mod types;
mod util;

use util::{find_config_file, non_empty};

pub use section::{ClientConfig, FigmaConfig, ServeConfig};
pub use types::{ConfigDiagnostics, ConfigError};

use crate::{
    cli::{ClientArgs, Cli, Commands},
    debug, log,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing iconpack.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Absolute path to the config file, empty when none was found
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Directory relative paths are resolved against
    #[serde(skip)]
    pub root: PathBuf,

    /// Design document settings
    #[serde(default)]
    pub figma: FigmaConfig,

    /// Catalog server settings
    #[serde(default)]
    pub serve: ServeConfig,

    /// Catalog client settings
    #[serde(default)]
    pub client: ClientConfig,
}

impl AppConfig {
    /// Load configuration for a CLI invocation.
    ///
    /// Searches upward from cwd for the config file; a missing file is not an
    /// error since every setting has a default or an environment variable.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map(Path::to_path_buf).unwrap_or(cwd);
                config.config_path = path;
                config
            }
            None => {
                debug!("config"; "{} not found, using defaults", cli.config.display());
                Self {
                    root: cwd,
                    ..Self::default()
                }
            }
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.apply_command_options(cli);
        config.normalize_paths();
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from TOML string
    #[cfg(test)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            let display_path = path
                .file_name()
                .map(|n| n.to_string_lossy())
                .unwrap_or_else(|| path.to_string_lossy());
            log!("warning"; "ignoring unknown fields in {}: {}", display_path, ignored.join(", "));
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    // ========================================================================
    // overrides
    // ========================================================================

    /// Apply environment overrides through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = non_empty(lookup("FIGMA_TOKEN")) {
            self.figma.token = Some(token);
        }
        if let Some(file_id) = non_empty(lookup("FIGMA_FILE_ID")) {
            self.figma.file_id = Some(file_id);
        }
        if let Some(group) = non_empty(lookup("GROUP_NODE_ID")) {
            self.figma.group_node_id = Some(group);
        }
        if let Some(port) = non_empty(lookup("PORT")) {
            match port.trim().parse() {
                Ok(port) => self.serve.port = port,
                Err(_) => log!("warning"; "ignoring invalid PORT `{}`", port),
            }
        }
        if let Some(env) = non_empty(lookup("NODE_ENV")) {
            self.serve.development = env.trim() == "development";
        }
    }

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Serve {
                interface,
                port,
                development,
            } => {
                Self::update_option(&mut self.serve.interface, interface.as_ref());
                Self::update_option(&mut self.serve.port, port.as_ref());
                Self::update_option(&mut self.serve.development, development.as_ref());
            }
            Commands::Resolve { .. } => {}
            Commands::List { client, .. } => self.apply_client_args(client),
            Commands::Export { client, .. } | Commands::Browse { client } => {
                self.apply_client_args(client);
            }
        }
    }

    fn apply_client_args(&mut self, args: &ClientArgs) {
        Self::update_option(&mut self.client.server, args.server.as_ref());
        Self::update_option(&mut self.client.output, args.output.as_ref());
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Resolve relative directories against the config root.
    fn normalize_paths(&mut self) {
        self.serve.public = self.root_join(&self.serve.public);
        self.client.output = self.root_join(&self.client.output);
    }

    /// Join a path with the root directory.
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        crate::utils::path::normalize_path(&self.root.join(path))
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration, collecting all errors at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        if self.serve.port == 0 {
            diag.error("serve.port", "port must be between 1 and 65535");
        }

        if !is_http_url(&self.figma.api) {
            diag.error_with_hint(
                "figma.api",
                format!("`{}` is not an http(s) url", self.figma.api),
                "the default is https://api.figma.com/v1",
            );
        }

        if !is_http_url(&self.client.server) {
            diag.error_with_hint(
                "client.server",
                format!("`{}` is not an http(s) url", self.client.server),
                "pass --server http://host:port",
            );
        }

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

fn is_http_url(value: &str) -> bool {
    url::Url::parse(value).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> AppConfig {
    let (parsed, ignored) = AppConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
