//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Browse, select and export icons from a design-tool component set
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: iconpack.toml)
    #[arg(short = 'C', long, global = true, default_value = "iconpack.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve the icon catalog API and the static client files
    #[command(visible_alias = "s")]
    Serve {
        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Include error details in API responses
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        development: Option<bool>,
    },

    /// Resolve the catalog from the design API once and print it as JSON
    #[command(visible_alias = "r")]
    Resolve {
        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Load the catalog from a server and list the icons
    #[command(visible_alias = "l")]
    List {
        #[command(flatten)]
        client: ClientArgs,

        /// Load every vector document and report its size
        #[arg(short = 'P', long)]
        preview: bool,
    },

    /// Select icons and package them into a zip archive
    #[command(visible_alias = "e")]
    Export {
        #[command(flatten)]
        client: ClientArgs,

        /// Icon names or ids to select
        #[arg(value_name = "ICON")]
        select: Vec<String>,

        /// Select every icon in the catalog
        #[arg(short, long, conflicts_with = "select")]
        all: bool,
    },

    /// Interactive terminal catalog
    #[command(visible_alias = "b")]
    Browse {
        #[command(flatten)]
        client: ClientArgs,
    },
}

/// Shared arguments for commands that talk to a catalog server
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ClientArgs {
    /// Catalog server base url (e.g., http://localhost:3000)
    #[arg(short, long, value_hint = clap::ValueHint::Url)]
    pub server: Option<String>,

    /// Directory the exported archive is written to
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,
}

#[allow(unused)]
impl Cli {
    pub const fn is_serve(&self) -> bool {
        matches!(self.command, Commands::Serve { .. })
    }
    pub const fn is_browse(&self) -> bool {
        matches!(self.command, Commands::Browse { .. })
    }
}
