//! Core process state shared across commands.

mod state;

pub use state::{is_shutdown, register_server, set_interactive, setup_shutdown_handler};
