//! Command-line interface module.

mod args;
pub mod browse;
pub mod export;
pub mod list;
pub mod resolve;
pub mod serve;

pub use args::{Cli, ClientArgs, Commands};
