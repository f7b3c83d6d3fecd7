//! Configuration section definitions.
//!
//! Each module corresponds to a section in `iconpack.toml`:
//!
//! | Module   | TOML Section | Purpose                               |
//! |----------|--------------|---------------------------------------|
//! | `figma`  | `[figma]`    | Design document ids and credentials   |
//! | `serve`  | `[serve]`    | Catalog server                        |
//! | `client` | `[client]`   | Catalog client (server url, output)   |

mod client;
mod figma;
mod serve;

pub use client::ClientConfig;
pub use figma::FigmaConfig;
pub use serve::ServeConfig;
