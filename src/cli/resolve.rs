//! `iconpack resolve`: build the catalog once and print it.

use crate::{
    catalog::{IconCatalog, IconSource, build_catalog},
    config::AppConfig,
    debug,
    figma::FigmaClient,
};
use anyhow::{Context, Result};
use std::io::Write;

pub fn run_resolve(config: &AppConfig, pretty: bool) -> Result<()> {
    let source = IconSource::from_config(&config.figma)?;
    let api = FigmaClient::new(&config.figma.api, source.token.clone())?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;
    let catalog = runtime.block_on(build_catalog(&api, &source))?;
    debug!("catalog"; "resolved {} icons", catalog.len());

    let json = to_json(&catalog, pretty)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}")?;
    Ok(())
}

fn to_json(catalog: &IconCatalog, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(catalog)?
    } else {
        serde_json::to_string(catalog)?
    };
    Ok(json)
}
