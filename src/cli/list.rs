//! `iconpack list`: load the catalog from a server and print it.

use crate::{
    client::{app::LOADING_ICONS, http_app, render::EmbedState},
    config::AppConfig,
    log,
};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::io::Write;

pub fn run_list(config: &AppConfig, preview: bool) -> Result<()> {
    let mut app = http_app(&config.client.server, &config.client.output)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    log!("list"; "{}...", LOADING_ICONS);
    runtime
        .block_on(app.init())
        .with_context(|| format!("failed to load icons from {}", config.client.server))?;
    if preview {
        let loaded = runtime.block_on(app.load_all());
        log!("list"; "loaded {} vector documents", loaded);
    }

    let mut stdout = std::io::stdout().lock();
    for card in app.renderer().container().cards() {
        let detail = match &card.embed.state {
            EmbedState::Loaded(doc) => match doc.size {
                Some((w, h)) => format!("{w}x{h}"),
                None => "loaded".to_string(),
            },
            EmbedState::Failed(reason) => format!("{}", reason.red()),
            _ => String::new(),
        };
        writeln!(stdout, "{:<12} {:<32} {}", card.id.dimmed(), card.name, detail)?;
    }
    log!("list"; "{} icons", app.catalog().len());
    Ok(())
}
