//! `iconpack export`: select icons by name or id and write a zip archive.

use crate::{
    client::{
        app::{LOADING_ICONS, PACKAGING_DOWNLOAD},
        http_app,
    },
    config::AppConfig,
    log,
};
use anyhow::{Context, Result, bail};
use owo_colors::OwoColorize;

pub fn run_export(config: &AppConfig, select: &[String], all: bool) -> Result<()> {
    if select.is_empty() && !all {
        bail!("nothing to export: name icons to select or pass --all");
    }

    let mut app = http_app(&config.client.server, &config.client.output)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    log!("export"; "{}...", LOADING_ICONS);
    runtime
        .block_on(app.init())
        .with_context(|| format!("failed to load icons from {}", config.client.server))?;

    if all {
        app.select_all(true);
    } else {
        for term in app.select_matching(select) {
            log!("export"; "{}", format!("no icon matches `{term}`").yellow());
        }
    }

    let selected = app.counter().count;
    if selected > 0 {
        log!("export"; "{} ({} icons)...", PACKAGING_DOWNLOAD, selected);
    }
    let report = runtime.block_on(app.download_selected())?;
    log!(
        "export";
        "packaged {} icons into {}",
        report.packaged,
        report.path.display().bright_green()
    );
    if !report.skipped.is_empty() {
        log!("export"; "{}", format!("{} icons skipped", report.skipped.len()).yellow());
    }
    Ok(())
}
