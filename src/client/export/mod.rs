//! Export pipeline.
//!
//! ```text
//! selected icons ──► fetch all concurrently ──► validate + optimize
//!                                                    │
//!                    skipped (logged) ◄── failures ──┤
//!                                                    ▼
//!                       <sanitized name>.svg entries ──► zip ──► FileSaver
//! ```

mod archive;
mod sanitize;

pub use archive::{DiskSaver, FileSaver, IconArchive};
pub use sanitize::{optimize_svg, sanitize_file_name};

use super::{
    fetch::{FetchError, VectorFetcher},
    selection::SelectedIcon,
};
use crate::{
    catalog::IconCatalog,
    debug, log,
    logger::{ProgressLine, unix_millis},
};
use futures_util::future::join_all;
use std::path::PathBuf;
use thiserror::Error;

/// Why a single icon was left out of the archive.
#[derive(Debug, Error)]
pub enum ItemFetchError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("no export location")]
    MissingLocation,

    #[error("response is not a vector document")]
    NotVector,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no icons selected")]
    NoSelection,

    #[error("all {0} icons failed to download")]
    AllItemsFailed(usize),

    #[error("failed to build archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("failed to save {file_name}: {source}")]
    Save {
        file_name: String,
        source: std::io::Error,
    },
}

/// Outcome of a successful export.
#[derive(Debug)]
pub struct ExportReport {
    pub path: PathBuf,
    pub packaged: usize,
    pub skipped: Vec<(SelectedIcon, ItemFetchError)>,
}

pub struct ExportPipeline<'a, F, S> {
    fetcher: &'a F,
    saver: &'a S,
}

impl<'a, F: VectorFetcher, S: FileSaver> ExportPipeline<'a, F, S> {
    pub fn new(fetcher: &'a F, saver: &'a S) -> Self {
        Self { fetcher, saver }
    }

    /// Package `selected` as `icons_<unix millis>.zip`.
    pub async fn export(
        &self,
        selected: &[SelectedIcon],
        catalog: &IconCatalog,
    ) -> Result<ExportReport, ExportError> {
        self.export_as(selected, catalog, format!("icons_{}.zip", unix_millis()))
            .await
    }

    pub async fn export_as(
        &self,
        selected: &[SelectedIcon],
        catalog: &IconCatalog,
        file_name: String,
    ) -> Result<ExportReport, ExportError> {
        if selected.is_empty() {
            return Err(ExportError::NoSelection);
        }

        let progress = ProgressLine::new(
            "export",
            &[("fetched", selected.len()), ("skipped", selected.len())],
        );
        let line = &progress;
        let results = join_all(selected.iter().map(|icon| async move {
            let result = fetch_item(self.fetcher, catalog, icon).await;
            line.inc(if result.is_ok() { "fetched" } else { "skipped" });
            result
        }))
        .await;
        progress.finish();

        let mut archive = IconArchive::new();
        let mut packaged = 0;
        let mut skipped = Vec::new();
        for (icon, result) in selected.iter().zip(results) {
            match result {
                Ok(svg) => {
                    archive.add(format!("{}.svg", sanitize_file_name(&icon.name)), svg);
                    packaged += 1;
                }
                Err(e) => {
                    log!("export"; "{}", skip_message(icon, &e));
                    skipped.push((icon.clone(), e));
                }
            }
        }

        if archive.is_empty() {
            return Err(ExportError::AllItemsFailed(selected.len()));
        }

        debug!("export"; "{} entries from {} fetched icons", archive.len(), packaged);
        let bytes = archive.finish()?;
        let path = self
            .saver
            .save(&bytes, &file_name)
            .map_err(|source| ExportError::Save { file_name, source })?;

        Ok(ExportReport {
            path,
            packaged,
            skipped,
        })
    }
}

/// Log line for an icon left out of the archive.
fn skip_message(icon: &SelectedIcon, reason: &ItemFetchError) -> String {
    format!("skipped {}: {}", icon.name, reason)
}

/// Fetch one icon and check that the raw body opens with `<svg`. Leading
/// whitespace is allowed; a prolog or comment before the root is not.
async fn fetch_item<F: VectorFetcher>(
    fetcher: &F,
    catalog: &IconCatalog,
    icon: &SelectedIcon,
) -> Result<String, ItemFetchError> {
    let location = catalog
        .location(&icon.id)
        .ok_or(ItemFetchError::MissingLocation)?;
    let body = fetcher.fetch(location).await?;
    if !body.trim_start().starts_with("<svg") {
        return Err(ItemFetchError::NotVector);
    }
    Ok(optimize_svg(&body))
}

#[cfg(test)]
mod tests;
