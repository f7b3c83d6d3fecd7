//! Application controller.
//!
//! Owns the store, the renderer and the selection, and wraps every user
//! operation in the loading indicator. Failures end up in a banner that
//! dismisses itself after [`BANNER_TIMEOUT`].

use super::{
    export::{ExportError, ExportPipeline, ExportReport, FileSaver},
    fetch::VectorFetcher,
    render::Renderer,
    selection::{self, SelectionCounter, SelectionTracker},
    source::CatalogSource,
    store::{IconStore, ReloadOutcome, StoreError},
};
use crate::{catalog::IconCatalog, debug};
use futures_util::future::join_all;
use parking_lot::Mutex;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};

pub const BANNER_TIMEOUT: Duration = Duration::from_secs(5);

pub const LOADING_ICONS: &str = "loading icons";
pub const REFRESHING_ICONS: &str = "refreshing icons";
pub const PACKAGING_DOWNLOAD: &str = "packaging download";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Banner {
    message: String,
    shown_at: Instant,
}

#[derive(Debug, Default)]
struct StatusState {
    loading: Option<&'static str>,
    banner: Option<Banner>,
}

/// Loading indicator plus the current error banner.
///
/// Clones share one state, so a redraw can read it while an operation is
/// still running against the app.
#[derive(Debug, Clone, Default)]
pub struct StatusBar(Arc<Mutex<StatusState>>);

/// Clears the loading indicator however the operation ends.
pub struct Loading<'a>(&'a StatusBar);

impl Drop for Loading<'_> {
    fn drop(&mut self) {
        self.0.0.lock().loading = None;
    }
}

impl StatusBar {
    pub fn loading(&self) -> Option<&'static str> {
        self.0.lock().loading
    }

    pub fn banner(&self) -> Option<String> {
        self.0.lock().banner.as_ref().map(|b| b.message.clone())
    }

    /// Show `message` until the returned guard drops.
    pub fn begin(&self, message: &'static str) -> Loading<'_> {
        self.0.lock().loading = Some(message);
        Loading(self)
    }

    fn show_error(&self, message: String) {
        self.0.lock().banner = Some(Banner {
            message,
            shown_at: Instant::now(),
        });
    }

    /// Drop the banner once it has been up for [`BANNER_TIMEOUT`].
    pub fn tick(&self, now: Instant) -> bool {
        let mut state = self.0.lock();
        match &state.banner {
            Some(b) if now.saturating_duration_since(b.shown_at) >= BANNER_TIMEOUT => {
                state.banner = None;
                true
            }
            _ => false,
        }
    }
}

pub struct App<S, F, V> {
    store: IconStore,
    source: S,
    fetcher: F,
    saver: V,
    renderer: Renderer,
    selection: SelectionTracker,
    status: StatusBar,
}

impl<S: CatalogSource, F: VectorFetcher, V: FileSaver> App<S, F, V> {
    pub fn new(source: S, fetcher: F, saver: V) -> Self {
        Self {
            store: IconStore::new(),
            source,
            fetcher,
            saver,
            renderer: Renderer::new(),
            selection: SelectionTracker::default(),
            status: StatusBar::default(),
        }
    }

    pub fn catalog(&self) -> Arc<IconCatalog> {
        self.store.current()
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer {
        &mut self.renderer
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    #[cfg(test)]
    pub fn saver(&self) -> &V {
        &self.saver
    }

    pub fn counter(&self) -> SelectionCounter {
        self.selection.counter()
    }

    pub fn status(&self) -> &StatusBar {
        &self.status
    }

    /// First catalog load.
    pub async fn init(&mut self) -> Result<(), StoreError> {
        self.reload(LOADING_ICONS, "initialization failed").await
    }

    /// Fetch the catalog again and re-render.
    pub async fn refresh(&mut self) -> Result<(), StoreError> {
        self.reload(REFRESHING_ICONS, "refresh failed").await
    }

    async fn reload(&mut self, loading: &'static str, failure: &str) -> Result<(), StoreError> {
        let result = {
            let _loading = self.status.begin(loading);
            self.store.reload(&self.source).await
        };

        match result {
            Ok(ReloadOutcome::Committed(catalog)) => {
                self.renderer.render(&catalog);
                self.selection.recount(self.renderer.container());
                Ok(())
            }
            Ok(ReloadOutcome::InFlight) => Ok(()),
            Err(e) => {
                self.status.show_error(format!("{failure}: {e}"));
                Err(e)
            }
        }
    }

    /// Perform every pending document load and apply the results. Returns
    /// how many were applied.
    pub async fn load_all(&mut self) -> usize {
        let requests = self.renderer.pending_loads();
        let fetcher = &self.fetcher;
        let results = join_all(
            requests
                .iter()
                .map(|request| async move { fetcher.fetch(&request.location).await }),
        )
        .await;

        let mut applied = 0;
        for (request, result) in requests.iter().zip(results) {
            if self.renderer.complete_load(request, result) {
                applied += 1;
            }
        }
        applied
    }

    pub fn toggle(&mut self, index: usize) -> Option<SelectionCounter> {
        self.selection
            .toggle_checkbox(self.renderer.container_mut(), index)
    }

    pub fn click(&mut self, index: usize) -> Option<SelectionCounter> {
        self.selection
            .click_vector(self.renderer.container_mut(), index)
    }

    pub fn select_all(&mut self, checked: bool) -> SelectionCounter {
        self.selection.set_all(self.renderer.container_mut(), checked)
    }

    /// Check icons by id or name; returns the terms that matched nothing.
    pub fn select_matching<'a>(&mut self, wanted: &'a [String]) -> Vec<&'a str> {
        self.selection
            .check_matching(self.renderer.container_mut(), wanted)
    }

    /// Package the selected icons and hand the archive to the saver.
    pub async fn download_selected(&mut self) -> Result<ExportReport, ExportError> {
        let catalog = self.store.current();
        let picked = selection::selected(self.renderer.container(), &catalog);
        if picked.is_empty() {
            self.status.show_error("select at least one icon".to_string());
            return Err(ExportError::NoSelection);
        }

        let result = {
            let _loading = self.status.begin(PACKAGING_DOWNLOAD);
            ExportPipeline::new(&self.fetcher, &self.saver)
                .export(&picked, &catalog)
                .await
        };

        match result {
            Ok(report) => {
                debug!("app"; "saved {} icons to {}", report.packaged, report.path.display());
                Ok(report)
            }
            Err(e) => {
                self.status.show_error(format!("download failed: {e}"));
                Err(e)
            }
        }
    }
}
