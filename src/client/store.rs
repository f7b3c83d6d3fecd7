//! Current catalog, replaced atomically.
//!
//! Readers take an `Arc` snapshot with [`IconStore::current`]; a reload
//! publishes a new snapshot only after it validates. At most one reload is
//! in flight at a time.

use super::source::{CatalogSource, SourceError};
use crate::{
    catalog::{IconCatalog, InvalidCatalog},
    debug,
};
use arc_swap::ArcSwap;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Invalid(#[from] InvalidCatalog),
}

#[derive(Debug)]
pub enum ReloadOutcome {
    /// A new catalog is current.
    Committed(Arc<IconCatalog>),
    /// Another reload was already running; nothing was done.
    InFlight,
}

pub struct IconStore {
    current: ArcSwap<IconCatalog>,
    loading: AtomicBool,
}

/// Clears the loading flag however the reload ends.
struct LoadingGuard<'a>(&'a AtomicBool);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for IconStore {
    fn default() -> Self {
        Self::new()
    }
}

impl IconStore {
    /// Start with an empty catalog.
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(IconCatalog::default()),
            loading: AtomicBool::new(false),
        }
    }

    pub fn current(&self) -> Arc<IconCatalog> {
        self.current.load_full()
    }

    #[cfg(test)]
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Validate and publish `catalog`. On failure the previous catalog stays.
    pub fn replace(&self, catalog: IconCatalog) -> Result<Arc<IconCatalog>, InvalidCatalog> {
        catalog.validate()?;
        let catalog = Arc::new(catalog);
        self.current.store(Arc::clone(&catalog));
        Ok(catalog)
    }

    /// Fetch from `source` and publish the result.
    pub async fn reload<S: CatalogSource>(&self, source: &S) -> Result<ReloadOutcome, StoreError> {
        if self
            .loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("store"; "reload already in flight");
            return Ok(ReloadOutcome::InFlight);
        }
        let _guard = LoadingGuard(&self.loading);

        let catalog = source.fetch_catalog().await?;
        let catalog = self.replace(catalog)?;
        debug!("store"; "committed {} icons", catalog.len());
        Ok(ReloadOutcome::Committed(catalog))
    }
}
