//! Catalog browser and exporter.
//!
//! The client side of the pipeline: fetch the catalog from a running server,
//! render it as cards, track the selection, and package the selection into a
//! zip archive.

pub mod app;
pub mod export;
pub mod fetch;
pub mod render;
pub mod selection;
pub mod source;
pub mod store;

pub use app::App;
pub use export::DiskSaver;
pub use fetch::HttpVectorFetcher;
pub use source::HttpCatalogSource;

/// The app wired to real HTTP collaborators and an output directory.
pub type HttpApp = App<HttpCatalogSource, HttpVectorFetcher, DiskSaver>;

/// Build an [`HttpApp`] for `server`, saving archives into `output`.
pub fn http_app(server: &str, output: &std::path::Path) -> Result<HttpApp, source::SourceError> {
    let http = reqwest::Client::new();
    let source = HttpCatalogSource::new(http.clone(), server)?;
    Ok(App::new(
        source,
        HttpVectorFetcher::new(http),
        DiskSaver::new(output),
    ))
}
