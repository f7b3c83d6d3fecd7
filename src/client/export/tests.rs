use super::*;
use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    io::{self, Cursor, Read},
    path::PathBuf,
};

/// Answers from a fixed table, counting calls.
struct TableFetcher {
    bodies: BTreeMap<&'static str, Result<&'static str, u16>>,
    calls: Cell<usize>,
}

impl TableFetcher {
    fn new(bodies: &[(&'static str, Result<&'static str, u16>)]) -> Self {
        Self {
            bodies: bodies.iter().copied().collect(),
            calls: Cell::new(0),
        }
    }
}

impl VectorFetcher for TableFetcher {
    async fn fetch(&self, location: &str) -> Result<String, FetchError> {
        self.calls.set(self.calls.get() + 1);
        tokio::task::yield_now().await;
        match self.bodies.get(location) {
            Some(Ok(body)) => Ok(body.to_string()),
            Some(Err(status)) => Err(FetchError::Status(*status)),
            None => Err(FetchError::Status(404)),
        }
    }
}

#[derive(Default)]
struct MemorySaver {
    saved: RefCell<Vec<(String, Vec<u8>)>>,
    fail: bool,
}

impl FileSaver for MemorySaver {
    fn save(&self, bytes: &[u8], file_name: &str) -> io::Result<PathBuf> {
        if self.fail {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        }
        self.saved
            .borrow_mut()
            .push((file_name.to_string(), bytes.to_vec()));
        Ok(PathBuf::from("/downloads").join(file_name))
    }
}

fn catalog(entries: &[(&str, &str, Option<&str>)]) -> IconCatalog {
    IconCatalog {
        images: entries
            .iter()
            .map(|(id, _, loc)| (id.to_string(), loc.map(str::to_string)))
            .collect(),
        names: entries.iter().map(|(_, n, _)| n.to_string()).collect(),
        ids: entries.iter().map(|(id, _, _)| id.to_string()).collect(),
    }
}

fn pick(catalog: &IconCatalog) -> Vec<SelectedIcon> {
    catalog
        .entries()
        .map(|(id, name)| SelectedIcon {
            id: id.to_string(),
            name: name.to_string(),
        })
        .collect()
}

fn entries(bytes: &[u8]) -> Vec<(String, String)> {
    let mut zip = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..zip.len())
        .map(|i| {
            let mut file = zip.by_index(i).unwrap();
            let mut content = String::new();
            file.read_to_string(&mut content).unwrap();
            (file.name().to_string(), content)
        })
        .collect()
}

#[tokio::test]
async fn test_empty_selection_fetches_nothing() {
    let fetcher = TableFetcher::new(&[]);
    let saver = MemorySaver::default();
    let pipeline = ExportPipeline::new(&fetcher, &saver);

    let err = pipeline.export(&[], &IconCatalog::default()).await.unwrap_err();
    assert!(matches!(err, ExportError::NoSelection));
    assert_eq!(fetcher.calls.get(), 0);
    assert!(saver.saved.borrow().is_empty());
}

#[tokio::test]
async fn test_partial_failure_packages_the_rest() {
    let fetcher = TableFetcher::new(&[
        ("https://cdn/a.svg", Ok("<svg>\n  <!-- generated -->\n  <path/>\n</svg>")),
        ("https://cdn/b.svg", Err(500)),
        ("https://cdn/c.svg", Ok("  <svg><!-- c --><g/></svg>")),
    ]);
    let saver = MemorySaver::default();
    let catalog = catalog(&[
        ("1:1", "arrow/left", Some("https://cdn/a.svg")),
        ("1:2", "broken", Some("https://cdn/b.svg")),
        ("1:3", "circle", Some("https://cdn/c.svg")),
    ]);

    let report = ExportPipeline::new(&fetcher, &saver)
        .export_as(&pick(&catalog), &catalog, "icons_1.zip".into())
        .await
        .unwrap();

    assert_eq!(fetcher.calls.get(), 3);
    assert_eq!(report.packaged, 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].0.name, "broken");
    assert_eq!(report.skipped[0].1.to_string(), "HTTP 500");
    assert_eq!(report.path, PathBuf::from("/downloads/icons_1.zip"));

    let saved = saver.saved.borrow();
    assert_eq!(saved[0].0, "icons_1.zip");
    assert_eq!(
        entries(&saved[0].1),
        vec![
            ("arrow_left.svg".to_string(), "<svg> <path/> </svg>".to_string()),
            ("circle.svg".to_string(), "<svg><g/></svg>".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_non_vector_and_missing_location_are_skipped() {
    let fetcher = TableFetcher::new(&[
        ("https://cdn/a.svg", Ok("<svg/>")),
        ("https://cdn/html", Ok("<html>denied</html>")),
    ]);
    let saver = MemorySaver::default();
    let catalog = catalog(&[
        ("1:1", "a", Some("https://cdn/a.svg")),
        ("1:2", "page", Some("https://cdn/html")),
        ("1:3", "ghost", None),
    ]);

    let report = ExportPipeline::new(&fetcher, &saver)
        .export(&pick(&catalog), &catalog)
        .await
        .unwrap();

    // the unlocated icon never reaches the fetcher
    assert_eq!(fetcher.calls.get(), 2);
    let reasons: Vec<_> = report.skipped.iter().map(|(_, e)| e.to_string()).collect();
    assert_eq!(reasons, ["response is not a vector document", "no export location"]);
    let file_name = report.path.file_name().unwrap().to_str().unwrap();
    assert!(file_name.starts_with("icons_"));
    assert!(file_name.ends_with(".zip"));
}

#[tokio::test]
async fn test_all_failed_saves_nothing() {
    let fetcher = TableFetcher::new(&[("https://cdn/a.svg", Err(403))]);
    let saver = MemorySaver::default();
    let catalog = catalog(&[
        ("1:1", "a", Some("https://cdn/a.svg")),
        ("1:2", "b", Some("https://cdn/b.svg")),
    ]);

    let err = ExportPipeline::new(&fetcher, &saver)
        .export(&pick(&catalog), &catalog)
        .await
        .unwrap_err();

    assert!(matches!(err, ExportError::AllItemsFailed(2)));
    assert!(saver.saved.borrow().is_empty());
}

#[tokio::test]
async fn test_colliding_names_keep_last_writer() {
    let fetcher = TableFetcher::new(&[
        ("https://cdn/1.svg", Ok("<svg>one</svg>")),
        ("https://cdn/2.svg", Ok("<svg>two</svg>")),
    ]);
    let saver = MemorySaver::default();
    let catalog = catalog(&[
        ("1:1", "A!", Some("https://cdn/1.svg")),
        ("1:2", "A?", Some("https://cdn/2.svg")),
    ]);

    let report = ExportPipeline::new(&fetcher, &saver)
        .export(&pick(&catalog), &catalog)
        .await
        .unwrap();

    assert_eq!(report.packaged, 2);
    let saved = saver.saved.borrow();
    assert_eq!(
        entries(&saved[0].1),
        vec![("A_.svg".to_string(), "<svg>two</svg>".to_string())]
    );
}

#[tokio::test]
async fn test_save_failure_is_reported() {
    let fetcher = TableFetcher::new(&[("https://cdn/a.svg", Ok("<svg/>"))]);
    let saver = MemorySaver {
        fail: true,
        ..Default::default()
    };
    let catalog = catalog(&[("1:1", "a", Some("https://cdn/a.svg"))]);

    let err = ExportPipeline::new(&fetcher, &saver)
        .export_as(&pick(&catalog), &catalog, "icons_7.zip".into())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "failed to save icons_7.zip: read-only");
}

#[tokio::test]
async fn test_vector_marker_checked_on_raw_body() {
    let fetcher = TableFetcher::new(&[
        ("https://cdn/prolog.svg", Ok("<?xml version=\"1.0\"?>\n<svg/>")),
        ("https://cdn/comment.svg", Ok("<!-- tool -->\n<svg/>")),
        ("https://cdn/indented.svg", Ok("\n  <svg><g/></svg>")),
    ]);
    let saver = MemorySaver::default();
    let catalog = catalog(&[
        ("1:1", "prolog", Some("https://cdn/prolog.svg")),
        ("1:2", "comment", Some("https://cdn/comment.svg")),
        ("1:3", "indented", Some("https://cdn/indented.svg")),
    ]);

    let report = ExportPipeline::new(&fetcher, &saver)
        .export(&pick(&catalog), &catalog)
        .await
        .unwrap();

    // leading whitespace is tolerated, a prolog or comment is not
    assert_eq!(report.packaged, 1);
    let skipped: Vec<_> = report.skipped.iter().map(|(icon, _)| icon.name.as_str()).collect();
    assert_eq!(skipped, ["prolog", "comment"]);
    assert!(report
        .skipped
        .iter()
        .all(|(_, e)| matches!(e, ItemFetchError::NotVector)));
    assert_eq!(
        entries(&saver.saved.borrow()[0].1),
        vec![("indented.svg".to_string(), "<svg><g/></svg>".to_string())]
    );
}

#[test]
fn test_skip_message_names_icon_and_reason() {
    let icon = SelectedIcon {
        id: "1:2".into(),
        name: "broken".into(),
    };
    assert_eq!(
        skip_message(&icon, &ItemFetchError::Fetch(FetchError::Status(500))),
        "skipped broken: HTTP 500"
    );
    assert_eq!(
        skip_message(&icon, &ItemFetchError::MissingLocation),
        "skipped broken: no export location"
    );
}
