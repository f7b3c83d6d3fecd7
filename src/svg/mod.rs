//! Vector document handling.
//!
//! ```text
//! raw markup ──► interactive rewrite (quick-xml) ──► VectorDocument
//!                         │
//!                         └──► size measure (usvg)
//! ```

mod interactive;

use interactive::make_interactive;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SvgError {
    #[error("malformed vector document at byte {position}: {source}")]
    Parse {
        position: u64,
        source: quick_xml::Error,
    },

    #[error("invalid attribute: {0}")]
    Attribute(String),

    #[error("root element is `{0}`, expected `svg`")]
    NotSvg(String),

    #[error("vector document has no root element")]
    Empty,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("vector document is not valid utf-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// A loaded vector document, interactive unless kept as fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorDocument {
    /// Markup as displayed.
    pub markup: String,
    /// Intrinsic size in pixels, when the document renders.
    pub size: Option<(f32, f32)>,
}

impl VectorDocument {
    /// Rewrite `raw` and measure its size.
    pub fn prepare(raw: &str) -> Result<Self, SvgError> {
        let markup = make_interactive(raw)?;
        let size = measure_size(&markup);
        Ok(Self { markup, size })
    }

    /// Keep `raw` unmodified, for documents the rewrite rejects.
    pub fn as_is(raw: &str) -> Self {
        Self {
            markup: raw.to_string(),
            size: measure_size(raw),
        }
    }
}

/// Intrinsic size of a document, `None` if usvg cannot parse it.
pub fn measure_size(markup: &str) -> Option<(f32, f32)> {
    let tree = usvg::Tree::from_str(markup, &usvg::Options::default()).ok()?;
    let size = tree.size();
    Some((size.width(), size.height()))
}
