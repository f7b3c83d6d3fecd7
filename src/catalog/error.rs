//! Catalog error types.

use thiserror::Error;

use crate::figma::ApiError;

/// Failures while resolving the catalog from the design document.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("missing configuration: {}", .0.join(", "))]
    Configuration(Vec<&'static str>),

    #[error("invalid node structure: {0}")]
    UpstreamStructure(String),

    #[error("no icons found in group")]
    NoIconsFound,

    #[error("export locations unavailable{}", .0.as_deref().map(|e| format!(": {e}")).unwrap_or_default())]
    UpstreamExport(Option<String>),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// A catalog payload that breaks the structural invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidCatalog {
    #[error("invalid catalog: {names} names for {ids} ids")]
    LengthMismatch { names: usize, ids: usize },

    #[error("invalid catalog: id `{0}` has no image entry")]
    MissingImage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_error_display() {
        let err = ResolveError::Configuration(vec!["FIGMA_TOKEN", "GROUP_NODE_ID"]);
        assert_eq!(
            err.to_string(),
            "missing configuration: FIGMA_TOKEN, GROUP_NODE_ID"
        );

        assert_eq!(
            ResolveError::UpstreamExport(None).to_string(),
            "export locations unavailable"
        );
        assert_eq!(
            ResolveError::UpstreamExport(Some("rate limited".into())).to_string(),
            "export locations unavailable: rate limited"
        );
    }
}
