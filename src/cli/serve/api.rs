//! JSON endpoints.

use crate::{
    catalog::{IconCatalog, IconSource, ResolveError, build_catalog},
    config::FigmaConfig,
    figma::FigmaApi,
    logger::unix_millis,
};
use serde::Serialize;
use std::error::Error;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub timestamp: u64,
}

pub fn health() -> Health {
    Health {
        status: "OK",
        timestamp: unix_millis(),
    }
}

/// Body of a failed `/api/icons` response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    /// `details` carries the full source chain, in development only.
    pub fn new(err: &ResolveError, development: bool) -> Self {
        Self {
            error: err.to_string(),
            details: development.then(|| error_chain(err)),
        }
    }
}

fn error_chain(err: &dyn Error) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(e) = source {
        parts.push(e.to_string());
        source = e.source();
    }
    parts.join(": ")
}

/// Resolve a fresh catalog. Configuration is checked on every request.
pub async fn fetch_catalog<A: FigmaApi>(
    api: &A,
    figma: &FigmaConfig,
) -> Result<IconCatalog, ResolveError> {
    let source = IconSource::from_config(figma)?;
    build_catalog(api, &source).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_hides_details_outside_development() {
        let err = ResolveError::NoIconsFound;
        let body = serde_json::to_value(ErrorBody::new(&err, false)).unwrap();
        assert_eq!(body, serde_json::json!({ "error": err.to_string() }));

        let body = ErrorBody::new(&err, true);
        assert_eq!(body.details.as_deref(), Some(err.to_string().as_str()));
    }

    #[test]
    fn test_health_shape() {
        let value = serde_json::to_value(health()).unwrap();
        assert_eq!(value["status"], "OK");
        assert!(value["timestamp"].as_u64().unwrap() > 0);
    }
}
