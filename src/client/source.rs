//! Where the client loads its catalog from.

use crate::catalog::IconCatalog;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP {status} - {reason}")]
    Status { status: u16, reason: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed catalog payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("invalid server url `{0}`")]
    BaseUrl(String),
}

/// Produces catalog payloads. Validation is left to the store.
pub trait CatalogSource {
    async fn fetch_catalog(&self) -> Result<IconCatalog, SourceError>;
}

/// `GET {server}/api/icons`
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    http: reqwest::Client,
    url: Url,
}

impl HttpCatalogSource {
    pub fn new(http: reqwest::Client, server: &str) -> Result<Self, SourceError> {
        let mut url = Url::parse(server).map_err(|_| SourceError::BaseUrl(server.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| SourceError::BaseUrl(server.to_string()))?
            .pop_if_empty()
            .extend(["api", "icons"]);
        Ok(Self { http, url })
    }

    #[cfg(test)]
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl CatalogSource for HttpCatalogSource {
    async fn fetch_catalog(&self) -> Result<IconCatalog, SourceError> {
        let response = self.http.get(self.url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_url() {
        let http = reqwest::Client::new();
        let source = HttpCatalogSource::new(http.clone(), "http://localhost:3000").unwrap();
        assert_eq!(source.url().as_str(), "http://localhost:3000/api/icons");

        let source = HttpCatalogSource::new(http.clone(), "http://host/icons-app/").unwrap();
        assert_eq!(source.url().as_str(), "http://host/icons-app/api/icons");

        assert!(HttpCatalogSource::new(http, "not a url").is_err());
    }

    #[test]
    fn test_status_message() {
        let err = SourceError::Status {
            status: 500,
            reason: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "HTTP 500 - Internal Server Error");
    }
}
