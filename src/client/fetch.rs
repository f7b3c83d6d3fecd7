//! Vector document retrieval by export location.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

pub trait VectorFetcher {
    /// Body of the document at `location`, on a success status only.
    async fn fetch(&self, location: &str) -> Result<String, FetchError>;
}

#[derive(Debug, Clone, Default)]
pub struct HttpVectorFetcher {
    http: reqwest::Client,
}

impl HttpVectorFetcher {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl VectorFetcher for HttpVectorFetcher {
    async fn fetch(&self, location: &str) -> Result<String, FetchError> {
        let response = self.http.get(location).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}
