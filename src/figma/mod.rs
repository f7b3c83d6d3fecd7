//! Design API client.
//!
//! Two calls are made per catalog build, always in this order:
//!
//! ```text
//! GET {api}/files/{file}/nodes?ids={group}            → NodesResponse
//! GET {api}/images/{file}?ids={id,id,..}&format=svg   → ImagesResponse
//! ```
//!
//! [`FigmaApi`] is the seam the resolver is written against, so tests can
//! substitute canned responses.

mod types;

pub use types::{ImagesResponse, NodeType, NodesResponse};

use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

/// Header carrying the personal access token.
const TOKEN_HEADER: &str = "X-Figma-Token";

/// Export format requested from the images endpoint.
pub const EXPORT_FORMAT: &str = "svg";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("upstream responded {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid api base url `{0}`")]
    BaseUrl(String),
}

/// Read access to the design document.
pub trait FigmaApi {
    /// Fetch the subtree rooted at `node_id`.
    async fn file_nodes(&self, file_id: &str, node_id: &str) -> Result<NodesResponse, ApiError>;

    /// Request export locations for `ids` in one batch.
    async fn image_exports(&self, file_id: &str, ids: &[String])
    -> Result<ImagesResponse, ApiError>;
}

/// `reqwest`-backed implementation of [`FigmaApi`].
#[derive(Debug, Clone)]
pub struct FigmaClient {
    http: reqwest::Client,
    base: Url,
    token: String,
}

impl FigmaClient {
    pub fn new(api_base: &str, token: impl Into<String>) -> Result<Self, ApiError> {
        let base = Url::parse(api_base).map_err(|_| ApiError::BaseUrl(api_base.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::BaseUrl(api_base.to_string()));
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("iconpack/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base,
            token: token.into(),
        })
    }

    /// Append path segments to the api base.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::BaseUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn nodes_url(&self, file_id: &str, node_id: &str) -> Result<Url, ApiError> {
        let mut url = self.endpoint(&["files", file_id, "nodes"])?;
        url.query_pairs_mut().append_pair("ids", node_id);
        Ok(url)
    }

    fn images_url(&self, file_id: &str, ids: &[String]) -> Result<Url, ApiError> {
        let mut url = self.endpoint(&["images", file_id])?;
        url.query_pairs_mut()
            .append_pair("ids", &ids.join(","))
            .append_pair("format", EXPORT_FORMAT);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        crate::debug!("figma"; "GET {}", url);

        let response = self
            .http
            .get(url)
            .header(TOKEN_HEADER, &self.token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

impl FigmaApi for FigmaClient {
    async fn file_nodes(&self, file_id: &str, node_id: &str) -> Result<NodesResponse, ApiError> {
        let url = self.nodes_url(file_id, node_id)?;
        self.get_json(url).await
    }

    async fn image_exports(
        &self,
        file_id: &str,
        ids: &[String],
    ) -> Result<ImagesResponse, ApiError> {
        let url = self.images_url(file_id, ids)?;
        self.get_json(url).await
    }
}
