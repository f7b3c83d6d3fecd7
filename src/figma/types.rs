//! Response shapes of the design API, reduced to the fields the catalog reads.

use std::collections::HashMap;

use serde::Deserialize;

/// Node types as reported by the design API.
///
/// Everything the catalog does not care about collapses into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    Document,
    Canvas,
    Frame,
    Group,
    ComponentSet,
    Component,
    Instance,
    Vector,
    BooleanOperation,
    #[serde(other)]
    Other,
}

impl NodeType {
    /// Node types that can be exported as a standalone icon.
    pub const fn is_icon(self) -> bool {
        matches!(self, Self::Vector | Self::Component | Self::BooleanOperation)
    }
}

/// A node of the document tree.
#[derive(Debug, Clone, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeType,
    #[serde(default)]
    pub children: Vec<Node>,
}

/// One entry of `GET /files/:key/nodes`.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeEntry {
    pub document: Option<Node>,
}

/// `GET /files/:key/nodes?ids=...`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodesResponse {
    #[serde(default)]
    pub nodes: HashMap<String, Option<NodeEntry>>,
}

/// `GET /images/:key?ids=...&format=svg`
///
/// `images` maps node id to a render URL; the API uses `null` for nodes it
/// failed to render.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImagesResponse {
    #[serde(default)]
    pub err: Option<String>,
    #[serde(default)]
    pub images: Option<HashMap<String, Option<String>>>,
}
