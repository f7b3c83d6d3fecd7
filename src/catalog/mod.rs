//! Icon catalog: the snapshot of exportable icons shared by server and client.
//!
//! # Module Structure
//!
//! ```text
//! catalog/
//! ├── error.rs    # ResolveError, InvalidCatalog
//! ├── resolve.rs  # node tree → IconNode list → IconCatalog
//! └── mod.rs      # IconCatalog, IconNode (this file)
//! ```
//!
//! The wire format is the JSON object served at `/api/icons`:
//!
//! ```json
//! { "images": { "1:2": "https://…" }, "names": ["arrow"], "ids": ["1:2"] }
//! ```

mod error;
pub mod resolve;

pub use error::{InvalidCatalog, ResolveError};
pub use resolve::{IconSource, build_catalog};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::figma::NodeType;

/// A design node admitted into the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconNode {
    pub id: String,
    pub name: String,
    pub kind: NodeType,
}

/// Authoritative snapshot of available icons.
///
/// `ids` defines display order; `names` is parallel to it. `images` holds
/// one entry per id, `None` when upstream produced no export location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconCatalog {
    pub images: BTreeMap<String, Option<String>>,
    pub names: Vec<String>,
    pub ids: Vec<String>,
}

impl IconCatalog {
    /// Assemble a catalog from admitted nodes and their export locations.
    ///
    /// Ids the locations do not cover get an explicit `None` entry.
    pub fn from_nodes(
        nodes: &[IconNode],
        mut locations: BTreeMap<String, Option<String>>,
    ) -> Self {
        let mut images = BTreeMap::new();
        for node in nodes {
            let location = locations.remove(&node.id).flatten();
            images.insert(node.id.clone(), location);
        }
        Self {
            images,
            names: nodes.iter().map(|n| n.name.clone()).collect(),
            ids: nodes.iter().map(|n| n.id.clone()).collect(),
        }
    }

    /// Check the structural invariant: parallel arrays, every id located.
    pub fn validate(&self) -> Result<(), InvalidCatalog> {
        if self.names.len() != self.ids.len() {
            return Err(InvalidCatalog::LengthMismatch {
                names: self.names.len(),
                ids: self.ids.len(),
            });
        }
        if let Some(id) = self.ids.iter().find(|id| !self.images.contains_key(*id)) {
            return Err(InvalidCatalog::MissingImage(id.clone()));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterate `(id, name)` pairs in display order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.ids
            .iter()
            .zip(&self.names)
            .map(|(id, name)| (id.as_str(), name.as_str()))
    }

    /// Display name of `id`.
    pub fn name_of(&self, id: &str) -> Option<&str> {
        let index = self.ids.iter().position(|i| i == id)?;
        self.names.get(index).map(String::as_str)
    }

    /// Export location of `id`, if the catalog has one.
    pub fn location(&self, id: &str) -> Option<&str> {
        self.images.get(id).and_then(|l| l.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, name: &str) -> IconNode {
        IconNode {
            id: id.to_string(),
            name: name.to_string(),
            kind: NodeType::Vector,
        }
    }

    fn sample() -> IconCatalog {
        let nodes = [node("1:1", "arrow"), node("1:2", "close")];
        let mut locations = BTreeMap::new();
        locations.insert("1:1".to_string(), Some("https://cdn/arrow.svg".to_string()));
        locations.insert("1:2".to_string(), Some("https://cdn/close.svg".to_string()));
        IconCatalog::from_nodes(&nodes, locations)
    }

    #[test]
    fn test_from_nodes_keeps_order() {
        let catalog = sample();
        assert_eq!(catalog.ids, vec!["1:1", "1:2"]);
        assert_eq!(catalog.names, vec!["arrow", "close"]);
        assert!(catalog.validate().is_ok());
    }

    #[test]
    fn test_from_nodes_fills_uncovered_ids() {
        let nodes = [node("1:1", "arrow"), node("1:2", "close")];
        let mut locations = BTreeMap::new();
        locations.insert("1:1".to_string(), Some("https://cdn/arrow.svg".to_string()));
        locations.insert("9:9".to_string(), Some("https://cdn/extra.svg".to_string()));

        let catalog = IconCatalog::from_nodes(&nodes, locations);
        assert_eq!(catalog.images.len(), 2);
        assert_eq!(catalog.location("1:2"), None);
        assert!(catalog.images.contains_key("1:2"));
        assert!(!catalog.images.contains_key("9:9"));
        assert!(catalog.validate().is_ok());
    }

    #[test]
    fn test_validate_length_mismatch() {
        let mut catalog = sample();
        catalog.names.pop();
        assert_eq!(
            catalog.validate(),
            Err(InvalidCatalog::LengthMismatch { names: 1, ids: 2 })
        );
    }

    #[test]
    fn test_validate_missing_image() {
        let mut catalog = sample();
        catalog.images.remove("1:2");
        assert_eq!(
            catalog.validate(),
            Err(InvalidCatalog::MissingImage("1:2".to_string()))
        );
    }

    #[test]
    fn test_lookup() {
        let catalog = sample();
        assert_eq!(catalog.name_of("1:2"), Some("close"));
        assert_eq!(catalog.name_of("7:7"), None);
        assert_eq!(catalog.location("1:1"), Some("https://cdn/arrow.svg"));
        let entries: Vec<_> = catalog.entries().collect();
        assert_eq!(entries, vec![("1:1", "arrow"), ("1:2", "close")]);
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["ids"][0], "1:1");
        assert_eq!(json["names"][1], "close");
        assert_eq!(json["images"]["1:2"], "https://cdn/close.svg");

        let parsed: IconCatalog = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, sample());
    }
}
