//! Node resolution and export location lookup.
//!
//! ```text
//! group node ──► first COMPONENT_SET child ──► qualifying children ──► IconNode[]
//!                                                                        │
//!                                    images?ids=..&format=svg ◄──────────┘
//!                                                │
//!                                                ▼
//!                                           IconCatalog
//! ```

use std::collections::BTreeMap;

use super::{IconCatalog, IconNode, ResolveError};
use crate::config::FigmaConfig;
use crate::figma::{FigmaApi, NodeType, NodesResponse};

/// Identifiers required to resolve the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSource {
    pub token: String,
    pub file_id: String,
    pub group_node_id: String,
}

impl IconSource {
    /// Collect identifiers from config, reporting every missing one at once.
    pub fn from_config(figma: &FigmaConfig) -> Result<Self, ResolveError> {
        let required = [
            ("FIGMA_TOKEN", &figma.token),
            ("FIGMA_FILE_ID", &figma.file_id),
            ("GROUP_NODE_ID", &figma.group_node_id),
        ];

        let missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            return Err(ResolveError::Configuration(missing));
        }

        let value = |v: &Option<String>| v.as_deref().unwrap_or_default().trim().to_string();
        Ok(Self {
            token: value(&figma.token),
            file_id: value(&figma.file_id),
            group_node_id: value(&figma.group_node_id),
        })
    }
}

/// Pick the qualifying icon nodes out of a nodes response.
pub fn select_icon_nodes(
    mut response: NodesResponse,
    group_node_id: &str,
) -> Result<Vec<IconNode>, ResolveError> {
    let document = response
        .nodes
        .remove(group_node_id)
        .flatten()
        .and_then(|entry| entry.document)
        .ok_or_else(|| {
            ResolveError::UpstreamStructure(format!("node `{group_node_id}` has no document"))
        })?;

    let component_set = document
        .children
        .into_iter()
        .find(|node| node.kind == NodeType::ComponentSet)
        .ok_or_else(|| {
            ResolveError::UpstreamStructure(format!(
                "node `{group_node_id}` has no component set"
            ))
        })?;

    let icons: Vec<IconNode> = component_set
        .children
        .into_iter()
        .filter(|node| node.kind.is_icon() && !node.name.is_empty())
        .map(|node| IconNode {
            id: node.id,
            name: node.name,
            kind: node.kind,
        })
        .collect();

    if icons.is_empty() {
        return Err(ResolveError::NoIconsFound);
    }
    Ok(icons)
}

/// Fetch the group subtree and extract its icon nodes.
pub async fn resolve_icon_nodes<A: FigmaApi>(
    api: &A,
    source: &IconSource,
) -> Result<Vec<IconNode>, ResolveError> {
    let response = api
        .file_nodes(&source.file_id, &source.group_node_id)
        .await?;
    select_icon_nodes(response, &source.group_node_id)
}

/// Ask upstream for export locations of `ids` in one request.
///
/// The returned mapping is whatever upstream sent; uncovered ids are filled
/// in by [`IconCatalog::from_nodes`].
pub async fn locate_exports<A: FigmaApi>(
    api: &A,
    file_id: &str,
    ids: &[String],
) -> Result<BTreeMap<String, Option<String>>, ResolveError> {
    let response = api.image_exports(file_id, ids).await?;
    let images = response
        .images
        .ok_or(ResolveError::UpstreamExport(response.err))?;
    Ok(images.into_iter().collect())
}

/// Full resolve cycle: nodes, then export locations.
pub async fn build_catalog<A: FigmaApi>(
    api: &A,
    source: &IconSource,
) -> Result<IconCatalog, ResolveError> {
    let nodes = resolve_icon_nodes(api, source).await?;
    let ids: Vec<String> = nodes.iter().map(|n| n.id.clone()).collect();
    let locations = locate_exports(api, &source.file_id, &ids).await?;

    let uncovered = ids.iter().filter(|id| !matches!(locations.get(*id), Some(Some(_)))).count();
    if uncovered > 0 {
        crate::log!("catalog"; "{} of {} icons have no export location", uncovered, ids.len());
    }
    crate::debug!("catalog"; "resolved {} icons", ids.len());

    Ok(IconCatalog::from_nodes(&nodes, locations))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::figma::{ApiError, ImagesResponse};

    const GROUP: &str = "10:1";

    fn nodes_json(children: &str) -> NodesResponse {
        serde_json::from_str(&format!(
            r#"{{"nodes":{{"{GROUP}":{{"document":{{"id":"{GROUP}","name":"Icons","type":"FRAME","children":[
                {{"id":"10:2","name":"note","type":"TEXT"}},
                {{"id":"10:3","name":"Set","type":"COMPONENT_SET","children":[{children}]}}
            ]}}}}}}}}"#
        ))
        .unwrap()
    }

    struct FakeApi {
        nodes: RefCell<Option<NodesResponse>>,
        images: RefCell<Option<ImagesResponse>>,
        image_requests: RefCell<Vec<Vec<String>>>,
    }

    impl FakeApi {
        fn new(nodes: NodesResponse, images: ImagesResponse) -> Self {
            Self {
                nodes: RefCell::new(Some(nodes)),
                images: RefCell::new(Some(images)),
                image_requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl FigmaApi for FakeApi {
        async fn file_nodes(&self, _: &str, _: &str) -> Result<NodesResponse, ApiError> {
            Ok(self.nodes.borrow_mut().take().unwrap_or_default())
        }

        async fn image_exports(
            &self,
            _: &str,
            ids: &[String],
        ) -> Result<ImagesResponse, ApiError> {
            self.image_requests.borrow_mut().push(ids.to_vec());
            Ok(self.images.borrow_mut().take().unwrap_or_default())
        }
    }

    fn source() -> IconSource {
        IconSource {
            token: "t".into(),
            file_id: "F".into(),
            group_node_id: GROUP.into(),
        }
    }

    #[test]
    fn test_select_filters_type_and_name() {
        let response = nodes_json(
            r#"{"id":"1:1","name":"arrow","type":"VECTOR"},
               {"id":"1:2","name":"","type":"VECTOR"},
               {"id":"1:3","name":"label","type":"TEXT"},
               {"id":"1:4","name":"close","type":"COMPONENT"},
               {"id":"1:5","name":"merge","type":"BOOLEAN_OPERATION"},
               {"id":"1:6","name":"inst","type":"INSTANCE"}"#,
        );
        let icons = select_icon_nodes(response, GROUP).unwrap();
        let ids: Vec<_> = icons.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["1:1", "1:4", "1:5"]);
        assert_eq!(icons[1].name, "close");
        assert_eq!(icons[2].kind, NodeType::BooleanOperation);
    }

    #[test]
    fn test_select_ignores_nested_children() {
        let response = nodes_json(
            r#"{"id":"1:1","name":"frame","type":"FRAME","children":[
                   {"id":"2:1","name":"deep","type":"VECTOR"}]},
               {"id":"1:2","name":"top","type":"VECTOR"}"#,
        );
        let icons = select_icon_nodes(response, GROUP).unwrap();
        assert_eq!(icons.len(), 1);
        assert_eq!(icons[0].id, "1:2");
    }

    #[test]
    fn test_select_no_icons() {
        let response = nodes_json(r#"{"id":"1:3","name":"label","type":"TEXT"}"#);
        assert!(matches!(
            select_icon_nodes(response, GROUP),
            Err(ResolveError::NoIconsFound)
        ));
    }

    #[test]
    fn test_select_missing_document() {
        let response: NodesResponse =
            serde_json::from_str(r#"{"nodes":{"10:1":{"document":null}}}"#).unwrap();
        assert!(matches!(
            select_icon_nodes(response, GROUP),
            Err(ResolveError::UpstreamStructure(_))
        ));

        let response: NodesResponse = serde_json::from_str(r#"{"nodes":{"10:1":null}}"#).unwrap();
        assert!(matches!(
            select_icon_nodes(response, GROUP),
            Err(ResolveError::UpstreamStructure(_))
        ));

        assert!(matches!(
            select_icon_nodes(NodesResponse::default(), GROUP),
            Err(ResolveError::UpstreamStructure(_))
        ));
    }

    #[test]
    fn test_select_missing_component_set() {
        let response: NodesResponse = serde_json::from_str(
            r#"{"nodes":{"10:1":{"document":{"id":"10:1","name":"G","type":"FRAME","children":[
                {"id":"1:1","name":"arrow","type":"VECTOR"}]}}}}"#,
        )
        .unwrap();
        let err = select_icon_nodes(response, GROUP).unwrap_err();
        assert!(err.to_string().contains("component set"));
    }

    #[test]
    fn test_source_from_config_reports_all_missing() {
        let figma = FigmaConfig {
            token: Some("  ".into()),
            file_id: None,
            group_node_id: Some("1:1".into()),
            ..FigmaConfig::default()
        };
        match IconSource::from_config(&figma) {
            Err(ResolveError::Configuration(missing)) => {
                assert_eq!(missing, vec!["FIGMA_TOKEN", "FIGMA_FILE_ID"]);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_build_catalog() {
        let api = FakeApi::new(
            nodes_json(
                r#"{"id":"1:1","name":"arrow","type":"VECTOR"},
                   {"id":"1:4","name":"close","type":"COMPONENT"}"#,
            ),
            serde_json::from_str(
                r#"{"images":{"1:1":"https://cdn/a.svg","1:4":"https://cdn/c.svg"}}"#,
            )
            .unwrap(),
        );

        let catalog = build_catalog(&api, &source()).await.unwrap();
        assert_eq!(catalog.ids, vec!["1:1", "1:4"]);
        assert_eq!(catalog.names, vec!["arrow", "close"]);
        assert_eq!(catalog.location("1:4"), Some("https://cdn/c.svg"));
        assert!(catalog.validate().is_ok());

        // one batched request covering exactly the qualifying ids
        assert_eq!(
            *api.image_requests.borrow(),
            vec![vec!["1:1".to_string(), "1:4".to_string()]]
        );
    }

    #[tokio::test]
    async fn test_build_catalog_partial_export_coverage() {
        let api = FakeApi::new(
            nodes_json(
                r#"{"id":"1:1","name":"arrow","type":"VECTOR"},
                   {"id":"1:4","name":"close","type":"COMPONENT"}"#,
            ),
            serde_json::from_str(r#"{"images":{"1:1":"https://cdn/a.svg"}}"#).unwrap(),
        );

        let catalog = build_catalog(&api, &source()).await.unwrap();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.location("1:4"), None);
        assert!(catalog.images.contains_key("1:4"));
    }

    #[tokio::test]
    async fn test_build_catalog_missing_export_mapping() {
        let api = FakeApi::new(
            nodes_json(r#"{"id":"1:1","name":"arrow","type":"VECTOR"}"#),
            serde_json::from_str(r#"{"err":"render timeout"}"#).unwrap(),
        );

        match build_catalog(&api, &source()).await {
            Err(ResolveError::UpstreamExport(Some(msg))) => assert_eq!(msg, "render timeout"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_no_export_request_without_icons() {
        let api = FakeApi::new(
            nodes_json(r#"{"id":"1:3","name":"label","type":"TEXT"}"#),
            ImagesResponse::default(),
        );
        assert!(matches!(
            build_catalog(&api, &source()).await,
            Err(ResolveError::NoIconsFound)
        ));
        assert!(api.image_requests.borrow().is_empty());
    }
}
