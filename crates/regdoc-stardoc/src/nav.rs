//! Table-of-contents tree for a document collection.

use serde::Serialize;

use crate::anchor::{AnchorIndex, DocumentAnchors, EntityKind};
use crate::collection::DocumentCollection;
use crate::model::DocumentInfo;

/// Label used for a document without a file label.
const FALLBACK_FILE_LABEL: &str = "Module";

/// Navigation entry. Files sit at level 0, their entities at level 1.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavNode {
    pub id: String,
    pub label: String,
    pub kind: EntityKind,
    pub level: u8,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavNode>,
}

impl NavNode {
    fn leaf(id: &str, label: &str, kind: EntityKind) -> Self {
        Self {
            id: id.to_owned(),
            label: label.to_owned(),
            kind,
            level: 1,
            children: Vec::new(),
        }
    }
}

/// Build one file node per document, in collection order.
///
/// Children are the document's functions, then rules, providers, and
/// aspects, each in declaration order.
pub fn build_navigation(collection: &DocumentCollection, anchors: &AnchorIndex) -> Vec<NavNode> {
    collection
        .documents()
        .iter()
        .zip(anchors.documents())
        .map(|(doc, ids)| file_node(doc, ids))
        .collect()
}

fn file_node(doc: &DocumentInfo, ids: &DocumentAnchors) -> NavNode {
    let mut children = Vec::with_capacity(
        doc.functions.len() + doc.rules.len() + doc.providers.len() + doc.aspects.len(),
    );
    for (func, id) in doc.functions.iter().zip(&ids.functions) {
        children.push(NavNode::leaf(id, &func.name, EntityKind::Function));
    }
    for (rule, id) in doc.rules.iter().zip(&ids.rules) {
        children.push(NavNode::leaf(id, &rule.name, EntityKind::Rule));
    }
    for (provider, id) in doc.providers.iter().zip(&ids.providers) {
        children.push(NavNode::leaf(id, &provider.name, EntityKind::Provider));
    }
    for (aspect, id) in doc.aspects.iter().zip(&ids.aspects) {
        children.push(NavNode::leaf(id, &aspect.name, EntityKind::Aspect));
    }

    let label = if doc.file.is_empty() {
        FALLBACK_FILE_LABEL.to_owned()
    } else {
        doc.file.clone()
    };

    NavNode {
        id: ids.file.clone(),
        label,
        kind: EntityKind::File,
        level: 0,
        children,
    }
}

/// Depth-first, pre-order list of every node.
pub fn flatten(nodes: &[NavNode]) -> Vec<&NavNode> {
    let mut out = Vec::new();
    let mut stack: Vec<&NavNode> = nodes.iter().rev().collect();
    while let Some(node) = stack.pop() {
        out.push(node);
        stack.extend(node.children.iter().rev());
    }
    out
}
