//! Leitura da sessão CAM exportada em JSON.
//!
//! O documento pode ser um nó isolado (a raiz da árvore de programas) ou um
//! objeto `{ "root": ..., "selection": ... }` que também carrega a seleção
//! atual da sessão.

use std::path::Path;

use serde::Deserialize;

use super::node::{JobTree, NodeId, NodeKind};
use crate::error::BatchError;

#[derive(Debug, Deserialize)]
struct RawNode {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: String,
    kind: NodeKind,
    #[serde(default)]
    children: Vec<RawNode>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SessionDoc {
    Session {
        root: RawNode,
        #[serde(default)]
        selection: Option<String>,
    },
    Bare(RawNode),
}

/// Program tree plus whatever the host had selected.
#[derive(Debug, Clone)]
pub struct Session {
    pub tree: JobTree,
    pub selection: Option<String>,
}

impl Session {
    pub fn load(path: &Path) -> Result<Self, BatchError> {
        if !path.exists() {
            return Err(BatchError::NoTree(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self, BatchError> {
        let (root, selection) = match serde_json::from_str::<SessionDoc>(json)? {
            SessionDoc::Session { root, selection } => (root, selection),
            SessionDoc::Bare(root) => (root, None),
        };

        if root.kind != NodeKind::Group {
            return Err(BatchError::Config(format!(
                "tree root {:?} must be a group",
                root.name
            )));
        }

        let mut tree = JobTree::with_root(root.id.as_deref().unwrap_or("0"), &root.name);
        let root_id = tree.root();
        for child in &root.children {
            attach(&mut tree, root_id, child)?;
        }

        Ok(Self { tree, selection })
    }
}

// Depth is bounded by serde_json's recursion limit.
fn attach(tree: &mut JobTree, parent: NodeId, raw: &RawNode) -> Result<(), BatchError> {
    if raw.kind == NodeKind::Leaf && !raw.children.is_empty() {
        return Err(BatchError::Config(format!(
            "operation {:?} cannot own children",
            raw.name
        )));
    }

    // A repeated leaf id lists the same operation under another group.
    if let Some(id) = raw.id.as_deref()
        && let Some(existing) = tree.by_id(id)
        && raw.kind == NodeKind::Leaf
    {
        return tree.link_leaf(parent, existing);
    }

    let node = match raw.id.as_deref() {
        Some(id) => tree.add_with_id(parent, id, &raw.name, raw.kind)?,
        None => tree.add(parent, &raw.name, raw.kind)?,
    };
    for child in &raw.children {
        attach(tree, node, child)?;
    }
    Ok(())
}
