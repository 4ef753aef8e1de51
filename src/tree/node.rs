use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::BatchError;

/// Index of a node inside its [`JobTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Group nodes own ordered children; leaves are single machining operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Group,
    Leaf,
}

#[derive(Debug, Clone)]
pub struct JobTreeNode {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    children: Vec<NodeId>,
}

/// Read-only view of the program-order hierarchy.
///
/// Nodes live in an arena and refer to their children by [`NodeId`]. Parent
/// links are not stored. A leaf may be listed under more than one group; a
/// group has exactly one place in the hierarchy, so the tree stays acyclic.
#[derive(Debug, Clone)]
pub struct JobTree {
    nodes: Vec<JobTreeNode>,
    ids: HashMap<String, NodeId>,
    root: NodeId,
}

impl JobTree {
    /// Creates a tree holding only a root group.
    #[allow(dead_code)]
    pub fn new(root_name: &str) -> Self {
        Self::with_root("0", root_name)
    }

    pub fn with_root(root_id: &str, root_name: &str) -> Self {
        Self {
            nodes: vec![JobTreeNode {
                id: root_id.to_string(),
                name: root_name.to_string(),
                kind: NodeKind::Group,
                children: Vec::new(),
            }],
            ids: HashMap::from([(root_id.to_string(), NodeId(0))]),
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Appends a new node under `parent`. Ids default to the arena index.
    pub fn add(
        &mut self,
        parent: NodeId,
        name: &str,
        kind: NodeKind,
    ) -> Result<NodeId, BatchError> {
        let id = NodeId(self.nodes.len());
        self.add_with_id(parent, &id.0.to_string(), name, kind)
    }

    pub fn add_with_id(
        &mut self,
        parent: NodeId,
        id: &str,
        name: &str,
        kind: NodeKind,
    ) -> Result<NodeId, BatchError> {
        self.ensure_group(parent)?;
        if self.by_id(id).is_some() {
            return Err(BatchError::Config(format!("duplicate node id {id:?}")));
        }
        let node = NodeId(self.nodes.len());
        self.nodes.push(JobTreeNode {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(node);
        self.ids.insert(id.to_string(), node);
        Ok(node)
    }

    /// Lists an existing leaf under a further group.
    pub fn link_leaf(&mut self, parent: NodeId, leaf: NodeId) -> Result<(), BatchError> {
        self.ensure_group(parent)?;
        if self.node(leaf).kind != NodeKind::Leaf {
            return Err(BatchError::Config(format!(
                "only operations may appear under several groups, {:?} is a group",
                self.node(leaf).id
            )));
        }
        self.nodes[parent.0].children.push(leaf);
        Ok(())
    }

    fn ensure_group(&self, parent: NodeId) -> Result<(), BatchError> {
        if self.is_group(parent) {
            Ok(())
        } else {
            Err(BatchError::Config(format!(
                "operation {:?} cannot own children",
                self.node(parent).id
            )))
        }
    }

    /// Panics if `id` belongs to another tree.
    pub fn node(&self, id: NodeId) -> &JobTreeNode {
        &self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn is_group(&self, id: NodeId) -> bool {
        self.node(id).kind == NodeKind::Group
    }

    pub fn child_groups(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(|&child| self.is_group(child))
    }

    /// Name for logs and file names; blank names show as `<unnamed>`.
    pub fn display_name(&self, id: NodeId) -> &str {
        let name = self.node(id).name.as_str();
        if name.trim().is_empty() { "<unnamed>" } else { name }
    }

    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id).copied()
    }

    /// Finds a node by exact id, else by the first exact name match in pre-order.
    pub fn find(&self, selector: &str) -> Option<NodeId> {
        if let Some(node) = self.by_id(selector) {
            return Some(node);
        }
        let mut stack = vec![self.root];
        while let Some(current) = stack.pop() {
            if self.node(current).name == selector {
                return Some(current);
            }
            stack.extend(self.children(current).iter().rev());
        }
        None
    }
}
