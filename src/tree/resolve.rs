use super::node::{JobTree, NodeId};

/// Maps a selection to the group a batch starts from.
///
/// A selected group is its own batch root. A selected operation resolves to
/// its nearest enclosing group, searched from the tree root: every visited
/// group checks its direct operations before descending into its child
/// groups, in order. Returns `None` when the operation is not reachable.
pub fn resolve_root(tree: &JobTree, selected: NodeId) -> Option<NodeId> {
    resolve_root_from(tree, tree.root(), selected)
}

/// Same as [`resolve_root`], searching only below `search_root`.
fn resolve_root_from(tree: &JobTree, search_root: NodeId, selected: NodeId) -> Option<NodeId> {
    if tree.is_group(selected) {
        return Some(selected);
    }
    owning_group(tree, search_root, selected)
}

// Explicit stack instead of recursion; child groups are pushed in reverse so
// they pop in their given order.
fn owning_group(tree: &JobTree, start: NodeId, target: NodeId) -> Option<NodeId> {
    let mut stack = vec![start];
    while let Some(group) = stack.pop() {
        let children = tree.children(group);
        if children
            .iter()
            .any(|&child| child == target && !tree.is_group(child))
        {
            return Some(group);
        }
        stack.extend(children.iter().rev().filter(|&&child| tree.is_group(child)));
    }
    None
}
