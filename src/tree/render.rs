use std::fmt::Write;

use super::node::{JobTree, NodeId};

/// Name prefixes that mark a fixture setup group.
const SETUP_PREFIXES: &[&str] = &[
    "SETUP-", "SETUP_", "SETTING-", "SETTING_", "SET-", "SET_", "УСТАНОВ-", "УСТАНОВ_", "УСТ-",
    "УСТ_",
];

fn is_setup_group(name: &str) -> bool {
    SETUP_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
}

/// What [`render_tree`] prints besides the groups.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Expand only the direct child groups of the start that look like setups.
    pub setups_only: bool,
    /// List each group's operations as `* NAME`, in member order.
    pub operations: bool,
}

/// Indented outline below `start`, one `- NAME` line per group, four spaces per level.
pub fn render_tree(tree: &JobTree, start: NodeId, options: RenderOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "- {}", tree.display_name(start));

    let shown = |node: NodeId| tree.is_group(node) || options.operations;
    let mut stack: Vec<(NodeId, usize)> = tree
        .children(start)
        .iter()
        .copied()
        .filter(|&node| shown(node))
        .filter(|&node| {
            !options.setups_only
                || (tree.is_group(node) && is_setup_group(tree.display_name(node)))
        })
        .map(|node| (node, 1))
        .collect();
    stack.reverse();

    while let Some((node, level)) = stack.pop() {
        let indent = "    ".repeat(level);
        if !tree.is_group(node) {
            let _ = writeln!(out, "{indent}* {}", tree.display_name(node));
            continue;
        }
        let _ = writeln!(out, "{indent}- {}", tree.display_name(node));
        let nested: Vec<NodeId> = tree
            .children(node)
            .iter()
            .copied()
            .filter(|&child| shown(child))
            .collect();
        stack.extend(nested.into_iter().rev().map(|child| (child, level + 1)));
    }
    out
}
