//! Flattening of a classification tree into display rows.

use crate::classify::GroupNode;
use crate::model::Entry;

#[derive(Debug, Clone, PartialEq)]
pub enum RenderedNode<'a> {
    /// Group heading; `count` is the number of entries below it.
    Header {
        label: String,
        level: usize,
        count: usize,
    },
    Entry { entry: &'a Entry, level: usize },
}

impl RenderedNode<'_> {
    #[inline]
    pub fn level(&self) -> usize {
        match self {
            RenderedNode::Header { level, .. } | RenderedNode::Entry { level, .. } => *level,
        }
    }
}

/// Render `node` under a heading `label` at `depth`.
///
/// Children sit one level deeper than their heading. Groups nest as deep as
/// the tree does; there is no fixed number of levels.
pub fn render_tree<'a>(label: &str, node: &GroupNode<'a>, depth: usize) -> Vec<RenderedNode<'a>> {
    let mut out = Vec::new();
    render_into(label, node, depth, &mut out);
    out
}

/// Rows for every top-level group of `tree`, without a heading for the root.
pub fn render_groups<'a>(tree: &GroupNode<'a>) -> Vec<RenderedNode<'a>> {
    let mut out = Vec::new();
    match tree {
        GroupNode::Leaf(entries) => push_entries(entries, 0, &mut out),
        GroupNode::Branch(children) => {
            for (key, child) in children {
                out.extend(render_tree(key, child, 0));
            }
        }
    }
    out
}

fn render_into<'a>(label: &str, node: &GroupNode<'a>, depth: usize, out: &mut Vec<RenderedNode<'a>>) {
    out.push(RenderedNode::Header {
        label: label.to_string(),
        level: depth,
        count: node.len(),
    });
    match node {
        GroupNode::Leaf(entries) => push_entries(entries, depth + 1, out),
        GroupNode::Branch(children) => {
            for (key, child) in children {
                render_into(key, child, depth + 1, out);
            }
        }
    }
}

fn push_entries<'a>(entries: &[&'a Entry], level: usize, out: &mut Vec<RenderedNode<'a>>) {
    out.extend(
        entries
            .iter()
            .map(|&entry| RenderedNode::Entry { entry, level }),
    );
}
