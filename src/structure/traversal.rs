//! Structure tree traversal.
//!
//! Implements pre-order traversal with an explicit stack, so very deep trees
//! cannot overflow the call stack. The parent of each visited node is handed
//! out alongside it; nodes themselves never store a parent.

use super::node::{Node, SemanticNode};
use crate::geometry::BoundingBox;
use std::collections::BTreeMap;

/// One step of a pre-order walk.
#[derive(Debug, Clone, Copy)]
pub struct Visit<'a> {
    /// The visited node
    pub node: &'a Node,
    /// Its parent, `None` for the walk root
    pub parent: Option<&'a Node>,
    /// Position in visit order, starting at 0
    pub ordinal: usize,
}

/// Pre-order iterator over a tree (node first, then children in author order).
pub struct PreOrder<'a> {
    stack: Vec<(&'a Node, Option<&'a Node>)>,
    visited: usize,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = Visit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (node, parent) = self.stack.pop()?;
        // Reversed so the first child is popped first
        for child in node.children().iter().rev() {
            self.stack.push((child, Some(node)));
        }
        let ordinal = self.visited;
        self.visited += 1;
        Some(Visit {
            node,
            parent,
            ordinal,
        })
    }
}

/// Walk `root` and all its descendants in document order.
pub fn pre_order(root: &Node) -> PreOrder<'_> {
    PreOrder {
        stack: vec![(root, None)],
        visited: 0,
    }
}

/// A node that has a bounding box, in claimed reading order.
#[derive(Debug, Clone, Copy)]
pub struct PositionedNode<'a> {
    /// The node
    pub node: &'a Node,
    /// Its bounding box
    pub bbox: BoundingBox,
    /// Index of the nearest positioned ancestor in the collected list
    pub positioned_ancestor: Option<usize>,
}

/// Collect every node with a bounding box, in document order.
///
/// Nodes without a box are skipped, but their descendants are still visited.
pub fn collect_positioned(root: &Node) -> Vec<PositionedNode<'_>> {
    let mut out: Vec<PositionedNode<'_>> = Vec::new();
    let mut stack: Vec<(&Node, Option<usize>)> = vec![(root, None)];

    while let Some((node, ancestor)) = stack.pop() {
        let inherited = match node.bbox() {
            Some(bbox) => {
                out.push(PositionedNode {
                    node,
                    bbox: *bbox,
                    positioned_ancestor: ancestor,
                });
                Some(out.len() - 1)
            },
            None => ancestor,
        };
        for child in node.children().iter().rev() {
            stack.push((child, inherited));
        }
    }

    out
}

/// Whether entry `ancestor` is a positioned ancestor of entry `descendant`.
pub fn is_positioned_ancestor(
    positioned: &[PositionedNode<'_>],
    ancestor: usize,
    descendant: usize,
) -> bool {
    let mut current = positioned.get(descendant).and_then(|p| p.positioned_ancestor);
    while let Some(index) = current {
        if index == ancestor {
            return true;
        }
        // Ancestors are always collected before their descendants
        if index < ancestor {
            return false;
        }
        current = positioned[index].positioned_ancestor;
    }
    false
}

/// Group collected indices by page, preserving document order within a page.
pub fn group_by_page(positioned: &[PositionedNode<'_>]) -> BTreeMap<u32, Vec<usize>> {
    let mut pages: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for (index, entry) in positioned.iter().enumerate() {
        pages.entry(entry.bbox.page_index).or_default().push(index);
    }
    pages
}
