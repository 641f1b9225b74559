//! Depth bookkeeping for tree construction.
//!
//! The analysis engines consume `depth` as stored and never recompute it.
//! Trees assembled with [`SemanticNode::with_child`] stay consistent because
//! every attached subtree is rebased here; imported trees can be checked with
//! [`check_depths`].

use super::node::{Node, SemanticNode};
use crate::error::{Error, Result};

/// Set `root.depth = depth` and every descendant to its distance below it.
pub fn rebase_depths(root: &mut Node, depth: usize) {
    let mut stack: Vec<(&mut Node, usize)> = vec![(root, depth)];
    while let Some((node, d)) = stack.pop() {
        let core = SemanticNode::core_mut(node);
        core.depth = d;
        for child in core.children.iter_mut() {
            stack.push((child, d + 1));
        }
    }
}

/// Assign depths from scratch, with `root` at depth 0.
pub fn assign_depths(root: &mut Node) {
    rebase_depths(root, 0);
}

/// Verify that every child sits exactly one level below its parent.
///
/// The root's own depth is accepted as given, so subtrees cut out of a larger
/// tree still pass.
pub fn check_depths(root: &Node) -> Result<()> {
    let mut stack: Vec<&Node> = vec![root];
    while let Some(node) = stack.pop() {
        for child in node.children() {
            if child.depth() != node.depth() + 1 {
                return Err(Error::InvalidTree(format!(
                    "{} {} has depth {} but its parent {} has depth {}",
                    child.kind(),
                    child.id(),
                    child.depth(),
                    node.kind(),
                    node.depth()
                )));
            }
            stack.push(child);
        }
    }
    Ok(())
}
