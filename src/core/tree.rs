//! Fixed-depth tree assembly.
//!
//! Tree queries load the roots and a fixed number of descendant levels as flat
//! row lists, then nest them here. Rows deeper than [`TREE_DEPTH`] are never
//! loaded, so they never appear in the output.

use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

/// Number of levels a tree query materializes, roots included.
pub const TREE_DEPTH: usize = 3;

/// A row together with its nested children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode<T> {
    /// The row itself, serialized inline
    #[serde(flatten)]
    pub node: T,
    /// Direct children, in query order
    pub children: Vec<TreeNode<T>>,
}

impl<T> TreeNode<T> {
    /// Number of levels below and including this node.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Self::depth).max().unwrap_or(0)
    }
}

/// Nests per-level row lists into trees.
///
/// `levels[0]` holds the roots and `levels[n + 1]` holds rows whose parent is
/// in `levels[n]`. Sibling order within each level is preserved. Rows whose
/// parent is missing from the level above are dropped.
pub fn assemble_levels<T, I, P>(levels: Vec<Vec<T>>, id: I, parent_id: P) -> Vec<TreeNode<T>>
where
    I: Fn(&T) -> Uuid,
    P: Fn(&T) -> Option<Uuid>,
{
    let mut below: HashMap<Uuid, Vec<TreeNode<T>>> = HashMap::new();
    let mut top = Vec::new();

    for level in levels.into_iter().rev() {
        let mut grouped: HashMap<Uuid, Vec<TreeNode<T>>> = HashMap::new();
        top = Vec::with_capacity(level.len());

        for row in level {
            let children = below.remove(&id(&row)).unwrap_or_default();
            let parent = parent_id(&row);
            let node = TreeNode {
                node: row,
                children,
            };
            match parent {
                Some(parent) => grouped.entry(parent).or_default().push(node),
                None => top.push(node),
            }
        }

        below = grouped;
    }

    top
}
