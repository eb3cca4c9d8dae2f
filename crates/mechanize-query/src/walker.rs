//! Applying a [`Chain`] to a document tree.
//!
//! The walk is a pre-order traversal carrying the index of the term still to
//! be matched. When a node matches the current term, its subtree is searched
//! for the following terms only; siblings and unrelated subtrees keep the
//! index that was active when they were entered. Once the last term has
//! matched, the matched node is not descended into.

use std::iter::Copied;
use std::slice;

use mechanize_dom::{DomTree, ElementData, NodeId};

use crate::compiler::{Chain, compile};
use crate::error::QueryError;
use crate::matcher::TermSpec;

/// Which matched nodes a walk reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Every node that matched any term of the chain, in the order matched.
    /// For `div p` this reports the `div` ancestors as well as the `p`s.
    #[default]
    Inclusive,
    /// Only nodes that matched the final term.
    Strict,
}

/// Settings for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchOptions {
    /// See [`MatchMode`].
    pub mode: MatchMode,
}

impl MatchOptions {
    /// Report every matched node (the default).
    #[must_use]
    pub const fn inclusive() -> Self {
        Self {
            mode: MatchMode::Inclusive,
        }
    }

    /// Report only nodes matching the final term.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            mode: MatchMode::Strict,
        }
    }
}

/// Nodes matched by one query, in match order.
///
/// A selection only borrows the tree it was computed from.
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    tree: &'a DomTree,
    nodes: Vec<NodeId>,
}

impl<'a> Selection<'a> {
    /// The tree the nodes belong to.
    #[must_use]
    pub const fn tree(&self) -> &'a DomTree {
        self.tree
    }

    /// Matched node ids.
    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Number of matched nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First matched node.
    #[must_use]
    pub fn first(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    /// Whether `node` is part of the selection.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    /// Iterate over matched node ids.
    pub fn iter(&self) -> Copied<slice::Iter<'_, NodeId>> {
        self.nodes.iter().copied()
    }

    /// Element data of each matched node.
    pub fn elements(&self) -> impl Iterator<Item = &'a ElementData> + '_ {
        let tree = self.tree;
        self.nodes.iter().filter_map(move |&id| tree.as_element(id))
    }

    /// Give up the borrow and keep only the ids.
    #[must_use]
    pub fn into_nodes(self) -> Vec<NodeId> {
        self.nodes
    }
}

impl<'s> IntoIterator for &'s Selection<'_> {
    type Item = NodeId;
    type IntoIter = Copied<slice::Iter<'s, NodeId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Find every node of `tree` matching `chain`, starting at the document root.
#[must_use]
pub fn find_all<'a>(tree: &'a DomTree, chain: &Chain) -> Selection<'a> {
    find_all_with(tree, chain, MatchOptions::default())
}

/// [`find_all`] with explicit options.
#[must_use]
pub fn find_all_with<'a>(tree: &'a DomTree, chain: &Chain, options: MatchOptions) -> Selection<'a> {
    Selection {
        tree,
        nodes: walk(tree, tree.root(), chain.terms(), options.mode),
    }
}

/// Run the walk rooted at `node` instead of the document root.
///
/// # Errors
///
/// Returns [`QueryError::NodeNotInTree`] if `node` was not allocated by `tree`.
pub fn find_all_from<'a>(
    tree: &'a DomTree,
    node: NodeId,
    chain: &Chain,
    options: MatchOptions,
) -> Result<Selection<'a>, QueryError> {
    if !tree.contains(node) {
        return Err(QueryError::NodeNotInTree(node));
    }
    Ok(Selection {
        tree,
        nodes: walk(tree, node, chain.terms(), options.mode),
    })
}

/// Compile `selector` and find its matches in `tree`.
///
/// Uses the lenient compiler, so a malformed selector matches whatever its
/// valid prefix matches.
#[must_use]
pub fn select<'a>(tree: &'a DomTree, selector: &str) -> Selection<'a> {
    find_all(tree, &compile(selector))
}

fn walk(tree: &DomTree, root: NodeId, terms: &[TermSpec], mode: MatchMode) -> Vec<NodeId> {
    let mut matches = Vec::new();
    if terms.is_empty() {
        return matches;
    }

    // Children are pushed last-first so they pop in document order, which
    // keeps the output identical to a recursive pre-order walk.
    let mut stack = vec![(root, 0)];
    while let Some((node, mut position)) = stack.pop() {
        if terms[position].matches(tree, node) {
            position += 1;
            #[cfg(feature = "walk-trace")]
            eprintln!("[WALK] {node:?} matched term {position}/{}", terms.len());
            if mode == MatchMode::Inclusive || position == terms.len() {
                matches.push(node);
            }
        }

        if position == terms.len() {
            continue;
        }

        let mut children = Vec::new();
        let mut child = tree.first_child(node);
        while let Some(id) = child {
            children.push((id, position));
            child = tree.next_sibling(id);
        }
        stack.extend(children.into_iter().rev());
    }

    matches
}
