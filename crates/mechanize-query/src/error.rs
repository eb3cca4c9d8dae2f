//! Error types for selector compilation and querying.

use mechanize_dom::NodeId;
use thiserror::Error;

use crate::compiler::Chain;

/// A selector that could not be fully tokenized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// Scanning stopped at `offset` because a required construct was missing.
    #[error("invalid selector {selector:?} at byte {offset}: {expected}")]
    Syntax {
        /// The selector as given.
        selector: String,
        /// Byte offset where the construct was expected.
        offset: usize,
        /// What the tokenizer was looking for.
        expected: String,
        /// Terms compiled before the error.
        partial: Chain,
    },
}

impl SelectorError {
    /// Byte offset of the error in the selector.
    #[must_use]
    pub const fn offset(&self) -> usize {
        match self {
            Self::Syntax { offset, .. } => *offset,
        }
    }

    /// The chain built from the tokens before the error.
    #[must_use]
    pub const fn partial_chain(&self) -> &Chain {
        match self {
            Self::Syntax { partial, .. } => partial,
        }
    }
}

/// Errors raised while querying a document.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The node a walk was asked to start from is not part of the tree.
    #[error("node {0:?} does not belong to this document")]
    NodeNotInTree(NodeId),

    /// No `<form>` in the document contains a match for the selector.
    #[error("no form matches selector {selector:?}")]
    FormNotFound {
        /// The selector that was looked up.
        selector: String,
    },

    /// The selector itself is malformed.
    #[error(transparent)]
    Selector(#[from] SelectorError),
}
