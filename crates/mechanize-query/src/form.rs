//! Locating `<form>` elements by a selector that matches inside them.

use mechanize_dom::{DomTree, NodeId};

use crate::compiler::try_compile;
use crate::error::QueryError;
use crate::walker::{MatchOptions, find_all_from};

/// Every `<form>` element of `tree`, in document order.
///
/// Nested forms are invalid HTML but are still listed if present.
#[must_use]
pub fn forms(tree: &DomTree) -> Vec<NodeId> {
    tree.descendants(tree.root())
        .filter(|&id| tree.as_element(id).is_some_and(|el| el.tag_name == "form"))
        .collect()
}

/// The first form whose subtree, the form itself included, contains a match
/// for `selector`.
///
/// `"#login"` finds the form with that id as well as the form around an
/// element with that id.
///
/// Unlike [`select`](crate::select), a malformed selector is rejected rather
/// than truncated, so `"#login >"` is an error and not a lookup of `#login`.
///
/// # Errors
///
/// [`QueryError::Selector`] if the selector does not tokenize completely, and
/// [`QueryError::FormNotFound`] if no form matches.
pub fn find_form(tree: &DomTree, selector: &str) -> Result<NodeId, QueryError> {
    let chain = try_compile(selector)?;

    for form in forms(tree) {
        if !find_all_from(tree, form, &chain, MatchOptions::default())?.is_empty() {
            return Ok(form);
        }
    }

    Err(QueryError::FormNotFound {
        selector: selector.to_string(),
    })
}
