//! Selector engine for locating elements in a parsed document.
//!
//! # Scope
//!
//! This crate implements a small CSS-like selector language:
//! - **Tokenizer** ([`tokenizer`])
//!   - `#id`, `name`, `*` and `.class` terms separated by whitespace
//!   - CSS-style identifier escapes, kept verbatim in token text
//!   - Lazy iterator, or a producer thread feeding a channel
//!
//! - **Compiler** ([`compiler`])
//!   - Folds tokens into a [`Chain`] of [`TermSpec`]s
//!   - Lenient ([`compile`]) and strict ([`try_compile`]) entry points
//!
//! - **Matcher** ([`matcher`])
//!   - Tests one term against one element; class matching is a substring test
//!
//! - **Walker** ([`walker`])
//!   - Pre-order walk applying a chain as a descendant-combinator selector
//!   - [`MatchMode::Inclusive`] (every term match) or [`MatchMode::Strict`]
//!
//! - **Forms** ([`form`])
//!   - Locating the `<form>` that contains a match for a selector
//!
//! # Not Supported
//!
//! - Child, sibling and other combinators besides whitespace
//! - Attribute selectors, pseudo-classes and pseudo-elements
//! - Selector groups (`a, b`)
//! - Compound selectors with more than one class, or an id plus a tag
//!
//! # Example
//!
//! ```
//! use mechanize_dom::{DomTree, ElementData, NodeType};
//! use mechanize_query::select;
//!
//! let mut tree = DomTree::new();
//! let ul = tree.alloc(NodeType::Element(ElementData::new("ul")));
//! tree.append_child(tree.root(), ul);
//! let li = tree.alloc(NodeType::Element(
//!     ElementData::new("li").with_attr("class", "nav-item"),
//! ));
//! tree.append_child(ul, li);
//!
//! let selection = select(&tree, "ul .nav");
//! assert_eq!(selection.nodes(), &[ul, li]);
//! ```

pub mod compiler;
pub mod error;
pub mod form;
pub mod matcher;
pub mod tokenizer;
pub mod walker;

pub use compiler::{Chain, Compiled, LexError, compile, compile_concurrent, compile_tokens, try_compile};
pub use error::{QueryError, SelectorError};
pub use form::{find_form, forms};
pub use matcher::{TermSpec, WILDCARD};
pub use tokenizer::{Token, TokenKind, Tokenizer, spawn_tokenizer, tokenize};
pub use walker::{
    MatchMode, MatchOptions, Selection, find_all, find_all_from, find_all_with, select,
};
