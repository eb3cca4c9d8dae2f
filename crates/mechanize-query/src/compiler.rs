//! Folding a token stream into a [`Chain`] of term specifications.

use std::fmt;
use std::slice;

use mechanize_common::warning::warn_once;
use serde::Serialize;

use crate::error::SelectorError;
use crate::matcher::TermSpec;
use crate::tokenizer::{Token, TokenKind, Tokenizer, spawn_tokenizer};

/// Ordered terms of a selector. Each term after the first must match at or
/// below a node matched by the term before it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Chain {
    terms: Vec<TermSpec>,
}

impl Chain {
    /// Build a chain from terms directly.
    #[must_use]
    pub const fn new(terms: Vec<TermSpec>) -> Self {
        Self { terms }
    }

    /// The terms, first to last.
    #[must_use]
    pub fn terms(&self) -> &[TermSpec] {
        &self.terms
    }

    /// Number of terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// An empty chain matches nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Iterate over the terms.
    pub fn iter(&self) -> slice::Iter<'_, TermSpec> {
        self.terms.iter()
    }

    /// Attach a class to the most recent term.
    ///
    /// A class never starts a term of its own, and never qualifies an ID term;
    /// in either case a wildcard term is appended to carry it.
    fn set_class(&mut self, class_name: String) {
        match self.terms.last_mut() {
            Some(term) if !term.is_id_term() => term.class_name = Some(class_name),
            _ => self.terms.push(TermSpec::wildcard().with_class(class_name)),
        }
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a TermSpec;
    type IntoIter = slice::Iter<'a, TermSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<TermSpec> for Chain {
    fn from_iter<I: IntoIterator<Item = TermSpec>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{term}")?;
        }
        Ok(())
    }
}

/// The lexical error that stopped compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    /// Byte offset reported by the tokenizer.
    pub offset: usize,
    /// Description of the expected construct.
    pub expected: String,
}

/// Outcome of folding a token stream: the chain built so far and, if the
/// stream ended in an error token, that error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compiled {
    /// Terms built from the tokens consumed.
    pub chain: Chain,
    /// Set when the stream ended with [`TokenKind::Error`].
    pub error: Option<LexError>,
}

impl Compiled {
    /// Keep the chain, reporting a lexical error as a warning.
    #[must_use]
    pub fn into_lenient(self, selector: &str) -> Chain {
        if let Some(error) = &self.error {
            warn_once(
                "Selector",
                &format!(
                    "selector {selector:?} truncated at byte {}: {}",
                    error.offset, error.expected
                ),
            );
        }
        self.chain
    }

    /// Turn a lexical error into a [`SelectorError`].
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::Syntax`] when the stream ended in an error.
    pub fn into_result(self, selector: &str) -> Result<Chain, SelectorError> {
        match self.error {
            None => Ok(self.chain),
            Some(LexError { offset, expected }) => Err(SelectorError::Syntax {
                selector: selector.to_string(),
                offset,
                expected,
                partial: self.chain,
            }),
        }
    }
}

/// Fold tokens into a chain, stopping at the first end-of-input or error token.
///
/// Prefix tokens (`#`, `.`) carry nothing; the identifier that follows them
/// decides what is built.
#[must_use]
pub fn compile_tokens<I>(tokens: I) -> Compiled
where
    I: IntoIterator<Item = Token>,
{
    let mut chain = Chain::default();

    for token in tokens {
        match token.kind {
            TokenKind::Id => chain.terms.push(TermSpec::by_id(token.text)),
            TokenKind::Wildcard | TokenKind::WildcardShorthand => {
                chain.terms.push(TermSpec::wildcard());
            }
            TokenKind::ElementName => chain.terms.push(TermSpec::element(token.text)),
            TokenKind::ClassName => chain.set_class(token.text),
            TokenKind::IdPrefix | TokenKind::ClassPrefix => {}
            TokenKind::EndOfInput => break,
            TokenKind::Error => {
                return Compiled {
                    chain,
                    error: Some(LexError {
                        offset: token.position,
                        expected: token.text,
                    }),
                };
            }
        }
    }

    Compiled { chain, error: None }
}

/// Compile a selector, keeping whatever was built before a lexical error.
///
/// Malformed selectors never panic: `"li #"` compiles to the single term `li`,
/// and the truncation is reported once through the warning system.
#[must_use]
pub fn compile(selector: &str) -> Chain {
    compile_tokens(Tokenizer::new(selector)).into_lenient(selector)
}

/// Compile a selector, rejecting it if it does not tokenize completely.
///
/// # Errors
///
/// Returns [`SelectorError::Syntax`] with the byte offset and expected
/// construct of the first lexical error.
pub fn try_compile(selector: &str) -> Result<Chain, SelectorError> {
    compile_tokens(Tokenizer::new(selector)).into_result(selector)
}

/// [`compile`], with the tokenizer running on its own thread and feeding the
/// compiler through a channel.
#[must_use]
pub fn compile_concurrent(selector: &str) -> Chain {
    compile_tokens(spawn_tokenizer(selector)).into_lenient(selector)
}
