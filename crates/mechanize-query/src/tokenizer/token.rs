//! Lexical tokens of the selector language.
//!
//! Tokens are emitted strictly in source order and are never modified after
//! emission. Every stream ends with exactly one [`TokenKind::EndOfInput`] or
//! [`TokenKind::Error`] token.

use serde::Serialize;
use strum_macros::Display;

/// The kind of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
pub enum TokenKind {
    /// A bare identifier naming an element, e.g. `li`.
    ElementName,
    /// An explicit `*`.
    Wildcard,
    /// Implied wildcard for a term that starts with `.`; carries no text.
    WildcardShorthand,
    /// The `.` introducing a class name.
    ClassPrefix,
    /// The identifier after a `.`.
    ClassName,
    /// The `#` introducing an ID.
    IdPrefix,
    /// The identifier after a `#`.
    Id,
    /// End of the selector string.
    EndOfInput,
    /// A construct could not be recognized; the text describes what was expected.
    Error,
}

/// A token and where it starts in the selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// What was recognized.
    pub kind: TokenKind,
    /// The source text of the token. For [`TokenKind::Error`] this is a
    /// description of the expected construct instead.
    pub text: String,
    /// Byte offset of the token in the selector.
    pub position: usize,
}

impl Token {
    /// Create a token.
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }

    /// Whether this token ends the stream.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self.kind, TokenKind::EndOfInput | TokenKind::Error)
    }
}
