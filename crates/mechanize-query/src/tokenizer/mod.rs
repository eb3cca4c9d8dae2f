//! Selector tokenizer module.

/// Tokenizer state machine and its threaded producer.
pub mod scanner;
/// Token types produced by the tokenizer.
pub mod token;

pub use scanner::{Tokenizer, TokenizerState, spawn_tokenizer, tokenize};
pub use token::{Token, TokenKind};
