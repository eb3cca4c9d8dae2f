use std::sync::mpsc::{self, Receiver};
use std::thread;

use strum_macros::{Display, EnumIter};

use super::token::{Token, TokenKind};

/// States of the selector scanner.
///
/// Each state either consumes input, emits a token, or both; none of them can
/// loop without making progress, so scanning always reaches [`Self::Done`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum TokenizerState {
    /// Between terms: skips horizontal whitespace and dispatches on the next
    /// character.
    Start,
    /// At the `#` of an ID term.
    IdPrefix,
    /// Expecting the identifier of an ID term.
    IdName,
    /// Expecting the identifier of an element term.
    ElementName,
    /// After an element name or `*`: a `.` extends the term with a class.
    ElementSuffix,
    /// At the `.` of a class suffix.
    ClassPrefix,
    /// Expecting the identifier of a class suffix.
    ClassName,
    /// An end-of-input or error token has been emitted.
    Done,
}

/// Scanner turning a selector string into [`Token`]s.
///
/// The tokenizer is a lazy, finite iterator: tokens are produced on demand,
/// the last one is always [`TokenKind::EndOfInput`] or [`TokenKind::Error`],
/// and nothing follows it.
///
/// ```
/// use mechanize_query::tokenizer::{TokenKind, Tokenizer};
///
/// let kinds: Vec<TokenKind> = Tokenizer::new("li.nav").map(|t| t.kind).collect();
/// assert_eq!(
///     kinds,
///     [
///         TokenKind::ElementName,
///         TokenKind::ClassPrefix,
///         TokenKind::ClassName,
///         TokenKind::EndOfInput,
///     ]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    /// Byte offset of the next unread character.
    position: usize,
    state: TokenizerState,
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer positioned at the start of `input`.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            state: TokenizerState::Start,
        }
    }

    /// The state the next call to `next` resumes from.
    #[must_use]
    pub const fn state(&self) -> TokenizerState {
        self.state
    }

    /// Byte offset of the next unread character.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    /// Run one state. Returns the token it emitted, if any.
    fn step(&mut self) -> Option<Token> {
        match self.state {
            TokenizerState::Start => self.start_state(),
            TokenizerState::IdPrefix => Some(self.prefix(TokenKind::IdPrefix, TokenizerState::IdName)),
            TokenizerState::IdName => {
                self.ident_state(TokenKind::Id, "expected id", TokenizerState::Start)
            }
            TokenizerState::ElementName => self.ident_state(
                TokenKind::ElementName,
                "expected element name",
                TokenizerState::ElementSuffix,
            ),
            TokenizerState::ElementSuffix => {
                self.state = if self.peek() == Some('.') {
                    TokenizerState::ClassPrefix
                } else {
                    TokenizerState::Start
                };
                None
            }
            TokenizerState::ClassPrefix => {
                Some(self.prefix(TokenKind::ClassPrefix, TokenizerState::ClassName))
            }
            TokenizerState::ClassName => self.ident_state(
                TokenKind::ClassName,
                "expected class name",
                TokenizerState::Start,
            ),
            TokenizerState::Done => None,
        }
    }

    fn start_state(&mut self) -> Option<Token> {
        while matches!(self.peek(), Some(' ' | '\t')) {
            self.position += 1;
        }

        let start = self.position;
        match self.peek() {
            None => {
                self.state = TokenizerState::Done;
                Some(Token::new(TokenKind::EndOfInput, "", start))
            }
            Some('#') => {
                self.state = TokenizerState::IdPrefix;
                None
            }
            // A term that starts with a class matches any element.
            Some('.') => {
                self.state = TokenizerState::ClassPrefix;
                Some(Token::new(TokenKind::WildcardShorthand, "", start))
            }
            Some('*') => {
                self.position += 1;
                self.state = TokenizerState::ElementSuffix;
                Some(Token::new(TokenKind::Wildcard, "*", start))
            }
            Some(c) if c == '-' || c.is_alphanumeric() => {
                self.state = TokenizerState::ElementName;
                None
            }
            Some(_) => Some(self.error(start, "expected element specification")),
        }
    }

    /// Emit the one-character `#` or `.` the current state is sitting on.
    fn prefix(&mut self, kind: TokenKind, next: TokenizerState) -> Token {
        let start = self.position;
        self.position += 1;
        self.state = next;
        Token::new(kind, &self.input[start..self.position], start)
    }

    fn ident_state(
        &mut self,
        kind: TokenKind,
        expected: &str,
        next: TokenizerState,
    ) -> Option<Token> {
        let start = self.position;
        let Some(end) = scan_ident(self.input.as_bytes(), start) else {
            return Some(self.error(start, expected));
        };
        self.position = end;
        self.state = next;
        Some(Token::new(kind, &self.input[start..end], start))
    }

    fn error(&mut self, position: usize, expected: &str) -> Token {
        self.state = TokenizerState::Done;
        Token::new(TokenKind::Error, expected, position)
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        while self.state != TokenizerState::Done {
            if let Some(token) = self.step() {
                return Some(token);
            }
        }
        None
    }
}

/// Tokenize `selector` eagerly.
#[must_use]
pub fn tokenize(selector: &str) -> Vec<Token> {
    Tokenizer::new(selector).collect()
}

/// Run the tokenizer on its own thread.
///
/// Tokens arrive in order on an unbounded channel; the channel closes after
/// the terminal token. Dropping the receiver early stops the producer at its
/// next send.
#[must_use]
pub fn spawn_tokenizer(selector: &str) -> Receiver<Token> {
    let (sender, receiver) = mpsc::channel();
    let input = selector.to_owned();
    let _producer = thread::spawn(move || {
        for token in Tokenizer::new(&input) {
            if sender.send(token).is_err() {
                break;
            }
        }
    });
    receiver
}

/// Scan an identifier starting at `start`.
///
/// ```text
/// ident       := '-'? ident-start ident-char*
/// ident-start := [_a-z] | nonascii | escape
/// ident-char  := [-_a-z0-9] | nonascii | escape
/// ```
///
/// Returns the byte offset just past the identifier, or `None` when no
/// identifier starts here.
fn scan_ident(bytes: &[u8], start: usize) -> Option<usize> {
    let mut position = start;
    if bytes.get(position) == Some(&b'-') {
        position += 1;
    }

    position = ident_unit(bytes, position, is_ident_start_byte)?;
    while let Some(next) = ident_unit(bytes, position, is_ident_byte) {
        position = next;
    }
    Some(position)
}

/// One piece of an identifier: a run of plain characters or a single escape.
fn ident_unit(bytes: &[u8], position: usize, plain: fn(u8) -> bool) -> Option<usize> {
    let run = bytes[position..].iter().take_while(|&&b| plain(b)).count();
    if run > 0 {
        return Some(position + run);
    }
    non_ascii_escape(bytes, position).or_else(|| escape(bytes, position))
}

const fn is_ident_start_byte(b: u8) -> bool {
    b == b'_' || b.is_ascii_lowercase()
}

const fn is_ident_byte(b: u8) -> bool {
    is_ident_start_byte(b) || b == b'-' || b.is_ascii_digit()
}

/// `\2dd` or `\3dd`: a backslash, `2` or `3`, then two digits.
fn non_ascii_escape(bytes: &[u8], position: usize) -> Option<usize> {
    match bytes.get(position..position + 4)? {
        [b'\\', b'2' | b'3', d1, d2] if d1.is_ascii_digit() && d2.is_ascii_digit() => {
            Some(position + 4)
        }
        _ => None,
    }
}

/// A code-point escape (`\` + 1 to 6 hex digits) or an escaped terminator
/// (`\\` + one of CR, LF, FF, `0`-`9`, `a`-`f`).
fn escape(bytes: &[u8], position: usize) -> Option<usize> {
    if bytes.get(position) != Some(&b'\\') {
        return None;
    }

    let hex = bytes[position + 1..]
        .iter()
        .take(6)
        .take_while(|b| b.is_ascii_hexdigit())
        .count();
    if hex > 0 {
        return Some(position + 1 + hex);
    }

    match bytes.get(position + 1..position + 3)? {
        [b'\\', b'\r' | b'\n' | 0x0C | b'0'..=b'9' | b'a'..=b'f'] => Some(position + 3),
        _ => None,
    }
}
