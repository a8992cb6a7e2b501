//! Token and token-type model shared by every grammar.
//!
//! A [`Type`] names a lexical category and carries the numeric precedence the
//! parser uses to decide when an expression stops absorbing infix tokens. Two
//! types are equal when both their id and precedence are equal.
//!
//! ```rust
//! use textgram::{Token, Type};
//!
//! const WORD: Type = Type::new("WORD", 0);
//!
//! let token = Token::new("hello", WORD, 1, 1);
//! assert_eq!(token.ty(), WORD);
//! assert_eq!(token.len(), 5);
//! ```

use std::collections::VecDeque;
use std::fmt;

/// A lexical category plus its binding precedence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Type {
    id: &'static str,
    precedence: u32,
}

impl Type {
    /// Type of the token returned when a lexer has nothing queued.
    pub const EOF: Type = Type::new("EOF", 0);

    #[must_use]
    pub const fn new(id: &'static str, precedence: u32) -> Self {
        Type { id, precedence }
    }

    #[inline]
    #[must_use]
    pub const fn id(&self) -> &'static str {
        self.id
    }

    #[inline]
    #[must_use]
    pub const fn precedence(&self) -> u32 {
        self.precedence
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// The role a token plays relative to the expression being built.
///
/// `Postfix` is never queried by [`Parser`](crate::Parser) itself; grammars
/// with their own commands may use it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Prefix,
    Infix,
    Postfix,
}

/// A classified, positioned fragment of input text.
///
/// Lines and columns are 1-based. `length` counts characters, not bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    value: String,
    ty: Type,
    line_start: usize,
    line_end: usize,
    start_pos: usize,
    length: usize,
}

impl Token {
    /// Creates a token that starts and ends on the same line.
    pub fn new(value: impl Into<String>, ty: Type, line: usize, start_pos: usize) -> Self {
        Self::spanning(value, ty, line, line, start_pos)
    }

    /// Creates a token whose text crosses line breaks.
    pub fn spanning(
        value: impl Into<String>,
        ty: Type,
        line_start: usize,
        line_end: usize,
        start_pos: usize,
    ) -> Self {
        let value = value.into();
        let length = value.chars().count();
        Token {
            value,
            ty,
            line_start,
            line_end,
            start_pos,
            length,
        }
    }

    /// The end-of-input marker.
    #[must_use]
    pub fn eof(line: usize, start_pos: usize) -> Self {
        Token::new("", Type::EOF, line, start_pos)
    }

    #[inline]
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[inline]
    #[must_use]
    pub fn into_value(self) -> String {
        self.value
    }

    #[inline]
    #[must_use]
    pub fn ty(&self) -> Type {
        self.ty
    }

    #[inline]
    #[must_use]
    pub fn line_start(&self) -> usize {
        self.line_start
    }

    #[inline]
    #[must_use]
    pub fn line_end(&self) -> usize {
        self.line_end
    }

    #[inline]
    #[must_use]
    pub fn start_pos(&self) -> usize {
        self.start_pos
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.length
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    #[inline]
    #[must_use]
    pub fn is(&self, ty: Type) -> bool {
        self.ty == ty
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({:?}) at {}:{}",
            self.ty, self.value, self.line_start, self.start_pos
        )
    }
}

/// FIFO of tokens a lexer has produced but the parser has not pulled yet.
#[derive(Clone, Debug, Default)]
pub struct TokenQueue {
    tokens: VecDeque<Token>,
    last_type: Option<Type>,
}

impl TokenQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: Token) {
        tracing::trace!(token = %token, "queued");
        self.last_type = Some(token.ty());
        self.tokens.push_back(token);
    }

    pub fn pop(&mut self) -> Option<Token> {
        self.tokens.pop_front()
    }

    /// Type of the most recently queued token, even if it was already pulled.
    #[must_use]
    pub fn last_type(&self) -> Option<Type> {
        self.last_type
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    /// Number of queued tokens of type `ty`.
    #[must_use]
    pub fn frequency(&self, ty: Type) -> usize {
        self.tokens.iter().filter(|t| t.is(ty)).count()
    }

    #[must_use]
    pub fn index_of(&self, ty: Type) -> Option<usize> {
        self.tokens.iter().position(|t| t.is(ty))
    }

    #[must_use]
    pub fn last_index_of(&self, ty: Type) -> Option<usize> {
        self.tokens.iter().rposition(|t| t.is(ty))
    }
}
