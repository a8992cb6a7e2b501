//! Operator-precedence (Pratt) parser.
//!
//! The parser owns nothing but a small lookahead buffer. Each call resolves
//! the prefix command of the next token, then keeps handing the result to
//! infix commands for as long as the upcoming token binds tighter than the
//! current precedence floor:
//!
//! ```text
//! parse_with_precedence(floor):
//!     left = PREFIX(next)(None)
//!     while floor < precedence(peek):
//!         left = INFIX(next)(Some(left))
//!     left
//! ```
//!
//! A token's precedence is its [`Type`]'s precedence when the grammar defines
//! an infix command for it, and `0` otherwise. Infix commands that need a
//! right-hand side recurse with their own precedence as the floor, which makes
//! operators of equal precedence left-associative.

use crate::{Direction, Error, Grammar, Lexer, Result, Token, Type};
use std::collections::VecDeque;

/// Drives a [`Lexer`] through a grammar's commands.
#[derive(Debug, Default)]
pub struct Parser {
    pending: VecDeque<Token>,
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses one expression with a precedence floor of `0`.
    pub fn parse<G: Grammar>(
        &mut self,
        lexer: &mut dyn Lexer<G>,
        syntax: &G,
        params: &mut G::Params,
    ) -> Result<G::Expr> {
        self.parse_with_precedence(0, lexer, syntax, params)
    }

    /// Parses one expression, stopping before any infix token whose
    /// precedence is not above `floor`.
    pub fn parse_with_precedence<G: Grammar>(
        &mut self,
        floor: u32,
        lexer: &mut dyn Lexer<G>,
        syntax: &G,
        params: &mut G::Params,
    ) -> Result<G::Expr> {
        let token = self.pop(lexer);
        let prefix = syntax
            .command(Direction::Prefix, token.ty())
            .ok_or_else(|| unexpected(&token, "no prefix command for this token"))?;
        tracing::debug!(token = %token, floor, "prefix");
        let mut left = prefix(self, lexer, syntax, params, token, None)?;

        while floor < self.precedence_of(lexer, syntax) {
            let token = self.pop(lexer);
            let infix = syntax
                .command(Direction::Infix, token.ty())
                .ok_or_else(|| unexpected(&token, "no infix command for this token"))?;
            tracing::debug!(token = %token, floor, "infix");
            left = infix(self, lexer, syntax, params, token, Some(left))?;
        }

        Ok(left)
    }

    /// Binding precedence of the next token.
    pub fn precedence_of<G: Grammar>(&mut self, lexer: &mut dyn Lexer<G>, syntax: &G) -> u32 {
        let ty = self.peek(0, lexer).ty();
        match syntax.command(Direction::Infix, ty) {
            Some(_) => ty.precedence(),
            None => 0,
        }
    }

    /// Looks `distance` tokens ahead without consuming anything.
    pub fn peek<G: Grammar>(&mut self, distance: usize, lexer: &mut dyn Lexer<G>) -> &Token {
        while self.pending.len() <= distance {
            self.pending.push_back(lexer.next_token());
        }
        &self.pending[distance]
    }

    /// Removes and returns the next token.
    pub fn pop<G: Grammar>(&mut self, lexer: &mut dyn Lexer<G>) -> Token {
        match self.pending.pop_front() {
            Some(token) => token,
            None => lexer.next_token(),
        }
    }

    /// Pops the next token, failing if it is not of type `expected`.
    pub fn consume<G: Grammar>(&mut self, expected: Type, lexer: &mut dyn Lexer<G>) -> Result<Token> {
        let token = self.peek(0, lexer);
        if !token.is(expected) {
            return Err(unexpected(
                token,
                &format!("expected {}, found {}", expected, token.ty()),
            ));
        }
        Ok(self.pop(lexer))
    }

    /// Returns `true` if the next token is of type `expected`.
    pub fn matches<G: Grammar>(&mut self, expected: Type, lexer: &mut dyn Lexer<G>) -> bool {
        self.peek(0, lexer).is(expected)
    }

    /// Number of tokens pulled from the lexer but not consumed yet.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.pending.len()
    }
}

fn unexpected(token: &Token, msg: &str) -> Error {
    Error::syntax(token.line_start(), token.start_pos(), token.value(), msg)
}
