//! The incremental lexer contract.
//!
//! Lexers are fed chunks of input as they arrive. Every call to
//! [`Lexer::process`] runs to completion and leaves any partially built token
//! in the lexer's own state, so the next chunk continues exactly where the
//! previous one stopped. [`Lexer::end`] flushes whatever is still pending.

use crate::{Grammar, Result, Token, TokenQueue, Type};

pub trait Lexer<G: Grammar> {
    /// Consumes `chunk`, queueing every token it completes.
    fn process(&mut self, chunk: &str, syntax: &G, params: &mut G::Params) -> Result<()>;

    /// Signals that no more input will arrive and flushes pending state.
    fn end(&mut self, syntax: &G, params: &mut G::Params) -> Result<()>;

    /// `false` once nothing is buffered and no more input is expected.
    fn can_process(&self) -> bool;

    /// Current `(line, column)` of the input cursor.
    fn position(&self) -> (usize, usize);

    fn queue(&self) -> &TokenQueue;

    fn queue_mut(&mut self) -> &mut TokenQueue;

    /// Dequeues the oldest token, or an EOF token when the queue is empty.
    fn next_token(&mut self) -> Token {
        match self.queue_mut().pop() {
            Some(token) => token,
            None => {
                let (line, col) = self.position();
                Token::eof(line, col)
            }
        }
    }

    fn has_tokens(&self) -> bool {
        !self.queue().is_empty()
    }

    fn frequency(&self, ty: Type) -> usize {
        self.queue().frequency(ty)
    }

    fn index_of(&self, ty: Type) -> Option<usize> {
        self.queue().index_of(ty)
    }

    fn last_index_of(&self, ty: Type) -> Option<usize> {
        self.queue().last_index_of(ty)
    }
}
