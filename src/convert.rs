//! Synchronous driver that feeds chunks through a lexer and parser.
//!
//! [`Converter`] owns everything one conversion needs: the lexer, the parser's
//! lookahead buffer and the grammar's per-run params. Callers push chunks as
//! they arrive and call [`Converter::finish`] once the input is exhausted.
//!
//! ```rust
//! use textgram::ini::{IniExpr, IniLexer};
//! use textgram::{Converter, IniSyntax};
//!
//! let syntax = IniSyntax::unix();
//! let mut converter = Converter::new(syntax, IniLexer::new());
//! converter.feed("[Glo").unwrap();
//! converter.feed("bal]\nkey = va").unwrap();
//! converter.feed("lue\n").unwrap();
//!
//! let Some(IniExpr::Section { section, .. }) = converter.finish().unwrap() else {
//!     panic!("expected a document");
//! };
//! assert_eq!(section.get_value(&["Global", "key"]), Some("value"));
//! ```

use crate::{Error, Grammar, Lexer, Parser, Result};
use std::io;

const READ_CHUNK: usize = 8 * 1024;

pub struct Converter<'s, G: Grammar, L: Lexer<G>> {
    syntax: &'s G,
    lexer: L,
    parser: Parser,
    params: G::Params,
    partial_utf8: Vec<u8>,
}

impl<'s, G, L> Converter<'s, G, L>
where
    G: Grammar,
    G::Params: Default,
    L: Lexer<G>,
{
    pub fn new(syntax: &'s G, lexer: L) -> Self {
        Converter {
            syntax,
            lexer,
            parser: Parser::new(),
            params: G::Params::default(),
            partial_utf8: Vec::new(),
        }
    }
}

impl<'s, G, L> Converter<'s, G, L>
where
    G: Grammar,
    L: Lexer<G>,
{
    /// Uses caller-provided params instead of the grammar's defaults.
    pub fn with_params(syntax: &'s G, lexer: L, params: G::Params) -> Self {
        Converter {
            syntax,
            lexer,
            parser: Parser::new(),
            params,
            partial_utf8: Vec::new(),
        }
    }

    /// Feeds one chunk of text to the lexer.
    pub fn feed(&mut self, chunk: &str) -> Result<()> {
        self.lexer.process(chunk, self.syntax, &mut self.params)
    }

    /// Feeds raw bytes; a UTF-8 sequence split across chunks is held back
    /// until its remaining bytes arrive.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.partial_utf8.extend_from_slice(bytes);
        let valid = match std::str::from_utf8(&self.partial_utf8) {
            Ok(text) => text.len(),
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(e) => return Err(Error::custom(format!("invalid UTF-8 input: {}", e))),
        };
        if valid == 0 {
            return Ok(());
        }
        let rest = self.partial_utf8.split_off(valid);
        let complete = std::mem::replace(&mut self.partial_utf8, rest);
        let text = String::from_utf8(complete).map_err(|e| Error::custom(e.to_string()))?;
        self.feed(&text)
    }

    /// Ends the input and parses whatever the lexer produced.
    ///
    /// Returns `Ok(None)` if the lexer never queued a token.
    pub fn finish(mut self) -> Result<Option<G::Expr>> {
        if !self.partial_utf8.is_empty() {
            return Err(Error::custom("input ends inside a UTF-8 sequence"));
        }
        self.lexer.end(self.syntax, &mut self.params)?;
        if !self.lexer.has_tokens() {
            return Ok(None);
        }
        let expr = self
            .parser
            .parse(&mut self.lexer, self.syntax, &mut self.params)?;
        Ok(Some(expr))
    }

    /// Reads `reader` to the end, then finishes the conversion.
    pub fn read_from<R: io::Read>(mut self, mut reader: R) -> Result<Option<G::Expr>> {
        let mut buffer = vec![0u8; READ_CHUNK];
        loop {
            let read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::io(&e.to_string())),
            };
            self.feed_bytes(&buffer[..read])?;
        }
        self.finish()
    }

    pub fn lexer(&self) -> &L {
        &self.lexer
    }

    pub fn params(&self) -> &G::Params {
        &self.params
    }
}
