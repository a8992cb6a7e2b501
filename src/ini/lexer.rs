//! Character-level INI tokenizer.
//!
//! Every decision depends only on the lexer's own state and the current
//! character, so the token sequence is the same however the input is split
//! into chunks. The one exception is `\r`: a chunk ending in `\r` keeps it
//! buffered until the next chunk shows whether a `\n` follows.

use super::types::*;
use super::{IniParams, IniSyntax};
use crate::{Error, Grammar, Lexer, Result, Token, TokenQueue, Type};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quote {
    Single,
    Double,
}

impl Quote {
    fn close_char(self) -> char {
        match self {
            Quote::Single => super::syntax::SINGLE_QUOTE,
            Quote::Double => super::syntax::DOUBLE_QUOTE,
        }
    }
}

/// Incremental lexer for [`IniSyntax`].
///
/// ```rust
/// use textgram::ini::{types, IniLexer, IniParams, IniSyntax};
/// use textgram::Lexer;
///
/// let syntax = IniSyntax::unix();
/// let mut params = IniParams::default();
/// let mut lexer = IniLexer::new();
/// lexer.process("key = va", syntax, &mut params).unwrap();
/// lexer.process("lue\n", syntax, &mut params).unwrap();
/// lexer.end(syntax, &mut params).unwrap();
///
/// let kinds: Vec<_> = lexer.queue().iter().map(|t| t.ty()).collect();
/// assert_eq!(
///     kinds,
///     [types::INIT, types::TEXT, types::ASSIGNMENT, types::WHITESPACE, types::TEXT, types::EOL]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct IniLexer {
    queue: TokenQueue,
    pending: String,
    ended: bool,
    line: usize,
    col: usize,
    line_has_content: bool,
    quote: Option<Quote>,
    text: String,
    text_start: (usize, usize),
    in_comment: bool,
    comment: String,
    comment_start: (usize, usize),
    escapes: usize,
    escape_body: String,
    escape_start: (usize, usize),
    hex_remaining: usize,
}

impl Default for IniLexer {
    fn default() -> Self {
        Self::new()
    }
}

impl IniLexer {
    /// A fresh lexer with the document-opening `INIT` token already queued.
    #[must_use]
    pub fn new() -> Self {
        let mut queue = TokenQueue::new();
        queue.push(Token::new("", INIT, 1, 1));
        IniLexer {
            queue,
            pending: String::new(),
            ended: false,
            line: 1,
            col: 1,
            line_has_content: false,
            quote: None,
            text: String::new(),
            text_start: (1, 1),
            in_comment: false,
            comment: String::new(),
            comment_start: (1, 1),
            escapes: 0,
            escape_body: String::new(),
            escape_start: (1, 1),
            hex_remaining: 0,
        }
    }

    fn run(&mut self, chunk: &str, syntax: &IniSyntax, last: bool) -> Result<()> {
        let mut input = std::mem::take(&mut self.pending);
        input.push_str(chunk);
        let mut chars = input.char_indices().peekable();
        while let Some((index, ch)) = chars.next() {
            if ch == '\r' {
                match chars.peek() {
                    Some((_, '\n')) => continue,
                    None if !last => {
                        self.pending = input[index..].to_string();
                        return Ok(());
                    }
                    _ => {}
                }
            }
            self.consume(ch, syntax)?;
        }
        Ok(())
    }

    fn consume(&mut self, ch: char, syntax: &IniSyntax) -> Result<()> {
        let at = (self.line, self.col);
        let line_end = is_line_end(ch);

        if self.escapes % 2 == 1 {
            self.escaped(ch, syntax)?;
        } else if line_end {
            self.flush_comment();
            self.flush_text();
            self.emit(ch.to_string(), EOL, at);
            self.quote = None;
            self.line_has_content = false;
        } else if self.in_comment {
            self.comment.push(ch);
        } else if self.quote.is_none()
            && syntax.is_comment(ch)
            && (syntax.inline_comments() || !self.line_has_content)
        {
            self.flush_text();
            self.in_comment = true;
            self.comment_start = at;
            self.comment.push(ch);
        } else if syntax.escape().char() == Some(ch) && syntax.escape().enabled(self.quote.is_some()) {
            self.flush_text();
            self.emit(ch.to_string(), ESCAPE, at);
            self.escapes += 1;
            self.escape_start = (self.line, self.col + 1);
        } else if let Some(quote) = self.quote {
            if ch == quote.close_char() {
                self.flush_text();
                let ty = match quote {
                    Quote::Single => QUOTE_END,
                    Quote::Double => DOUBLE_QUOTE_END,
                };
                self.emit(ch.to_string(), ty, at);
                self.quote = None;
            } else {
                self.push_text(ch, at);
            }
        } else if ch == super::syntax::SECTION_OPEN {
            self.flush_text();
            self.emit(ch.to_string(), SECTION_START, at);
        } else if ch == super::syntax::SECTION_CLOSE {
            self.flush_text();
            self.emit(ch.to_string(), SECTION_END, at);
        } else if syntax.quoting()
            && self.text.is_empty()
            && (ch == super::syntax::SINGLE_QUOTE || ch == super::syntax::DOUBLE_QUOTE)
        {
            let (quote, ty) = if ch == super::syntax::SINGLE_QUOTE {
                (Quote::Single, QUOTE)
            } else {
                (Quote::Double, DOUBLE_QUOTE)
            };
            self.emit(ch.to_string(), ty, at);
            self.quote = Some(quote);
        } else if syntax.is_nesting(ch) {
            self.flush_text();
            self.emit(ch.to_string(), SUB_SECTION, at);
        } else if syntax.is_delimiter(ch) {
            self.flush_text();
            self.emit(ch.to_string(), ASSIGNMENT, at);
        } else if syntax.is_whitespace(ch) {
            if self.text.is_empty() {
                self.emit(ch.to_string(), WHITESPACE, at);
            } else {
                self.text.push(ch);
            }
        } else {
            self.push_text(ch, at);
        }

        if !line_end && !self.in_comment && !syntax.is_whitespace(ch) {
            self.line_has_content = true;
        }
        if line_end {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Ok(())
    }

    /// Collects the body of an escape sequence.
    fn escaped(&mut self, ch: char, syntax: &IniSyntax) -> Result<()> {
        if self.escape_body.is_empty() {
            self.escape_body.push(ch);
            if let Some(width) = syntax.escape().unicode_width(ch) {
                self.hex_remaining = width;
                return Ok(());
            }
        } else {
            if !ch.is_ascii_hexdigit() {
                return Err(Error::syntax(
                    self.line,
                    self.col,
                    &ch.to_string(),
                    "expected a hex digit in unicode escape",
                ));
            }
            self.escape_body.push(ch);
            self.hex_remaining -= 1;
            if self.hex_remaining > 0 {
                return Ok(());
            }
        }

        let body = std::mem::take(&mut self.escape_body);
        let (line, col) = self.escape_start;
        let line_end = if body.chars().any(is_line_end) {
            line + 1
        } else {
            line
        };
        self.queue
            .push(Token::spanning(body, ESCAPED, line, line_end, col));
        self.escapes += 1;
        self.line_has_content = true;
        Ok(())
    }

    fn push_text(&mut self, ch: char, at: (usize, usize)) {
        if self.text.is_empty() {
            self.text_start = at;
        }
        self.text.push(ch);
    }

    fn flush_text(&mut self) {
        if self.text.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.text);
        let (line, col) = self.text_start;
        self.queue.push(Token::new(text, TEXT, line, col));
    }

    fn flush_comment(&mut self) {
        if !self.in_comment {
            return;
        }
        self.in_comment = false;
        let comment = std::mem::take(&mut self.comment);
        let (line, col) = self.comment_start;
        self.queue.push(Token::new(comment, COMMENT, line, col));
    }

    fn emit(&mut self, value: String, ty: Type, at: (usize, usize)) {
        self.queue.push(Token::new(value, ty, at.0, at.1));
    }
}

fn is_line_end(ch: char) -> bool {
    ch == '\n' || ch == '\r'
}

impl Lexer<IniSyntax> for IniLexer {
    fn process(&mut self, chunk: &str, syntax: &IniSyntax, _params: &mut IniParams) -> Result<()> {
        if self.ended {
            return Err(Error::custom("input received after the lexer was ended"));
        }
        self.run(chunk, syntax, false)
    }

    fn end(&mut self, syntax: &IniSyntax, _params: &mut IniParams) -> Result<()> {
        if self.ended {
            return Ok(());
        }
        self.run("", syntax, true)?;
        self.ended = true;
        if self.escapes % 2 == 1 {
            let (line, col) = self.escape_start;
            return Err(Error::syntax(
                line,
                col,
                &self.escape_body,
                "input ends inside an escape sequence",
            ));
        }
        self.flush_comment();
        self.flush_text();
        if self.queue.last_type() != Some(EOL) {
            let at = (self.line, self.col);
            self.emit(String::new(), EOL, at);
        }
        tracing::debug!(lines = self.line, queued = self.queue.len(), "INI input ended");
        Ok(())
    }

    fn can_process(&self) -> bool {
        !self.ended || !self.pending.is_empty()
    }

    fn position(&self) -> (usize, usize) {
        (self.line, self.col)
    }

    fn queue(&self) -> &TokenQueue {
        &self.queue
    }

    fn queue_mut(&mut self) -> &mut TokenQueue {
        &mut self.queue
    }
}
