//! Commands that turn INI tokens into a [`Section`] tree.
//!
//! `INIT` opens the document and folds every following expression into the
//! root. A section header parses its own body up to the next header, so the
//! root only ever receives top-level properties and complete sections.

use super::tree::{Comments, IniExpr, KeyValue, Node, Section};
use super::types::*;
use super::{IniParams, IniSyntax};
use crate::{CommandTable, Direction, Error, Grammar, Lexer, Parser, Result, Token, Type};
use std::mem;

pub(crate) fn table() -> CommandTable<IniSyntax> {
    CommandTable::new()
        .with(Direction::Prefix, INIT, document)
        .with(Direction::Prefix, SECTION_START, section)
        .with(Direction::Prefix, ASSIGNMENT, assign_prefix)
        .with(Direction::Infix, ASSIGNMENT, assign_infix)
        .with_all(
            Direction::Prefix,
            &[TEXT, QUOTE, DOUBLE_QUOTE, ESCAPE, SUB_SECTION, SECTION_END],
            text,
        )
        .with(Direction::Prefix, WHITESPACE, skip_whitespace)
        .with(Direction::Prefix, COMMENT, comment)
        .with(Direction::Prefix, EOL, end_of_line)
}

fn document(
    parser: &mut Parser,
    lexer: &mut dyn Lexer<IniSyntax>,
    syntax: &IniSyntax,
    params: &mut IniParams,
    _token: Token,
    _left: Option<IniExpr>,
) -> Result<IniExpr> {
    params.section_path.clear();
    let duplicates = syntax.duplicates();
    let mut root = Section::new();

    while !parser.matches(EOF, lexer) {
        match parser.parse(lexer, syntax, params)? {
            IniExpr::Section { path, section } => {
                tracing::debug!(path = ?path, "section parsed");
                root.add(&path, Node::Section(section), duplicates)?;
            }
            other => fold_entry(parser, lexer, syntax, params, &mut root, other)?,
        }
    }

    root.trailing = mem::take(&mut params.preceding);
    Ok(IniExpr::document(root))
}

fn section(
    parser: &mut Parser,
    lexer: &mut dyn Lexer<IniSyntax>,
    syntax: &IniSyntax,
    params: &mut IniParams,
    token: Token,
    _left: Option<IniExpr>,
) -> Result<IniExpr> {
    params.in_section_name = true;
    let path = section_path(parser, lexer, syntax, params, &token);
    params.in_section_name = false;
    let path = path?;

    skip_blanks(parser, lexer);
    let inline = inline_comment(parser, lexer, syntax, params);
    parser.consume(EOL, lexer)?;

    let mut section = Section::new();
    section.comments = Comments {
        preceding: mem::take(&mut params.preceding),
        inline,
    };
    params.section_path = path.clone();

    loop {
        skip_blanks(parser, lexer);
        if parser.matches(SECTION_START, lexer) || parser.matches(EOF, lexer) {
            break;
        }
        let expr = parser.parse(lexer, syntax, params)?;
        fold_entry(parser, lexer, syntax, params, &mut section, expr)?;
    }

    Ok(IniExpr::Section { path, section })
}

/// Reads the segments of a section header up to and including `]`.
fn section_path(
    parser: &mut Parser,
    lexer: &mut dyn Lexer<IniSyntax>,
    syntax: &IniSyntax,
    params: &mut IniParams,
    open: &Token,
) -> Result<Vec<String>> {
    let (line, col) = (open.line_start(), open.start_pos());
    let mut path = Vec::new();
    if syntax.relative_nesting() && parser.matches(SUB_SECTION, lexer) {
        parser.pop(lexer);
        path.extend(params.section_path.iter().cloned());
    }

    loop {
        let segment = read_text(parser, lexer, syntax, params, None).map_err(|cause| {
            Error::parse_caused_by(line, col, "section name segment did not resolve to text", cause)
        })?;
        if segment.is_empty() {
            return Err(Error::parse(line, col, "empty section name segment"));
        }
        path.push(segment);
        if parser.matches(SUB_SECTION, lexer) {
            parser.pop(lexer);
            continue;
        }
        parser.consume(SECTION_END, lexer)?;
        return Ok(path);
    }
}

fn assign_prefix(
    parser: &mut Parser,
    lexer: &mut dyn Lexer<IniSyntax>,
    syntax: &IniSyntax,
    params: &mut IniParams,
    _token: Token,
    _left: Option<IniExpr>,
) -> Result<IniExpr> {
    assignment(parser, lexer, syntax, params, String::new())
}

fn assign_infix(
    parser: &mut Parser,
    lexer: &mut dyn Lexer<IniSyntax>,
    syntax: &IniSyntax,
    params: &mut IniParams,
    token: Token,
    left: Option<IniExpr>,
) -> Result<IniExpr> {
    let key = match left {
        Some(IniExpr::Text(key)) => key,
        Some(IniExpr::Empty) | None => String::new(),
        Some(_) => {
            return Err(Error::syntax(
                token.line_start(),
                token.start_pos(),
                token.value(),
                "assignment must follow a key",
            ))
        }
    };
    assignment(parser, lexer, syntax, params, key)
}

fn assignment(
    parser: &mut Parser,
    lexer: &mut dyn Lexer<IniSyntax>,
    syntax: &IniSyntax,
    params: &mut IniParams,
    key: String,
) -> Result<IniExpr> {
    params.assigned = true;
    let value = read_text(parser, lexer, syntax, params, None);
    params.assigned = false;
    let value = value?;

    let inline = inline_comment(parser, lexer, syntax, params);
    Ok(IniExpr::KeyValue(KeyValue {
        comments: Comments {
            preceding: mem::take(&mut params.preceding),
            inline,
        },
        key,
        value,
    }))
}

fn text(
    parser: &mut Parser,
    lexer: &mut dyn Lexer<IniSyntax>,
    syntax: &IniSyntax,
    params: &mut IniParams,
    token: Token,
    _left: Option<IniExpr>,
) -> Result<IniExpr> {
    read_text(parser, lexer, syntax, params, Some(token)).map(IniExpr::Text)
}

fn skip_whitespace(
    parser: &mut Parser,
    lexer: &mut dyn Lexer<IniSyntax>,
    syntax: &IniSyntax,
    params: &mut IniParams,
    token: Token,
    _left: Option<IniExpr>,
) -> Result<IniExpr> {
    skip_blanks(parser, lexer);
    parser.parse_with_precedence(token.ty().precedence(), lexer, syntax, params)
}

fn comment(
    _parser: &mut Parser,
    _lexer: &mut dyn Lexer<IniSyntax>,
    syntax: &IniSyntax,
    params: &mut IniParams,
    token: Token,
    _left: Option<IniExpr>,
) -> Result<IniExpr> {
    if syntax.retain_comments() {
        params.preceding.push(comment_text(token.value()));
    } else {
        tracing::debug!(line = token.line_start(), "dropping comment");
    }
    Ok(IniExpr::Empty)
}

fn end_of_line(
    _parser: &mut Parser,
    _lexer: &mut dyn Lexer<IniSyntax>,
    _syntax: &IniSyntax,
    _params: &mut IniParams,
    _token: Token,
    _left: Option<IniExpr>,
) -> Result<IniExpr> {
    Ok(IniExpr::Empty)
}

/// Adds a line-level expression to `section`.
fn fold_entry(
    parser: &mut Parser,
    lexer: &mut dyn Lexer<IniSyntax>,
    syntax: &IniSyntax,
    params: &mut IniParams,
    section: &mut Section,
    expr: IniExpr,
) -> Result<()> {
    let duplicates = syntax.duplicates();
    match expr {
        IniExpr::Empty => Ok(()),
        IniExpr::Text(key) => {
            let inline = inline_comment(parser, lexer, syntax, params);
            let entry = KeyValue {
                comments: Comments {
                    preceding: mem::take(&mut params.preceding),
                    inline,
                },
                key,
                value: String::new(),
            };
            section.add_property(entry, duplicates)
        }
        IniExpr::KeyValue(entry) => section.add_property(entry, duplicates),
        IniExpr::Section { path, .. } => {
            let token = parser.peek(0, lexer);
            Err(Error::parse(
                token.line_start(),
                token.start_pos(),
                &format!("section [{}] cannot open inside another section body", path.join(".")),
            ))
        }
    }
}

/// Accumulates a field value until a token that ends it.
///
/// Quoted runs and escape sequences are kept verbatim; whitespace is trimmed
/// from both ends of everything else.
fn read_text(
    parser: &mut Parser,
    lexer: &mut dyn Lexer<IniSyntax>,
    syntax: &IniSyntax,
    params: &IniParams,
    first: Option<Token>,
) -> Result<String> {
    let mut raw = String::new();
    let mut protected: Option<(usize, usize)> = None;
    let mut continued = false;
    let mut next = first;

    loop {
        let token = match next.take() {
            Some(token) => token,
            None => {
                let ty = parser.peek(0, lexer).ty();
                if ends_text(ty, params) {
                    break;
                }
                parser.pop(lexer)
            }
        };
        if continued && token.is(WHITESPACE) {
            continue;
        }
        continued = false;

        let start = raw.len();
        match token.ty() {
            QUOTE | DOUBLE_QUOTE => {
                read_quoted(parser, lexer, syntax, &token, &mut raw)?;
                protect(&mut protected, start, raw.len());
            }
            ESCAPE => {
                let escaped = parser.consume(ESCAPED, lexer)?;
                let resolved =
                    syntax
                        .escape()
                        .parse(escaped.value(), escaped.line_start(), escaped.start_pos())?;
                if resolved.is_empty() {
                    continued = true;
                } else {
                    raw.push_str(&resolved);
                    protect(&mut protected, start, raw.len());
                }
            }
            _ => raw.push_str(token.value()),
        }
    }

    let is_blank = |ch: char| syntax.is_whitespace(ch);
    Ok(match protected {
        None => raw.trim_matches(is_blank).to_string(),
        Some((start, end)) => format!(
            "{}{}{}",
            raw[..start].trim_start_matches(is_blank),
            &raw[start..end],
            raw[end..].trim_end_matches(is_blank)
        ),
    })
}

fn read_quoted(
    parser: &mut Parser,
    lexer: &mut dyn Lexer<IniSyntax>,
    syntax: &IniSyntax,
    open: &Token,
    raw: &mut String,
) -> Result<()> {
    let close = if open.is(QUOTE) { QUOTE_END } else { DOUBLE_QUOTE_END };
    loop {
        let token = parser.pop(lexer);
        match token.ty() {
            ty if ty == close => return Ok(()),
            EOL | EOF => {
                return Err(Error::parse(
                    open.line_start(),
                    open.start_pos(),
                    "unterminated quoted string",
                ))
            }
            ESCAPE => {
                let escaped = parser.consume(ESCAPED, lexer)?;
                raw.push_str(&syntax.escape().parse(
                    escaped.value(),
                    escaped.line_start(),
                    escaped.start_pos(),
                )?);
            }
            _ => raw.push_str(token.value()),
        }
    }
}

fn ends_text(ty: Type, params: &IniParams) -> bool {
    match ty {
        EOL | EOF | COMMENT => true,
        ASSIGNMENT => !(params.assigned || params.in_section_name),
        SUB_SECTION | SECTION_END => params.in_section_name,
        _ => false,
    }
}

fn protect(protected: &mut Option<(usize, usize)>, start: usize, end: usize) {
    *protected = Some(match *protected {
        Some((s, e)) => (s.min(start), e.max(end)),
        None => (start, end),
    });
}

fn skip_blanks(parser: &mut Parser, lexer: &mut dyn Lexer<IniSyntax>) {
    while parser.matches(WHITESPACE, lexer) {
        parser.pop(lexer);
    }
}

/// Takes a comment trailing the current line, if there is one.
fn inline_comment(
    parser: &mut Parser,
    lexer: &mut dyn Lexer<IniSyntax>,
    syntax: &IniSyntax,
    params: &mut IniParams,
) -> Option<String> {
    if parser.matches(COMMENT, lexer) {
        let token = parser.pop(lexer);
        if syntax.retain_comments() {
            params.inline = Some(comment_text(token.value()));
        } else {
            tracing::debug!(line = token.line_start(), "dropping inline comment");
        }
    }
    params.inline.take()
}

/// Comment text without its leading comment char.
fn comment_text(raw: &str) -> String {
    let mut chars = raw.chars();
    chars.next();
    chars.as_str().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ini;

    fn parse(input: &str) -> Result<Section> {
        ini::from_str(input, IniSyntax::unix())
    }

    #[test]
    fn test_comment_text() {
        assert_eq!(comment_text("#  note "), "note");
        assert_eq!(comment_text(";"), "");
    }

    #[test]
    fn test_read_text_keeps_quoted_whitespace() {
        let doc = parse("k = \"  padded  \"\nj = '  a' b \n").unwrap();
        assert_eq!(doc.get_value(&["k"]), Some("  padded  "));
        assert_eq!(doc.get_value(&["j"]), Some("  a b"));
    }

    #[test]
    fn test_key_without_value() {
        let doc = parse("flag\nother = 1\n").unwrap();
        assert_eq!(doc.get_value(&["flag"]), Some(""));
        assert_eq!(doc.get_value(&["other"]), Some("1"));
    }

    #[test]
    fn test_empty_key() {
        let doc = parse("= value\n").unwrap();
        assert_eq!(doc.get_value(&[""]), Some("value"));
    }

    #[test]
    fn test_value_absorbs_structural_chars() {
        let doc = parse("url = http://host/a.b?x=1 [y]\n").unwrap();
        assert_eq!(doc.get_value(&["url"]), Some("http://host/a.b?x=1 [y]"));
    }

    #[test]
    fn test_empty_segment_reports_cause() {
        let err = parse("[a..b]\n").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
        assert_eq!(err.position(), Some((1, 1)));
    }

    #[test]
    fn test_unterminated_quote() {
        let err = parse("k = \"open\nnext = 1\n").unwrap_err();
        assert!(matches!(err, Error::Parse { ref msg, .. } if msg.contains("unterminated")));
    }

    #[test]
    fn test_header_needs_line_end() {
        let err = parse("[a] b\n").unwrap_err();
        assert!(matches!(err, Error::Syntax { .. }));
    }
}
