//! # textgram
//!
//! A format-agnostic text serialization toolkit: an incremental lexer and
//! operator-precedence (Pratt) parser driven entirely by grammar objects, plus
//! a full INI grammar built on top of it.
//!
//! ## How It Fits Together
//!
//! - A **grammar** ([`Grammar`]) maps `(Direction, Type)` pairs to
//!   [`Command`]s and carries whatever configuration its lexer needs.
//! - A **lexer** ([`Lexer`]) is fed chunks of text and queues [`Token`]s. It
//!   keeps partial tokens across chunks, so input can arrive in any split.
//! - The **parser** ([`Parser`]) pulls tokens and dispatches them to the
//!   grammar's commands, which build the expression tree.
//! - A **formatter** ([`Formatter`]) turns expression trees back into text or
//!   into the interchange [`Value`].
//!
//! [`Converter`] wires the first three together for the common case.
//!
//! ## Quick Start
//!
//! ```rust
//! use textgram::ini::{self, IniSyntax};
//!
//! let input = "\
//! [Global]
//! key = value
//! [.Nested]
//! port = 8080
//! ";
//! let doc = ini::from_str(input, IniSyntax::unix()).unwrap();
//! assert_eq!(doc.get_value(&["Global", "key"]), Some("value"));
//! assert_eq!(doc.get_value(&["Global", "Nested", "port"]), Some("8080"));
//!
//! let value = ini::to_value(&doc, IniSyntax::unix());
//! assert_eq!(value.pointer(&["Global", "Nested", "port"]).and_then(|v| v.as_i64()), Some(8080));
//! ```
//!
//! ## Streaming Input
//!
//! ```rust
//! use textgram::ini::{IniExpr, IniLexer, IniSyntax};
//! use textgram::Converter;
//!
//! let mut converter = Converter::new(IniSyntax::unix(), IniLexer::new());
//! for chunk in ["[a]\nk", "ey = v", "alue\r", "\n"] {
//!     converter.feed(chunk).unwrap();
//! }
//! let Some(IniExpr::Section { section, .. }) = converter.finish().unwrap() else {
//!     panic!("expected a document");
//! };
//! assert_eq!(section.get_value(&["a", "key"]), Some("value"));
//! ```
//!
//! ## Dialects
//!
//! ```rust
//! use textgram::ini::{self, IniSyntax};
//!
//! // Java properties: ':' assigns, later keys win, no inline comments
//! let doc = ini::from_str("name: a\nname = b ! kept\n", IniSyntax::properties()).unwrap();
//! assert_eq!(doc.get_value(&["name"]), Some("b ! kept"));
//!
//! // Windows profiles: the first definition wins
//! let doc = ini::from_str("[s]\nk=1\nk=2\n", IniSyntax::winapi()).unwrap();
//! assert_eq!(doc.get_value(&["s", "k"]), Some("1"));
//! ```

pub mod convert;
pub mod error;
pub mod formatter;
pub mod ini;
pub mod lexer;
pub mod macros;
pub mod map;
pub mod parser;
pub mod syntax;
pub mod token;
pub mod value;

pub use convert::Converter;
pub use error::{Error, Result};
pub use formatter::{Expression, Formatter};
pub use ini::IniSyntax;
pub use lexer::Lexer;
pub use map::ValueMap;
pub use parser::Parser;
pub use syntax::{Command, CommandTable, FileInfo, Grammar, RoleChars};
pub use token::{Direction, Token, TokenQueue, Type};
pub use value::{Atom, Number, Value};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ini::{IniExpr, IniFormatter, IniLexer, IniParams, ValueFormatter};

    const SAMPLE: &str = "\
# global settings
name = demo

[server]
host = localhost ; primary
port = 8080

[server.tls]
enabled = true
";

    #[test]
    fn test_parse_format_parse() {
        let syntax = IniSyntax::unix();
        let doc = ini::from_str(SAMPLE, syntax).unwrap();
        let text = ini::to_string(&doc, syntax).unwrap();
        assert_eq!(ini::from_str(&text, syntax).unwrap(), doc);
    }

    #[test]
    fn test_formatters_share_one_tree() {
        let syntax = IniSyntax::unix();
        let mut converter = Converter::new(syntax, IniLexer::new());
        converter.feed(SAMPLE).unwrap();
        let expr = converter.finish().unwrap().unwrap();

        let mut text = IniFormatter::new();
        expr.format(&mut text, syntax, &mut IniParams::default())
            .unwrap();
        assert!(text.data().contains("[server.tls]"));

        let mut values = ValueFormatter::new();
        expr.format(&mut values, syntax, &mut IniParams::default())
            .unwrap();
        assert_eq!(
            values.data(),
            value!({
                "name": "demo",
                "server": {
                    "host": "localhost",
                    "port": 8080,
                    "tls": { "enabled": true }
                }
            })
        );
    }

    #[test]
    fn test_section_serializes_with_serde() {
        let doc = ini::from_str("[s]\nk = 1\nk = 2\nj = x\n", IniSyntax::unix()).unwrap();
        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(json, r#"{"s":{"k":["1","2"],"j":"x"}}"#);
    }

    #[test]
    fn test_empty_input() {
        let syntax = IniSyntax::unix();
        let doc = ini::from_str("", syntax).unwrap();
        assert!(doc.is_empty());
        assert!(matches!(
            Converter::new(syntax, IniLexer::new()).finish().unwrap(),
            Some(IniExpr::Section { .. })
        ));
    }
}
