//! The INI grammar.
//!
//! Parsing produces a [`Section`] tree: nested sections holding properties,
//! each property holding every value recorded for its key. Three dialects are
//! preconfigured ([`IniSyntax::unix`], [`IniSyntax::properties`],
//! [`IniSyntax::winapi`]) and [`IniSyntaxBuilder`] assembles custom ones.
//!
//! ## Examples
//!
//! ```rust
//! use textgram::ini::{self, IniSyntax};
//!
//! let input = "[Parent]\nname = p\n[.Child]\nname = c\n";
//! let doc = ini::from_str(input, IniSyntax::unix()).unwrap();
//!
//! assert_eq!(doc.get_value(&["Parent", "name"]), Some("p"));
//! assert_eq!(doc.get_value(&["Parent", "Child", "name"]), Some("c"));
//!
//! let text = ini::to_string(&doc, IniSyntax::unix()).unwrap();
//! assert_eq!(ini::from_str(&text, IniSyntax::unix()).unwrap(), doc);
//! ```

mod commands;
mod format;
mod lexer;
mod syntax;
mod tree;
pub mod types;

pub use format::{IniFormatter, ValueFormatter};
pub use lexer::IniLexer;
pub use syntax::{DuplicateDirective, Escape, IniSyntax, IniSyntaxBuilder};
pub use tree::{Comments, Duplicates, IniExpr, KeyValue, Node, Property, Section};

use crate::{Converter, Error, Result, Value};
use std::io;

/// Per-run state shared by the INI commands.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IniParams {
    pub(crate) section_path: Vec<String>,
    pub(crate) preceding: Vec<String>,
    pub(crate) inline: Option<String>,
    pub(crate) in_section_name: bool,
    pub(crate) assigned: bool,
}

impl IniParams {
    /// Absolute path of the most recently opened section.
    #[must_use]
    pub fn section_path(&self) -> &[String] {
        &self.section_path
    }

    /// Comments read but not yet attached to a node.
    #[must_use]
    pub fn pending_comments(&self) -> &[String] {
        &self.preceding
    }
}

/// Parses a complete INI document.
pub fn from_str(input: &str, syntax: &IniSyntax) -> Result<Section> {
    let mut converter = Converter::new(syntax, IniLexer::new());
    converter.feed(input)?;
    into_document(converter.finish()?)
}

/// Parses an INI document from a reader, chunk by chunk.
pub fn from_reader<R: io::Read>(reader: R, syntax: &IniSyntax) -> Result<Section> {
    into_document(Converter::new(syntax, IniLexer::new()).read_from(reader)?)
}

/// Serializes a tree as INI text in `syntax`'s dialect.
pub fn to_string(section: &Section, syntax: &IniSyntax) -> Result<String> {
    let mut formatter = IniFormatter::new();
    formatter.append_document(section, syntax)?;
    Ok(formatter.into_string())
}

/// Converts a tree into an interchange [`Value`], typing every raw value with
/// the syntax's value-parse hook.
#[must_use]
pub fn to_value(section: &Section, syntax: &IniSyntax) -> Value {
    ValueFormatter::section_value(section, syntax)
}

fn into_document(expr: Option<IniExpr>) -> Result<Section> {
    match expr {
        Some(IniExpr::Section { section, .. }) => Ok(section),
        Some(other) => Err(Error::custom(format!(
            "expected a document, found {:?}",
            other
        ))),
        None => Ok(Section::new()),
    }
}
