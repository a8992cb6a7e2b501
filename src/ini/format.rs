//! Formatters for INI trees.
//!
//! [`IniFormatter`] writes INI text in a syntax's dialect: properties before
//! subsections, absolute `[a.b]` headers, the first delimiter and the first
//! comment char. Fields that would not lex back to the same text are quoted
//! when the dialect allows it and escaped otherwise.
//!
//! [`ValueFormatter`] projects the same trees into interchange [`Value`]s.

use super::tree::{IniExpr, KeyValue, Node, Section};
use super::{IniParams, IniSyntax};
use crate::{Error, Formatter, Grammar, Result, Value, ValueMap};
use std::fmt::Write as _;
use std::hash::{Hash, Hasher};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Field {
    Key,
    Value,
    SectionName,
}

/// Renders expressions as INI text.
///
/// ```rust
/// use textgram::ini::{self, IniExpr, IniFormatter, IniParams, IniSyntax};
/// use textgram::{Expression, Formatter};
///
/// let syntax = IniSyntax::unix();
/// let doc = ini::from_str("[server]\nport=8080\n", syntax).unwrap();
///
/// let mut formatter = IniFormatter::new();
/// IniExpr::document(doc)
///     .format(&mut formatter, syntax, &mut IniParams::default())
///     .unwrap();
/// assert_eq!(formatter.data(), "[server]\nport = 8080\n");
/// ```
#[derive(Clone, Debug)]
pub struct IniFormatter {
    output: String,
    spaced: bool,
    dialect: Option<&'static IniSyntax>,
}

// Dialects compare by identity.
impl PartialEq for IniFormatter {
    fn eq(&self, other: &Self) -> bool {
        self.output == other.output
            && self.spaced == other.spaced
            && match (self.dialect, other.dialect) {
                (Some(a), Some(b)) => std::ptr::eq(a, b),
                (None, None) => true,
                _ => false,
            }
    }
}

impl Eq for IniFormatter {}

impl Hash for IniFormatter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.output.hash(state);
        self.spaced.hash(state);
        self.dialect
            .map(|syntax| syntax as *const IniSyntax as usize)
            .hash(state);
    }
}

impl Default for IniFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl IniFormatter {
    #[must_use]
    pub fn new() -> Self {
        IniFormatter {
            output: String::new(),
            spaced: true,
            dialect: None,
        }
    }

    /// Dialect used by [`Formatter::append_values`], which receives no
    /// syntax of its own. Defaults to [`IniSyntax::unix`].
    #[must_use]
    pub fn with_dialect(mut self, syntax: &'static IniSyntax) -> Self {
        self.dialect = Some(syntax);
        self
    }

    /// Whether delimiters are surrounded by single spaces (`key = value`).
    #[must_use]
    pub fn with_spaced_delimiters(mut self, spaced: bool) -> Self {
        self.spaced = spaced;
        self
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.output
    }

    /// Writes a whole document: root properties, then every section in
    /// document order, then trailing comments.
    pub fn append_document(&mut self, root: &Section, syntax: &IniSyntax) -> Result<()> {
        self.write_comments(&root.comments.preceding, syntax);
        self.write_properties(root, syntax)?;
        let mut path = Vec::new();
        self.write_sections(root, &mut path, syntax)?;
        self.write_comments(&root.trailing, syntax);
        Ok(())
    }

    fn write_sections(
        &mut self,
        section: &Section,
        path: &mut Vec<String>,
        syntax: &IniSyntax,
    ) -> Result<()> {
        for (name, child) in section.sections() {
            path.push(name.clone());
            self.write_header(child, path, syntax)?;
            self.write_properties(child, syntax)?;
            self.write_sections(child, path, syntax)?;
            path.pop();
        }
        Ok(())
    }

    fn write_header(&mut self, section: &Section, path: &[String], syntax: &IniSyntax) -> Result<()> {
        let separator = match syntax.nesting().first() {
            Some(ch) => ch.to_string(),
            None if path.len() > 1 => {
                return Err(Error::custom(format!(
                    "section '{}' is nested but the syntax has no nesting character",
                    path.join("/")
                )))
            }
            None => String::new(),
        };
        if !self.output.is_empty() {
            self.output.push('\n');
        }
        self.write_comments(&section.comments.preceding, syntax);

        let mut names = Vec::with_capacity(path.len());
        for name in path {
            names.push(field(name, Field::SectionName, syntax)?);
        }
        let _ = write!(self.output, "[{}]", names.join(&separator));
        self.write_inline(section.comments.inline.as_deref(), syntax);
        self.output.push('\n');
        Ok(())
    }

    fn write_properties(&mut self, section: &Section, syntax: &IniSyntax) -> Result<()> {
        for (_, property) in section.properties() {
            for entry in property.entries() {
                self.write_entry(entry, syntax)?;
            }
        }
        Ok(())
    }

    fn write_entry(&mut self, entry: &KeyValue, syntax: &IniSyntax) -> Result<()> {
        let delimiter = syntax
            .delimiters()
            .first()
            .copied()
            .ok_or_else(|| Error::custom("the syntax has no delimiter"))?;
        self.write_comments(&entry.comments.preceding, syntax);
        if let (Some(inline), false) = (&entry.comments.inline, syntax.inline_comments()) {
            self.write_comments(std::slice::from_ref(inline), syntax);
        }

        let key = field(&entry.key, Field::Key, syntax)?;
        let value = field(&entry.value, Field::Value, syntax)?;
        self.output.push_str(&key);
        match (self.spaced, key.is_empty(), value.is_empty()) {
            (false, _, _) => self.output.push(delimiter),
            (true, true, _) => {
                let _ = write!(self.output, "{} ", delimiter);
            }
            (true, false, true) => {
                let _ = write!(self.output, " {}", delimiter);
            }
            (true, false, false) => {
                let _ = write!(self.output, " {} ", delimiter);
            }
        }
        self.output.push_str(&value);
        if syntax.inline_comments() {
            self.write_inline(entry.comments.inline.as_deref(), syntax);
        }
        self.output.push('\n');
        Ok(())
    }

    fn write_comments(&mut self, comments: &[String], syntax: &IniSyntax) {
        let Some(marker) = syntax.comments().first() else {
            if !comments.is_empty() {
                tracing::debug!(count = comments.len(), "syntax has no comment char, dropping comments");
            }
            return;
        };
        for comment in comments {
            if comment.is_empty() {
                let _ = writeln!(self.output, "{}", marker);
            } else {
                let _ = writeln!(self.output, "{} {}", marker, comment);
            }
        }
    }

    fn write_inline(&mut self, comment: Option<&str>, syntax: &IniSyntax) {
        let (Some(comment), Some(marker)) = (comment, syntax.comments().first()) else {
            return;
        };
        if comment.is_empty() {
            let _ = write!(self.output, " {}", marker);
        } else {
            let _ = write!(self.output, " {} {}", marker, comment);
        }
    }
}

/// Renders `text` so that the syntax's lexer reads it back unchanged.
fn field(text: &str, kind: Field, syntax: &IniSyntax) -> Result<String> {
    let count = text.chars().count();
    let needs_care = text
        .chars()
        .enumerate()
        .any(|(i, ch)| is_special(ch, i == 0, i + 1 == count, kind, syntax));
    if !needs_care {
        return Ok(text.to_string());
    }
    if let Some(quoted) = quoted(text, syntax) {
        return Ok(quoted);
    }
    if syntax.escape().enabled(false) {
        return escaped(text, kind, syntax);
    }
    Err(Error::custom(format!(
        "{:?} cannot be written in the {} dialect",
        text,
        syntax.file_info().name
    )))
}

fn is_special(ch: char, first: bool, last: bool, kind: Field, syntax: &IniSyntax) -> bool {
    if ch == '\n' || ch == '\r' {
        return true;
    }
    if syntax.escape().char() == Some(ch) && syntax.escape().enabled(false) {
        return true;
    }
    if syntax.is_comment(ch) && (syntax.inline_comments() || (first && kind == Field::Key)) {
        return true;
    }
    if (first || last) && syntax.is_whitespace(ch) {
        return true;
    }
    // a quote opens wherever the lexer's text buffer is empty, which is
    // also the case right after a delimiter, nesting char or escape
    if syntax.quoting() && (ch == '"' || ch == '\'') {
        return true;
    }
    match kind {
        Field::Key => syntax.is_delimiter(ch) || (first && ch == '['),
        Field::SectionName => syntax.is_nesting(ch) || ch == ']',
        Field::Value => false,
    }
}

fn quoted(text: &str, syntax: &IniSyntax) -> Option<String> {
    if !syntax.quoting() || text.contains(['\n', '\r']) {
        return None;
    }
    let quote = if !text.contains('"') {
        '"'
    } else if !text.contains('\'') {
        '\''
    } else {
        return None;
    };
    let escape = syntax.escape();
    let mut out = String::with_capacity(text.len() + 2);
    out.push(quote);
    for ch in text.chars() {
        if escape.char() == Some(ch) && escape.enabled(true) {
            out.push(ch);
        }
        out.push(ch);
    }
    out.push(quote);
    Some(out)
}

fn escaped(text: &str, kind: Field, syntax: &IniSyntax) -> Result<String> {
    let escape = syntax.escape();
    let Some(marker) = escape.char() else {
        return Err(Error::custom("the syntax has no escape character"));
    };
    let count = text.chars().count();
    let mut out = String::with_capacity(text.len() + 8);
    for (i, ch) in text.chars().enumerate() {
        if !is_special(ch, i == 0, i + 1 == count, kind, syntax) {
            out.push(ch);
            continue;
        }
        out.push(marker);
        if let Some(body) = escape.reverse(ch) {
            out.push(body);
        } else if ch == '\n' || ch == '\r' {
            let (prefix, width) = unicode_prefix(syntax).ok_or_else(|| {
                Error::custom("line breaks need an escape mapping or a unicode escape")
            })?;
            let _ = write!(out, "{}{:0width$x}", prefix, ch as u32, width = width);
        } else {
            out.push(ch);
        }
    }
    Ok(out)
}

fn unicode_prefix(syntax: &IniSyntax) -> Option<(char, usize)> {
    syntax.escape().unicode_prefixes().next()
}

impl Formatter<IniSyntax> for IniFormatter {
    type Output = String;

    fn append(&mut self, expr: &IniExpr, syntax: &IniSyntax, _params: &mut IniParams) -> Result<()> {
        match expr {
            IniExpr::Empty => Ok(()),
            IniExpr::Text(key) => self.write_entry(&KeyValue::new(key.clone(), ""), syntax),
            IniExpr::KeyValue(entry) => self.write_entry(entry, syntax),
            IniExpr::Section { path, section } if path.is_empty() => {
                self.append_document(section, syntax)
            }
            IniExpr::Section { path, section } => {
                self.write_header(section, path, syntax)?;
                self.write_properties(section, syntax)?;
                let mut path = path.clone();
                self.write_sections(section, &mut path, syntax)
            }
        }
    }

    fn append_str(&mut self, text: &str) -> Result<()> {
        self.output.push_str(text);
        Ok(())
    }

    /// Each value must be a map; it is written as a document in the
    /// formatter's dialect.
    fn append_values(&mut self, values: &[Value]) -> Result<()> {
        let syntax = self.dialect.unwrap_or_else(IniSyntax::unix);
        for value in values {
            let section = Section::try_from(value)?;
            self.append_document(&section, syntax)?;
        }
        Ok(())
    }

    fn data(&self) -> String {
        self.output.clone()
    }

    fn reverse(&self) -> Self {
        IniFormatter {
            output: String::new(),
            spaced: self.spaced,
            dialect: self.dialect,
        }
    }
}

/// Collects expressions as interchange [`Value`]s.
///
/// Raw values pass through the syntax's value-parse hook; a property with
/// several values becomes a list.
#[derive(Clone, Debug, Default, PartialEq, Hash)]
pub struct ValueFormatter {
    values: Vec<Value>,
}

impl ValueFormatter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The value of a whole section: a map from child names to values.
    #[must_use]
    pub fn section_value(section: &Section, syntax: &IniSyntax) -> Value {
        let mut map = ValueMap::with_capacity(section.len());
        for (name, node) in section.iter() {
            let value = match node {
                Node::Section(child) => Self::section_value(child, syntax),
                Node::Property(property) => {
                    let mut values: Vec<Value> =
                        property.values().map(|raw| syntax.parse_value(raw)).collect();
                    if values.len() == 1 {
                        values.remove(0)
                    } else {
                        Value::List(values)
                    }
                }
            };
            map.insert(name.clone(), value);
        }
        Value::Map(map)
    }

    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

impl Formatter<IniSyntax> for ValueFormatter {
    type Output = Value;

    fn append(&mut self, expr: &IniExpr, syntax: &IniSyntax, _params: &mut IniParams) -> Result<()> {
        let value = match expr {
            IniExpr::Empty => return Ok(()),
            IniExpr::Text(text) => syntax.parse_value(text),
            IniExpr::KeyValue(entry) => {
                let mut map = ValueMap::new();
                map.insert(entry.key.clone(), syntax.parse_value(&entry.value));
                Value::Map(map)
            }
            IniExpr::Section { path, section } => {
                let mut value = Self::section_value(section, syntax);
                for name in path.iter().rev() {
                    let mut map = ValueMap::new();
                    map.insert(name.clone(), value);
                    value = Value::Map(map);
                }
                value
            }
        };
        self.values.push(value);
        Ok(())
    }

    fn append_str(&mut self, text: &str) -> Result<()> {
        self.values.push(Value::from(text));
        Ok(())
    }

    fn append_values(&mut self, values: &[Value]) -> Result<()> {
        self.values.extend_from_slice(values);
        Ok(())
    }

    fn data(&self) -> Value {
        match self.values.as_slice() {
            [] => Value::default(),
            [single] => single.clone(),
            many => Value::List(many.to_vec()),
        }
    }

    fn reverse(&self) -> Self {
        Self::default()
    }
}
