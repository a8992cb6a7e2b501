//! INI grammar configuration.
//!
//! [`IniSyntax`] is immutable. It is produced by [`IniSyntaxBuilder`], whose
//! setters validate every role character as soon as it is configured: no two
//! roles (delimiter, comment starter, nesting char, escape char, unicode
//! escape prefix, quote, section bracket) may share a character, and none may
//! be whitespace under the syntax's own predicate.
//!
//! ```rust
//! use textgram::ini::{DuplicateDirective, IniSyntaxBuilder};
//!
//! let syntax = IniSyntaxBuilder::new()
//!     .with_delimiters(&[':']).unwrap()
//!     .with_comments(&['#']).unwrap()
//!     .with_property_duplicates(DuplicateDirective::Overwrite)
//!     .build()
//!     .unwrap();
//! assert_eq!(syntax.delimiters(), &[':']);
//!
//! // '#' is already a comment starter
//! assert!(IniSyntaxBuilder::new().with_delimiters(&['#']).is_err());
//! ```

use super::commands;
use super::tree::{Duplicates, IniExpr};
use super::IniParams;
use crate::{Command, CommandTable, Direction, Error, FileInfo, Grammar, Result, RoleChars, Type, Value};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::fmt;

const ROLE_SECTION: &str = "section bracket";
const ROLE_COMMENT: &str = "comment";
const ROLE_DELIMITER: &str = "delimiter";
const ROLE_NESTING: &str = "nesting";
const ROLE_ESCAPE: &str = "escape";
const ROLE_UNICODE: &str = "unicode escape prefix";
const ROLE_QUOTE: &str = "quote";

pub(crate) const SECTION_OPEN: char = '[';
pub(crate) const SECTION_CLOSE: char = ']';
pub(crate) const SINGLE_QUOTE: char = '\'';
pub(crate) const DOUBLE_QUOTE: char = '"';

/// Policy applied when a section or property name is added twice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum DuplicateDirective {
    /// Keep everything: properties collect every value, sections merge children.
    #[default]
    Merge,
    /// The later definition replaces the earlier one.
    Overwrite,
    /// The first definition wins; later ones are ignored.
    Discard,
    /// A collision is an error.
    Throw,
}

/// Escape-sequence configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Escape {
    char: Option<char>,
    unicode: IndexMap<char, usize>,
    table: IndexMap<char, char>,
    quoted: bool,
    non_quoted: bool,
}

impl Escape {
    fn standard() -> Self {
        Escape {
            char: Some('\\'),
            unicode: IndexMap::from([('u', 4), ('x', 2)]),
            table: IndexMap::from([
                ('n', '\n'),
                ('t', '\t'),
                ('r', '\r'),
                ('0', '\0'),
                ('a', '\u{7}'),
                ('b', '\u{8}'),
                ('f', '\u{C}'),
            ]),
            quoted: true,
            non_quoted: true,
        }
    }

    fn disabled() -> Self {
        Escape {
            char: None,
            unicode: IndexMap::new(),
            table: IndexMap::new(),
            quoted: false,
            non_quoted: false,
        }
    }

    #[must_use]
    pub fn char(&self) -> Option<char> {
        self.char
    }

    /// Hex width of the unicode escape introduced by `prefix`.
    #[must_use]
    pub fn unicode_width(&self, prefix: char) -> Option<usize> {
        self.unicode.get(&prefix).copied()
    }

    /// Configured unicode prefixes and their hex widths, in registration order.
    pub fn unicode_prefixes(&self) -> impl Iterator<Item = (char, usize)> + '_ {
        self.unicode.iter().map(|(prefix, width)| (*prefix, *width))
    }

    /// Whether the escape char is active inside (`quoted`) or outside quotes.
    #[must_use]
    pub fn enabled(&self, quoted: bool) -> bool {
        self.char.is_some() && if quoted { self.quoted } else { self.non_quoted }
    }

    /// Resolves the body of an escape sequence (the text after the escape char).
    ///
    /// A line terminator resolves to nothing (line continuation), a unicode
    /// prefix followed by its hex digits to that code point, a table entry to
    /// its replacement, and anything else to itself.
    pub fn parse(&self, body: &str, line: usize, col: usize) -> Result<String> {
        let mut chars = body.chars();
        let Some(first) = chars.next() else {
            return Err(Error::syntax(line, col, body, "empty escape sequence"));
        };
        if first == '\n' || first == '\r' {
            return Ok(String::new());
        }
        if let Some(width) = self.unicode_width(first) {
            let hex = chars.as_str();
            if hex.chars().count() != width {
                return Err(Error::syntax(line, col, body, "incomplete unicode escape"));
            }
            let code = u32::from_str_radix(hex, 16)
                .map_err(|_| Error::syntax(line, col, body, "invalid hex in unicode escape"))?;
            let ch = char::from_u32(code)
                .ok_or_else(|| Error::syntax(line, col, body, "invalid unicode code point"))?;
            return Ok(ch.to_string());
        }
        Ok(self.table.get(&first).copied().unwrap_or(first).to_string())
    }

    /// The escape body that produces `ch`, if `ch` must be escaped.
    #[must_use]
    pub fn reverse(&self, ch: char) -> Option<char> {
        self.table
            .iter()
            .find(|(_, replacement)| **replacement == ch)
            .map(|(body, _)| *body)
    }
}

/// The INI grammar: command table plus dialect configuration.
#[derive(Clone)]
pub struct IniSyntax {
    commands: CommandTable<IniSyntax>,
    comments: Vec<char>,
    retain_comments: bool,
    inline_comments: bool,
    delimiters: Vec<char>,
    nesting: Vec<char>,
    relative_nesting: bool,
    escape: Escape,
    quoting: bool,
    section_duplicates: DuplicateDirective,
    property_duplicates: DuplicateDirective,
    value_parser: fn(&str) -> Value,
    whitespace: fn(char) -> bool,
    file: FileInfo,
}

static UNIX: Lazy<IniSyntax> = Lazy::new(|| {
    IniSyntaxBuilder::new()
        .with_file_info(FileInfo::new("UNIX INI", &["ini", "conf", "cfg"], "text/plain"))
        .build()
        .expect("UNIX preset is a valid syntax")
});

static PROPERTIES: Lazy<IniSyntax> = Lazy::new(|| {
    IniSyntaxBuilder::properties_defaults()
        .build()
        .expect("PROPERTIES preset is a valid syntax")
});

static WINAPI: Lazy<IniSyntax> = Lazy::new(|| {
    IniSyntaxBuilder::winapi_defaults()
        .build()
        .expect("WINAPI preset is a valid syntax")
});

impl IniSyntax {
    /// Unix-style INI: `#`/`;` comments (inline allowed), `=` assignment,
    /// `.` nesting with relative `[.child]` headers, backslash escapes,
    /// quoting, merged duplicates, typed values.
    #[must_use]
    pub fn unix() -> &'static IniSyntax {
        &UNIX
    }

    /// Java-style properties: `#`/`!` full-line comments, `=` or `:`
    /// assignment, backslash escapes with `\uXXXX`, no quoting, no nesting,
    /// later keys overwrite earlier ones, values kept as strings.
    #[must_use]
    pub fn properties() -> &'static IniSyntax {
        &PROPERTIES
    }

    /// Windows profile files: `;` full-line comments, `=` assignment, no
    /// escapes, no nesting, the first definition of a key wins.
    #[must_use]
    pub fn winapi() -> &'static IniSyntax {
        &WINAPI
    }

    #[must_use]
    pub fn builder() -> IniSyntaxBuilder {
        IniSyntaxBuilder::new()
    }

    /// A builder pre-loaded with this syntax's settings.
    #[must_use]
    pub fn to_builder(&self) -> IniSyntaxBuilder {
        IniSyntaxBuilder::rebuild(self)
    }

    #[must_use]
    pub fn comments(&self) -> &[char] {
        &self.comments
    }

    #[must_use]
    pub fn is_comment(&self, ch: char) -> bool {
        self.comments.contains(&ch)
    }

    #[must_use]
    pub fn retain_comments(&self) -> bool {
        self.retain_comments
    }

    #[must_use]
    pub fn inline_comments(&self) -> bool {
        self.inline_comments
    }

    #[must_use]
    pub fn delimiters(&self) -> &[char] {
        &self.delimiters
    }

    #[must_use]
    pub fn is_delimiter(&self, ch: char) -> bool {
        self.delimiters.contains(&ch)
    }

    #[must_use]
    pub fn nesting(&self) -> &[char] {
        &self.nesting
    }

    #[must_use]
    pub fn is_nesting(&self, ch: char) -> bool {
        self.nesting.contains(&ch)
    }

    #[must_use]
    pub fn relative_nesting(&self) -> bool {
        self.relative_nesting
    }

    #[must_use]
    pub fn escape(&self) -> &Escape {
        &self.escape
    }

    #[must_use]
    pub fn quoting(&self) -> bool {
        self.quoting
    }

    #[must_use]
    pub fn section_duplicates(&self) -> DuplicateDirective {
        self.section_duplicates
    }

    #[must_use]
    pub fn property_duplicates(&self) -> DuplicateDirective {
        self.property_duplicates
    }

    /// Both duplicate directives, as consumed by [`Section::add`](super::Section::add).
    #[must_use]
    pub fn duplicates(&self) -> Duplicates {
        Duplicates {
            sections: self.section_duplicates,
            properties: self.property_duplicates,
        }
    }

    /// Applies the value-parse hook to a raw property value.
    #[must_use]
    pub fn parse_value(&self, raw: &str) -> Value {
        (self.value_parser)(raw)
    }

    #[must_use]
    pub fn file_info(&self) -> &FileInfo {
        &self.file
    }
}

impl fmt::Debug for IniSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IniSyntax")
            .field("file", &self.file.name)
            .field("comments", &self.comments)
            .field("delimiters", &self.delimiters)
            .field("nesting", &self.nesting)
            .field("escape", &self.escape)
            .field("quoting", &self.quoting)
            .field("section_duplicates", &self.section_duplicates)
            .field("property_duplicates", &self.property_duplicates)
            .field("commands", &self.commands)
            .finish_non_exhaustive()
    }
}

impl Grammar for IniSyntax {
    type Params = IniParams;
    type Expr = IniExpr;

    fn command(&self, direction: Direction, ty: Type) -> Option<Command<Self>> {
        self.commands.get(direction, ty)
    }

    fn is_whitespace(&self, ch: char) -> bool {
        (self.whitespace)(ch)
    }
}

/// Mutable builder for [`IniSyntax`].
///
/// Setters that introduce role characters return `Result<Self>` and fail on
/// the first collision. [`IniSyntaxBuilder::build`] copies everything into a
/// new syntax, so later edits to the builder never reach built syntaxes.
#[derive(Clone)]
pub struct IniSyntaxBuilder {
    roles: RoleChars,
    comments: Vec<char>,
    retain_comments: bool,
    inline_comments: bool,
    delimiters: Vec<char>,
    nesting: Vec<char>,
    relative_nesting: bool,
    escape: Escape,
    quoting: bool,
    section_duplicates: DuplicateDirective,
    property_duplicates: DuplicateDirective,
    value_parser: fn(&str) -> Value,
    whitespace: fn(char) -> bool,
    file: FileInfo,
}

impl fmt::Debug for IniSyntaxBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IniSyntaxBuilder")
            .field("roles", &self.roles)
            .field("retain_comments", &self.retain_comments)
            .field("inline_comments", &self.inline_comments)
            .field("relative_nesting", &self.relative_nesting)
            .field("section_duplicates", &self.section_duplicates)
            .field("property_duplicates", &self.property_duplicates)
            .finish_non_exhaustive()
    }
}

impl Default for IniSyntaxBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IniSyntaxBuilder {
    /// A builder holding the documented defaults (the UNIX dialect).
    #[must_use]
    pub fn new() -> Self {
        let mut roles = RoleChars::new();
        roles.record(ROLE_SECTION, SECTION_OPEN);
        roles.record(ROLE_SECTION, SECTION_CLOSE);
        roles.record(ROLE_COMMENT, '#');
        roles.record(ROLE_COMMENT, ';');
        roles.record(ROLE_DELIMITER, '=');
        roles.record(ROLE_NESTING, '.');
        roles.record(ROLE_ESCAPE, '\\');
        roles.record(ROLE_UNICODE, 'u');
        roles.record(ROLE_UNICODE, 'x');
        roles.record(ROLE_QUOTE, SINGLE_QUOTE);
        roles.record(ROLE_QUOTE, DOUBLE_QUOTE);
        IniSyntaxBuilder {
            roles,
            comments: vec!['#', ';'],
            retain_comments: true,
            inline_comments: true,
            delimiters: vec!['='],
            nesting: vec!['.'],
            relative_nesting: true,
            escape: Escape::standard(),
            quoting: true,
            section_duplicates: DuplicateDirective::Merge,
            property_duplicates: DuplicateDirective::Merge,
            value_parser: Value::infer,
            whitespace: char::is_whitespace,
            file: FileInfo::new("INI", &["ini"], "text/plain"),
        }
    }

    /// A builder with nothing configured; `build` fails until at least one
    /// delimiter is set.
    #[must_use]
    pub fn blank() -> Self {
        let mut roles = RoleChars::new();
        roles.record(ROLE_SECTION, SECTION_OPEN);
        roles.record(ROLE_SECTION, SECTION_CLOSE);
        IniSyntaxBuilder {
            roles,
            comments: Vec::new(),
            retain_comments: false,
            inline_comments: false,
            delimiters: Vec::new(),
            nesting: Vec::new(),
            relative_nesting: false,
            escape: Escape::disabled(),
            quoting: false,
            section_duplicates: DuplicateDirective::Merge,
            property_duplicates: DuplicateDirective::Merge,
            value_parser: Value::literal,
            whitespace: char::is_whitespace,
            file: FileInfo::default(),
        }
    }

    fn properties_defaults() -> Self {
        let mut builder = Self::blank();
        builder.roles.record(ROLE_COMMENT, '#');
        builder.roles.record(ROLE_COMMENT, '!');
        builder.roles.record(ROLE_DELIMITER, '=');
        builder.roles.record(ROLE_DELIMITER, ':');
        builder.roles.record(ROLE_ESCAPE, '\\');
        builder.roles.record(ROLE_UNICODE, 'u');
        builder.comments = vec!['#', '!'];
        builder.retain_comments = true;
        builder.delimiters = vec!['=', ':'];
        builder.escape = Escape {
            unicode: IndexMap::from([('u', 4)]),
            quoted: false,
            ..Escape::standard()
        };
        builder.property_duplicates = DuplicateDirective::Overwrite;
        builder.file = FileInfo::new("Java Properties", &["properties"], "text/x-java-properties");
        builder
    }

    fn winapi_defaults() -> Self {
        let mut builder = Self::blank();
        builder.roles.record(ROLE_COMMENT, ';');
        builder.roles.record(ROLE_DELIMITER, '=');
        builder.roles.record(ROLE_QUOTE, SINGLE_QUOTE);
        builder.roles.record(ROLE_QUOTE, DOUBLE_QUOTE);
        builder.comments = vec![';'];
        builder.retain_comments = true;
        builder.delimiters = vec!['='];
        builder.quoting = true;
        builder.property_duplicates = DuplicateDirective::Discard;
        builder.file = FileInfo::new("Windows INI", &["ini", "inf"], "text/plain");
        builder
    }

    /// Copies an existing syntax back into a builder. Role characters are
    /// taken as they are, without validation.
    #[must_use]
    pub fn rebuild(syntax: &IniSyntax) -> Self {
        let mut roles = RoleChars::new();
        roles.record(ROLE_SECTION, SECTION_OPEN);
        roles.record(ROLE_SECTION, SECTION_CLOSE);
        for ch in &syntax.comments {
            roles.record(ROLE_COMMENT, *ch);
        }
        for ch in &syntax.delimiters {
            roles.record(ROLE_DELIMITER, *ch);
        }
        for ch in &syntax.nesting {
            roles.record(ROLE_NESTING, *ch);
        }
        if let Some(ch) = syntax.escape.char {
            roles.record(ROLE_ESCAPE, ch);
        }
        for ch in syntax.escape.unicode.keys() {
            roles.record(ROLE_UNICODE, *ch);
        }
        if syntax.quoting {
            roles.record(ROLE_QUOTE, SINGLE_QUOTE);
            roles.record(ROLE_QUOTE, DOUBLE_QUOTE);
        }
        IniSyntaxBuilder {
            roles,
            comments: syntax.comments.clone(),
            retain_comments: syntax.retain_comments,
            inline_comments: syntax.inline_comments,
            delimiters: syntax.delimiters.clone(),
            nesting: syntax.nesting.clone(),
            relative_nesting: syntax.relative_nesting,
            escape: syntax.escape.clone(),
            quoting: syntax.quoting,
            section_duplicates: syntax.section_duplicates,
            property_duplicates: syntax.property_duplicates,
            value_parser: syntax.value_parser,
            whitespace: syntax.whitespace,
            file: syntax.file.clone(),
        }
    }

    /// Resets to the defaults, or to the blank state when `to_defaults` is
    /// `false`.
    #[must_use]
    pub fn clear(self, to_defaults: bool) -> Self {
        if to_defaults {
            Self::new()
        } else {
            Self::blank()
        }
    }

    /// Replaces the comment starters.
    pub fn with_comments(mut self, chars: &[char]) -> Result<Self> {
        self.roles.release(ROLE_COMMENT);
        self.roles.claim_all(ROLE_COMMENT, chars.iter().copied(), self.whitespace)?;
        self.comments = chars.to_vec();
        Ok(self)
    }

    /// Whether comments are kept in the tree or dropped while parsing.
    #[must_use]
    pub fn with_retain_comments(mut self, retain: bool) -> Self {
        self.retain_comments = retain;
        self
    }

    /// Whether a comment may follow content on the same line.
    #[must_use]
    pub fn with_inline_comments(mut self, inline: bool) -> Self {
        self.inline_comments = inline;
        self
    }

    /// Replaces the assignment delimiters. The first one is used for output.
    pub fn with_delimiters(mut self, chars: &[char]) -> Result<Self> {
        self.roles.release(ROLE_DELIMITER);
        self.roles.claim_all(ROLE_DELIMITER, chars.iter().copied(), self.whitespace)?;
        self.delimiters = chars.to_vec();
        Ok(self)
    }

    /// Replaces the section-nesting characters; an empty slice disables nesting.
    pub fn with_nesting(mut self, chars: &[char]) -> Result<Self> {
        self.roles.release(ROLE_NESTING);
        self.roles.claim_all(ROLE_NESTING, chars.iter().copied(), self.whitespace)?;
        self.nesting = chars.to_vec();
        Ok(self)
    }

    /// Whether a header starting with a nesting char attaches to the most
    /// recently opened section instead of the root.
    #[must_use]
    pub fn with_relative_nesting(mut self, relative: bool) -> Self {
        self.relative_nesting = relative;
        self
    }

    /// Sets or removes the escape character.
    pub fn with_escape(mut self, ch: Option<char>) -> Result<Self> {
        self.roles.release(ROLE_ESCAPE);
        if let Some(ch) = ch {
            self.roles.claim(ROLE_ESCAPE, ch, self.whitespace)?;
        }
        self.escape.char = ch;
        Ok(self)
    }

    /// Registers a unicode escape prefix followed by `width` hex digits.
    pub fn with_unicode_escape(mut self, prefix: char, width: usize) -> Result<Self> {
        if width == 0 || width > 8 {
            return Err(Error::build(ROLE_UNICODE, "hex width must be between 1 and 8"));
        }
        if !self.escape.unicode.contains_key(&prefix) {
            self.roles.claim(ROLE_UNICODE, prefix, self.whitespace)?;
        }
        self.escape.unicode.insert(prefix, width);
        Ok(self)
    }

    /// Removes every unicode escape prefix.
    #[must_use]
    pub fn without_unicode_escapes(mut self) -> Self {
        self.roles.release(ROLE_UNICODE);
        self.escape.unicode.clear();
        self
    }

    /// Maps an escape body char to its replacement (`n` → newline).
    #[must_use]
    pub fn with_escape_mapping(mut self, body: char, replacement: char) -> Self {
        self.escape.table.insert(body, replacement);
        self
    }

    #[must_use]
    pub fn with_quoted_escapes(mut self, enabled: bool) -> Self {
        self.escape.quoted = enabled;
        self
    }

    #[must_use]
    pub fn with_unquoted_escapes(mut self, enabled: bool) -> Self {
        self.escape.non_quoted = enabled;
        self
    }

    /// Enables or disables `'`/`"` quoting.
    pub fn with_quoting(mut self, enabled: bool) -> Result<Self> {
        self.roles.release(ROLE_QUOTE);
        if enabled {
            self.roles
                .claim_all(ROLE_QUOTE, [SINGLE_QUOTE, DOUBLE_QUOTE], self.whitespace)?;
        }
        self.quoting = enabled;
        Ok(self)
    }

    #[must_use]
    pub fn with_section_duplicates(mut self, directive: DuplicateDirective) -> Self {
        self.section_duplicates = directive;
        self
    }

    #[must_use]
    pub fn with_property_duplicates(mut self, directive: DuplicateDirective) -> Self {
        self.property_duplicates = directive;
        self
    }

    /// Sets the hook that types raw values when a tree becomes a [`Value`].
    #[must_use]
    pub fn with_value_parser(mut self, parser: fn(&str) -> Value) -> Self {
        self.value_parser = parser;
        self
    }

    /// Replaces the whitespace predicate, re-checking every claimed role char.
    pub fn with_whitespace(mut self, predicate: fn(char) -> bool) -> Result<Self> {
        if let Some((role, ch)) = self.roles.iter().find(|(_, ch)| predicate(*ch)) {
            return Err(Error::build(
                role,
                &format!("{:?} would be classified as whitespace", ch),
            ));
        }
        self.whitespace = predicate;
        Ok(self)
    }

    #[must_use]
    pub fn with_file_info(mut self, file: FileInfo) -> Self {
        self.file = file;
        self
    }

    /// Freezes the configuration into an [`IniSyntax`].
    pub fn build(&self) -> Result<IniSyntax> {
        if self.delimiters.is_empty() {
            return Err(Error::build(ROLE_DELIMITER, "at least one delimiter is required"));
        }
        tracing::debug!(
            name = %self.file.name,
            delimiters = ?self.delimiters,
            comments = ?self.comments,
            "building INI syntax"
        );
        Ok(IniSyntax {
            commands: commands::table(),
            comments: self.comments.clone(),
            retain_comments: self.retain_comments,
            inline_comments: self.inline_comments,
            delimiters: self.delimiters.clone(),
            nesting: self.nesting.clone(),
            relative_nesting: self.relative_nesting,
            escape: self.escape.clone(),
            quoting: self.quoting,
            section_duplicates: self.section_duplicates,
            property_duplicates: self.property_duplicates,
            value_parser: self.value_parser,
            whitespace: self.whitespace,
            file: self.file.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_rebuild_cleanly() {
        for syntax in [IniSyntax::unix(), IniSyntax::properties(), IniSyntax::winapi()] {
            let rebuilt = syntax.to_builder().build().unwrap();
            assert_eq!(rebuilt.delimiters(), syntax.delimiters());
            assert_eq!(rebuilt.comments(), syntax.comments());
            assert_eq!(rebuilt.quoting(), syntax.quoting());
        }
    }

    #[test]
    fn test_conflicting_roles_fail() {
        let err = IniSyntaxBuilder::new().with_nesting(&['=']).unwrap_err();
        assert!(matches!(err, Error::Build { ref role, .. } if role == "nesting"));

        assert!(IniSyntaxBuilder::new().with_escape(Some('#')).is_err());
        assert!(IniSyntaxBuilder::new().with_comments(&['[']).is_err());
        assert!(IniSyntaxBuilder::new().with_unicode_escape('.', 4).is_err());
    }

    #[test]
    fn test_whitespace_roles_fail() {
        assert!(IniSyntaxBuilder::new().with_delimiters(&[' ']).is_err());
        assert!(IniSyntaxBuilder::new()
            .with_whitespace(|c| c.is_whitespace() || c == '=')
            .is_err());
    }

    #[test]
    fn test_replacing_a_role_releases_old_chars() {
        let builder = IniSyntaxBuilder::new().with_delimiters(&[':']).unwrap();
        assert!(builder.with_comments(&['=']).is_ok());
    }

    #[test]
    fn test_builder_edits_do_not_reach_built_syntax() {
        let builder = IniSyntaxBuilder::new();
        let first = builder.build().unwrap();
        let builder = builder.with_delimiters(&[':']).unwrap();
        let second = builder.build().unwrap();
        assert_eq!(first.delimiters(), &['=']);
        assert_eq!(second.delimiters(), &[':']);
    }

    #[test]
    fn test_blank_builder_requires_delimiters() {
        let err = IniSyntaxBuilder::new().clear(false).build().unwrap_err();
        assert!(matches!(err, Error::Build { .. }));
        assert!(IniSyntaxBuilder::blank()
            .with_delimiters(&['='])
            .unwrap()
            .build()
            .is_ok());
    }

    #[test]
    fn test_escape_parse() {
        let escape = IniSyntax::unix().escape();
        assert_eq!(escape.parse("n", 1, 1).unwrap(), "\n");
        assert_eq!(escape.parse("u0041", 1, 1).unwrap(), "A");
        assert_eq!(escape.parse("x41", 1, 1).unwrap(), "A");
        assert_eq!(escape.parse(";", 1, 1).unwrap(), ";");
        assert_eq!(escape.parse("\n", 1, 1).unwrap(), "");
        assert!(escape.parse("u00", 1, 1).is_err());
        assert!(escape.parse("uD800", 1, 1).is_err());
    }

    #[test]
    fn test_preset_metadata() {
        assert!(IniSyntax::properties().file_info().matches_path("app.properties"));
        assert_eq!(IniSyntax::winapi().escape().char(), None);
        assert_eq!(
            IniSyntax::winapi().property_duplicates(),
            DuplicateDirective::Discard
        );
    }
}
