//! Grammar objects and the command registry.
//!
//! A grammar ("syntax") is an immutable value that maps a `(Direction, Type)`
//! pair to the [`Command`] handling that token, plus whatever configuration
//! the grammar's lexer and commands consult. Grammars are data-driven: adding a
//! token kind means registering one more command, not adding a type.
//!
//! Role characters (separators, quotes, comment starters and so on) are
//! validated with [`RoleChars`] while a syntax is being built, so a syntax that
//! exists is always internally consistent.

use crate::{Direction, Error, Lexer, Parser, Result, Token, Type};
use std::collections::HashMap;
use std::fmt;

/// A unit of parsing logic bound to one `(Direction, Type)` pair.
///
/// Prefix commands receive `None` for the already-parsed expression; infix
/// commands receive the expression built so far. Commands continue parsing
/// through the [`Parser`] they are handed, never by reading the lexer
/// directly.
pub type Command<G> = fn(
    &mut Parser,
    &mut dyn Lexer<G>,
    &G,
    &mut <G as Grammar>::Params,
    Token,
    Option<<G as Grammar>::Expr>,
) -> Result<<G as Grammar>::Expr>;

/// An immutable grammar consumed by [`Parser`] and by its lexer.
pub trait Grammar: Sized {
    /// Mutable side-state shared by every command of one parse run.
    type Params;
    /// The expression tree the commands build.
    type Expr;

    /// Resolves the command for a token kind, if the grammar defines one.
    fn command(&self, direction: Direction, ty: Type) -> Option<Command<Self>>;

    /// Whitespace classification used by the lexer and by role validation.
    fn is_whitespace(&self, ch: char) -> bool {
        ch.is_whitespace()
    }
}

/// Lookup table from `(Direction, Type)` to [`Command`].
pub struct CommandTable<G: Grammar> {
    commands: HashMap<(Direction, Type), Command<G>>,
}

impl<G: Grammar> CommandTable<G> {
    #[must_use]
    pub fn new() -> Self {
        CommandTable {
            commands: HashMap::new(),
        }
    }

    /// Registers `command` for `(direction, ty)`, replacing any earlier one.
    #[must_use]
    pub fn with(mut self, direction: Direction, ty: Type, command: Command<G>) -> Self {
        self.commands.insert((direction, ty), command);
        self
    }

    /// Registers the same command for several token types.
    #[must_use]
    pub fn with_all(mut self, direction: Direction, types: &[Type], command: Command<G>) -> Self {
        for ty in types {
            self.commands.insert((direction, *ty), command);
        }
        self
    }

    #[inline]
    #[must_use]
    pub fn get(&self, direction: Direction, ty: Type) -> Option<Command<G>> {
        self.commands.get(&(direction, ty)).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl<G: Grammar> Default for CommandTable<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Grammar> Clone for CommandTable<G> {
    fn clone(&self) -> Self {
        CommandTable {
            commands: self.commands.clone(),
        }
    }
}

impl<G: Grammar> fmt::Debug for CommandTable<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<String> = self
            .commands
            .keys()
            .map(|(direction, ty)| format!("{:?}:{}", direction, ty))
            .collect();
        keys.sort();
        f.debug_struct("CommandTable").field("commands", &keys).finish()
    }
}

/// Descriptive metadata attached to a syntax.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FileInfo {
    pub name: String,
    pub extensions: Vec<String>,
    pub media_type: String,
}

impl FileInfo {
    #[must_use]
    pub fn new(name: &str, extensions: &[&str], media_type: &str) -> Self {
        FileInfo {
            name: name.to_string(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
            media_type: media_type.to_string(),
        }
    }

    /// Returns `true` if `path` ends with one of the registered extensions.
    #[must_use]
    pub fn matches_path(&self, path: &str) -> bool {
        path.rsplit_once('.').is_some_and(|(_, ext)| {
            self.extensions
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
    }
}

/// The set of characters already claimed by a grammar role.
///
/// Every claim is checked against all earlier claims and against the syntax's
/// whitespace predicate.
///
/// # Examples
///
/// ```rust
/// use textgram::RoleChars;
///
/// let mut roles = RoleChars::new();
/// roles.claim("delimiter", '=', char::is_whitespace).unwrap();
/// assert!(roles.claim("comment", '=', char::is_whitespace).is_err());
/// assert!(roles.claim("comment", ' ', char::is_whitespace).is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoleChars {
    claims: Vec<(&'static str, char)>,
}

impl RoleChars {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks `ch` for `role` without recording it.
    pub fn check(&self, role: &'static str, ch: char, is_whitespace: fn(char) -> bool) -> Result<()> {
        if is_whitespace(ch) {
            return Err(Error::build(
                role,
                &format!("{:?} is classified as whitespace", ch),
            ));
        }
        if let Some((owner, _)) = self.claims.iter().find(|(_, claimed)| *claimed == ch) {
            return Err(Error::build(
                role,
                &format!("{:?} is already used as {}", ch, owner),
            ));
        }
        Ok(())
    }

    /// Checks and records `ch` for `role`.
    pub fn claim(&mut self, role: &'static str, ch: char, is_whitespace: fn(char) -> bool) -> Result<()> {
        self.check(role, ch, is_whitespace)?;
        self.claims.push((role, ch));
        Ok(())
    }

    /// Checks and records every char in `chars`, including against each other.
    pub fn claim_all(
        &mut self,
        role: &'static str,
        chars: impl IntoIterator<Item = char>,
        is_whitespace: fn(char) -> bool,
    ) -> Result<()> {
        for ch in chars {
            self.claim(role, ch, is_whitespace)?;
        }
        Ok(())
    }

    /// Records a claim without checking it.
    pub fn record(&mut self, role: &'static str, ch: char) {
        self.claims.push((role, ch));
    }

    /// Drops every claim recorded for `role`.
    pub fn release(&mut self, role: &'static str) {
        self.claims.retain(|(owner, _)| *owner != role);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, char)> + '_ {
        self.claims.iter().copied()
    }
}
