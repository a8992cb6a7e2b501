//! Error types for grammar construction, lexing and parsing.
//!
//! ## Error Categories
//!
//! - **Build Errors**: a grammar was misconfigured (two roles share a character,
//!   a role character is whitespace, a required field is missing). Raised while
//!   the syntax is being built, never while parsing.
//! - **Syntax Errors**: a token has no command for its direction, or an expected
//!   token type did not match. Carries the offending token's value and position.
//! - **Parse Errors**: a structural failure such as an unterminated quote or an
//!   empty section name segment, optionally wrapping the error that caused it.
//! - **Duplicate Errors**: a section or property name collided under the
//!   `Throw` duplicate directive.
//!
//! None of these are recoverable for the current parse run: the engine never
//! retries or skips a token.
//!
//! ## Examples
//!
//! ```rust
//! use textgram::{ini, IniSyntax, Error};
//!
//! let result = ini::from_str("[Global\nkey = value\n", IniSyntax::unix());
//! assert!(matches!(result, Err(Error::Syntax { .. })));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised by the toolkit.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Grammar misconfiguration detected by a syntax builder
    #[error("Invalid syntax configuration ({role}): {msg}")]
    Build { role: String, msg: String },

    /// A token could not be handled where it appeared
    #[error("Syntax error at line {line}, column {col} near {found:?}: {msg}")]
    Syntax {
        line: usize,
        col: usize,
        found: String,
        msg: String,
    },

    /// A structural failure while building the expression tree
    #[error("Parse error at line {line}, column {col}: {msg}{}", cause.as_ref().map(|c| format!("\nCaused by: {}", c)).unwrap_or_default())]
    Parse {
        line: usize,
        col: usize,
        msg: String,
        cause: Option<Box<Error>>,
    },

    /// Name collision under the `Throw` duplicate directive
    #[error("Duplicate {kind} '{name}'")]
    Duplicate { kind: String, name: String },

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a build error for the named grammar role.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use textgram::Error;
    ///
    /// let err = Error::build("comment", "'=' is already used as a delimiter");
    /// assert!(err.to_string().contains("comment"));
    /// ```
    pub fn build(role: &str, msg: &str) -> Self {
        Error::Build {
            role: role.to_string(),
            msg: msg.to_string(),
        }
    }

    /// Creates a syntax error with line, column and the offending text.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use textgram::Error;
    ///
    /// let err = Error::syntax(10, 5, "]", "no prefix command");
    /// assert!(err.to_string().contains("line 10"));
    /// ```
    pub fn syntax(line: usize, col: usize, found: &str, msg: &str) -> Self {
        Error::Syntax {
            line,
            col,
            found: found.to_string(),
            msg: msg.to_string(),
        }
    }

    /// Creates a parse error without an underlying cause.
    pub fn parse(line: usize, col: usize, msg: &str) -> Self {
        Error::Parse {
            line,
            col,
            msg: msg.to_string(),
            cause: None,
        }
    }

    /// Creates a parse error that wraps the error which triggered it.
    pub fn parse_caused_by(line: usize, col: usize, msg: &str, cause: Error) -> Self {
        Error::Parse {
            line,
            col,
            msg: msg.to_string(),
            cause: Some(Box::new(cause)),
        }
    }

    /// Creates a duplicate error for a section or property collision.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use textgram::Error;
    ///
    /// let err = Error::duplicate("property", "key");
    /// assert_eq!(err.to_string(), "Duplicate property 'key'");
    /// ```
    pub fn duplicate(kind: &str, name: &str) -> Self {
        Error::Duplicate {
            kind: kind.to_string(),
            name: name.to_string(),
        }
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns the `(line, column)` this error points at, if it carries one.
    #[must_use]
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            Error::Syntax { line, col, .. } | Error::Parse { line, col, .. } => Some((*line, *col)),
            _ => None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_reports_cause() {
        let cause = Error::syntax(2, 4, "=", "unexpected token");
        let err = Error::parse_caused_by(2, 1, "section name segment did not resolve", cause);
        let message = err.to_string();
        assert!(message.contains("line 2, column 1"));
        assert!(message.contains("Caused by: Syntax error at line 2, column 4"));
    }

    #[test]
    fn test_position() {
        assert_eq!(Error::parse(3, 7, "oops").position(), Some((3, 7)));
        assert_eq!(Error::duplicate("section", "a").position(), None);
    }
}
