//! Token types emitted by [`IniLexer`](super::IniLexer).
//!
//! Only [`ASSIGNMENT`] binds as an infix operator. [`INIT`] is queued once,
//! before any input, so the first prefix command builds the whole document.

use crate::Type;

pub const INIT: Type = Type::new("INIT", u32::MAX);
pub const SECTION_START: Type = Type::new("SECTION_START", 0);
pub const SECTION_END: Type = Type::new("SECTION_END", 0);
pub const SUB_SECTION: Type = Type::new("SUB_SECTION", 0);
pub const ASSIGNMENT: Type = Type::new("ASSIGNMENT", 10);
pub const QUOTE: Type = Type::new("QUOTE", 0);
pub const QUOTE_END: Type = Type::new("QUOTE_END", 0);
pub const DOUBLE_QUOTE: Type = Type::new("DOUBLE_QUOTE", 0);
pub const DOUBLE_QUOTE_END: Type = Type::new("DOUBLE_QUOTE_END", 0);
pub const ESCAPE: Type = Type::new("ESCAPE", 0);
pub const ESCAPED: Type = Type::new("ESCAPED", 0);
pub const TEXT: Type = Type::new("TEXT", 0);
pub const WHITESPACE: Type = Type::new("WHITESPACE", 0);
pub const COMMENT: Type = Type::new("COMMENT", 0);
/// Line terminator; its value is the terminator text (empty when synthesized).
pub const EOL: Type = Type::new("EOL", 0);
pub const EOF: Type = Type::EOF;
