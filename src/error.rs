//! Error types for SCF lexing, parsing and typed table access.
//!
//! Every fallible operation returns its error as a value. Nothing is stored in
//! shared state, so two parsers running side by side never observe each
//! other's failures.
//!
//! ## Error Categories
//!
//! - [`LexError`]: a character the scanner does not understand, or a string
//!   literal that never closes
//! - [`ParseError`]: a token that does not fit the grammar, a numeric literal
//!   that does not fit its type, or nesting deeper than the configured limit
//! - [`TypeError`]: a typed getter found a value of another kind
//!
//! Lex and parse errors carry a [`Location`] with 1-based line and column.
//!
//! ## Examples
//!
//! ```rust
//! use scf::{parse, ParseError};
//!
//! let err = parse("key 123").unwrap_err();
//! assert!(matches!(err, ParseError::UnexpectedToken { .. }));
//! assert!(err.to_string().contains("was expecting assign '=' or block '{'"));
//! ```

use crate::value::ValueKind;
use std::fmt;
use thiserror::Error;

/// Position of an error inside the source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// Byte offset from the start of the buffer.
    pub offset: usize,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column, counted in code points.
    pub column: usize,
}

impl Location {
    /// Resolves a byte offset in `src` to a line and column.
    ///
    /// Offsets past the end are clamped to the end of the buffer.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scf::Location;
    ///
    /// let loc = Location::locate("a = 1\nb = ?", 10);
    /// assert_eq!((loc.line, loc.column), (2, 5));
    /// ```
    #[must_use]
    pub fn locate(src: &str, offset: usize) -> Self {
        let offset = offset.min(src.len());
        let mut line = 1;
        let mut column = 1;
        for (idx, ch) in src.char_indices() {
            if idx >= offset {
                break;
            }
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Location {
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Errors raised while scanning tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A code point that cannot start any token.
    #[error("unknown character: '{ch}' at {location}")]
    UnknownCharacter { ch: char, location: Location },

    /// A string literal hit a line break or the end of input before its closing quote.
    #[error("unterminated string at {location}")]
    UnterminatedString { location: Location },
}

impl LexError {
    /// Where the offending input starts.
    #[must_use]
    pub fn location(&self) -> Location {
        match self {
            LexError::UnknownCharacter { location, .. }
            | LexError::UnterminatedString { location } => *location,
        }
    }
}

/// The grammatical context the parser was in when it met an unexpected token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    StartOfFile,
    Identifier,
    AssignOrBlock,
    EndOfBlock,
    Value,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Expected::StartOfFile => "start of file",
            Expected::Identifier => "identifier",
            Expected::AssignOrBlock => "assign '=' or block '{'",
            Expected::EndOfBlock => "end of block '}'",
            Expected::Value => "a value",
        })
    }
}

/// Errors raised while parsing a document into a [`Table`](crate::Table).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The lexer failed while the parser was pulling the next token.
    #[error(transparent)]
    Lex(#[from] LexError),

    /// A token did not fit the grammar at this point.
    #[error("was expecting {expected} but found: '{found}' at {location}")]
    UnexpectedToken {
        expected: Expected,
        found: String,
        location: Location,
    },

    /// A numeric literal is malformed or does not fit in 32 bits.
    #[error("invalid number literal '{literal}' at {location}")]
    InvalidNumber { literal: String, location: Location },

    /// Blocks are nested deeper than [`ParseOptions::max_depth`](crate::ParseOptions).
    #[error("blocks nested deeper than {limit} levels at {location}")]
    RecursionLimit { limit: usize, location: Location },

    /// A key appeared twice in one block while duplicates are rejected.
    #[error("duplicate key '{key}' at {location}")]
    DuplicateKey { key: String, location: Location },
}

impl ParseError {
    /// Where the offending input starts.
    #[must_use]
    pub fn location(&self) -> Location {
        match self {
            ParseError::Lex(err) => err.location(),
            ParseError::UnexpectedToken { location, .. }
            | ParseError::InvalidNumber { location, .. }
            | ParseError::RecursionLimit { location, .. }
            | ParseError::DuplicateKey { location, .. } => *location,
        }
    }
}

/// A typed getter found the key, but bound to a value of another kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("incompatible type for key: {key} (expected {expected}, found {found})")]
pub struct TypeError {
    pub key: String,
    pub expected: ValueKind,
    pub found: ValueKind,
}

/// Any error produced by this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Type(#[from] TypeError),

    /// Raised while mapping a table onto a Rust type.
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scf::Error;
    ///
    /// let err = Error::custom("missing field `port`");
    /// assert_eq!(err.to_string(), "missing field `port`");
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl From<LexError> for Error {
    fn from(err: LexError) -> Self {
        Error::Parse(ParseError::Lex(err))
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
