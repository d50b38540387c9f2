//! # scf
//!
//! A reader for SCF, a small configuration format of named values and nested
//! blocks, producing an ordered, duplicate-tolerant [`Table`].
//!
//! ## What is SCF?
//!
//! An SCF document is a sequence of entries. Each entry binds a name either
//! to a scalar with `=` or to a nested block with `{ ... }`:
//!
//! ```text
//! title = "demo"
//! window {
//!     width = 640
//!     height = 480
//!     scale = 1.5
//!     vsync = true
//!     icon = nil
//! }
//! ```
//!
//! Whitespace is insignificant, there are no separators between entries and
//! there are no comments.
//!
//! ## Key Features
//!
//! - **Order Preserving**: Tables keep entries in document order
//! - **Duplicate Tolerant**: Repeated keys are kept; lookups see the first
//! - **Precise Errors**: Every lexer and parser error carries a line and column
//! - **Bounded**: Nesting depth is capped, so hostile input cannot overflow the stack
//! - **Serde Compatible**: Parsed tables fill any `#[derive(Deserialize)]` type
//!
//! ## Quick Start
//!
//! ```rust
//! let table = scf::parse("name = \"scf\" window { width = 640 }").unwrap();
//!
//! assert_eq!(table.get_string("name"), Ok(Some("scf")));
//! let window = table.get_table("window").unwrap().unwrap();
//! assert_eq!(window.get_i32("width"), Ok(Some(640)));
//!
//! // Missing keys are `None`; wrong types are errors
//! assert_eq!(table.get_i32("missing"), Ok(None));
//! assert!(table.get_i32("name").is_err());
//! ```
//!
//! ### Typed Configuration
//!
//! ```rust
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Window {
//!     width: u32,
//!     height: u32,
//!     vsync: bool,
//! }
//!
//! let window: Window = scf::from_str("width = 640 height = 480 vsync = true").unwrap();
//! assert_eq!(window, Window { width: 640, height: 480, vsync: true });
//! ```
//!
//! ### Building Tables with the scf! Macro
//!
//! ```rust
//! use scf::{scf, Value};
//!
//! let table = scf!({
//!     "name": "scf",
//!     "window": { "width": 640 }
//! });
//!
//! assert_eq!(table.get_string("name"), Ok(Some("scf")));
//! assert_eq!(scf!(nil), Value::Nil);
//! ```
//!
//! ## Errors
//!
//! ```rust
//! let err = scf::parse("a = = 1").unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     "was expecting a value but found: '=' at line 1, column 5"
//! );
//! ```
//!
//! ## Logging
//!
//! The lexer and parser emit [`tracing`] events at `debug` and `trace`
//! level. Install any subscriber to see them.

pub mod de;
pub mod error;
pub mod lexer;
pub mod macros;
pub mod options;
pub mod parser;
pub mod table;
pub mod value;

pub use de::{from_table, from_value};
pub use error::{Error, Expected, LexError, Location, ParseError, Result, TypeError};
pub use lexer::{tokenize, Lexer, Token, TokenKind};
pub use options::{DuplicateKeys, ParseOptions};
pub use parser::Parser;
pub use table::{Pair, Table};
pub use value::{Value, ValueKind};

use serde::de::DeserializeOwned;

/// Parse SCF text into a [`Table`].
///
/// # Examples
///
/// ```rust
/// use scf::parse;
///
/// let table = parse("a = 1 b { c = true }").unwrap();
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.keys().collect::<Vec<_>>(), ["a", "b"]);
/// ```
///
/// # Errors
///
/// Returns the first lexical or syntactic error, with its location.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse(src: &str) -> std::result::Result<Table, ParseError> {
    Parser::new(src).parse_table()
}

/// Parse SCF text into a [`Table`] with custom options.
///
/// # Examples
///
/// ```rust
/// use scf::{parse_with_options, ParseOptions};
///
/// let options = ParseOptions::new().with_max_depth(2);
/// assert!(parse_with_options("a { b { c { } } }", options).is_err());
/// ```
///
/// # Errors
///
/// Returns the first error, including limit violations configured in `options`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_with_options(
    src: &str,
    options: ParseOptions,
) -> std::result::Result<Table, ParseError> {
    Parser::with_options(src, options).parse_table()
}

/// Parse SCF bytes into a [`Table`].
///
/// Input is decoded as UTF-8. Scanning stops at the first byte sequence that
/// does not decode, which the parser then sees as the end of input.
///
/// # Examples
///
/// ```rust
/// use scf::parse_slice;
///
/// let table = parse_slice(b"a = 1").unwrap();
/// assert_eq!(table.get_i32("a"), Ok(Some(1)));
///
/// // Everything from the invalid byte on is ignored
/// let table = parse_slice(b"a = 1 \xff b = 2").unwrap();
/// assert_eq!(table.len(), 1);
/// ```
///
/// # Errors
///
/// Returns the first error in the decodable prefix.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_slice(bytes: &[u8]) -> std::result::Result<Table, ParseError> {
    Parser::from_slice(bytes, ParseOptions::default()).parse_table()
}

/// Deserialize an instance of type `T` from a string of SCF text.
///
/// # Examples
///
/// ```rust
/// use scf::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("x = 1 y = 2").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns [`Error::Parse`] if the text is not valid SCF, or a custom error if
/// the parsed table cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(src: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_table(parse(src)?)
}

/// Deserialize an instance of type `T` from bytes of SCF text.
///
/// # Errors
///
/// Same as [`from_str`]; bytes are decoded as in [`parse_slice`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(bytes: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    from_table(parse_slice(bytes)?)
}
