//! Configuration options for SCF parsing.
//!
//! This module provides types to tune how strictly a document is read:
//!
//! - [`ParseOptions`]: Main configuration struct
//! - [`DuplicateKeys`]: What to do when one block binds the same key twice
//!
//! ## Examples
//!
//! ```rust
//! use scf::{parse_with_options, DuplicateKeys, ParseOptions};
//!
//! // Keep duplicates (the default): lookups see the first one
//! let table = parse_with_options("a = 1 a = 2", ParseOptions::new()).unwrap();
//! assert_eq!(table.get_i32("a"), Ok(Some(1)));
//!
//! // Reject duplicates
//! let options = ParseOptions::new().with_duplicate_keys(DuplicateKeys::Reject);
//! assert!(parse_with_options("a = 1 a = 2", options).is_err());
//! ```

/// Policy for a key that appears more than once in the same block.
///
/// # Examples
///
/// ```rust
/// use scf::DuplicateKeys;
///
/// assert_eq!(DuplicateKeys::default(), DuplicateKeys::Keep);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DuplicateKeys {
    /// Append every entry; lookups resolve to the first.
    #[default]
    Keep,
    /// Fail the parse with [`ParseError::DuplicateKey`](crate::ParseError::DuplicateKey).
    ///
    /// Only keys read from the same block of the same document clash; pairs
    /// already in the table handed to [`Parser::parse_into`](crate::Parser::parse_into)
    /// are not checked.
    Reject,
}

/// Configuration options for [`Parser`](crate::Parser).
///
/// # Examples
///
/// ```rust
/// use scf::{DuplicateKeys, ParseOptions};
///
/// // Default options
/// let options = ParseOptions::new();
/// assert_eq!(options.max_depth, 128);
///
/// // Custom configuration
/// let options = ParseOptions::new()
///     .with_max_depth(8)
///     .with_duplicate_keys(DuplicateKeys::Reject);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Deepest block nesting accepted. The root table is depth 0.
    pub max_depth: usize,
    pub duplicate_keys: DuplicateKeys,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_depth: 128,
            duplicate_keys: DuplicateKeys::default(),
        }
    }
}

impl ParseOptions {
    /// Creates default options (nesting up to 128 blocks, duplicates kept).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the deepest block nesting the parser accepts.
    ///
    /// Deeper input fails with
    /// [`ParseError::RecursionLimit`](crate::ParseError::RecursionLimit)
    /// instead of exhausting the stack.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scf::{parse_with_options, ParseOptions};
    ///
    /// let options = ParseOptions::new().with_max_depth(1);
    /// assert!(parse_with_options("a { b = 1 }", options.clone()).is_ok());
    /// assert!(parse_with_options("a { b { c = 1 } }", options).is_err());
    /// ```
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the duplicate key policy.
    #[must_use]
    pub fn with_duplicate_keys(mut self, policy: DuplicateKeys) -> Self {
        self.duplicate_keys = policy;
        self
    }
}
