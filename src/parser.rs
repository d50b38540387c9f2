//! SCF parsing.
//!
//! A recursive-descent parser over the token stream of [`crate::lexer`]. It
//! keeps a single current token and pulls the next one on demand.
//!
//! ## Grammar
//!
//! ```text
//! File   := <Start> Entry* <Eof>
//! Entry  := <Word> ( '=' Value | '{' Entry* '}' )
//! Value  := 'nil' | 'true' | 'false' | <Integer> | <Float> | <String>
//! ```
//!
//! There is no error recovery: the first token that does not fit aborts the
//! parse.
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! let table = scf::parse("window { width = 640 height = 480 }").unwrap();
//! let window = table.get_table("window").unwrap().unwrap();
//! assert_eq!(window.get_i32("height"), Ok(Some(480)));
//! ```

use crate::lexer::{decodable_prefix, Token, TokenKind};
use crate::{DuplicateKeys, Expected, ParseError, ParseOptions, Table, Value};
use std::collections::HashSet;

type Result<T> = std::result::Result<T, ParseError>;

/// The SCF parser.
///
/// Created via [`Parser::new`], which primes the cursor at the `Start` token.
pub struct Parser<'a> {
    cur: Token<'a>,
    options: ParseOptions,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Binds a parser to `src` with default options.
    #[must_use]
    pub fn new(src: &'a str) -> Self {
        Self::with_options(src, ParseOptions::default())
    }

    /// Binds a parser to `src`.
    #[must_use]
    pub fn with_options(src: &'a str, options: ParseOptions) -> Self {
        Parser {
            cur: Token::start(src),
            options,
            depth: 0,
        }
    }

    /// Binds a parser to a UTF-8 byte buffer.
    ///
    /// Input past the first invalid UTF-8 sequence is ignored.
    #[must_use]
    pub fn from_slice(bytes: &'a [u8], options: ParseOptions) -> Self {
        Self::with_options(decodable_prefix(bytes), options)
    }

    /// Parses the whole document into a new table.
    ///
    /// On failure nothing is returned: every entry parsed so far is dropped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scf::{Parser, Value};
    ///
    /// let mut parser = Parser::new("key1 = nil key2 = true key3 = 123");
    /// let table = parser.parse_table().unwrap();
    ///
    /// let values: Vec<_> = table.values().cloned().collect();
    /// assert_eq!(values, vec![Value::Nil, Value::Bool(true), Value::I32(123)]);
    /// ```
    pub fn parse_table(&mut self) -> Result<Table> {
        let mut table = Table::new();
        self.parse_into(&mut table)?;
        Ok(table)
    }

    /// Parses the whole document, appending its top-level entries to `table`.
    ///
    /// On failure, entries completed before the bad one stay in `table`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scf::{Parser, Table};
    ///
    /// let mut table = Table::new();
    /// let result = Parser::new("a = 1 b = 2 c = ?").parse_into(&mut table);
    ///
    /// assert!(result.is_err());
    /// assert_eq!(table.len(), 2);
    /// ```
    pub fn parse_into(&mut self, table: &mut Table) -> Result<()> {
        tracing::debug!(len = self.cur.source().len(), "parsing scf document");
        let result = self.parse_file(table);
        match &result {
            Ok(()) => tracing::debug!(entries = table.len(), "parsed scf document"),
            Err(err) => tracing::debug!(%err, "failed to parse scf document"),
        }
        result
    }

    fn parse_file(&mut self, table: &mut Table) -> Result<()> {
        if !self.expect_kind(TokenKind::Start)? {
            return Err(self.unexpected(Expected::StartOfFile));
        }

        let mut seen = HashSet::new();
        while !self.at(TokenKind::Eof) {
            self.parse_entry(table, &mut seen)?;
        }

        Ok(())
    }

    /// `Word ( '=' Value | '{' Entry* '}' )`, appended to `table`.
    ///
    /// Under [`DuplicateKeys::Reject`], `seen` holds the keys this parse has
    /// bound so far in the enclosing block. Entries already in `table` before
    /// the parse do not count.
    fn parse_entry(&mut self, table: &mut Table, seen: &mut HashSet<&'a str>) -> Result<()> {
        let key = self.cur;
        if !self.expect_kind(TokenKind::Word)? {
            return Err(self.unexpected(Expected::Identifier));
        }

        if self.options.duplicate_keys == DuplicateKeys::Reject && !seen.insert(key.text()) {
            return Err(ParseError::DuplicateKey {
                key: key.text().to_string(),
                location: key.location(),
            });
        }

        let value = if self.expect_punct('{')? {
            self.parse_block(key)?
        } else if self.expect_punct('=')? {
            self.parse_value()?
        } else {
            return Err(self.unexpected(Expected::AssignOrBlock));
        };

        tracing::trace!(key = key.text(), kind = %value.kind(), "entry");
        table.add(key.text(), value);
        Ok(())
    }

    /// `Entry* '}'`, the opening brace already consumed.
    fn parse_block(&mut self, key: Token<'a>) -> Result<Value> {
        if self.depth >= self.options.max_depth {
            return Err(ParseError::RecursionLimit {
                limit: self.options.max_depth,
                location: key.location(),
            });
        }

        self.depth += 1;
        let mut table = Table::new();
        let result = self.parse_block_entries(&mut table);
        self.depth -= 1;
        result?;

        Ok(Value::Table(table))
    }

    fn parse_block_entries(&mut self, table: &mut Table) -> Result<()> {
        let mut seen = HashSet::new();
        loop {
            if self.expect_punct('}')? {
                return Ok(());
            }
            if self.at(TokenKind::Eof) {
                return Err(self.unexpected(Expected::EndOfBlock));
            }
            self.parse_entry(table, &mut seen)?;
        }
    }

    fn parse_value(&mut self) -> Result<Value> {
        if self.expect_word("nil")? {
            return Ok(Value::Nil);
        }
        if self.expect_word("true")? {
            return Ok(Value::Bool(true));
        }
        if self.expect_word("false")? {
            return Ok(Value::Bool(false));
        }

        let token = self.cur;
        match token.kind() {
            TokenKind::Integer => {
                let value = token
                    .text()
                    .parse::<i32>()
                    .map_err(|_| invalid_number(token))?;
                self.bump()?;
                Ok(Value::I32(value))
            }
            TokenKind::Float => {
                let value = token
                    .text()
                    .parse::<f32>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .ok_or_else(|| invalid_number(token))?;
                self.bump()?;
                Ok(Value::F32(value))
            }
            TokenKind::String => {
                let text = token.text();
                self.bump()?;
                Ok(Value::String(unquote(text).to_string()))
            }
            _ => Err(self.unexpected(Expected::Value)),
        }
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.cur.kind() == kind
    }

    fn bump(&mut self) -> Result<()> {
        self.cur.advance()?;
        Ok(())
    }

    /// Consumes the current token if it has this kind.
    fn expect_kind(&mut self, kind: TokenKind) -> Result<bool> {
        if !self.at(kind) {
            return Ok(false);
        }
        self.bump()?;
        Ok(true)
    }

    /// Consumes the current token if it is exactly this word.
    fn expect_word(&mut self, word: &str) -> Result<bool> {
        if !self.at(TokenKind::Word) || self.cur.text() != word {
            return Ok(false);
        }
        self.bump()?;
        Ok(true)
    }

    /// Consumes the current token if it is exactly this punctuation.
    fn expect_punct(&mut self, punct: char) -> Result<bool> {
        if !self.at(TokenKind::Punct) || !self.cur.text().starts_with(punct) {
            return Ok(false);
        }
        self.bump()?;
        Ok(true)
    }

    fn unexpected(&self, expected: Expected) -> ParseError {
        let found = match self.cur.kind() {
            TokenKind::Eof => "end of file".to_string(),
            _ => self.cur.text().to_string(),
        };
        ParseError::UnexpectedToken {
            expected,
            found,
            location: self.cur.location(),
        }
    }
}

fn invalid_number(token: Token<'_>) -> ParseError {
    ParseError::InvalidNumber {
        literal: token.text().to_string(),
        location: token.location(),
    }
}

/// Strips the surrounding quotes of a string lexeme.
fn unquote(lexeme: &str) -> &str {
    lexeme
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(lexeme)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Location;

    fn parse(src: &str) -> Result<Table> {
        Parser::new(src).parse_table()
    }

    #[test]
    fn test_single_entry() {
        let table = parse("key = 123").unwrap();
        assert_eq!(table.get("key"), Some(&Value::I32(123)));
    }

    #[test]
    fn test_multiple_entries() {
        let table = parse("key1 = nil key2 = true key3 = 123").unwrap();
        assert_eq!(table.get("key1"), Some(&Value::Nil));
        assert_eq!(table.get("key2"), Some(&Value::Bool(true)));
        assert_eq!(table.get("key3"), Some(&Value::I32(123)));

        let keys: Vec<_> = table.keys().collect();
        assert_eq!(keys, vec!["key1", "key2", "key3"]);
    }

    #[test]
    fn test_subtables() {
        let table = parse("sub { key = 123 }").unwrap();
        let sub = table.get_table("sub").unwrap().unwrap();
        assert_eq!(sub.get_i32("key"), Ok(Some(123)));
    }

    #[test]
    fn test_all_value_kinds() {
        let table = parse(
            "n = nil t = true f = false i = -42 x = 2.5 s = \"hi there\" e = \"\" b {}",
        )
        .unwrap();
        assert_eq!(table.get("n"), Some(&Value::Nil));
        assert_eq!(table.get_bool("t"), Ok(Some(true)));
        assert_eq!(table.get_bool("f"), Ok(Some(false)));
        assert_eq!(table.get_i32("i"), Ok(Some(-42)));
        assert_eq!(table.get_f32("x"), Ok(Some(2.5)));
        assert_eq!(table.get_string("s"), Ok(Some("hi there")));
        assert_eq!(table.get_string("e"), Ok(Some("")));
        assert_eq!(table.get_table("b"), Ok(Some(&Table::new())));
    }

    #[test]
    fn test_empty_document() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse(" \n\t ").unwrap().is_empty());
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        let err = parse("a = True").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                expected: Expected::Value,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_identifier() {
        let err = parse("= 1").unwrap_err();
        match err {
            ParseError::UnexpectedToken {
                expected, found, ..
            } => {
                assert_eq!(expected, Expected::Identifier);
                assert_eq!(found, "=");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_assign_or_block() {
        let err = parse("key 1").unwrap_err();
        assert_eq!(
            err.to_string(),
            "was expecting assign '=' or block '{' but found: '1' at line 1, column 5"
        );
    }

    #[test]
    fn test_missing_value() {
        let err = parse("key = {").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                expected: Expected::Value,
                ..
            }
        ));

        let err = parse("key =").unwrap_err();
        match err {
            ParseError::UnexpectedToken { found, .. } => assert_eq!(found, "end of file"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unclosed_block() {
        let err = parse("sub { key = 1").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                expected: Expected::EndOfBlock,
                ..
            }
        ));
    }

    #[test]
    fn test_stray_closing_brace() {
        let err = parse("a = 1 }").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                expected: Expected::Identifier,
                ..
            }
        ));
    }

    #[test]
    fn test_lex_error_propagates() {
        let err = parse("a = 1 # comment").unwrap_err();
        assert!(matches!(
            err,
            ParseError::Lex(crate::LexError::UnknownCharacter { ch: '#', .. })
        ));

        let err = parse("a = \"open\nb = 2").unwrap_err();
        assert!(matches!(
            err,
            ParseError::Lex(crate::LexError::UnterminatedString { .. })
        ));
    }

    #[test]
    fn test_integer_range() {
        let table = parse("max = 2147483647 min = -2147483648").unwrap();
        assert_eq!(table.get_i32("max"), Ok(Some(i32::MAX)));
        assert_eq!(table.get_i32("min"), Ok(Some(i32::MIN)));

        let err = parse("big = 2147483648").unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidNumber {
                literal: "2147483648".to_string(),
                location: Location {
                    offset: 6,
                    line: 1,
                    column: 7
                },
            }
        );
    }

    #[test]
    fn test_long_numeric_literals_are_not_truncated() {
        let digits = "1".repeat(300);
        let err = parse(&format!("a = {digits}")).unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { .. }));

        let zeros = "0".repeat(300);
        let table = parse(&format!("a = {zeros}7 b = 0.{zeros}")).unwrap();
        assert_eq!(table.get_i32("a"), Ok(Some(7)));
        assert_eq!(table.get_f32("b"), Ok(Some(0.0)));
    }

    #[test]
    fn test_degenerate_numbers() {
        assert!(matches!(
            parse("a = -").unwrap_err(),
            ParseError::InvalidNumber { .. }
        ));
        assert!(matches!(
            parse("a = -.").unwrap_err(),
            ParseError::InvalidNumber { .. }
        ));
        let huge = format!("a = {}.0", "9".repeat(60));
        assert!(matches!(
            parse(&huge).unwrap_err(),
            ParseError::InvalidNumber { .. }
        ));
    }

    #[test]
    fn test_trailing_dot_float() {
        let table = parse("a = 1. b = -3.").unwrap();
        assert_eq!(table.get_f32("a"), Ok(Some(1.0)));
        assert_eq!(table.get_f32("b"), Ok(Some(-3.0)));
    }

    #[test]
    fn test_duplicate_keys_kept_by_default() {
        let table = parse("a = 1 a = 2").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get_i32("a"), Ok(Some(1)));
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let options = ParseOptions::new().with_duplicate_keys(DuplicateKeys::Reject);
        let err = Parser::with_options("s { a = 1 b = 2 a = 3 }", options.clone())
            .parse_table()
            .unwrap_err();
        match err {
            ParseError::DuplicateKey { key, location } => {
                assert_eq!(key, "a");
                assert_eq!(location.offset, 16);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        // the same key in different blocks is fine
        assert!(Parser::with_options("a { a = 1 } b { a = 2 }", options)
            .parse_table()
            .is_ok());
    }

    #[test]
    fn test_recursion_limit() {
        let options = ParseOptions::new().with_max_depth(3);
        let ok = "a { b { c { d = 1 } } }";
        assert!(Parser::with_options(ok, options.clone()).parse_table().is_ok());

        let deep = "a { b { c { d { e = 1 } } } }";
        let err = Parser::with_options(deep, options)
            .parse_table()
            .unwrap_err();
        assert!(matches!(err, ParseError::RecursionLimit { limit: 3, .. }));
    }

    #[test]
    fn test_pathological_nesting_fails_cleanly() {
        let depth = 100_000;
        let src = format!("{}{}", "a { ".repeat(depth), "}".repeat(depth));
        let err = parse(&src).unwrap_err();
        assert!(matches!(err, ParseError::RecursionLimit { limit: 128, .. }));
    }

    #[test]
    fn test_depth_resets_after_failure() {
        let mut parser = Parser::new("a { b = ? }");
        assert!(parser.parse_table().is_err());
        assert_eq!(parser.depth, 0);
    }

    #[test]
    fn test_parse_into_keeps_completed_entries() {
        let mut table = Table::new();
        table.add("existing", true);
        let err = Parser::new("a = 1 b { c = 2 } d = ")
            .parse_into(&mut table)
            .unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));

        let keys: Vec<_> = table.keys().collect();
        assert_eq!(keys, vec!["existing", "a", "b"]);
    }

    #[test]
    fn test_parse_into_reject_ignores_existing_entries() {
        let options = ParseOptions::new().with_duplicate_keys(DuplicateKeys::Reject);
        let mut table = Table::new();
        table.add("a", 0);

        Parser::with_options("a = 1 b = 2", options.clone())
            .parse_into(&mut table)
            .unwrap();
        assert_eq!(table.keys().collect::<Vec<_>>(), ["a", "a", "b"]);
        assert_eq!(table.get_i32("a"), Ok(Some(0)));

        let err = Parser::with_options("c = 1 c = 2", options)
            .parse_into(&mut table)
            .unwrap_err();
        assert!(matches!(err, ParseError::DuplicateKey { ref key, .. } if key == "c"));
    }

    #[test]
    fn test_from_slice() {
        let table = Parser::from_slice(b"a = \"ok\"", ParseOptions::default())
            .parse_table()
            .unwrap();
        assert_eq!(table.get_string("a"), Ok(Some("ok")));
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("\"abc\""), "abc");
        assert_eq!(unquote("\"\""), "");
    }
}
