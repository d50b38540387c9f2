//! SCF tokenization.
//!
//! The lexer is a maximal-munch state machine over decoded code points. A
//! [`Token`] holds the whole source buffer plus the span of its current
//! lexeme; [`Token::advance`] moves that span forward to the next lexeme in
//! place, the way a cursor would.
//!
//! ## Tokens
//!
//! | Kind | Lexeme |
//! |------|--------|
//! | `Integer` | `-`? digits |
//! | `Float` | an integer followed by `.` and optional digits |
//! | `String` | `"` anything but `"` or a line break `"` (quotes included in the span) |
//! | `Punct` | `{`, `}` or `=` |
//! | `Word` | a letter or `_`, then letters, digits or `_` |
//!
//! Spaces, tabs and newlines separate tokens. There are no comments.
//!
//! ## Examples
//!
//! ```rust
//! use scf::{Token, TokenKind};
//!
//! let mut token = Token::start("port = 8080");
//! assert_eq!(token.kind(), TokenKind::Start);
//!
//! token.advance().unwrap();
//! assert_eq!((token.kind(), token.text()), (TokenKind::Word, "port"));
//! token.advance().unwrap();
//! assert_eq!((token.kind(), token.text()), (TokenKind::Punct, "="));
//! token.advance().unwrap();
//! assert_eq!((token.kind(), token.text()), (TokenKind::Integer, "8080"));
//! token.advance().unwrap();
//! assert_eq!(token.kind(), TokenKind::Eof);
//! ```

use crate::{LexError, Location};
use std::fmt;
use std::ops::Range;

/// Classification of a lexeme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Nothing has been scanned yet.
    Start,
    Eof,
    Integer,
    Float,
    String,
    Punct,
    Word,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenKind::Start => "start of file",
            TokenKind::Eof => "end of file",
            TokenKind::Integer => "integer",
            TokenKind::Float => "float",
            TokenKind::String => "string",
            TokenKind::Punct => "punctuation",
            TokenKind::Word => "word",
        })
    }
}

/// A classified span of the source buffer.
///
/// The token borrows the buffer, so it can never outlive it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    src: &'a str,
    start: usize,
    len: usize,
    kind: TokenKind,
}

impl<'a> Token<'a> {
    /// Places a `Start` token at the beginning of `src`.
    #[must_use]
    pub fn start(src: &'a str) -> Self {
        Token {
            src,
            start: 0,
            len: 0,
            kind: TokenKind::Start,
        }
    }

    /// Places a `Start` token at the beginning of a UTF-8 byte buffer.
    ///
    /// Decoding stops at the first invalid sequence, which the scanner then
    /// treats as the end of input.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scf::{Token, TokenKind};
    ///
    /// let mut token = Token::start_bytes(b"ok \xff junk");
    /// token.advance().unwrap();
    /// assert_eq!(token.text(), "ok");
    /// token.advance().unwrap();
    /// assert_eq!(token.kind(), TokenKind::Eof);
    /// ```
    #[must_use]
    pub fn start_bytes(bytes: &'a [u8]) -> Self {
        Token::start(decodable_prefix(bytes))
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// The lexeme. String tokens keep their quotes.
    #[inline]
    #[must_use]
    pub fn text(&self) -> &'a str {
        &self.src[self.span()]
    }

    /// Byte range of the lexeme inside the source buffer.
    #[inline]
    #[must_use]
    pub fn span(&self) -> Range<usize> {
        self.start..self.start + self.len
    }

    /// Byte offset of the lexeme.
    #[inline]
    #[must_use]
    pub fn offset(&self) -> usize {
        self.start
    }

    /// Length of the lexeme in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The whole buffer this token points into.
    #[inline]
    #[must_use]
    pub fn source(&self) -> &'a str {
        self.src
    }

    /// Line and column of the lexeme.
    #[must_use]
    pub fn location(&self) -> Location {
        Location::locate(self.src, self.start)
    }

    /// Moves this token to the next lexeme.
    ///
    /// At the end of input the token becomes `Eof`, and stays `Eof` on every
    /// further call. On error the token is left where it was and the caller
    /// should stop scanning.
    pub fn advance(&mut self) -> Result<(), LexError> {
        let mut cursor = Cursor::new(self.src, self.start + self.len);
        cursor.skip_separators();

        let start = cursor.pos;
        let mut end = start;
        let mut state = State::Any;
        loop {
            let next = cursor.peek();
            let action = transition(state, next).map_err(|fault| fault.at(self.src, start))?;
            state = action.next;
            if action.accept {
                cursor.bump();
                end = cursor.pos;
            }
            if let Some(kind) = action.emit {
                self.start = start;
                self.len = end - start;
                self.kind = kind;
                tracing::trace!(kind = ?kind, text = self.text(), offset = start, "token");
                return Ok(());
            }
        }
    }
}

/// Iterator over the tokens of a buffer, ending with `Eof`.
///
/// Yields at most one error, after which it is exhausted.
///
/// # Examples
///
/// ```rust
/// use scf::{tokenize, TokenKind};
///
/// let kinds: Vec<_> = tokenize("a { b = 1.5 }")
///     .map(|t| t.unwrap().kind())
///     .collect();
/// assert_eq!(
///     kinds,
///     vec![
///         TokenKind::Word,
///         TokenKind::Punct,
///         TokenKind::Word,
///         TokenKind::Punct,
///         TokenKind::Float,
///         TokenKind::Punct,
///         TokenKind::Eof,
///     ]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    token: Token<'a>,
    done: bool,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(src: &'a str) -> Self {
        Lexer {
            token: Token::start(src),
            done: false,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.token.advance() {
            Ok(()) => {
                self.done = self.token.kind() == TokenKind::Eof;
                Some(Ok(self.token))
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl std::iter::FusedIterator for Lexer<'_> {}

/// Tokenizes `src` lazily.
#[must_use]
pub fn tokenize(src: &str) -> Lexer<'_> {
    Lexer::new(src)
}

/// The longest prefix of `bytes` that is valid UTF-8.
pub(crate) fn decodable_prefix(bytes: &[u8]) -> &str {
    match std::str::from_utf8(bytes) {
        Ok(src) => src,
        Err(err) => {
            tracing::debug!(
                valid_up_to = err.valid_up_to(),
                len = bytes.len(),
                "input is not valid UTF-8, scanning the valid prefix"
            );
            std::str::from_utf8(&bytes[..err.valid_up_to()]).unwrap_or_default()
        }
    }
}

/// Code point cursor with one code point of lookahead.
struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str, pos: usize) -> Self {
        Cursor {
            src,
            pos: pos.min(src.len()),
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(ch) = self.peek() {
            self.pos += ch.len_utf8();
        }
    }

    fn skip_separators(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\n')) {
            self.bump();
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Any,
    Int,
    Float,
    String,
    Word,
}

/// What to do with the code point under the cursor.
///
/// Every action accepts, emits, or both, so the scan loop always progresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Action {
    next: State,
    /// Consume the code point as part of the lexeme.
    accept: bool,
    /// Finish the lexeme. Without `accept`, the code point stays under the
    /// cursor and starts the next token.
    emit: Option<TokenKind>,
}

impl Action {
    const fn shift(next: State) -> Self {
        Action {
            next,
            accept: true,
            emit: None,
        }
    }

    const fn take(kind: TokenKind) -> Self {
        Action {
            next: State::Any,
            accept: true,
            emit: Some(kind),
        }
    }

    const fn finish(kind: TokenKind) -> Self {
        Action {
            next: State::Any,
            accept: false,
            emit: Some(kind),
        }
    }
}

/// A scan failure before its position is resolved.
enum Fault {
    Unknown(char),
    Unterminated,
}

impl Fault {
    fn at(self, src: &str, start: usize) -> LexError {
        match self {
            Fault::Unknown(ch) => LexError::UnknownCharacter {
                ch,
                location: Location::locate(src, start),
            },
            Fault::Unterminated => LexError::UnterminatedString {
                location: Location::locate(src, start),
            },
        }
    }
}

fn is_word_start(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphabetic()
}

fn is_word_continue(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphanumeric()
}

/// The scanner's transition table. `None` is the end of input.
fn transition(state: State, input: Option<char>) -> Result<Action, Fault> {
    let action = match (state, input) {
        (State::Any, None) => Action::finish(TokenKind::Eof),
        (State::Any, Some(ch)) => match ch {
            '-' | '0'..='9' => Action::shift(State::Int),
            '"' => Action::shift(State::String),
            '{' | '}' | '=' => Action::take(TokenKind::Punct),
            ch if is_word_start(ch) => Action::shift(State::Word),
            ch => return Err(Fault::Unknown(ch)),
        },

        (State::Int, Some('0'..='9')) => Action::shift(State::Int),
        (State::Int, Some('.')) => Action::shift(State::Float),
        (State::Int, _) => Action::finish(TokenKind::Integer),

        (State::Float, Some('0'..='9')) => Action::shift(State::Float),
        (State::Float, _) => Action::finish(TokenKind::Float),

        (State::String, Some('"')) => Action::take(TokenKind::String),
        (State::String, Some('\n') | None) => return Err(Fault::Unterminated),
        (State::String, Some(_)) => Action::shift(State::String),

        (State::Word, Some(ch)) if is_word_continue(ch) => Action::shift(State::Word),
        (State::Word, _) => Action::finish(TokenKind::Word),
    };
    Ok(action)
}
