use std::{char, io, str};

use super::error::{Error, ErrorCode, Result};
use super::grammar::{is_macro, is_whitespace};
use super::iter::{LineColIterator, Utf8Chars};

/// Trait used by the reader for iterating over input.
///
/// The reader needs exactly one character of lookahead, which is provided
/// by `peek()`; a peeked character is consumed by `discard()` or returned
/// again by the following `next()`.
///
/// This trait is sealed and cannot be implemented for types outside of
/// `lform`.
pub trait Read: private::Sealed {
    #[doc(hidden)]
    fn next(&mut self) -> Result<Option<char>>;
    #[doc(hidden)]
    fn peek(&mut self) -> Result<Option<char>>;

    /// Only valid after a call to peek(). Discards the peeked character.
    #[doc(hidden)]
    fn discard(&mut self);

    /// Position of the most recent call to next().
    ///
    /// The most recent call was probably next() and not peek(), but this method
    /// should try to return a sensible result if the most recent call was
    /// actually peek() because we don't always know.
    #[doc(hidden)]
    fn position(&self) -> Position;

    /// Position of the most recent call to peek().
    #[doc(hidden)]
    fn peek_position(&self) -> Position;
}

/// A one-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// Form input source that reads from a std::io input stream.
///
/// The stream must contain UTF-8; invalid sequences are reported as I/O
/// errors of kind `InvalidData`.
pub struct IoRead<R>
where
    R: io::Read,
{
    iter: LineColIterator<Utf8Chars<io::Bytes<R>>>,
    /// Temporary storage of peeked character.
    ch: Option<char>,
}

/// Form input source that reads from a UTF-8 string.
pub struct StrRead<'a> {
    chars: str::Chars<'a>,
    ch: Option<char>,
    line: usize,
    column: usize,
}

// Prevent users from implementing the Read trait.
mod private {
    pub trait Sealed {}
}

//////////////////////////////////////////////////////////////////////////////

impl<R> IoRead<R>
where
    R: io::Read,
{
    /// Create a form input source to read from a std::io input stream.
    pub fn new(reader: R) -> Self {
        IoRead {
            iter: LineColIterator::new(Utf8Chars::new(reader.bytes())),
            ch: None,
        }
    }
}

impl<R> private::Sealed for IoRead<R> where R: io::Read {}

impl<R> Read for IoRead<R>
where
    R: io::Read,
{
    #[inline]
    fn next(&mut self) -> Result<Option<char>> {
        match self.ch.take() {
            Some(ch) => Ok(Some(ch)),
            None => match self.iter.next() {
                Some(Err(err)) => Err(Error::io(err)),
                Some(Ok(ch)) => Ok(Some(ch)),
                None => Ok(None),
            },
        }
    }

    #[inline]
    fn peek(&mut self) -> Result<Option<char>> {
        match self.ch {
            Some(ch) => Ok(Some(ch)),
            None => match self.iter.next() {
                Some(Err(err)) => Err(Error::io(err)),
                Some(Ok(ch)) => {
                    self.ch = Some(ch);
                    Ok(self.ch)
                }
                None => Ok(None),
            },
        }
    }

    #[inline]
    fn discard(&mut self) {
        self.ch = None;
    }

    fn position(&self) -> Position {
        Position {
            line: self.iter.line(),
            column: self.iter.col(),
        }
    }

    fn peek_position(&self) -> Position {
        // The LineColIterator updates its position during peek() so it has the
        // right one here.
        self.position()
    }
}

//////////////////////////////////////////////////////////////////////////////

impl<'a> StrRead<'a> {
    /// Create a form input source to read from a UTF-8 string.
    pub fn new(s: &'a str) -> Self {
        StrRead {
            chars: s.chars(),
            ch: None,
            line: 1,
            column: 0,
        }
    }

    fn pull(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(ch)
    }
}

impl<'a> private::Sealed for StrRead<'a> {}

impl<'a> Read for StrRead<'a> {
    #[inline]
    fn next(&mut self) -> Result<Option<char>> {
        Ok(match self.ch.take() {
            Some(ch) => Some(ch),
            None => self.pull(),
        })
    }

    #[inline]
    fn peek(&mut self) -> Result<Option<char>> {
        if self.ch.is_none() {
            self.ch = self.pull();
        }
        Ok(self.ch)
    }

    #[inline]
    fn discard(&mut self) {
        self.ch = None;
    }

    fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    fn peek_position(&self) -> Position {
        self.position()
    }
}

//////////////////////////////////////////////////////////////////////////////

fn error<R: ?Sized + Read, T>(read: &R, reason: ErrorCode) -> Result<T> {
    let position = read.position();
    Err(Error::syntax(reason, position.line, position.column))
}

fn next_or_eof<R: ?Sized + Read>(read: &mut R, eof: fn() -> ErrorCode) -> Result<char> {
    match read.next()? {
        Some(ch) => Ok(ch),
        None => error(read, eof()),
    }
}

/// Assumes the previous character was a quotation mark. Reads a string with
/// escapes expanded until the next unescaped quotation mark into `scratch`.
pub(crate) fn parse_str<R: ?Sized + Read>(read: &mut R, scratch: &mut String) -> Result<()> {
    loop {
        match next_or_eof(read, || ErrorCode::EofWhileReadingString)? {
            '"' => return Ok(()),
            '\\' => parse_escape(read, scratch)?,
            ch => scratch.push(ch),
        }
    }
}

/// Assumes the previous characters were `#"`. Reads the source of a regex
/// literal into `scratch`, keeping backslash pairs verbatim.
pub(crate) fn parse_regex<R: ?Sized + Read>(read: &mut R, scratch: &mut String) -> Result<()> {
    let eof = || ErrorCode::EofWhileReadingRegex;
    loop {
        match next_or_eof(read, eof)? {
            '"' => return Ok(()),
            '\\' => {
                scratch.push('\\');
                scratch.push(next_or_eof(read, eof)?);
            }
            ch => scratch.push(ch),
        }
    }
}

/// Parses an escape sequence inside a string and appends the character it
/// denotes. Assumes the previous character read was a backslash.
fn parse_escape<R: ?Sized + Read>(read: &mut R, scratch: &mut String) -> Result<()> {
    let ch = next_or_eof(read, || ErrorCode::EofWhileReadingString)?;
    match ch {
        't' => scratch.push('\t'),
        'r' => scratch.push('\r'),
        'n' => scratch.push('\n'),
        '\\' => scratch.push('\\'),
        '"' => scratch.push('"'),
        'b' => scratch.push('\x08'),
        'f' => scratch.push('\x0c'),
        'u' => {
            let unit = parse_unicode_escape(read)?;
            let c = match unit {
                0xD800..=0xDBFF => {
                    let low = match (read.next()?, read.next()?) {
                        (Some('\\'), Some('u')) => parse_unicode_escape(read)?,
                        _ => return lone_surrogate(read, unit),
                    };
                    if !(0xDC00..=0xDFFF).contains(&low) {
                        return lone_surrogate(read, unit);
                    }
                    0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00)
                }
                0xDC00..=0xDFFF => return lone_surrogate(read, unit),
                _ => unit,
            };
            match char::from_u32(c) {
                Some(c) => scratch.push(c),
                None => return lone_surrogate(read, c),
            }
        }
        ch if ch.is_ascii_digit() => {
            let n = read_code_unit(read, ch, 8, 3, false)?;
            if n > 0o377 {
                return error(
                    read,
                    ErrorCode::InvalidOctalEscape(
                        "octal escape sequence must be in range [0, 377]".into(),
                    ),
                );
            }
            // Values up to 0o377 are all valid scalar values.
            scratch.extend(char::from_u32(n));
        }
        ch => return error(read, ErrorCode::UnsupportedEscape(ch)),
    }
    Ok(())
}

fn lone_surrogate<R: ?Sized + Read, T>(read: &R, unit: u32) -> Result<T> {
    error(
        read,
        ErrorCode::InvalidUnicodeEscape(format!("unpaired surrogate \\u{:04X}", unit)),
    )
}

/// Assumes `\u` was just read; reads exactly four hex digits.
fn parse_unicode_escape<R: ?Sized + Read>(read: &mut R) -> Result<u32> {
    let first = next_or_eof(read, || ErrorCode::EofWhileReadingString)?;
    if !first.is_ascii_hexdigit() {
        return error(
            read,
            ErrorCode::InvalidUnicodeEscape(format!("\\u{}", first)),
        );
    }
    read_code_unit(read, first, 16, 4, true)
}

/// Accumulates up to `length` digits in `base`, starting with `init`.
///
/// Stops early before whitespace, a macro character or EOF; with `exact`
/// set, stopping early is an error.
fn read_code_unit<R: ?Sized + Read>(
    read: &mut R,
    init: char,
    base: u32,
    length: usize,
    exact: bool,
) -> Result<u32> {
    let invalid = |ch: char| {
        let msg = format!("invalid digit: {}", ch);
        if base == 16 {
            ErrorCode::InvalidUnicodeEscape(msg)
        } else {
            ErrorCode::InvalidOctalEscape(msg)
        }
    };
    let mut n = match init.to_digit(base) {
        Some(d) => d,
        None => return error(read, invalid(init)),
    };
    let mut count = 1;
    while count < length {
        match read.peek()? {
            Some(ch) if !is_whitespace(ch) && !is_macro(ch) => {
                read.discard();
                match ch.to_digit(base) {
                    Some(d) => n = n * base + d,
                    None => return error(read, invalid(ch)),
                }
            }
            _ => break,
        }
        count += 1;
    }
    if exact && count != length {
        return error(
            read,
            ErrorCode::InvalidUnicodeEscape(format!(
                "invalid character length: {}, should be: {}",
                count, length
            )),
        );
    }
    Ok(n)
}

/// Decodes the digits of a `\uXXXX` or `\oNNN` character literal token.
///
/// `digits` must consist of exactly `length` digits in `base`.
pub(crate) fn decode_code_point(digits: &str, base: u32, length: usize) -> Option<u32> {
    if digits.chars().count() != length {
        return None;
    }
    digits
        .chars()
        .try_fold(0u32, |n, ch| ch.to_digit(base).map(|d| n * base + d))
}
