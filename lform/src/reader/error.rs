//! When reading forms goes wrong.

use std::error;
use std::fmt::{self, Debug, Display};
use std::io;
use std::result;

use crate::host::HostError;

/// This type represents the possible errors when reading forms.
pub struct Error {
    /// This `Box` allows us to keep the size of `Error` as small as possible. A
    /// larger `Error` type was substantially slower due to all the functions
    /// that pass around `Result<T, Error>`.
    err: Box<ErrorImpl>,
}

/// Alias for a `Result` with the error type `lform::reader::Error`.
pub type Result<T> = result::Result<T, Error>;

/// Location of a read error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    line: usize,
    column: usize,
}

impl Location {
    /// One-based line number at which the error was detected.
    ///
    /// Characters in the first line of the input (before the first newline
    /// character) are in line 1.
    pub fn line(&self) -> usize {
        self.line
    }

    /// One-based column number at which the error was detected.
    ///
    /// The first character in the input and any characters immediately
    /// following a newline character are in column 1.
    ///
    /// Note that errors may occur in column 0, for example if a read from an IO
    /// stream fails immediately following a previously read newline character.
    pub fn column(&self) -> usize {
        self.column
    }
}

impl Error {
    /// Location of the error in the input stream.
    pub fn location(&self) -> Option<Location> {
        self.err.location
    }

    /// Categorizes the cause of this error.
    ///
    /// - `Category::Io` - failure to read bytes from an IO stream
    /// - `Category::Syntax` - input that is not syntactically valid
    /// - `Category::Eof` - unexpected end of the input data
    /// - `Category::Eval` - read-time evaluation was refused or failed, or a
    ///   tag reader failed
    pub fn classify(&self) -> Category {
        match self.err.code {
            ErrorCode::Io(_) => Category::Io,
            ErrorCode::EofWhileReading
            | ErrorCode::EofWhileReadingString
            | ErrorCode::EofWhileReadingRegex
            | ErrorCode::EofWhileReadingCharacter
            | ErrorCode::EofWhileReadingCollection { .. } => Category::Eof,
            ErrorCode::ReadEvalUnknown | ErrorCode::EvalDisallowed | ErrorCode::EvalFailed(_) => {
                Category::Eval
            }
            ErrorCode::InvalidNumber(_)
            | ErrorCode::InvalidToken(_)
            | ErrorCode::InvalidSymbolicValue(_)
            | ErrorCode::UnresolvedNamespace(_)
            | ErrorCode::OddMapForms
            | ErrorCode::DuplicateKey(_)
            | ErrorCode::UnmatchedDelimiter(_)
            | ErrorCode::UnknownDispatchMacro(_)
            | ErrorCode::NoReaderForTag(_)
            | ErrorCode::UnsupportedEscape(_)
            | ErrorCode::InvalidUnicodeEscape(_)
            | ErrorCode::InvalidOctalEscape(_)
            | ErrorCode::UnsupportedCharacter(_)
            | ErrorCode::InvalidRegex(_)
            | ErrorCode::InvalidMetadata
            | ErrorCode::InvalidMetadataTarget
            | ErrorCode::UnreadableForm
            | ErrorCode::UnquoteOutsideSyntaxQuote
            | ErrorCode::SpliceOutsideList
            | ErrorCode::NestedFn
            | ErrorCode::InvalidArgLiteral
            | ErrorCode::ConditionalReadNotAllowed
            | ErrorCode::InvalidConditional(_)
            | ErrorCode::SpliceAtTopLevel
            | ErrorCode::InvalidNamespacedMap(_)
            | ErrorCode::TrailingCharacters
            | ErrorCode::RecursionLimitExceeded => Category::Syntax,
        }
    }

    /// The kind of error, for callers that need to tell read failures apart.
    ///
    /// ```
    /// use lform::reader::error::ErrorKind;
    ///
    /// let err = lform::from_str("{:a 1 :b}").unwrap_err();
    /// assert_eq!(err.kind(), ErrorKind::OddMap);
    /// let err = lform::from_str("#{1 1}").unwrap_err();
    /// assert_eq!(err.kind(), ErrorKind::Duplicate);
    /// let err = lform::from_str(r#""\q""#).unwrap_err();
    /// assert_eq!(err.kind(), ErrorKind::UnsupportedEscape);
    /// ```
    pub fn kind(&self) -> ErrorKind {
        match self.err.code {
            ErrorCode::Io(_) => ErrorKind::Io,
            ErrorCode::EofWhileReading => ErrorKind::Eof,
            ErrorCode::EofWhileReadingString => ErrorKind::EofInString,
            ErrorCode::EofWhileReadingRegex => ErrorKind::EofInRegex,
            ErrorCode::EofWhileReadingCharacter => ErrorKind::EofInCharacter,
            ErrorCode::EofWhileReadingCollection { .. } => ErrorKind::EofInCollection,
            ErrorCode::InvalidNumber(_) => ErrorKind::InvalidNumber,
            ErrorCode::InvalidToken(_) | ErrorCode::InvalidSymbolicValue(_) => {
                ErrorKind::InvalidToken
            }
            ErrorCode::UnresolvedNamespace(_) => ErrorKind::UnresolvedNamespace,
            ErrorCode::OddMapForms => ErrorKind::OddMap,
            ErrorCode::DuplicateKey(_) => ErrorKind::Duplicate,
            ErrorCode::UnmatchedDelimiter(_) => ErrorKind::UnmatchedDelimiter,
            ErrorCode::UnknownDispatchMacro(_) | ErrorCode::NoReaderForTag(_) => {
                ErrorKind::UnknownDispatch
            }
            ErrorCode::UnsupportedEscape(_) => ErrorKind::UnsupportedEscape,
            ErrorCode::InvalidUnicodeEscape(_) => ErrorKind::InvalidUnicodeEscape,
            ErrorCode::InvalidOctalEscape(_) => ErrorKind::InvalidOctalEscape,
            ErrorCode::UnsupportedCharacter(_) => ErrorKind::UnsupportedCharacter,
            ErrorCode::InvalidRegex(_) => ErrorKind::InvalidRegex,
            ErrorCode::InvalidMetadata | ErrorCode::InvalidMetadataTarget => {
                ErrorKind::InvalidMetadata
            }
            ErrorCode::UnreadableForm => ErrorKind::UnreadableForm,
            ErrorCode::UnquoteOutsideSyntaxQuote | ErrorCode::SpliceOutsideList => {
                ErrorKind::Unquote
            }
            ErrorCode::NestedFn | ErrorCode::InvalidArgLiteral => ErrorKind::FnLiteral,
            ErrorCode::ReadEvalUnknown => ErrorKind::ReadEvalUnknown,
            ErrorCode::EvalDisallowed => ErrorKind::EvalDisallowed,
            ErrorCode::EvalFailed(_) => ErrorKind::EvalFailed,
            ErrorCode::ConditionalReadNotAllowed
            | ErrorCode::InvalidConditional(_)
            | ErrorCode::SpliceAtTopLevel => ErrorKind::ReaderConditional,
            ErrorCode::InvalidNamespacedMap(_) => ErrorKind::NamespacedMap,
            ErrorCode::TrailingCharacters => ErrorKind::TrailingCharacters,
            ErrorCode::RecursionLimitExceeded => ErrorKind::RecursionLimitExceeded,
        }
    }

    /// Returns true if this error was caused by a failure to read bytes on an
    /// IO stream.
    pub fn is_io(&self) -> bool {
        self.classify() == Category::Io
    }

    /// Returns true if this error was caused by input that was not
    /// syntactically valid.
    pub fn is_syntax(&self) -> bool {
        self.classify() == Category::Syntax
    }

    /// Returns true if this error was caused by prematurely reaching the end of
    /// the input data.
    ///
    /// Callers that process streaming input may be interested in retrying the
    /// read once more data is available.
    pub fn is_eof(&self) -> bool {
        self.classify() == Category::Eof
    }

    /// Returns true if read-time evaluation or tag handling was refused or
    /// failed.
    pub fn is_eval(&self) -> bool {
        self.classify() == Category::Eval
    }
}

/// Categorizes the cause of a `lform::reader::Error`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Category {
    /// The error was caused by a failure to read bytes from an input source.
    Io,

    /// The error was caused by input that was not syntactically valid.
    Syntax,

    /// The error was caused by prematurely reaching the end of the input data.
    ///
    /// Callers that process streaming input may be interested in retrying the
    /// read once more data is available.
    Eof,

    /// The error was caused by the read-eval policy, a failing evaluation, or
    /// a failing tag reader.
    Eval,
}

/// What went wrong while reading, as returned by [`Error::kind`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Reading from the input source failed.
    Io,
    /// End of input where a form was expected.
    Eof,
    /// End of input inside a string literal.
    EofInString,
    /// End of input inside a regex literal.
    EofInRegex,
    /// End of input right after the backslash of a character literal.
    EofInCharacter,
    /// End of input before a collection was closed.
    EofInCollection,
    /// A token that looks like a number but is not one.
    InvalidNumber,
    /// A token that is not a valid symbol or keyword.
    InvalidToken,
    /// An auto-resolved keyword with an unknown namespace.
    UnresolvedNamespace,
    /// A map literal with an odd number of forms.
    OddMap,
    /// A duplicate map key or set element.
    Duplicate,
    /// A closing delimiter without a matching opening one.
    UnmatchedDelimiter,
    /// A dispatch character or tag without a reader.
    UnknownDispatch,
    /// An unknown string escape.
    UnsupportedEscape,
    /// A malformed `\u` escape.
    InvalidUnicodeEscape,
    /// A malformed octal escape.
    InvalidOctalEscape,
    /// An unknown character name.
    UnsupportedCharacter,
    /// A regex literal that does not compile.
    InvalidRegex,
    /// Malformed or misplaced metadata.
    InvalidMetadata,
    /// The `#<` form.
    UnreadableForm,
    /// A misplaced unquote or unquote-splicing.
    Unquote,
    /// A malformed anonymous function literal or argument.
    FnLiteral,
    /// The read-eval policy is unknown, so nothing may be read.
    ReadEvalUnknown,
    /// `#=` while read-eval is disallowed.
    EvalDisallowed,
    /// The host failed to evaluate a form or to build a tagged literal.
    EvalFailed,
    /// A disallowed or malformed reader conditional.
    ReaderConditional,
    /// A malformed namespaced map.
    NamespacedMap,
    /// Input left over after the form.
    TrailingCharacters,
    /// Nesting deeper than the recursion limit.
    RecursionLimitExceeded,
}

impl From<Error> for io::Error {
    /// Convert a `lform::reader::Error` into an `io::Error`.
    ///
    /// Syntax and eval errors are turned into `InvalidData` IO errors. EOF
    /// errors are turned into `UnexpectedEof` IO errors.
    ///
    /// ```
    /// use std::io;
    ///
    /// enum MyError {
    ///     Io(io::Error),
    ///     Read(lform::reader::Error),
    /// }
    ///
    /// impl From<lform::reader::Error> for MyError {
    ///     fn from(err: lform::reader::Error) -> MyError {
    ///         use lform::reader::error::Category;
    ///         match err.classify() {
    ///             Category::Io => {
    ///                 MyError::Io(err.into())
    ///             }
    ///             Category::Syntax | Category::Eof | Category::Eval => {
    ///                 MyError::Read(err)
    ///             }
    ///         }
    ///     }
    /// }
    /// ```
    fn from(l: Error) -> Self {
        if let ErrorCode::Io(err) = l.err.code {
            err
        } else {
            match l.classify() {
                Category::Io => unreachable!(),
                Category::Syntax | Category::Eval => io::Error::new(io::ErrorKind::InvalidData, l),
                Category::Eof => io::Error::new(io::ErrorKind::UnexpectedEof, l),
            }
        }
    }
}

impl Error {
    pub(crate) fn syntax(code: ErrorCode, line: usize, column: usize) -> Self {
        Error {
            err: Box::new(ErrorImpl {
                code,
                location: Some(Location { line, column }),
            }),
        }
    }

    pub(crate) fn io(error: io::Error) -> Self {
        Error {
            err: Box::new(ErrorImpl {
                code: ErrorCode::Io(error),
                location: None,
            }),
        }
    }

    #[cfg(test)]
    pub(crate) fn code(&self) -> &ErrorCode {
        &self.err.code
    }
}

struct ErrorImpl {
    code: ErrorCode,
    location: Option<Location>,
}

pub(crate) enum ErrorCode {
    /// Some IO error occurred while reading.
    Io(io::Error),

    /// EOF where a form was expected.
    EofWhileReading,

    /// EOF inside a string literal.
    EofWhileReadingString,

    /// EOF inside a regex literal.
    EofWhileReadingRegex,

    /// EOF right after the backslash of a character literal.
    EofWhileReadingCharacter,

    /// EOF before the closing delimiter of a collection started on `line`.
    EofWhileReadingCollection { line: usize },

    /// A token that matches no number grammar.
    InvalidNumber(String),

    /// A token that is neither a valid symbol nor a valid keyword.
    InvalidToken(String),

    /// A `##` form other than `##Inf`, `##-Inf` or `##NaN`.
    InvalidSymbolicValue(String),

    /// An auto-resolved keyword whose namespace could not be resolved.
    UnresolvedNamespace(String),

    /// A map literal with an odd number of forms.
    OddMapForms,

    /// A map key or set element that occurs twice.
    DuplicateKey(String),

    /// A closing delimiter outside the collection it closes.
    UnmatchedDelimiter(char),

    /// A dispatch character with no reader.
    UnknownDispatchMacro(char),

    /// An unknown escape in a string literal.
    UnsupportedEscape(char),

    /// A malformed `\u` escape.
    InvalidUnicodeEscape(String),

    /// A malformed octal escape.
    InvalidOctalEscape(String),

    /// An unknown character name.
    UnsupportedCharacter(String),

    /// A regex literal that does not compile.
    InvalidRegex(String),

    /// Metadata that is not a symbol, string, keyword or map.
    InvalidMetadata,

    /// Metadata applied to a form that cannot carry it.
    InvalidMetadataTarget,

    /// The `#<` form.
    UnreadableForm,

    /// `~` or `~@` outside a syntax-quote.
    UnquoteOutsideSyntaxQuote,

    /// `~@` not directly inside a collection of a syntax-quote.
    SpliceOutsideList,

    /// `#(` inside `#(`.
    NestedFn,

    /// A `%` argument that is not `%&` or a positive integer.
    InvalidArgLiteral,

    /// The read-eval flag is neither allowed nor disallowed.
    ReadEvalUnknown,

    /// `#=` while read-eval is disallowed.
    EvalDisallowed,

    /// The host failed to evaluate a form or to build a tagged literal.
    EvalFailed(HostError),

    /// A tagged literal without a reader.
    NoReaderForTag(String),

    /// A reader conditional while reader conditionals are disallowed.
    ConditionalReadNotAllowed,

    /// A malformed reader conditional.
    InvalidConditional(&'static str),

    /// `#?@` at the top level.
    SpliceAtTopLevel,

    /// A namespaced map with a malformed prefix or body.
    InvalidNamespacedMap(&'static str),

    /// Input has non-whitespace trailing characters after the form.
    TrailingCharacters,

    /// Nesting deeper than the configured recursion limit.
    RecursionLimitExceeded,
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ErrorCode::Io(ref err) => Display::fmt(err, f),
            ErrorCode::EofWhileReading => f.write_str("EOF while reading"),
            ErrorCode::EofWhileReadingString => f.write_str("EOF while reading string"),
            ErrorCode::EofWhileReadingRegex => f.write_str("EOF while reading regex"),
            ErrorCode::EofWhileReadingCharacter => f.write_str("EOF while reading character"),
            ErrorCode::EofWhileReadingCollection { line } => {
                write!(f, "EOF while reading, starting at line {}", line)
            }
            ErrorCode::InvalidNumber(ref s) => write!(f, "invalid number: {}", s),
            ErrorCode::InvalidToken(ref s) => write!(f, "invalid token: {}", s),
            ErrorCode::InvalidSymbolicValue(ref s) => write!(f, "invalid symbolic value: ##{}", s),
            ErrorCode::UnresolvedNamespace(ref s) => {
                write!(f, "could not resolve namespace of ::{}", s)
            }
            ErrorCode::OddMapForms => f.write_str("map literal must contain an even number of forms"),
            ErrorCode::DuplicateKey(ref s) => write!(f, "duplicate key: {}", s),
            ErrorCode::UnmatchedDelimiter(c) => write!(f, "unmatched delimiter: {}", c),
            ErrorCode::UnknownDispatchMacro(c) => write!(f, "no dispatch macro for: {}", c),
            ErrorCode::UnsupportedEscape(c) => {
                write!(f, "unsupported escape character: \\{}", c)
            }
            ErrorCode::InvalidUnicodeEscape(ref s) => write!(f, "invalid unicode escape: {}", s),
            ErrorCode::InvalidOctalEscape(ref s) => write!(f, "invalid octal escape: {}", s),
            ErrorCode::UnsupportedCharacter(ref s) => {
                write!(f, "unsupported character: \\{}", s)
            }
            ErrorCode::InvalidRegex(ref s) => write!(f, "invalid regex: {}", s),
            ErrorCode::InvalidMetadata => {
                f.write_str("metadata must be a symbol, keyword, string or map")
            }
            ErrorCode::InvalidMetadataTarget => {
                f.write_str("metadata can only be applied to symbols and collections")
            }
            ErrorCode::UnreadableForm => f.write_str("unreadable form"),
            ErrorCode::UnquoteOutsideSyntaxQuote => f.write_str("unquote outside syntax-quote"),
            ErrorCode::SpliceOutsideList => f.write_str("splice not in list"),
            ErrorCode::NestedFn => f.write_str("nested #()s are not allowed"),
            ErrorCode::InvalidArgLiteral => f.write_str("arg literal must be %, %& or %integer"),
            ErrorCode::ReadEvalUnknown => f.write_str("reading disallowed: read-eval is unknown"),
            ErrorCode::EvalDisallowed => f.write_str("EvalReader not allowed when read-eval is false"),
            ErrorCode::EvalFailed(ref err) => write!(f, "read-time evaluation failed: {}", err),
            ErrorCode::NoReaderForTag(ref s) => write!(f, "no reader function for tag {}", s),
            ErrorCode::ConditionalReadNotAllowed => f.write_str("conditional read not allowed"),
            ErrorCode::InvalidConditional(msg) => f.write_str(msg),
            ErrorCode::SpliceAtTopLevel => {
                f.write_str("reader conditional splicing not allowed at the top level")
            }
            ErrorCode::InvalidNamespacedMap(msg) => f.write_str(msg),
            ErrorCode::TrailingCharacters => f.write_str("trailing characters"),
            ErrorCode::RecursionLimitExceeded => f.write_str("recursion limit exceeded"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self.err.code {
            ErrorCode::Io(ref err) => Some(err),
            ErrorCode::EvalFailed(ref err) => Some(&**err),
            _ => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&*self.err, f)
    }
}

impl Display for ErrorImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(loc) = self.location {
            write!(
                f,
                "{} at line {} column {}",
                self.code, loc.line, loc.column
            )
        } else {
            Display::fmt(&self.code, f)
        }
    }
}

// Remove two layers of verbosity from the debug representation. Humans often
// end up seeing this representation because it is what unwrap() shows.
impl Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(loc) = self.err.location {
            write!(
                f,
                "Error({:?}, line: {}, column: {})",
                self.err.code.to_string(),
                loc.line,
                loc.column,
            )
        } else {
            write!(f, "Error({:?})", self.err.code.to_string())
        }
    }
}
