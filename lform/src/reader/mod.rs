//! Reader and options.
//!
//! # Terminology
//!
//! The process of converting source text into forms is referred to as
//! "reading". Characters that trigger special syntax, such as `(` or `'`,
//! are *macro characters*; `#` introduces a second table of *dispatch
//! macros*, such as `#{` for sets or `#_` for discarding a form.
//!
//! Some syntax needs knowledge the reader does not have by itself, such as
//! the current namespace or how to build a tagged literal. The reader asks a
//! [`Host`](crate::host::Host) for these.

use std::collections::{BTreeMap, VecDeque};
use std::io;
use std::str;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use self::error::ErrorCode;
use self::grammar::{is_macro, is_terminating_macro, is_whitespace, match_number, match_symbol};
use self::grammar::SymbolToken;

use crate::host::{DefaultHost, Host};
use crate::syntax::{DEFAULT_FEATURE, PLATFORM_FEATURE};
use crate::{Form, Keyword, Symbol};

pub use self::read::{IoRead, Read, StrRead};

#[doc(inline)]
pub use self::error::{Error, Result};

/// Reader for Clojure source text.
///
/// This type, given an input source, provides the [`read`] method, which
/// reads a single top-level form from the input source.
///
/// [`read`]: struct.Reader.html#method.read
pub struct Reader<R> {
    read: R,
    scratch: String,
    remaining_depth: u16,
    options: Options,
    host: Arc<dyn Host>,
    /// Forms spliced in by `#?@`, handed out before reading further.
    pending: VecDeque<Form>,
    env: Env,
}

/// Reader state that is rebound while reading nested forms.
///
/// Every rebinding restores the previous value when the nested read
/// returns, whether it succeeded or not.
#[derive(Debug, Default)]
struct Env {
    /// Parameters of the enclosing `#(...)`.
    args: Option<ArgEnv>,
    /// Number of enclosing syntax-quotes not cancelled by an unquote.
    syntax_quote_depth: usize,
    /// Set while skipping the unselected branches of a reader conditional.
    suppress_read: bool,
    /// Number of enclosing collection literals.
    collection_depth: usize,
}

/// Parameter symbols of an anonymous function literal.
#[derive(Debug, Default)]
struct ArgEnv {
    positional: BTreeMap<usize, Symbol>,
    rest: Option<Symbol>,
}

/// Result of one step of the reader loop.
enum Outcome {
    Form(Form),
    Eof,
    /// The closing delimiter the caller asked for.
    Delimiter,
}

/// Result of a macro reader.
pub(crate) enum Step {
    Form(Form),
    /// The macro consumed input without producing a form, as comments do.
    Continue,
}

type MacroFn<R> = fn(&mut Reader<R>, char) -> Result<Step>;

/// Various options to influence reader behavior.
#[derive(Debug, Clone)]
pub struct Options {
    eof: Eof,
    features: Vec<Keyword>,
    read_cond: ReadCond,
    read_eval: ReadEval,
    recursion_limit: u16,
}

/// Defines what reading at the end of input produces.
#[derive(Debug, Clone, PartialEq)]
pub enum Eof {
    /// Reading at the end of input is an error.
    Error,
    /// Reading at the end of input yields the given form.
    Value(Form),
}

/// Defines the treatment of reader conditionals, `#?(...)` and `#?@(...)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReadCond {
    /// Select the branch of the first active feature.
    Allow,
    /// Keep the conditional as a [`Form::Conditional`], and tagged literals
    /// as [`Form::Tagged`].
    Preserve,
    /// Reject reader conditionals.
    Disallow,
}

/// Defines whether `#=` may evaluate forms at read time.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReadEval {
    /// Evaluate `#=` forms through the host.
    Allow,
    /// Reject `#=` forms.
    Disallow,
    /// Refuse to read anything at all.
    Unknown,
}

impl Options {
    /// Construct the default set of options.
    pub fn new() -> Self {
        Options {
            eof: Eof::Error,
            features: Vec::new(),
            read_cond: ReadCond::Allow,
            read_eval: ReadEval::Disallow,
            recursion_limit: 256,
        }
    }

    /// Choose what reading at the end of input produces.
    pub fn with_eof(mut self, eof: Eof) -> Self {
        self.eof = eof;
        self
    }

    /// Set the features that reader conditionals select, besides `:clj` and
    /// `:default`.
    pub fn with_features<I>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = Keyword>,
    {
        self.features = features.into_iter().collect();
        self
    }

    /// Add a feature.
    pub fn with_feature(mut self, feature: Keyword) -> Self {
        self.features.push(feature);
        self
    }

    /// Choose how to treat reader conditionals.
    pub fn with_read_cond(mut self, read_cond: ReadCond) -> Self {
        self.read_cond = read_cond;
        self
    }

    /// Choose whether `#=` is evaluated.
    pub fn with_read_eval(mut self, read_eval: ReadEval) -> Self {
        self.read_eval = read_eval;
        self
    }

    /// Set the maximum nesting depth of forms.
    pub fn with_recursion_limit(mut self, limit: u16) -> Self {
        self.recursion_limit = limit;
        self
    }

    /// Query the end of input behavior.
    pub fn eof(&self) -> &Eof {
        &self.eof
    }

    /// Query the configured features.
    pub fn features(&self) -> &[Keyword] {
        &self.features
    }

    /// Query the treatment of reader conditionals.
    pub fn read_cond(&self) -> ReadCond {
        self.read_cond
    }

    /// Query the read-eval policy.
    pub fn read_eval(&self) -> ReadEval {
        self.read_eval
    }

    /// Query the maximum nesting depth.
    pub fn recursion_limit(&self) -> u16 {
        self.recursion_limit
    }

    /// Returns true if a reader conditional selects the branch of `feature`.
    ///
    /// ```
    /// # use lform::Keyword;
    /// # use lform::reader::Options;
    /// let options = Options::new().with_feature(Keyword::new("bb"));
    /// assert!(options.has_feature(&Keyword::new("clj")));
    /// assert!(options.has_feature(&Keyword::new("bb")));
    /// assert!(!options.has_feature(&Keyword::new("cljs")));
    /// ```
    pub fn has_feature(&self, feature: &Keyword) -> bool {
        let builtin = feature.ns().is_none()
            && (feature.name() == DEFAULT_FEATURE || feature.name() == PLATFORM_FEATURE);
        builtin || self.features.contains(feature)
    }
}

impl Default for Options {
    /// Construct a default set of options:
    ///
    /// - Reading at the end of input is an error.
    /// - Reader conditionals are allowed, with no features besides `:clj`.
    /// - `#=` is rejected.
    /// - Forms may nest 256 levels deep.
    fn default() -> Self {
        Options::new()
    }
}

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// A fresh number for generated symbol names, unique within the process.
pub(crate) fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

impl<R> Reader<R>
where
    R: Read,
{
    /// Create a reader from one of the possible input sources.
    ///
    /// Typically it is more convenient to use one of these methods
    /// instead:
    ///
    ///   - `Reader::from_str`
    ///   - `Reader::from_slice`
    ///   - `Reader::from_reader`
    pub fn new(read: R) -> Self {
        Reader::with_options(read, Options::default())
    }

    /// Create a customized reader from one of the possible input sources.
    ///
    /// Typically it is more convenient to use one of these methods
    /// instead:
    ///
    ///   - `Reader::from_str_custom`
    ///   - `Reader::from_slice_custom`
    ///   - `Reader::from_reader_custom`
    pub fn with_options(read: R, options: Options) -> Self {
        Reader {
            read,
            scratch: String::with_capacity(128),
            remaining_depth: options.recursion_limit,
            options,
            host: Arc::new(DefaultHost),
            pending: VecDeque::new(),
            env: Env::default(),
        }
    }

    /// Use `host` for namespace resolution, read-time evaluation and tagged
    /// literals.
    pub fn with_host(mut self, host: Arc<dyn Host>) -> Self {
        self.host = host;
        self
    }

    /// The options this reader was created with.
    pub fn options(&self) -> &Options {
        &self.options
    }
}

impl<R> Reader<IoRead<R>>
where
    R: io::Read,
{
    /// Creates a reader from an `io::Read`.
    pub fn from_reader(reader: R) -> Self {
        Reader::new(IoRead::new(reader))
    }

    /// Creates a reader from an `io::Read`.
    pub fn from_reader_custom(reader: R, options: Options) -> Self {
        Reader::with_options(IoRead::new(reader), options)
    }
}

impl<'a> Reader<StrRead<'a>> {
    /// Creates a reader from a `&str`.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &'a str) -> Self {
        Reader::new(StrRead::new(s))
    }

    /// Creates a reader from a `&str`.
    pub fn from_str_custom(s: &'a str, options: Options) -> Self {
        Reader::with_options(StrRead::new(s), options)
    }

    /// Creates a reader from a `&[u8]`, which must be valid UTF-8.
    pub fn from_slice(bytes: &'a [u8]) -> Result<Self> {
        Reader::from_slice_custom(bytes, Options::default())
    }

    /// Creates a reader from a `&[u8]`, which must be valid UTF-8.
    pub fn from_slice_custom(bytes: &'a [u8], options: Options) -> Result<Self> {
        let s = str::from_utf8(bytes)
            .map_err(|e| Error::io(io::Error::new(io::ErrorKind::InvalidData, e)))?;
        Ok(Reader::from_str_custom(s, options))
    }
}

impl<R: Read> Reader<R> {
    /// Read a single form from the input source.
    ///
    /// If the end of input is encountered, this will return `Ok(None)`,
    /// otherwise, if reading succeeded, `Ok(Some(form))`. Comments and
    /// discarded forms are skipped.
    ///
    /// ```
    /// # use lform::{Form, Reader};
    /// let mut reader = Reader::from_str("foo ; comment\n[1 2] #_skipped :kw");
    /// assert_eq!(reader.read().unwrap(), Some(Form::symbol("foo")));
    /// assert_eq!(reader.read().unwrap(), Some(Form::vector(vec![1, 2])));
    /// assert_eq!(reader.read().unwrap(), Some(Form::keyword("kw")));
    /// assert_eq!(reader.read().unwrap(), None);
    /// ```
    pub fn read(&mut self) -> Result<Option<Form>> {
        self.begin_read()?;
        match self.read_one(None)? {
            Outcome::Form(form) => Ok(Some(form)),
            Outcome::Eof | Outcome::Delimiter => Ok(None),
        }
    }

    /// Read a single form from the input source, applying the configured
    /// end of input behavior.
    ///
    /// ```
    /// # use lform::{Form, Reader};
    /// # use lform::reader::{Eof, Options};
    /// let options = Options::new().with_eof(Eof::Value(Form::keyword("eof")));
    /// let mut reader = Reader::from_str_custom("  ", options);
    /// assert_eq!(reader.read_form().unwrap(), Form::keyword("eof"));
    /// assert!(Reader::from_str("").read_form().unwrap_err().is_eof());
    /// ```
    pub fn read_form(&mut self) -> Result<Form> {
        match self.read()? {
            Some(form) => Ok(form),
            None => match &self.options.eof {
                Eof::Error => Err(self.peek_error(ErrorCode::EofWhileReading)),
                Eof::Value(form) => Ok(form.clone()),
            },
        }
    }

    /// The `Reader::end` method should be called after a form has been fully
    /// read. This allows the `Reader` to validate that the input stream is at
    /// the end or that it only has trailing whitespace and comments.
    pub fn end(&mut self) -> Result<()> {
        match self.read() {
            Ok(None) => Ok(()),
            Err(err) if err.is_io() => Err(err),
            _ => Err(self.error(ErrorCode::TrailingCharacters)),
        }
    }

    /// Read forms up to the closing delimiter `delim`, which is consumed.
    ///
    /// The opening delimiter must already have been consumed. Reaching the end
    /// of input first is an error that reports the line the collection
    /// started on.
    ///
    /// ```
    /// # use lform::{Form, Reader};
    /// let mut reader = Reader::from_str("1 :b \"c\"] tail");
    /// let forms = reader.read_delimited_list(']').unwrap();
    /// assert_eq!(forms, vec![Form::from(1), Form::keyword("b"), Form::from("c")]);
    /// assert_eq!(reader.read().unwrap(), Some(Form::symbol("tail")));
    /// ```
    pub fn read_delimited_list(&mut self, delim: char) -> Result<Vec<Form>> {
        self.begin_read()?;
        self.read_delimited(delim)
    }

    /// Check the read-eval policy and reset the state of a previous read.
    ///
    /// Nothing is consumed when the policy is unknown.
    fn begin_read(&mut self) -> Result<()> {
        if self.options.read_eval == ReadEval::Unknown {
            return Err(self.peek_error(ErrorCode::ReadEvalUnknown));
        }
        self.pending.clear();
        self.env = Env::default();
        self.remaining_depth = self.options.recursion_limit;
        Ok(())
    }

    fn read_delimited(&mut self, delim: char) -> Result<Vec<Form>> {
        let line = self.read.position().line;
        self.env.collection_depth += 1;
        let result = self.read_delimited_forms(delim, line);
        self.env.collection_depth -= 1;
        result
    }

    fn read_delimited_forms(&mut self, delim: char, line: usize) -> Result<Vec<Form>> {
        let mut forms = Vec::new();
        loop {
            match self.read_one(Some(delim))? {
                Outcome::Form(form) => forms.push(form),
                Outcome::Delimiter => return Ok(forms),
                Outcome::Eof => {
                    return Err(self.error(ErrorCode::EofWhileReadingCollection { line }));
                }
            }
        }
    }

    fn peek(&mut self) -> Result<Option<char>> {
        self.read.peek()
    }

    fn eat_char(&mut self) {
        self.read.discard();
    }

    fn next_char(&mut self) -> Result<Option<char>> {
        self.read.next()
    }

    /// Error caused by a character from next_char().
    fn error(&self, reason: ErrorCode) -> Error {
        let pos = self.read.position();
        Error::syntax(reason, pos.line, pos.column)
    }

    /// Error caused by a character from peek().
    fn peek_error(&self, reason: ErrorCode) -> Error {
        let pos = self.read.peek_position();
        Error::syntax(reason, pos.line, pos.column)
    }

    /// Returns the first non-whitespace character without consuming it, or
    /// `None` if EOF is encountered.
    fn parse_whitespace(&mut self) -> Result<Option<char>> {
        loop {
            match self.peek()? {
                Some(ch) if is_whitespace(ch) => self.eat_char(),
                other => return Ok(other),
            }
        }
    }

    fn read_one(&mut self, return_on: Option<char>) -> Result<Outcome> {
        if self.remaining_depth == 0 {
            return Err(self.peek_error(ErrorCode::RecursionLimitExceeded));
        }
        self.remaining_depth -= 1;
        let outcome = self.read_inner(return_on);
        self.remaining_depth += 1;
        outcome
    }

    fn read_inner(&mut self, return_on: Option<char>) -> Result<Outcome> {
        loop {
            if let Some(form) = self.pending.pop_front() {
                return Ok(Outcome::Form(form));
            }
            let ch = match self.parse_whitespace()? {
                Some(ch) => ch,
                None => return Ok(Outcome::Eof),
            };
            self.eat_char();
            if Some(ch) == return_on {
                return Ok(Outcome::Delimiter);
            }
            if ch.is_ascii_digit() {
                return self.read_number(ch).map(Outcome::Form);
            }
            if let Some(f) = Self::macro_fn(ch) {
                match f(self, ch)? {
                    Step::Form(form) => return Ok(Outcome::Form(form)),
                    Step::Continue => continue,
                }
            }
            if ch == '+' || ch == '-' {
                if let Some(next) = self.peek()? {
                    if next.is_ascii_digit() {
                        return self.read_number(ch).map(Outcome::Form);
                    }
                }
            }
            let token = self.read_token(ch)?;
            return self.interpret_token(&token).map(Outcome::Form);
        }
    }

    /// Read a form that must be present.
    fn read_next(&mut self) -> Result<Form> {
        match self.read_one(None)? {
            Outcome::Form(form) => Ok(form),
            Outcome::Eof | Outcome::Delimiter => Err(self.peek_error(ErrorCode::EofWhileReading)),
        }
    }

    /// Read a form with `suppress_read` set, as in unselected branches.
    fn read_suppressed(&mut self, return_on: Option<char>) -> Result<Outcome> {
        let saved = std::mem::replace(&mut self.env.suppress_read, true);
        let outcome = self.read_one(return_on);
        self.env.suppress_read = saved;
        outcome
    }

    /// Accumulate a token starting with `init` up to whitespace or a
    /// terminating macro character.
    fn read_token(&mut self, init: char) -> Result<String> {
        let mut token = String::new();
        token.push(init);
        loop {
            match self.peek()? {
                Some(ch) if !is_whitespace(ch) && !is_terminating_macro(ch) => {
                    self.eat_char();
                    token.push(ch);
                }
                _ => return Ok(token),
            }
        }
    }

    /// Read a number starting with `init`. Unlike symbols, numbers end at any
    /// macro character.
    fn read_number(&mut self, init: char) -> Result<Form> {
        let mut token = String::new();
        token.push(init);
        loop {
            match self.peek()? {
                Some(ch) if !is_whitespace(ch) && !is_macro(ch) => {
                    self.eat_char();
                    token.push(ch);
                }
                _ => break,
            }
        }
        match match_number(&token) {
            Some(n) => Ok(Form::Number(n)),
            None => Err(self.error(ErrorCode::InvalidNumber(token))),
        }
    }

    fn interpret_token(&self, token: &str) -> Result<Form> {
        match token {
            "nil" => return Ok(Form::Nil),
            "true" => return Ok(Form::Bool(true)),
            "false" => return Ok(Form::Bool(false)),
            _ => {}
        }
        match match_symbol(token) {
            Some(SymbolToken::Symbol(sym)) => Ok(Form::Symbol(sym)),
            Some(SymbolToken::Keyword(kw)) => Ok(Form::Keyword(kw)),
            Some(SymbolToken::AutoKeyword { ns, name }) => {
                let resolved = match ns {
                    Some(ns) => self.host.namespace_for(ns),
                    None => Some(self.host.current_ns()),
                };
                match resolved {
                    Some(ns) => Ok(Form::Keyword(Keyword::qualified(ns, name))),
                    None => Err(self.error(ErrorCode::UnresolvedNamespace(token[2..].to_owned()))),
                }
            }
            None => Err(self.error(ErrorCode::InvalidToken(token.to_owned()))),
        }
    }
}

fn from_trait<R>(read: R, options: Options) -> Result<Form>
where
    R: Read,
{
    let mut reader = Reader::with_options(read, options);
    let form = reader.read_form()?;
    reader.end()?;

    Ok(form)
}

/// Read a form from an IO stream containing a single form.
///
/// The content of the IO stream is read directly from the stream without
/// being buffered in memory.
///
/// When reading from a source against which short reads are not efficient,
/// such as a [`File`], you will want to apply your own buffering, e.g. using
/// [`std::io::BufReader`].
///
/// ```
/// use std::error::Error;
/// use std::fs::File;
/// use std::io::BufReader;
/// use std::path::Path;
///
/// fn read_config<P: AsRef<Path>>(path: P) -> Result<lform::Form, Box<dyn Error>> {
///     let file = File::open(path)?;
///     let reader = BufReader::new(file);
///
///     // Select `#?(:bb ...)` branches besides the `:clj` ones.
///     let options = lform::reader::Options::new().with_feature(lform::Keyword::new("bb"));
///     let form = lform::from_reader_custom(reader, options)?;
///
///     Ok(form)
/// }
///
/// fn main() {
/// # }
/// # fn fake_main() {
///     let form = read_config("deps.edn").unwrap();
///     println!("{}", form);
/// }
/// ```
///
/// [`File`]: https://doc.rust-lang.org/std/fs/struct.File.html
pub fn from_reader_custom(rdr: impl io::Read, options: Options) -> Result<Form> {
    from_trait(IoRead::new(rdr), options)
}

/// Read a form from an IO stream containing a single form, using the default
/// reader options.
///
/// See [`from_reader_custom`] for more information.
///
/// [`from_reader_custom`]: fn.from_reader_custom.html
pub fn from_reader(rdr: impl io::Read) -> Result<Form> {
    from_reader_custom(rdr, Options::default())
}

/// Read a form from UTF-8 bytes representing a single form.
///
/// ```
/// let form = lform::from_slice_custom(b"(a [nested] list)", lform::reader::Options::new());
/// println!("{:?}", form);
/// ```
pub fn from_slice_custom(bytes: &[u8], options: Options) -> Result<Form> {
    let s = str::from_utf8(bytes)
        .map_err(|e| Error::io(io::Error::new(io::ErrorKind::InvalidData, e)))?;
    from_str_custom(s, options)
}

/// Read a form from UTF-8 bytes representing a single form, using the default
/// reader options.
///
/// See [`from_slice_custom`] for more information.
///
/// [`from_slice_custom`]: fn.from_slice_custom.html
pub fn from_slice(bytes: &[u8]) -> Result<Form> {
    from_slice_custom(bytes, Options::default())
}

/// Read a form from a string slice representing a single form.
///
/// ```
/// let form = lform::from_str_custom("(a [nested] list)", lform::reader::Options::new());
/// println!("{:?}", form);
/// ```
pub fn from_str_custom(s: &str, options: Options) -> Result<Form> {
    from_trait(StrRead::new(s), options)
}

/// Read a form from a string slice representing a single form, using the
/// default reader options.
///
/// See [`from_str_custom`] for more information.
///
/// [`from_str_custom`]: fn.from_str_custom.html
pub fn from_str(s: &str) -> Result<Form> {
    from_str_custom(s, Options::default())
}

mod dispatch;
pub mod error;
mod grammar;
mod iter;
mod macros;
mod quasi;
mod read;
