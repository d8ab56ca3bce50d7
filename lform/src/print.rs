//! Converting forms into text.
//!
//! # Terminology
//!
//! The process of serializing forms to their textual representation is
//! referred to as "printing", as with Clojure's `pr`. Printed text reads
//! back as an equal form, with the exception of metadata, which is only
//! printed on request.

use std::io;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use crate::form::Pattern;
use crate::number::{self, Number};
use crate::syntax::char_name;
use crate::{Form, Keyword, Map, Symbol};

/// Options for printing forms.
#[derive(Clone, Debug)]
pub struct Options {
    meta: bool,
    map_commas: bool,
}

impl Options {
    /// Construct the default printer options: metadata is omitted, and map
    /// entries are separated by commas.
    pub fn new() -> Self {
        Options {
            meta: false,
            map_commas: true,
        }
    }

    /// Choose whether metadata is printed, as in `^{:private true} foo`.
    pub fn with_meta(mut self, meta: bool) -> Self {
        self.meta = meta;
        self
    }

    /// Choose whether map entries are separated by `, ` rather than a
    /// single space.
    pub fn with_map_commas(mut self, map_commas: bool) -> Self {
        self.map_commas = map_commas;
        self
    }
}

impl Default for Options {
    fn default() -> Self {
        Options::new()
    }
}

/// Represents a character escape code in a type-safe manner.
pub enum CharEscape {
    /// An escaped quote `"`
    Quote,
    /// An escaped reverse solidus `\`
    ReverseSolidus,
    /// An escaped backspace character (usually escaped as `\b`)
    Backspace,
    /// An escaped form feed character (usually escaped as `\f`)
    FormFeed,
    /// An escaped line feed character (usually escaped as `\n`)
    LineFeed,
    /// An escaped carriage return character (usually escaped as `\r`)
    CarriageReturn,
    /// An escaped tab character (usually escaped as `\t`)
    Tab,
    /// An escaped ASCII plane control character (usually escaped as
    /// `\u00XX` where `XX` are two hex characters)
    AsciiControl(u8),
}

impl CharEscape {
    #[inline]
    fn from_escape_table(escape: u8, byte: u8) -> CharEscape {
        match escape {
            self::BB => CharEscape::Backspace,
            self::FF => CharEscape::FormFeed,
            self::TT => CharEscape::Tab,
            self::NN => CharEscape::LineFeed,
            self::RR => CharEscape::CarriageReturn,
            self::QU => CharEscape::Quote,
            self::BS => CharEscape::ReverseSolidus,
            _ => CharEscape::AsciiControl(byte),
        }
    }
}

/// This trait abstracts away serializing the pieces of a form, which allows
/// the implementer to customize the output, for instance to pretty print it.
///
/// The default implementation produces compact Clojure text on a single
/// line.
pub trait Formatter {
    /// Returns true if metadata should be printed.
    #[inline]
    fn prints_meta(&self) -> bool {
        false
    }

    /// Writes `nil` to the specified writer.
    #[inline]
    fn write_nil<W: ?Sized>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: io::Write,
    {
        writer.write_all(b"nil")
    }

    /// Writes `true` or `false` to the specified writer.
    #[inline]
    fn write_bool<W: ?Sized>(&mut self, writer: &mut W, value: bool) -> io::Result<()>
    where
        W: io::Write,
    {
        writer.write_all(if value { b"true" } else { b"false" })
    }

    /// Writes a number to the specified writer.
    ///
    /// Arbitrary precision numbers carry their `N` or `M` suffix, and
    /// floating point numbers always contain a `.` or an exponent, so that
    /// the text reads back as the same kind of number.
    fn write_number<W: ?Sized>(&mut self, writer: &mut W, value: &Number) -> io::Result<()>
    where
        W: io::Write,
    {
        struct Write<'a, W: io::Write + ?Sized> {
            writer: &'a mut W,
        }
        impl<'a, W: io::Write + ?Sized> number::Visitor for Write<'a, W> {
            type Value = ();
            type Error = io::Error;

            fn visit_i64(self, n: i64) -> io::Result<()> {
                let mut buffer = itoa::Buffer::new();
                self.writer.write_all(buffer.format(n).as_bytes())
            }
            fn visit_bigint(self, n: &BigInt) -> io::Result<()> {
                write!(self.writer, "{}N", n)
            }
            fn visit_f64(self, n: f64) -> io::Result<()> {
                if n.is_nan() {
                    self.writer.write_all(b"##NaN")
                } else if n.is_infinite() {
                    self.writer
                        .write_all(if n > 0.0 { b"##Inf" } else { b"##-Inf" })
                } else {
                    let mut buffer = ryu::Buffer::new();
                    self.writer.write_all(buffer.format_finite(n).as_bytes())
                }
            }
            fn visit_decimal(self, d: &BigDecimal) -> io::Result<()> {
                write!(self.writer, "{}M", d)
            }
            fn visit_ratio(self, numerator: &BigInt, denominator: &BigInt) -> io::Result<()> {
                write!(self.writer, "{}/{}", numerator, denominator)
            }
        }
        value.visit(Write { writer })
    }

    /// Writes a character literal to the specified writer.
    ///
    /// Named characters use their name, as in `\newline`. Other whitespace
    /// and control characters use the `\uXXXX` notation.
    fn write_char<W: ?Sized>(&mut self, writer: &mut W, c: char) -> io::Result<()>
    where
        W: io::Write,
    {
        if let Some(name) = char_name(c) {
            return write!(writer, "\\{}", name);
        }
        let n = u32::from(c);
        if (c.is_control() || c.is_whitespace()) && n <= 0xFFFF {
            write!(writer, "\\u{:04x}", n)
        } else {
            write!(writer, "\\{}", c)
        }
    }

    /// Called before each series of `write_string_fragment` and
    /// `write_char_escape`.  Writes a `"` to the specified writer.
    #[inline]
    fn begin_string<W: ?Sized>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: io::Write,
    {
        writer.write_all(b"\"")
    }

    /// Called after each series of `write_string_fragment` and
    /// `write_char_escape`.  Writes a `"` to the specified writer.
    #[inline]
    fn end_string<W: ?Sized>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: io::Write,
    {
        writer.write_all(b"\"")
    }

    /// Writes a string fragment that doesn't need any escaping to the specified
    /// writer.
    #[inline]
    fn write_string_fragment<W: ?Sized>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: io::Write,
    {
        writer.write_all(fragment.as_bytes())
    }

    /// Writes a character escape code to the specified writer.
    #[inline]
    fn write_char_escape<W: ?Sized>(
        &mut self,
        writer: &mut W,
        char_escape: CharEscape,
    ) -> io::Result<()>
    where
        W: io::Write,
    {
        use self::CharEscape::*;

        let s = match char_escape {
            Quote => b"\\\"",
            ReverseSolidus => b"\\\\",
            Backspace => b"\\b",
            FormFeed => b"\\f",
            LineFeed => b"\\n",
            CarriageReturn => b"\\r",
            Tab => b"\\t",
            AsciiControl(byte) => {
                static HEX_DIGITS: [u8; 16] = *b"0123456789abcdef";
                let bytes = &[
                    b'\\',
                    b'u',
                    b'0',
                    b'0',
                    HEX_DIGITS[(byte >> 4) as usize],
                    HEX_DIGITS[(byte & 0xF) as usize],
                ];
                return writer.write_all(bytes);
            }
        };

        writer.write_all(s)
    }

    /// Writes a regular expression literal, `#"..."`, to the specified
    /// writer.
    ///
    /// Backslash escapes in the pattern are written as they are; only a
    /// bare `"` needs escaping.
    fn write_regex<W: ?Sized>(&mut self, writer: &mut W, pattern: &Pattern) -> io::Result<()>
    where
        W: io::Write,
    {
        writer.write_all(b"#\"")?;
        let mut escaped = false;
        for c in pattern.as_str().chars() {
            if c == '"' && !escaped {
                writer.write_all(b"\\")?;
            }
            escaped = c == '\\' && !escaped;
            let mut buf = [0; 4];
            writer.write_all(c.encode_utf8(&mut buf).as_bytes())?;
        }
        writer.write_all(b"\"")
    }

    /// Writes a symbol to the specified writer.
    #[inline]
    fn write_symbol<W: ?Sized>(&mut self, writer: &mut W, symbol: &Symbol) -> io::Result<()>
    where
        W: io::Write,
    {
        if let Some(ns) = symbol.ns() {
            writer.write_all(ns.as_bytes())?;
            writer.write_all(b"/")?;
        }
        writer.write_all(symbol.name().as_bytes())
    }

    /// Writes a keyword to the specified writer.
    #[inline]
    fn write_keyword<W: ?Sized>(&mut self, writer: &mut W, keyword: &Keyword) -> io::Result<()>
    where
        W: io::Write,
    {
        writer.write_all(b":")?;
        self.write_symbol(writer, keyword.symbol())
    }

    /// Called before any list elements.  Writes a `(` to the specified
    /// writer.
    #[inline]
    fn begin_list<W: ?Sized>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: io::Write,
    {
        writer.write_all(b"(")
    }

    /// Called after all list elements have been written.  Writes a `)` to the
    /// specified writer.
    #[inline]
    fn end_list<W: ?Sized>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: io::Write,
    {
        writer.write_all(b")")
    }

    /// Called before any vector elements.  Writes a `[` to the specified
    /// writer.
    #[inline]
    fn begin_vector<W: ?Sized>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: io::Write,
    {
        writer.write_all(b"[")
    }

    /// Called after all vector elements have been written.  Writes a `]` to
    /// the specified writer.
    #[inline]
    fn end_vector<W: ?Sized>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: io::Write,
    {
        writer.write_all(b"]")
    }

    /// Called before any set elements.  Writes a `#{` to the specified
    /// writer.
    #[inline]
    fn begin_set<W: ?Sized>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: io::Write,
    {
        writer.write_all(b"#{")
    }

    /// Called after all set elements have been written.  Writes a `}` to the
    /// specified writer.
    #[inline]
    fn end_set<W: ?Sized>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: io::Write,
    {
        writer.write_all(b"}")
    }

    /// Called before starting to write a list, vector or set element.
    /// Writes a space to the specified writer, if needed.
    #[inline]
    fn begin_seq_element<W: ?Sized>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b" ")
        }
    }

    /// Called before any map entries.  Writes a `{` to the specified writer.
    #[inline]
    fn begin_map<W: ?Sized>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: io::Write,
    {
        writer.write_all(b"{")
    }

    /// Called after all map entries have been written.  Writes a `}` to the
    /// specified writer.
    #[inline]
    fn end_map<W: ?Sized>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: io::Write,
    {
        writer.write_all(b"}")
    }

    /// Called before every map key.  Writes `, ` to the specified writer,
    /// unless this is the first entry.
    #[inline]
    fn begin_map_key<W: ?Sized>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    /// Called between a map key and its value.  Writes a space to the
    /// specified writer.
    #[inline]
    fn begin_map_value<W: ?Sized>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: io::Write,
    {
        writer.write_all(b" ")
    }

    /// Writes the tag of a tagged literal, followed by a space.
    #[inline]
    fn write_tag<W: ?Sized>(&mut self, writer: &mut W, tag: &Symbol) -> io::Result<()>
    where
        W: io::Write,
    {
        writer.write_all(b"#")?;
        self.write_symbol(writer, tag)?;
        writer.write_all(b" ")
    }

    /// Writes the prefix of a preserved reader conditional, `#?` or `#?@`.
    #[inline]
    fn begin_conditional<W: ?Sized>(&mut self, writer: &mut W, splicing: bool) -> io::Result<()>
    where
        W: io::Write,
    {
        writer.write_all(if splicing { b"#?@" } else { b"#?" })
    }

    /// Called before writing the metadata map of a form.  Writes a `^` to
    /// the specified writer.
    #[inline]
    fn begin_meta<W: ?Sized>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: io::Write,
    {
        writer.write_all(b"^")
    }

    /// Called between the metadata map and the form it is attached to.
    #[inline]
    fn end_meta<W: ?Sized>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: io::Write,
    {
        writer.write_all(b" ")
    }
}

/// This structure compacts a form on a single line, omitting metadata.
#[derive(Clone, Debug)]
pub struct DefaultFormatter;

impl Formatter for DefaultFormatter {}

/// A formatter which can be tuned through [`Options`].
#[derive(Clone, Debug)]
pub struct CustomizedFormatter {
    options: Options,
}

impl Formatter for CustomizedFormatter {
    fn prints_meta(&self) -> bool {
        self.options.meta
    }

    fn begin_map_key<W: ?Sized>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: io::Write,
    {
        match (first, self.options.map_commas) {
            (true, _) => Ok(()),
            (false, true) => writer.write_all(b", "),
            (false, false) => writer.write_all(b" "),
        }
    }
}

/// A printer for forms.
#[derive(Debug)]
pub struct Printer<W, F = DefaultFormatter> {
    writer: W,
    formatter: F,
}

impl<W> Printer<W, CustomizedFormatter>
where
    W: io::Write,
{
    /// Construct a printer tuned given the specified options.
    pub fn with_options(writer: W, options: Options) -> Self {
        Printer {
            writer,
            formatter: CustomizedFormatter { options },
        }
    }
}

impl<W, F> Printer<W, F>
where
    W: io::Write,
    F: Formatter,
{
    /// Creates a new printer whose output will be written to the writer
    /// specified.
    #[inline]
    pub fn with_formatter(writer: W, formatter: F) -> Self {
        Printer { writer, formatter }
    }

    /// Unwrap the `Writer` from the `Printer`.
    #[inline]
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Output the representation of the specified form to the underlying
    /// writer.
    pub fn print(&mut self, form: &Form) -> io::Result<()> {
        match form {
            Form::Nil => self.formatter.write_nil(&mut self.writer),
            Form::Bool(b) => self.formatter.write_bool(&mut self.writer, *b),
            Form::Number(n) => self.formatter.write_number(&mut self.writer, n),
            Form::Char(c) => self.formatter.write_char(&mut self.writer, *c),
            Form::String(s) => format_escaped_str(&mut self.writer, &mut self.formatter, s),
            Form::Regex(pattern) => self.formatter.write_regex(&mut self.writer, pattern),
            Form::Symbol(sym) => self.formatter.write_symbol(&mut self.writer, sym),
            Form::Keyword(kw) => self.formatter.write_keyword(&mut self.writer, kw),
            Form::List(items) => {
                self.formatter.begin_list(&mut self.writer)?;
                self.print_seq(items.iter())?;
                self.formatter.end_list(&mut self.writer)
            }
            Form::Vector(items) => {
                self.formatter.begin_vector(&mut self.writer)?;
                self.print_seq(items.iter())?;
                self.formatter.end_vector(&mut self.writer)
            }
            Form::Set(set) => {
                self.formatter.begin_set(&mut self.writer)?;
                self.print_seq(set.iter())?;
                self.formatter.end_set(&mut self.writer)
            }
            Form::Map(map) => self.print_map(map),
            Form::Tagged(tag, inner) => {
                self.formatter.write_tag(&mut self.writer, tag)?;
                self.print(inner)
            }
            Form::Conditional { form, splicing } => {
                self.formatter
                    .begin_conditional(&mut self.writer, *splicing)?;
                self.print(form.value())
            }
            Form::WithMeta(inner, meta) => {
                if self.formatter.prints_meta() {
                    self.formatter.begin_meta(&mut self.writer)?;
                    self.print_map(meta)?;
                    self.formatter.end_meta(&mut self.writer)?;
                }
                self.print(inner)
            }
        }
    }

    fn print_seq<'a, I>(&mut self, items: I) -> io::Result<()>
    where
        I: IntoIterator<Item = &'a Form>,
    {
        for (i, item) in items.into_iter().enumerate() {
            self.formatter.begin_seq_element(&mut self.writer, i == 0)?;
            self.print(item)?;
        }
        Ok(())
    }

    fn print_map(&mut self, map: &Map) -> io::Result<()> {
        self.formatter.begin_map(&mut self.writer)?;
        for (i, (key, value)) in map.iter().enumerate() {
            self.formatter.begin_map_key(&mut self.writer, i == 0)?;
            self.print(key)?;
            self.formatter.begin_map_value(&mut self.writer)?;
            self.print(value)?;
        }
        self.formatter.end_map(&mut self.writer)
    }
}

impl<W> Printer<W>
where
    W: io::Write,
{
    /// Creates a new printer.
    #[inline]
    pub fn new(writer: W) -> Self {
        Printer::with_formatter(writer, DefaultFormatter)
    }
}

impl<W, F> io::Write for Printer<W, F>
where
    W: io::Write,
{
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

fn format_escaped_str<W: ?Sized, F: ?Sized>(
    writer: &mut W,
    formatter: &mut F,
    value: &str,
) -> io::Result<()>
where
    W: io::Write,
    F: Formatter,
{
    formatter.begin_string(writer)?;
    let bytes = value.as_bytes();
    let mut start = 0;

    for (i, &byte) in bytes.iter().enumerate() {
        let escape = ESCAPE[byte as usize];
        if escape == 0 {
            continue;
        }
        if start < i {
            formatter.write_string_fragment(writer, &value[start..i])?;
        }
        formatter.write_char_escape(writer, CharEscape::from_escape_table(escape, byte))?;
        start = i + 1;
    }

    if start != bytes.len() {
        formatter.write_string_fragment(writer, &value[start..])?;
    }
    formatter.end_string(writer)
}

const BB: u8 = b'b'; // \x08
const TT: u8 = b't'; // \x09
const NN: u8 = b'n'; // \x0A
const FF: u8 = b'f'; // \x0C
const RR: u8 = b'r'; // \x0D
const QU: u8 = b'"'; // \x22
const BS: u8 = b'\\'; // \x5C
const UU: u8 = b'u'; // \x00...\x1F except the ones above, and \x7F
const __: u8 = 0;

// Lookup table of escape sequences. A value of b'x' at index i means that byte
// i is escaped as "\x". A value of 0 means that byte i is not escaped.
static ESCAPE: [u8; 256] = [
    //   1   2   3   4   5   6   7   8   9   A   B   C   D   E   F
    UU, UU, UU, UU, UU, UU, UU, UU, BB, TT, NN, UU, FF, RR, UU, UU, // 0
    UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, // 1
    __, __, QU, __, __, __, __, __, __, __, __, __, __, __, __, __, // 2
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 3
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 4
    __, __, __, __, __, __, __, __, __, __, __, __, BS, __, __, __, // 5
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 6
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, UU, // 7
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 8
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 9
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // A
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // B
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // C
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // D
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // E
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // F
];

/// Print the given form as Clojure text into the IO stream, using the
/// default printer options.
#[inline]
pub fn to_writer<W: io::Write>(writer: W, form: &Form) -> io::Result<()> {
    let mut printer = Printer::new(writer);
    printer.print(form)?;
    Ok(())
}

/// Print the given form as Clojure text into the IO stream.
#[inline]
pub fn to_writer_custom<W: io::Write>(writer: W, form: &Form, options: Options) -> io::Result<()> {
    let mut printer = Printer::with_options(writer, options);
    printer.print(form)?;
    Ok(())
}

/// Print the given form into a byte vector, using the default printer
/// options.
#[inline]
pub fn to_vec(form: &Form) -> io::Result<Vec<u8>> {
    let mut writer = Vec::with_capacity(128);
    to_writer(&mut writer, form)?;
    Ok(writer)
}

/// Print the given form into a byte vector.
#[inline]
pub fn to_vec_custom(form: &Form, options: Options) -> io::Result<Vec<u8>> {
    let mut writer = Vec::with_capacity(128);
    to_writer_custom(&mut writer, form, options)?;
    Ok(writer)
}

/// Print the given form as a string, using the default printer options.
///
/// ```
/// # use lform::Form;
/// let form = lform::from_str(r#"{:name "lform", :tags #{reader}}"#).unwrap();
/// assert_eq!(lform::print::to_string(&form).unwrap(), r#"{:name "lform", :tags #{reader}}"#);
/// ```
#[inline]
pub fn to_string(form: &Form) -> io::Result<String> {
    into_string(to_vec(form)?)
}

/// Print the given form as a string.
///
/// ```
/// use lform::print::{self, Options};
///
/// let form = lform::from_str("^:private (defn f [x] {:a x :b 2})").unwrap();
/// let text = print::to_string_custom(&form, Options::new().with_map_commas(false)).unwrap();
/// assert_eq!(text, "(defn f [x] {:a x :b 2})");
/// ```
#[inline]
pub fn to_string_custom(form: &Form, options: Options) -> io::Result<String> {
    into_string(to_vec_custom(form, options)?)
}

fn into_string(vec: Vec<u8>) -> io::Result<String> {
    String::from_utf8(vec).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests;
