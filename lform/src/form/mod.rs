//! The form data model.
//!
//! A [`Form`] is the data structure produced by the reader: the code-as-data
//! representation of one top-level or nested source form.
//!
//! # Terminology
//!
//! - *Metadata* is a map attached to a symbol or collection form. It is
//!   carried alongside the form but does not take part in equality.
//! - *Tagged literal* is a form written as `#tag form`. When the reader has
//!   no handler for a tag, or preserves tags on request, it is represented
//!   as [`Form::Tagged`].
//! - *Reader conditional* is a form written as `#?(...)` or `#?@(...)`. In
//!   preserve mode it is represented as [`Form::Conditional`].

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;
use std::ops;

mod from;
mod index;
mod map;

pub use self::index::Index;
pub use self::map::{Iter, Map, Set};

use crate::{Keyword, Number, Symbol};

/// A compiled regular expression literal, written as `#"..."`.
///
/// Two patterns are equal when their source text is equal.
#[derive(Debug, Clone)]
pub struct Pattern(regex::Regex);

impl Pattern {
    /// Compile `source` as a regular expression.
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        regex::Regex::new(source).map(Pattern)
    }

    /// The source text of the pattern.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The compiled regular expression.
    pub fn regex(&self) -> &regex::Regex {
        &self.0
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Pattern) -> bool {
        self.as_str() == other.as_str()
    }
}

impl From<regex::Regex> for Pattern {
    fn from(re: regex::Regex) -> Self {
        Pattern(re)
    }
}

/// A form read from source text.
///
/// Equality ignores metadata: `^:private foo` compares equal to `foo`. A
/// list and a vector with the same elements are not equal.
#[derive(Debug, Clone)]
pub enum Form {
    /// The `nil` literal.
    Nil,
    /// `true` or `false`.
    Bool(bool),
    /// A numeric literal.
    Number(Number),
    /// A character literal, such as `\a` or `\newline`.
    Char(char),
    /// A string literal.
    String(Box<str>),
    /// A regular expression literal.
    Regex(Pattern),
    /// A symbol.
    Symbol(Symbol),
    /// A keyword.
    Keyword(Keyword),
    /// A list, written with parentheses.
    List(Box<[Form]>),
    /// A vector, written with square brackets.
    Vector(Box<[Form]>),
    /// A map, written with curly braces.
    Map(Map),
    /// A set, written as `#{...}`.
    Set(Set),
    /// A tagged literal that was not handed to a tag reader.
    Tagged(Symbol, Box<Form>),
    /// A reader conditional kept in preserve mode.
    Conditional {
        /// The list of feature/form pairs.
        form: Box<Form>,
        /// True for `#?@`.
        splicing: bool,
    },
    /// A form carrying metadata.
    WithMeta(Box<Form>, Map),
}

impl Form {
    /// Construct a symbol form, splitting off a namespace at the first `/`.
    ///
    /// ```
    /// # use lform::{Form, Symbol};
    /// assert_eq!(Form::symbol("a/b"), Form::Symbol(Symbol::qualified("a", "b")));
    /// ```
    pub fn symbol(name: &str) -> Self {
        Form::Symbol(Symbol::parse(name))
    }

    /// Construct a keyword form from its text without the leading colon.
    pub fn keyword(name: &str) -> Self {
        Form::Keyword(Keyword::parse(name))
    }

    /// Construct a string form.
    pub fn string(s: impl Into<Box<str>>) -> Self {
        Form::String(s.into())
    }

    /// Construct a list from anything yielding forms.
    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Form>,
    {
        Form::List(items.into_iter().map(Into::into).collect())
    }

    /// Construct a vector from anything yielding forms.
    pub fn vector<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Form>,
    {
        Form::Vector(items.into_iter().map(Into::into).collect())
    }

    /// Construct a map from key-value pairs; later keys win over earlier
    /// equal ones.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Form>,
        V: Into<Form>,
    {
        Form::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Construct a set; duplicate elements are dropped.
    pub fn set<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Form>,
    {
        Form::Set(items.into_iter().map(Into::into).collect())
    }

    /// The empty list, `()`.
    pub fn empty_list() -> Self {
        Form::List(Box::new([]))
    }

    /// Look through any metadata wrappers to the underlying form.
    pub fn value(&self) -> &Form {
        let mut form = self;
        while let Form::WithMeta(inner, _) = form {
            form = inner;
        }
        form
    }

    /// Drop any attached metadata.
    pub fn strip_meta(self) -> Form {
        match self {
            Form::WithMeta(inner, _) => inner.strip_meta(),
            form => form,
        }
    }

    /// The metadata attached to this form, if any.
    pub fn meta(&self) -> Option<&Map> {
        match self {
            Form::WithMeta(_, meta) => Some(meta),
            _ => None,
        }
    }

    /// Attach metadata, merging it over any metadata already present.
    ///
    /// An empty map leaves the form unchanged.
    ///
    /// ```
    /// # use lform::{Form, Map};
    /// let mut meta = Map::new();
    /// meta.insert(Form::keyword("private"), Form::Bool(true));
    /// let form = Form::symbol("foo").with_meta(meta);
    /// assert_eq!(form, Form::symbol("foo"));
    /// assert_eq!(form.meta().unwrap().get(&Form::keyword("private")), Some(&Form::Bool(true)));
    /// ```
    pub fn with_meta(self, meta: Map) -> Form {
        match self {
            Form::WithMeta(inner, mut existing) => {
                existing.merge(&meta);
                Form::WithMeta(inner, existing)
            }
            form if meta.is_empty() => form,
            form => Form::WithMeta(Box::new(form), meta),
        }
    }

    /// Returns true if the form may carry metadata.
    pub fn supports_meta(&self) -> bool {
        matches!(
            self.value(),
            Form::Symbol(_) | Form::List(_) | Form::Vector(_) | Form::Map(_) | Form::Set(_)
        )
    }

    /// Returns true for `nil`.
    pub fn is_nil(&self) -> bool {
        matches!(self.value(), Form::Nil)
    }

    /// Returns true for symbols.
    pub fn is_symbol(&self) -> bool {
        matches!(self.value(), Form::Symbol(_))
    }

    /// Returns true for keywords.
    pub fn is_keyword(&self) -> bool {
        matches!(self.value(), Form::Keyword(_))
    }

    /// Returns true for strings.
    pub fn is_string(&self) -> bool {
        matches!(self.value(), Form::String(_))
    }

    /// Returns true for numbers.
    pub fn is_number(&self) -> bool {
        matches!(self.value(), Form::Number(_))
    }

    /// Returns true for lists.
    pub fn is_list(&self) -> bool {
        matches!(self.value(), Form::List(_))
    }

    /// Returns true for vectors.
    pub fn is_vector(&self) -> bool {
        matches!(self.value(), Form::Vector(_))
    }

    /// Returns true for maps.
    pub fn is_map(&self) -> bool {
        matches!(self.value(), Form::Map(_))
    }

    /// Returns true for sets.
    pub fn is_set(&self) -> bool {
        matches!(self.value(), Form::Set(_))
    }

    /// The boolean value, if this is `true` or `false`.
    pub fn as_bool(&self) -> Option<bool> {
        match self.value() {
            Form::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The number, if this is a numeric literal.
    pub fn as_number(&self) -> Option<&Number> {
        match self.value() {
            Form::Number(n) => Some(n),
            _ => None,
        }
    }

    /// The value of an integer literal that fits into `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_number().and_then(Number::as_i64)
    }

    /// The value of a numeric literal, approximated as `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().and_then(Number::as_f64)
    }

    /// The character, if this is a character literal.
    pub fn as_char(&self) -> Option<char> {
        match self.value() {
            Form::Char(c) => Some(*c),
            _ => None,
        }
    }

    /// The text, if this is a string literal.
    pub fn as_str(&self) -> Option<&str> {
        match self.value() {
            Form::String(s) => Some(s),
            _ => None,
        }
    }

    /// The symbol, if this is a symbol.
    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self.value() {
            Form::Symbol(sym) => Some(sym),
            _ => None,
        }
    }

    /// The keyword, if this is a keyword.
    pub fn as_keyword(&self) -> Option<&Keyword> {
        match self.value() {
            Form::Keyword(kw) => Some(kw),
            _ => None,
        }
    }

    /// The name of a symbol or keyword, without its namespace.
    pub fn as_name(&self) -> Option<&str> {
        match self.value() {
            Form::Symbol(sym) => Some(sym.name()),
            Form::Keyword(kw) => Some(kw.name()),
            _ => None,
        }
    }

    /// The elements of a list.
    pub fn as_list(&self) -> Option<&[Form]> {
        match self.value() {
            Form::List(items) => Some(items),
            _ => None,
        }
    }

    /// The elements of a vector.
    pub fn as_vector(&self) -> Option<&[Form]> {
        match self.value() {
            Form::Vector(items) => Some(items),
            _ => None,
        }
    }

    /// The elements of a list or a vector.
    pub fn as_seq(&self) -> Option<&[Form]> {
        match self.value() {
            Form::List(items) | Form::Vector(items) => Some(items),
            _ => None,
        }
    }

    /// The map, if this is a map literal.
    pub fn as_map(&self) -> Option<&Map> {
        match self.value() {
            Form::Map(map) => Some(map),
            _ => None,
        }
    }

    /// The set, if this is a set literal.
    pub fn as_set(&self) -> Option<&Set> {
        match self.value() {
            Form::Set(set) => Some(set),
            _ => None,
        }
    }

    /// Index into a list, vector or map.
    ///
    /// Returns `None` if the index does not apply to this kind of form or is
    /// out of range.
    ///
    /// ```
    /// # use lform::Form;
    /// let form = lform::from_str("{:a [1 2 3]}").unwrap();
    /// assert_eq!(form.get("a").and_then(|v| v.get(1)), Some(&Form::from(2)));
    /// assert_eq!(form.get("b"), None);
    /// ```
    pub fn get<I: Index>(&self, index: I) -> Option<&Form> {
        index.index_into(self)
    }
}

impl PartialEq for Form {
    fn eq(&self, other: &Form) -> bool {
        use Form::*;
        match (self.value(), other.value()) {
            (Nil, Nil) => true,
            (Bool(a), Bool(b)) => a == b,
            (Number(a), Number(b)) => a == b,
            (Char(a), Char(b)) => a == b,
            (String(a), String(b)) => a == b,
            (Regex(a), Regex(b)) => a == b,
            (Symbol(a), Symbol(b)) => a == b,
            (Keyword(a), Keyword(b)) => a == b,
            (List(a), List(b)) => a == b,
            (Vector(a), Vector(b)) => a == b,
            (Map(a), Map(b)) => a == b,
            (Set(a), Set(b)) => a == b,
            (Tagged(t1, f1), Tagged(t2, f2)) => t1 == t2 && f1 == f2,
            (
                Conditional {
                    form: f1,
                    splicing: s1,
                },
                Conditional {
                    form: f2,
                    splicing: s2,
                },
            ) => s1 == s2 && f1 == f2,
            _ => false,
        }
    }
}

/// Hashing agrees with equality: metadata is skipped, and map entries and set
/// elements are combined independently of their order.
impl Hash for Form {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let form = self.value();
        mem::discriminant(form).hash(state);
        match form {
            Form::Nil | Form::WithMeta(..) => {}
            Form::Bool(b) => b.hash(state),
            Form::Number(n) => n.hash(state),
            Form::Char(c) => c.hash(state),
            Form::String(s) => s.hash(state),
            Form::Regex(p) => p.as_str().hash(state),
            Form::Symbol(sym) => sym.hash(state),
            Form::Keyword(kw) => kw.hash(state),
            Form::List(items) | Form::Vector(items) => items.hash(state),
            Form::Map(map) => {
                map.len().hash(state);
                unordered_hash(map.iter()).hash(state);
            }
            Form::Set(set) => {
                set.len().hash(state);
                unordered_hash(set.iter()).hash(state);
            }
            Form::Tagged(tag, form) => {
                tag.hash(state);
                form.hash(state);
            }
            Form::Conditional { form, splicing } => {
                splicing.hash(state);
                form.hash(state);
            }
        }
    }
}

fn unordered_hash<T: Hash>(items: impl Iterator<Item = T>) -> u64 {
    items.fold(0u64, |acc, item| {
        let mut hasher = DefaultHasher::new();
        item.hash(&mut hasher);
        acc.wrapping_add(hasher.finish())
    })
}

impl fmt::Display for Form {
    /// Print the form in reader syntax, without metadata.
    ///
    /// ```
    /// # use lform::Form;
    /// let form = Form::list(vec![Form::symbol("inc"), Form::from(1)]);
    /// assert_eq!(form.to_string(), "(inc 1)");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = crate::print::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

// Indexing never panics; a missing entry yields `nil`, as with the
// `get` method.
impl<I> ops::Index<I> for Form
where
    I: Index,
{
    type Output = Form;

    /// Index into a form using the syntax `form[0]` or `form["k"]`.
    ///
    /// Returns `nil` when the index does not apply or is not present.
    ///
    /// ```
    /// # use lform::Form;
    /// let form = lform::from_str("{:name \"lform\" :tags [:reader]}").unwrap();
    /// assert_eq!(form["name"], Form::from("lform"));
    /// assert_eq!(form["tags"][0], Form::keyword("reader"));
    /// assert_eq!(form["missing"], Form::Nil);
    /// ```
    fn index(&self, index: I) -> &Form {
        static NIL: Form = Form::Nil;
        index.index_into(self).unwrap_or(&NIL)
    }
}
