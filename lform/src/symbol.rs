//! Symbols and keywords.

use std::fmt::{self, Display};

/// A name, optionally qualified by a namespace.
///
/// Symbols are plain values: two symbols are equal when their namespace and
/// name are equal.
///
/// ```
/// # use lform::Symbol;
/// let sym = Symbol::parse("clojure.core/map");
/// assert_eq!(sym.ns(), Some("clojure.core"));
/// assert_eq!(sym.name(), "map");
/// assert_eq!(sym.to_string(), "clojure.core/map");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol {
    ns: Option<Box<str>>,
    name: Box<str>,
}

impl Symbol {
    /// Construct an unqualified symbol.
    ///
    /// The name is taken verbatim; use [`Symbol::parse`] to split off a
    /// namespace.
    pub fn new(name: impl Into<Box<str>>) -> Self {
        Symbol {
            ns: None,
            name: name.into(),
        }
    }

    /// Construct a symbol qualified by the namespace `ns`.
    pub fn qualified(ns: impl Into<Box<str>>, name: impl Into<Box<str>>) -> Self {
        Symbol {
            ns: Some(ns.into()),
            name: name.into(),
        }
    }

    /// Construct a symbol from an optional namespace and a name.
    pub fn with_ns(ns: Option<&str>, name: &str) -> Self {
        Symbol {
            ns: ns.map(Into::into),
            name: name.into(),
        }
    }

    /// Split `text` into namespace and name at the first `/`.
    ///
    /// The lone symbol `/` is unqualified.
    pub fn parse(text: &str) -> Self {
        match text.find('/') {
            Some(i) if text != "/" => Symbol::qualified(&text[..i], &text[i + 1..]),
            _ => Symbol::new(text),
        }
    }

    /// The namespace part, if the symbol is qualified.
    pub fn ns(&self) -> Option<&str> {
        self.ns.as_deref()
    }

    /// The name part.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if the symbol carries a namespace.
    pub fn is_qualified(&self) -> bool {
        self.ns.is_some()
    }

    /// The same name without a namespace.
    pub fn without_ns(&self) -> Symbol {
        Symbol::new(self.name.clone())
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ns) = &self.ns {
            f.write_str(ns)?;
            f.write_str("/")?;
        }
        f.write_str(&self.name)
    }
}

impl From<&str> for Symbol {
    fn from(text: &str) -> Self {
        Symbol::parse(text)
    }
}

/// A keyword, i.e. a symbol written with a leading colon.
///
/// ```
/// # use lform::Keyword;
/// let kw = Keyword::parse("user/id");
/// assert_eq!(kw.ns(), Some("user"));
/// assert_eq!(kw.to_string(), ":user/id");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Keyword(Symbol);

impl Keyword {
    /// Construct an unqualified keyword.
    pub fn new(name: impl Into<Box<str>>) -> Self {
        Keyword(Symbol::new(name))
    }

    /// Construct a keyword qualified by the namespace `ns`.
    pub fn qualified(ns: impl Into<Box<str>>, name: impl Into<Box<str>>) -> Self {
        Keyword(Symbol::qualified(ns, name))
    }

    /// Split `text`, given without the leading colon, like [`Symbol::parse`].
    pub fn parse(text: &str) -> Self {
        Keyword(Symbol::parse(text))
    }

    /// The namespace part, if the keyword is qualified.
    pub fn ns(&self) -> Option<&str> {
        self.0.ns()
    }

    /// The name part.
    pub fn name(&self) -> &str {
        self.0.name()
    }

    /// The symbol this keyword wraps.
    pub fn symbol(&self) -> &Symbol {
        &self.0
    }

    /// Unwrap into the underlying symbol.
    pub fn into_symbol(self) -> Symbol {
        self.0
    }
}

impl From<Symbol> for Keyword {
    fn from(sym: Symbol) -> Self {
        Keyword(sym)
    }
}

impl Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(":")?;
        Display::fmt(&self.0, f)
    }
}
