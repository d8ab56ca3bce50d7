//! Declarations shared between printer and reader.

use crate::{Form, Keyword, Symbol};

/// Namespace of the helper functions that reader expansions refer to.
pub const CORE_NS: &str = "clojure.core";

/// Feature that is always active in reader conditionals.
pub const DEFAULT_FEATURE: &str = "default";

/// Platform feature of this reader.
pub const PLATFORM_FEATURE: &str = "clj";

/// Names of characters written out in character literals.
const CHAR_NAMES: &[(&str, char)] = &[
    ("newline", '\n'),
    ("space", ' '),
    ("tab", '\t'),
    ("backspace", '\x08'),
    ("formfeed", '\x0c'),
    ("return", '\r'),
];

/// Look up a character by its name, as in `\newline`.
pub fn char_by_name(name: &str) -> Option<char> {
    CHAR_NAMES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, c)| *c)
}

/// The name of a character, if it has one.
pub fn char_name(c: char) -> Option<&'static str> {
    CHAR_NAMES.iter().find(|(_, x)| *x == c).map(|(n, _)| *n)
}

// Symbols that syntax-quote leaves unqualified, besides `clojure.core/import*`.
const SPECIAL_FORMS: &[&str] = &[
    "def",
    "loop*",
    "recur",
    "if",
    "case*",
    "let*",
    "letfn*",
    "do",
    "fn*",
    "quote",
    "var",
    ".",
    "set!",
    "deftype*",
    "reify*",
    "try",
    "throw",
    "monitor-enter",
    "monitor-exit",
    "catch",
    "finally",
    "new",
    "&",
];

/// Returns true if `sym` names a special form.
pub fn is_special(sym: &Symbol) -> bool {
    match sym.ns() {
        None => SPECIAL_FORMS.contains(&sym.name()),
        Some(CORE_NS) => sym.name() == "import*",
        Some(_) => false,
    }
}

/// Feature names that may not appear in a reader conditional.
pub fn is_reserved_feature(kw: &Keyword) -> bool {
    kw.ns().is_none() && matches!(kw.name(), "else" | "none")
}

/// A symbol in `clojure.core`.
pub fn core(name: &str) -> Symbol {
    Symbol::qualified(CORE_NS, name)
}

/// A list with the `clojure.core` symbol `name` in head position.
pub(crate) fn core_call<I>(name: &str, args: I) -> Form
where
    I: IntoIterator<Item = Form>,
{
    Form::List(
        std::iter::once(Form::Symbol(core(name)))
            .chain(args)
            .collect(),
    )
}

/// A list of the unqualified symbol `head` followed by `args`.
pub(crate) fn call<I>(head: &str, args: I) -> Form
where
    I: IntoIterator<Item = Form>,
{
    Form::List(
        std::iter::once(Form::Symbol(Symbol::new(head)))
            .chain(args)
            .collect(),
    )
}

/// Returns true if `form` is a list headed by the `clojure.core` symbol
/// `name`.
pub(crate) fn is_core_call(form: &Form, name: &str) -> bool {
    match form.as_list() {
        Some([Form::Symbol(head), ..]) => head.ns() == Some(CORE_NS) && head.name() == name,
        _ => false,
    }
}
