//! The reader's link to its surrounding runtime.
//!
//! Some reader syntax cannot be resolved from the source text alone:
//! auto-resolved keywords need the current namespace and its aliases,
//! syntax-quote qualifies symbols, `#=` evaluates a form, and tagged literals
//! are built by tag readers. The reader asks a [`Host`] for all of these.
//!
//! ```
//! use lform::host::{Host, HostResult};
//! use lform::reader::Reader;
//! use lform::{Form, Keyword, Symbol};
//! use std::sync::Arc;
//!
//! struct Project;
//!
//! impl Host for Project {
//!     fn current_ns(&self) -> String {
//!         "app.core".into()
//!     }
//!
//!     fn resolve_alias(&self, alias: &str) -> Option<String> {
//!         (alias == "str").then(|| "clojure.string".into())
//!     }
//! }
//!
//! let mut reader = Reader::from_str("[::id ::str/join]").with_host(Arc::new(Project));
//! let form = reader.read().unwrap().unwrap();
//! assert_eq!(form[0], Form::Keyword(Keyword::qualified("app.core", "id")));
//! assert_eq!(form[1], Form::Keyword(Keyword::qualified("clojure.string", "join")));
//! ```

use std::error;
use std::fmt;

use crate::{Form, Symbol};

/// Error returned by a host when it fails to evaluate a form or to build a
/// tagged literal.
pub type HostError = Box<dyn error::Error + Send + Sync>;

/// Alias for a `Result` with the error type [`HostError`].
pub type HostResult<T> = Result<T, HostError>;

/// Namespace resolution, read-time evaluation and tag readers.
///
/// Every method has a default, so an implementation only overrides what its
/// runtime supports. A host is shared between readers and must be
/// `Send + Sync`.
pub trait Host: Send + Sync {
    /// The namespace that unqualified names are read in.
    fn current_ns(&self) -> String {
        "user".into()
    }

    /// The full namespace name that `alias` stands for in the current
    /// namespace.
    fn resolve_alias(&self, _alias: &str) -> Option<String> {
        None
    }

    /// Returns true if a namespace named `ns` is known.
    fn namespace_exists(&self, _ns: &str) -> bool {
        false
    }

    /// Resolve the namespace part of `::ns/name`: an alias first, then a
    /// namespace with that exact name.
    fn namespace_for(&self, ns: &str) -> Option<String> {
        self.resolve_alias(ns)
            .or_else(|| self.namespace_exists(ns).then(|| ns.to_string()))
    }

    /// Qualify a symbol inside a syntax-quote.
    ///
    /// The default leaves names containing a `.` past their first
    /// character unchanged (class names), expands an aliased namespace, and
    /// qualifies unqualified names with the current namespace.
    fn resolve_symbol(&self, sym: &Symbol) -> Symbol {
        match sym.ns() {
            Some(ns) => match self.resolve_alias(ns) {
                Some(full) if full != ns => Symbol::qualified(full, sym.name()),
                _ => sym.clone(),
            },
            None if sym.name().find('.').map_or(false, |i| i > 0) => sym.clone(),
            None => Symbol::qualified(self.current_ns(), sym.name()),
        }
    }

    /// Evaluate `form` for `#=`.
    fn evaluate(&self, _form: &Form) -> HostResult<Form> {
        Err(Box::new(NoEvaluator))
    }

    /// Build the value of the tagged literal `#tag form`.
    ///
    /// Returns `None` if there is no reader for `tag`.
    fn resolve_tag(&self, _tag: &Symbol, _form: &Form) -> Option<HostResult<Form>> {
        None
    }
}

/// The host used when none is configured.
///
/// It reads in namespace `user`, knows no aliases or namespaces, cannot
/// evaluate and has no tag readers.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultHost;

impl Host for DefaultHost {}

#[derive(Debug)]
struct NoEvaluator;

impl fmt::Display for NoEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("no evaluator available")
    }
}

impl error::Error for NoEvaluator {}
