#![deny(missing_docs)]

//! This crate provides a reader and a printer for Clojure source text.
//! Reading turns text into [`Form`]s, the data that Clojure code is made
//! of, without evaluating anything:
//!
//! ```clojure
//! (ns app.core
//!   (:require [clojure.string :as str]))
//!
//! (defn greet
//!   "Greets someone."
//!   [{::keys [name] :as person}]
//!   #?(:clj  (str "Hello, " name \!)
//!      :cljs (js/alert name)))
//! ```
//!
//! There are three common ways you might need to work with such text:
//!
//! - **As text data**. Source files, `deps.edn` configuration, or data
//!   exchanged with a Clojure process.
//!
//! - **As forms**. You want to inspect or transform code without running it,
//!   for example to find definitions, check a configuration, or implement
//!   a formatter or linter.
//!
//! - **Through a host runtime**. Some syntax depends on the environment the
//!   text is read in: `::keywords` need the current namespace, syntax-quote
//!   qualifies symbols, and tagged literals like `#inst` need a constructor.
//!   These questions are answered by a [`Host`](host::Host).
//!
//! # Reading forms
//!
//! ```
//! use lform::{Form, Keyword, reader::Error};
//!
//! fn example() -> Result<(), Error> {
//!     let data = r#"{:name "lform"
//!                    :version [0 1 0]
//!                    :tags #{:reader :printer}}"#;
//!
//!     let form = lform::from_str(data)?;
//!
//!     // Maps with keyword keys can be indexed by the keyword name.
//!     assert_eq!(form["name"], Form::from("lform"));
//!     assert_eq!(form["version"][1], Form::from(1));
//!     assert!(form["tags"].as_set().unwrap().contains(&Form::keyword("reader")));
//!     assert_eq!(form["missing"], Form::Nil);
//!
//!     Ok(())
//! }
//! #
//! # fn main() {
//! #     example().unwrap();
//! # }
//! ```
//!
//! To read a stream of forms, such as a whole source file, use a
//! [`Reader`] directly:
//!
//! ```
//! use lform::{Form, Reader};
//!
//! let source = "(ns demo) ; a namespace\n(def x 1)\n#_(def y 2)";
//! let mut reader = Reader::from_str(source);
//! let mut heads = Vec::new();
//! while let Some(form) = reader.read().unwrap() {
//!     heads.push(form[0].clone());
//! }
//! assert_eq!(heads, vec![Form::symbol("ns"), Form::symbol("def")]);
//! ```
//!
//! # Printing forms
//!
//! Forms print as Clojure text that reads back as an equal form, either
//! through the [`print`] module or through `Display`:
//!
//! ```
//! let form = lform::from_str("(+ 1/2 0.5 ##Inf \"\\n\")").unwrap();
//! assert_eq!(form.to_string(), "(+ 1/2 0.5 ##Inf \"\\n\")");
//! ```
//!
//! # The `form!` macro
//!
//! With the `form-macro` feature, forms can be written inline in Rust code,
//! with `~` interpolating Rust values:
//!
//! ```
//! # #[cfg(feature = "form-macro")]
//! # {
//! use lform::form;
//!
//! let n = 42;
//! let f = form!((assoc {:a 1} :b ~n));
//! assert_eq!(f.to_string(), "(assoc {:a 1} :b 42)");
//! # }
//! ```

/// Construct a [`Form`] using Clojure syntax.
///
/// The macro reads like an implicitly syntax-quoted Clojure form, without
/// the namespace qualification.
///
/// # Atoms
///
/// ```
/// # use lform::form;
/// assert!(form!(nil).is_nil());
/// assert_eq!(form!(true).as_bool(), Some(true));
/// assert_eq!(form!(-3).as_i64(), Some(-3));
/// assert_eq!(form!("text").as_str(), Some("text"));
/// ```
///
/// # Symbols and keywords
///
/// Due to syntactic restrictions of Rust's macro system, names that Rust
/// cannot tokenize, such as kebab-case ones, use the `#"..."` syntax.
///
/// ```
/// # use lform::form;
/// assert!(form!(symbol).is_symbol());
/// assert!(form!(:keyword).is_keyword());
/// assert_eq!(form!(#"kebab-symbol"), lform::Form::symbol("kebab-symbol"));
/// assert_eq!(form!(:"kebab-keyword"), lform::Form::keyword("kebab-keyword"));
/// ```
///
/// # Collections
///
/// ```
/// # use lform::form;
/// let f = form!((defn f [x] {:a x} #{1}));
/// assert!(f.is_list());
/// assert!(f[2].is_vector());
/// assert!(f[3].is_map());
/// assert!(f[4].is_set());
/// ```
///
/// # Interpolation
///
/// `~expr` inserts any value convertible into a form; `~@expr` splices
/// the items of an iterable into the enclosing collection.
///
/// ```
/// # use lform::form;
/// let items = vec![1, 2];
/// assert_eq!(form!([0 ~@items 3]), form!([0 1 2 3]));
/// ```
#[cfg(feature = "form-macro")]
pub use lform_macros::form;

pub mod form;
pub mod host;
pub mod number;
pub mod print;
pub mod reader;
pub mod symbol;
pub mod syntax;

#[doc(inline)]
pub use self::reader::{
    from_reader, from_reader_custom, from_slice, from_slice_custom, from_str, from_str_custom,
    Reader,
};

#[doc(inline)]
pub use self::print::{
    to_string, to_string_custom, to_vec, to_vec_custom, to_writer, to_writer_custom, Printer,
};

#[doc(inline)]
pub use self::form::{Form, Index, Map, Pattern, Set};

#[doc(inline)]
pub use self::number::Number;

#[doc(inline)]
pub use self::symbol::{Keyword, Symbol};

#[cfg(test)]
mod tests;
