//! Syntax-quote and unquote.
//!
//! A syntax-quoted form is rewritten at read time into a form that, when
//! evaluated, builds the quoted template with the unquoted parts filled in.

use std::collections::HashMap;

use tracing::trace;

use super::error::ErrorCode;
use super::{next_id, Read, Reader, Result, Step};
use crate::host::Host;
use crate::syntax::{self, core_call, is_core_call, is_special};
use crate::{Form, Map, Symbol};

impl<R: Read> Reader<R> {
    pub(super) fn read_syntax_quote(&mut self, _: char) -> Result<Step> {
        self.env.syntax_quote_depth += 1;
        let form = self.read_next();
        self.env.syntax_quote_depth -= 1;
        let form = form?;
        let mut expander = Expander {
            host: &*self.host,
            gensyms: HashMap::new(),
        };
        match expander.expand(&form) {
            Ok(expanded) => Ok(Step::Form(expanded)),
            Err(code) => Err(self.error(code)),
        }
    }

    pub(super) fn read_unquote(&mut self, _: char) -> Result<Step> {
        if self.env.syntax_quote_depth == 0 {
            return Err(self.error(ErrorCode::UnquoteOutsideSyntaxQuote));
        }
        let splicing = self.peek()? == Some('@');
        if splicing {
            self.eat_char();
        }
        self.env.syntax_quote_depth -= 1;
        let form = self.read_next();
        self.env.syntax_quote_depth += 1;
        let name = if splicing { "unquote-splicing" } else { "unquote" };
        Ok(Step::Form(core_call(name, [form?])))
    }
}

/// Rewrites one syntax-quoted form. Auto-gensyms are shared by all
/// occurrences within it.
struct Expander<'a> {
    host: &'a dyn Host,
    gensyms: HashMap<Symbol, Symbol>,
}

fn unquoted(form: &Form) -> Option<&Form> {
    match form.value().as_list() {
        Some([_, arg]) if is_core_call(form.value(), "unquote") => Some(arg),
        _ => None,
    }
}

fn spliced(form: &Form) -> Option<&Form> {
    match form.value().as_list() {
        Some([_, arg]) if is_core_call(form.value(), "unquote-splicing") => Some(arg),
        _ => None,
    }
}

fn quote(form: Form) -> Form {
    syntax::call("quote", [form])
}

impl<'a> Expander<'a> {
    fn expand(&mut self, form: &Form) -> std::result::Result<Form, ErrorCode> {
        let value = form.value();
        if let Some(x) = unquoted(value) {
            return Ok(x.clone());
        }
        if spliced(value).is_some() {
            return Err(ErrorCode::SpliceOutsideList);
        }
        let ret = match value {
            Form::Symbol(sym) if is_special(sym) => quote(value.clone()),
            Form::Symbol(sym) => quote(Form::Symbol(self.resolve(sym))),
            Form::Map(map) => {
                let flat: Vec<Form> = map
                    .iter()
                    .flat_map(|(k, v)| [k.clone(), v.clone()])
                    .collect();
                self.apply("hash-map", &flat)?
            }
            Form::Vector(items) => self.apply("vector", items)?,
            Form::Set(set) => {
                let items: Vec<Form> = set.iter().cloned().collect();
                self.apply("hash-set", &items)?
            }
            Form::List(items) if items.is_empty() => core_call("list", []),
            Form::List(items) => self.seq_concat(items)?,
            Form::Keyword(_) | Form::Number(_) | Form::Char(_) | Form::String(_) => {
                return Ok(value.clone());
            }
            _ => quote(value.clone()),
        };

        let meta: Map = form
            .meta()
            .map(|meta| {
                meta.iter()
                    .filter(|(k, _)| {
                        !matches!(k.as_keyword(), Some(kw) if kw.ns().is_none()
                            && (kw.name() == "line" || kw.name() == "column"))
                    })
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default();
        if meta.is_empty() {
            return Ok(ret);
        }
        let meta = self.expand(&Form::Map(meta))?;
        Ok(core_call("with-meta", [ret, meta]))
    }

    /// `(apply name (seq (concat ...)))`
    fn apply(&mut self, name: &str, items: &[Form]) -> std::result::Result<Form, ErrorCode> {
        let seq = self.seq_concat(items)?;
        Ok(core_call("apply", [Form::Symbol(syntax::core(name)), seq]))
    }

    /// `(seq (concat ...))`
    fn seq_concat(&mut self, items: &[Form]) -> std::result::Result<Form, ErrorCode> {
        let parts = self.expand_seq(items)?;
        Ok(core_call("seq", [core_call("concat", parts)]))
    }

    fn expand_seq(&mut self, items: &[Form]) -> std::result::Result<Vec<Form>, ErrorCode> {
        items
            .iter()
            .map(|item| {
                if let Some(x) = unquoted(item) {
                    Ok(core_call("list", [x.clone()]))
                } else if let Some(x) = spliced(item) {
                    Ok(x.clone())
                } else {
                    Ok(core_call("list", [self.expand(item)?]))
                }
            })
            .collect()
    }

    fn resolve(&mut self, sym: &Symbol) -> Symbol {
        if sym.is_qualified() {
            return self.host.resolve_symbol(sym);
        }
        let name = sym.name();
        if let Some(stem) = name.strip_suffix('#') {
            return self
                .gensyms
                .entry(sym.clone())
                .or_insert_with(|| {
                    let gensym = Symbol::new(format!("{}__{}__auto__", stem, next_id()));
                    trace!(symbol = %sym, gensym = %gensym, "created auto-gensym");
                    gensym
                })
                .clone();
        }
        if let Some(stem) = name.strip_suffix('.') {
            if !stem.is_empty() {
                let resolved = self.host.resolve_symbol(&Symbol::new(stem));
                return Symbol::new(format!("{}.", resolved.name()));
            }
        }
        if name.starts_with('.') {
            return sym.clone();
        }
        self.host.resolve_symbol(sym)
    }
}
