//! Readers for the `#` dispatch macros.

use tracing::{debug, trace};

use super::error::ErrorCode;
use super::grammar::{is_terminating_macro, is_whitespace};
use super::read as source;
use super::{next_id, ArgEnv, MacroFn, Outcome, Read, ReadCond, ReadEval, Reader, Result, Step};
use crate::syntax::{self, is_reserved_feature};
use crate::{Form, Keyword, Pattern, Set, Symbol};

/// Highest positional parameter of an anonymous function literal, `%20`.
const MAX_POSITIONAL_ARGS: i64 = 20;

/// A parameter symbol of an anonymous function literal. `None` stands for
/// the rest parameter.
fn garg(n: Option<usize>) -> Symbol {
    let stem = match n {
        Some(n) => format!("p{}", n),
        None => "rest".to_owned(),
    };
    Symbol::new(format!("{}__{}#", stem, next_id()))
}

/// Qualify an unqualified keyword or symbol key of a namespaced map. Keys in
/// the `_` namespace lose their namespace.
fn qualify_key(key: Form, ns: &str) -> Form {
    let target = |key_ns: Option<&str>| match key_ns {
        None => Some(Some(ns.to_owned())),
        Some("_") => Some(None),
        Some(_) => None,
    };
    match key {
        Form::Keyword(kw) => match target(kw.ns()) {
            Some(ns) => Form::Keyword(Keyword::from(Symbol::with_ns(ns.as_deref(), kw.name()))),
            None => Form::Keyword(kw),
        },
        Form::Symbol(sym) => match target(sym.ns()) {
            Some(ns) => Form::Symbol(Symbol::with_ns(ns.as_deref(), sym.name())),
            None => Form::Symbol(sym),
        },
        other => other,
    }
}

impl<R: Read> Reader<R> {
    fn dispatch_fn(ch: char) -> Option<MacroFn<R>> {
        let f: MacroFn<R> = match ch {
            '^' => Self::read_meta,
            '#' => Self::read_symbolic_value,
            '\'' => Self::read_var,
            '"' => Self::read_regex,
            '(' => Self::read_fn,
            '{' => Self::read_set,
            '=' => Self::read_eval,
            '!' => Self::read_comment,
            '<' => Self::read_unreadable,
            '_' => Self::read_discard,
            '?' => Self::read_conditional,
            ':' => Self::read_namespaced_map,
            _ => return None,
        };
        Some(f)
    }

    pub(super) fn read_dispatch(&mut self, _: char) -> Result<Step> {
        let ch = match self.peek()? {
            Some(ch) => ch,
            None => return Err(self.peek_error(ErrorCode::EofWhileReading)),
        };
        match Self::dispatch_fn(ch) {
            Some(f) => {
                self.eat_char();
                f(self, ch)
            }
            None => self.read_tagged(ch),
        }
    }

    fn read_var(&mut self, _: char) -> Result<Step> {
        let form = self.read_next()?;
        Ok(Step::Form(syntax::call("var", [form])))
    }

    fn read_regex(&mut self, _: char) -> Result<Step> {
        self.scratch.clear();
        source::parse_regex(&mut self.read, &mut self.scratch)?;
        match Pattern::new(&self.scratch) {
            Ok(pattern) => Ok(Step::Form(Form::Regex(pattern))),
            Err(err) => Err(self.error(ErrorCode::InvalidRegex(err.to_string()))),
        }
    }

    fn read_set(&mut self, _: char) -> Result<Step> {
        let items = self.read_delimited('}')?;
        match Set::from_items(items) {
            Ok(set) => Ok(Step::Form(Form::Set(set))),
            Err(item) => Err(self.error(ErrorCode::DuplicateKey(item.to_string()))),
        }
    }

    fn read_unreadable(&mut self, _: char) -> Result<Step> {
        Err(self.error(ErrorCode::UnreadableForm))
    }

    fn read_discard(&mut self, _: char) -> Result<Step> {
        let form = self.read_next()?;
        trace!(form = %form, "discarded form");
        Ok(Step::Continue)
    }

    fn read_eval(&mut self, _: char) -> Result<Step> {
        if self.options.read_eval != ReadEval::Allow {
            return Err(self.error(ErrorCode::EvalDisallowed));
        }
        let form = self.read_next()?;
        if self.env.suppress_read {
            return Ok(Step::Form(form));
        }
        debug!(form = %form, "evaluating at read time");
        match self.host.evaluate(&form) {
            Ok(value) => Ok(Step::Form(value)),
            Err(err) => Err(self.error(ErrorCode::EvalFailed(err))),
        }
    }

    /// `#tag form`, for dispatch characters without a reader of their own.
    /// The character `ch` has not been consumed.
    fn read_tagged(&mut self, ch: char) -> Result<Step> {
        let tag = match self.read_next()?.strip_meta() {
            Form::Symbol(sym) => sym,
            _ => return Err(self.error(ErrorCode::UnknownDispatchMacro(ch))),
        };
        let form = self.read_next()?;
        if self.options.read_cond == ReadCond::Preserve || self.env.suppress_read {
            return Ok(Step::Form(Form::Tagged(tag, Box::new(form))));
        }
        debug!(tag = %tag, "reading tagged literal");
        match self.host.resolve_tag(&tag, &form) {
            Some(Ok(value)) => Ok(Step::Form(value)),
            Some(Err(err)) => Err(self.error(ErrorCode::EvalFailed(err))),
            None => Err(self.error(ErrorCode::NoReaderForTag(tag.to_string()))),
        }
    }

    /// `##Inf`, `##-Inf` and `##NaN`.
    fn read_symbolic_value(&mut self, _: char) -> Result<Step> {
        let form = self.read_next()?;
        let value = match form.as_symbol() {
            Some(sym) if !sym.is_qualified() => match sym.name() {
                "Inf" => f64::INFINITY,
                "-Inf" => f64::NEG_INFINITY,
                "NaN" => f64::NAN,
                _ => return Err(self.error(ErrorCode::InvalidSymbolicValue(sym.to_string()))),
            },
            _ => return Err(self.error(ErrorCode::InvalidToken(format!("##{}", form)))),
        };
        Ok(Step::Form(Form::from(value)))
    }

    fn read_fn(&mut self, _: char) -> Result<Step> {
        if self.env.args.is_some() {
            return Err(self.error(ErrorCode::NestedFn));
        }
        self.env.args = Some(ArgEnv::default());
        let body = self.read_list_form();
        let args = self.env.args.take().unwrap_or_default();
        let body = body?;

        let mut params = Vec::new();
        if let Some(&high) = args.positional.keys().next_back() {
            for i in 1..=high {
                let sym = match args.positional.get(&i) {
                    Some(sym) => sym.clone(),
                    None => garg(Some(i)),
                };
                params.push(Form::Symbol(sym));
            }
        }
        if let Some(rest) = args.rest {
            params.push(Form::symbol("&"));
            params.push(Form::Symbol(rest));
        }
        Ok(Step::Form(syntax::call(
            "fn*",
            [Form::Vector(params.into()), body],
        )))
    }

    /// `%`, `%n` and `%&`. Outside `#(...)` these are plain symbols.
    pub(super) fn read_arg(&mut self, ch: char) -> Result<Step> {
        if self.env.args.is_none() {
            let token = self.read_token(ch)?;
            return self.interpret_token(&token).map(Step::Form);
        }
        match self.peek()? {
            None => return self.register_arg(Some(1)),
            Some(next) if is_whitespace(next) || is_terminating_macro(next) => {
                return self.register_arg(Some(1));
            }
            Some(_) => {}
        }
        let n = self.read_next()?;
        match n.value() {
            Form::Symbol(sym) if !sym.is_qualified() && sym.name() == "&" => self.register_arg(None),
            Form::Number(n) => match n.as_i64() {
                Some(i) if (1..=MAX_POSITIONAL_ARGS).contains(&i) => {
                    self.register_arg(Some(i as usize))
                }
                _ => Err(self.error(ErrorCode::InvalidArgLiteral)),
            },
            _ => Err(self.error(ErrorCode::InvalidArgLiteral)),
        }
    }

    fn register_arg(&mut self, n: Option<usize>) -> Result<Step> {
        let args = match self.env.args.as_mut() {
            Some(args) => args,
            None => return Err(self.error(ErrorCode::InvalidArgLiteral)),
        };
        let sym = match n {
            Some(i) => args.positional.entry(i).or_insert_with(|| garg(Some(i))),
            None => args.rest.get_or_insert_with(|| garg(None)),
        };
        Ok(Step::Form(Form::Symbol(sym.clone())))
    }

    fn read_conditional(&mut self, _: char) -> Result<Step> {
        if self.options.read_cond == ReadCond::Disallow {
            return Err(self.error(ErrorCode::ConditionalReadNotAllowed));
        }
        let mut ch = self.next_char()?;
        let splicing = ch == Some('@');
        if splicing {
            ch = self.next_char()?;
        }
        while let Some(c) = ch {
            if !is_whitespace(c) {
                break;
            }
            ch = self.next_char()?;
        }
        match ch {
            None => return Err(self.error(ErrorCode::EofWhileReading)),
            Some('(') => {}
            Some(_) => {
                return Err(self.error(ErrorCode::InvalidConditional(
                    "read-cond body must be a list",
                )))
            }
        }
        if self.options.read_cond == ReadCond::Preserve {
            let form = self.read_list_form()?;
            return Ok(Step::Form(Form::Conditional {
                form: Box::new(form),
                splicing,
            }));
        }
        self.read_cond_delimited(splicing)
    }

    /// Selects the first branch whose feature is active. The remaining forms
    /// are still read, with tagged literals left unresolved.
    fn read_cond_delimited(&mut self, splicing: bool) -> Result<Step> {
        let line = self.read.position().line;
        let mut result = None;
        loop {
            if result.is_none() {
                let feature = match self.read_one(Some(')'))? {
                    Outcome::Form(form) => form,
                    Outcome::Delimiter => break,
                    Outcome::Eof => {
                        return Err(self.error(ErrorCode::EofWhileReadingCollection { line }))
                    }
                };
                let feature = match feature.strip_meta() {
                    Form::Keyword(kw) if is_reserved_feature(&kw) => {
                        return Err(self.error(ErrorCode::InvalidConditional(
                            "feature name is reserved",
                        )));
                    }
                    Form::Keyword(kw) => kw,
                    _ => {
                        return Err(self.error(ErrorCode::InvalidConditional(
                            "feature should be a keyword",
                        )))
                    }
                };
                if self.options.has_feature(&feature) {
                    match self.read_one(Some(')'))? {
                        Outcome::Form(form) => {
                            trace!(feature = %feature, line, "selected reader conditional branch");
                            result = Some(form);
                        }
                        Outcome::Delimiter => {
                            return Err(self.error(ErrorCode::InvalidConditional(
                                "read-cond requires an even number of forms",
                            )))
                        }
                        Outcome::Eof => {
                            return Err(self.error(ErrorCode::EofWhileReadingCollection { line }))
                        }
                    }
                }
            }
            match self.read_suppressed(Some(')'))? {
                Outcome::Form(_) => {}
                Outcome::Delimiter => break,
                Outcome::Eof => {
                    return Err(self.error(ErrorCode::EofWhileReadingCollection { line }))
                }
            }
        }

        let form = match result {
            Some(form) => form,
            None => {
                trace!(line, "no reader conditional branch selected");
                return Ok(Step::Continue);
            }
        };
        if !splicing {
            return Ok(Step::Form(form));
        }
        let items = match form.strip_meta() {
            Form::List(items) | Form::Vector(items) => items,
            _ => {
                return Err(self.error(ErrorCode::InvalidConditional(
                    "spliced form in read-cond-splicing must be a list or vector",
                )))
            }
        };
        if self.env.collection_depth == 0 {
            return Err(self.error(ErrorCode::SpliceAtTopLevel));
        }
        trace!(count = items.len(), line, "splicing reader conditional");
        for item in items.into_vec().into_iter().rev() {
            self.pending.push_front(item);
        }
        Ok(Step::Continue)
    }

    /// `#:ns{...}`, `#::{...}` and `#::alias{...}`.
    fn read_namespaced_map(&mut self, _: char) -> Result<Step> {
        let auto = self.peek()? == Some(':');
        if auto {
            self.eat_char();
        }
        let mut prefix = None;
        match self.peek()? {
            Some(c) if is_whitespace(c) => {
                if !auto {
                    return Err(self.peek_error(ErrorCode::InvalidNamespacedMap(
                        "namespaced map must specify a namespace",
                    )));
                }
                self.parse_whitespace()?;
            }
            Some('{') => {}
            _ => {
                prefix = Some(self.read_next()?);
                self.parse_whitespace()?;
            }
        }
        if self.next_char()? != Some('{') {
            return Err(self.error(ErrorCode::InvalidNamespacedMap(
                "namespaced map must specify a map",
            )));
        }

        let ns = match (auto, prefix.as_ref().map(Form::value)) {
            (true, None) => self.host.current_ns(),
            (true, Some(Form::Symbol(sym))) if !sym.is_qualified() => {
                match self.host.namespace_for(sym.name()) {
                    Some(ns) => ns,
                    None => {
                        return Err(self.error(ErrorCode::UnresolvedNamespace(sym.to_string())))
                    }
                }
            }
            (false, Some(Form::Symbol(sym))) if !sym.is_qualified() => sym.name().to_owned(),
            _ => {
                return Err(self.error(ErrorCode::InvalidNamespacedMap(
                    "namespaced map must specify a valid namespace",
                )))
            }
        };

        let items = self.read_delimited('}')?;
        let items = items
            .into_iter()
            .enumerate()
            .map(|(i, form)| if i % 2 == 0 { qualify_key(form, &ns) } else { form })
            .collect();
        self.build_map(items).map(Step::Form)
    }
}
