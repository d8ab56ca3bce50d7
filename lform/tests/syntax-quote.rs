//! Evaluates syntax-quote expansions with a tiny evaluator that knows just
//! the functions the expansion calls.

use std::collections::HashMap;
use std::sync::Arc;

use lform::host::Host;
use lform::{Form, Map, Reader, Symbol};

type Env = HashMap<&'static str, Form>;

fn eval(form: &Form, env: &Env) -> Result<Form, String> {
    match form.value() {
        Form::Symbol(sym) if sym.ns() == Some("clojure.core") => Ok(Form::Symbol(sym.clone())),
        Form::Symbol(sym) => env
            .get(sym.name())
            .cloned()
            .ok_or_else(|| format!("unbound symbol {}", sym)),
        Form::List(items) if !items.is_empty() => {
            let head = items[0]
                .as_symbol()
                .ok_or_else(|| format!("cannot call {}", items[0]))?;
            if *head == Symbol::new("quote") {
                return Ok(items[1].clone());
            }
            let args = items[1..]
                .iter()
                .map(|arg| eval(arg, env))
                .collect::<Result<Vec<_>, _>>()?;
            call(head, args)
        }
        other => Ok(other.clone()),
    }
}

fn seq_items(form: &Form) -> Result<Vec<Form>, String> {
    match form.value() {
        Form::Nil => Ok(Vec::new()),
        Form::List(items) | Form::Vector(items) => Ok(items.to_vec()),
        other => Err(format!("not a sequence: {}", other)),
    }
}

fn call(head: &Symbol, mut args: Vec<Form>) -> Result<Form, String> {
    if head.ns() != Some("clojure.core") {
        return Err(format!("unknown function {}", head));
    }
    match head.name() {
        "list" => Ok(Form::list(args)),
        "vector" => Ok(Form::vector(args)),
        "hash-set" => Ok(Form::set(args)),
        "hash-map" => {
            let mut map = Map::new();
            let mut iter = args.into_iter();
            while let (Some(k), Some(v)) = (iter.next(), iter.next()) {
                map.insert(k, v);
            }
            Ok(Form::Map(map))
        }
        "concat" => {
            let mut items = Vec::new();
            for arg in &args {
                items.extend(seq_items(arg)?);
            }
            Ok(Form::list(items))
        }
        "seq" => {
            let items = seq_items(&args[0])?;
            Ok(if items.is_empty() {
                Form::Nil
            } else {
                Form::list(items)
            })
        }
        "apply" => {
            let items = seq_items(&args[1])?;
            let f = args[0]
                .as_symbol()
                .ok_or_else(|| format!("cannot apply {}", args[0]))?;
            call(f, items)
        }
        "with-meta" => {
            let meta = args.pop().and_then(|m| m.as_map().cloned()).unwrap_or_default();
            let form = args.pop().ok_or("with-meta needs a form")?;
            Ok(form.with_meta(meta))
        }
        name => Err(format!("unknown function clojure.core/{}", name)),
    }
}

struct App;

impl Host for App {
    fn current_ns(&self) -> String {
        "app".into()
    }

    fn resolve_alias(&self, alias: &str) -> Option<String> {
        (alias == "str").then(|| "clojure.string".into())
    }
}

fn expand(text: &str) -> Form {
    let mut env = Env::new();
    env.insert("b", Form::from(5));
    env.insert("c", Form::vector(vec![1, 2]));
    let mut reader = Reader::from_str(text).with_host(Arc::new(App));
    let form = reader.read_form().expect("reading failed");
    eval(&form, &env).expect("evaluation failed")
}

fn read(text: &str) -> Form {
    lform::from_str(text).unwrap()
}

#[test]
fn test_list() {
    assert_eq!(expand("`(a ~b ~@c)"), read("(app/a 5 1 2)"));
    assert_eq!(expand("`(str/join ~c)"), read("(clojure.string/join [1 2])"));
    assert_eq!(expand("`(if ~b :t :f)"), read("(if 5 :t :f)"));
    assert_eq!(expand("`()"), read("()"));
}

#[test]
fn test_collections() {
    assert_eq!(expand("`[~b ~@c :k]"), read("[5 1 2 :k]"));
    assert_eq!(expand("`{:a ~b x ~c}"), read("{:a 5 app/x [1 2]}"));
    assert_eq!(expand("`#{~b \"s\"}"), read("#{5 \"s\"}"));
    assert_eq!(expand("`[[~@c] (~b)]"), read("[[1 2] (5)]"));
}

#[test]
fn test_atoms() {
    assert_eq!(expand("`x"), read("app/x"));
    assert_eq!(expand("`:k"), read(":k"));
    assert_eq!(expand("`~b"), read("5"));
    assert_eq!(expand("`nil"), Form::Nil);
    assert_eq!(expand("`String."), read("String."));
    assert_eq!(expand("`.toString"), read(".toString"));
}

#[test]
fn test_nested_syntax_quote() {
    // The inner expansion is itself code that rebuilds the list.
    let inner = expand("`(a `(b ~~b))");
    assert_eq!(inner[0], read("app/a"));
    assert!(inner[1].is_list());
}

#[test]
fn test_gensyms() {
    let form = expand("`(let [x# ~b] (inc x#))");
    assert_eq!(form[0], read("app/let"));
    let binding = form[1][0].as_symbol().unwrap();
    assert!(!binding.is_qualified());
    assert!(binding.name().starts_with("x__"));
    assert!(binding.name().ends_with("__auto__"));
    assert_eq!(form[1][1], Form::from(5));
    assert_eq!(form[2][1], form[1][0]);
}

#[test]
fn test_meta() {
    let form = expand("`^:private [~b]");
    assert_eq!(form, read("[5]"));
    let meta = form.meta().expect("metadata was dropped");
    assert_eq!(meta.get(&Form::keyword("private")), Some(&Form::Bool(true)));
}
