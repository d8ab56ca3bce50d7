use proc_macro2::{Literal, TokenTree};

/// A form as written inside `form!`, before code generation.
#[derive(Debug)]
pub enum Form {
    Nil,
    Bool(bool),
    Literal(Literal),
    Negated(Literal),
    Symbol(String),
    Keyword(String),
    /// `~expr`, converted with `Form::from`.
    Unquoted(TokenTree),
    List(Vec<Element>),
    Vector(Vec<Element>),
    Map(Vec<(Form, Form)>),
    Set(Vec<Element>),
}

/// An item of a list, vector or set.
#[derive(Debug)]
pub enum Element {
    Form(Form),
    /// `~@expr`, whose items are spliced into the collection.
    Splice(TokenTree),
}
