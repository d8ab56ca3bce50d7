//! Internal crate implementing macros exposed by the `lform` crate.

#![recursion_limit = "128"]

extern crate proc_macro;

mod form;
mod generator;
mod parser;

use proc_macro2::TokenStream;
use quote::quote;

/// Construct an `lform::Form` from Clojure-shaped tokens.
///
/// See the documentation of `lform::form!` for the accepted syntax.
#[proc_macro]
pub fn form(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let output = match expand(TokenStream::from(input)) {
        Err(e) => {
            let msg = format!("could not parse form: {}", e);
            quote! { compile_error!(#msg) }
        }
        Ok(output) => output,
    };

    proc_macro::TokenStream::from(output)
}

fn expand(input: TokenStream) -> Result<TokenStream, parser::ParseError> {
    let form = parser::parse(input)?;
    Ok(generator::generate(form))
}
