use crate::form::{Element, Form};

use proc_macro2::{Ident, Span, TokenStream};
use quote::{quote, ToTokens};

impl ToTokens for Form {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let expanded = match self {
            Form::Nil => quote! { ::lform::Form::Nil },
            Form::Bool(value) => quote! { ::lform::Form::Bool(#value) },
            Form::Literal(lit) => quote! { ::lform::Form::from(#lit) },
            Form::Negated(lit) => quote! { ::lform::Form::from(-#lit) },
            Form::Symbol(name) => quote! { ::lform::Form::symbol(#name) },
            Form::Keyword(name) => quote! { ::lform::Form::keyword(#name) },
            Form::Unquoted(tt) => quote! { ::lform::Form::from(#tt) },
            Form::List(elements) => {
                let items = collect_items(elements);
                quote! { ::lform::Form::list(#items) }
            }
            Form::Vector(elements) => {
                let items = collect_items(elements);
                quote! { ::lform::Form::vector(#items) }
            }
            Form::Set(elements) => {
                let items = collect_items(elements);
                quote! { ::lform::Form::set(#items) }
            }
            Form::Map(entries) => {
                let keys = entries.iter().map(|(key, _)| key);
                let values = entries.iter().map(|(_, value)| value);
                quote! {{
                    let entries: ::std::vec::Vec<(::lform::Form, ::lform::Form)> =
                        ::std::vec![#((#keys, #values)),*];
                    ::lform::Form::map(entries)
                }}
            }
        };
        tokens.extend(expanded);
    }
}

/// A block evaluating to a `Vec<Form>` of the elements, with splices
/// expanded in place.
fn collect_items(elements: &[Element]) -> TokenStream {
    // Invisible to interpolated expressions, which may use the same name.
    let items = Ident::new("items", Span::mixed_site());
    let pushes = elements.iter().map(|element| match element {
        Element::Form(form) => quote! { #items.push(#form); },
        Element::Splice(tt) => quote! {
            #items.extend(::std::iter::IntoIterator::into_iter(#tt).map(::lform::Form::from));
        },
    });
    quote! {{
        #[allow(unused_mut)]
        let mut #items = ::std::vec::Vec::<::lform::Form>::new();
        #(#pushes)*
        #items
    }}
}

pub fn generate(form: Form) -> TokenStream {
    form.into_token_stream()
}
