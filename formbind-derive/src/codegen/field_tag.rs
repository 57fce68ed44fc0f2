//! Builds the `FieldTag` constant expression for one field.

use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};

use crate::ir::{AttrValue, Field};

fn entry(key: &str, value: &Option<AttrValue>) -> Option<TokenStream> {
    let v = value.as_ref()?;
    let key = syn::Ident::new(key, v.span);
    let lit = &v.value;
    Some(quote_spanned! {v.span=> #key: ::core::option::Option::Some(#lit), })
}

pub fn build(field: &Field) -> TokenStream {
    let attr = &field.attr;
    let ident = field.ident.to_string();
    let ident = ident.strip_prefix("r#").unwrap_or(&ident);

    let mut entries: Vec<TokenStream> = [
        ("name", &attr.name),
        ("label", &attr.label),
        ("format", &attr.format),
        ("widget", &attr.widget),
        ("required", &attr.required),
        ("regex", &attr.regex),
        ("min_len", &attr.min_len),
        ("max_len", &attr.max_len),
        ("len", &attr.len),
        ("min_num", &attr.min_num),
        ("max_num", &attr.max_num),
        ("num", &attr.num),
    ]
    .into_iter()
    .filter_map(|(key, value)| entry(key, value))
    .collect();

    if attr.skip.is_some() {
        entries.push(quote! { name: ::core::option::Option::Some("-"), });
    }

    if entries.is_empty() {
        return quote! { ::formbind::FieldTag::new(#ident) };
    }
    quote! {
        ::formbind::FieldTag {
            #(#entries)*
            .. ::formbind::FieldTag::new(#ident)
        }
    }
}
