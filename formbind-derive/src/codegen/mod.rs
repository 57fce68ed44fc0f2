pub mod field_tag;

use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};
use syn::{parse_quote, WherePredicate};

use crate::ir::{DeriveInputIr, Field, FieldKind};

/// Slot expression handing out `&mut self.<field>`.
fn slot(field: &Field) -> TokenStream {
    let ident = &field.ident;
    if field.attr.is_excluded() {
        return quote! { ::formbind::Slot::Unbound };
    }
    match field.kind {
        FieldKind::Scalar => quote_spanned! {field.span=> ::formbind::Slot::scalar(&mut self.#ident) },
        FieldKind::Sequence(_) => {
            quote_spanned! {field.span=> ::formbind::Slot::sequence(&mut self.#ident) }
        }
    }
}

/// Bounds a generic struct needs for its bound fields to be coercible.
fn field_bounds(field: &Field) -> Option<WherePredicate> {
    if field.attr.is_excluded() {
        return None;
    }
    Some(match &field.kind {
        FieldKind::Scalar => {
            let ty = &field.ty;
            parse_quote!(#ty: ::formbind::FormValue)
        }
        FieldKind::Sequence(elem) => {
            parse_quote!(#elem: ::formbind::FormValue + ::core::default::Default)
        }
    })
}

/// Assemble the `impl ::formbind::Form` block for the target struct.
pub fn expand(ir: &DeriveInputIr) -> TokenStream {
    let struct_ident = &ir.struct_ident;

    // `Form: 'static`, so every type parameter must be too.
    let mut generics = ir.generics.clone();
    let has_type_params = generics.type_params().next().is_some();
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!('static));
    }
    if has_type_params {
        let where_clause = generics.make_where_clause();
        where_clause
            .predicates
            .extend(ir.fields.iter().filter_map(field_bounds));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let tags = ir.fields.iter().map(field_tag::build);
    let slots = ir.fields.iter().map(slot);

    quote! {
        #[automatically_derived]
        impl #impl_generics ::formbind::Form for #struct_ident #ty_generics #where_clause {
            const FIELDS: &'static [::formbind::FieldTag] = &[
                #( #tags ),*
            ];

            fn slots(&mut self) -> ::std::vec::Vec<::formbind::Slot<'_>> {
                ::std::vec![
                    #( #slots ),*
                ]
            }
        }
    }
}
