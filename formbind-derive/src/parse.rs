//! Parsing routines converting `syn::DeriveInput` into the crate's IR.
//!
//! Only syntax is checked here. Numeric annotations and attribute
//! combinations are verified by the `validate` module.

use syn::meta::ParseNestedMeta;
use syn::{spanned::Spanned, Expr, GenericArgument, Lit, PathArguments, Type, UnOp};

use crate::ir::{AttrValue, DeriveInputIr, Field, FieldKind, FormAttr};

pub fn derive_input_to_ir(input: &syn::DeriveInput) -> syn::Result<DeriveInputIr> {
    let fields_named = match &input.data {
        syn::Data::Struct(data) => match &data.fields {
            syn::Fields::Named(named) => &named.named,
            other => {
                return Err(syn::Error::new(
                    other.span(),
                    "Form only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new(
                input.ident.span(),
                "Form can only be derived for structs",
            ));
        }
    };

    let mut fields = Vec::with_capacity(fields_named.len());
    for field in fields_named {
        let Some(ident) = field.ident.clone() else {
            return Err(syn::Error::new(field.span(), "expected a named field"));
        };

        let mut attr = FormAttr::default();
        for attr_syn in &field.attrs {
            if attr_syn.path().is_ident("form") {
                parse_form_attr(attr_syn, &mut attr)?;
            }
        }

        let kind = match extract_vec_elem(&field.ty) {
            Some(elem) => FieldKind::Sequence(elem.clone()),
            None => FieldKind::Scalar,
        };

        fields.push(Field {
            ident,
            ty: field.ty.clone(),
            kind,
            attr,
            span: field.span(),
        });
    }

    Ok(DeriveInputIr {
        struct_ident: input.ident.clone(),
        generics: input.generics.clone(),
        fields,
    })
}

/// Fill `raw` from one `#[form(..)]` attribute. Keys repeated across several
/// attributes on the same field count as duplicates too.
fn parse_form_attr(attr: &syn::Attribute, raw: &mut FormAttr) -> syn::Result<()> {
    attr.parse_nested_meta(|meta| {
        let key = meta
            .path
            .get_ident()
            .map(ToString::to_string)
            .unwrap_or_default();

        if key == "skip" {
            if raw.skip.is_some() {
                return Err(meta.error("duplicate `skip` flag"));
            }
            raw.skip = Some(meta.path.span());
            return Ok(());
        }

        let slot = match key.as_str() {
            "name" => &mut raw.name,
            "label" => &mut raw.label,
            "format" => &mut raw.format,
            "widget" => &mut raw.widget,
            "required" => &mut raw.required,
            "regex" => &mut raw.regex,
            "min_len" => &mut raw.min_len,
            "max_len" => &mut raw.max_len,
            "len" => &mut raw.len,
            "min_num" => &mut raw.min_num,
            "max_num" => &mut raw.max_num,
            "num" => &mut raw.num,
            _ => return Err(meta.error("unknown key in #[form] attribute")),
        };
        if slot.is_some() {
            return Err(meta.error(format!("duplicate `{key}` attribute")));
        }

        // `required` may be written as a bare flag.
        if meta.input.is_empty() || meta.input.peek(syn::Token![,]) {
            if key != "required" {
                return Err(meta.error(format!("`{key}` expects a value")));
            }
            *slot = Some(AttrValue::new("true", meta.path.span()));
            return Ok(());
        }

        *slot = Some(literal_value(&meta)?);
        Ok(())
    })
}

/// Accepts string, integer (optionally negated) and boolean literals.
fn literal_value(meta: &ParseNestedMeta<'_>) -> syn::Result<AttrValue> {
    let expr: Expr = meta.value()?.parse()?;
    let span = expr.span();
    match &expr {
        Expr::Lit(lit) => match &lit.lit {
            Lit::Str(s) => Ok(AttrValue::new(s.value(), span)),
            Lit::Int(i) => Ok(AttrValue::new(i.base10_digits(), span)),
            Lit::Bool(b) => Ok(AttrValue::new(b.value.to_string(), span)),
            _ => Err(syn::Error::new(
                span,
                "expected a string, integer or boolean literal",
            )),
        },
        Expr::Unary(unary) if matches!(unary.op, UnOp::Neg(_)) => match &*unary.expr {
            Expr::Lit(syn::ExprLit {
                lit: Lit::Int(i), ..
            }) => Ok(AttrValue::new(format!("-{}", i.base10_digits()), span)),
            _ => Err(syn::Error::new(span, "expected an integer literal")),
        },
        _ => Err(syn::Error::new(
            span,
            "expected a string, integer or boolean literal",
        )),
    }
}

/// Element type `T` of a `Vec<T>` field, matched on the last path segment.
pub(crate) fn extract_vec_elem(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let seg = type_path.path.segments.last()?;
    if seg.ident != "Vec" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &seg.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(elem) => Some(elem),
        _ => None,
    }
}
