//! Intermediate representation for the `Form` derive macro.
//!
//! Parsing fills these plain structures from `syn` input; validation and code
//! generation only ever look at the IR.

use proc_macro2::Span;
use syn::{Ident, Type};

/// How a field receives its values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// One raw value, coerced through `FormValue`.
    Scalar,
    /// `Vec<T>`: one element per submitted value. Carries the element type.
    Sequence(Type),
}

/// One annotation value together with where it was written.
#[derive(Debug, Clone)]
pub struct AttrValue {
    pub value: String,
    pub span: Span,
}

impl AttrValue {
    pub fn new(value: impl Into<String>, span: Span) -> Self {
        Self {
            value: value.into(),
            span,
        }
    }
}

/// Contents of a field's `#[form(..)]` attributes.
#[derive(Debug, Clone, Default)]
pub struct FormAttr {
    pub name: Option<AttrValue>,
    pub label: Option<AttrValue>,
    pub format: Option<AttrValue>,
    pub widget: Option<AttrValue>,
    pub required: Option<AttrValue>,
    pub regex: Option<AttrValue>,
    pub min_len: Option<AttrValue>,
    pub max_len: Option<AttrValue>,
    pub len: Option<AttrValue>,
    pub min_num: Option<AttrValue>,
    pub max_num: Option<AttrValue>,
    pub num: Option<AttrValue>,
    pub skip: Option<Span>,
}

impl FormAttr {
    /// `skip` or an explicit `name = "-"`.
    pub fn is_excluded(&self) -> bool {
        self.skip.is_some() || self.name.as_ref().is_some_and(|n| n.value == "-")
    }
}

#[derive(Debug, Clone)]
pub struct Field {
    pub ident: Ident,
    pub ty: Type,
    pub kind: FieldKind,
    pub attr: FormAttr,
    pub span: Span,
}

/// Parsed description of the whole derive input.
#[derive(Debug, Clone)]
pub struct DeriveInputIr {
    pub struct_ident: Ident,
    pub generics: syn::Generics,
    pub fields: Vec<Field>,
}
