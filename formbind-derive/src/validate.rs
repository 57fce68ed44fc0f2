//! Semantic checks for the `Form` IR.
//!
//! Numeric annotations are checked here so that a malformed declaration fails
//! the build rather than the first request.

use std::str::FromStr;

use syn::Error;

use crate::ir::{AttrValue, DeriveInputIr};

pub fn check(ir: &DeriveInputIr) -> syn::Result<()> {
    if let Some(lt) = ir.generics.lifetimes().next() {
        return Err(Error::new(
            lt.lifetime.span(),
            "Form cannot be derived for structs with lifetime parameters",
        ));
    }

    for field in &ir.fields {
        let attr = &field.attr;

        if let (Some(skip), Some(_)) = (attr.skip, &attr.name) {
            return Err(Error::new(skip, "`skip` cannot be combined with `name`"));
        }

        integer::<usize>("min_len", &attr.min_len)?;
        integer::<usize>("max_len", &attr.max_len)?;
        range::<usize>("len", &attr.len)?;
        integer::<i64>("min_num", &attr.min_num)?;
        integer::<i64>("max_num", &attr.max_num)?;
        range::<i64>("num", &attr.num)?;
    }

    Ok(())
}

fn integer<T: FromStr>(key: &str, value: &Option<AttrValue>) -> syn::Result<()> {
    let Some(v) = value else {
        return Ok(());
    };
    if v.value.is_empty() || v.value.trim().parse::<T>().is_ok() {
        return Ok(());
    }
    Err(Error::new(
        v.span,
        format!("`{key}` expects an integer, found \"{}\"", v.value),
    ))
}

/// Exactly two whitespace-separated integers, e.g. `"1 10"`.
fn range<T: FromStr>(key: &str, value: &Option<AttrValue>) -> syn::Result<()> {
    let Some(v) = value else {
        return Ok(());
    };
    if v.value.is_empty() {
        return Ok(());
    }
    let parts: Vec<&str> = v.value.split_whitespace().collect();
    let ok = parts.len() == 2 && parts.iter().all(|p| p.parse::<T>().is_ok());
    if ok {
        return Ok(());
    }
    Err(Error::new(
        v.span,
        format!("`{key}` expects two integers \"min max\", found \"{}\"", v.value),
    ))
}
