//! Field metadata resolution and the process-wide metadata cache.
//!
//! A form type declares one [`FieldTag`] per field: the raw annotation strings
//! written on the field. [`field_meta`] turns a tag into a [`FieldMeta`] the
//! first time a `(form type, field)` pair is seen and serves the cached value
//! afterwards.

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::Lazy;
use tracing::debug;

use crate::error::ConfigError;
use crate::validators::{self, Validator};
use crate::Form;

/// External name that removes a field from binding.
pub const EXCLUDED: &str = "-";

/// Widget hint used when a field does not declare one.
pub const DEFAULT_WIDGET: &str = "textbox";

/// Annotation strings attached to one field of a form type.
///
/// `None` and `Some("")` both mean "not annotated".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldTag {
    /// Declared field name.
    pub ident: &'static str,
    pub name: Option<&'static str>,
    pub label: Option<&'static str>,
    pub format: Option<&'static str>,
    pub widget: Option<&'static str>,
    pub required: Option<&'static str>,
    pub regex: Option<&'static str>,
    pub min_len: Option<&'static str>,
    pub max_len: Option<&'static str>,
    pub len: Option<&'static str>,
    pub min_num: Option<&'static str>,
    pub max_num: Option<&'static str>,
    pub num: Option<&'static str>,
}

impl FieldTag {
    /// A tag with no annotations.
    pub const fn new(ident: &'static str) -> Self {
        Self {
            ident,
            name: None,
            label: None,
            format: None,
            widget: None,
            required: None,
            regex: None,
            min_len: None,
            max_len: None,
            len: None,
            min_num: None,
            max_num: None,
            num: None,
        }
    }
}

fn annotated(value: Option<&'static str>) -> Option<&'static str> {
    value.filter(|v| !v.is_empty())
}

/// Resolved, immutable binding metadata of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FieldMeta {
    pub name: String,
    pub label: String,
    pub format: String,
    pub widget: String,
    #[cfg_attr(feature = "serde", serde(serialize_with = "serialize_rules"))]
    pub validators: Vec<Validator>,
}

#[cfg(feature = "serde")]
fn serialize_rules<S>(validators: &[Validator], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_seq(validators.iter().map(Validator::rule))
}

impl FieldMeta {
    /// Derive metadata from a field's annotations.
    pub fn from_tag(tag: &FieldTag) -> Result<Self, ConfigError> {
        Ok(Self {
            name: annotated(tag.name)
                .map(str::to_string)
                .unwrap_or_else(|| to_snake(tag.ident)),
            label: annotated(tag.label).unwrap_or(tag.ident).to_string(),
            format: annotated(tag.format).unwrap_or_default().to_string(),
            widget: annotated(tag.widget).unwrap_or(DEFAULT_WIDGET).to_string(),
            validators: validator_chain(tag)?,
        })
    }

    pub fn is_excluded(&self) -> bool {
        self.name == EXCLUDED
    }
}

/// `UserName` → `user_name`: every upper-case ASCII letter after the first
/// character starts a new `_`-separated segment.
pub fn to_snake(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len() + 4);
    for ch in ident.chars() {
        if ch.is_ascii_uppercase() {
            if !out.is_empty() {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

fn integer<T: std::str::FromStr>(
    tag: &FieldTag,
    key: &'static str,
    value: &'static str,
) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidInteger {
        field: tag.ident,
        key,
        value,
    })
}

fn pair<T: std::str::FromStr>(
    tag: &FieldTag,
    key: &'static str,
    value: &'static str,
) -> Result<(T, T), ConfigError> {
    let err = || ConfigError::InvalidRange {
        field: tag.ident,
        key,
        value,
    };
    let mut parts = value.split_whitespace();
    let (Some(min), Some(max), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(err());
    };
    Ok((min.parse().map_err(|_| err())?, max.parse().map_err(|_| err())?))
}

/// Validators in their fixed order: required, regex, min length, max length,
/// length range, min number, max number, number range.
fn validator_chain(tag: &FieldTag) -> Result<Vec<Validator>, ConfigError> {
    let mut chain = Vec::new();
    if let Some(required) = annotated(tag.required) {
        if required != "false" {
            chain.push(validators::required());
        }
    }
    if let Some(pattern) = annotated(tag.regex) {
        chain.push(validators::regex(pattern));
    }
    if let Some(v) = annotated(tag.min_len) {
        chain.push(validators::length_gt(integer(tag, "min_len", v)?));
    }
    if let Some(v) = annotated(tag.max_len) {
        chain.push(validators::length_lt(integer(tag, "max_len", v)?));
    }
    if let Some(v) = annotated(tag.len) {
        let (min, max) = pair(tag, "len", v)?;
        chain.push(validators::length_range(min, max));
    }
    if let Some(v) = annotated(tag.min_num) {
        chain.push(validators::number_gt(integer(tag, "min_num", v)?));
    }
    if let Some(v) = annotated(tag.max_num) {
        chain.push(validators::number_lt(integer(tag, "max_num", v)?));
    }
    if let Some(v) = annotated(tag.num) {
        let (min, max) = pair(tag, "num", v)?;
        chain.push(validators::number_range(min, max));
    }
    Ok(chain)
}

type MetaKey = (TypeId, &'static str);

static FIELD_META: Lazy<RwLock<HashMap<MetaKey, Arc<FieldMeta>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Resolve the metadata of one field of `F`, computing it on first use.
///
/// Two threads missing on the same key may both compute it; the results are
/// identical so the later insert simply replaces an equal value.
pub fn field_meta<F: Form>(tag: &FieldTag) -> Result<Arc<FieldMeta>, ConfigError> {
    let key = (TypeId::of::<F>(), tag.ident);
    {
        let cache = FIELD_META.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(meta) = cache.get(&key) {
            return Ok(Arc::clone(meta));
        }
    }

    let meta = Arc::new(FieldMeta::from_tag(tag)?);
    debug!(
        form = type_name::<F>(),
        field = tag.ident,
        name = %meta.name,
        validators = meta.validators.len(),
        "resolved field metadata"
    );
    FIELD_META
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(key, Arc::clone(&meta));
    Ok(meta)
}

/// Metadata of every declared field of `F`, in declaration order, excluded
/// fields included.
pub fn metadata<F: Form>() -> Result<Vec<Arc<FieldMeta>>, ConfigError> {
    F::FIELDS.iter().map(field_meta::<F>).collect()
}

/// Resolve and cache all of `F`'s metadata up front so declaration mistakes
/// surface at startup rather than on the first request.
pub fn prepare<F: Form>() -> Result<(), ConfigError> {
    metadata::<F>().map(|_| ())
}
