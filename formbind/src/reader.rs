//! Request reader: drives validation and coercion over a list of bindings.

use tracing::{debug, trace};

use crate::binding::{bindings, Binding, Slot};
use crate::coerce::ValueKind;
use crate::error::{BindError, ConfigError};
use crate::meta::FieldMeta;
use crate::multipart::DEFAULT_MAX_MEMORY;
use crate::source::{FileSource, FormSource};
use crate::Form;

/// Tunables for reading file uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    /// Upper bound on multipart part data held in memory.
    pub max_memory: u64,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            max_memory: DEFAULT_MAX_MEMORY,
        }
    }
}

/// Name under which multi-valued fields may also be submitted (`tags[]`).
fn bracketed(name: &str) -> String {
    format!("{name}[]")
}

fn rejected(meta: &FieldMeta, message: String) -> BindError {
    let message = if message.is_empty() {
        "not valid".to_string()
    } else {
        message
    };
    let label = if meta.label.is_empty() {
        meta.name.clone()
    } else {
        meta.label.clone()
    };
    debug!(field = %meta.name, reason = %message, "form value rejected");
    BindError::Rejected {
        field: meta.name.clone(),
        label,
        message,
    }
}

fn validate(meta: &FieldMeta, raw: &str) -> Result<(), BindError> {
    for validator in &meta.validators {
        validator
            .validate(raw)
            .map_err(|message| rejected(meta, message))?;
    }
    Ok(())
}

fn coerce_error(meta: &FieldMeta, source: crate::error::CoerceError) -> BindError {
    debug!(field = %meta.name, error = %source, "form value could not be converted");
    let label = if meta.label.is_empty() {
        meta.name.clone()
    } else {
        meta.label.clone()
    };
    BindError::Coerce {
        field: meta.name.clone(),
        label,
        source,
    }
}

fn read_one<S: FormSource + ?Sized>(source: &S, binding: Binding<'_>) -> Result<(), BindError> {
    let Binding { slot, meta } = binding;
    match slot {
        Slot::Sequence(seq) => {
            let Some(values) = source
                .form_values(&meta.name)
                .or_else(|| source.form_values(&bracketed(&meta.name)))
            else {
                trace!(field = %meta.name, "no values submitted");
                return Ok(());
            };
            trace!(field = %meta.name, count = values.len(), "binding sequence");
            for raw in values {
                validate(&meta, raw)?;
                seq.push_value(raw, &meta.format)
                    .map_err(|e| coerce_error(&meta, e))?;
            }
        }
        Slot::Scalar(scalar) => {
            let raw = source.form_value(&meta.name);
            trace!(field = %meta.name, "binding scalar");
            validate(&meta, raw)?;
            scalar
                .assign(raw, &meta.format)
                .map_err(|e| coerce_error(&meta, e))?;
        }
        Slot::Unbound => {}
    }
    Ok(())
}

/// Populate each binding in order, stopping at the first rejection.
pub fn read_bindings<'a, S, I>(source: &S, bindings: I) -> Result<(), BindError>
where
    S: FormSource + ?Sized,
    I: IntoIterator<Item = Binding<'a>>,
{
    for binding in bindings {
        read_one(source, binding)?;
    }
    Ok(())
}

/// Bind `source` onto every non-excluded field of `form`.
pub fn read_form<F: Form, S: FormSource + ?Sized>(source: &S, form: &mut F) -> Result<(), BindError> {
    read_bindings(source, bindings(form)?)
}

/// Bind uploaded files onto `form` using the default in-memory limit.
pub fn read_file_form<F: Form, S: FileSource + ?Sized>(
    source: &mut S,
    form: &mut F,
) -> Result<(), BindError> {
    read_file_form_with(source, form, &ReadOptions::default())
}

/// Bind uploaded files onto `form`.
///
/// Every bound field must be a sequence of file handles. This is checked
/// before the body is decoded. Files are assigned as-is with no validation
/// or coercion.
pub fn read_file_form_with<F: Form, S: FileSource + ?Sized>(
    source: &mut S,
    form: &mut F,
    options: &ReadOptions,
) -> Result<(), BindError> {
    let mut targets = Vec::new();
    for Binding { slot, meta } in bindings(form)? {
        match slot {
            Slot::Sequence(seq) if seq.element_kind() == ValueKind::File => {
                targets.push((seq, meta));
            }
            Slot::Unbound => {}
            _ => {
                return Err(ConfigError::NotAFileField {
                    field: meta.name.clone(),
                }
                .into())
            }
        }
    }

    let files = match source.parse_multipart_form(options.max_memory)? {
        Some(files) if !files.has_no_files() => files,
        _ => return Err(BindError::NoFileUpload),
    };

    for (seq, meta) in targets {
        let Some(parts) = files
            .files(&meta.name)
            .or_else(|| files.files(&bracketed(&meta.name)))
        else {
            continue;
        };
        trace!(field = %meta.name, count = parts.len(), "binding uploaded files");
        for part in parts {
            if !seq.push_file(part) {
                return Err(ConfigError::NotAFileField {
                    field: meta.name.clone(),
                }
                .into());
            }
        }
    }
    Ok(())
}
