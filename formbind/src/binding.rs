//! Binding descriptors: a live, mutable reference to one field paired with its
//! resolved metadata.

use std::any::type_name;
use std::sync::Arc;

use crate::coerce::{assign, FormValue, ValueKind};
use crate::error::{CoerceError, ConfigError};
use crate::meta::{field_meta, FieldMeta, DEFAULT_WIDGET};
use crate::source::UploadedFile;
use crate::validators::{self, Validator};
use crate::Form;

/// A single-valued destination.
pub trait ScalarSlot {
    fn kind(&self) -> ValueKind;
    fn assign(&mut self, raw: &str, format: &str) -> Result<(), CoerceError>;
}

impl<T: FormValue> ScalarSlot for T {
    fn kind(&self) -> ValueKind {
        T::KIND
    }

    fn assign(&mut self, raw: &str, format: &str) -> Result<(), CoerceError> {
        assign(self, raw, format)
    }
}

/// A growable, ordered destination receiving one element per raw value.
pub trait SequenceSlot {
    fn element_kind(&self) -> ValueKind;
    /// Append a default element and coerce `raw` into it.
    fn push_value(&mut self, raw: &str, format: &str) -> Result<(), CoerceError>;
    /// Append an uploaded file; `false` when the element type cannot hold one.
    fn push_file(&mut self, file: &UploadedFile) -> bool;
}

impl<T: FormValue + Default> SequenceSlot for Vec<T> {
    fn element_kind(&self) -> ValueKind {
        T::KIND
    }

    fn push_value(&mut self, raw: &str, format: &str) -> Result<(), CoerceError> {
        let mut elem = T::default();
        assign(&mut elem, raw, format)?;
        self.push(elem);
        Ok(())
    }

    fn push_file(&mut self, file: &UploadedFile) -> bool {
        match T::from_upload(file) {
            Some(elem) => {
                self.push(elem);
                true
            }
            None => false,
        }
    }
}

/// Mutable access to one field of a form instance.
pub enum Slot<'a> {
    Scalar(&'a mut dyn ScalarSlot),
    Sequence(&'a mut dyn SequenceSlot),
    /// Placeholder for a field that is excluded from binding.
    Unbound,
}

impl<'a> Slot<'a> {
    pub fn scalar<T: FormValue>(value: &'a mut T) -> Self {
        Slot::Scalar(value)
    }

    pub fn sequence<T: FormValue + Default>(values: &'a mut Vec<T>) -> Self {
        Slot::Sequence(values)
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Slot::Sequence(_))
    }
}

impl std::fmt::Debug for Slot<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::Scalar(s) => f.debug_tuple("Scalar").field(&s.kind()).finish(),
            Slot::Sequence(s) => f.debug_tuple("Sequence").field(&s.element_kind()).finish(),
            Slot::Unbound => f.write_str("Unbound"),
        }
    }
}

/// A field reference plus the metadata that drives reading it.
///
/// Descriptors borrow the form instance they were built from and are consumed
/// by a single read.
#[derive(Debug)]
pub struct Binding<'a> {
    pub(crate) slot: Slot<'a>,
    pub(crate) meta: Arc<FieldMeta>,
}

impl<'a> Binding<'a> {
    /// Hand-built descriptor for ad-hoc reads outside a [`Form`] type.
    pub fn new(
        slot: Slot<'a>,
        name: &str,
        label: &str,
        format: &str,
        validators: impl IntoIterator<Item = Validator>,
    ) -> Self {
        Self {
            slot,
            meta: Arc::new(FieldMeta {
                name: name.to_string(),
                label: label.to_string(),
                format: format.to_string(),
                widget: DEFAULT_WIDGET.to_string(),
                validators: validators.into_iter().collect(),
            }),
        }
    }

    /// Descriptor labelled by its name with a single regex validator.
    pub fn with_regex(slot: Slot<'a>, name: &str, pattern: &str) -> Self {
        Self::new(slot, name, name, "", [validators::regex(pattern)])
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    pub fn label(&self) -> &str {
        &self.meta.label
    }

    pub fn format(&self) -> &str {
        &self.meta.format
    }

    pub fn validators(&self) -> &[Validator] {
        &self.meta.validators
    }

    pub fn meta(&self) -> &FieldMeta {
        &self.meta
    }

    pub fn slot(&self) -> &Slot<'a> {
        &self.slot
    }
}

/// Build descriptors for every non-excluded field of `form`, in declaration
/// order.
pub fn bindings<F: Form>(form: &mut F) -> Result<Vec<Binding<'_>>, ConfigError> {
    let slots = form.slots();
    if slots.len() != F::FIELDS.len() {
        return Err(ConfigError::SlotMismatch {
            form: type_name::<F>(),
            declared: F::FIELDS.len(),
            slots: slots.len(),
        });
    }

    let mut out = Vec::with_capacity(slots.len());
    for (tag, slot) in F::FIELDS.iter().zip(slots) {
        let meta = field_meta::<F>(tag)?;
        if meta.is_excluded() || matches!(slot, Slot::Unbound) {
            continue;
        }
        out.push(Binding { slot, meta });
    }
    Ok(out)
}
