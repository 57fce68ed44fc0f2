//! Value coercion engine.
//!
//! [`FormValue`] is the closed set of kinds a form field may hold. The engine
//! entry point is [`assign`]: an empty raw value is always a no-op, anything
//! else is parsed according to the destination's kind.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::error::CoerceError;
use crate::source::UploadedFile;

/// Runtime kind of a bindable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Int,
    Uint,
    Float,
    Text,
    Bool,
    Temporal,
    /// A user type providing its own parser.
    Custom,
    /// An uploaded multipart file handle.
    File,
}

/// Conversion of one raw form string into a field value.
///
/// Implement this for your own types to make them bindable; `format` is the
/// field's `format` annotation, empty when none was given.
pub trait FormValue: Sized {
    const KIND: ValueKind = ValueKind::Custom;

    fn from_form_value(value: &str, format: &str) -> Result<Self, CoerceError>;

    /// Build the value from an uploaded file. Only file handles accept uploads.
    fn from_upload(_file: &UploadedFile) -> Option<Self> {
        None
    }
}

/// Coerce `raw` into `slot`. Empty input leaves the slot untouched.
pub fn assign<T: FormValue>(slot: &mut T, raw: &str, format: &str) -> Result<(), CoerceError> {
    if raw.is_empty() {
        return Ok(());
    }
    *slot = T::from_form_value(raw, format)?;
    Ok(())
}

macro_rules! impl_integer {
    ($kind:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl FormValue for $ty {
                const KIND: ValueKind = $kind;

                fn from_form_value(value: &str, _format: &str) -> Result<Self, CoerceError> {
                    value.parse::<$ty>().map_err(|source| CoerceError::Int {
                        value: value.to_string(),
                        source,
                    })
                }
            }
        )+
    };
}

impl_integer!(ValueKind::Int => i8, i16, i32, i64, i128, isize);
impl_integer!(ValueKind::Uint => u8, u16, u32, u64, u128, usize);

macro_rules! impl_float {
    ($($ty:ty),+) => {
        $(
            impl FormValue for $ty {
                const KIND: ValueKind = ValueKind::Float;

                fn from_form_value(value: &str, _format: &str) -> Result<Self, CoerceError> {
                    value.parse::<$ty>().map_err(|source| CoerceError::Float {
                        value: value.to_string(),
                        source,
                    })
                }
            }
        )+
    };
}

impl_float!(f32, f64);

impl FormValue for String {
    const KIND: ValueKind = ValueKind::Text;

    fn from_form_value(value: &str, _format: &str) -> Result<Self, CoerceError> {
        Ok(value.to_string())
    }
}

/// Words that bind to `true`; compared case-insensitively.
const AFFIRMATIVE: [&str; 5] = ["true", "是", "yes", "y", "on"];

impl FormValue for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn from_form_value(value: &str, _format: &str) -> Result<Self, CoerceError> {
        let value = value.to_lowercase();
        Ok(AFFIRMATIVE.contains(&value.as_str()))
    }
}

fn or_default<'a>(format: &'a str, default: &'a str) -> &'a str {
    if format.is_empty() {
        default
    } else {
        format
    }
}

fn temporal_error(value: &str, format: &str, source: chrono::ParseError) -> CoerceError {
    CoerceError::Temporal {
        value: value.to_string(),
        format: format.to_string(),
        source,
    }
}

impl FormValue for NaiveDate {
    const KIND: ValueKind = ValueKind::Temporal;

    fn from_form_value(value: &str, format: &str) -> Result<Self, CoerceError> {
        let format = or_default(format, "%Y-%m-%d");
        NaiveDate::parse_from_str(value, format).map_err(|e| temporal_error(value, format, e))
    }
}

impl FormValue for NaiveDateTime {
    const KIND: ValueKind = ValueKind::Temporal;

    fn from_form_value(value: &str, format: &str) -> Result<Self, CoerceError> {
        let format = or_default(format, "%Y-%m-%d %H:%M:%S");
        NaiveDateTime::parse_from_str(value, format).map_err(|e| temporal_error(value, format, e))
    }
}

impl FormValue for NaiveTime {
    const KIND: ValueKind = ValueKind::Temporal;

    fn from_form_value(value: &str, format: &str) -> Result<Self, CoerceError> {
        let format = or_default(format, "%H:%M:%S");
        NaiveTime::parse_from_str(value, format).map_err(|e| temporal_error(value, format, e))
    }
}

impl FormValue for DateTime<FixedOffset> {
    const KIND: ValueKind = ValueKind::Temporal;

    fn from_form_value(value: &str, format: &str) -> Result<Self, CoerceError> {
        if format.is_empty() {
            DateTime::parse_from_rfc3339(value).map_err(|e| temporal_error(value, "rfc3339", e))
        } else {
            DateTime::parse_from_str(value, format).map_err(|e| temporal_error(value, format, e))
        }
    }
}

impl FormValue for DateTime<Utc> {
    const KIND: ValueKind = ValueKind::Temporal;

    /// A custom format without an offset is read as UTC wall-clock time.
    fn from_form_value(value: &str, format: &str) -> Result<Self, CoerceError> {
        if format.is_empty() {
            return DateTime::parse_from_rfc3339(value)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| temporal_error(value, "rfc3339", e));
        }
        match DateTime::parse_from_str(value, format) {
            Ok(dt) => Ok(dt.with_timezone(&Utc)),
            Err(_) => NaiveDateTime::parse_from_str(value, format)
                .map(|naive| Utc.from_utc_datetime(&naive))
                .map_err(|e| temporal_error(value, format, e)),
        }
    }
}

impl<T: FormValue> FormValue for Option<T> {
    const KIND: ValueKind = T::KIND;

    fn from_form_value(value: &str, format: &str) -> Result<Self, CoerceError> {
        T::from_form_value(value, format).map(Some)
    }

    fn from_upload(file: &UploadedFile) -> Option<Self> {
        T::from_upload(file).map(Some)
    }
}

impl<T: FormValue> FormValue for Box<T> {
    const KIND: ValueKind = T::KIND;

    fn from_form_value(value: &str, format: &str) -> Result<Self, CoerceError> {
        T::from_form_value(value, format).map(Box::new)
    }

    fn from_upload(file: &UploadedFile) -> Option<Self> {
        T::from_upload(file).map(Box::new)
    }
}

impl FormValue for UploadedFile {
    const KIND: ValueKind = ValueKind::File;

    fn from_form_value(_value: &str, _format: &str) -> Result<Self, CoerceError> {
        Err(CoerceError::Unsupported)
    }

    fn from_upload(file: &UploadedFile) -> Option<Self> {
        Some(file.clone())
    }
}
