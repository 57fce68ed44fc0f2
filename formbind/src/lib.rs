//! # formbind
//!
//! Declarative binding of form input (urlencoded fields, query parameters and
//! multipart file parts) onto plain Rust structs.
//!
//! Annotate a struct with `#[derive(Form)]` and per-field `#[form(..)]`
//! attributes; the reader then validates every raw value, converts it into
//! the field's type and assigns it in place. The first failing rule aborts the
//! whole read with a single, user-presentable message.
//!
//! ## Quick start
//!
//! ```rust
//! use formbind::{read_form, Form, FormInput};
//!
//! #[derive(Debug, Default, Form)]
//! struct SignUp {
//!     #[form(label = "Name", required, len = "2 20")]
//!     user_name: String,
//!
//!     #[form(label = "Age", num = "1 130")]
//!     age: u8,
//!
//!     // Collects `tags=a&tags=b` as well as `tags[]=a&tags[]=b`.
//!     tags: Vec<String>,
//!
//!     #[form(skip)]
//!     internal_id: u64,
//! }
//!
//! let input = FormInput::from_urlencoded("user_name=Ada&age=36&tags[]=math");
//! let mut form = SignUp::default();
//! read_form(&input, &mut form).unwrap();
//! assert_eq!(form.user_name, "Ada");
//! assert_eq!(form.age, 36);
//! assert_eq!(form.tags, vec!["math".to_string()]);
//!
//! let err = read_form(&FormInput::from_urlencoded("age=200"), &mut SignUp::default())
//!     .unwrap_err();
//! assert_eq!(err.to_string(), "Name（required）");
//! ```
//!
//! ## Architecture
//!
//! * [`Form`] – implemented by the derive macro; exposes the raw field
//!   annotations ([`FieldTag`]) and a mutable [`Slot`] per field.
//! * [`meta`] – turns annotations into cached [`FieldMeta`].
//! * [`validators`] – the rule library.
//! * [`coerce`] – [`FormValue`], the set of bindable value kinds.
//! * [`reader`] – [`read_form`], [`read_bindings`] and [`read_file_form`].
//! * [`source`] – the request boundary ([`FormSource`], [`FileSource`],
//!   [`FormInput`]).

extern crate self as formbind;

pub mod binding;
pub mod coerce;
pub mod date;
pub mod error;
pub mod meta;
pub mod multipart;
pub mod reader;
#[cfg(feature = "http")]
pub mod request;
pub mod source;
pub mod validators;

pub use binding::{bindings, Binding, ScalarSlot, SequenceSlot, Slot};
pub use coerce::{FormValue, ValueKind};
pub use date::DateTs;
pub use error::{BindError, CoerceError, ConfigError, TransportError};
pub use meta::{field_meta, metadata, prepare, FieldMeta, FieldTag};
pub use reader::{read_bindings, read_file_form, read_file_form_with, read_form, ReadOptions};
pub use source::{FileSource, FormInput, FormSource, MultipartForm, UploadedFile};
pub use validators::{Rule, Validator};

/// Derive macro implementing [`Form`]; see the `formbind-derive` crate docs.
pub use formbind_derive::Form;

pub mod prelude {
    pub use crate::{read_file_form, read_form, Form, FormInput, FormSource, FormValue};
}

/// A struct whose fields can be bound from form input.
///
/// Usually derived. `FIELDS` and the vector returned by `slots` must line up
/// one-to-one in declaration order; an excluded field may be represented by
/// [`Slot::Unbound`].
pub trait Form: 'static {
    const FIELDS: &'static [FieldTag];

    fn slots(&mut self) -> Vec<Slot<'_>>;
}
