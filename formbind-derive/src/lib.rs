mod codegen;
mod ir;
mod parse;
mod validate;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derive macro implementing [`Form`] for a struct with named fields, making
/// it a target for `read_form` and `read_file_form`.
///
/// # How it works
///
/// The macro records each field's `#[form(..)]` annotations as a
/// [`FieldTag`] constant and emits a `slots` method handing out a mutable
/// reference to every field in declaration order. At request time the reader
/// resolves the tags into cached metadata, validates each raw value and
/// coerces it into the field through `FormValue`.
///
/// # Supported field types
///
/// | Rust type           | Behaviour                                                        |
/// | ------------------- | ---------------------------------------------------------------- |
/// | `T: FormValue`      | Bound from the first value submitted under the field's name.     |
/// | `Vec<T>`            | One element per value under `name`, falling back to `name[]`.    |
/// | `Vec<UploadedFile>` | Receives uploaded files in `read_file_form`.                     |
/// | anything, `skip`ped | Ignored entirely.                                                |
///
/// A field whose type does not implement `FormValue` fails to compile.
///
/// # `#[form(..)]` attribute
///
/// ## Flags
///   * `skip` – exclude the field, same as `name = "-"`.
///   * `required` – reject an empty or missing value.
///
/// ## Key/Value Pairs
///   * `name = "..."` – external name. Defaults to the field name in
///     snake_case.
///   * `label = "..."` – display label used in error messages. Defaults to
///     the field identifier.
///   * `format = "..."` – chrono format string for temporal fields.
///   * `widget = "..."` – rendering hint, `"textbox"` by default.
///   * `required = "false" | false` – explicitly not required.
///   * `regex = "..."` – the raw value must match the pattern.
///   * `min_len = N`, `max_len = N` – byte length bounds.
///   * `len = "min max"` – inclusive byte length range.
///   * `min_num = N`, `max_num = N` – numeric bounds.
///   * `num = "min max"` – inclusive numeric range.
///
/// Integer annotations and ranges are checked at compile time.
///
/// # Example
///
/// ```rust,ignore
/// use formbind::{Form, UploadedFile};
///
/// #[derive(Default, Form)]
/// struct Profile {
///     #[form(label = "Nickname", required, len = "2 16")]
///     nick_name: String,
///
///     #[form(name = "yob", num = "1900 2100")]
///     year_of_birth: u16,
///
///     avatar: Vec<UploadedFile>,
///
///     #[form(skip)]
///     cached_score: f64,
/// }
/// ```
///
/// [`Form`]: https://docs.rs/formbind/latest/formbind/trait.Form.html
/// [`FieldTag`]: https://docs.rs/formbind/latest/formbind/meta/struct.FieldTag.html
#[proc_macro_derive(Form, attributes(form))]
pub fn derive_form(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);

    let ir = match parse::derive_input_to_ir(&input) {
        Ok(ir) => ir,
        Err(e) => return e.to_compile_error().into(),
    };
    if let Err(e) = validate::check(&ir) {
        return e.to_compile_error().into();
    }

    codegen::expand(&ir).into()
}
