//! The request-transport boundary.
//!
//! The reader only needs two lookups from a request: raw string values by key
//! ([`FormSource`]) and uploaded file parts by key ([`FileSource`]). Both may
//! return zero, one or many entries per key. [`FormInput`] is the in-memory
//! implementation used by the `http` adapter and by tests.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::error::TransportError;
use crate::multipart;

/// One uploaded file part of a multipart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    data: Arc<[u8]>,
}

impl UploadedFile {
    pub fn new(
        filename: impl Into<String>,
        content_type: Option<&str>,
        data: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.map(str::to_string),
            data: data.into(),
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

impl Default for UploadedFile {
    fn default() -> Self {
        Self::new(String::new(), None, Vec::new())
    }
}

/// Lookup of raw string values by key.
pub trait FormSource {
    /// Every value submitted under `key`, in submission order.
    fn form_values(&self, key: &str) -> Option<&[String]>;

    /// First value under `key`, or `""` when the key is absent.
    fn form_value(&self, key: &str) -> &str {
        self.form_values(key)
            .and_then(|values| values.first())
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Lookup of uploaded file parts, available after an explicit multipart parse.
pub trait FileSource {
    /// Decode the multipart body keeping at most `max_memory` bytes in
    /// memory. `Ok(None)` means the request carries no multipart body at all.
    /// A failed decode may be retried.
    fn parse_multipart_form(
        &mut self,
        max_memory: u64,
    ) -> Result<Option<&MultipartForm>, TransportError>;
}

/// Decoded multipart body: plain values and file parts, both keyed by part name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    pub(crate) values: HashMap<String, Vec<String>>,
    pub(crate) files: HashMap<String, Vec<UploadedFile>>,
}

impl MultipartForm {
    pub fn files(&self, key: &str) -> Option<&[UploadedFile]> {
        self.files.get(key).map(Vec::as_slice)
    }

    pub fn values(&self, key: &str) -> Option<&[String]> {
        self.values.get(key).map(Vec::as_slice)
    }

    /// `true` when no file part was uploaded.
    pub fn has_no_files(&self) -> bool {
        self.files.is_empty()
    }

    pub fn add_file(&mut self, key: impl Into<String>, file: UploadedFile) {
        self.files.entry(key.into()).or_default().push(file);
    }

    pub fn add_value(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.entry(key.into()).or_default().push(value.into());
    }
}

#[derive(Debug, Clone)]
struct PendingBody {
    boundary: String,
    body: Vec<u8>,
}

/// An in-memory form request.
///
/// A raw multipart body is decoded on first use, either by a value lookup or
/// by [`FileSource::parse_multipart_form`]. Only a successful decode is
/// cached, so a refused decode can be retried with a larger limit.
#[derive(Debug, Clone, Default)]
pub struct FormInput {
    values: HashMap<String, Vec<String>>,
    attached: MultipartForm,
    pending: Option<PendingBody>,
    multipart: OnceCell<MultipartForm>,
}

impl FormInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode an `application/x-www-form-urlencoded` string such as
    /// `a=1&a=2&b%5B%5D=3`.
    pub fn from_urlencoded(encoded: &str) -> Self {
        let mut input = Self::new();
        input.extend_urlencoded(encoded.as_bytes());
        input
    }

    pub(crate) fn extend_urlencoded(&mut self, encoded: &[u8]) {
        for (key, value) in url::form_urlencoded::parse(encoded) {
            self.append(key.into_owned(), value.into_owned());
        }
    }

    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.entry(key.into()).or_default().push(value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(key, value);
        self
    }

    /// Attach an uploaded file directly, bypassing body decoding.
    pub fn with_file(mut self, key: impl Into<String>, file: UploadedFile) -> Self {
        self.attached.add_file(key, file);
        self.multipart = OnceCell::new();
        self
    }

    /// Attach a raw `multipart/form-data` body.
    pub fn with_multipart_body(
        mut self,
        content_type: &str,
        body: impl Into<Vec<u8>>,
    ) -> Result<Self, TransportError> {
        let boundary =
            multipart::boundary(content_type).ok_or(TransportError::NotMultipart)?;
        self.pending = Some(PendingBody {
            boundary,
            body: body.into(),
        });
        self.multipart = OnceCell::new();
        Ok(self)
    }

    fn decoded(&self, max_memory: u64) -> Result<Option<&MultipartForm>, TransportError> {
        if self.pending.is_none() && self.attached.files.is_empty() {
            return Ok(None);
        }
        self.multipart
            .get_or_try_init(|| {
                let mut form = match &self.pending {
                    Some(pending) => {
                        multipart::parse(&pending.boundary, &pending.body, max_memory)?
                    }
                    None => MultipartForm::default(),
                };
                for (key, files) in &self.attached.files {
                    form.files
                        .entry(key.clone())
                        .or_default()
                        .extend(files.iter().cloned());
                }
                Ok(form)
            })
            .map(Some)
    }
}

impl FormSource for FormInput {
    /// Urlencoded and query values win; keys absent from them fall through
    /// to the text parts of a multipart body.
    fn form_values(&self, key: &str) -> Option<&[String]> {
        if let Some(values) = self.values.get(key) {
            return Some(values.as_slice());
        }
        match self.decoded(multipart::DEFAULT_MAX_MEMORY) {
            Ok(form) => form.and_then(|form| form.values(key)),
            Err(err) => {
                debug!(error = %err, key, "multipart body unavailable for value lookup");
                None
            }
        }
    }
}

impl FileSource for FormInput {
    fn parse_multipart_form(
        &mut self,
        max_memory: u64,
    ) -> Result<Option<&MultipartForm>, TransportError> {
        self.decoded(max_memory)
    }
}

impl<S: FormSource + ?Sized> FormSource for &S {
    fn form_values(&self, key: &str) -> Option<&[String]> {
        (**self).form_values(key)
    }
}

impl FormSource for HashMap<String, Vec<String>> {
    fn form_values(&self, key: &str) -> Option<&[String]> {
        self.get(key).map(Vec::as_slice)
    }
}
