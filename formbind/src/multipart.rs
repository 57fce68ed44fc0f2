//! `multipart/form-data` decoding on top of `multer`.
//!
//! Parts carrying a `filename` become [`UploadedFile`]s, the rest become plain
//! form values. Everything is kept in memory; a body larger than the
//! configured limit is refused instead of being spooled to disk.

use std::convert::Infallible;

use futures::executor::block_on;
use futures::stream;
use multer::{Constraints, Multipart, SizeLimit};
use tracing::debug;

use crate::error::TransportError;
use crate::source::{MultipartForm, UploadedFile};

/// Default in-memory budget for multipart bodies (32 MiB).
pub const DEFAULT_MAX_MEMORY: u64 = 32 << 20;

/// Extract the boundary from a `multipart/form-data` content type.
pub fn boundary(content_type: &str) -> Option<String> {
    multer::parse_boundary(content_type)
        .ok()
        .filter(|b| !b.is_empty())
}

/// Decode `body` delimited by `boundary`, refusing bodies over `max_memory` bytes.
pub fn parse(boundary: &str, body: &[u8], max_memory: u64) -> Result<MultipartForm, TransportError> {
    let data = body.to_vec();
    let chunks = stream::once(async move { Ok::<_, Infallible>(data) });
    let constraints = Constraints::new().size_limit(SizeLimit::new().whole_stream(max_memory));
    let multipart = Multipart::with_constraints(chunks, boundary, constraints);

    let form = block_on(collect(multipart, max_memory))?;
    debug!(
        files = form.files.values().map(Vec::len).sum::<usize>(),
        values = form.values.values().map(Vec::len).sum::<usize>(),
        bytes = body.len(),
        "decoded multipart body"
    );
    Ok(form)
}

async fn collect(mut multipart: Multipart<'_>, limit: u64) -> Result<MultipartForm, TransportError> {
    let fail = |err: multer::Error| transport_error(err, limit);
    let mut form = MultipartForm::default();

    while let Some(field) = multipart.next_field().await.map_err(fail)? {
        let name = field
            .name()
            .map(str::to_string)
            .ok_or_else(|| TransportError::Malformed("part without a name".to_string()))?;
        match field.file_name().map(str::to_string) {
            Some(filename) => {
                let content_type = field.content_type().map(ToString::to_string);
                let data = field.bytes().await.map_err(fail)?;
                form.add_file(
                    name,
                    UploadedFile::new(filename, content_type.as_deref(), data.to_vec()),
                );
            }
            None => form.add_value(name, field.text().await.map_err(fail)?),
        }
    }
    Ok(form)
}

fn transport_error(err: multer::Error, limit: u64) -> TransportError {
    match err {
        multer::Error::StreamSizeExceeded { .. } | multer::Error::FieldSizeExceeded { .. } => {
            TransportError::TooLarge { limit }
        }
        other => TransportError::Malformed(other.to_string()),
    }
}
