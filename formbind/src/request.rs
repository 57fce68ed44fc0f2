//! Adapter from [`http::Request`] to [`FormInput`].

use ::http::header::CONTENT_TYPE;
use ::http::Request;

use crate::error::TransportError;
use crate::source::FormInput;

const URLENCODED: &str = "application/x-www-form-urlencoded";

fn mime_of(content_type: &str) -> &str {
    content_type.split(';').next().unwrap_or("").trim()
}

impl FormInput {
    /// Collect the form values of an HTTP request.
    ///
    /// Urlencoded body values come first, followed by query-string values.
    /// A `multipart/form-data` body is decoded on first use; its text parts
    /// answer lookups for keys the urlencoded body and query do not carry.
    pub fn from_request<B: AsRef<[u8]>>(req: &Request<B>) -> Result<Self, TransportError> {
        let mut input = FormInput::new();
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        let mime = mime_of(content_type);

        if mime.eq_ignore_ascii_case(URLENCODED) {
            input.extend_urlencoded(req.body().as_ref());
        }
        if let Some(query) = req.uri().query() {
            input.extend_urlencoded(query.as_bytes());
        }
        if mime.eq_ignore_ascii_case("multipart/form-data") {
            input = input.with_multipart_body(content_type, req.body().as_ref().to_vec())?;
        }
        Ok(input)
    }
}
