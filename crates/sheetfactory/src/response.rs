//! Streamed HTTP responses.
//!
//! The body of a [`StreamedResponse`] is a deferred closure: nothing is
//! serialized until the HTTP layer hands it an output sink.

use std::fmt;
use std::io::Write;

use http::{HeaderMap, StatusCode};

use crate::error::WriteError;

type BodyFn = Box<dyn FnOnce(&mut dyn Write) -> Result<(), WriteError> + Send + 'static>;

/// A response body that writes itself into a sink once
pub struct StreamBody(BodyFn);

impl StreamBody {
    pub fn new<F>(write: F) -> Self
    where
        F: FnOnce(&mut dyn Write) -> Result<(), WriteError> + Send + 'static,
    {
        StreamBody(Box::new(write))
    }

    /// Run the body against `sink`
    pub fn write_to(self, sink: &mut dyn Write) -> Result<(), WriteError> {
        (self.0)(sink)
    }

    /// Run the body into memory
    pub fn into_bytes(self) -> Result<Vec<u8>, WriteError> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        Ok(buf)
    }
}

impl fmt::Debug for StreamBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StreamBody(..)")
    }
}

/// Status, headers and a deferred body
#[derive(Debug)]
pub struct StreamedResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: StreamBody,
}

impl StreamedResponse {
    pub fn new(body: StreamBody, status: StatusCode, headers: HeaderMap) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Drain the body into `sink`, consuming the response
    pub fn send_to(self, sink: &mut dyn Write) -> Result<(), WriteError> {
        self.body.write_to(sink)
    }

    pub fn into_parts(self) -> (StatusCode, HeaderMap, StreamBody) {
        (self.status, self.headers, self.body)
    }

    /// Convert into an [`http::Response`] whose body is still deferred
    pub fn into_http(self) -> http::Response<StreamBody> {
        let mut response = http::Response::new(self.body);
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}
