use crate::http::headers::HeaderMap;

/// Represents a fully parsed HTTP request from a client.
///
/// A `Request` only exists once the parser has reached its terminal state;
/// handlers never see a partially assembled message. The body is already
/// de-framed: for chunked requests it holds the concatenated chunk payloads
/// and `trailers` holds any fields sent after the terminal chunk.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method verb (e.g. "GET", "POST")
    pub method: String,
    /// The request-target (e.g. "/index.html", "/search?q=rust")
    pub target: String,
    /// HTTP version, always "1.1"
    pub version: String,
    /// Request headers, names lower-cased
    pub headers: HeaderMap,
    /// De-framed request body
    pub body: Vec<u8>,
    /// Trailer fields from a chunked body; empty otherwise
    pub trailers: HeaderMap,
}

impl Request {
    /// Retrieves a header value by name (case-insensitive).
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key)
    }

    /// Retrieves the Content-Length header value and parses it as a usize.
    ///
    /// Returns 0 if the header is missing or not a valid number.
    pub fn content_length(&self) -> usize {
        self.header("Content-Length")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }
}
