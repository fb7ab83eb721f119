use crate::http::headers::HeaderMap;

/// HTTP status codes supported by the server.
///
/// A closed set: every variant maps to exactly one canonical reason phrase,
/// so an unknown code is unrepresentable. Extending the server to a new
/// status means adding a variant here together with its phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use wicket::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }

    /// Maps a numeric code back to the enumeration, if known.
    pub fn from_u16(code: u16) -> Option<Self> {
        match code {
            200 => Some(StatusCode::Ok),
            400 => Some(StatusCode::BadRequest),
            500 => Some(StatusCode::InternalServerError),
            _ => None,
        }
    }
}

/// Headers for responses the server synthesizes itself, such as the `400`
/// sent after a parse failure.
pub fn default_headers(content_len: usize) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.set("Content-Length", &content_len.to_string());
    headers.set("Connection", "close");
    headers.set("Content-Type", "text/plain");
    headers
}
