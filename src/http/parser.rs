use crate::http::headers::HeaderMap;
use crate::http::request::Request;
use std::fmt;

pub(crate) const CRLF: &[u8] = b"\r\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    InvalidRequestLine,
    InvalidMethod,
    UnsupportedVersion,
    InvalidHeaderLine,
    InvalidHeaderName,
    InvalidHeaderToken,
    InvalidContentLength,
    InvalidChunkSize,
    InvalidChunkFraming,
    BufferLimitExceeded,
    UnexpectedEof,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ParseError::InvalidRequestLine => "invalid request line",
            ParseError::InvalidMethod => "invalid method",
            ParseError::UnsupportedVersion => "unsupported http version",
            ParseError::InvalidHeaderLine => "invalid header line",
            ParseError::InvalidHeaderName => "invalid header name",
            ParseError::InvalidHeaderToken => "invalid header token",
            ParseError::InvalidContentLength => "invalid content-length",
            ParseError::InvalidChunkSize => "invalid chunk size",
            ParseError::InvalidChunkFraming => "invalid chunk framing",
            ParseError::BufferLimitExceeded => "receive buffer limit exceeded",
            ParseError::UnexpectedEof => "connection closed mid-request",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for ParseError {}

/// Result of one [`parse_header_line`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderLine {
    /// Bytes consumed from the front of the buffer, terminator included.
    pub consumed: usize,
    /// True once the blank line ending the header block was consumed.
    pub done: bool,
}

const NEED_MORE: HeaderLine = HeaderLine {
    consumed: 0,
    done: false,
};

/// Parses at most one header line from the front of `buf`, folding the
/// field into `headers`.
///
/// `buf` is the unconsumed tail of a receive buffer and may be truncated
/// anywhere. A return of `(0, false)` means no complete line is available
/// yet and the caller should read more bytes; it is never success or
/// failure on its own. The blank line terminating the block yields
/// `(2, true)` without touching `headers`.
pub fn parse_header_line(buf: &[u8], headers: &mut HeaderMap) -> Result<HeaderLine, ParseError> {
    if buf.is_empty() {
        return Ok(NEED_MORE);
    }
    if buf.starts_with(CRLF) {
        return Ok(HeaderLine {
            consumed: CRLF.len(),
            done: true,
        });
    }
    let Some(end) = find_crlf(buf) else {
        // Line still incomplete; more data may arrive.
        return Ok(NEED_MORE);
    };

    let line = &buf[..end];
    let colon = line
        .iter()
        .position(|&b| b == b':')
        .ok_or(ParseError::InvalidHeaderLine)?;
    let (name, rest) = line.split_at(colon);

    // "Host : x" is malformed; whitespace may not sit between name and colon.
    if name.last().is_some_and(|b| b.is_ascii_whitespace()) {
        return Err(ParseError::InvalidHeaderName);
    }
    let name = name.trim_ascii();
    if name.is_empty() || !name.iter().all(|&b| is_token_byte(b)) {
        return Err(ParseError::InvalidHeaderToken);
    }
    let name = std::str::from_utf8(name).map_err(|_| ParseError::InvalidHeaderToken)?;

    let value = rest[1..].trim_ascii();
    let value = std::str::from_utf8(value).map_err(|_| ParseError::InvalidHeaderLine)?;

    headers.set(name, value);
    Ok(HeaderLine {
        consumed: end + CRLF.len(),
        done: false,
    })
}

fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == CRLF)
}

fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RequestLine {
    pub method: String,
    pub target: String,
    pub version: String,
}

/// Parses `"<METHOD> <TARGET> HTTP/1.1\r\n"` from the front of `buf`.
///
/// Returns `None` while the line is incomplete. The stored version is the
/// bare `"1.1"`; any other version is rejected outright.
pub(crate) fn parse_request_line(buf: &[u8]) -> Result<Option<(RequestLine, usize)>, ParseError> {
    let Some(end) = find_crlf(buf) else {
        return Ok(None);
    };
    let line = std::str::from_utf8(&buf[..end]).map_err(|_| ParseError::InvalidRequestLine)?;

    let mut parts = line.split(' ');
    let (Some(method), Some(target), Some(version), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(ParseError::InvalidRequestLine);
    };

    if method.is_empty() || !method.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(ParseError::InvalidMethod);
    }
    if target.is_empty() {
        return Err(ParseError::InvalidRequestLine);
    }
    let version = version
        .strip_prefix("HTTP/")
        .ok_or(ParseError::InvalidRequestLine)?;
    if version != "1.1" {
        return Err(ParseError::UnsupportedVersion);
    }

    Ok(Some((
        RequestLine {
            method: method.to_string(),
            target: target.to_string(),
            version: version.to_string(),
        },
        end + CRLF.len(),
    )))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    RequestLine,
    Headers,
    FixedBody { remaining: usize },
    ChunkSize,
    ChunkData { remaining: usize },
    ChunkDataEnd,
    Trailers,
    Done,
}

/// Incremental HTTP/1.1 request parser.
///
/// The parser holds the partially assembled request and an explicit state
/// tag; the caller owns the receive buffer. Each [`advance`] call consumes
/// as many bytes from the front of the buffer as the current state allows
/// and reports the count, so the caller can drop the consumed prefix and
/// append fresh socket reads before calling again. Resuming after a partial
/// read is just another `advance` with more bytes available.
///
/// [`advance`]: RequestParser::advance
#[derive(Debug)]
pub struct RequestParser {
    state: ParseState,
    method: String,
    target: String,
    version: String,
    headers: HeaderMap,
    trailers: HeaderMap,
    body: Vec<u8>,
}

impl Default for RequestParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestParser {
    pub fn new() -> Self {
        Self {
            state: ParseState::RequestLine,
            method: String::new(),
            target: String::new(),
            version: String::new(),
            headers: HeaderMap::new(),
            trailers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    /// Whether a full request has been assembled. Once true, `advance`
    /// consumes nothing further.
    pub fn is_done(&self) -> bool {
        self.state == ParseState::Done
    }

    /// Whether any bytes of the request have been parsed yet.
    pub fn is_fresh(&self) -> bool {
        self.state == ParseState::RequestLine && self.method.is_empty()
    }

    /// Consumes as much of `buf` as the current state allows.
    ///
    /// Returns the number of bytes consumed; the caller must remove exactly
    /// that prefix from its buffer before the next call. A malformed message
    /// is terminal and the parser must be discarded.
    pub fn advance(&mut self, buf: &[u8]) -> Result<usize, ParseError> {
        let mut consumed = 0;
        loop {
            let tail = &buf[consumed..];
            match self.state {
                ParseState::RequestLine => match parse_request_line(tail)? {
                    Some((line, n)) => {
                        self.method = line.method;
                        self.target = line.target;
                        self.version = line.version;
                        consumed += n;
                        self.state = ParseState::Headers;
                    }
                    None => break,
                },

                ParseState::Headers => {
                    let parsed = parse_header_line(tail, &mut self.headers)?;
                    consumed += parsed.consumed;
                    if parsed.done {
                        self.state = self.body_state()?;
                    } else if parsed.consumed == 0 {
                        break;
                    }
                }

                ParseState::FixedBody { remaining } => {
                    if tail.is_empty() {
                        break;
                    }
                    let take = remaining.min(tail.len());
                    self.body.extend_from_slice(&tail[..take]);
                    consumed += take;
                    self.state = if take == remaining {
                        ParseState::Done
                    } else {
                        ParseState::FixedBody {
                            remaining: remaining - take,
                        }
                    };
                }

                ParseState::ChunkSize => {
                    let Some(end) = find_crlf(tail) else { break };
                    let size = parse_chunk_size(&tail[..end])?;
                    consumed += end + CRLF.len();
                    self.state = if size == 0 {
                        ParseState::Trailers
                    } else {
                        ParseState::ChunkData { remaining: size }
                    };
                }

                ParseState::ChunkData { remaining } => {
                    if tail.is_empty() {
                        break;
                    }
                    let take = remaining.min(tail.len());
                    self.body.extend_from_slice(&tail[..take]);
                    consumed += take;
                    self.state = if take == remaining {
                        ParseState::ChunkDataEnd
                    } else {
                        ParseState::ChunkData {
                            remaining: remaining - take,
                        }
                    };
                }

                ParseState::ChunkDataEnd => {
                    if tail.len() < CRLF.len() {
                        break;
                    }
                    if &tail[..CRLF.len()] != CRLF {
                        return Err(ParseError::InvalidChunkFraming);
                    }
                    consumed += CRLF.len();
                    self.state = ParseState::ChunkSize;
                }

                ParseState::Trailers => {
                    let parsed = parse_header_line(tail, &mut self.trailers)?;
                    consumed += parsed.consumed;
                    if parsed.done {
                        self.state = ParseState::Done;
                    } else if parsed.consumed == 0 {
                        break;
                    }
                }

                ParseState::Done => break,
            }
        }
        Ok(consumed)
    }

    fn body_state(&self) -> Result<ParseState, ParseError> {
        if let Some(te) = self.headers.get("transfer-encoding") {
            let chunked = te
                .split(',')
                .any(|t| t.trim().eq_ignore_ascii_case("chunked"));
            if chunked {
                return Ok(ParseState::ChunkSize);
            }
        }
        match self.headers.get("content-length") {
            Some(raw) => {
                let len: usize = raw
                    .trim()
                    .parse()
                    .map_err(|_| ParseError::InvalidContentLength)?;
                if len == 0 {
                    Ok(ParseState::Done)
                } else {
                    Ok(ParseState::FixedBody { remaining: len })
                }
            }
            None => Ok(ParseState::Done),
        }
    }

    /// Consumes the parser, yielding the request if parsing completed.
    pub fn into_request(self) -> Option<Request> {
        if self.state != ParseState::Done {
            return None;
        }
        Some(Request {
            method: self.method,
            target: self.target,
            version: self.version,
            headers: self.headers,
            body: self.body,
            trailers: self.trailers,
        })
    }
}

fn parse_chunk_size(line: &[u8]) -> Result<usize, ParseError> {
    let line = std::str::from_utf8(line).map_err(|_| ParseError::InvalidChunkSize)?;
    if line.is_empty() || !line.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ParseError::InvalidChunkSize);
    }
    usize::from_str_radix(line, 16).map_err(|_| ParseError::InvalidChunkSize)
}
