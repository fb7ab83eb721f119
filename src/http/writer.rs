use std::fmt;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::headers::HeaderMap;
use crate::http::parser::CRLF;
use crate::http::response::StatusCode;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Position of a [`ResponseWriter`] within the response message.
///
/// Advances monotonically and never regresses; every write operation
/// validates the current state before emitting anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WriterState {
    StatusLine,
    Headers,
    Body,
    Trailers,
}

/// Errors raised by the response writer.
///
/// `OutOfOrder` signals a defect in the calling handler, not malformed
/// input: an operation was invoked in the wrong section of the message. No
/// bytes are written for a rejected operation. `Io` carries transport
/// failures from the underlying sink.
#[derive(Debug)]
pub enum WriterError {
    OutOfOrder {
        operation: &'static str,
        state: WriterState,
    },
    Io(std::io::Error),
}

impl fmt::Display for WriterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriterError::OutOfOrder { operation, state } => {
                write!(f, "{operation} called in {state:?} section")
            }
            WriterError::Io(e) => write!(f, "write failed: {e}"),
        }
    }
}

impl std::error::Error for WriterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WriterError::Io(e) => Some(e),
            WriterError::OutOfOrder { .. } => None,
        }
    }
}

impl From<std::io::Error> for WriterError {
    fn from(e: std::io::Error) -> Self {
        WriterError::Io(e)
    }
}

/// Serializes an HTTP/1.1 response onto a byte sink, section by section.
///
/// The writer enforces wire order: status line, then headers, then body,
/// then (for chunked responses) trailers. Body writes may repeat; the state
/// only advances when a section is finished.
pub struct ResponseWriter<W> {
    writer: W,
    state: WriterState,
}

impl<W: AsyncWrite + Unpin> ResponseWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            state: WriterState::StatusLine,
        }
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    fn expect(&self, state: WriterState, operation: &'static str) -> Result<(), WriterError> {
        if self.state == state {
            Ok(())
        } else {
            Err(WriterError::OutOfOrder {
                operation,
                state: self.state,
            })
        }
    }

    /// Writes `"HTTP/1.1 <code> <reason>\r\n"` and advances to the header
    /// section.
    pub async fn write_status_line(&mut self, status: StatusCode) -> Result<(), WriterError> {
        self.expect(WriterState::StatusLine, "write_status_line")?;
        let line = format!(
            "{} {} {}\r\n",
            HTTP_VERSION,
            status.as_u16(),
            status.reason_phrase()
        );
        self.writer.write_all(line.as_bytes()).await?;
        self.state = WriterState::Headers;
        Ok(())
    }

    /// Writes every header as `"<name>: <value>\r\n"` followed by the blank
    /// line, then advances to the body section. Emission order carries no
    /// meaning.
    pub async fn write_headers(&mut self, headers: &HeaderMap) -> Result<(), WriterError> {
        self.expect(WriterState::Headers, "write_headers")?;
        self.writer.write_all(&encode_fields(headers)).await?;
        self.state = WriterState::Body;
        Ok(())
    }

    /// Writes body bytes verbatim. May be called repeatedly to stream a
    /// body across several application-level writes.
    pub async fn write_body(&mut self, body: &[u8]) -> Result<usize, WriterError> {
        self.expect(WriterState::Body, "write_body")?;
        self.writer.write_all(body).await?;
        Ok(body.len())
    }

    /// Writes one chunk as `"<hex-size>\r\n<bytes>\r\n"`.
    ///
    /// An empty slice is a no-op: a literal `0\r\n` here would read as the
    /// end-of-body marker. Use [`write_chunked_body_done`] to end the body.
    ///
    /// [`write_chunked_body_done`]: ResponseWriter::write_chunked_body_done
    pub async fn write_chunked_body(&mut self, chunk: &[u8]) -> Result<usize, WriterError> {
        self.expect(WriterState::Body, "write_chunked_body")?;
        if chunk.is_empty() {
            return Ok(0);
        }
        let mut buf = Vec::with_capacity(chunk.len() + 16);
        buf.extend_from_slice(format!("{:x}\r\n", chunk.len()).as_bytes());
        buf.extend_from_slice(chunk);
        buf.extend_from_slice(CRLF);
        self.writer.write_all(&buf).await?;
        Ok(chunk.len())
    }

    /// Writes the terminal `"0\r\n"` chunk and advances to the trailer
    /// section. The caller must still call [`write_trailers`] (with an
    /// empty map if there are none) to emit the final blank line.
    ///
    /// [`write_trailers`]: ResponseWriter::write_trailers
    pub async fn write_chunked_body_done(&mut self) -> Result<(), WriterError> {
        self.expect(WriterState::Body, "write_chunked_body_done")?;
        self.writer.write_all(b"0\r\n").await?;
        self.state = WriterState::Trailers;
        Ok(())
    }

    /// Writes trailer fields followed by the closing blank line.
    ///
    /// Legal as the final call of any response: after
    /// `write_chunked_body_done`, or directly from the body section when a
    /// plain response wants an explicit closing terminator.
    pub async fn write_trailers(&mut self, trailers: &HeaderMap) -> Result<(), WriterError> {
        if self.state != WriterState::Body && self.state != WriterState::Trailers {
            return Err(WriterError::OutOfOrder {
                operation: "write_trailers",
                state: self.state,
            });
        }
        self.writer.write_all(&encode_fields(trailers)).await?;
        self.state = WriterState::Trailers;
        Ok(())
    }

    pub async fn flush(&mut self) -> Result<(), WriterError> {
        self.writer.flush().await?;
        Ok(())
    }

    /// Consumes the writer, returning the underlying sink.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn encode_fields(fields: &HeaderMap) -> Vec<u8> {
    let mut buf = Vec::new();
    for (name, value) in fields.iter() {
        buf.extend_from_slice(name.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(value.as_bytes());
        buf.extend_from_slice(CRLF);
    }
    buf.extend_from_slice(CRLF);
    buf
}
