use std::sync::Arc;

use bytes::{Buf, BytesMut};
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

use crate::config::ServerConfig;
use crate::http::parser::{ParseError, RequestParser};
use crate::http::request::Request;
use crate::http::response::{StatusCode, default_headers};
use crate::http::writer::ResponseWriter;
use crate::server::Handler;

enum ReadError {
    Parse(ParseError),
    Io(std::io::Error),
}

/// Drives one client connection through a single request/response cycle.
///
/// The inbound half feeds a [`RequestParser`] via an owned receive buffer;
/// the outbound half is wrapped in a [`ResponseWriter`] handed to the
/// handler. The connection closes unconditionally after the response.
pub struct Connection {
    reader: OwnedReadHalf,
    writer: ResponseWriter<OwnedWriteHalf>,
    buffer: BytesMut,
    handler: Arc<dyn Handler>,
    read_buffer_size: usize,
    max_buffer_bytes: usize,
}

impl Connection {
    pub fn new(stream: TcpStream, handler: Arc<dyn Handler>, cfg: &ServerConfig) -> Self {
        let (reader, writer) = stream.into_split();
        Self {
            reader,
            writer: ResponseWriter::new(writer),
            buffer: BytesMut::with_capacity(cfg.read_buffer_size),
            handler,
            read_buffer_size: cfg.read_buffer_size,
            max_buffer_bytes: cfg.max_buffer_bytes,
        }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        match self.read_request().await {
            Ok(Some(request)) => {
                self.handler.handle(&mut self.writer, request).await;
                if let Err(e) = self.writer.flush().await {
                    tracing::debug!("flush after handler failed: {}", e);
                }
            }

            // Peer closed without sending anything; nothing to answer.
            Ok(None) => {}

            Err(ReadError::Parse(e)) => {
                tracing::warn!("rejecting malformed request: {}", e);
                if let Err(e) = self.reject(StatusCode::BadRequest).await {
                    tracing::debug!("failed to send error response: {}", e);
                }
            }

            Err(ReadError::Io(e)) => return Err(e.into()),
        }

        Ok(())
    }

    /// Reads from the socket until the parser assembles a full request.
    ///
    /// Returns `Ok(None)` when the peer closes before sending any request
    /// bytes. EOF mid-message and any structural violation are terminal
    /// parse failures.
    async fn read_request(&mut self) -> Result<Option<Request>, ReadError> {
        let mut parser = RequestParser::new();

        loop {
            let consumed = parser.advance(&self.buffer).map_err(ReadError::Parse)?;
            self.buffer.advance(consumed);

            if parser.is_done() {
                return Ok(parser.into_request());
            }

            // The unconsumed tail only grows while a single line or section
            // is incomplete; cap it so a hostile peer cannot balloon memory.
            if self.buffer.len() > self.max_buffer_bytes {
                return Err(ReadError::Parse(ParseError::BufferLimitExceeded));
            }

            self.buffer.reserve(self.read_buffer_size);
            let n = self
                .reader
                .read_buf(&mut self.buffer)
                .await
                .map_err(ReadError::Io)?;

            if n == 0 {
                if parser.is_fresh() && self.buffer.is_empty() {
                    return Ok(None);
                }
                return Err(ReadError::Parse(ParseError::UnexpectedEof));
            }
        }
    }

    async fn reject(&mut self, status: StatusCode) -> anyhow::Result<()> {
        self.writer.write_status_line(status).await?;
        self.writer.write_headers(&default_headers(0)).await?;
        self.writer.flush().await?;
        Ok(())
    }
}
