//! HTTP/1.1 message framing directly over a byte stream.
//!
//! This module reconstructs well-formed requests from bytes arriving in
//! arbitrary chunks and serializes responses with strict section ordering.
//! No existing HTTP stack is involved; the wire rules (header tokens, CRLF
//! terminators, chunked framing) are enforced byte-exactly.
//!
//! # Architecture
//!
//! - **`headers`**: case-insensitive header map with fold-on-duplicate insert
//! - **`parser`**: incremental header-line and request parsers
//! - **`request`**: the fully parsed request value handed to handlers
//! - **`response`**: status codes and synthesized default headers
//! - **`writer`**: the ordered response writer state machine
//! - **`connection`**: per-connection driver tying parser to writer
//!
//! # Request parse states
//!
//! Each request moves through an explicit state machine, re-entered after
//! every partial socket read:
//!
//! ```text
//!        ┌──────────────┐
//!        │ RequestLine  │ ← "<METHOD> <TARGET> HTTP/1.1\r\n"
//!        └──────┬───────┘
//!               ▼
//!        ┌──────────────┐
//!        │   Headers    │ ← one header line per parser call
//!        └──────┬───────┘
//!               ▼
//!        ┌──────────────┐
//!        │     Body     │ ← Content-Length bytes, or chunked
//!        └──────┬───────┘   frames plus trailers
//!               ▼
//!        ┌──────────────┐
//!        │     Done     │ → request handed to the handler
//!        └──────────────┘
//! ```
//!
//! Any structural violation is terminal: the connection answers `400` and
//! closes. Mis-framing a single message would corrupt every byte that
//! follows on the same connection, so the parser never guesses.

pub mod connection;
pub mod headers;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
