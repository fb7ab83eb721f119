//! Wicket - HTTP/1.1 framing over raw TCP
//!
//! Core library for incremental request parsing and ordered response
//! writing.

pub mod config;
pub mod http;
pub mod server;
