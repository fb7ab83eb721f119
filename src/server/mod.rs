//! TCP listener, accept loop, and the application handler boundary.

pub mod listener;

pub use listener::Server;

use async_trait::async_trait;
use tokio::net::tcp::OwnedWriteHalf;

use crate::http::request::Request;
use crate::http::writer::ResponseWriter;

/// Application callback invoked once per successfully parsed request.
///
/// The handler is solely responsible for producing a valid response
/// through the writer's ordered API. The server guarantees it is only
/// invoked with a structurally valid request; malformed requests are
/// answered with `400` before the handler is ever reached.
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    async fn handle(&self, writer: &mut ResponseWriter<OwnedWriteHalf>, request: Request);
}
