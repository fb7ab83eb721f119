use std::sync::Arc;

use async_trait::async_trait;
use tokio::net::tcp::OwnedWriteHalf;

use wicket::config::Config;
use wicket::http::headers::HeaderMap;
use wicket::http::request::Request;
use wicket::http::response::{StatusCode, default_headers};
use wicket::http::writer::{ResponseWriter, WriterError};
use wicket::server::{Handler, Server};

struct AppHandler;

#[async_trait]
impl Handler for AppHandler {
    async fn handle(&self, writer: &mut ResponseWriter<OwnedWriteHalf>, request: Request) {
        let result = match request.target.as_str() {
            "/chunked" => stream_chunks(writer).await,
            "/boom" => respond(writer, StatusCode::InternalServerError, b"something broke\n").await,
            _ => respond(writer, StatusCode::Ok, b"Hello from wicket\n").await,
        };

        if let Err(e) = result {
            tracing::error!("handler write failed: {}", e);
        }
    }
}

async fn respond(
    writer: &mut ResponseWriter<OwnedWriteHalf>,
    status: StatusCode,
    body: &[u8],
) -> Result<(), WriterError> {
    writer.write_status_line(status).await?;
    writer.write_headers(&default_headers(body.len())).await?;
    writer.write_body(body).await?;
    Ok(())
}

async fn stream_chunks(writer: &mut ResponseWriter<OwnedWriteHalf>) -> Result<(), WriterError> {
    writer.write_status_line(StatusCode::Ok).await?;

    let mut headers = default_headers(0);
    headers.remove("Content-Length");
    headers.replace("Transfer-Encoding", "chunked");
    writer.write_headers(&headers).await?;

    for part in ["hello", " from", " wicket\n"] {
        writer.write_chunked_body(part.as_bytes()).await?;
    }
    writer.write_chunked_body_done().await?;

    let mut trailers = HeaderMap::new();
    trailers.set("X-Chunk-Count", "3");
    writer.write_trailers(&trailers).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;

    let server = Server::serve(cfg.server, Arc::new(AppHandler)).await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    server.close();
    server.join().await?;

    Ok(())
}
