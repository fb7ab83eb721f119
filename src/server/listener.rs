use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::ServerConfig;
use crate::http::connection::Connection;
use crate::server::Handler;

/// A running HTTP/1.1 server.
///
/// Accepts connections on a background task and dispatches each to its own
/// task running a [`Connection`]. Connections share nothing but the accept
/// socket and the shutdown flag.
pub struct Server {
    local_addr: SocketAddr,
    closed: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
    accept_task: JoinHandle<()>,
}

impl Server {
    /// Binds `cfg.listen_addr` and starts accepting connections.
    pub async fn serve(cfg: ServerConfig, handler: Arc<dyn Handler>) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(&cfg.listen_addr).await?;
        let local_addr = listener.local_addr()?;
        info!("Listening on {}", local_addr);

        let closed = Arc::new(AtomicBool::new(false));
        let shutdown = Arc::new(Notify::new());
        let accept_task = tokio::spawn(accept_loop(
            listener,
            handler,
            cfg,
            Arc::clone(&closed),
            Arc::clone(&shutdown),
        ));

        Ok(Self {
            local_addr,
            closed,
            shutdown,
            accept_task,
        })
    }

    /// The address the listener is actually bound to. Useful when the
    /// configured port was 0.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops accepting new connections. In-flight connections run to
    /// completion of their current request/response cycle.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.shutdown.notify_one();
    }

    /// Waits for the accept loop to exit.
    pub async fn join(self) -> anyhow::Result<()> {
        self.accept_task.await?;
        Ok(())
    }
}

async fn accept_loop(
    listener: TcpListener,
    handler: Arc<dyn Handler>,
    cfg: ServerConfig,
    closed: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
) {
    loop {
        tokio::select! {
            res = listener.accept() => match res {
                Ok((socket, peer)) => {
                    info!("Accepted connection from {}", peer);

                    let handler = Arc::clone(&handler);
                    let cfg = cfg.clone();
                    tokio::spawn(async move {
                        let conn = Connection::new(socket, handler, &cfg);
                        if let Err(e) = conn.run().await {
                            tracing::error!("Connection error from {}: {}", peer, e);
                        }
                    });
                }
                Err(e) => {
                    // The flag tells a deliberate close apart from a
                    // transient accept failure.
                    if closed.load(Ordering::SeqCst) {
                        break;
                    }
                    tracing::error!("Error accepting connection: {}", e);
                }
            },

            _ = shutdown.notified() => break,
        }
    }

    info!("Listener stopped");
}
