use crate::handler::ApiHandler;
use crate::{Error, Result, ServerConfig};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};

/// HTTP server exposing the parameter analysis endpoint
pub struct ApiServer {
    config: ServerConfig,
    handler: ApiHandler,
}

impl ApiServer {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            handler: ApiHandler::new(config.clone()),
            config,
        }
    }

    /// Bind the configured address
    pub async fn bind(&self) -> Result<TcpListener> {
        let addr = self.config.addr();
        tracing::debug!("Binding {}", addr);
        TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Server(format!("Failed to bind {}: {}", addr, e)))
    }

    /// Bind and serve until Ctrl+C
    pub async fn start(self) -> Result<()> {
        let listener = self.bind().await?;

        let shutdown_signal = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl+C: {}", e);
                return;
            }
            tracing::info!("Received Ctrl+C, shutting down...");
        };

        self.serve(listener, shutdown_signal).await
    }

    /// Accept connections on `listener` until `shutdown` resolves
    ///
    /// Connections already being served finish on their own tasks.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let local_addr: SocketAddr = listener.local_addr()?;
        tracing::info!("✓ Listening on http://{}", local_addr);

        tokio::pin!(shutdown);

        loop {
            let (stream, peer) = tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        tracing::warn!("Failed to accept connection: {}", e);
                        continue;
                    }
                },
                _ = &mut shutdown => break,
            };

            tracing::trace!("Accepted connection from {}", peer);

            let handler = self.handler.clone();
            tokio::spawn(async move {
                if let Err(e) = serve_connection(handler, stream).await {
                    tracing::debug!("Connection from {} closed with error: {}", peer, e);
                }
            });
        }

        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn serve_connection(handler: ApiHandler, stream: TcpStream) -> Result<()> {
    let service = service_fn(move |req| {
        let handler = handler.clone();
        async move { Ok::<_, Infallible>(handler.handle(req).await) }
    });

    http1::Builder::new()
        .serve_connection(TokioIo::new(stream), service)
        .await?;
    Ok(())
}
