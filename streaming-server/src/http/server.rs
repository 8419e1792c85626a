use crate::lookup::VideoLookup;
use crate::media::MediaStore;
use crate::publisher::ViewedPublisher;
use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// HTTP 服务器
///
/// 所有外部依赖在构造时注入，`run` 之前必须全部就绪。
pub struct StreamingServer {
    addr: SocketAddr,
    lookup: Arc<dyn VideoLookup>,
    publisher: Arc<dyn ViewedPublisher>,
    media: MediaStore,
}

impl StreamingServer {
    pub fn new(
        addr: SocketAddr,
        lookup: Arc<dyn VideoLookup>,
        publisher: Arc<dyn ViewedPublisher>,
        media: MediaStore,
    ) -> Self {
        Self {
            addr,
            lookup,
            publisher,
            media,
        }
    }

    pub async fn run(self) -> Result<()> {
        let app = super::routes::create_router(self.lookup, self.publisher, self.media);

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        info!("HTTP server running on {}", self.addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("HTTP server stopped");
        Ok(())
    }
}

/// 等待进程终止信号
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received, draining connections");
}
