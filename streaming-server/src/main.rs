mod config;
mod error;
mod http;
mod lookup;
mod media;
mod publisher;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, Level};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    info!("🚀 Streaming server starting...");

    // 加载配置
    let config = config::Config::load()?;
    info!("✓ Configuration loaded");

    // 外部依赖全部就绪后才开始接受请求
    info!("Connecting to the video database.");
    let lookup = lookup::PgVideoLookup::connect(&config.database_url).await?;
    info!("✓ Connected to the video database");

    info!("Connecting to the message broker at {}.", config.broker_addr);
    let publisher = publisher::KafkaViewedPublisher::new(&config.broker_addr)?;
    info!("✓ Message broker producer ready");

    let media = media::MediaStore::new(config.media_root.clone());
    info!("✓ Media root: {}", config.media_root.display());

    let addr: SocketAddr = format!("{}:{}", config.http_host, config.http_port).parse()?;
    let server =
        http::StreamingServer::new(addr, Arc::new(lookup), Arc::new(publisher.clone()), media);

    info!("✅ Microservice online!");

    server.run().await?;

    // 服务器停止后冲刷在途通知再退出
    publisher.flush(std::time::Duration::from_secs(5))?;
    info!("Shutdown complete");

    Ok(())
}
