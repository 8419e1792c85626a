use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// 默认媒体根目录
const DEFAULT_MEDIA_ROOT: &str = "./videos";

#[derive(Debug, Clone)]
pub struct Config {
    pub http_host: String,
    pub http_port: u16,
    pub broker_addr: String,
    pub database_url: String,
    pub media_root: PathBuf,
}

impl Config {
    /// 从环境变量加载配置，必填项缺失直接启动失败
    pub fn load() -> Result<Self> {
        let http_port = env::var("PORT")
            .context("Please specify the port number for the HTTP server with the environment variable PORT")?
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let broker_addr = env::var("BROKER")
            .context("Please specify the message broker address using the environment variable BROKER")?;

        let database_url = env::var("DATABASE_URL")
            .context("Please specify the video database using the environment variable DATABASE_URL")?;

        let media_root = env::var("MEDIA_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_MEDIA_ROOT));

        Ok(Self {
            http_host: "0.0.0.0".to_string(),
            http_port,
            broker_addr,
            database_url,
            media_root,
        })
    }
}
