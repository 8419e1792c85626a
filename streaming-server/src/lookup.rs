// 视频流服务 - 视频记录查询
//
// 通过外部存储服务把视频ID解析为文件路径记录。
// 查询接口以 trait 注入，测试中可以用桩实现替换真实数据库。

use anyhow::{Context, Result};
use async_trait::async_trait;
use common::{VideoId, VideoRecord};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// 连接池获取连接的超时
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// 视频记录查询接口
#[async_trait]
pub trait VideoLookup: Send + Sync {
    /// 查询视频记录，记录不存在时返回 `None`
    async fn find(&self, id: VideoId) -> Result<Option<VideoRecord>>;
}

/// 基于 Postgres 的视频记录查询
///
/// 连接池在服务启动时建立一次，所有并发请求共享。
#[derive(Clone)]
pub struct PgVideoLookup {
    pool: PgPool,
}

impl PgVideoLookup {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(database_url)
            .await
            .context("Failed to connect to the video database")?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl VideoLookup for PgVideoLookup {
    async fn find(&self, id: VideoId) -> Result<Option<VideoRecord>> {
        let row = sqlx::query_as::<_, (VideoId, String)>(
            "SELECT id, video_path FROM videos WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Video lookup query failed")?;

        Ok(row.map(|(id, video_path)| VideoRecord { id, video_path }))
    }
}
