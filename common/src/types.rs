use serde::{Deserialize, Serialize};

/// 视频标识（由客户端以十进制整数传入）
pub type VideoId = i64;

/// 视频记录
///
/// 由外部的视频存储服务维护，本服务每次请求只读取一次，
/// 从不创建、修改或删除。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VideoRecord {
    pub id: VideoId,
    /// 相对于媒体根目录的文件路径
    pub video_path: String,
}
