// 视频流服务 - 错误类型定义
//
// 本模块定义请求处理过程中的错误分类及其到 HTTP 状态码的映射。
// 所有错误响应均为空响应体。

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use common::VideoId;
use thiserror::Error;

/// 流服务错误
#[derive(Debug, Error)]
pub enum StreamServiceError {
    /// 缺失或无法解析的视频ID
    #[error("Invalid video id: {raw:?}")]
    InvalidVideoId { raw: String },

    /// 存储服务中不存在该视频记录
    #[error("Video not found: {0}")]
    VideoNotFound(VideoId),

    /// 查询存储服务失败
    #[error("Video lookup failed for id {id}: {reason}")]
    LookupFailed { id: VideoId, reason: String },

    /// 记录中的路径越出媒体根目录
    #[error("Resolved path escapes media root: {path}")]
    PathOutsideRoot { path: String },

    /// 媒体文件缺失或不可读
    #[error("Media file unavailable at {path}: {reason}")]
    MediaUnavailable { path: String, reason: String },
}

impl StreamServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidVideoId { .. } => StatusCode::BAD_REQUEST,
            Self::VideoNotFound(_) => StatusCode::NOT_FOUND,
            Self::LookupFailed { .. }
            | Self::PathOutsideRoot { .. }
            | Self::MediaUnavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for StreamServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("{}", self);
        } else {
            tracing::info!("{}", self);
        }

        status.into_response()
    }
}
