use super::routes::AppState;
use crate::error::StreamServiceError;
use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::Response,
};
use common::ViewedEvent;
use serde::Deserialize;

/// 固定的视频 MIME 类型（不做内容协商）
const VIDEO_CONTENT_TYPE: &str = "video/mp4";

#[derive(Debug, Deserialize)]
pub struct VideoQuery {
    id: Option<String>,
}

/// 流式传输视频文件
///
/// `GET /video?id=<整数>`：把视频ID解析为存储记录，打开对应的
/// 媒体文件，以分片流返回全部字节。成功写出响应头后在独立任务里
/// 发布一条观看通知；404 与各种失败路径不发布。
pub async fn stream_video(
    Query(query): Query<VideoQuery>,
    State((lookup, publisher, media)): State<AppState>,
) -> Result<Response, StreamServiceError> {
    let raw_id = query.id.unwrap_or_default();
    let video_id = raw_id
        .trim()
        .parse()
        .map_err(|_| StreamServiceError::InvalidVideoId { raw: raw_id.clone() })?;

    let record = lookup
        .find(video_id)
        .await
        .map_err(|e| StreamServiceError::LookupFailed {
            id: video_id,
            reason: format!("{:#}", e),
        })?
        .ok_or(StreamServiceError::VideoNotFound(video_id))?;

    tracing::info!("Translated id {} to path {}.", video_id, record.video_path);

    let media_file = media.open(&record.video_path).await?;
    let video_path = media_file.path.display().to_string();
    let size = media_file.size;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, VIDEO_CONTENT_TYPE)
        .header(header::CONTENT_LENGTH, size)
        .body(Body::from_stream(media_file.into_stream()))
        .map_err(|e| StreamServiceError::MediaUnavailable {
            path: video_path.clone(),
            reason: e.to_string(),
        })?;

    // 通知在独立任务中发布：慢的或挂掉的 broker 不能拖住已经
    // 开始的流，发布失败也只记录一次日志
    let event = ViewedEvent::new(video_id, video_path);
    tokio::spawn(async move {
        if let Err(e) = publisher.publish_viewed(&event).await {
            tracing::warn!(
                "Failed to publish viewed event for video {}: {:#}",
                event.video_id,
                e
            );
        }
    });

    Ok(response)
}
