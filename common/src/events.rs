use crate::types::VideoId;
use serde::{Deserialize, Serialize};

/// 观看通知的主题名称
pub const VIEWED_TOPIC: &str = "viewed";

/// 视频观看通知
///
/// 每成功开始一次视频流式传输就发布一条，由下游服务
/// （如观看历史服务）消费。线上格式为 camelCase JSON：
/// `{"videoId": 42, "videoPath": "/videos/clip.mp4"}`。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ViewedEvent {
    pub video_id: VideoId,
    pub video_path: String,
}

impl ViewedEvent {
    pub fn new(video_id: VideoId, video_path: impl Into<String>) -> Self {
        Self {
            video_id,
            video_path: video_path.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewed_event_wire_format() {
        let event = ViewedEvent::new(42, "/videos/clip.mp4");
        let json = serde_json::to_string(&event).unwrap();

        assert_eq!(json, r#"{"videoId":42,"videoPath":"/videos/clip.mp4"}"#);
    }

    #[test]
    fn test_viewed_event_parses_camel_case() {
        let event: ViewedEvent =
            serde_json::from_str(r#"{"videoId":7,"videoPath":"clip.mp4"}"#).unwrap();

        assert_eq!(event, ViewedEvent::new(7, "clip.mp4"));
    }
}
