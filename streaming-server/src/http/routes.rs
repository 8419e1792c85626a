use crate::lookup::VideoLookup;
use crate::media::MediaStore;
use crate::publisher::ViewedPublisher;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// 注入到各处理器的共享状态
///
/// 查询客户端与发布器都是进程级长生命周期句柄，
/// 请求之间只共享这两个只读句柄，没有其他可变状态。
pub type AppState = (
    Arc<dyn VideoLookup>,
    Arc<dyn ViewedPublisher>,
    MediaStore,
);

pub fn create_router(
    lookup: Arc<dyn VideoLookup>,
    publisher: Arc<dyn ViewedPublisher>,
    media: MediaStore,
) -> Router {
    Router::new()
        // 视频流
        .route("/video", get(super::streaming::stream_video))
        // 健康检查
        .route("/health", get(super::handlers::health_check))
        .with_state((lookup, publisher, media))
        // CORS中间件
        .layer(CorsLayer::permissive())
}
