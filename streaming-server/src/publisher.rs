// 视频流服务 - 观看通知发布
//
// 把观看通知发布到消息队列的 "viewed" 主题。发布是尽力而为的：
// 失败只记录日志，绝不影响已经开始的视频流。
// 主题本身由部署侧预先创建，这里不做声明。

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use common::{ViewedEvent, VIEWED_TOPIC};
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::ClientConfig;
use std::sync::Arc;
use std::time::Duration;

/// 单次发布的超时
const PUBLISH_TIMEOUT: Duration = Duration::from_secs(5);

/// 观看通知发布接口
#[async_trait]
pub trait ViewedPublisher: Send + Sync {
    async fn publish_viewed(&self, event: &ViewedEvent) -> Result<()>;
}

/// 基于 Kafka 的观看通知发布器
///
/// 生产者在服务启动时创建一次，所有并发请求共享。
#[derive(Clone)]
pub struct KafkaViewedPublisher {
    producer: Arc<FutureProducer>,
    topic: String,
}

impl KafkaViewedPublisher {
    pub fn new(brokers: &str) -> Result<Self> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()
            .with_context(|| format!("Failed to create producer for topic '{}'", VIEWED_TOPIC))?;

        Ok(Self {
            producer: Arc::new(producer),
            topic: VIEWED_TOPIC.to_string(),
        })
    }

    /// 进程退出前冲刷尚未送达的通知
    pub fn flush(&self, timeout: Duration) -> Result<()> {
        self.producer
            .flush(timeout)
            .context("Failed to flush pending viewed events")
    }
}

#[async_trait]
impl ViewedPublisher for KafkaViewedPublisher {
    async fn publish_viewed(&self, event: &ViewedEvent) -> Result<()> {
        tracing::info!("Publishing message on \"{}\" topic.", self.topic);

        let payload =
            serde_json::to_string(event).context("Failed to serialize viewed event")?;
        let key = event.video_id.to_string();

        let record = FutureRecord::to(&self.topic).key(&key).payload(&payload);

        self.producer
            .send(record, PUBLISH_TIMEOUT)
            .await
            .map_err(|(err, _)| anyhow!("Failed to publish viewed event: {}", err))?;

        tracing::debug!(
            "Viewed event for video {} delivered to \"{}\"",
            event.video_id,
            self.topic
        );

        Ok(())
    }
}
