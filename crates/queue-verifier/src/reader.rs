//! 队列读取端
//!
//! 消费循环只依赖 [`QueueReader`]；连接的释放交给所有权，读取端被 drop 时断开。

use std::time::Duration;

use async_trait::async_trait;
use push_shared::config::KafkaConfig;
use push_shared::error::PushError;
use push_shared::kafka::{ConsumerMessage, KafkaConsumer};
use tracing::info;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueueReader: Send + Sync {
    /// 拉取一条消息，最多等待 `timeout`；超时返回 `Ok(None)`
    async fn poll(&self, timeout: Duration) -> Result<Option<ConsumerMessage>, PushError>;

    /// 确认消息已处理
    fn ack(&self, message: &ConsumerMessage) -> Result<(), PushError>;

    /// 位点是否由客户端自动提交
    fn auto_ack(&self) -> bool;
}

/// 基于 Kafka 消费组的读取端
#[derive(Debug)]
pub struct KafkaQueueReader {
    consumer: KafkaConsumer,
}

impl KafkaQueueReader {
    /// 创建消费者并订阅 `topic`
    ///
    /// 新消费组从最早保留的位点开始读取（`offset_reset = earliest`）。
    pub fn open(config: &KafkaConfig, topic: &str) -> Result<Self, PushError> {
        let consumer = KafkaConsumer::new(config)?;
        consumer.subscribe(&[topic])?;
        info!(
            topic,
            group_id = %config.group_id,
            offset_reset = config.offset_reset.as_str(),
            "队列读取端已就绪"
        );
        Ok(Self { consumer })
    }
}

#[async_trait]
impl QueueReader for KafkaQueueReader {
    async fn poll(&self, timeout: Duration) -> Result<Option<ConsumerMessage>, PushError> {
        self.consumer.poll(timeout).await
    }

    fn ack(&self, message: &ConsumerMessage) -> Result<(), PushError> {
        self.consumer.commit(message)
    }

    fn auto_ack(&self) -> bool {
        self.consumer.auto_ack()
    }
}
