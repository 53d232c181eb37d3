//! 消息发布
//!
//! 每个符合条件的活动发布一条 JSON 消息，不设置消息键（跨活动无序投递可接受）。
//! 只等待 broker 确认写入，不等待下游消费者。

use std::time::Duration;

use async_trait::async_trait;
use push_shared::config::KafkaConfig;
use push_shared::error::PushError;
use push_shared::kafka::KafkaProducer;
use push_shared::payload::CampaignPayload;
use tracing::{debug, info};

/// 发布目标
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Publisher: Send + Sync {
    /// 发布一条消息
    ///
    /// 返回 `BrokerUnavailable` 表示整次运行无法继续，其余错误只影响当前活动。
    async fn publish(&self, topic: &str, payload: &CampaignPayload) -> Result<(), PushError>;
}

/// 基于 Kafka 的发布器
pub struct KafkaPublisher {
    producer: KafkaProducer,
}

impl KafkaPublisher {
    /// 创建生产者并确认 broker 可达
    ///
    /// broker 不可达时返回 `BrokerUnavailable`，此时还没有处理任何活动。
    pub async fn connect(config: &KafkaConfig) -> Result<Self, PushError> {
        let producer = KafkaProducer::new(config)?;
        producer.check_connectivity().await?;
        Ok(Self { producer })
    }

    /// 等待尚未确认的消息投递完成，运行结束前调用
    pub fn close(&self, timeout: Duration) -> Result<(), PushError> {
        self.producer.flush(timeout)?;
        info!("Kafka 生产者已刷新");
        Ok(())
    }
}

#[async_trait]
impl Publisher for KafkaPublisher {
    async fn publish(&self, topic: &str, payload: &CampaignPayload) -> Result<(), PushError> {
        let (partition, offset) = self.producer.send_json(topic, None, payload).await?;
        debug!(
            campaign_id = %payload.campaign_id(),
            topic,
            partition,
            offset,
            "活动消息已写入"
        );
        Ok(())
    }
}
