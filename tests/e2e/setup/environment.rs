//! 测试环境管理
//!
//! 每个用例使用独立的 topic 和消费组，互不干扰。

use anyhow::Result;
use push_shared::config::{KafkaConfig, OffsetReset};
use uuid::Uuid;

use crate::helpers::KafkaHelper;

pub struct TestEnvironment {
    pub kafka: KafkaHelper,
    pub kafka_config: KafkaConfig,
    pub topic: String,
}

impl TestEnvironment {
    /// 读取 KAFKA_BROKERS 并创建专用 topic
    pub async fn setup() -> Result<Self> {
        let brokers =
            std::env::var("KAFKA_BROKERS").unwrap_or_else(|_| "localhost:9092".to_string());

        let kafka_config = KafkaConfig {
            bootstrap_servers: brokers.split(',').map(|b| b.trim().to_string()).collect(),
            group_id: format!("e2e-verifier-{}", Uuid::new_v4()),
            offset_reset: OffsetReset::Earliest,
            auto_ack: false,
            ..Default::default()
        };

        let kafka = KafkaHelper::new(&kafka_config.brokers())?;
        let topic = format!("push-ready-e2e-{}", Uuid::new_v4().simple());
        kafka.create_topic(&topic).await?;

        Ok(Self {
            kafka,
            kafka_config,
            topic,
        })
    }

    pub async fn cleanup(&self) -> Result<()> {
        self.kafka.delete_topic(&self.topic).await
    }
}
