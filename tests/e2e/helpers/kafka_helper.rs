//! Kafka 辅助工具
//!
//! 负责测试 topic 的创建与删除，以及绕过管道直接写入原始消息。

use std::time::Duration;

use anyhow::{Result, anyhow};
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};

pub struct KafkaHelper {
    admin: AdminClient<DefaultClientContext>,
    producer: FutureProducer,
}

impl KafkaHelper {
    pub fn new(brokers: &str) -> Result<Self> {
        let admin: AdminClient<DefaultClientContext> = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .create()?;

        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()?;

        Ok(Self { admin, producer })
    }

    /// 创建单分区 topic
    pub async fn create_topic(&self, topic: &str) -> Result<()> {
        let new_topic = NewTopic::new(topic, 1, TopicReplication::Fixed(1));
        let results = self
            .admin
            .create_topics(&[new_topic], &AdminOptions::new())
            .await?;
        for result in results {
            result.map_err(|(name, code)| anyhow!("创建 topic {name} 失败: {code}"))?;
        }
        Ok(())
    }

    pub async fn delete_topic(&self, topic: &str) -> Result<()> {
        self.admin
            .delete_topics(&[topic], &AdminOptions::new())
            .await?;
        Ok(())
    }

    /// 写入任意字节，用于构造格式错误的消息
    pub async fn send_raw(&self, topic: &str, payload: &[u8]) -> Result<()> {
        self.producer
            .send(
                FutureRecord::<str, [u8]>::to(topic).payload(payload),
                Duration::from_secs(5),
            )
            .await
            .map_err(|(e, _)| anyhow!("发送消息失败: {e}"))?;
        Ok(())
    }
}
