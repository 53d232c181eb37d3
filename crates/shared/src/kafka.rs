//! Kafka 基础设施封装
//!
//! 将 rdkafka 的底层 API 封装为业务友好的 Producer/Consumer 抽象，
//! 统一消息序列化、错误分级和连接释放语义。

use std::time::Duration;

use rdkafka::config::ClientConfig;
use rdkafka::consumer::{CommitMode, Consumer, StreamConsumer};
use rdkafka::error::{KafkaError, RDKafkaErrorCode};
use rdkafka::message::{BorrowedMessage, Message};
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::{Offset, TopicPartitionList};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::KafkaConfig;
use crate::error::PushError;

// ---------------------------------------------------------------------------
// Topic 常量
// ---------------------------------------------------------------------------

/// 命令行工具的默认 topic
pub mod topics {
    /// 活动管道的默认输出
    pub const PUSH_READY: &str = "push-ready";
    /// 校验工具默认读取的 topic
    pub const CAMPAIGN_USERS: &str = "campaign_users";
}

/// 将 rdkafka 错误映射为业务错误
///
/// 客户端创建/配置失败以及 broker 整体不可达映射为 `BrokerUnavailable`，
/// librdkafka 的 `Fatal` 映射为 `ClientFatal`，其余视为单条消息级别的传输错误。
pub fn classify(err: KafkaError) -> PushError {
    if err.rdkafka_error_code() == Some(RDKafkaErrorCode::Fatal) {
        return PushError::ClientFatal(err.to_string());
    }

    let broker_down = matches!(
        err,
        KafkaError::ClientCreation(_) | KafkaError::ClientConfig(..)
    ) || matches!(
        err.rdkafka_error_code(),
        Some(
            RDKafkaErrorCode::AllBrokersDown
                | RDKafkaErrorCode::Resolve
                | RDKafkaErrorCode::Authentication
        )
    );

    if broker_down {
        PushError::BrokerUnavailable(err.to_string())
    } else {
        PushError::Kafka(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// ConsumerMessage
// ---------------------------------------------------------------------------

/// 消费到的 Kafka 消息的统一表示
///
/// 将 rdkafka 的 `BorrowedMessage`（带生命周期约束）转换为拥有所有权的结构体，
/// 使消息可以安全地跨 await 点传递，也便于在测试中直接构造。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerMessage {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    pub key: Option<String>,
    pub payload: Vec<u8>,
    pub timestamp: Option<i64>,
}

impl ConsumerMessage {
    /// 从 rdkafka 的借用消息构造，提取并拥有所有字段
    fn from_borrowed(msg: &BorrowedMessage<'_>) -> Self {
        let key = msg
            .key()
            .and_then(|k| std::str::from_utf8(k).ok())
            .map(String::from);

        Self {
            topic: msg.topic().to_string(),
            partition: msg.partition(),
            offset: msg.offset(),
            key,
            payload: msg.payload().map(|p| p.to_vec()).unwrap_or_default(),
            timestamp: msg.timestamp().to_millis(),
        }
    }

    /// 将负载视为 UTF-8 字符串返回
    pub fn payload_str(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.payload)
    }
}

// ---------------------------------------------------------------------------
// KafkaProducer
// ---------------------------------------------------------------------------

/// 面向业务的 Kafka 生产者
///
/// 封装 `FutureProducer`（本身是 Arc 包装的，Clone 代价很低）。
#[derive(Clone)]
pub struct KafkaProducer {
    producer: FutureProducer,
    send_timeout: Duration,
    metadata_timeout: Duration,
}

impl KafkaProducer {
    /// 根据配置创建生产者
    ///
    /// 创建本身不建立连接；需要确认 broker 可达时调用 [`Self::check_connectivity`]。
    pub fn new(config: &KafkaConfig) -> Result<Self, PushError> {
        config.validate()?;

        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", config.brokers())
            .set("message.timeout.ms", config.message_timeout_ms.to_string())
            .create()
            .map_err(classify)?;

        info!(brokers = %config.brokers(), "Kafka 生产者已初始化");
        Ok(Self {
            producer,
            send_timeout: Duration::from_millis(config.message_timeout_ms),
            metadata_timeout: Duration::from_millis(config.metadata_timeout_ms),
        })
    }

    /// 拉取集群元数据确认 broker 可达
    ///
    /// 失败一律视为 `BrokerUnavailable`，调用方应终止整次运行。
    pub async fn check_connectivity(&self) -> Result<usize, PushError> {
        let producer = self.producer.clone();
        let timeout = self.metadata_timeout;

        let brokers = tokio::task::spawn_blocking(move || {
            producer
                .client()
                .fetch_metadata(None, timeout)
                .map(|metadata| metadata.brokers().len())
        })
        .await
        .map_err(|e| PushError::Internal(format!("元数据查询任务异常: {e}")))?
        .map_err(|e| PushError::BrokerUnavailable(format!("无法获取集群元数据: {e}")))?;

        info!(brokers, "Kafka 集群可达");
        Ok(brokers)
    }

    /// 发送原始字节消息，`key` 为空时由分区器自行分配
    pub async fn send(
        &self,
        topic: &str,
        key: Option<&str>,
        payload: &[u8],
    ) -> Result<(i32, i64), PushError> {
        let mut record = FutureRecord::<str, [u8]>::to(topic).payload(payload);
        if let Some(key) = key {
            record = record.key(key);
        }

        // rdkafka 0.39+ 返回 Delivery 结构体而非元组
        let delivery = self
            .producer
            .send(record, self.send_timeout)
            .await
            .map_err(|(e, _)| classify(e))?;

        debug!(
            topic,
            partition = delivery.partition,
            offset = delivery.offset,
            "消息已发送"
        );
        Ok((delivery.partition, delivery.offset))
    }

    /// 将值序列化为 JSON 后发送
    pub async fn send_json<T: Serialize>(
        &self,
        topic: &str,
        key: Option<&str>,
        value: &T,
    ) -> Result<(i32, i64), PushError> {
        let payload = serde_json::to_vec(value)?;
        self.send(topic, key, &payload).await
    }

    /// 等待队列中尚未投递的消息发送完成
    pub fn flush(&self, timeout: Duration) -> Result<(), PushError> {
        self.producer.flush(timeout).map_err(classify)
    }
}

// ---------------------------------------------------------------------------
// KafkaConsumer
// ---------------------------------------------------------------------------

/// 面向业务的 Kafka 消费者
///
/// 封装 `StreamConsumer`，提供有界等待的单次拉取和显式确认。
/// 连接随所有权释放：drop 时退订，底层客户端随之关闭。
pub struct KafkaConsumer {
    consumer: StreamConsumer,
    group_id: String,
    auto_ack: bool,
}

impl KafkaConsumer {
    /// 创建消费者
    ///
    /// `auto_ack = false` 时关闭自动提交，位点只在 [`Self::commit`] 后前移。
    pub fn new(config: &KafkaConfig) -> Result<Self, PushError> {
        config.validate()?;

        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", config.brokers())
            .set("group.id", &config.group_id)
            .set("auto.offset.reset", config.offset_reset.as_str())
            .set("enable.auto.commit", config.auto_ack.to_string())
            .set("enable.partition.eof", "false")
            .create()
            .map_err(classify)?;

        info!(
            brokers = %config.brokers(),
            group_id = %config.group_id,
            auto_ack = config.auto_ack,
            "Kafka 消费者已初始化"
        );
        Ok(Self {
            consumer,
            group_id: config.group_id.clone(),
            auto_ack: config.auto_ack,
        })
    }

    /// 订阅指定的 topic 列表
    pub fn subscribe(&self, topics: &[&str]) -> Result<(), PushError> {
        self.consumer.subscribe(topics).map_err(classify)?;
        info!(?topics, group_id = %self.group_id, "已订阅 Kafka topics");
        Ok(())
    }

    pub fn auto_ack(&self) -> bool {
        self.auto_ack
    }

    /// 拉取一条消息，最多等待 `timeout`
    ///
    /// 超时返回 `Ok(None)`，不视为错误。
    pub async fn poll(&self, timeout: Duration) -> Result<Option<ConsumerMessage>, PushError> {
        match tokio::time::timeout(timeout, self.consumer.recv()).await {
            Err(_elapsed) => Ok(None),
            Ok(Ok(msg)) => {
                let msg = ConsumerMessage::from_borrowed(&msg);
                debug!(
                    topic = %msg.topic,
                    partition = msg.partition,
                    offset = msg.offset,
                    "收到 Kafka 消息"
                );
                Ok(Some(msg))
            }
            Ok(Err(e)) => Err(classify(e)),
        }
    }

    /// 显式确认一条消息：提交其下一个位点
    pub fn commit(&self, msg: &ConsumerMessage) -> Result<(), PushError> {
        let mut tpl = TopicPartitionList::new();
        tpl.add_partition_offset(&msg.topic, msg.partition, Offset::Offset(msg.offset + 1))
            .map_err(classify)?;
        self.consumer
            .commit(&tpl, CommitMode::Async)
            .map_err(classify)
    }
}

impl Drop for KafkaConsumer {
    fn drop(&mut self) {
        self.consumer.unsubscribe();
        info!(group_id = %self.group_id, "Kafka 消费者连接已释放");
    }
}

impl std::fmt::Debug for KafkaConsumer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KafkaConsumer")
            .field("group_id", &self.group_id)
            .field("auto_ack", &self.auto_ack)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// 测试
// ---------------------------------------------------------------------------
