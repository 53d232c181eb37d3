//! 活动推送端到端测试
//!
//! 测试覆盖完整的链路：
//! - CSV 数据源 -> 受众匹配 -> 发布到 Kafka
//! - 校验工具从同一 topic 读取并解码
//! - 格式错误的消息被跳过且不计数
//! - broker 不可达时发布器在处理任何活动前失败
//!
//! 需要 Kafka 的用例默认忽略：
//! `KAFKA_BROKERS=localhost:9092 cargo test --test e2e -- --ignored`

pub mod helpers;
pub mod setup;
pub mod suites;

pub use setup::TestEnvironment;
