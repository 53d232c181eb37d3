//! 测试辅助工具

mod data;
mod kafka_helper;
mod reporter;

pub use data::{CAMPAIGNS_CSV, CsvFixture, USERS_CSV};
pub use kafka_helper::KafkaHelper;
pub use reporter::CollectingReporter;
