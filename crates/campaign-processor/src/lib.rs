//! 活动受众解析与推送
//!
//! 读取 Scheduled 活动，在完整的设备集合上按平台、分群、语言解析目标受众，
//! 为每个活动构造一条推送消息并发布到 Kafka。

pub mod builder;
pub mod cli;
pub mod error;
pub mod matcher;
pub mod models;
pub mod observer;
pub mod pipeline;
pub mod publisher;
pub mod source;
