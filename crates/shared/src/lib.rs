//! 共享库
//!
//! 活动管道与队列校验工具共用的配置、错误处理、Kafka 封装、线上消息格式与日志初始化。

pub mod config;
pub mod error;
pub mod kafka;
pub mod observability;
pub mod payload;
