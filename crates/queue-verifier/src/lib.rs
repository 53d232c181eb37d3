//! 推送队列校验
//!
//! 从队列读取活动推送消息，解码并打印摘要，用于端到端确认管道的输出约定。

pub mod cli;
pub mod drain;
pub mod error;
pub mod reader;
pub mod reporter;
pub mod summary;
