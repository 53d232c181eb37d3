//! 测试套件

pub mod broker_failure;
pub mod publish_and_verify;
