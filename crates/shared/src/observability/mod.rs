//! 统一可观测性模块
//!
//! 两个命令行工具通过单一入口点配置日志输出，确保字段命名与格式一致。
//! 组件级的上报通过显式传入的观察者 trait 完成，这里只负责订阅器的安装。

pub mod tracing;

use ::tracing::info;
use anyhow::Result;

use crate::config::ObservabilityConfig;

/// 初始化日志订阅器
///
/// # Example
///
/// ```ignore
/// use push_shared::config::AppConfig;
///
/// let config = AppConfig::load("queue-verifier")?;
/// push_shared::observability::init(&config.service_name, &config.observability)?;
/// ```
pub fn init(service_name: &str, config: &ObservabilityConfig) -> Result<()> {
    tracing::init(config)?;

    info!(
        service = %service_name,
        log_level = %config.log_level,
        json_logs = config.json_logs,
        "Observability initialized"
    );
    Ok(())
}
