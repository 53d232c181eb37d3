//! 统一错误处理模块
//!
//! 定义推送管道与校验工具共享的错误类型，使用 thiserror 提供良好的错误信息。
//! 区分"单条记录可恢复"与"整次运行不可继续"两类故障，由 `is_fatal` 表达。

use thiserror::Error;

/// 共享错误类型
#[derive(Debug, Error)]
pub enum PushError {
    // ==================== 配置错误 ====================
    #[error("配置加载失败: {0}")]
    Config(#[from] config::ConfigError),

    #[error("无效的参数: {field} - {message}")]
    InvalidArgument { field: String, message: String },

    // ==================== Kafka 错误 ====================
    /// 单条消息级别的传输错误，调用方记录日志后继续
    #[error("Kafka 错误: {0}")]
    Kafka(String),

    /// Broker 整体不可达或客户端配置无效，整次运行必须终止
    #[error("Kafka broker 不可用: {0}")]
    BrokerUnavailable(String),

    /// librdkafka 客户端进入不可恢复状态，必须重建客户端
    #[error("Kafka 客户端致命错误: {0}")]
    ClientFatal(String),

    // ==================== 序列化错误 ====================
    #[error("序列化失败: {0}")]
    Serialization(#[from] serde_json::Error),

    // ==================== 通用错误 ====================
    #[error("内部错误: {0}")]
    Internal(String),
}

/// 错误结果类型别名
pub type Result<T> = std::result::Result<T, PushError>;

impl PushError {
    /// 获取错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Self::Kafka(_) => "KAFKA_ERROR",
            Self::BrokerUnavailable(_) => "BROKER_UNAVAILABLE",
            Self::ClientFatal(_) => "CLIENT_FATAL",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// 是否会使整次运行失去意义
    ///
    /// 配置错误和 broker 不可达属于此类；单条消息的发送或接收失败不属于。
    /// 发布端据此终止；读取端只在 `is_client_fatal` 时终止。
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::InvalidArgument { .. }
                | Self::BrokerUnavailable(_)
                | Self::ClientFatal(_)
        )
    }

    /// 客户端已无法继续使用，重试没有意义
    pub fn is_client_fatal(&self) -> bool {
        matches!(self, Self::ClientFatal(_))
    }
}
