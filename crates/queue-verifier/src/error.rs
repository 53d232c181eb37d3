//! 校验工具错误类型
//!
//! 解码类错误只影响单条消息，由消费循环记录后跳过；
//! 共享错误中的致命类别会终止整个消费循环。

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerifierError {
    #[error("消息不是合法的 UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("消息不是合法的 JSON 载荷: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("消息违反载荷约定: {0}")]
    ContractViolation(String),

    #[error(transparent)]
    Shared(#[from] push_shared::error::PushError),
}

pub type Result<T> = std::result::Result<T, VerifierError>;

impl VerifierError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidUtf8(_) => "INVALID_UTF8",
            Self::InvalidJson(_) => "INVALID_JSON",
            Self::ContractViolation(_) => "CONTRACT_VIOLATION",
            Self::Shared(e) => e.code(),
        }
    }

    /// 是否属于单条消息的解码失败
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidUtf8(_) | Self::InvalidJson(_) | Self::ContractViolation(_)
        )
    }
}
