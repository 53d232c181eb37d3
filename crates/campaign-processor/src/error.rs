//! 活动管道错误类型
//!
//! 数据源错误一律向上传播并终止运行；发布错误按 `PushError::is_fatal`
//! 分级，由管道决定是跳过当前活动还是终止。

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("数据源错误: {0}")]
    Source(String),

    #[error("CSV 读取失败: {0}")]
    Csv(#[from] csv::Error),

    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Shared(#[from] push_shared::error::PushError),
}

pub type Result<T> = std::result::Result<T, ProcessorError>;

impl ProcessorError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Source(_) => "SOURCE_ERROR",
            Self::Csv(_) => "CSV_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Shared(e) => e.code(),
        }
    }
}
