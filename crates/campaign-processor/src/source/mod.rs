//! 记录数据源
//!
//! 数据源只暴露两种查询：按状态取活动、取全部设备记录。
//! 匹配逻辑全部在管道内完成，数据源不做任何过滤之外的决策。

mod csv;
mod postgres;

pub use self::csv::CsvRecordSource;
pub use self::postgres::PostgresRecordSource;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{CampaignRecord, UserSet};

/// 数据源接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// 状态等于 `status` 的全部活动，保持数据源返回的顺序
    async fn campaigns_by_status(&self, status: &str) -> Result<Vec<CampaignRecord>>;

    /// 全部设备记录及其属性描述
    async fn users(&self) -> Result<UserSet>;
}
