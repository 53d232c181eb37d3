//! CSV 文件数据源
//!
//! 活动文件按列名反序列化；用户文件的可选列（language、segment）由表头决定是否存在。

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::RecordSource;
use crate::error::{ProcessorError, Result};
use crate::models::{CampaignRecord, UserRecord, UserSchema, UserSet};

const USER_ID_COLUMN: &str = "user_pseudo_id";
const PLATFORM_COLUMN: &str = "platform";
const LANGUAGE_COLUMN: &str = "language";
const SEGMENT_COLUMN: &str = "segment";

pub struct CsvRecordSource {
    campaigns_path: PathBuf,
    users_path: PathBuf,
}

impl CsvRecordSource {
    pub fn new(campaigns_path: impl Into<PathBuf>, users_path: impl Into<PathBuf>) -> Self {
        Self {
            campaigns_path: campaigns_path.into(),
            users_path: users_path.into(),
        }
    }

    fn read_campaigns(path: &Path, status: &str) -> Result<Vec<CampaignRecord>> {
        let mut reader = ::csv::Reader::from_path(path)?;
        let mut campaigns = Vec::new();
        for record in reader.deserialize::<CampaignRecord>() {
            let campaign = record?;
            if campaign.status == status {
                campaigns.push(campaign);
            }
        }
        Ok(campaigns)
    }

    fn read_users(path: &Path) -> Result<UserSet> {
        let mut reader = ::csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();
        let column = |name: &str| headers.iter().position(|h| h == name);

        let required = |name: &str| {
            column(name).ok_or_else(|| {
                ProcessorError::Source(format!("{} 缺少必需列 {name}", path.display()))
            })
        };
        let id_idx = required(USER_ID_COLUMN)?;
        let platform_idx = required(PLATFORM_COLUMN)?;
        let language_idx = column(LANGUAGE_COLUMN);
        let segment_idx = column(SEGMENT_COLUMN);

        let schema = UserSchema {
            has_segment: segment_idx.is_some(),
            has_language: language_idx.is_some(),
        };

        let mut users = Vec::new();
        let mut skipped = 0usize;
        for record in reader.records() {
            let record = record?;
            // 空单元格视为缺失值
            let cell = |idx: Option<usize>| {
                idx.and_then(|i| record.get(i))
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
            };

            let Some(user_pseudo_id) = cell(Some(id_idx)) else {
                skipped += 1;
                continue;
            };
            users.push(UserRecord {
                user_pseudo_id,
                platform: cell(Some(platform_idx)).unwrap_or_default(),
                language: cell(language_idx),
                segment: cell(segment_idx),
            });
        }

        if skipped > 0 {
            warn!(path = %path.display(), skipped, "跳过缺少设备标识的用户行");
        }
        if !schema.has_segment {
            debug!(path = %path.display(), "用户数据无 segment 列，将跳过分群过滤");
        }
        Ok(UserSet::new(schema, users))
    }
}

#[async_trait]
impl RecordSource for CsvRecordSource {
    async fn campaigns_by_status(&self, status: &str) -> Result<Vec<CampaignRecord>> {
        let campaigns = Self::read_campaigns(&self.campaigns_path, status)?;
        info!(
            path = %self.campaigns_path.display(),
            status,
            count = campaigns.len(),
            "已从 CSV 读取活动"
        );
        Ok(campaigns)
    }

    async fn users(&self) -> Result<UserSet> {
        let users = Self::read_users(&self.users_path)?;
        debug!(
            path = %self.users_path.display(),
            count = users.len(),
            "已从 CSV 读取用户"
        );
        Ok(users)
    }
}
