//! 活动与设备记录
//!
//! 记录由外部数据源产生，在管道内只读。可选的用户属性（segment、language）
//! 是否存在由 [`UserSchema`] 显式描述，而不是靠空字符串默认值推断。

use serde::{Deserialize, Serialize};

/// 可进入受众解析的活动状态
pub const SCHEDULED_STATUS: &str = "Scheduled";

/// 活动记录
///
/// 缺失的定向条件按空字符串处理，通常会匹配不到任何用户。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CampaignRecord {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default)]
    pub segment: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}

impl CampaignRecord {
    pub fn is_scheduled(&self) -> bool {
        self.status == SCHEDULED_STATUS
    }
}

/// 设备记录
///
/// `platform` 为规范大写形式（ANDROID、IOS）。列存在但单元格为空时对应字段为 `None`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub user_pseudo_id: String,
    pub platform: String,
    pub language: Option<String>,
    pub segment: Option<String>,
}

impl UserRecord {
    pub fn new(user_pseudo_id: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            user_pseudo_id: user_pseudo_id.into(),
            platform: platform.into(),
            language: None,
            segment: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_segment(mut self, segment: impl Into<String>) -> Self {
        self.segment = Some(segment.into());
        self
    }
}

/// 用户数据集包含哪些可选属性
///
/// 属性缺失时对应的过滤步骤整体跳过，而不是视为不匹配。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserSchema {
    pub has_segment: bool,
    pub has_language: bool,
}

impl UserSchema {
    pub fn full() -> Self {
        Self {
            has_segment: true,
            has_language: true,
        }
    }
}

/// 完整的候选用户集合
#[derive(Debug, Clone, Default)]
pub struct UserSet {
    schema: UserSchema,
    users: Vec<UserRecord>,
}

impl UserSet {
    pub fn new(schema: UserSchema, users: Vec<UserRecord>) -> Self {
        Self { schema, users }
    }

    pub fn schema(&self) -> UserSchema {
        self.schema
    }

    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// 受众匹配结果
///
/// 设备标识互不重复，顺序为在源用户集合中首次出现的顺序。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    campaign_id: String,
    user_pseudo_ids: Vec<String>,
}

impl MatchResult {
    pub(crate) fn new(campaign_id: impl Into<String>, user_pseudo_ids: Vec<String>) -> Self {
        Self {
            campaign_id: campaign_id.into(),
            user_pseudo_ids,
        }
    }

    pub fn campaign_id(&self) -> &str {
        &self.campaign_id
    }

    pub fn user_pseudo_ids(&self) -> &[String] {
        &self.user_pseudo_ids
    }

    pub fn into_user_pseudo_ids(self) -> Vec<String> {
        self.user_pseudo_ids
    }

    pub fn len(&self) -> usize {
        self.user_pseudo_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.user_pseudo_ids.is_empty()
    }
}
