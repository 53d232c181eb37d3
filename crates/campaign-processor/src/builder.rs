//! 推送消息构造
//!
//! 纯函数：给定活动、匹配结果和构造时间，输出完整的线上消息。
//! 总是携带全部设备标识，截断展示由校验工具负责。

use chrono::{DateTime, Utc};
use push_shared::payload::CampaignPayload;
use serde::Serialize;

use crate::models::{CampaignRecord, MatchResult};

/// 预览中展示的设备标识数量
pub const PREVIEW_TOKENS: usize = 3;

pub struct PayloadBuilder;

impl PayloadBuilder {
    pub fn build(
        campaign: &CampaignRecord,
        matched: MatchResult,
        now: DateTime<Utc>,
    ) -> CampaignPayload {
        CampaignPayload::new(
            campaign.id.clone(),
            campaign.message.clone(),
            campaign.segment.clone(),
            campaign.platform.clone(),
            campaign.language.clone(),
            now,
            matched.into_user_pseudo_ids(),
        )
    }
}

/// dry-run 模式下展示的消息预览
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DryRunPreview {
    pub message: String,
    pub tokens: Vec<String>,
}

impl DryRunPreview {
    pub fn from_payload(payload: &CampaignPayload) -> Self {
        Self {
            message: payload.message().to_string(),
            tokens: payload
                .user_pseudo_ids()
                .iter()
                .take(PREVIEW_TOKENS)
                .cloned()
                .collect(),
        }
    }
}
