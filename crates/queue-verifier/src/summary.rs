//! 载荷摘要
//!
//! 解码与展示：消息正文截断到 100 个字符，设备标识最多展示 5 个。

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use push_shared::kafka::ConsumerMessage;
use push_shared::payload::CampaignPayload;

use crate::error::{Result, VerifierError};

/// 摘要中消息正文的最大字符数
pub const MESSAGE_PREVIEW_CHARS: usize = 100;
/// 摘要中展示的设备标识数量
pub const SAMPLE_IDS: usize = 5;

/// 将原始消息解码为载荷：UTF-8 -> JSON -> 约定校验
pub fn decode(message: &ConsumerMessage) -> Result<CampaignPayload> {
    let text = message.payload_str()?;
    let payload: CampaignPayload = serde_json::from_str(text)?;
    payload
        .validate()
        .map_err(|e| VerifierError::ContractViolation(e.to_string()))?;
    Ok(payload)
}

/// 按字符截断，发生截断时追加 `...`
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// 单条载荷的人类可读摘要
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadSummary {
    pub campaign_id: String,
    pub message: String,
    pub segment: String,
    pub platform: String,
    pub language: String,
    pub user_count: usize,
    pub processed_at: DateTime<Utc>,
    pub sample_ids: Vec<String>,
    /// 未展示的设备标识数量
    pub remaining: usize,
}

impl PayloadSummary {
    pub fn from_payload(payload: &CampaignPayload) -> Self {
        let ids = payload.user_pseudo_ids();
        let sample_ids: Vec<String> = ids.iter().take(SAMPLE_IDS).cloned().collect();
        Self {
            campaign_id: payload.campaign_id().to_string(),
            message: truncate(payload.message(), MESSAGE_PREVIEW_CHARS),
            segment: payload.segment().to_string(),
            platform: payload.platform().to_string(),
            language: payload.language().to_string(),
            user_count: payload.user_count(),
            processed_at: payload.processed_at(),
            remaining: ids.len() - sample_ids.len(),
            sample_ids,
        }
    }
}

impl fmt::Display for PayloadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "活动 ID: {}", self.campaign_id)?;
        writeln!(f, "消息内容: {}", self.message)?;
        writeln!(f, "分群: {}", self.segment)?;
        writeln!(f, "平台: {}", self.platform)?;
        writeln!(f, "语言: {}", self.language)?;
        writeln!(f, "用户数: {}", self.user_count)?;
        writeln!(
            f,
            "处理时间: {}",
            self.processed_at.to_rfc3339_opts(SecondsFormat::Micros, true)
        )?;
        write!(f, "示例设备: [{}]", self.sample_ids.join(", "))?;
        if self.remaining > 0 {
            write!(f, " 还有 {} 个", self.remaining)?;
        }
        Ok(())
    }
}
