//! 管道观察者
//!
//! 管道的所有上报都经过显式传入的观察者，默认实现输出 tracing 事件。
//! 测试中替换为 mock 以断言上报内容。

use push_shared::error::PushError;
use push_shared::payload::CampaignPayload;
use tracing::{error, info, warn};

use crate::builder::DryRunPreview;
use crate::matcher::FilterStats;
use crate::models::CampaignRecord;

/// dry-run 日志中消息正文的截断长度（字符）
const PREVIEW_MESSAGE_CHARS: usize = 50;

#[cfg_attr(test, mockall::automock)]
pub trait PipelineObserver: Send + Sync {
    fn campaigns_loaded(&self, count: usize);

    fn campaign_matched(&self, campaign: &CampaignRecord, stats: &FilterStats, matched: usize);

    fn dry_run_preview(&self, campaign: &CampaignRecord, preview: &DryRunPreview);

    fn published(&self, topic: &str, payload: &CampaignPayload);

    fn publish_failed(&self, campaign: &CampaignRecord, error: &PushError);
}

/// 输出 tracing 日志的观察者
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn campaigns_loaded(&self, count: usize) {
        if count == 0 {
            warn!("未找到状态为 'Scheduled' 的活动");
        } else {
            info!(count, "待处理活动已加载");
        }
    }

    fn campaign_matched(&self, campaign: &CampaignRecord, stats: &FilterStats, matched: usize) {
        info!(
            campaign_id = %campaign.id,
            segment = %campaign.segment,
            platform = %campaign.platform,
            language = %campaign.language,
            country = ?campaign.country,
            total = stats.total,
            after_platform = stats.after_platform,
            after_segment = ?stats.after_segment,
            after_language = ?stats.after_language,
            matched,
            "受众匹配完成"
        );
    }

    fn dry_run_preview(&self, campaign: &CampaignRecord, preview: &DryRunPreview) {
        let message: String = campaign.message.chars().take(PREVIEW_MESSAGE_CHARS).collect();
        let payload = serde_json::to_string(preview).unwrap_or_default();
        info!(
            campaign_id = %campaign.id,
            message = %message,
            sample_tokens = ?preview.tokens,
            payload = %payload,
            "dry-run 预览，不发送"
        );
    }

    fn published(&self, topic: &str, payload: &CampaignPayload) {
        info!(
            campaign_id = %payload.campaign_id(),
            topic,
            user_count = payload.user_count(),
            "活动消息已发布"
        );
    }

    fn publish_failed(&self, campaign: &CampaignRecord, error: &PushError) {
        error!(
            campaign_id = %campaign.id,
            code = error.code(),
            error = %error,
            "活动消息发布失败，继续处理下一个活动"
        );
    }
}
