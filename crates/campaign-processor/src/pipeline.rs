//! 活动处理管道
//!
//! 数据源 -> 受众匹配 -> 消息构造 -> 发布，一次处理一个活动，
//! 顺序与数据源返回的顺序一致。单个活动的发布失败只记录并跳过；
//! 数据源错误和 broker 整体不可达会终止整次运行。

use std::sync::Arc;

use chrono::Utc;
use push_shared::error::PushError;

use crate::builder::{DryRunPreview, PayloadBuilder};
use crate::error::Result;
use crate::matcher::AudienceMatcher;
use crate::models::{CampaignRecord, SCHEDULED_STATUS};
use crate::observer::PipelineObserver;
use crate::publisher::Publisher;
use crate::source::RecordSource;

/// 运行模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Publish,
    /// 完成匹配和构造，但不调用发布器
    DryRun,
}

/// 一次运行的统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// 已完成匹配和构造的活动数
    pub processed: usize,
    pub published: usize,
    pub failed: usize,
    /// 匹配结果为空的活动数（仍然会发布）
    pub empty_audience: usize,
}

pub struct CampaignPipeline {
    source: Arc<dyn RecordSource>,
    publisher: Option<Arc<dyn Publisher>>,
    observer: Arc<dyn PipelineObserver>,
}

impl CampaignPipeline {
    pub fn new(source: Arc<dyn RecordSource>, observer: Arc<dyn PipelineObserver>) -> Self {
        Self {
            source,
            publisher: None,
            observer,
        }
    }

    pub fn with_publisher(mut self, publisher: Arc<dyn Publisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// 处理全部 Scheduled 活动
    ///
    /// 没有符合条件的活动时返回 `processed == 0`，不视为错误。
    pub async fn run(&self, topic: &str, mode: RunMode) -> Result<PipelineReport> {
        let publisher = match (mode, &self.publisher) {
            (RunMode::Publish, None) => {
                return Err(PushError::InvalidArgument {
                    field: "publisher".to_string(),
                    message: "发布模式需要配置发布器".to_string(),
                }
                .into());
            }
            (RunMode::Publish, Some(p)) => Some(p.as_ref()),
            (RunMode::DryRun, _) => None,
        };

        let campaigns: Vec<CampaignRecord> = self
            .source
            .campaigns_by_status(SCHEDULED_STATUS)
            .await?
            .into_iter()
            .filter(CampaignRecord::is_scheduled)
            .collect();
        self.observer.campaigns_loaded(campaigns.len());

        let mut report = PipelineReport::default();
        for campaign in &campaigns {
            let users = self.source.users().await?;
            let (matched, stats) = AudienceMatcher::match_with_stats(campaign, &users);
            self.observer
                .campaign_matched(campaign, &stats, matched.len());

            let payload = PayloadBuilder::build(campaign, matched, Utc::now());
            report.processed += 1;
            if payload.user_count() == 0 {
                report.empty_audience += 1;
            }

            let Some(publisher) = publisher else {
                self.observer
                    .dry_run_preview(campaign, &DryRunPreview::from_payload(&payload));
                continue;
            };

            match publisher.publish(topic, &payload).await {
                Ok(()) => {
                    report.published += 1;
                    self.observer.published(topic, &payload);
                }
                Err(e) if e.is_fatal() => return Err(e.into()),
                Err(e) => {
                    report.failed += 1;
                    self.observer.publish_failed(campaign, &e);
                }
            }
        }

        Ok(report)
    }
}
