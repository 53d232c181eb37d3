//! 活动推送命令行入口
//!
//! 单次运行：处理全部 Scheduled 活动后退出。未处理的错误以非零状态码退出。

use std::sync::Arc;
use std::time::Duration;

use campaign_processor::cli::{Cli, SourceKind};
use campaign_processor::observer::TracingObserver;
use campaign_processor::pipeline::{CampaignPipeline, RunMode};
use campaign_processor::publisher::KafkaPublisher;
use campaign_processor::source::{CsvRecordSource, PostgresRecordSource, RecordSource};
use clap::Parser;
use push_shared::config::AppConfig;
use push_shared::observability;
use tracing::{info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load("campaign-processor")?;
    cli.apply(&mut config);
    observability::init(&config.service_name, &config.observability)?;

    let source: Arc<dyn RecordSource> = match cli.source {
        SourceKind::Csv => Arc::new(CsvRecordSource::new(
            &config.source.campaigns_csv,
            &config.source.users_csv,
        )),
        SourceKind::Postgres => Arc::new(
            PostgresRecordSource::connect(&config.database, &cli.collection_name).await?,
        ),
    };

    let mode = cli.run_mode();
    let mut pipeline = CampaignPipeline::new(source, Arc::new(TracingObserver));

    // dry-run 不连接 broker
    let publisher = match mode {
        RunMode::Publish => Some(Arc::new(KafkaPublisher::connect(&config.kafka).await?)),
        RunMode::DryRun => None,
    };
    if let Some(publisher) = &publisher {
        pipeline = pipeline.with_publisher(publisher.clone());
    }

    info!(
        source = ?cli.source,
        topic = %cli.kafka_topic,
        dry_run = cli.dry_run,
        "开始处理 Scheduled 活动"
    );
    let result = pipeline.run(&cli.kafka_topic, mode).await;

    if let Some(publisher) = &publisher {
        let timeout = Duration::from_millis(config.kafka.message_timeout_ms);
        if let Err(e) = publisher.close(timeout) {
            warn!(error = %e, "Kafka 生产者刷新未完成");
        }
    }

    let report = result?;
    info!(
        processed = report.processed,
        published = report.published,
        failed = report.failed,
        empty_audience = report.empty_audience,
        "活动处理完成"
    );
    Ok(())
}
