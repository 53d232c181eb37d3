//! broker 不可达的处理
//!
//! 不需要运行中的 Kafka：连接一个不存在的地址。

use std::sync::Arc;

use campaign_processor::observer::TracingObserver;
use campaign_processor::pipeline::{CampaignPipeline, RunMode};
use campaign_processor::publisher::KafkaPublisher;
use campaign_processor::source::CsvRecordSource;
use push_shared::config::KafkaConfig;
use push_shared::error::PushError;

use crate::helpers::{CAMPAIGNS_CSV, CsvFixture, USERS_CSV};

fn unreachable_config() -> KafkaConfig {
    KafkaConfig {
        bootstrap_servers: vec!["127.0.0.1:1".to_string()],
        metadata_timeout_ms: 1000,
        message_timeout_ms: 1000,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_unreachable_broker_fails_before_processing() {
    let err = KafkaPublisher::connect(&unreachable_config())
        .await
        .err()
        .unwrap();
    assert!(matches!(err, PushError::BrokerUnavailable(_)));
    assert!(err.is_fatal());
}

#[tokio::test]
async fn test_invalid_broker_config_rejected() {
    let config = KafkaConfig {
        bootstrap_servers: vec![],
        ..Default::default()
    };
    let err = KafkaPublisher::connect(&config).await.err().unwrap();
    assert_eq!(err.code(), "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_dry_run_needs_no_broker() {
    let fixture = CsvFixture::new(CAMPAIGNS_CSV, USERS_CSV).unwrap();
    let pipeline = CampaignPipeline::new(
        Arc::new(CsvRecordSource::new(&fixture.campaigns, &fixture.users)),
        Arc::new(TracingObserver),
    );

    let report = pipeline.run("push-ready", RunMode::DryRun).await.unwrap();
    assert_eq!(report.processed, 2);
    assert_eq!(report.published, 0);
}
