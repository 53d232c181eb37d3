//! 发布与校验全链路

use std::sync::Arc;
use std::time::Duration;

use campaign_processor::observer::TracingObserver;
use campaign_processor::pipeline::{CampaignPipeline, RunMode};
use campaign_processor::publisher::KafkaPublisher;
use campaign_processor::source::CsvRecordSource;
use queue_verifier::drain::{DrainOptions, DrainState, drain};
use queue_verifier::reader::KafkaQueueReader;
use tokio::sync::watch;

use crate::helpers::{CAMPAIGNS_CSV, CollectingReporter, CsvFixture, USERS_CSV};
use crate::setup::TestEnvironment;

const DRAIN_DEADLINE: Duration = Duration::from_secs(60);

async fn publish_fixture(env: &TestEnvironment) -> usize {
    let fixture = CsvFixture::new(CAMPAIGNS_CSV, USERS_CSV).unwrap();
    let publisher = Arc::new(KafkaPublisher::connect(&env.kafka_config).await.unwrap());
    let pipeline = CampaignPipeline::new(
        Arc::new(CsvRecordSource::new(&fixture.campaigns, &fixture.users)),
        Arc::new(TracingObserver),
    )
    .with_publisher(publisher.clone());

    let report = pipeline.run(&env.topic, RunMode::Publish).await.unwrap();
    publisher.close(Duration::from_secs(5)).unwrap();
    report.published
}

/// 管道发布的消息能被校验工具完整解码
#[tokio::test]
#[ignore = "需要运行 Kafka"]
async fn test_published_payloads_are_verified() {
    let env = TestEnvironment::setup().await.unwrap();
    assert_eq!(publish_fixture(&env).await, 2);

    let reader = KafkaQueueReader::open(&env.kafka_config, &env.topic).unwrap();
    let reporter = CollectingReporter::default();
    let (_tx, rx) = watch::channel(false);
    let options = DrainOptions {
        max_messages: 2,
        poll_timeout: Duration::from_secs(2),
    };

    let outcome = tokio::time::timeout(DRAIN_DEADLINE, drain(reader, &options, &reporter, rx))
        .await
        .expect("校验工具未在期限内收满消息")
        .unwrap();

    assert_eq!(outcome.state, DrainState::Drained);
    let summaries = reporter.summaries.lock().unwrap();
    let mut ids: Vec<&str> = summaries.iter().map(|s| s.campaign_id.as_str()).collect();
    ids.sort();
    assert_eq!(ids, vec!["e2e-001", "e2e-002"]);

    let thai = summaries
        .iter()
        .find(|s| s.campaign_id == "e2e-001")
        .unwrap();
    assert_eq!(thai.sample_ids, vec!["user1"]);
    assert_eq!(thai.platform, "Android");

    let english = summaries
        .iter()
        .find(|s| s.campaign_id == "e2e-002")
        .unwrap();
    assert_eq!(english.user_count, 2);
    assert_eq!(english.sample_ids, vec!["user5", "user6"]);

    drop(summaries);
    env.cleanup().await.unwrap();
}

/// 格式错误的消息被跳过，不计入收满数量
#[tokio::test]
#[ignore = "需要运行 Kafka"]
async fn test_malformed_message_skipped() {
    let env = TestEnvironment::setup().await.unwrap();
    env.kafka
        .send_raw(&env.topic, b"{\"campaign_id\": ")
        .await
        .unwrap();
    assert_eq!(publish_fixture(&env).await, 2);

    let reader = KafkaQueueReader::open(&env.kafka_config, &env.topic).unwrap();
    let reporter = CollectingReporter::default();
    let (_tx, rx) = watch::channel(false);
    let options = DrainOptions {
        max_messages: 2,
        poll_timeout: Duration::from_secs(2),
    };

    let outcome = tokio::time::timeout(DRAIN_DEADLINE, drain(reader, &options, &reporter, rx))
        .await
        .expect("校验工具未在期限内收满消息")
        .unwrap();

    assert_eq!(outcome.received, 2);
    assert_eq!(outcome.decode_errors, 1);
    assert_eq!(
        *reporter.decode_errors.lock().unwrap(),
        vec!["{\"campaign_id\": ".to_string()]
    );

    env.cleanup().await.unwrap();
}
