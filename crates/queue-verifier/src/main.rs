//! 队列校验命令行入口
//!
//! Ctrl+C 或 SIGTERM 视为正常停止，退出码为 0。

use std::time::Duration;

use clap::Parser;
use push_shared::config::AppConfig;
use push_shared::observability;
use queue_verifier::cli::Cli;
use queue_verifier::drain::{DrainOptions, drain};
use queue_verifier::reader::KafkaQueueReader;
use queue_verifier::reporter::ConsoleReporter;
use tokio::signal;
use tokio::sync::watch;
use tracing::{info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load("queue-verifier")?;
    cli.apply(&mut config);
    observability::init(&config.service_name, &config.observability)?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    let reader = KafkaQueueReader::open(&config.kafka, &cli.topic)?;
    let options = DrainOptions {
        max_messages: cli.max_messages,
        poll_timeout: Duration::from_secs(cli.poll_timeout_secs),
    };
    info!(
        topic = %cli.topic,
        max_messages = options.max_messages,
        group_id = %config.kafka.group_id,
        "开始读取推送队列"
    );

    let outcome = drain(reader, &options, &ConsoleReporter, shutdown_rx).await?;
    info!(state = %outcome.state, received = outcome.received, "校验结束");
    Ok(())
}

/// 等待 Ctrl+C 或 SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "无法监听 Ctrl+C 信号");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "无法监听 SIGTERM 信号");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("收到 Ctrl+C，停止读取"),
        _ = terminate => info!("收到 SIGTERM，停止读取"),
    }
}
