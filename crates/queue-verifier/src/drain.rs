//! 队列排空
//!
//! 状态机 `Init -> Polling -> (Drained | Interrupted | Fatal)`。
//! 每轮拉取前检查关闭信号，拉取本身有等待上限；超时不是错误。
//! 读取端的传输错误（包括 broker 暂时不可达）记录后继续拉取，
//! 只有客户端进入不可恢复状态才转入 `Fatal`。
//! 读取端按值传入，所有退出路径上都会被释放。

use std::fmt;
use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

use crate::error::{Result, VerifierError};
use crate::reader::QueueReader;
use crate::reporter::DrainReporter;
use crate::summary::{PayloadSummary, decode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainState {
    Init,
    Polling,
    /// 已收到 `max_messages` 条合法消息
    Drained,
    /// 收到关闭信号
    Interrupted,
    Fatal,
}

impl fmt::Display for DrainState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Init => "init",
            Self::Polling => "polling",
            Self::Drained => "drained",
            Self::Interrupted => "interrupted",
            Self::Fatal => "fatal",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone)]
pub struct DrainOptions {
    pub max_messages: usize,
    /// 单次拉取的最长等待
    pub poll_timeout: Duration,
}

impl Default for DrainOptions {
    fn default() -> Self {
        Self {
            max_messages: 10,
            poll_timeout: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrainOutcome {
    pub state: DrainState,
    /// 成功解码的消息数
    pub received: usize,
    pub decode_errors: usize,
    pub transport_errors: usize,
}

impl DrainOutcome {
    fn new() -> Self {
        Self {
            state: DrainState::Init,
            received: 0,
            decode_errors: 0,
            transport_errors: 0,
        }
    }
}

/// 从读取端拉取消息直到收满、被中断或遇到致命错误
///
/// 致命错误以 `Err` 返回，此前上报器已收到 `Fatal` 状态的结果。
/// `auto_ack` 关闭时，只有成功解码的消息才会被确认。
pub async fn drain<R: QueueReader>(
    reader: R,
    options: &DrainOptions,
    reporter: &dyn DrainReporter,
    shutdown: watch::Receiver<bool>,
) -> Result<DrainOutcome> {
    let mut outcome = DrainOutcome::new();
    let result = poll_loop(&reader, options, reporter, &shutdown, &mut outcome).await;
    reporter.finished(&outcome);
    drop(reader);
    result.map(|()| outcome)
}

async fn poll_loop<R: QueueReader>(
    reader: &R,
    options: &DrainOptions,
    reporter: &dyn DrainReporter,
    shutdown: &watch::Receiver<bool>,
    outcome: &mut DrainOutcome,
) -> Result<()> {
    outcome.state = DrainState::Polling;

    while outcome.received < options.max_messages {
        if *shutdown.borrow() {
            outcome.state = DrainState::Interrupted;
            return Ok(());
        }

        let message = match reader.poll(options.poll_timeout).await {
            Ok(Some(message)) => message,
            Ok(None) => {
                debug!("本轮拉取超时，继续等待");
                continue;
            }
            Err(e) if e.is_client_fatal() => {
                outcome.state = DrainState::Fatal;
                return Err(e.into());
            }
            Err(e) => {
                outcome.transport_errors += 1;
                reporter.transport_failed(&e);
                continue;
            }
        };

        let payload = match decode(&message) {
            Ok(payload) => payload,
            Err(e) => {
                outcome.decode_errors += 1;
                let raw = String::from_utf8_lossy(&message.payload);
                reporter.decode_failed(&message, &raw, &e);
                continue;
            }
        };

        outcome.received += 1;
        reporter.summary(outcome.received, &PayloadSummary::from_payload(&payload));

        if !reader.auto_ack() {
            if let Err(e) = reader.ack(&message) {
                if e.is_client_fatal() {
                    outcome.state = DrainState::Fatal;
                    return Err(VerifierError::Shared(e));
                }
                reporter.ack_failed(&message, &e);
            }
        }
    }

    outcome.state = DrainState::Drained;
    Ok(())
}
