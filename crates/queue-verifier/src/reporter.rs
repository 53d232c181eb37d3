//! 消费循环的上报接口
//!
//! 摘要输出到标准输出，其余事件走 tracing。

use push_shared::error::PushError;
use push_shared::kafka::ConsumerMessage;
use tracing::{error, info, warn};

use crate::drain::{DrainOutcome, DrainState};
use crate::error::VerifierError;
use crate::summary::PayloadSummary;

/// 原始内容在日志中的最大字符数
const RAW_LOG_CHARS: usize = 500;

#[cfg_attr(test, mockall::automock)]
pub trait DrainReporter: Send + Sync {
    /// 成功解码一条消息，`index` 从 1 开始
    fn summary(&self, index: usize, summary: &PayloadSummary);

    /// 解码失败，附带原始内容
    fn decode_failed(&self, message: &ConsumerMessage, raw: &str, error: &VerifierError);

    /// 单条消息的传输错误
    fn transport_failed(&self, error: &PushError);

    fn ack_failed(&self, message: &ConsumerMessage, error: &PushError);

    /// 循环结束，连接即将释放
    fn finished(&self, outcome: &DrainOutcome);
}

/// 默认上报实现
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl DrainReporter for ConsoleReporter {
    fn summary(&self, index: usize, summary: &PayloadSummary) {
        println!("\n消息 #{index}");
        println!("{}", "-".repeat(60));
        println!("{summary}");
    }

    fn decode_failed(&self, message: &ConsumerMessage, raw: &str, error: &VerifierError) {
        let raw: String = raw.chars().take(RAW_LOG_CHARS).collect();
        warn!(
            topic = %message.topic,
            partition = message.partition,
            offset = message.offset,
            code = error.code(),
            error = %error,
            raw = %raw,
            "消息解码失败，跳过"
        );
    }

    fn transport_failed(&self, error: &PushError) {
        error!(code = error.code(), error = %error, "读取消息出错，继续拉取");
    }

    fn ack_failed(&self, message: &ConsumerMessage, error: &PushError) {
        warn!(
            topic = %message.topic,
            partition = message.partition,
            offset = message.offset,
            error = %error,
            "提交位点失败"
        );
    }

    fn finished(&self, outcome: &DrainOutcome) {
        match outcome.state {
            DrainState::Drained => info!(
                received = outcome.received,
                decode_errors = outcome.decode_errors,
                "已收到指定数量的消息"
            ),
            DrainState::Interrupted => info!(
                received = outcome.received,
                "stopped by request"
            ),
            DrainState::Fatal => error!(
                received = outcome.received,
                "消费循环因致命错误终止"
            ),
            DrainState::Init | DrainState::Polling => {}
        }
    }
}
