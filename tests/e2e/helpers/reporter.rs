//! 收集上报内容的校验上报器

use std::sync::Mutex;

use push_shared::error::PushError;
use push_shared::kafka::ConsumerMessage;
use queue_verifier::drain::DrainOutcome;
use queue_verifier::error::VerifierError;
use queue_verifier::reporter::DrainReporter;
use queue_verifier::summary::PayloadSummary;

#[derive(Default)]
pub struct CollectingReporter {
    pub summaries: Mutex<Vec<PayloadSummary>>,
    pub decode_errors: Mutex<Vec<String>>,
    pub outcome: Mutex<Option<DrainOutcome>>,
}

impl DrainReporter for CollectingReporter {
    fn summary(&self, _index: usize, summary: &PayloadSummary) {
        if let Ok(mut summaries) = self.summaries.lock() {
            summaries.push(summary.clone());
        }
    }

    fn decode_failed(&self, _message: &ConsumerMessage, raw: &str, _error: &VerifierError) {
        if let Ok(mut errors) = self.decode_errors.lock() {
            errors.push(raw.to_string());
        }
    }

    fn transport_failed(&self, error: &PushError) {
        tracing::warn!(error = %error, "读取消息出错");
    }

    fn ack_failed(&self, _message: &ConsumerMessage, error: &PushError) {
        tracing::warn!(error = %error, "提交位点失败");
    }

    fn finished(&self, outcome: &DrainOutcome) {
        if let Ok(mut slot) = self.outcome.lock() {
            *slot = Some(outcome.clone());
        }
    }
}
