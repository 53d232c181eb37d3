//! 推送就绪消息的线上格式
//!
//! 每个符合条件的活动对应一条消息。管道负责构造，校验工具负责解码，
//! 两端共享同一个类型以保证字段名和约束一致。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PushError;

/// 推送就绪消息
///
/// 构造后不可变；`user_count` 始终等于 `user_pseudo_ids` 的长度。
/// 反序列化得到的实例需调用 [`CampaignPayload::validate`] 检查该约束。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignPayload {
    campaign_id: String,
    message: String,
    segment: String,
    platform: String,
    language: String,
    user_count: usize,
    #[serde(with = "processed_at_format")]
    processed_at: DateTime<Utc>,
    user_pseudo_ids: Vec<String>,
}

impl CampaignPayload {
    pub fn new(
        campaign_id: impl Into<String>,
        message: impl Into<String>,
        segment: impl Into<String>,
        platform: impl Into<String>,
        language: impl Into<String>,
        processed_at: DateTime<Utc>,
        user_pseudo_ids: Vec<String>,
    ) -> Self {
        Self {
            campaign_id: campaign_id.into(),
            message: message.into(),
            segment: segment.into(),
            platform: platform.into(),
            language: language.into(),
            user_count: user_pseudo_ids.len(),
            processed_at,
            user_pseudo_ids,
        }
    }

    pub fn campaign_id(&self) -> &str {
        &self.campaign_id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn segment(&self) -> &str {
        &self.segment
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn user_count(&self) -> usize {
        self.user_count
    }

    pub fn processed_at(&self) -> DateTime<Utc> {
        self.processed_at
    }

    pub fn user_pseudo_ids(&self) -> &[String] {
        &self.user_pseudo_ids
    }

    /// 检查计数约束
    pub fn validate(&self) -> Result<(), PushError> {
        if self.user_count != self.user_pseudo_ids.len() {
            return Err(PushError::InvalidArgument {
                field: "user_count".to_string(),
                message: format!(
                    "user_count={} 与 user_pseudo_ids 长度 {} 不一致",
                    self.user_count,
                    self.user_pseudo_ids.len()
                ),
            });
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<Vec<u8>, PushError> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// `processed_at` 的编解码
///
/// 写出 RFC 3339（微秒精度，`Z` 结尾）；读入时同时接受不带时区的
/// ISO 8601 时间，按 UTC 解释。
mod processed_at_format {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Micros, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|e| de::Error::custom(format!("无法解析 processed_at '{raw}': {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_payload(ids: Vec<String>) -> CampaignPayload {
        CampaignPayload::new(
            "65f0c2",
            "Quay lại học tiếng Nhật nào!",
            "Churned_subcribers",
            "Android",
            "th",
            Utc.with_ymd_and_hms(2025, 8, 11, 9, 30, 0).unwrap(),
            ids,
        )
    }

    #[test]
    fn test_user_count_follows_ids() {
        let payload = sample_payload(vec!["user1".to_string(), "user2".to_string()]);
        assert_eq!(payload.user_count(), 2);
        assert!(payload.validate().is_ok());

        let empty = sample_payload(vec![]);
        assert_eq!(empty.user_count(), 0);
        assert!(empty.validate().is_ok());
    }

    #[test]
    fn test_round_trip() {
        let payload = sample_payload(vec!["user1".to_string(), "user9".to_string()]);
        let bytes = payload.to_json().unwrap();
        let decoded: CampaignPayload = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn test_wire_field_names() {
        let payload = sample_payload(vec!["user1".to_string()]);
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["campaign_id"], "65f0c2");
        assert_eq!(value["user_count"], 1);
        assert_eq!(value["processed_at"], "2025-08-11T09:30:00.000000Z");
        assert_eq!(value["user_pseudo_ids"], serde_json::json!(["user1"]));
    }

    #[test]
    fn test_naive_timestamp_is_utc() {
        let raw = r#"{
            "campaign_id": "c1", "message": "m", "segment": "s",
            "platform": "IOS", "language": "vi", "user_count": 0,
            "processed_at": "2025-08-11T16:05:42.123456",
            "user_pseudo_ids": []
        }"#;
        let decoded: CampaignPayload = serde_json::from_str(raw).unwrap();
        assert_eq!(
            decoded.processed_at(),
            Utc.with_ymd_and_hms(2025, 8, 11, 16, 5, 42).unwrap()
                + chrono::Duration::microseconds(123_456)
        );
    }

    #[test]
    fn test_validate_detects_count_mismatch() {
        let raw = r#"{
            "campaign_id": "c1", "message": "m", "segment": "s",
            "platform": "IOS", "language": "vi", "user_count": 3,
            "processed_at": "2025-08-11T16:05:42Z",
            "user_pseudo_ids": ["a"]
        }"#;
        let decoded: CampaignPayload = serde_json::from_str(raw).unwrap();
        assert!(decoded.validate().is_err());
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let raw = r#"{"campaign_id": "c1", "message": "m"}"#;
        assert!(serde_json::from_str::<CampaignPayload>(raw).is_err());
    }
}
