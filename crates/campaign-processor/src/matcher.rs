//! 受众匹配
//!
//! 将活动的定向条件应用到完整的用户集合上，依次执行平台、分群、语言三道过滤，
//! 每一道只会缩小候选集合。最终按首次出现顺序去重输出设备标识。

use std::collections::HashSet;
use std::fmt;

use crate::models::{CampaignRecord, MatchResult, UserRecord, UserSchema, UserSet};

/// 单道过滤对单个用户的判定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterVerdict {
    /// 属性存在且匹配
    Pass,
    /// 属性存在但不匹配
    Reject,
    /// 用户数据没有该属性，过滤步骤不适用
    Skipped,
}

impl FilterVerdict {
    pub fn keeps(self) -> bool {
        !matches!(self, Self::Reject)
    }
}

impl fmt::Display for FilterVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pass => "pass",
            Self::Reject => "reject",
            Self::Skipped => "skipped",
        };
        write!(f, "{s}")
    }
}

/// 各过滤阶段后剩余的用户数
///
/// 被跳过的阶段记为 `None`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterStats {
    pub total: usize,
    pub after_platform: usize,
    pub after_segment: Option<usize>,
    pub after_language: Option<usize>,
}

/// 将活动中的平台写法映射为用户数据中的规范形式
///
/// 固定映射表之外的值一律转大写，因此对规范值幂等。
pub fn normalize_platform(platform: &str) -> String {
    match platform {
        "Android" => "ANDROID".to_string(),
        "IOS" | "iOS" => "IOS".to_string(),
        other => other.to_uppercase(),
    }
}

/// 由活动语言标签生成可接受的用户语言集合
///
/// 固定五种写法：原样、小写、`xx-xx`、`xx-us`、`xx-gb`。
pub fn language_variants(language: &str) -> [String; 5] {
    let lower = language.to_lowercase();
    [
        language.to_string(),
        lower.clone(),
        format!("{lower}-{lower}"),
        format!("{lower}-us"),
        format!("{lower}-gb"),
    ]
}

/// 预先计算好的活动定向条件
#[derive(Debug, Clone)]
pub struct AudienceCriteria {
    campaign_id: String,
    platform: String,
    segment: String,
    languages: [String; 5],
}

impl AudienceCriteria {
    pub fn from_campaign(campaign: &CampaignRecord) -> Self {
        Self {
            campaign_id: campaign.id.clone(),
            platform: normalize_platform(&campaign.platform),
            segment: campaign.segment.clone(),
            languages: language_variants(&campaign.language),
        }
    }

    pub fn platform_verdict(&self, user: &UserRecord) -> FilterVerdict {
        if user.platform == self.platform {
            FilterVerdict::Pass
        } else {
            FilterVerdict::Reject
        }
    }

    /// 分群精确匹配（区分大小写）
    pub fn segment_verdict(&self, schema: UserSchema, user: &UserRecord) -> FilterVerdict {
        if !schema.has_segment {
            return FilterVerdict::Skipped;
        }
        match user.segment.as_deref() {
            Some(segment) if segment == self.segment => FilterVerdict::Pass,
            _ => FilterVerdict::Reject,
        }
    }

    pub fn language_verdict(&self, schema: UserSchema, user: &UserRecord) -> FilterVerdict {
        if !schema.has_language {
            return FilterVerdict::Skipped;
        }
        match user.language.as_deref() {
            Some(language) if self.languages.iter().any(|v| v == language) => {
                FilterVerdict::Pass
            }
            _ => FilterVerdict::Reject,
        }
    }
}

/// 受众匹配器
pub struct AudienceMatcher;

impl AudienceMatcher {
    /// 对用户集合执行全部过滤并组装结果
    pub fn match_audience(campaign: &CampaignRecord, users: &UserSet) -> MatchResult {
        Self::match_with_stats(campaign, users).0
    }

    /// 同 [`Self::match_audience`]，同时返回各阶段剩余人数
    pub fn match_with_stats(campaign: &CampaignRecord, users: &UserSet) -> (MatchResult, FilterStats) {
        let criteria = AudienceCriteria::from_campaign(campaign);
        let schema = users.schema();

        let candidates: Vec<&UserRecord> = users
            .users()
            .iter()
            .filter(|u| criteria.platform_verdict(u).keeps())
            .collect();
        let after_platform = candidates.len();

        let candidates: Vec<&UserRecord> = candidates
            .into_iter()
            .filter(|u| criteria.segment_verdict(schema, u).keeps())
            .collect();
        let after_segment = schema.has_segment.then_some(candidates.len());

        let candidates: Vec<&UserRecord> = candidates
            .into_iter()
            .filter(|u| criteria.language_verdict(schema, u).keeps())
            .collect();
        let after_language = schema.has_language.then_some(candidates.len());

        let mut seen = HashSet::with_capacity(candidates.len());
        let ids: Vec<String> = candidates
            .into_iter()
            .filter(|u| seen.insert(u.user_pseudo_id.as_str()))
            .map(|u| u.user_pseudo_id.clone())
            .collect();

        let stats = FilterStats {
            total: users.len(),
            after_platform,
            after_segment,
            after_language,
        };
        (MatchResult::new(criteria.campaign_id, ids), stats)
    }
}
