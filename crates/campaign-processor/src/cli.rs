//! 命令行参数
//!
//! 命令行参数优先于配置文件；未指定的可选参数沿用配置值。

use clap::{Parser, ValueEnum};
use push_shared::config::AppConfig;
use push_shared::kafka::topics;

use crate::pipeline::RunMode;

/// 活动记录来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// 平面文件（campaigns.csv + users.csv）
    Csv,
    /// PostgreSQL 数据库，兼容旧脚本中的 `mongodb` 写法
    #[value(alias = "mongodb")]
    Postgres,
}

/// 活动受众解析与推送工具
///
/// 读取全部 Scheduled 活动，为每个活动匹配目标设备并发布一条消息。
#[derive(Parser, Debug)]
#[command(name = "campaign-processor")]
#[command(version, about = "活动受众解析与推送消息发布")]
pub struct Cli {
    /// 活动记录来源
    #[arg(long, value_enum)]
    pub source: SourceKind,

    /// 发布目标 topic
    #[arg(long, default_value = topics::PUSH_READY)]
    pub kafka_topic: String,

    /// 活动所在的表名（仅 postgres 来源）
    #[arg(long, default_value = "test")]
    pub collection_name: String,

    /// 只匹配和预览，不发布
    #[arg(long)]
    pub dry_run: bool,

    /// Kafka brokers 地址，逗号分隔（覆盖配置）
    #[arg(long)]
    pub kafka_brokers: Option<String>,

    /// 活动 CSV 文件路径（覆盖配置）
    #[arg(long)]
    pub campaigns_csv: Option<String>,

    /// 用户 CSV 文件路径（覆盖配置）
    #[arg(long)]
    pub users_csv: Option<String>,

    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,
}

impl Cli {
    pub fn run_mode(&self) -> RunMode {
        if self.dry_run {
            RunMode::DryRun
        } else {
            RunMode::Publish
        }
    }

    /// 将命令行覆盖项写入配置
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(brokers) = &self.kafka_brokers {
            config.kafka.bootstrap_servers = brokers
                .split(',')
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(path) = &self.campaigns_csv {
            config.source.campaigns_csv = path.clone();
        }
        if let Some(path) = &self.users_csv {
            config.source.users_csv = path.clone();
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }
    }
}
