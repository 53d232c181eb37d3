//! 命令行参数

use clap::Parser;
use push_shared::config::AppConfig;
use push_shared::kafka::topics;

/// 推送队列校验工具
///
/// 从指定 topic 读取消息并打印摘要，收满指定数量后退出；Ctrl+C 随时停止。
#[derive(Parser, Debug)]
#[command(name = "queue-verifier")]
#[command(version, about = "推送队列消息校验")]
pub struct Cli {
    /// 读取的 topic
    #[arg(long, default_value = topics::CAMPAIGN_USERS)]
    pub topic: String,

    /// 收到多少条合法消息后退出
    #[arg(long, default_value = "10")]
    pub max_messages: usize,

    /// 消费组 ID（未指定时取配置值，默认 campaign_consumer）
    #[arg(long)]
    pub group_id: Option<String>,

    /// 单次拉取的最长等待（秒）
    #[arg(long, default_value = "2")]
    pub poll_timeout_secs: u64,

    /// Kafka brokers 地址，逗号分隔（覆盖配置）
    #[arg(long)]
    pub kafka_brokers: Option<String>,

    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// 将命令行参数写入配置
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(group_id) = &self.group_id {
            config.kafka.group_id = group_id.clone();
        }
        if let Some(brokers) = &self.kafka_brokers {
            config.kafka.bootstrap_servers = brokers
                .split(',')
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["queue-verifier"]);
        assert_eq!(cli.topic, "campaign_users");
        assert_eq!(cli.max_messages, 10);
        assert_eq!(cli.poll_timeout_secs, 2);

        let mut config = AppConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.kafka.group_id, "campaign_consumer");
    }

    #[test]
    fn test_apply_group_id() {
        let cli = Cli::parse_from([
            "queue-verifier",
            "--topic",
            "push-ready",
            "--max-messages",
            "3",
            "--group-id",
            "verify-20250811",
        ]);
        let mut config = AppConfig::default();
        cli.apply(&mut config);

        assert_eq!(cli.topic, "push-ready");
        assert_eq!(cli.max_messages, 3);
        assert_eq!(config.kafka.group_id, "verify-20250811");
    }
}
