//! PostgreSQL 数据源
//!
//! 活动表由命令行 `--collection-name` 指定，设备表来自配置。
//! 活动按数据库返回的顺序处理，查询不附加排序。
//! 设备表的可选列通过 information_schema 探测，缺失时对应过滤步骤跳过。

use std::time::Duration;

use async_trait::async_trait;
use push_shared::config::DatabaseConfig;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;
use tracing::{info, instrument, warn};

use super::RecordSource;
use crate::error::{ProcessorError, Result};
use crate::models::{CampaignRecord, UserRecord, UserSchema, UserSet};

#[derive(Debug, sqlx::FromRow)]
struct CampaignRow {
    id: String,
    segment: Option<String>,
    platform: Option<String>,
    language: Option<String>,
    country: Option<String>,
    message: Option<String>,
    status: Option<String>,
}

impl From<CampaignRow> for CampaignRecord {
    fn from(row: CampaignRow) -> Self {
        Self {
            id: row.id,
            segment: row.segment.unwrap_or_default(),
            platform: row.platform.unwrap_or_default(),
            language: row.language.unwrap_or_default(),
            country: row.country,
            message: row.message.unwrap_or_default(),
            status: row.status.unwrap_or_default(),
        }
    }
}

/// 表名只允许字母、数字和下划线，且不以数字开头
pub(crate) fn validate_identifier(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ProcessorError::Source(format!("非法的表名: {name:?}")))
    }
}

/// 按状态读取活动，保持数据库返回的顺序
fn campaigns_query(table: &str) -> String {
    format!(
        r#"
        SELECT id::text AS id, segment, platform, language, country, message, status
        FROM "{table}"
        WHERE status = $1
        "#
    )
}

pub struct PostgresRecordSource {
    pool: PgPool,
    campaigns_table: String,
    users_table: String,
}

impl PostgresRecordSource {
    /// 创建连接池
    #[instrument(skip(config))]
    pub async fn connect(config: &DatabaseConfig, campaigns_table: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .connect(&config.url)
            .await?;
        info!("Database connection pool created");

        Self::from_pool(pool, campaigns_table, &config.users_table)
    }

    pub fn from_pool(pool: PgPool, campaigns_table: &str, users_table: &str) -> Result<Self> {
        validate_identifier(campaigns_table)?;
        validate_identifier(users_table)?;
        Ok(Self {
            pool,
            campaigns_table: campaigns_table.to_string(),
            users_table: users_table.to_string(),
        })
    }

    async fn user_columns(&self) -> Result<Vec<String>> {
        let columns: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT column_name::text
            FROM information_schema.columns
            WHERE table_schema = current_schema() AND table_name = $1
            "#,
        )
        .bind(&self.users_table)
        .fetch_all(&self.pool)
        .await?;
        Ok(columns)
    }
}

#[async_trait]
impl RecordSource for PostgresRecordSource {
    async fn campaigns_by_status(&self, status: &str) -> Result<Vec<CampaignRecord>> {
        let sql = campaigns_query(&self.campaigns_table);
        let rows: Vec<CampaignRow> = sqlx::query_as(&sql)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;

        info!(
            table = %self.campaigns_table,
            status,
            count = rows.len(),
            "已从数据库读取活动"
        );
        Ok(rows.into_iter().map(CampaignRecord::from).collect())
    }

    async fn users(&self) -> Result<UserSet> {
        let columns = self.user_columns().await?;
        let has = |name: &str| columns.iter().any(|c| c == name);
        if !has("user_pseudo_id") || !has("platform") {
            return Err(ProcessorError::Source(format!(
                "表 {} 缺少 user_pseudo_id 或 platform 列",
                self.users_table
            )));
        }

        let schema = UserSchema {
            has_segment: has("segment"),
            has_language: has("language"),
        };
        let mut select = vec![
            "user_pseudo_id::text AS user_pseudo_id",
            "platform::text AS platform",
        ];
        if schema.has_language {
            select.push("language::text AS language");
        }
        if schema.has_segment {
            select.push("segment::text AS segment");
        }
        let sql = format!(
            r#"SELECT {} FROM "{}""#,
            select.join(", "),
            self.users_table
        );

        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        let mut users = Vec::with_capacity(rows.len());
        let mut skipped = 0usize;
        for row in rows {
            let Some(user_pseudo_id) = row.try_get::<Option<String>, _>("user_pseudo_id")? else {
                skipped += 1;
                continue;
            };
            let optional = |name: &str, present: bool| -> Result<Option<String>> {
                if present {
                    Ok(row.try_get::<Option<String>, _>(name)?)
                } else {
                    Ok(None)
                }
            };
            users.push(UserRecord {
                user_pseudo_id,
                platform: row
                    .try_get::<Option<String>, _>("platform")?
                    .unwrap_or_default(),
                language: optional("language", schema.has_language)?,
                segment: optional("segment", schema.has_segment)?,
            });
        }

        if skipped > 0 {
            warn!(table = %self.users_table, skipped, "跳过缺少设备标识的用户行");
        }
        Ok(UserSet::new(schema, users))
    }
}
