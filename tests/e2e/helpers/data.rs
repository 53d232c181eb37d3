//! 测试数据
//!
//! 在临时目录写入活动与用户 CSV，drop 时删除。

use std::path::PathBuf;

use anyhow::Result;
use uuid::Uuid;

/// 两个 Scheduled 活动，一个已完成的活动
pub const CAMPAIGNS_CSV: &str = "\
_id,segment,platform,language,country,message,status
e2e-001,Churned_subcribers,Android,th,TH,กลับมาเรียนกันเถอะ,Scheduled
e2e-002,Active,iOS,en,US,Your streak is waiting,Scheduled
e2e-003,Active,Android,en,US,Already sent,Completed
";

pub const USERS_CSV: &str = "\
user_pseudo_id,platform,language,segment
user1,ANDROID,th-th,Churned_subcribers
user2,ANDROID,en-us,Active
user3,IOS,th-th,Churned_subcribers
user4,ANDROID,vi-vn,Churned_subcribers
user5,IOS,en-gb,Active
user6,IOS,en,Active
";

pub struct CsvFixture {
    dir: PathBuf,
    pub campaigns: PathBuf,
    pub users: PathBuf,
}

impl CsvFixture {
    pub fn new(campaigns: &str, users: &str) -> Result<Self> {
        let dir = std::env::temp_dir().join(format!("push-e2e-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir)?;

        let campaigns_path = dir.join("campaigns.csv");
        let users_path = dir.join("users.csv");
        std::fs::write(&campaigns_path, campaigns)?;
        std::fs::write(&users_path, users)?;

        Ok(Self {
            dir,
            campaigns: campaigns_path,
            users: users_path,
        })
    }
}

impl Drop for CsvFixture {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}
