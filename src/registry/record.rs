//! 封禁记录
//!
//! 持久化格式与存档文件字段一一对应（PascalCase，时间为 ISO-8601）。

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::common::duration::format_duration;

/// 单个玩家的 CT 封禁记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BanRecord {
    pub steam_id: String,
    /// 封禁时的显示名，仅用于展示
    pub player_name: String,
    pub reason: String,
    /// 签发者显示名，控制台签发时为 "Console"
    pub banned_by: String,
    pub banned_at: DateTime<Utc>,
    /// None 表示永久封禁
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl BanRecord {
    /// 过期判定取严格大于：now 恰好等于 expires_at 时仍视为封禁中
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(t) if now > t)
    }

    /// 剩余时长；永久封禁返回 None
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.expires_at.map(|t| t - now)
    }

    /// 列表展示用的到期描述
    pub fn expiry_label(&self, now: DateTime<Utc>) -> String {
        match self.expires_at {
            None => "Permanent".to_string(),
            Some(t) if now > t => "Expired".to_string(),
            Some(t) => format!("Expires: {}", format_duration(t - now)),
        }
    }
}
