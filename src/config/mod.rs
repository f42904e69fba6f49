//! 插件配置
//!
//! JSON 文件，字段名与存档同为 PascalCase。首次加载时把默认值写出，
//! 文件损坏时记录错误并回退默认配置，配置问题永远不阻止插件启动。

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct GuardConfig {
    /// 拒绝进入 CT 时发给玩家的提示
    pub ban_message: String,
    /// 未给出理由时使用的默认封禁理由
    pub default_reason: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            ban_message: "You are banned from joining CT team!".to_string(),
            default_reason: "CT Ban".to_string(),
        }
    }
}

impl GuardConfig {
    /// 加载配置；文件不存在时写出默认配置。
    /// 任何失败都回退默认值，只记日志。
    pub fn load_or_init(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    error = %e,
                    path = %path.display(),
                    "failed to load config, using defaults"
                );
                Self::default()
            }
        }
    }

    fn try_load(path: &Path) -> Result<Self> {
        if path.exists() {
            let data = std::fs::read_to_string(path)
                .with_context(|| format!("read {}", path.display()))?;
            Ok(serde_json::from_str(&data).context("parse config")?)
        } else {
            let config = Self::default();
            config.write(path)?;
            Ok(config)
        }
    }

    fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_written_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = GuardConfig::load_or_init(&path);
        assert_eq!(config, GuardConfig::default());

        // 默认配置被写出，字段名为 PascalCase
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("BanMessage"));
        assert!(raw.contains("DefaultReason"));
    }

    #[test]
    fn custom_values_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"BanMessage": "No CT for you.", "DefaultReason": "banned"}"#,
        )
        .unwrap();
        let config = GuardConfig::load_or_init(&path);
        assert_eq!(config.ban_message, "No CT for you.");
        assert_eq!(config.default_reason, "banned");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"BanMessage": "custom"}"#).unwrap();
        let config = GuardConfig::load_or_init(&path);
        assert_eq!(config.ban_message, "custom");
        assert_eq!(config.default_reason, GuardConfig::default().default_reason);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json at all").unwrap();
        let config = GuardConfig::load_or_init(&path);
        assert_eq!(config, GuardConfig::default());
    }
}
