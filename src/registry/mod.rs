//! CT 封禁注册表
//!
//! 内存中的 SteamID → 封禁记录映射，启动时从磁盘整体加载，
//! 每次变更后整体重写存档文件（记录量在几十到几百条，不做增量写）。
//! 过期记录在下次被查询时惰性清除，不使用后台定时器。

pub mod record;

pub use record::BanRecord;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use tracing::{debug, warn};

use crate::common::error::GuardError;

type BanMap = BTreeMap<String, BanRecord>;

pub struct BanRegistry {
    path: PathBuf,
    bans: RwLock<BanMap>,
}

impl BanRegistry {
    /// 创建注册表并立即从磁盘加载。文件缺失以空表启动；
    /// 文件损坏记录错误后同样以空表启动，绝不让宿主崩溃。
    pub fn load(path: PathBuf) -> Self {
        let bans = match Self::read_from_disk(&path) {
            Ok(Some(map)) => {
                debug!(count = map.len(), "ban file loaded");
                map
            }
            Ok(None) => BanMap::new(),
            Err(e) => {
                warn!(
                    error = %e,
                    path = %path.display(),
                    "failed to load ban file, starting empty"
                );
                BanMap::new()
            }
        };
        Self {
            path,
            bans: RwLock::new(bans),
        }
    }

    /// 查询当前有效的封禁记录。
    /// 命中的记录若已过期，顺手移除并落盘（惰性清除），返回 None。
    pub fn get(&self, steam_id: &str) -> Option<BanRecord> {
        let now = Utc::now();
        {
            let bans = self.read_guard();
            match bans.get(steam_id) {
                None => return None,
                Some(r) if !r.is_expired_at(now) => return Some(r.clone()),
                Some(_) => {} // 已过期，升级写锁清除
            }
        }
        let evicted = {
            let mut bans = self.write_guard();
            match bans.get(steam_id) {
                // 锁切换间隙可能已被重新封禁
                Some(r) if !r.is_expired_at(now) => return Some(r.clone()),
                Some(_) => {
                    bans.remove(steam_id);
                    true
                }
                None => false,
            }
        };
        if evicted {
            debug!(steam_id, "expired ban evicted");
            self.save();
        }
        None
    }

    /// 无条件覆盖（重复封禁即整体替换）并立即落盘
    pub fn put(&self, record: BanRecord) {
        {
            let mut bans = self.write_guard();
            bans.insert(record.steam_id.clone(), record);
        }
        self.save();
    }

    /// 移除并落盘；未命中时不产生任何写入
    pub fn remove(&self, steam_id: &str) -> Option<BanRecord> {
        let removed = self.write_guard().remove(steam_id);
        if removed.is_some() {
            self.save();
        }
        removed
    }

    /// 当前持有的全部记录快照，按 SteamID 排序。
    /// 包含已过期但尚未被惰性清除的条目 —— 过期过滤只发生在 [`Self::get`]。
    pub fn list(&self) -> Vec<BanRecord> {
        self.read_guard().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.read_guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_guard().is_empty()
    }

    /// 整体写回磁盘。失败只记日志不向上传播 ——
    /// 即使持久化降级，封禁判定也要继续工作。
    pub fn save(&self) {
        if let Err(e) = self.write_to_disk() {
            warn!(
                error = %e,
                path = %self.path.display(),
                "failed to save ban file"
            );
        }
    }

    fn write_to_disk(&self) -> Result<(), GuardError> {
        let json = {
            let bans = self.read_guard();
            serde_json::to_string_pretty(&*bans)?
        };
        // 先写临时文件再重命名，避免写到一半留下残缺存档
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, &self.path)?;
        debug!(bytes = json.len(), "ban file saved");
        Ok(())
    }

    fn read_from_disk(path: &Path) -> Result<Option<BanMap>, GuardError> {
        if !path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&data)?))
    }

    // 锁中毒时继续使用内部数据，插件不允许拖垮宿主
    fn read_guard(&self) -> RwLockReadGuard<'_, BanMap> {
        self.bans.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, BanMap> {
        self.bans.write().unwrap_or_else(|e| e.into_inner())
    }
}

// ═══════════════════════════════════════════════════════════════════
// 测试
// ═══════════════════════════════════════════════════════════════════
