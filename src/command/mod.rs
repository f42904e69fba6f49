//! 管理命令
//!
//! ctban / ctunban / ctbanlist 三条命令，由宿主的命令分发器调用，
//! 参数已由宿主切好。玩家调用者需要通用管理员权限；控制台调用始终放行。
//! 回复写到调用者的聊天栏，控制台调用则写到服务器控制台。

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;

use crate::config::GuardConfig;
use crate::host::{GameHost, PlayerSnapshot, Team, ADMIN_CAPABILITY, CHAT_PREFIX};
use crate::registry::{BanRecord, BanRegistry};

/// 命令调用上下文；caller 为 None 表示控制台
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    pub caller: Option<PlayerSnapshot>,
}

impl CommandContext {
    pub fn console() -> Self {
        Self { caller: None }
    }

    pub fn from_player(player: PlayerSnapshot) -> Self {
        Self {
            caller: Some(player),
        }
    }

    fn issuer_name(&self) -> String {
        self.caller
            .as_ref()
            .map(|p| p.name.clone())
            .unwrap_or_else(|| "Console".to_string())
    }
}

pub struct Commands {
    host: Arc<dyn GameHost>,
    registry: Arc<BanRegistry>,
    config: GuardConfig,
}

impl Commands {
    pub fn new(host: Arc<dyn GameHost>, registry: Arc<BanRegistry>, config: GuardConfig) -> Self {
        Self {
            host,
            registry,
            config,
        }
    }

    /// ctban <#userid|name> [minutes] [reason...]
    ///
    /// 时长缺失、解析失败或 ≤0 都按永久封禁处理；理由缺失用配置的默认值。
    pub fn ban(&self, ctx: &CommandContext, args: &[String]) {
        if !self.authorize(ctx) {
            return;
        }
        let Some(target_arg) = args.first() else {
            self.reply(ctx, "Usage: ctban <#userid or name> [duration] [reason]");
            return;
        };
        let Some(target) = self.find_player(target_arg) else {
            self.reply(ctx, "Player not found!");
            return;
        };

        let minutes = args
            .get(1)
            .and_then(|a| a.parse::<i64>().ok())
            .unwrap_or(0);
        let reason = if args.len() > 2 {
            args[2..].join(" ")
        } else {
            self.config.default_reason.clone()
        };
        let now = Utc::now();
        let record = BanRecord {
            steam_id: target.steam_id.clone(),
            player_name: target.name.clone(),
            reason: reason.clone(),
            banned_by: ctx.issuer_name(),
            banned_at: now,
            expires_at: (minutes > 0).then(|| now + Duration::minutes(minutes)),
        };
        let banned_by = record.banned_by.clone();
        self.registry.put(record);

        let duration_text = if minutes > 0 {
            format!("{minutes} minutes")
        } else {
            "permanent".to_string()
        };
        self.reply(
            ctx,
            &format!(
                "Player {} has been banned from CT for {}",
                target.name, duration_text
            ),
        );
        self.reply(ctx, &format!("Reason: {reason}"));

        // 通知被封禁玩家本人
        let sid = target.session_id;
        self.host
            .chat(sid, &format!("{CHAT_PREFIX} {}", self.config.ban_message));
        self.host
            .chat(sid, &format!("{CHAT_PREFIX} Reason: {reason}"));
        self.host
            .chat(sid, &format!("{CHAT_PREFIX} Duration: {duration_text}"));
        self.host
            .chat(sid, &format!("{CHAT_PREFIX} Banned by: {banned_by}"));

        // 已经站在 CT 的目标立刻被移出（同样要等下一帧）
        if target.team == Team::CounterTerrorist {
            let host = Arc::clone(&self.host);
            self.host
                .next_frame(Box::new(move || host.set_team(sid, Team::Terrorist)));
        }

        info!(
            steam_id = %target.steam_id,
            name = %target.name,
            by = %banned_by,
            minutes,
            "CT ban issued"
        );
    }

    /// ctunban <#userid|name|steamid>
    pub fn unban(&self, ctx: &CommandContext, args: &[String]) {
        if !self.authorize(ctx) {
            return;
        }
        let Some(target_arg) = args.first() else {
            self.reply(ctx, "Usage: ctunban <#userid or name>");
            return;
        };
        // 在线解析失败时把原始参数当作 SteamID 字面量，支持离线解封
        let steam_id = match self.find_player(target_arg) {
            Some(p) => p.steam_id,
            None => target_arg.clone(),
        };

        match self.registry.remove(&steam_id) {
            Some(record) => {
                self.reply(
                    ctx,
                    &format!(
                        "Player {} has been unbanned from CT team!",
                        record.player_name
                    ),
                );
                info!(steam_id = %steam_id, "CT ban lifted");
            }
            None => self.reply(ctx, "Player is not banned from CT team!"),
        }
    }

    /// ctbanlist
    ///
    /// 列表直接快照注册表，包含已过期但尚未被惰性清除的条目（标记为 Expired）。
    pub fn list(&self, ctx: &CommandContext) {
        if !self.authorize(ctx) {
            return;
        }
        let bans = self.registry.list();
        if bans.is_empty() {
            self.reply(ctx, "No players are currently banned from CT team!");
            return;
        }

        let now = Utc::now();
        self.reply(ctx, "=== CT Ban List ===");
        for ban in bans {
            self.reply(
                ctx,
                &format!(
                    "{} | {} | {}",
                    ban.player_name,
                    ban.steam_id,
                    ban.expiry_label(now)
                ),
            );
            self.reply(
                ctx,
                &format!("  Reason: {} | Banned by: {}", ban.reason, ban.banned_by),
            );
        }
    }

    fn authorize(&self, ctx: &CommandContext) -> bool {
        match &ctx.caller {
            None => true,
            Some(p) if self.host.has_capability(p.session_id, ADMIN_CAPABILITY) => true,
            Some(p) => {
                self.host.chat(
                    p.session_id,
                    &format!("{CHAT_PREFIX} You don't have permission to use this command!"),
                );
                false
            }
        }
    }

    /// `#id` 按会话号精确匹配，其余按显示名大小写不敏感子串匹配。
    /// 多名玩家命中同一子串时取宿主枚举顺序的第一个。
    fn find_player(&self, arg: &str) -> Option<PlayerSnapshot> {
        let players = self.host.players();
        if let Some(id) = arg.strip_prefix('#') {
            let id: u32 = id.parse().ok()?;
            players.into_iter().find(|p| p.session_id == id)
        } else {
            let needle = arg.to_lowercase();
            players
                .into_iter()
                .find(|p| p.name.to_lowercase().contains(&needle))
        }
    }

    fn reply(&self, ctx: &CommandContext, line: &str) {
        let line = format!("{CHAT_PREFIX} {line}");
        match &ctx.caller {
            Some(p) => self.host.chat(p.session_id, &line),
            None => self.host.console(&line),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// 测试
// ═══════════════════════════════════════════════════════════════════
