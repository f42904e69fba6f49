//! 强制执行层
//!
//! 订阅两类宿主事件：
//! - 玩家完全连接：只为触发注册表的惰性清除，从不阻止连接
//! - 玩家请求换队：封禁中的玩家禁止进入 CT，并在下一帧被移回 T
//!
//! 引擎不允许在换队事件处理期间直接改动实体队伍，
//! 修正动作一律通过宿主的 next_frame 延迟执行。

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::common::duration::format_duration;
use crate::config::GuardConfig;
use crate::host::{GameHost, HookOutcome, PlayerSnapshot, Team, CHAT_PREFIX};
use crate::registry::BanRegistry;

pub struct Enforcer {
    host: Arc<dyn GameHost>,
    registry: Arc<BanRegistry>,
    config: GuardConfig,
}

impl Enforcer {
    pub fn new(host: Arc<dyn GameHost>, registry: Arc<BanRegistry>, config: GuardConfig) -> Self {
        Self {
            host,
            registry,
            config,
        }
    }

    /// 玩家完全连接。查询即触发过期清理；连接本身永不被拒绝。
    pub fn on_player_connect_full(&self, player: &PlayerSnapshot) -> HookOutcome {
        if player.is_bot {
            return HookOutcome::Continue;
        }
        if self.registry.get(&player.steam_id).is_some() {
            debug!(
                steam_id = %player.steam_id,
                name = %player.name,
                "connected player has an active CT ban"
            );
        }
        HookOutcome::Continue
    }

    /// 玩家请求换队。目标不是 CT 时一律放行；
    /// 封禁中的玩家被拒绝、告知原因与剩余时长，并在下一帧移回 T。
    pub fn on_player_team(&self, player: &PlayerSnapshot, requested: Team) -> HookOutcome {
        if player.is_bot || requested != Team::CounterTerrorist {
            return HookOutcome::Continue;
        }
        let Some(ban) = self.registry.get(&player.steam_id) else {
            return HookOutcome::Continue;
        };

        let sid = player.session_id;
        self.host
            .chat(sid, &format!("{CHAT_PREFIX} {}", self.config.ban_message));
        self.host
            .chat(sid, &format!("{CHAT_PREFIX} Reason: {}", ban.reason));
        match ban.remaining(Utc::now()) {
            Some(rem) => self.host.chat(
                sid,
                &format!("{CHAT_PREFIX} Time remaining: {}", format_duration(rem)),
            ),
            None => self
                .host
                .chat(sid, &format!("{CHAT_PREFIX} Duration: Permanent")),
        }

        let host = Arc::clone(&self.host);
        self.host
            .next_frame(Box::new(move || host.set_team(sid, Team::Terrorist)));

        info!(
            steam_id = %player.steam_id,
            name = %player.name,
            "blocked CT join"
        );
        HookOutcome::Handled
    }
}
