//! 插件装配
//!
//! 宿主胶水层在插件加载时调用 [`CtGuard::load`]，
//! 随后把事件回调与注册的命令转发到这里暴露的入口。
//! 除变更即落盘外没有额外的卸载/刷盘步骤。

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::command::{CommandContext, Commands};
use crate::config::GuardConfig;
use crate::guard::Enforcer;
use crate::host::{GameHost, HookOutcome, PlayerSnapshot, Team};
use crate::registry::BanRegistry;

/// 需要向宿主注册的命令：(名称, 描述)
pub const COMMAND_SPECS: [(&str, &str); 3] = [
    ("ctban", "Ban a player from CT team"),
    ("ctunban", "Unban a player from CT team"),
    ("ctbanlist", "List all CT banned players"),
];

pub struct CtGuard {
    registry: Arc<BanRegistry>,
    enforcer: Enforcer,
    commands: Commands,
}

impl CtGuard {
    /// 从模块目录加载配置与封禁存档并完成装配。
    /// 配置与存档的任何问题都降级处理，加载本身不会失败。
    pub fn load(host: Arc<dyn GameHost>, module_dir: &Path) -> Self {
        let config = GuardConfig::load_or_init(&module_dir.join("config.json"));
        let registry = Arc::new(BanRegistry::load(module_dir.join("ctbans.json")));
        info!(bans = registry.len(), "CTGuard loaded");

        Self {
            enforcer: Enforcer::new(
                Arc::clone(&host),
                Arc::clone(&registry),
                config.clone(),
            ),
            commands: Commands::new(host, Arc::clone(&registry), config),
            registry,
        }
    }

    pub fn on_player_connect_full(&self, player: &PlayerSnapshot) -> HookOutcome {
        self.enforcer.on_player_connect_full(player)
    }

    pub fn on_player_team(&self, player: &PlayerSnapshot, requested: Team) -> HookOutcome {
        self.enforcer.on_player_team(player, requested)
    }

    /// 按名称分发管理命令；未知名称返回 false 交还宿主。
    pub fn dispatch(&self, name: &str, ctx: &CommandContext, args: &[String]) -> bool {
        match name {
            "ctban" => self.commands.ban(ctx, args),
            "ctunban" => self.commands.unban(ctx, args),
            "ctbanlist" => self.commands.list(ctx),
            _ => return false,
        }
        true
    }

    pub fn registry(&self) -> &BanRegistry {
        &self.registry
    }
}

/// 初始化 tracing 订阅器；宿主胶水层在插件加载时调用一次。
/// 插件可能被热重载，重复初始化静默忽略。
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .ok();
}
