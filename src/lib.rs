//! CTGuard — 禁止指定玩家加入 CT 队伍的服务器插件内核
//!
//! 核心是一个跨重启持久化的封禁注册表，外加两个事件拦截点：
//! - 玩家完全连接（只触发过期清理，从不阻止连接）
//! - 玩家请求换队（封禁中的玩家禁止进入 CT，下一帧移回 T）
//!
//! 宿主引擎（事件分发、聊天输出、权限检查、延迟调度）通过
//! [`host::GameHost`] 抽象接入，核心逻辑可以脱离引擎独立测试。

pub mod app;
pub mod command;
pub mod common;
pub mod config;
pub mod guard;
pub mod host;
pub mod registry;

pub use app::{init_tracing, CtGuard, COMMAND_SPECS};
pub use command::CommandContext;
pub use config::GuardConfig;
pub use host::{GameHost, HookOutcome, PlayerSnapshot, Team};
pub use registry::{BanRecord, BanRegistry};
