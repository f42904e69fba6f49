//! Host API — 插件与游戏宿主交互的抽象层
//!
//! 宿主引擎负责事件分发、聊天输出、权限检查与延迟调度；
//! 这里只定义插件一侧依赖的最小接口，核心逻辑可用 mock 独立测试。

use std::fmt;

/// 管理命令要求的通用管理员权限标识
pub const ADMIN_CAPABILITY: &str = "@css/generic";

/// 所有面向玩家/控制台输出的统一前缀
pub const CHAT_PREFIX: &str = "[CTGuard]";

/// 队伍编号，与引擎事件负载中的整数一致
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Team {
    Unassigned = 0,
    Spectator = 1,
    Terrorist = 2,
    CounterTerrorist = 3,
}

impl Team {
    /// 事件负载里的原始整数转枚举，未知值归为 Unassigned
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            1 => Self::Spectator,
            2 => Self::Terrorist,
            3 => Self::CounterTerrorist,
            _ => Self::Unassigned,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unassigned => "NONE",
            Self::Spectator => "SPEC",
            Self::Terrorist => "T",
            Self::CounterTerrorist => "CT",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单个在线玩家的快照，由宿主查询得到
#[derive(Debug, Clone)]
pub struct PlayerSnapshot {
    /// 会话内编号（重连会变）
    pub session_id: u32,
    /// 跨会话稳定的身份标识
    pub steam_id: String,
    /// 当前显示名，仅用于展示
    pub name: String,
    pub team: Team,
    pub is_bot: bool,
}

/// 事件处理结果：Continue 交还宿主默认处理，Handled 表示事件已被拦截
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    Continue,
    Handled,
}

/// 宿主能力接口
pub trait GameHost: Send + Sync {
    /// 当前在线玩家（含 bot），枚举顺序由宿主决定
    fn players(&self) -> Vec<PlayerSnapshot>;

    /// 向指定玩家发送一行聊天消息
    fn chat(&self, session_id: u32, line: &str);

    /// 向服务器控制台输出一行
    fn console(&self, line: &str);

    /// 玩家是否持有指定权限
    fn has_capability(&self, session_id: u32, capability: &str) -> bool;

    /// 立即切换玩家队伍
    fn set_team(&self, session_id: u32, team: Team);

    /// 在下一帧执行回调。引擎不允许在换队事件处理期间直接改动实体状态，
    /// 相关修正必须经由这里延迟执行。
    fn next_frame(&self, task: Box<dyn FnOnce() + Send + 'static>);
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::sync::Mutex;

    /// 记录所有交互的测试宿主
    #[derive(Default)]
    pub struct MockHost {
        pub players: Mutex<Vec<PlayerSnapshot>>,
        pub chat_lines: Mutex<Vec<(u32, String)>>,
        pub console_lines: Mutex<Vec<String>>,
        pub admins: Mutex<Vec<u32>>,
        pub team_changes: Mutex<Vec<(u32, Team)>>,
        deferred: Mutex<Vec<Box<dyn FnOnce() + Send>>>,
    }

    impl MockHost {
        pub fn add_player(&self, session_id: u32, steam_id: &str, name: &str, team: Team) {
            self.players.lock().unwrap().push(PlayerSnapshot {
                session_id,
                steam_id: steam_id.to_string(),
                name: name.to_string(),
                team,
                is_bot: false,
            });
        }

        pub fn grant_admin(&self, session_id: u32) {
            self.admins.lock().unwrap().push(session_id);
        }

        pub fn deferred_len(&self) -> usize {
            self.deferred.lock().unwrap().len()
        }

        /// 执行所有已排队的下一帧回调
        pub fn run_next_frame(&self) {
            let tasks: Vec<_> = self.deferred.lock().unwrap().drain(..).collect();
            for task in tasks {
                task();
            }
        }

        pub fn chat_for(&self, session_id: u32) -> Vec<String> {
            self.chat_lines
                .lock()
                .unwrap()
                .iter()
                .filter(|(sid, _)| *sid == session_id)
                .map(|(_, line)| line.clone())
                .collect()
        }
    }

    impl GameHost for MockHost {
        fn players(&self) -> Vec<PlayerSnapshot> {
            self.players.lock().unwrap().clone()
        }

        fn chat(&self, session_id: u32, line: &str) {
            self.chat_lines.lock().unwrap().push((session_id, line.to_string()));
        }

        fn console(&self, line: &str) {
            self.console_lines.lock().unwrap().push(line.to_string());
        }

        fn has_capability(&self, session_id: u32, _capability: &str) -> bool {
            self.admins.lock().unwrap().contains(&session_id)
        }

        fn set_team(&self, session_id: u32, team: Team) {
            self.team_changes.lock().unwrap().push((session_id, team));
        }

        fn next_frame(&self, task: Box<dyn FnOnce() + Send + 'static>) {
            self.deferred.lock().unwrap().push(task);
        }
    }
}
