//! HumanClick
//!
//! 热键切换的自动点击器，点击间隔经过多层随机化以接近真人点击

/// 点击间隔模型与随机化引擎
pub mod timing;

/// 点击间隔统计
pub mod stats;

/// 切换键绑定、输入事件与分发
pub mod hotkey;

/// 点击执行器
pub mod input;

/// 运行状态、界面通知与配置
pub mod state;

/// 点击会话与控制任务
pub mod session;

/// 日志与错误处理
pub mod utils;
