//! Library Server - 图书馆座位/会员/缴费管理服务
//!
//! # 架构概述
//!
//! 本模块是 Library Server 的主入口，提供以下核心功能：
//!
//! - **座位分配** (`seating`): 班次时间窗冲突判定、分时共享、一致性修复
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **认证** (`auth`): JWT + Argon2 认证体系
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! src/
//! ├── core/          # 配置、状态、错误
//! ├── auth/          # JWT 认证
//! ├── seating/       # 座位分配、会员生命周期、一致性修复
//! ├── services/      # HTTP 服务、WhatsApp 通知
//! ├── api/           # HTTP 路由和处理器
//! ├── utils/         # 工具函数
//! └── db/            # 数据库层
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod seating;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use seating::{ConsistencyRepair, MemberLifecycle, SeatAllocator};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
    __    _ __
   / /   (_) /_  _________ _______  __
  / /   / / __ \/ ___/ __ `/ ___/ / / /
 / /___/ / /_/ / /  / /_/ / /  / /_/ /
/_____/_/_.___/_/   \__,_/_/   \__, /
                              /____/
    "#
    );
}

/// 环境初始化: 加载 .env、初始化日志
///
/// 必须在读取 [`Config`] 之前调用，否则 .env 里的变量不生效。
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    if let Some(dir) = &log_dir {
        std::fs::create_dir_all(dir)?;
    }
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}
