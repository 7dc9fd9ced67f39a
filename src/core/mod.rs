//! 核心模块
//!
//! 服务器的配置 ([`Config`])、共享状态 ([`ServerState`])、
//! 启动器 ([`Server`]) 和引导阶段错误 ([`ServerError`])。

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::Config;
pub use error::{Result, ServerError};
pub use server::Server;
pub use state::ServerState;
