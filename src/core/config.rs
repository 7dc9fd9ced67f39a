use std::path::PathBuf;

use crate::auth::JwtConfig;
use crate::core::{Result, ServerError};

/// 开发环境的默认管理员口令，生产环境必须覆盖
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// 服务器配置
///
/// # 环境变量
///
/// 每个配置项都有对应的环境变量，未设置时取默认值：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/library-server | 工作目录 |
/// | HTTP_PORT | 5000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | 优雅关闭超时(毫秒) |
/// | MOBILE_NUMBER | (未设置) | WhatsApp 发送方号码 |
/// | ADMIN_NAME | Administrator | 首次启动种子管理员姓名 |
/// | ADMIN_EMAIL | admin@library.local | 种子管理员邮箱 |
/// | ADMIN_PASSWORD | admin123 | 种子管理员口令 |
///
/// JWT 相关的环境变量见 [`JwtConfig`]。
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/library HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 关闭超时时间 (毫秒)
    pub shutdown_timeout_ms: u64,
    /// WhatsApp 发送方号码 (MOBILE_NUMBER，未配置时提醒接口返回错误)
    pub whatsapp_sender: Option<String>,

    // === 首次启动种子管理员 ===
    pub admin_name: String,
    pub admin_email: String,
    pub admin_password: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR")
                .unwrap_or_else(|_| "/var/lib/library-server".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            shutdown_timeout_ms: std::env::var("SHUTDOWN_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10000),
            whatsapp_sender: std::env::var("MOBILE_NUMBER")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            admin_name: std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrator".into()),
            admin_email: std::env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@library.local".into()),
            admin_password: std::env::var("ADMIN_PASSWORD")
                .unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.into()),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// 数据库目录 (work_dir/database)
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 日志目录 (work_dir/logs)
    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> Result<()> {
        for dir in [
            PathBuf::from(&self.work_dir),
            self.database_dir(),
            self.logs_dir(),
        ] {
            std::fs::create_dir_all(&dir).map_err(|e| {
                ServerError::Config(format!("Failed to create {}: {}", dir.display(), e))
            })?;
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
