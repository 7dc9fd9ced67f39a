use thiserror::Error;

/// 服务器引导阶段的错误
///
/// 请求处理路径统一使用 [`crate::utils::AppError`]，
/// 这里只覆盖启动/关闭流程。
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("内部服务器错误")]
    Internal(#[from] anyhow::Error),
}

/// 引导流程的 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
