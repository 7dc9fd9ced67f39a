//! 统一错误处理
//!
//! 提供应用级错误类型和响应结构：
//! - [`AppError`] - 应用错误枚举
//! - [`AppResponse`] - 错误响应载体
//!
//! # 错误码规范
//!
//! | 前缀 | 分类 | 示例 |
//! |------|------|------|
//! | E3xxx | 认证令牌错误 | E3001 未登录 |
//! | E2xxx | 权限错误 | E2001 无权限 |
//! | E0xxx | 业务错误 | E0003 资源不存在 |
//! | E9xxx | 系统错误 | E9002 数据库错误 |
//!
//! 成功响应直接返回业务 JSON (与旧版前端保持兼容)，
//! 错误响应统一为 `{"code": "...", "message": "..."}`。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// 错误响应结构
///
/// ```json
/// {
///   "code": "E0003",
///   "message": "Member not found"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    /// 错误码
    pub code: String,
    /// 消息
    pub message: String,
    /// 附加数据 (错误响应通常为空)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// 应用错误枚举
///
/// 变体按认证 (E3xxx/E2xxx)、业务 (E0xxx)、系统 (E9xxx) 三组排列，
/// 对应的状态码和错误码见各变体注释。
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 未登录 (401, E3001)
    #[error("Authentication required")]
    Unauthorized,

    /// 令牌过期 (401, E3003)
    #[error("Token expired")]
    TokenExpired,

    /// 无效令牌 (401, E3002)
    #[error("Invalid token")]
    InvalidToken,

    /// 无权限 (403, E2001)
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// 资源不存在 (404, E0003)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// 资源冲突 (409, E0004)
    #[error("Resource already exists: {0}")]
    Conflict(String),

    /// 验证失败 (400, E0002)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// 业务规则违反 (422, E0005)
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// 无效请求 (400, E0006)
    #[error("Invalid request: {0}")]
    Invalid(String),

    /// 数据库错误 (500, E9002)
    #[error("Database error: {0}")]
    Database(String),

    /// 内部错误 (500, E9001)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "E3001", "Please login first"),
            AppError::TokenExpired => (StatusCode::UNAUTHORIZED, "E3003", "Token expired"),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "E3002", "Invalid token"),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "E2001", msg.as_str()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.as_str()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "E0004", msg.as_str()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.as_str()),
            AppError::BusinessRule(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "E0005", msg.as_str())
            }
            AppError::Invalid(msg) => (StatusCode::BAD_REQUEST, "E0006", msg.as_str()),

            // 5xx 先记完整日志，响应体只带笼统文案
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database operation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "E9002", "Database error")
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Unhandled internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error",
                )
            }
        };

        let body = Json(AppResponse::<()> {
            code: code.to_string(),
            message: message.to_string(),
            data: None,
        });

        (status, body).into_response()
    }
}

impl AppError {
    /// 资源不存在 (404)
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// 资源冲突 (409)
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// 验证失败 (400)
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// 业务规则违反 (422)
    pub fn business_rule(msg: impl Into<String>) -> Self {
        Self::BusinessRule(msg.into())
    }

    /// 无权限 (403)
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    /// 数据库错误 (500)
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// 内部错误 (500)
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// 登录凭证错误 (400)，统一文案防止邮箱枚举
    pub fn invalid_credentials() -> Self {
        Self::Invalid("Invalid email or password".to_string())
    }
}
