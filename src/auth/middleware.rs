//! 认证中间件
//!
//! 所有 `/api/` 路由默认要求管理员登录，少数白名单路径除外。

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::AppError;
use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::security_log;

/// 认证中间件
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT，验证通过后把
/// [`CurrentUser`] 写入请求扩展，后续 handler 通过提取器拿到它。
///
/// 跳过认证的请求：
/// - `OPTIONS` (CORS 预检)
/// - 非 `/api/` 路径 (根路径横幅、未知路径的 404)
/// - `/api/admin/login` 和 `/api/health` (登录、基础健康检查)
///
/// 认证失败一律 401：缺少头返回 Unauthorized，令牌过期返回 TokenExpired，
/// 其余情况返回 InvalidToken。
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if skips_auth(req.method(), req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());
    let Some(header) = header else {
        security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
        return Err(AppError::Unauthorized);
    };
    let token = JwtService::extract_from_header(header).ok_or(AppError::InvalidToken)?;

    match state.get_jwt_service().validate_token(token) {
        Ok(claims) => {
            req.extensions_mut().insert(CurrentUser::from(claims));
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );
            match e {
                crate::auth::JwtError::ExpiredToken => Err(AppError::TokenExpired),
                _ => Err(AppError::InvalidToken),
            }
        }
    }
}

/// OPTIONS 预检、非 API 路径和公共白名单不做认证
fn skips_auth(method: &http::Method, path: &str) -> bool {
    method == http::Method::OPTIONS
        || !path.starts_with("/api/")
        || matches!(path, "/api/admin/login" | "/api/health")
}
