//! Admin Authentication Handlers
//!
//! Handles admin login and profile lookup

use std::time::Duration;

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::AppError;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::AdminInfo;
use crate::db::repository::AdminRepository;

/// 登录固定延迟 (毫秒)，成功与失败耗时一致
const LOGIN_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub admin: AdminInfo,
}

/// Login handler
///
/// Authenticates admin credentials and returns a JWT token
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let repo = AdminRepository::new(state.get_db());
    let admin = repo.find_by_email(&req.email).await?;

    // 先睡满固定时长再看查询结果
    tokio::time::sleep(Duration::from_millis(LOGIN_FIXED_DELAY_MS)).await;

    // 查无此人和密码错误共用同一文案
    let admin = match admin {
        Some(a) => {
            if !a.is_active {
                return Err(AppError::forbidden("Account is deactivated"));
            }

            if !a.verify_password(&req.password) {
                tracing::warn!(email = %req.email, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }

            a
        }
        None => {
            tracing::warn!(email = %req.email, "Login failed - admin not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let jwt_service = state.get_jwt_service();
    let admin_id = admin.id.as_ref().map(|t| t.to_string()).unwrap_or_default();

    let token = jwt_service
        .generate_token(&admin_id, &admin.email, &admin.role.to_string())
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(
        admin_id = %admin_id,
        email = %admin.email,
        role = %admin.role,
        "Admin logged in successfully"
    );

    Ok(Json(LoginResponse {
        admin: AdminInfo::from(&admin),
        token,
    }))
}

/// Get current admin profile
///
/// 从数据库取最新数据，账号被停用后旧令牌立即失效。
pub async fn profile(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<AdminInfo>, AppError> {
    let repo = AdminRepository::new(state.get_db());
    let admin = repo
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::not_found("Admin not found"))?;

    if !admin.is_active {
        return Err(AppError::forbidden("Account is deactivated"));
    }

    Ok(Json(AdminInfo::from(&admin)))
}
