//! 管理员数据模型

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// 管理员角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    Admin,
    SuperAdmin,
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdminRole::Admin => f.write_str("admin"),
            AdminRole::SuperAdmin => f.write_str("super_admin"),
        }
    }
}

/// 管理员
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    pub email: String,
    /// Argon2 哈希，永不序列化到响应
    #[serde(skip_serializing)]
    pub password: String,
    pub role: AdminRole,
    #[serde(default, deserialize_with = "serde_helpers::default_true")]
    pub is_active: bool,
}

impl Admin {
    /// 验证密码
    pub fn verify_password(&self, password: &str) -> bool {
        PasswordHash::new(&self.password)
            .map(|hash| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &hash)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    /// 生成密码哈希
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        Ok(Argon2::default()
            .hash_password(password.as_bytes(), &salt)?
            .to_string())
    }
}

/// 管理员公开信息 (登录响应与 profile 接口)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: AdminRole,
}

impl From<&Admin> for AdminInfo {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin
                .id
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_default(),
            name: admin.name.clone(),
            email: admin.email.clone(),
            role: admin.role,
        }
    }
}
