//! JWT 令牌服务
//!
//! 处理管理员令牌的生成、验证和解析。

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// 签名密钥，至少 32 字节
    pub secret: String,
    /// 令牌有效期 (分钟)
    pub expiration_minutes: i64,
    pub issuer: String,
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        let secret = match load_jwt_secret() {
            Ok(secret) => secret,
            Err(e) => {
                #[cfg(debug_assertions)]
                {
                    tracing::warn!("JWT configuration error: {}, using emergency key", e);
                    "emergency-fallback-key-must-be-replaced-in-production".to_string()
                }
                #[cfg(not(debug_assertions))]
                {
                    panic!("🚨 FATAL: JWT_SECRET configuration failed: {}", e);
                }
            }
        };

        Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440), // 默认 24 小时
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "library-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "library-admin".to_string()),
        }
    }
}

/// 令牌负载
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 管理员 ID (Subject)
    pub sub: String,
    /// 登录邮箱
    pub email: String,
    /// 角色名称
    pub role: String,
    /// 令牌类型，目前只有 "access"
    pub token_type: String,
    /// 过期时间 (Unix 秒)
    pub exp: i64,
    /// 签发时间 (Unix 秒)
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

/// JWT 错误
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("令牌无效: {0}")]
    InvalidToken(String),

    #[error("令牌已过期")]
    ExpiredToken,

    #[error("签名不匹配")]
    InvalidSignature,

    #[error("令牌生成失败: {0}")]
    GenerationFailed(String),

    #[error("配置错误: {0}")]
    ConfigError(String),
}

impl From<jsonwebtoken::errors::Error> for JwtError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
            ErrorKind::InvalidSignature => JwtError::InvalidSignature,
            _ => JwtError::InvalidToken(e.to_string()),
        }
    }
}

/// 生成 64 个可打印字符的随机密钥 (开发环境用)
pub fn generate_secure_printable_jwt_secret() -> String {
    const CHARSET: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+[]{}|;:,.<>?";

    let rng = SystemRandom::new();
    let mut raw = [0u8; 64];
    if rng.fill(&mut raw).is_err() {
        // 随机源不可用时退回固定的开发密钥
        return "LibraryServerDevelopmentSecureKey2025!".to_string();
    }

    raw.iter()
        .map(|b| CHARSET[*b as usize % CHARSET.len()] as char)
        .collect()
}

/// 从环境变量加载 JWT 密钥
///
/// 未设置时开发构建生成临时密钥，生产构建直接报错。
fn load_jwt_secret() -> Result<String, JwtError> {
    if let Ok(secret) = std::env::var("JWT_SECRET") {
        if secret.len() < 32 {
            return Err(JwtError::ConfigError(
                "JWT_SECRET must be at least 32 characters long".to_string(),
            ));
        }
        return Ok(secret);
    }

    #[cfg(debug_assertions)]
    {
        tracing::warn!("JWT_SECRET not set, generating a temporary development key");
        Ok(generate_secure_printable_jwt_secret())
    }
    #[cfg(not(debug_assertions))]
    {
        Err(JwtError::ConfigError(
            "JWT_SECRET environment variable must be set in production!".to_string(),
        ))
    }
}

/// JWT 令牌服务
///
/// 持有转换好的签名/验签密钥，整个进程共享一个实例。
#[derive(Debug, Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    pub fn with_config(config: JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            config,
        }
    }

    /// 为管理员签发新令牌
    pub fn generate_token(
        &self,
        admin_id: &str,
        email: &str,
        role: &str,
    ) -> Result<String, JwtError> {
        let issued_at = Utc::now();
        let expires_at = issued_at + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: admin_id.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            token_type: "access".to_string(),
            exp: expires_at.timestamp(),
            iat: issued_at.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// 验证并解码令牌
    ///
    /// 校验签名、过期时间、签发者和受众。
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        Ok(decode::<Claims>(token, &self.decoding_key, &validation)?.claims)
    }

    /// 从 `Authorization` 头提取令牌，只接受 Bearer 方案
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

/// 当前管理员上下文 (从 JWT Claims 解析)
///
/// 由认证中间件创建，注入到请求扩展
///
/// # 示例
///
/// ```ignore
/// async fn handler(Extension(user): Extension<CurrentUser>) -> Json<()> {
///     println!("管理员: {}, 角色: {}", user.email, user.role);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// 管理员 ID
    pub id: String,
    /// 登录邮箱
    pub email: String,
    /// 角色名称
    pub role: String,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            role: claims.role,
        }
    }
}

impl CurrentUser {
    /// 是否超级管理员
    pub fn is_super_admin(&self) -> bool {
        self.role == "super_admin"
    }
}
