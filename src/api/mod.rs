//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`admin`] - 管理员登录与信息
//! - [`seats`] - 座位管理接口
//! - [`members`] - 会员管理接口
//! - [`payments`] - 缴费管理接口
//! - [`whatsapp`] - 催费提醒接口

pub mod admin;
pub mod health;

// Data models API
pub mod members;
pub mod payments;
pub mod seats;
pub mod whatsapp;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};
