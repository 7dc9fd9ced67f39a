//! 服务层
//!
//! - [`HttpService`] - HTTP 服务器
//! - [`WhatsAppService`] - WhatsApp 催费通知

pub mod http;
pub mod notification;

pub use http::HttpService;
pub use notification::WhatsAppService;
