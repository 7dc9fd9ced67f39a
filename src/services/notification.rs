//! WhatsApp 催费通知服务
//!
//! 当前为开发桩实现：生成消息、记录日志并返回回执，
//! 不真正调用 WhatsApp Business API。接入真实服务时只需
//! 替换 [`WhatsAppService::send_reminder`] 的发送部分。

use serde::Serialize;
use tracing::info;

use crate::utils::{AppError, AppResult, time};

/// 发送成功的回执
#[derive(Debug, Clone, Serialize)]
pub struct ReminderReceipt {
    /// 规范化后的接收号码
    pub to: String,
    /// 实际发送的消息内容
    pub message: String,
    /// 发送时间 (RFC3339)
    pub timestamp: String,
}

/// WhatsApp 通知服务
#[derive(Debug, Clone)]
pub struct WhatsAppService {
    /// 发送方号码，来自 MOBILE_NUMBER 环境变量
    sender: Option<String>,
}

impl WhatsAppService {
    pub fn new(sender: Option<String>) -> Self {
        Self { sender }
    }

    /// 规范化手机号
    ///
    /// 去掉所有非数字字符；10 位本地号码补上印度国家码 91。
    pub fn format_number(raw: &str) -> String {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

        if !digits.starts_with("91") && digits.len() == 10 {
            format!("91{digits}")
        } else {
            digits
        }
    }

    /// 生成催费消息
    pub fn build_reminder(student_name: &str) -> String {
        format!(
            "Hello {student_name}, this is a friendly reminder to pay your library fees. \
             Please contact us for payment details. Thank you!"
        )
    }

    /// 发送催费提醒
    ///
    /// # 错误
    ///
    /// - 姓名或号码为空返回 400
    /// - 未配置发送方号码返回 500
    pub async fn send_reminder(
        &self,
        student_name: &str,
        student_number: &str,
    ) -> AppResult<ReminderReceipt> {
        if student_name.trim().is_empty() || student_number.trim().is_empty() {
            return Err(AppError::validation("Student number and name are required"));
        }

        let sender = self.sender.as_deref().ok_or_else(|| {
            AppError::internal("Admin mobile number not configured in environment variables")
        })?;

        let to = Self::format_number(student_number);
        let message = Self::build_reminder(student_name);

        info!(
            target: "whatsapp",
            %to,
            from = %sender,
            "WhatsApp reminder attempt"
        );

        Ok(ReminderReceipt {
            to,
            message,
            timestamp: time::now_rfc3339(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_adds_country_code() {
        assert_eq!(WhatsAppService::format_number("9876543210"), "919876543210");
        assert_eq!(
            WhatsAppService::format_number("98765-43210"),
            "919876543210"
        );
        assert_eq!(
            WhatsAppService::format_number("+91 98765 43210"),
            "919876543210"
        );
    }

    #[test]
    fn test_format_number_leaves_other_lengths_alone() {
        // 已带国家码
        assert_eq!(WhatsAppService::format_number("919876543210"), "919876543210");
        // 过短号码原样返回，交给上游校验
        assert_eq!(WhatsAppService::format_number("12345"), "12345");
    }

    #[test]
    fn test_build_reminder_message() {
        let msg = WhatsAppService::build_reminder("Ravi");
        assert!(msg.starts_with("Hello Ravi, "));
        assert!(msg.contains("library fees"));
    }

    #[tokio::test]
    async fn test_send_reminder_requires_sender_config() {
        let service = WhatsAppService::new(None);
        let result = service.send_reminder("Ravi", "9876543210").await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_send_reminder_returns_receipt() {
        let service = WhatsAppService::new(Some("911234567890".to_string()));
        let receipt = service
            .send_reminder("Ravi", "9876543210")
            .await
            .expect("reminder should succeed");

        assert_eq!(receipt.to, "919876543210");
        assert!(receipt.message.contains("Ravi"));
        assert!(!receipt.timestamp.is_empty());
    }

    #[tokio::test]
    async fn test_send_reminder_rejects_blank_input() {
        let service = WhatsAppService::new(Some("911234567890".to_string()));
        assert!(service.send_reminder("", "9876543210").await.is_err());
        assert!(service.send_reminder("Ravi", "  ").await.is_err());
    }
}
