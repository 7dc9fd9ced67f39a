//! 缴费记录数据模型

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// 支付方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMode {
    Cash,
    Online,
    Card,
}

/// 支付状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

fn default_status() -> PaymentStatus {
    PaymentStatus::Completed
}

/// 缴费记录
///
/// studentName/contactNumber 是旧版表单遗留的重复字段，
/// 与 memberName/memberContact 含义相同，迁移前必须双写。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// 关联会员 (手工录入的缴费可以为空)
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub member_id: Option<RecordId>,
    pub member_name: String,
    pub member_contact: String,
    pub student_name: String,
    pub contact_number: String,
    pub amount: f64,
    pub payment_mode: PaymentMode,
    #[serde(default)]
    pub payment_provider: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// 缴费时间 (RFC 3339)
    pub payment_date: String,
    #[serde(default = "default_status")]
    pub status: PaymentStatus,
}

/// 创建缴费记录请求
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    #[serde(default)]
    pub member_id: Option<String>,
    pub member_name: String,
    pub member_contact: String,
    /// 省略时回填 memberName
    #[serde(default)]
    pub student_name: Option<String>,
    /// 省略时回填 memberContact
    #[serde(default)]
    pub contact_number: Option<String>,
    pub amount: f64,
    pub payment_mode: PaymentMode,
    #[serde(default)]
    pub payment_provider: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub payment_date: Option<String>,
    #[serde(default)]
    pub status: Option<PaymentStatus>,
    /// 同步刷新会员的 feesPaidTill
    #[serde(default)]
    pub update_fees_paid_till: bool,
    #[serde(default)]
    pub fees_paid_till: Option<String>,
}
