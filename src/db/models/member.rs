//! 会员数据模型

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::seat::Shift;
use super::serde_helpers;

/// 性别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

/// 会员
///
/// `seat` 是指向座位号的非权威指针，权威占用关系在 seat.members 里。
/// 两边可能短暂失配，由一致性修复流程收敛。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    pub father_name: String,
    pub contact: String,
    pub aadhar: String,
    pub address: String,
    pub gender: Gender,
    pub shift: Shift,
    /// 套餐时长标签 (如 "6 Months")
    pub timing: String,
    #[serde(default)]
    pub monthly_fees: Option<f64>,
    /// 入会时间 (RFC 3339)
    pub joining_date: String,
    /// 费用已缴至 (RFC 3339)
    #[serde(default)]
    pub fees_paid_till: Option<String>,
    #[serde(default)]
    pub payment_mode: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    /// 座位号指针 (如 "A1")
    #[serde(default)]
    pub seat: Option<String>,
}

/// 创建会员请求
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemberRequest {
    pub name: String,
    pub father_name: String,
    pub contact: String,
    pub aadhar: String,
    pub address: String,
    pub gender: Gender,
    pub shift: Shift,
    pub timing: String,
    #[serde(default)]
    pub monthly_fees: Option<f64>,
    /// 省略时取当前时间
    #[serde(default)]
    pub joining_date: Option<String>,
    #[serde(default)]
    pub fees_paid_till: Option<String>,
    #[serde(default)]
    pub payment_mode: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub seat: Option<String>,
}

/// 更新会员请求 (所有字段可选)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub father_name: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub aadhar: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub shift: Option<Shift>,
    #[serde(default)]
    pub timing: Option<String>,
    #[serde(default)]
    pub monthly_fees: Option<f64>,
    #[serde(default)]
    pub fees_paid_till: Option<String>,
    #[serde(default)]
    pub payment_mode: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    /// 空字符串视为取消座位
    #[serde(default)]
    pub seat: Option<String>,
}
