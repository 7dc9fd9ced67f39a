//! 座位数据模型
//!
//! 阅览室座位按排布局：A/B/C 三排，每排 30 个，`seatId` 形如 "A1".."C30"。
//! `members` 为当前占用列表，支持多人分时共享；顶层 memberId/memberName/
//! memberContact/occupiedDate 是旧版前端依赖的影子字段，始终镜像 members[0]。

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// 班次
///
/// 序列化格式与旧版前端的下拉选项一字不差，存量数据依赖这些字符串。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shift {
    #[serde(rename = "Half Day (8 AM - 2 PM)")]
    HalfDayMorning,
    #[serde(rename = "Half Day (2 PM - 8 PM)")]
    HalfDayEvening,
    #[serde(rename = "Full Day (8 AM - 8 PM)")]
    FullDay,
    Custom,
}

impl std::fmt::Display for Shift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Shift::HalfDayMorning => "Half Day (8 AM - 2 PM)",
            Shift::HalfDayEvening => "Half Day (2 PM - 8 PM)",
            Shift::FullDay => "Full Day (8 AM - 8 PM)",
            Shift::Custom => "Custom",
        };
        f.write_str(s)
    }
}

/// 座位占用记录 (`members` 数组元素)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatOccupancy {
    /// 关联会员 (手工录入的占用可以为空)
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub member_id: Option<RecordId>,
    pub member_name: String,
    pub member_contact: String,
    pub shift: Shift,
    /// 自定义班次开始时间 (HH:MM，仅 Custom 班次)
    #[serde(default)]
    pub custom_start_time: Option<String>,
    /// 自定义班次结束时间 (HH:MM，仅 Custom 班次)
    #[serde(default)]
    pub custom_end_time: Option<String>,
    /// 分配时间 (RFC 3339)
    #[serde(default)]
    pub occupied_date: Option<String>,
}

/// 座位
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// 座位号，如 "A1"
    pub seat_id: String,
    /// 排 (A/B/C)
    pub row: String,
    /// 排内编号 (1-30)
    pub number: u32,
    #[serde(default, deserialize_with = "serde_helpers::default_false")]
    pub is_occupied: bool,
    #[serde(default)]
    pub members: Vec<SeatOccupancy>,

    // ========== 旧版前端影子字段 ==========
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub member_id: Option<RecordId>,
    #[serde(default)]
    pub member_name: Option<String>,
    #[serde(default)]
    pub member_contact: Option<String>,
    #[serde(default)]
    pub occupied_date: Option<String>,
}

impl Seat {
    /// 空座位
    pub fn vacant(row: &str, number: u32) -> Self {
        Self {
            id: None,
            seat_id: format!("{row}{number}"),
            row: row.to_string(),
            number,
            is_occupied: false,
            members: Vec::new(),
            member_id: None,
            member_name: None,
            member_contact: None,
            occupied_date: None,
        }
    }

    /// 重算占用状态并让影子字段镜像 members[0]
    ///
    /// 所有修改 `members` 的路径都必须在持久化前调用本方法，
    /// 否则旧版前端看到的影子字段会与真实占用脱节。
    pub fn recompute_occupancy(&mut self) {
        self.is_occupied = !self.members.is_empty();
        match self.members.first() {
            Some(first) => {
                self.member_id = first.member_id.clone();
                self.member_name = Some(first.member_name.clone());
                self.member_contact = Some(first.member_contact.clone());
                self.occupied_date = first.occupied_date.clone();
            }
            None => {
                self.member_id = None;
                self.member_name = None;
                self.member_contact = None;
                self.occupied_date = None;
            }
        }
    }
}

/// 分配座位请求
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignSeatRequest {
    pub seat_id: String,
    /// 关联会员 ("member:xxx"，手工录入时为空)
    #[serde(default)]
    pub member_id: Option<String>,
    pub member_name: String,
    pub member_contact: String,
    pub shift: Shift,
    #[serde(default)]
    pub custom_start_time: Option<String>,
    #[serde(default)]
    pub custom_end_time: Option<String>,
}

/// 释放座位请求
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VacateSeatRequest {
    pub seat_id: String,
    /// 指定要移除的会员；多人共享座位时必填
    #[serde(default)]
    pub member_id: Option<String>,
}
