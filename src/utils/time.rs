//! 时间工具函数
//!
//! 所有时间戳统一使用 RFC 3339 字符串存储，
//! 班次时间使用 `HH:MM` 格式。

use chrono::{NaiveTime, Utc};

/// 当前 UTC 时间的 RFC 3339 字符串
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

/// 解析 HH:MM 时间字符串 (班次边界)
pub fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}

/// 解析 HH:MM 时间字符串，失败时回退到给定默认值
///
/// 用于读取历史数据中可能损坏的自定义班次时间。
pub fn parse_hhmm_or(value: &str, fallback: &str) -> NaiveTime {
    parse_hhmm(value).unwrap_or_else(|| {
        tracing::warn!(
            "Failed to parse time '{}', falling back to {}",
            value,
            fallback
        );
        NaiveTime::parse_from_str(fallback, "%H:%M").unwrap_or(NaiveTime::MIN)
    })
}
