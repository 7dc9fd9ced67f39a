//! 班次时间表
//!
//! 把班次映射到一天内的 [start, end) 区间并判定占用冲突。
//! 历史数据里缺失或损坏的自定义时间回退到默认窗口，
//! 保证对任何存量记录都能做出判定。

use chrono::NaiveTime;

use crate::db::models::{SeatOccupancy, Shift};
use crate::utils::time::parse_hhmm_or;

/// 自定义班次缺省开始时间
pub const DEFAULT_CUSTOM_START: &str = "08:00";
/// 自定义班次缺省结束时间
pub const DEFAULT_CUSTOM_END: &str = "20:00";

fn fixed(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

/// 班次对应的时间窗口 [start, end)
pub fn time_window(
    shift: Shift,
    custom_start: Option<&str>,
    custom_end: Option<&str>,
) -> (NaiveTime, NaiveTime) {
    match shift {
        Shift::HalfDayMorning => (fixed(8, 0), fixed(14, 0)),
        Shift::HalfDayEvening => (fixed(14, 0), fixed(20, 0)),
        Shift::FullDay => (fixed(8, 0), fixed(20, 0)),
        Shift::Custom => {
            let start = parse_hhmm_or(
                custom_start.unwrap_or(DEFAULT_CUSTOM_START),
                DEFAULT_CUSTOM_START,
            );
            let end = parse_hhmm_or(custom_end.unwrap_or(DEFAULT_CUSTOM_END), DEFAULT_CUSTOM_END);
            (start, end)
        }
    }
}

/// 占用记录的时间窗口
pub fn occupancy_window(occupancy: &SeatOccupancy) -> (NaiveTime, NaiveTime) {
    time_window(
        occupancy.shift,
        occupancy.custom_start_time.as_deref(),
        occupancy.custom_end_time.as_deref(),
    )
}

/// 判定两条占用是否冲突
///
/// 判定顺序与旧版数据一致：
/// 1. 任一方为全天班 → 冲突
/// 2. 班次相同 → 冲突 (两个 Custom 也视为同一时段)
/// 3. 任一方为 Custom → 按具体窗口做严格重叠判定 (边界相接不算重叠)
/// 4. 其余情况 (两个不同的半天班) → 不冲突
pub fn conflicts(existing: &SeatOccupancy, incoming: &SeatOccupancy) -> bool {
    if existing.shift == Shift::FullDay || incoming.shift == Shift::FullDay {
        return true;
    }
    if existing.shift == incoming.shift {
        return true;
    }
    if existing.shift == Shift::Custom || incoming.shift == Shift::Custom {
        let (existing_start, existing_end) = occupancy_window(existing);
        let (incoming_start, incoming_end) = occupancy_window(incoming);
        return incoming_start < existing_end && existing_start < incoming_end;
    }
    false
}

/// 找出与新请求冲突的第一个既有占用者
pub fn find_conflict<'a>(
    occupants: &'a [SeatOccupancy],
    incoming: &SeatOccupancy,
) -> Option<&'a SeatOccupancy> {
    occupants.iter().find(|existing| conflicts(existing, incoming))
}
