//! 座位域服务
//!
//! - `schedule`  班次时间窗与冲突判定
//! - `allocator` 座位初始化/分配/释放
//! - `repair`    双写漂移的一致性修复
//! - `lifecycle` 会员创建/更新/删除的跨表编排

pub mod allocator;
pub mod lifecycle;
pub mod repair;
pub mod schedule;

pub use allocator::SeatAllocator;
pub use lifecycle::{DeletionReport, MemberLifecycle};
pub use repair::{ConsistencyRepair, SyncStats};
