//! 数据模型定义
//!
//! 所有模型使用 camelCase 序列化，与旧版前端的 JSON 约定保持一致。

pub mod admin;
pub mod member;
pub mod payment;
pub mod seat;
pub mod serde_helpers;

// ========== 座位 ==========
pub use seat::{AssignSeatRequest, Seat, SeatOccupancy, Shift, VacateSeatRequest};

// ========== 会员 ==========
pub use member::{CreateMemberRequest, Gender, Member, UpdateMemberRequest};

// ========== 缴费 ==========
pub use payment::{CreatePaymentRequest, Payment, PaymentMode, PaymentStatus};

// ========== 管理员 ==========
pub use admin::{Admin, AdminInfo, AdminRole};
