//! Seat API Handlers
//!
//! 读路径沿用防御性修复：列表接口先跑一致性修复再返回数据，
//! 保证旧数据和并发漂移不会泄漏到响应里。

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{AssignSeatRequest, Seat, Shift, VacateSeatRequest};
use crate::seating::{ConsistencyRepair, SeatAllocator, SyncStats};
use crate::utils::{AppError, AppResult};

/// GET /api/seats/available 查询参数
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableSeatsQuery {
    pub shift: Option<Shift>,
    pub custom_start_time: Option<String>,
    pub custom_end_time: Option<String>,
}

/// 分配/释放座位的响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatMutationResponse {
    pub seat: Seat,
    pub message: &'static str,
    /// 会员 seat 指针是否真的更新成功
    pub member_updated: bool,
}

/// POST /api/seats/sync 的响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub success: bool,
    pub message: &'static str,
    pub stats: SyncStats,
    pub cleanup_details: CleanupDetails,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupDetails {
    pub seats_updated: usize,
    pub member_seat_inconsistencies: usize,
}

/// GET /api/seats - 获取所有座位 (附带一致性修复)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Seat>>> {
    let repair = ConsistencyRepair::new(state.get_db());
    repair.migrate_legacy().await?;
    repair.reconcile_all_seats().await?;

    let allocator = SeatAllocator::new(state.get_db());
    let seats = allocator.list_all().await?;
    Ok(Json(seats))
}

/// GET /api/seats/available - 按班次查询可用座位
pub async fn available(
    State(state): State<ServerState>,
    Query(query): Query<AvailableSeatsQuery>,
) -> AppResult<Json<Vec<Seat>>> {
    let shift = query
        .shift
        .ok_or_else(|| AppError::validation("Shift information is required"))?;

    let repair = ConsistencyRepair::new(state.get_db());
    repair.migrate_legacy().await?;
    repair.reconcile_all_seats().await?;

    let allocator = SeatAllocator::new(state.get_db());
    let seats = allocator
        .list_available(shift, query.custom_start_time, query.custom_end_time)
        .await?;
    Ok(Json(seats))
}

/// GET /api/seats/{seatId} - 获取单个座位
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(seat_id): Path<String>,
) -> AppResult<Json<Seat>> {
    let allocator = SeatAllocator::new(state.get_db());
    let seat = allocator.get(&seat_id).await?;
    Ok(Json(seat))
}

/// POST /api/seats/assign - 分配座位
pub async fn assign(
    State(state): State<ServerState>,
    Json(payload): Json<AssignSeatRequest>,
) -> AppResult<Json<SeatMutationResponse>> {
    let allocator = SeatAllocator::new(state.get_db());
    let (seat, member_updated) = allocator.assign(payload).await?;

    Ok(Json(SeatMutationResponse {
        seat,
        message: "Seat assigned successfully",
        member_updated,
    }))
}

/// POST /api/seats/vacate - 释放座位
pub async fn vacate(
    State(state): State<ServerState>,
    Json(payload): Json<VacateSeatRequest>,
) -> AppResult<Json<SeatMutationResponse>> {
    let allocator = SeatAllocator::new(state.get_db());
    let (seat, member_updated) = allocator.vacate(payload).await?;

    Ok(Json(SeatMutationResponse {
        seat,
        message: "Seat vacated successfully",
        member_updated,
    }))
}

/// POST /api/seats/sync - 全量数据同步修复
pub async fn sync(State(state): State<ServerState>) -> AppResult<Json<SyncResponse>> {
    let allocator = SeatAllocator::new(state.get_db());
    allocator.ensure_initialized().await?;

    let repair = ConsistencyRepair::new(state.get_db());
    let stats = repair.sync().await?;

    Ok(Json(SyncResponse {
        success: true,
        message: "Data synchronization completed successfully",
        cleanup_details: CleanupDetails {
            seats_updated: stats.cleanup_count,
            member_seat_inconsistencies: stats.member_seat_issues,
        },
        stats,
    }))
}
