//! Member API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::core::ServerState;
use crate::db::models::{CreateMemberRequest, Member, UpdateMemberRequest};
use crate::db::repository::MemberRepository;
use crate::seating::{DeletionReport, MemberLifecycle};
use crate::utils::AppResult;

/// 会员创建/更新响应
///
/// 正常时就是会员 JSON 本体；座位操作失败时多出一个
/// `seatWarning` 字段，旧客户端可以无感忽略。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    #[serde(flatten)]
    pub member: Member,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seat_warning: Option<String>,
}

/// GET /api/members - 获取所有会员 (按入会时间倒序)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Member>>> {
    let repo = MemberRepository::new(state.get_db());
    let members = repo.find_all().await?;
    Ok(Json(members))
}

/// POST /api/members - 注册新会员
///
/// 选了座位时同步走座位分配，分配失败不回滚会员记录。
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreateMemberRequest>,
) -> AppResult<Json<MemberResponse>> {
    let lifecycle = MemberLifecycle::new(state.get_db());
    let (member, seat_warning) = lifecycle.create(payload).await?;
    Ok(Json(MemberResponse {
        member,
        seat_warning,
    }))
}

/// PUT /api/members/{id} - 更新会员
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateMemberRequest>,
) -> AppResult<Json<MemberResponse>> {
    let lifecycle = MemberLifecycle::new(state.get_db());
    let (member, seat_warning) = lifecycle.update(&id, payload).await?;
    Ok(Json(MemberResponse {
        member,
        seat_warning,
    }))
}

/// DELETE /api/members/{id} - 删除会员及关联数据
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeletionReport>> {
    let lifecycle = MemberLifecycle::new(state.get_db());
    let report = lifecycle.delete(&id).await?;
    Ok(Json(report))
}
