//! 座位数据一致性修复
//!
//! 座位占用与会员指针是双写的非权威关系，任何一侧的写失败都会留下漂移。
//! 这里提供防御性读取前的修复逻辑：
//!
//! - [`migrate_legacy`](ConsistencyRepair::migrate_legacy) - 把只有影子字段的旧记录迁移进 members 数组
//! - [`reconcile_all_seats`](ConsistencyRepair::reconcile_all_seats) - 去重、重算占用、影子字段归一
//! - [`reconcile_members`](ConsistencyRepair::reconcile_members) - 会员座位指针核对 (只报告不修改)

use std::collections::HashSet;

use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tracing::{info, warn};

use crate::db::models::{Seat, SeatOccupancy, Shift};
use crate::db::repository::{MemberRepository, SeatRepository};
use crate::utils::{AppResult, time};

/// 同步统计
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStats {
    pub total_seats: usize,
    pub occupied_seats: usize,
    pub available_seats: usize,
    pub seats_with_members: usize,
    pub cleanup_count: usize,
    pub member_seat_issues: usize,
}

#[derive(Clone)]
pub struct ConsistencyRepair {
    seats: SeatRepository,
    members: MemberRepository,
}

impl ConsistencyRepair {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            seats: SeatRepository::new(db.clone()),
            members: MemberRepository::new(db),
        }
    }

    /// 迁移旧格式座位数据
    ///
    /// 只有影子字段没有 members 数组的记录，按全天班合成一条占用；
    /// 缺失的姓名/电话用 "Unknown" 占位。返回迁移的座位数。
    pub async fn migrate_legacy(&self) -> AppResult<usize> {
        let seats = self.seats.find_all().await?;
        let mut migrated = 0;

        for mut seat in seats {
            let mut needs_update = false;

            if seat.is_occupied && seat.member_id.is_some() && seat.members.is_empty() {
                let legacy = SeatOccupancy {
                    member_id: seat.member_id.clone(),
                    member_name: seat
                        .member_name
                        .clone()
                        .filter(|n| !n.is_empty())
                        .unwrap_or_else(|| "Unknown".to_string()),
                    member_contact: seat
                        .member_contact
                        .clone()
                        .filter(|c| !c.is_empty())
                        .unwrap_or_else(|| "Unknown".to_string()),
                    // 旧数据没有班次信息，按全天班处理
                    shift: Shift::FullDay,
                    custom_start_time: None,
                    custom_end_time: None,
                    occupied_date: seat
                        .occupied_date
                        .clone()
                        .or_else(|| Some(time::now_rfc3339())),
                };
                seat.members.push(legacy);
                needs_update = true;
                info!(seat = %seat.seat_id, "Migrated legacy occupancy into members array");
            }

            if dedupe_members(&mut seat) {
                needs_update = true;
            }

            if needs_update {
                self.seats.save_occupancy(&seat).await?;
                migrated += 1;
            }
        }

        if migrated > 0 {
            info!("Migrated {} seats to the members format", migrated);
        }
        Ok(migrated)
    }

    /// 全量座位归一
    ///
    /// 去重、按 members 重算 isOccupied、影子字段镜像 members[0]。
    /// 返回实际修正的座位数。
    pub async fn reconcile_all_seats(&self) -> AppResult<usize> {
        let seats = self.seats.find_all().await?;
        let mut cleanup_count = 0;

        for mut seat in seats {
            let mut changed = dedupe_members(&mut seat);

            let was_occupied = seat.is_occupied;
            let shadow_before = (
                seat.member_id.clone(),
                seat.member_name.clone(),
                seat.member_contact.clone(),
                seat.occupied_date.clone(),
            );

            seat.recompute_occupancy();

            if seat.is_occupied != was_occupied {
                info!(
                    seat = %seat.seat_id,
                    occupied = seat.is_occupied,
                    members = seat.members.len(),
                    "Fixed occupancy flag"
                );
                changed = true;
            }
            let shadow_after = (
                seat.member_id.clone(),
                seat.member_name.clone(),
                seat.member_contact.clone(),
                seat.occupied_date.clone(),
            );
            if shadow_after != shadow_before {
                changed = true;
            }

            if changed {
                self.seats.save_occupancy(&seat).await?;
                cleanup_count += 1;
            }
        }

        if cleanup_count > 0 {
            info!("Seat reconciliation updated {} seats", cleanup_count);
        }
        Ok(cleanup_count)
    }

    /// 会员指针核对
    ///
    /// 检查每个带座位指针的会员是否真的出现在该座位的占用里。
    /// 只记日志并计数，不做修改。
    pub async fn reconcile_members(&self) -> AppResult<usize> {
        let members = self.members.find_all().await?;
        let mut issues = 0;

        for member in members {
            let Some(seat_id) = member.seat.as_deref().filter(|s| !s.is_empty()) else {
                continue;
            };
            let Some(member_id) = &member.id else {
                continue;
            };

            match self.seats.find_by_seat_id(seat_id).await? {
                None => {
                    warn!(
                        member = %member.name,
                        seat = %seat_id,
                        "Member references a seat that does not exist"
                    );
                    issues += 1;
                }
                Some(seat) => {
                    let present = seat
                        .members
                        .iter()
                        .any(|m| m.member_id.as_ref() == Some(member_id));
                    if !present {
                        warn!(
                            member = %member.name,
                            seat = %seat_id,
                            "Member references a seat it does not occupy"
                        );
                        issues += 1;
                    }
                }
            }
        }
        Ok(issues)
    }

    /// 全量同步：迁移 + 归一 + 指针核对 + 统计
    pub async fn sync(&self) -> AppResult<SyncStats> {
        self.migrate_legacy().await?;
        let cleanup_count = self.reconcile_all_seats().await?;
        let member_seat_issues = self.reconcile_members().await?;

        let seats = self.seats.find_all().await?;
        let occupied = seats.iter().filter(|s| s.is_occupied).count();
        let with_members = seats.iter().filter(|s| !s.members.is_empty()).count();

        let stats = SyncStats {
            total_seats: seats.len(),
            occupied_seats: occupied,
            available_seats: seats.len() - occupied,
            seats_with_members: with_members,
            cleanup_count,
            member_seat_issues,
        };
        info!(
            total = stats.total_seats,
            occupied = stats.occupied_seats,
            cleaned = stats.cleanup_count,
            issues = stats.member_seat_issues,
            "Data synchronization completed"
        );
        Ok(stats)
    }
}

/// 按 memberId 去重，先到先留；没有 memberId 的手工占用永不去重
fn dedupe_members(seat: &mut Seat) -> bool {
    if seat.members.len() < 2 {
        return false;
    }
    let before = seat.members.len();
    let mut seen: HashSet<String> = HashSet::new();
    seat.members.retain(|m| match &m.member_id {
        Some(id) => seen.insert(id.to_string()),
        None => true,
    });
    let removed = before - seat.members.len();
    if removed > 0 {
        info!(seat = %seat.seat_id, removed, "Removed duplicate seat members");
        true
    } else {
        false
    }
}
