//! 座位分配
//!
//! 处理座位的初始化、分配、释放与可用性查询。
//! 时间冲突判定在 [`schedule`](crate::seating::schedule) 模块。

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use tracing::{info, warn};

use crate::db::models::{AssignSeatRequest, Seat, SeatOccupancy, Shift, VacateSeatRequest};
use crate::db::repository::{MemberRepository, SeatRepository};
use crate::seating::schedule;
use crate::utils::validation::{
    MAX_CONTACT_LEN, MAX_NAME_LEN, validate_hhmm, validate_required_text,
};
use crate::utils::{AppError, AppResult, time};

/// 排布局：A/B/C 三排，每排 30 个
const ROWS: [&str; 3] = ["A", "B", "C"];
const SEATS_PER_ROW: u32 = 30;

#[derive(Clone)]
pub struct SeatAllocator {
    seats: SeatRepository,
    members: MemberRepository,
}

impl SeatAllocator {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            seats: SeatRepository::new(db.clone()),
            members: MemberRepository::new(db),
        }
    }

    /// 首次启动时铺满座位表
    ///
    /// 只在 seat 表完全为空时创建 A1..C30 共 90 个空座位。
    /// 已有数据时 (哪怕不满 90 个) 不补不改。
    pub async fn ensure_initialized(&self) -> AppResult<()> {
        let count = self.seats.count().await?;
        if count > 0 {
            return Ok(());
        }
        for row in ROWS {
            for number in 1..=SEATS_PER_ROW {
                let seat = Seat::vacant(row, number);
                self.seats.create_vacant(&seat).await?;
            }
        }
        info!(
            "Seat inventory initialized ({} seats)",
            ROWS.len() * SEATS_PER_ROW as usize
        );
        Ok(())
    }

    /// 所有座位 (座位号字典序)
    pub async fn list_all(&self) -> AppResult<Vec<Seat>> {
        Ok(self.seats.find_all().await?)
    }

    /// 单个座位
    pub async fn get(&self, seat_id: &str) -> AppResult<Seat> {
        self.seats
            .find_by_seat_id(seat_id)
            .await?
            .ok_or_else(|| AppError::not_found("Seat not found"))
    }

    /// 指定班次下可用的座位
    ///
    /// 无人座位直接可用；有人座位要求与所有既有占用都不冲突 (允许分时共享)。
    pub async fn list_available(
        &self,
        shift: Shift,
        custom_start: Option<String>,
        custom_end: Option<String>,
    ) -> AppResult<Vec<Seat>> {
        let probe = SeatOccupancy {
            member_id: None,
            member_name: String::new(),
            member_contact: String::new(),
            shift,
            custom_start_time: custom_start,
            custom_end_time: custom_end,
            occupied_date: None,
        };
        let seats = self.seats.find_all().await?;
        Ok(seats
            .into_iter()
            .filter(|seat| schedule::find_conflict(&seat.members, &probe).is_none())
            .collect())
    }

    /// 分配座位
    ///
    /// 返回更新后的座位以及会员座位指针是否同步成功。
    /// 指针维护是尽力而为的，失败不回滚占用。
    pub async fn assign(&self, req: AssignSeatRequest) -> AppResult<(Seat, bool)> {
        validate_required_text(&req.member_name, "memberName", MAX_NAME_LEN)?;
        validate_required_text(&req.member_contact, "memberContact", MAX_CONTACT_LEN)?;

        // Custom 班次必须带合法的起止时间，其余班次忽略传入的时间
        let (custom_start, custom_end) = match req.shift {
            Shift::Custom => {
                let start = req.custom_start_time.clone().ok_or_else(|| {
                    AppError::validation("customStartTime is required for Custom shift")
                })?;
                let end = req.custom_end_time.clone().ok_or_else(|| {
                    AppError::validation("customEndTime is required for Custom shift")
                })?;
                validate_hhmm(&start, "customStartTime")?;
                validate_hhmm(&end, "customEndTime")?;
                (Some(start), Some(end))
            }
            _ => (None, None),
        };

        let member_id = match &req.member_id {
            Some(raw) => Some(
                raw.parse::<RecordId>()
                    .map_err(|_| AppError::validation(format!("Invalid member ID: {raw}")))?,
            ),
            None => None,
        };

        let mut seat = self.get(&req.seat_id).await?;

        // 同一会员不能在同一座位出现两次
        if let Some(id) = &member_id
            && seat.members.iter().any(|m| m.member_id.as_ref() == Some(id))
        {
            return Err(AppError::conflict(format!(
                "Member {} is already assigned to this seat",
                req.member_name
            )));
        }

        let occupancy = SeatOccupancy {
            member_id: member_id.clone(),
            member_name: req.member_name.clone(),
            member_contact: req.member_contact.clone(),
            shift: req.shift,
            custom_start_time: custom_start,
            custom_end_time: custom_end,
            occupied_date: Some(time::now_rfc3339()),
        };

        if let Some(existing) = schedule::find_conflict(&seat.members, &occupancy) {
            return Err(AppError::business_rule(format!(
                "Time conflict with existing member {} ({})",
                existing.member_name, existing.shift
            )));
        }

        seat.members.push(occupancy);
        seat.recompute_occupancy();
        let saved = self.seats.save_occupancy(&seat).await?;

        let mut member_updated = false;
        if let Some(id) = &member_id {
            match self
                .members
                .update_seat(&id.to_string(), Some(saved.seat_id.clone()))
                .await
            {
                Ok(()) => member_updated = true,
                Err(e) => warn!("Failed to update member seat pointer: {}", e),
            }
        }

        info!(seat = %saved.seat_id, member = %req.member_name, shift = %req.shift, "Seat assigned");
        Ok((saved, member_updated))
    }

    /// 释放座位
    ///
    /// 指定 memberId 时只移除该会员的占用 (不在座时为无操作)；
    /// 未指定时座位必须至多一人，共享座位拒绝盲目释放。
    pub async fn vacate(&self, req: VacateSeatRequest) -> AppResult<(Seat, bool)> {
        let mut seat = self.get(&req.seat_id).await?;

        let removed: Vec<SeatOccupancy> = match &req.member_id {
            Some(raw) => {
                let target: RecordId = raw
                    .parse()
                    .map_err(|_| AppError::validation(format!("Invalid member ID: {raw}")))?;
                let members = std::mem::take(&mut seat.members);
                let (gone, kept) = members
                    .into_iter()
                    .partition(|m| m.member_id.as_ref() == Some(&target));
                seat.members = kept;
                gone
            }
            None => {
                if seat.members.len() > 1 {
                    return Err(AppError::validation(
                        "Seat is shared by multiple members, memberId is required to vacate",
                    ));
                }
                if seat.members.is_empty() {
                    Vec::new()
                } else {
                    vec![seat.members.remove(0)]
                }
            }
        };

        seat.recompute_occupancy();
        let saved = self.seats.save_occupancy(&seat).await?;

        let mut member_updated = false;
        for occupancy in &removed {
            if let Some(id) = &occupancy.member_id {
                match self.members.update_seat(&id.to_string(), None).await {
                    Ok(()) => member_updated = true,
                    Err(e) => warn!("Failed to clear member seat pointer: {}", e),
                }
            }
        }

        info!(seat = %saved.seat_id, removed = removed.len(), "Seat vacated");
        Ok((saved, member_updated))
    }
}
