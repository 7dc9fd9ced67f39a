//! 会员生命周期
//!
//! 会员的创建/更新/删除都会牵动座位占用和缴费记录，
//! 这里把跨表的编排集中到一处。座位操作全部尽力而为：
//! 会员主记录的写入成功后绝不因座位侧失败而回滚，
//! 漂移交给一致性修复兜底。

use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tracing::{info, warn};

use crate::db::models::{
    AssignSeatRequest, CreateMemberRequest, Member, UpdateMemberRequest, VacateSeatRequest,
};
use crate::db::repository::{MemberRepository, PaymentRepository, SeatRepository};
use crate::seating::SeatAllocator;
use crate::utils::validation::{
    MAX_AADHAR_LEN, MAX_ADDRESS_LEN, MAX_CONTACT_LEN, MAX_NAME_LEN, MAX_TIMING_LEN,
    validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, time};

/// 删除会员的执行报告
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionReport {
    pub msg: String,
    pub member_id: String,
    pub member_name: String,
    /// 释放的座位号，没有座位时为 "No seat assigned"
    pub seat_freed: String,
    /// 所有清理步骤都成功才为 true
    pub cleanup_completed: bool,
}

#[derive(Clone)]
pub struct MemberLifecycle {
    members: MemberRepository,
    payments: PaymentRepository,
    seats: SeatRepository,
    allocator: SeatAllocator,
}

impl MemberLifecycle {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            members: MemberRepository::new(db.clone()),
            payments: PaymentRepository::new(db.clone()),
            seats: SeatRepository::new(db.clone()),
            allocator: SeatAllocator::new(db),
        }
    }

    /// 创建会员
    ///
    /// 返回会员和座位分配失败时的提示信息。
    /// 座位分配失败不回滚会员记录，由调用方提示前台补救。
    pub async fn create(&self, input: CreateMemberRequest) -> AppResult<(Member, Option<String>)> {
        validate_required_text(&input.name, "name", MAX_NAME_LEN)?;
        validate_required_text(&input.father_name, "fatherName", MAX_NAME_LEN)?;
        validate_required_text(&input.contact, "contact", MAX_CONTACT_LEN)?;
        validate_required_text(&input.aadhar, "aadhar", MAX_AADHAR_LEN)?;
        validate_required_text(&input.address, "address", MAX_ADDRESS_LEN)?;
        validate_required_text(&input.timing, "timing", MAX_TIMING_LEN)?;

        // 空字符串与缺失都视为没有选座
        let requested_seat = input.seat.clone().filter(|s| !s.trim().is_empty());

        let member = Member {
            id: None,
            name: input.name,
            father_name: input.father_name,
            contact: input.contact,
            aadhar: input.aadhar,
            address: input.address,
            gender: input.gender,
            shift: input.shift,
            timing: input.timing,
            monthly_fees: input.monthly_fees,
            joining_date: input.joining_date.unwrap_or_else(time::now_rfc3339),
            fees_paid_till: input.fees_paid_till,
            payment_mode: input.payment_mode,
            profile_picture: input.profile_picture,
            seat: requested_seat.clone(),
        };

        let created = self.members.create(member).await?;
        info!(member = %created.name, "Member created");

        let mut seat_warning = None;
        if let Some(seat_id) = requested_seat {
            let member_id = created.id.as_ref().map(|id| id.to_string());
            let request = AssignSeatRequest {
                seat_id: seat_id.clone(),
                member_id,
                member_name: created.name.clone(),
                member_contact: created.contact.clone(),
                shift: created.shift,
                custom_start_time: None,
                custom_end_time: None,
            };
            if let Err(e) = self.allocator.assign(request).await {
                warn!(member = %created.name, seat = %seat_id, error = %e, "Seat assignment failed after member creation");
                seat_warning = Some(format!("Seat assignment failed: {e}"));
            }
        }

        Ok((created, seat_warning))
    }

    /// 更新会员
    ///
    /// 座位变更按"先离旧座、再上新座"执行，两步互相独立，
    /// 任何一步失败都保留已完成的部分并把提示带回给调用方。
    pub async fn update(
        &self,
        id: &str,
        input: UpdateMemberRequest,
    ) -> AppResult<(Member, Option<String>)> {
        validate_optional_text(&input.name, "name", MAX_NAME_LEN)?;
        validate_optional_text(&input.father_name, "fatherName", MAX_NAME_LEN)?;
        validate_optional_text(&input.contact, "contact", MAX_CONTACT_LEN)?;
        validate_optional_text(&input.aadhar, "aadhar", MAX_AADHAR_LEN)?;
        validate_optional_text(&input.address, "address", MAX_ADDRESS_LEN)?;
        validate_optional_text(&input.timing, "timing", MAX_TIMING_LEN)?;

        let existing = self
            .members
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Member not found"))?;

        let old_seat = existing.seat.clone().filter(|s| !s.trim().is_empty());
        let seat_provided = input.seat.is_some();
        let new_seat = input.seat.clone().and_then(|s| {
            let trimmed = s.trim().to_string();
            if trimmed.is_empty() { None } else { Some(trimmed) }
        });
        let seat_changed = seat_provided && new_seat != old_seat;

        let updated = self.members.update(id, input).await?;

        let mut seat_warning = None;
        if seat_changed {
            if let Some(old) = &old_seat {
                let vacate = VacateSeatRequest {
                    seat_id: old.clone(),
                    member_id: Some(id.to_string()),
                };
                if let Err(e) = self.allocator.vacate(vacate).await {
                    warn!(member = %updated.name, seat = %old, error = %e, "Failed to vacate old seat during member update");
                    seat_warning = Some(format!("Failed to vacate old seat: {e}"));
                }
            }
            if let Some(new) = &new_seat {
                let assign = AssignSeatRequest {
                    seat_id: new.clone(),
                    member_id: Some(id.to_string()),
                    member_name: updated.name.clone(),
                    member_contact: updated.contact.clone(),
                    shift: updated.shift,
                    custom_start_time: None,
                    custom_end_time: None,
                };
                if let Err(e) = self.allocator.assign(assign).await {
                    warn!(member = %updated.name, seat = %new, error = %e, "Failed to assign new seat during member update");
                    seat_warning = Some(format!("Failed to assign new seat: {e}"));
                }
            }
        }

        // 座位操作会动 seat 指针，重read一次保证响应反映真实状态
        let member = self
            .members
            .find_by_id(id)
            .await?
            .unwrap_or(updated);
        info!(member = %member.name, "Member updated");
        Ok((member, seat_warning))
    }

    /// 删除会员及其关联数据
    ///
    /// 四步清理：座位占用清扫、缴费记录删除、会员主记录删除、
    /// 防御性复查。主记录删除失败直接报错，其余步骤失败只降级
    /// cleanupCompleted 标志。
    pub async fn delete(&self, id: &str) -> AppResult<DeletionReport> {
        let member = self
            .members
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Member not found"))?;

        let mut cleanup_completed = true;

        // Step 1: 清扫所有引用该会员的座位 (包括指针指向之外的漂移占用)
        match self.remove_from_all_seats(id).await {
            Ok(freed) => {
                if freed > 0 {
                    info!(member = %member.name, seats = freed, "Removed member from seats");
                }
            }
            Err(e) => {
                warn!(member = %member.name, error = %e, "Seat sweep failed during member deletion");
                cleanup_completed = false;
            }
        }

        // Step 2: 删除缴费记录 (手工录入的缴费靠姓名/电话兜底)
        match self
            .payments
            .delete_for_member(id, &member.name, &member.contact)
            .await
        {
            Ok(count) => {
                if count > 0 {
                    info!(member = %member.name, payments = count, "Deleted payment records");
                }
            }
            Err(e) => {
                warn!(member = %member.name, error = %e, "Payment cleanup failed during member deletion");
                cleanup_completed = false;
            }
        }

        // Step 3: 删除会员主记录，失败必须上抛
        self.members.delete(id).await?;
        info!(member = %member.name, "Member deleted");

        // Step 4: 防御性复查，座位里不应再有该会员
        match self.remove_from_all_seats(id).await {
            Ok(0) => {}
            Ok(lingering) => {
                warn!(
                    member = %member.name,
                    seats = lingering,
                    "Removed lingering seat references after deletion"
                );
            }
            Err(e) => {
                warn!(member = %member.name, error = %e, "Post-deletion seat verification failed");
                cleanup_completed = false;
            }
        }

        Ok(DeletionReport {
            msg: "Member deleted successfully".to_string(),
            member_id: id.to_string(),
            member_name: member.name.clone(),
            seat_freed: member
                .seat
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "No seat assigned".to_string()),
            cleanup_completed,
        })
    }

    /// 从每个引用该会员的座位里移除其占用并重算状态
    async fn remove_from_all_seats(&self, member_id: &str) -> AppResult<usize> {
        let target: surrealdb::RecordId = member_id
            .parse()
            .map_err(|_| AppError::validation(format!("Invalid member ID: {member_id}")))?;

        let seats = self.seats.find_with_member(member_id).await?;
        let mut touched = 0;
        for mut seat in seats {
            let before = seat.members.len();
            seat.members
                .retain(|m| m.member_id.as_ref() != Some(&target));
            if seat.members.len() != before {
                seat.recompute_occupancy();
                self.seats.save_occupancy(&seat).await?;
                touched += 1;
            }
        }
        Ok(touched)
    }
}
