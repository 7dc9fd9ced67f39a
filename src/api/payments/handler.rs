//! Payment API Handlers

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Datelike};
use serde::Serialize;
use tracing::warn;

use crate::core::ServerState;
use crate::db::models::{CreatePaymentRequest, Payment, PaymentStatus};
use crate::db::repository::{MemberRepository, PaymentRepository};
use crate::utils::{AppError, AppResult, time};

/// 缴费统计响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatsResponse {
    pub total_payments: usize,
    pub total_amount: f64,
    pub monthly_stats: Vec<MonthlyStat>,
}

/// 单月统计 (按时间倒序)
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStat {
    pub year: i32,
    pub month: u32,
    pub count: usize,
    pub total: f64,
}

/// POST /api/payments - 录入缴费
///
/// 旧表单的 studentName/contactNumber 字段缺省时从
/// memberName/memberContact 回填。`updateFeesPaidTill` 置位时
/// 顺带刷新会员的缴费有效期，刷新失败只记日志。
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreatePaymentRequest>,
) -> AppResult<Json<Payment>> {
    let member_id_raw = payload
        .member_id
        .clone()
        .filter(|s| !s.trim().is_empty());
    let member_id = match &member_id_raw {
        Some(raw) => Some(
            raw.parse()
                .map_err(|_| AppError::validation(format!("Invalid member ID: {}", raw)))?,
        ),
        None => None,
    };

    let payment = Payment {
        id: None,
        member_id,
        student_name: payload
            .student_name
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| payload.member_name.clone()),
        contact_number: payload
            .contact_number
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| payload.member_contact.clone()),
        member_name: payload.member_name,
        member_contact: payload.member_contact,
        amount: payload.amount,
        payment_mode: payload.payment_mode,
        payment_provider: payload.payment_provider,
        transaction_id: payload.transaction_id,
        notes: payload.notes,
        payment_date: payload.payment_date.unwrap_or_else(time::now_rfc3339),
        status: payload.status.unwrap_or(PaymentStatus::Completed),
    };

    let repo = PaymentRepository::new(state.get_db());
    let created = repo.create(payment).await?;

    if payload.update_fees_paid_till
        && let Some(raw) = &member_id_raw
    {
        let members = MemberRepository::new(state.get_db());
        if let Err(e) = members
            .update_fees_paid_till(raw, payload.fees_paid_till.clone())
            .await
        {
            warn!(member_id = %raw, error = %e, "Failed to update feesPaidTill after payment");
        }
    }

    Ok(Json(created))
}

/// GET /api/payments - 全部缴费记录 (按缴费时间倒序)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Payment>>> {
    let repo = PaymentRepository::new(state.get_db());
    let payments = repo.find_all().await?;
    Ok(Json(payments))
}

/// GET /api/payments/member/{memberId} - 指定会员的缴费记录
pub async fn by_member(
    State(state): State<ServerState>,
    Path(member_id): Path<String>,
) -> AppResult<Json<Vec<Payment>>> {
    let repo = PaymentRepository::new(state.get_db());
    let payments = repo.find_by_member(&member_id).await?;
    Ok(Json(payments))
}

/// GET /api/payments/stats - 缴费统计
pub async fn stats(State(state): State<ServerState>) -> AppResult<Json<PaymentStatsResponse>> {
    let repo = PaymentRepository::new(state.get_db());
    let payments = repo.find_all().await?;

    let total_amount = payments.iter().map(|p| p.amount).sum();
    let response = PaymentStatsResponse {
        total_payments: payments.len(),
        total_amount,
        monthly_stats: monthly_buckets(&payments),
    };
    Ok(Json(response))
}

/// 按年月聚合缴费，新月份在前。解析失败的日期跳过不计。
fn monthly_buckets(payments: &[Payment]) -> Vec<MonthlyStat> {
    let mut buckets: BTreeMap<(i32, u32), (usize, f64)> = BTreeMap::new();

    for payment in payments {
        let parsed = DateTime::parse_from_rfc3339(&payment.payment_date);
        let Ok(date) = parsed else {
            warn!(payment_date = %payment.payment_date, "Skipping payment with unparseable date in stats");
            continue;
        };
        let entry = buckets.entry((date.year(), date.month())).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += payment.amount;
    }

    buckets
        .into_iter()
        .rev()
        .map(|((year, month), (count, total))| MonthlyStat {
            year,
            month,
            count,
            total,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::PaymentMode;

    fn payment(date: &str, amount: f64) -> Payment {
        Payment {
            id: None,
            member_id: None,
            member_name: "Ravi".to_string(),
            member_contact: "9876543210".to_string(),
            student_name: "Ravi".to_string(),
            contact_number: "9876543210".to_string(),
            amount,
            payment_mode: PaymentMode::Cash,
            payment_provider: None,
            transaction_id: None,
            notes: None,
            payment_date: date.to_string(),
            status: PaymentStatus::Completed,
        }
    }

    #[test]
    fn buckets_group_by_month_newest_first() {
        let payments = vec![
            payment("2025-06-10T09:00:00+00:00", 500.0),
            payment("2025-06-25T09:00:00+00:00", 300.0),
            payment("2025-07-01T09:00:00+00:00", 700.0),
            payment("2024-12-31T09:00:00+00:00", 100.0),
        ];

        let stats = monthly_buckets(&payments);
        assert_eq!(
            stats,
            vec![
                MonthlyStat { year: 2025, month: 7, count: 1, total: 700.0 },
                MonthlyStat { year: 2025, month: 6, count: 2, total: 800.0 },
                MonthlyStat { year: 2024, month: 12, count: 1, total: 100.0 },
            ]
        );
    }

    #[test]
    fn buckets_skip_unparseable_dates() {
        let payments = vec![
            payment("not-a-date", 500.0),
            payment("2025-06-10T09:00:00+00:00", 300.0),
        ];

        let stats = monthly_buckets(&payments);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].count, 1);
        assert_eq!(stats[0].total, 300.0);
    }
}
