//! Seat allocation integration tests against an embedded RocksDB instance
//! Run: cargo test --test seat_allocation

use library_server::db::DbService;
use library_server::db::models::{
    AssignSeatRequest, Gender, Member, Shift, VacateSeatRequest,
};
use library_server::db::repository::{MemberRepository, SeatRepository};
use library_server::seating::SeatAllocator;
use library_server::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

async fn test_db() -> (tempfile::TempDir, Surreal<Db>) {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = tmp.path().join("library.db");
    let service = DbService::new(&db_path.to_string_lossy()).await.unwrap();
    (tmp, service.db)
}

fn member(name: &str, aadhar: &str, shift: Shift) -> Member {
    Member {
        id: None,
        name: name.to_string(),
        father_name: "Father".to_string(),
        contact: "9876543210".to_string(),
        aadhar: aadhar.to_string(),
        address: "12 Library Road".to_string(),
        gender: Gender::Male,
        shift,
        timing: "6 Months".to_string(),
        monthly_fees: Some(500.0),
        joining_date: "2025-01-01T00:00:00+00:00".to_string(),
        fees_paid_till: None,
        payment_mode: None,
        profile_picture: None,
        seat: None,
    }
}

fn assign_request(seat_id: &str, member_id: Option<String>, name: &str, shift: Shift) -> AssignSeatRequest {
    AssignSeatRequest {
        seat_id: seat_id.to_string(),
        member_id,
        member_name: name.to_string(),
        member_contact: "9876543210".to_string(),
        shift,
        custom_start_time: None,
        custom_end_time: None,
    }
}

#[tokio::test]
async fn initialization_creates_full_seat_grid_once() {
    let (_tmp, db) = test_db().await;
    let allocator = SeatAllocator::new(db.clone());
    let seats = SeatRepository::new(db.clone());

    allocator.ensure_initialized().await.unwrap();
    assert_eq!(seats.count().await.unwrap(), 90);

    let a1 = seats.find_by_seat_id("A1").await.unwrap().unwrap();
    assert_eq!(a1.row, "A");
    assert_eq!(a1.number, 1);
    assert!(!a1.is_occupied);
    assert!(a1.members.is_empty());

    let c30 = seats.find_by_seat_id("C30").await.unwrap().unwrap();
    assert_eq!(c30.row, "C");
    assert_eq!(c30.number, 30);

    // Second call must not duplicate or reset anything
    allocator.ensure_initialized().await.unwrap();
    assert_eq!(seats.count().await.unwrap(), 90);
}

#[tokio::test]
async fn assign_updates_seat_and_member_pointer() {
    let (_tmp, db) = test_db().await;
    let allocator = SeatAllocator::new(db.clone());
    let members = MemberRepository::new(db.clone());
    allocator.ensure_initialized().await.unwrap();

    let created = members
        .create(member("Asha Sharma", "1234-5678-9012", Shift::FullDay))
        .await
        .unwrap();
    let member_id = created.id.as_ref().unwrap().to_string();

    let (seat, member_updated) = allocator
        .assign(assign_request(
            "A1",
            Some(member_id.clone()),
            "Asha Sharma",
            Shift::FullDay,
        ))
        .await
        .unwrap();

    assert!(member_updated);
    assert!(seat.is_occupied);
    assert_eq!(seat.members.len(), 1);
    assert_eq!(seat.members[0].member_name, "Asha Sharma");
    // Shadow fields mirror members[0]
    assert_eq!(seat.member_name.as_deref(), Some("Asha Sharma"));
    assert_eq!(
        seat.member_id.as_ref().map(|id| id.to_string()),
        Some(member_id.clone())
    );

    let refreshed = members.find_by_id(&member_id).await.unwrap().unwrap();
    assert_eq!(refreshed.seat.as_deref(), Some("A1"));
}

#[tokio::test]
async fn half_day_shifts_share_a_seat_but_full_day_conflicts() {
    let (_tmp, db) = test_db().await;
    let allocator = SeatAllocator::new(db.clone());
    allocator.ensure_initialized().await.unwrap();

    allocator
        .assign(assign_request("B5", None, "Morning Person", Shift::HalfDayMorning))
        .await
        .unwrap();

    let (seat, _) = allocator
        .assign(assign_request("B5", None, "Evening Person", Shift::HalfDayEvening))
        .await
        .unwrap();
    assert_eq!(seat.members.len(), 2);
    // First occupant still drives the shadow fields
    assert_eq!(seat.member_name.as_deref(), Some("Morning Person"));

    let err = allocator
        .assign(assign_request("B5", None, "Greedy Person", Shift::FullDay))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)), "got {err:?}");
}

#[tokio::test]
async fn same_member_cannot_occupy_one_seat_twice() {
    let (_tmp, db) = test_db().await;
    let allocator = SeatAllocator::new(db.clone());
    let members = MemberRepository::new(db.clone());
    allocator.ensure_initialized().await.unwrap();

    let created = members
        .create(member("Ravi Kumar", "2222-3333-4444", Shift::HalfDayMorning))
        .await
        .unwrap();
    let member_id = created.id.as_ref().unwrap().to_string();

    allocator
        .assign(assign_request(
            "C7",
            Some(member_id.clone()),
            "Ravi Kumar",
            Shift::HalfDayMorning,
        ))
        .await
        .unwrap();

    let err = allocator
        .assign(assign_request(
            "C7",
            Some(member_id),
            "Ravi Kumar",
            Shift::HalfDayEvening,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");
}

#[tokio::test]
async fn custom_shift_requires_valid_times_and_checks_overlap() {
    let (_tmp, db) = test_db().await;
    let allocator = SeatAllocator::new(db.clone());
    allocator.ensure_initialized().await.unwrap();

    // Missing custom times is a validation error
    let err = allocator
        .assign(assign_request("A9", None, "No Times", Shift::Custom))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");

    let mut with_times = assign_request("A9", None, "Morning Custom", Shift::Custom);
    with_times.custom_start_time = Some("09:00".to_string());
    with_times.custom_end_time = Some("11:00".to_string());
    allocator.assign(with_times).await.unwrap();

    // A second custom slot never shares the seat, even without overlap
    let mut later = assign_request("A9", None, "Afternoon Custom", Shift::Custom);
    later.custom_start_time = Some("15:00".to_string());
    later.custom_end_time = Some("17:00".to_string());
    let err = allocator.assign(later).await.unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)), "got {err:?}");

    // A morning half-day overlaps 09:00-11:00
    let err = allocator
        .assign(assign_request("A9", None, "Half Day", Shift::HalfDayMorning))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)), "got {err:?}");

    // The evening half-day starts at 14:00 and fits
    let (seat, _) = allocator
        .assign(assign_request("A9", None, "Evening Half", Shift::HalfDayEvening))
        .await
        .unwrap();
    assert_eq!(seat.members.len(), 2);
}

#[tokio::test]
async fn vacate_by_member_removes_only_that_occupancy() {
    let (_tmp, db) = test_db().await;
    let allocator = SeatAllocator::new(db.clone());
    let members = MemberRepository::new(db.clone());
    allocator.ensure_initialized().await.unwrap();

    let morning = members
        .create(member("Morning Person", "1111-0000-1111", Shift::HalfDayMorning))
        .await
        .unwrap();
    let morning_id = morning.id.as_ref().unwrap().to_string();
    let evening = members
        .create(member("Evening Person", "2222-0000-2222", Shift::HalfDayEvening))
        .await
        .unwrap();
    let evening_id = evening.id.as_ref().unwrap().to_string();

    allocator
        .assign(assign_request(
            "B12",
            Some(morning_id.clone()),
            "Morning Person",
            Shift::HalfDayMorning,
        ))
        .await
        .unwrap();
    allocator
        .assign(assign_request(
            "B12",
            Some(evening_id.clone()),
            "Evening Person",
            Shift::HalfDayEvening,
        ))
        .await
        .unwrap();

    let (seat, member_updated) = allocator
        .vacate(VacateSeatRequest {
            seat_id: "B12".to_string(),
            member_id: Some(morning_id.clone()),
        })
        .await
        .unwrap();

    assert!(member_updated);
    assert_eq!(seat.members.len(), 1);
    assert_eq!(seat.members[0].member_name, "Evening Person");
    assert!(seat.is_occupied);
    // Shadow fields now mirror the remaining occupant
    assert_eq!(seat.member_name.as_deref(), Some("Evening Person"));

    let refreshed = members.find_by_id(&morning_id).await.unwrap().unwrap();
    assert!(refreshed.seat.is_none());
    let untouched = members.find_by_id(&evening_id).await.unwrap().unwrap();
    assert_eq!(untouched.seat.as_deref(), Some("B12"));
}

#[tokio::test]
async fn vacate_without_member_rejects_shared_seats() {
    let (_tmp, db) = test_db().await;
    let allocator = SeatAllocator::new(db.clone());
    allocator.ensure_initialized().await.unwrap();

    allocator
        .assign(assign_request("C20", None, "Morning Person", Shift::HalfDayMorning))
        .await
        .unwrap();
    allocator
        .assign(assign_request("C20", None, "Evening Person", Shift::HalfDayEvening))
        .await
        .unwrap();

    let err = allocator
        .vacate(VacateSeatRequest {
            seat_id: "C20".to_string(),
            member_id: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");
}

#[tokio::test]
async fn vacate_single_occupant_without_member_id() {
    let (_tmp, db) = test_db().await;
    let allocator = SeatAllocator::new(db.clone());
    allocator.ensure_initialized().await.unwrap();

    allocator
        .assign(assign_request("A3", None, "Solo Person", Shift::FullDay))
        .await
        .unwrap();

    let (seat, _) = allocator
        .vacate(VacateSeatRequest {
            seat_id: "A3".to_string(),
            member_id: None,
        })
        .await
        .unwrap();

    assert!(!seat.is_occupied);
    assert!(seat.members.is_empty());
    assert!(seat.member_name.is_none());
    assert!(seat.member_id.is_none());
}

#[tokio::test]
async fn available_seats_respect_shift_windows() {
    let (_tmp, db) = test_db().await;
    let allocator = SeatAllocator::new(db.clone());
    allocator.ensure_initialized().await.unwrap();

    allocator
        .assign(assign_request("A1", None, "Full Day Person", Shift::FullDay))
        .await
        .unwrap();
    allocator
        .assign(assign_request("A2", None, "Morning Person", Shift::HalfDayMorning))
        .await
        .unwrap();

    let morning = allocator
        .list_available(Shift::HalfDayMorning, None, None)
        .await
        .unwrap();
    let morning_ids: Vec<&str> = morning.iter().map(|s| s.seat_id.as_str()).collect();
    assert!(!morning_ids.contains(&"A1"), "full-day seat must be excluded");
    assert!(!morning_ids.contains(&"A2"), "same-shift seat must be excluded");
    assert!(morning_ids.contains(&"A3"));
    assert_eq!(morning.len(), 88);

    // The evening window shares A2 with the morning occupant
    let evening = allocator
        .list_available(Shift::HalfDayEvening, None, None)
        .await
        .unwrap();
    let evening_ids: Vec<&str> = evening.iter().map(|s| s.seat_id.as_str()).collect();
    assert!(!evening_ids.contains(&"A1"));
    assert!(evening_ids.contains(&"A2"));
    assert_eq!(evening.len(), 89);

    // Custom probe 06:00-07:30 clears everything except the full-day seat
    let custom = allocator
        .list_available(
            Shift::Custom,
            Some("06:00".to_string()),
            Some("07:30".to_string()),
        )
        .await
        .unwrap();
    assert_eq!(custom.len(), 89);

    let missing_seat = allocator.get("Z99").await.unwrap_err();
    assert!(matches!(missing_seat, AppError::NotFound(_)));
}
