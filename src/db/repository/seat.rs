//! Seat Repository
//!
//! 座位记录键就是座位号 (seat:A1)，`seatId` 字段冗余存一份给前端排序和展示。

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::Seat;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "seat";

#[derive(Clone)]
pub struct SeatRepository {
    base: BaseRepository,
}

impl SeatRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all seats ordered by seat id
    ///
    /// 字典序排序 (A1, A10, A11, ..., A2) 是旧版前端的既定行为。
    pub async fn find_all(&self) -> RepoResult<Vec<Seat>> {
        let seats: Vec<Seat> = self
            .base
            .db()
            .query("SELECT * FROM seat ORDER BY seatId")
            .await?
            .take(0)?;
        Ok(seats)
    }

    /// Find seat by seat id ("A1")
    pub async fn find_by_seat_id(&self, seat_id: &str) -> RepoResult<Option<Seat>> {
        let thing = RecordId::from_table_key(TABLE, seat_id);
        let seat: Option<Seat> = self.base.db().select(thing).await?;
        Ok(seat)
    }

    /// Find all seats whose members array references the given member
    pub async fn find_with_member(&self, member_id: &str) -> RepoResult<Vec<Seat>> {
        let seats: Vec<Seat> = self
            .base
            .db()
            .query("SELECT * FROM seat WHERE members.memberId CONTAINS $mid")
            .bind(("mid", member_id.to_string()))
            .await?
            .take(0)?;
        Ok(seats)
    }

    /// Count all seats
    pub async fn count(&self) -> RepoResult<u64> {
        #[derive(serde::Deserialize)]
        struct CountRow {
            count: u64,
        }
        let rows: Vec<CountRow> = self
            .base
            .db()
            .query("SELECT count() AS count FROM seat GROUP ALL")
            .await?
            .take(0)?;
        Ok(rows.first().map(|r| r.count).unwrap_or(0))
    }

    /// Create a vacant seat with its seat id as record key
    pub async fn create_vacant(&self, seat: &Seat) -> RepoResult<()> {
        self.base
            .db()
            .query(
                "CREATE type::thing('seat', $code) SET seatId = $code, row = $row, \
                 number = $number, isOccupied = false, members = []",
            )
            .bind(("code", seat.seat_id.clone()))
            .bind(("row", seat.row.clone()))
            .bind(("number", seat.number))
            .await?
            .check()?;
        Ok(())
    }

    /// Persist occupancy state (members array plus legacy shadow fields)
    pub async fn save_occupancy(&self, seat: &Seat) -> RepoResult<Seat> {
        let thing = RecordId::from_table_key(TABLE, &seat.seat_id);
        self.base
            .db()
            .query(
                "UPDATE $thing SET members = $members, isOccupied = $is_occupied, \
                 memberId = $member_id, memberName = $member_name, \
                 memberContact = $member_contact, occupiedDate = $occupied_date",
            )
            .bind(("thing", thing))
            .bind(("members", seat.members.clone()))
            .bind(("is_occupied", seat.is_occupied))
            .bind(("member_id", seat.member_id.as_ref().map(|id| id.to_string())))
            .bind(("member_name", seat.member_name.clone()))
            .bind(("member_contact", seat.member_contact.clone()))
            .bind(("occupied_date", seat.occupied_date.clone()))
            .await?;

        self.find_by_seat_id(&seat.seat_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Seat {} not found", seat.seat_id)))
    }
}
