//! Member Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Member, UpdateMemberRequest};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "member";

#[derive(Clone)]
pub struct MemberRepository {
    base: BaseRepository,
}

impl MemberRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all members, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Member>> {
        let members: Vec<Member> = self
            .base
            .db()
            .query("SELECT * FROM member ORDER BY joiningDate DESC")
            .await?
            .take(0)?;
        Ok(members)
    }

    /// Find member by id ("member:abc")
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Member>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid member ID: {}", id)))?;
        let member: Option<Member> = self.base.db().select(thing).await?;
        Ok(member)
    }

    /// Find member by aadhar number
    pub async fn find_by_aadhar(&self, aadhar: &str) -> RepoResult<Option<Member>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM member WHERE aadhar = $aadhar LIMIT 1")
            .bind(("aadhar", aadhar.to_string()))
            .await?;
        let members: Vec<Member> = result.take(0)?;
        Ok(members.into_iter().next())
    }

    /// Create a new member
    pub async fn create(&self, member: Member) -> RepoResult<Member> {
        // Check duplicate aadhar before insert so callers get a clean conflict
        if self.find_by_aadhar(&member.aadhar).await?.is_some() {
            return Err(RepoError::Duplicate(
                "A member with this Aadhar number already exists".to_string(),
            ));
        }

        let created: Option<Member> = self.base.db().create(TABLE).content(member).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create member".to_string()))
    }

    /// Update a member
    pub async fn update(&self, id: &str, data: UpdateMemberRequest) -> RepoResult<Member> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid member ID: {}", id)))?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Member {} not found", id)))?;

        // Check duplicate aadhar if it is being changed
        if let Some(aadhar) = &data.aadhar
            && aadhar != &existing.aadhar
            && self.find_by_aadhar(aadhar).await?.is_some()
        {
            return Err(RepoError::Duplicate(
                "A member with this Aadhar number already exists".to_string(),
            ));
        }

        // 手动构建 UPDATE 语句，保持未提供的字段不变
        let name = data.name.unwrap_or(existing.name);
        let father_name = data.father_name.unwrap_or(existing.father_name);
        let contact = data.contact.unwrap_or(existing.contact);
        let aadhar = data.aadhar.unwrap_or(existing.aadhar);
        let address = data.address.unwrap_or(existing.address);
        let gender = data.gender.unwrap_or(existing.gender);
        let shift = data.shift.unwrap_or(existing.shift);
        let timing = data.timing.unwrap_or(existing.timing);
        let monthly_fees = data.monthly_fees.or(existing.monthly_fees);
        let fees_paid_till = data.fees_paid_till.or(existing.fees_paid_till);
        let payment_mode = data.payment_mode.or(existing.payment_mode);
        let profile_picture = data.profile_picture.or(existing.profile_picture);
        // 空字符串表示取消座位指针
        let seat = match data.seat {
            Some(s) if s.trim().is_empty() => None,
            Some(s) => Some(s),
            None => existing.seat,
        };

        self.base
            .db()
            .query(
                "UPDATE $thing SET name = $name, fatherName = $father_name, \
                 contact = $contact, aadhar = $aadhar, address = $address, \
                 gender = $gender, shift = $shift, timing = $timing, \
                 monthlyFees = $monthly_fees, feesPaidTill = $fees_paid_till, \
                 paymentMode = $payment_mode, profilePicture = $profile_picture, \
                 seat = $seat",
            )
            .bind(("thing", thing))
            .bind(("name", name))
            .bind(("father_name", father_name))
            .bind(("contact", contact))
            .bind(("aadhar", aadhar))
            .bind(("address", address))
            .bind(("gender", gender))
            .bind(("shift", shift))
            .bind(("timing", timing))
            .bind(("monthly_fees", monthly_fees))
            .bind(("fees_paid_till", fees_paid_till))
            .bind(("payment_mode", payment_mode))
            .bind(("profile_picture", profile_picture))
            .bind(("seat", seat))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Member {} not found", id)))
    }

    /// Update only the seat pointer
    ///
    /// 座位分配/释放后的指针维护，失败由调用方决定是否忽略。
    pub async fn update_seat(&self, id: &str, seat: Option<String>) -> RepoResult<()> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid member ID: {}", id)))?;
        self.base
            .db()
            .query("UPDATE $thing SET seat = $seat")
            .bind(("thing", thing))
            .bind(("seat", seat))
            .await?;
        Ok(())
    }

    /// Update only the feesPaidTill date
    pub async fn update_fees_paid_till(&self, id: &str, date: Option<String>) -> RepoResult<()> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid member ID: {}", id)))?;
        self.base
            .db()
            .query("UPDATE $thing SET feesPaidTill = $date")
            .bind(("thing", thing))
            .bind(("date", date))
            .await?;
        Ok(())
    }

    /// Hard delete a member
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid member ID: {}", id)))?;
        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}
