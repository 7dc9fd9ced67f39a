//! Payment Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::Payment;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "payment";

#[derive(Clone)]
pub struct PaymentRepository {
    base: BaseRepository,
}

impl PaymentRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all payments, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Payment>> {
        let payments: Vec<Payment> = self
            .base
            .db()
            .query("SELECT * FROM payment ORDER BY paymentDate DESC")
            .await?
            .take(0)?;
        Ok(payments)
    }

    /// Find payments for a member, newest first
    pub async fn find_by_member(&self, member_id: &str) -> RepoResult<Vec<Payment>> {
        let payments: Vec<Payment> = self
            .base
            .db()
            .query("SELECT * FROM payment WHERE memberId = $mid ORDER BY paymentDate DESC")
            .bind(("mid", member_id.to_string()))
            .await?
            .take(0)?;
        Ok(payments)
    }

    /// Create a payment record
    pub async fn create(&self, payment: Payment) -> RepoResult<Payment> {
        let created: Option<Payment> = self.base.db().create(TABLE).content(payment).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create payment".to_string()))
    }

    /// Delete every payment that references the member by id, name or contact
    ///
    /// 手工录入的缴费没有 memberId，只能靠姓名/电话兜底匹配。
    /// Returns the number of deleted records.
    pub async fn delete_for_member(
        &self,
        member_id: &str,
        member_name: &str,
        member_contact: &str,
    ) -> RepoResult<usize> {
        let deleted: Vec<Payment> = self
            .base
            .db()
            .query(
                "DELETE payment WHERE memberId = $mid OR memberName = $name \
                 OR memberContact = $contact RETURN BEFORE",
            )
            .bind(("mid", member_id.to_string()))
            .bind(("name", member_name.to_string()))
            .bind(("contact", member_contact.to_string()))
            .await?
            .take(0)?;
        Ok(deleted.len())
    }
}
