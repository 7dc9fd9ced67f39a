//! Admin Repository
//!
//! 密码哈希带 `skip_serializing`，不能走 content() 创建，
//! 必须用显式绑定的 CREATE 语句。

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::Admin;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct AdminRepository {
    base: BaseRepository,
}

impl AdminRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find admin by email
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<Admin>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM admin WHERE email = $email LIMIT 1")
            .bind(("email", email.to_lowercase()))
            .await?;
        let admins: Vec<Admin> = result.take(0)?;
        Ok(admins.into_iter().next())
    }

    /// Find admin by id ("admin:abc")
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Admin>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid admin ID: {}", id)))?;
        let admin: Option<Admin> = self.base.db().select(thing).await?;
        Ok(admin)
    }

    /// Count all admins
    pub async fn count(&self) -> RepoResult<u64> {
        #[derive(serde::Deserialize)]
        struct CountRow {
            count: u64,
        }
        let rows: Vec<CountRow> = self
            .base
            .db()
            .query("SELECT count() AS count FROM admin GROUP ALL")
            .await?
            .take(0)?;
        Ok(rows.first().map(|r| r.count).unwrap_or(0))
    }

    /// Create an admin account
    pub async fn create(&self, admin: &Admin) -> RepoResult<Admin> {
        if self.find_by_email(&admin.email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Admin with email '{}' already exists",
                admin.email
            )));
        }

        let mut result = self
            .base
            .db()
            .query(
                "CREATE admin SET name = $name, email = $email, password = $password, \
                 role = $role, isActive = $is_active",
            )
            .bind(("name", admin.name.clone()))
            .bind(("email", admin.email.to_lowercase()))
            .bind(("password", admin.password.clone()))
            .bind(("role", admin.role))
            .bind(("is_active", admin.is_active))
            .await?;
        let created: Vec<Admin> = result.take(0)?;
        created
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to create admin".to_string()))
    }
}
