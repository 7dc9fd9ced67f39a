//! Repository Module
//!
//! One repository per table, all sharing the embedded SurrealDB handle.

pub mod admin;
pub mod member;
pub mod payment;
pub mod seat;

// Re-exports
pub use admin::AdminRepository;
pub use member::MemberRepository;
pub use payment::PaymentRepository;
pub use seat::SeatRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

use crate::utils::AppError;

/// Errors surfaced by the repository layer
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Shorthand result for repository calls
pub type RepoResult<T> = Result<T, RepoError>;

// ID 约定：HTTP 层和存储层都用 "table:key" 字符串，仓库内部解析成
// surrealdb::RecordId 后直接传给 select/update/delete。
// 座位表的记录键就是座位号 (seat:A1)，同时以 seatId 字段对外暴露。

/// Shared database handle the table repositories wrap
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
