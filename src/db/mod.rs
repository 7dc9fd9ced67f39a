//! Database Module
//!
//! Handles the embedded SurrealDB instance and schema definitions

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

/// Database service owning the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the RocksDB-backed database and apply schema definitions
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns("library")
            .use_db("library")
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        tracing::info!("Database connection established (SurrealDB RocksDB)");

        let service = Self { db };
        service.define_schema().await?;
        tracing::info!("Database schema definitions applied");

        Ok(service)
    }

    /// Apply table and index definitions
    ///
    /// 全部 IF NOT EXISTS，重复启动安全。
    async fn define_schema(&self) -> Result<(), AppError> {
        self.db
            .query(
                "
                DEFINE TABLE IF NOT EXISTS seat SCHEMALESS;
                DEFINE INDEX IF NOT EXISTS seat_seat_id ON TABLE seat FIELDS seatId UNIQUE;

                DEFINE TABLE IF NOT EXISTS member SCHEMALESS;
                DEFINE INDEX IF NOT EXISTS member_aadhar ON TABLE member FIELDS aadhar UNIQUE;

                DEFINE TABLE IF NOT EXISTS payment SCHEMALESS;
                DEFINE INDEX IF NOT EXISTS payment_member ON TABLE payment FIELDS memberId;

                DEFINE TABLE IF NOT EXISTS admin SCHEMALESS;
                DEFINE INDEX IF NOT EXISTS admin_email ON TABLE admin FIELDS email UNIQUE;
                ",
            )
            .await
            .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?
            .check()
            .map_err(|e| AppError::database(format!("Schema definition rejected: {e}")))?;
        Ok(())
    }
}
