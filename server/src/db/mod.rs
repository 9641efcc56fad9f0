//! Database Module
//!
//! Embedded SurrealDB storage (RocksDB backend).

pub mod models;
pub mod repository;
pub mod seed;

use crate::utils::AppError;
use std::path::Path;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

const NAMESPACE: &str = "encore";
const DATABASE: &str = "venue";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the embedded database under the given directory
    pub async fn new(db_dir: &Path) -> Result<Self, AppError> {
        std::fs::create_dir_all(db_dir)
            .map_err(|e| AppError::Database(format!("Failed to create database dir: {e}")))?;

        let path = db_dir.join("encore.db");
        let db = Surreal::new::<RocksDb>(path.to_string_lossy().as_ref())
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database: {e}")))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::Database(format!("Failed to select namespace: {e}")))?;

        tracing::info!(path = %path.display(), "Database connection established");

        Ok(Self { db })
    }
}
