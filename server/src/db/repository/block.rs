//! Maintenance Block Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{RecurringBlock, RoomBlock};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const BLOCK_TABLE: &str = "room_block";
const RECURRING_TABLE: &str = "recurring_block";

#[derive(Clone)]
pub struct BlockRepository {
    base: BaseRepository,
}

impl BlockRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// One-off blocks intersecting [start, end), any room
    pub async fn find_in_range(&self, start: i64, end: i64) -> RepoResult<Vec<RoomBlock>> {
        let blocks: Vec<RoomBlock> = self
            .base
            .db()
            .query("SELECT * FROM room_block WHERE start_at < $end AND end_at > $start")
            .bind(("start", start))
            .bind(("end", end))
            .await?
            .take(0)?;
        Ok(blocks)
    }

    /// All enabled recurring blocks
    pub async fn find_recurring_enabled(&self) -> RepoResult<Vec<RecurringBlock>> {
        let blocks: Vec<RecurringBlock> = self
            .base
            .db()
            .query("SELECT * FROM recurring_block WHERE enabled = true")
            .await?
            .take(0)?;
        Ok(blocks)
    }

    /// Create a one-off block
    pub async fn create(&self, block: RoomBlock) -> RepoResult<RoomBlock> {
        let created: Option<RoomBlock> = self.base.db().create(BLOCK_TABLE).content(block).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create room block".to_string()))
    }

    /// Create a recurring block
    pub async fn create_recurring(&self, block: RecurringBlock) -> RepoResult<RecurringBlock> {
        let created: Option<RecurringBlock> = self
            .base
            .db()
            .create(RECURRING_TABLE)
            .content(block)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create recurring block".to_string()))
    }
}
