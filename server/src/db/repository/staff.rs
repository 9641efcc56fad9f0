//! Staff Member Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::StaffMember;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "staff_member";

#[derive(Clone)]
pub struct StaffRepository {
    base: BaseRepository,
}

impl StaffRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All enabled staff members
    pub async fn find_all_active(&self) -> RepoResult<Vec<StaffMember>> {
        let staff: Vec<StaffMember> = self
            .base
            .db()
            .query("SELECT * FROM staff_member WHERE is_active = true ORDER BY name")
            .await?
            .take(0)?;
        Ok(staff)
    }

    /// Find staff member by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<StaffMember>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let member: Option<StaffMember> = self.base.db().select(thing).await?;
        Ok(member)
    }

    /// Create a new staff member
    pub async fn create(&self, member: StaffMember) -> RepoResult<StaffMember> {
        let created: Option<StaffMember> = self.base.db().create(TABLE).content(member).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create staff member".to_string()))
    }
}
