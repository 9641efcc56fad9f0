//! Operating Hours Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{OperatingWindow, SpecialHours};
use chrono::NaiveDate;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const WINDOW_TABLE: &str = "operating_window";
const SPECIAL_TABLE: &str = "special_hours";

#[derive(Clone)]
pub struct HoursRepository {
    base: BaseRepository,
}

impl HoursRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All weekly windows (one per configured weekday)
    pub async fn find_weekly(&self) -> RepoResult<Vec<OperatingWindow>> {
        let windows: Vec<OperatingWindow> = self
            .base
            .db()
            .query("SELECT * FROM operating_window ORDER BY day_of_week")
            .await?
            .take(0)?;
        Ok(windows)
    }

    /// Date-specific override, if one exists
    pub async fn find_special(&self, date: NaiveDate) -> RepoResult<Option<SpecialHours>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM special_hours WHERE date = $date LIMIT 1")
            .bind(("date", date))
            .await?;
        let rows: Vec<SpecialHours> = result.take(0)?;
        Ok(rows.into_iter().next())
    }

    /// Create a weekly window
    pub async fn create_window(&self, window: OperatingWindow) -> RepoResult<OperatingWindow> {
        let created: Option<OperatingWindow> =
            self.base.db().create(WINDOW_TABLE).content(window).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create operating window".to_string()))
    }

    /// Create a date override
    pub async fn create_special(&self, special: SpecialHours) -> RepoResult<SpecialHours> {
        let created: Option<SpecialHours> =
            self.base.db().create(SPECIAL_TABLE).content(special).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create special hours".to_string()))
    }
}
