//! Venue Settings Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::VenueSettings;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "venue_settings";

#[derive(Clone)]
pub struct SettingsRepository {
    base: BaseRepository,
}

impl SettingsRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Fetch the singleton settings record, creating defaults if missing
    pub async fn get_or_create(&self) -> RepoResult<VenueSettings> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM venue_settings LIMIT 1")
            .await?;
        let rows: Vec<VenueSettings> = result.take(0)?;
        if let Some(settings) = rows.into_iter().next() {
            return Ok(settings);
        }

        tracing::info!("No venue settings found, creating defaults");
        let created: Option<VenueSettings> = self
            .base
            .db()
            .create(TABLE)
            .content(VenueSettings::default())
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create venue settings".to_string()))
    }

    /// Replace the settings record
    pub async fn save(&self, settings: VenueSettings) -> RepoResult<VenueSettings> {
        let existing = self.get_or_create().await?;
        let id = existing
            .id
            .ok_or_else(|| RepoError::Database("Settings record has no id".to_string()))?;
        let mut to_store = settings;
        to_store.id = None;
        let updated: Option<VenueSettings> =
            self.base.db().update(id).content(to_store).await?;
        updated.ok_or_else(|| RepoError::Database("Failed to update venue settings".to_string()))
    }
}
