//! Promo Code Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::PromoCode;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::RecordId;

const TABLE: &str = "promo_code";

#[derive(Clone)]
pub struct PromoRepository {
    base: BaseRepository,
}

impl PromoRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Case-insensitive lookup by code
    pub async fn find_by_code(&self, code: &str) -> RepoResult<Option<PromoCode>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM promo_code \
                 WHERE string::lowercase(code) = string::lowercase($code) LIMIT 1",
            )
            .bind(("code", code.to_string()))
            .await?;
        let rows: Vec<PromoCode> = result.take(0)?;
        Ok(rows.into_iter().next())
    }

    /// Bump the usage counter (called on confirmation)
    pub async fn increment_uses(&self, id: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $thing SET uses += 1")
            .bind(("thing", id.clone()))
            .await?;
        Ok(())
    }

    /// Create a promo code
    pub async fn create(&self, promo: PromoCode) -> RepoResult<PromoCode> {
        if self.find_by_code(&promo.code).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Promo code '{}' already exists",
                promo.code
            )));
        }
        let created: Option<PromoCode> = self.base.db().create(TABLE).content(promo).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create promo code".to_string()))
    }
}
