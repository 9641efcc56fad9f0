//! Pricing Configuration Repository
//!
//! Tiers, extension options, add-on catalog and offers form one
//! configuration aggregate consumed together by the pricing engine.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Extra, ExtraHoursOption, Offer, PricingTier};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::RecordId;

const TIER_TABLE: &str = "pricing_tier";
const HOURS_TABLE: &str = "extra_hours_option";
const EXTRA_TABLE: &str = "extra";
const OFFER_TABLE: &str = "offer";

#[derive(Clone)]
pub struct PricingRepository {
    base: BaseRepository,
}

impl PricingRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All guest-count tiers, ascending
    pub async fn find_tiers(&self) -> RepoResult<Vec<PricingTier>> {
        let tiers: Vec<PricingTier> = self
            .base
            .db()
            .query("SELECT * FROM pricing_tier ORDER BY min_guests")
            .await?
            .take(0)?;
        Ok(tiers)
    }

    /// All session-extension options, ascending by hours
    pub async fn find_extra_hours_options(&self) -> RepoResult<Vec<ExtraHoursOption>> {
        let options: Vec<ExtraHoursOption> = self
            .base
            .db()
            .query("SELECT * FROM extra_hours_option ORDER BY hours")
            .await?
            .take(0)?;
        Ok(options)
    }

    /// All enabled offers
    pub async fn find_enabled_offers(&self) -> RepoResult<Vec<Offer>> {
        let offers: Vec<Offer> = self
            .base
            .db()
            .query("SELECT * FROM offer WHERE enabled = true")
            .await?
            .take(0)?;
        Ok(offers)
    }

    /// Look up one catalog extra by id
    pub async fn find_extra_by_id(&self, id: &str) -> RepoResult<Option<Extra>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let extra: Option<Extra> = self.base.db().select(thing).await?;
        Ok(extra)
    }

    /// Create a pricing tier
    pub async fn create_tier(&self, tier: PricingTier) -> RepoResult<PricingTier> {
        let created: Option<PricingTier> = self.base.db().create(TIER_TABLE).content(tier).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create pricing tier".to_string()))
    }

    /// Create an extension option
    pub async fn create_extra_hours_option(
        &self,
        option: ExtraHoursOption,
    ) -> RepoResult<ExtraHoursOption> {
        let created: Option<ExtraHoursOption> =
            self.base.db().create(HOURS_TABLE).content(option).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create extension option".to_string()))
    }

    /// Create a catalog extra
    pub async fn create_extra(&self, extra: Extra) -> RepoResult<Extra> {
        let created: Option<Extra> = self.base.db().create(EXTRA_TABLE).content(extra).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create extra".to_string()))
    }

    /// Create an offer
    pub async fn create_offer(&self, offer: Offer) -> RepoResult<Offer> {
        let created: Option<Offer> = self.base.db().create(OFFER_TABLE).content(offer).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create offer".to_string()))
    }

    /// Update a catalog extra's price (admin path; historical bookings keep
    /// their snapshot prices)
    pub async fn update_extra_price(&self, id: &RecordId, price: i64) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $thing SET price = $price")
            .bind(("thing", id.clone()))
            .bind(("price", price))
            .await?;
        Ok(())
    }
}
