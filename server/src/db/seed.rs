//! Default venue configuration
//!
//! Seeds the settings singleton, the base tier table and the extension
//! options on first boot so a fresh install can quote prices immediately.
//! Never touches tables that already hold data.

use super::models::{ExtraHoursOption, PricingTier};
use super::repository::{PricingRepository, RepoResult, SettingsRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// Default guest-count tiers: partition [8, 100] with no gaps
const DEFAULT_TIERS: &[(i32, i32, i64)] = &[
    (8, 12, 152),
    (13, 20, 220),
    (21, 35, 340),
    (36, 60, 480),
    (61, 100, 700),
];

/// Default extension add-ons (hours, price)
const DEFAULT_EXTRA_HOURS: &[(i32, i64)] = &[(0, 0), (1, 30), (2, 55), (3, 75), (4, 90)];

/// Ensure the minimum pricing configuration exists
pub async fn seed_defaults(db: &Surreal<Db>) -> RepoResult<()> {
    let settings = SettingsRepository::new(db.clone());
    settings.get_or_create().await?;

    let pricing = PricingRepository::new(db.clone());

    if pricing.find_tiers().await?.is_empty() {
        for &(min_guests, max_guests, price) in DEFAULT_TIERS {
            pricing
                .create_tier(PricingTier {
                    id: None,
                    min_guests,
                    max_guests,
                    price,
                })
                .await?;
        }
        tracing::info!(tiers = DEFAULT_TIERS.len(), "Seeded default pricing tiers");
    }

    if pricing.find_extra_hours_options().await?.is_empty() {
        for &(hours, price) in DEFAULT_EXTRA_HOURS {
            pricing
                .create_extra_hours_option(ExtraHoursOption {
                    id: None,
                    hours,
                    price,
                })
                .await?;
        }
        tracing::info!(
            options = DEFAULT_EXTRA_HOURS.len(),
            "Seeded default extension options"
        );
    }

    Ok(())
}
