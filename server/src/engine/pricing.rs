//! Pricing Engine
//!
//! Deterministic, auditable price computation. The quote shown while
//! browsing and the breakdown persisted on a booking go through exactly the
//! same function, so they can never drift apart.
//!
//! Discount composition is price-determining and fixed:
//! midweek → promo → offer-percent → offer-fixed, each stage clamped at 0.
//! All percentage math runs through `Decimal` and rounds half-away-from-zero
//! to whole currency units.

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::prelude::*;

use crate::db::models::{
    Extra, ExtraHoursOption, ExtraLine, Offer, OfferKind, PricingMode, PricingTier, PromoCode,
    VenueSettings,
};

/// Venue pricing configuration, loaded per request
pub struct PricingContext<'a> {
    pub tiers: &'a [PricingTier],
    pub extra_hours_options: &'a [ExtraHoursOption],
    pub offers: &'a [Offer],
    pub settings: &'a VenueSettings,
}

/// Inputs for one quote
pub struct QuoteInputs<'a> {
    /// Session date (drives the midweek discount)
    pub date: NaiveDate,
    /// Today in the venue timezone (drives promo validity)
    pub today: NaiveDate,
    pub guests: i32,
    pub extra_hours: i32,
    pub promo: Option<&'a PromoCode>,
}

/// Session price breakdown (extras items are totalled separately)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceBreakdown {
    pub base_price: i64,
    pub extra_hours_price: i64,
    /// Midweek + offer amounts actually subtracted
    pub discount_amount: i64,
    /// Promo amount actually subtracted
    pub promo_discount_amount: i64,
    /// Code that was applied, if any survived validation
    pub applied_promo: Option<String>,
    /// Session total: base + extension − all discounts, floored at 0
    pub total_price: i64,
}

/// Round `amount × percent / 100` to whole currency units, half away from zero
fn percent_of(amount: i64, percent: i64) -> i64 {
    (Decimal::from(amount) * Decimal::from(percent) / Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}

/// Monday-Wednesday sessions qualify for the midweek discount
pub fn is_midweek(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Mon | Weekday::Tue | Weekday::Wed)
}

/// Whether a promo code passes every validity predicate.
///
/// A failing code is treated as absent; checkout proceeds at full price.
pub fn promo_applicable(promo: &PromoCode, today: NaiveDate, guests: i32) -> bool {
    if !promo.enabled {
        return false;
    }
    if today < promo.start_date || today > promo.end_date {
        return false;
    }
    if let Some(min_guests) = promo.min_guests
        && guests < min_guests
    {
        return false;
    }
    if let Some(max_uses) = promo.max_uses
        && promo.uses >= max_uses
    {
        return false;
    }
    true
}

/// Compute the session price breakdown in the fixed discount order
pub fn compute_quote(ctx: &PricingContext, input: &QuoteInputs) -> PriceBreakdown {
    // 1. Tier lookup; guest counts are pre-validated at the boundary
    let base_price = ctx
        .tiers
        .iter()
        .find(|t| input.guests >= t.min_guests && input.guests <= t.max_guests)
        .map(|t| t.price)
        .unwrap_or(0);

    // 2. Extension flat add-on
    let extra_hours_price = ctx
        .extra_hours_options
        .iter()
        .find(|o| o.hours == input.extra_hours)
        .map(|o| o.price)
        .unwrap_or(0);

    let mut running = base_price + extra_hours_price;
    let mut discount_amount = 0i64;

    // 3. Midweek: the larger of the venue percent and any MIDWEEK offer
    if is_midweek(input.date) {
        let offer_percent = ctx
            .offers
            .iter()
            .filter(|o| o.enabled && o.kind == OfferKind::Midweek)
            .map(|o| o.value)
            .max()
            .unwrap_or(0);
        let percent = ctx.settings.midweek_discount_percent.max(offer_percent);
        if percent > 0 {
            let amount = percent_of(running, percent).clamp(0, running);
            running -= amount;
            discount_amount += amount;
        }
    }

    // 4. Promo: percent is computed against base + extension − midweek;
    //    percent wins when a code somehow carries both
    let mut promo_discount_amount = 0i64;
    let mut applied_promo = None;
    if let Some(promo) = input.promo
        && promo_applicable(promo, input.today, input.guests)
    {
        let amount = if let Some(percent) = promo.percent_off {
            percent_of(running, percent)
        } else {
            promo.fixed_off.unwrap_or(0)
        };
        let amount = amount.clamp(0, running);
        running -= amount;
        promo_discount_amount = amount;
        applied_promo = Some(promo.code.clone());
    }

    // 5. Generic offers: single largest percent, then all fixed values summed
    let offer_percent = ctx
        .offers
        .iter()
        .filter(|o| o.enabled && o.kind == OfferKind::Percent)
        .map(|o| o.value)
        .max()
        .unwrap_or(0);
    if offer_percent > 0 {
        let amount = percent_of(running, offer_percent).clamp(0, running);
        running -= amount;
        discount_amount += amount;
    }

    let offer_fixed: i64 = ctx
        .offers
        .iter()
        .filter(|o| o.enabled && o.kind == OfferKind::Fixed)
        .map(|o| o.value)
        .sum();
    if offer_fixed > 0 {
        let amount = offer_fixed.clamp(0, running);
        running -= amount;
        discount_amount += amount;
    }

    PriceBreakdown {
        base_price,
        extra_hours_price,
        discount_amount,
        promo_discount_amount,
        applied_promo,
        total_price: running,
    }
}

/// Price a selection of add-on items against the catalog.
///
/// Flat items contribute `price × quantity`, per-guest items
/// `price × guests × quantity`. Discounts never apply here. The returned
/// lines are the immutable snapshot persisted on the booking.
pub fn extras_lines(selections: &[(Extra, i32)], guests: i32) -> (Vec<ExtraLine>, i64) {
    let mut lines = Vec::with_capacity(selections.len());
    let mut total = 0i64;

    for (extra, quantity) in selections {
        let Some(id) = extra.id.clone() else {
            continue;
        };
        let quantity = (*quantity).max(0);
        let line_total = match extra.pricing_mode {
            PricingMode::Flat => extra.price * quantity as i64,
            PricingMode::PerGuest => extra.price * guests as i64 * quantity as i64,
        };
        total += line_total;
        lines.push(ExtraLine {
            extra: id,
            name: extra.name.clone(),
            unit_price: extra.price,
            pricing_mode: extra.pricing_mode,
            quantity,
            line_total,
        });
    }

    (lines, total)
}

/// Portion of the total due immediately to reach CONFIRMED
pub fn amount_due_now(total_price: i64, settings: &VenueSettings) -> i64 {
    if !settings.deposit_enabled {
        return 0;
    }
    settings.deposit_amount.clamp(0, total_price.max(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use surrealdb::RecordId;

    fn tier(min: i32, max: i32, price: i64) -> PricingTier {
        PricingTier {
            id: None,
            min_guests: min,
            max_guests: max,
            price,
        }
    }

    fn default_tiers() -> Vec<PricingTier> {
        vec![
            tier(8, 12, 152),
            tier(13, 20, 220),
            tier(21, 35, 340),
            tier(36, 60, 480),
            tier(61, 100, 700),
        ]
    }

    fn default_options() -> Vec<ExtraHoursOption> {
        [(0, 0), (1, 30), (2, 55), (3, 75), (4, 90)]
            .into_iter()
            .map(|(hours, price)| ExtraHoursOption {
                id: None,
                hours,
                price,
            })
            .collect()
    }

    fn settings(midweek_percent: i64) -> VenueSettings {
        VenueSettings {
            midweek_discount_percent: midweek_percent,
            ..VenueSettings::default()
        }
    }

    fn offer(kind: OfferKind, value: i64, enabled: bool) -> Offer {
        Offer {
            id: None,
            name: format!("{kind:?}-{value}"),
            kind,
            value,
            enabled,
        }
    }

    fn promo(percent: Option<i64>, fixed: Option<i64>) -> PromoCode {
        PromoCode {
            id: Some(RecordId::from_table_key("promo_code", "p1")),
            code: "TENOFF".into(),
            enabled: true,
            percent_off: percent,
            fixed_off: fixed,
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
            min_guests: Some(8),
            max_uses: None,
            uses: 0,
        }
    }

    // 2026-08-07 is a Friday, 2026-08-04 a Tuesday
    fn friday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
    }

    fn tuesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 4).unwrap()
    }

    fn quote(
        ctx: &PricingContext,
        date: NaiveDate,
        guests: i32,
        extra_hours: i32,
        promo: Option<&PromoCode>,
    ) -> PriceBreakdown {
        compute_quote(
            ctx,
            &QuoteInputs {
                date,
                today: friday(),
                guests,
                extra_hours,
                promo,
            },
        )
    }

    fn ctx<'a>(
        tiers: &'a [PricingTier],
        options: &'a [ExtraHoursOption],
        offers: &'a [Offer],
        settings: &'a VenueSettings,
    ) -> PricingContext<'a> {
        PricingContext {
            tiers,
            extra_hours_options: options,
            offers,
            settings,
        }
    }

    #[test]
    fn default_tier_no_discounts() {
        let tiers = default_tiers();
        let options = default_options();
        let s = settings(25);
        let c = ctx(&tiers, &options, &[], &s);

        let b = quote(&c, friday(), 8, 0, None);
        assert_eq!(b.base_price, 152);
        assert_eq!(b.extra_hours_price, 0);
        assert_eq!(b.discount_amount, 0);
        assert_eq!(b.promo_discount_amount, 0);
        assert_eq!(b.total_price, 152);
    }

    #[test]
    fn midweek_tuesday_takes_the_configured_percent() {
        let tiers = default_tiers();
        let options = default_options();
        let s = settings(25);
        let c = ctx(&tiers, &options, &[], &s);

        let b = quote(&c, tuesday(), 8, 0, None);
        // round(152 × 0.25) = 38
        assert_eq!(b.discount_amount, 38);
        assert_eq!(b.total_price, 114);
    }

    #[test]
    fn promo_percent_applies_after_the_midweek_discount() {
        let tiers = default_tiers();
        let options = default_options();
        let s = settings(25);
        let c = ctx(&tiers, &options, &[], &s);
        let p = promo(Some(10), None);

        let b = quote(&c, tuesday(), 8, 0, Some(&p));
        // round((152 − 38) × 0.10) = 11
        assert_eq!(b.promo_discount_amount, 11);
        assert_eq!(b.total_price, 103);
        assert_eq!(b.applied_promo.as_deref(), Some("TENOFF"));
    }

    #[test]
    fn extension_price_is_a_flat_tier_lookup() {
        let tiers = default_tiers();
        let options = default_options();
        let s = settings(0);
        let c = ctx(&tiers, &options, &[], &s);

        let b = quote(&c, friday(), 10, 2, None);
        assert_eq!(b.extra_hours_price, 55);
        assert_eq!(b.total_price, 152 + 55);
    }

    #[test]
    fn tier_boundaries_select_the_correct_tier() {
        let tiers = default_tiers();
        let options = default_options();
        let s = settings(0);
        let c = ctx(&tiers, &options, &[], &s);

        // Exactly at a tier's max and the next tier's min
        assert_eq!(quote(&c, friday(), 12, 0, None).base_price, 152);
        assert_eq!(quote(&c, friday(), 13, 0, None).base_price, 220);
        assert_eq!(quote(&c, friday(), 100, 0, None).base_price, 700);
    }

    #[test]
    fn unmatched_guest_count_prices_to_zero() {
        let tiers = default_tiers();
        let options = default_options();
        let s = settings(0);
        let c = ctx(&tiers, &options, &[], &s);

        assert_eq!(quote(&c, friday(), 7, 0, None).total_price, 0);
    }

    #[test]
    fn midweek_offer_outbids_a_smaller_venue_percent() {
        let tiers = default_tiers();
        let options = default_options();
        let s = settings(10);
        let offers = vec![
            offer(OfferKind::Midweek, 25, true),
            offer(OfferKind::Midweek, 15, true),
            offer(OfferKind::Midweek, 50, false),
        ];
        let c = ctx(&tiers, &options, &offers, &s);

        let b = quote(&c, tuesday(), 8, 0, None);
        // Largest enabled midweek percent (25) wins over the venue's 10
        assert_eq!(b.discount_amount, 38);

        // Never applied outside Monday-Wednesday
        let b = quote(&c, friday(), 8, 0, None);
        assert_eq!(b.discount_amount, 0);
    }

    #[test]
    fn largest_percent_offer_applies_fixed_offers_sum() {
        let tiers = default_tiers();
        let options = default_options();
        let s = settings(0);
        let offers = vec![
            offer(OfferKind::Percent, 10, true),
            offer(OfferKind::Percent, 5, true),
            offer(OfferKind::Fixed, 7, true),
            offer(OfferKind::Fixed, 3, true),
            offer(OfferKind::Fixed, 100, false),
        ];
        let c = ctx(&tiers, &options, &offers, &s);

        let b = quote(&c, friday(), 8, 0, None);
        // percent: round(152 × 0.10) = 15, not 15% + 5%; fixed: 7 + 3
        assert_eq!(b.discount_amount, 15 + 10);
        assert_eq!(b.total_price, 152 - 25);
    }

    #[test]
    fn offer_percent_composes_after_midweek_and_promo() {
        let tiers = default_tiers();
        let options = default_options();
        let s = settings(25);
        let offers = vec![offer(OfferKind::Percent, 10, true)];
        let c = ctx(&tiers, &options, &offers, &s);
        let p = promo(Some(10), None);

        let b = quote(&c, tuesday(), 8, 0, Some(&p));
        // 152 → midweek 38 → 114 → promo 11 → 103 → offer round(10.3) = 10 → 93
        assert_eq!(b.promo_discount_amount, 11);
        assert_eq!(b.discount_amount, 38 + 10);
        assert_eq!(b.total_price, 93);
    }

    #[test]
    fn totals_clamp_at_zero_instead_of_going_negative() {
        let tiers = default_tiers();
        let options = default_options();
        let s = settings(0);
        let offers = vec![offer(OfferKind::Fixed, 1000, true)];
        let c = ctx(&tiers, &options, &offers, &s);

        let b = quote(&c, friday(), 8, 0, None);
        assert_eq!(b.total_price, 0);
        // Only the amount actually subtracted is reported
        assert_eq!(b.discount_amount, 152);
    }

    #[test]
    fn promo_fixed_is_a_flat_subtraction() {
        let tiers = default_tiers();
        let options = default_options();
        let s = settings(0);
        let c = ctx(&tiers, &options, &[], &s);
        let p = promo(None, Some(20));

        let b = quote(&c, friday(), 8, 0, Some(&p));
        assert_eq!(b.promo_discount_amount, 20);
        assert_eq!(b.total_price, 132);
    }

    #[test]
    fn promo_percent_wins_when_a_code_carries_both() {
        let tiers = default_tiers();
        let options = default_options();
        let s = settings(0);
        let c = ctx(&tiers, &options, &[], &s);
        let p = promo(Some(10), Some(50));

        let b = quote(&c, friday(), 8, 0, Some(&p));
        // round(152 × 0.10) = 15, the fixed 50 is ignored
        assert_eq!(b.promo_discount_amount, 15);
    }

    #[test]
    fn invalid_promos_degrade_silently_to_full_price() {
        let tiers = default_tiers();
        let options = default_options();
        let s = settings(0);
        let c = ctx(&tiers, &options, &[], &s);

        let disabled = PromoCode {
            enabled: false,
            ..promo(Some(10), None)
        };
        let not_yet = PromoCode {
            start_date: NaiveDate::from_ymd_opt(2027, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2027, 12, 31).unwrap(),
            ..promo(Some(10), None)
        };
        let too_few_guests = PromoCode {
            min_guests: Some(20),
            ..promo(Some(10), None)
        };
        let exhausted = PromoCode {
            max_uses: Some(5),
            uses: 5,
            ..promo(Some(10), None)
        };

        for p in [disabled, not_yet, too_few_guests, exhausted] {
            let b = quote(&c, friday(), 8, 0, Some(&p));
            assert_eq!(b.promo_discount_amount, 0, "code should not apply: {p:?}");
            assert_eq!(b.total_price, 152);
            assert!(b.applied_promo.is_none());
        }
    }

    #[test]
    fn promo_window_is_date_inclusive() {
        let p = promo(Some(10), None);
        assert!(promo_applicable(&p, p.start_date, 8));
        assert!(promo_applicable(&p, p.end_date, 8));
        assert!(!promo_applicable(
            &p,
            p.end_date.succ_opt().unwrap(),
            8
        ));
    }

    #[test]
    fn deposit_due_now_clamps_to_total() {
        let disabled = VenueSettings {
            deposit_enabled: false,
            deposit_amount: 50,
            ..VenueSettings::default()
        };
        assert_eq!(amount_due_now(120, &disabled), 0);

        let enabled = VenueSettings {
            deposit_enabled: true,
            deposit_amount: 150,
            ..VenueSettings::default()
        };
        assert_eq!(amount_due_now(120, &enabled), 120);

        let modest = VenueSettings {
            deposit_enabled: true,
            deposit_amount: 50,
            ..VenueSettings::default()
        };
        assert_eq!(amount_due_now(120, &modest), 50);
        assert_eq!(amount_due_now(0, &modest), 0);
    }

    #[test]
    fn extras_are_priced_flat_or_per_guest() {
        let cake = Extra {
            id: Some(RecordId::from_table_key("extra", "cake")),
            name: "Birthday cake".into(),
            price: 25,
            pricing_mode: PricingMode::Flat,
            is_active: true,
        };
        let drinks = Extra {
            id: Some(RecordId::from_table_key("extra", "drinks")),
            name: "Drinks package".into(),
            price: 8,
            pricing_mode: PricingMode::PerGuest,
            is_active: true,
        };

        let (lines, total) = extras_lines(&[(cake, 2), (drinks, 1)], 10);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].line_total, 50);
        assert_eq!(lines[1].line_total, 80);
        assert_eq!(total, 130);
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        // 5% of 150 = 7.5 → 8
        assert_eq!(percent_of(150, 5), 8);
        // 10% of 114 = 11.4 → 11
        assert_eq!(percent_of(114, 10), 11);
        // 25% of 152 = 38
        assert_eq!(percent_of(152, 25), 38);
    }
}
