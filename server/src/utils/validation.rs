//! Input validation helpers
//!
//! The single normalize-and-validate boundary: raw request payloads come in,
//! either a strongly-typed parameter set or a `{field: reason}` error map
//! comes out. Quote, create, update and confirm all go through here.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use validator::ValidateEmail;

use crate::db::models::{ExtraHoursOption, PricingTier};

/// Field-keyed validation error map
pub type FieldErrors = BTreeMap<String, String>;

// ── Text length limits ──────────────────────────────────────────────

/// Person names (first name, surname)
pub const MAX_NAME_LEN: usize = 100;

/// Notes and free-text reasons
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone numbers, promo codes
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Guest count hard ceiling, independent of the tier table
pub const MAX_GUESTS: i32 = 500;

/// Extension choices are discrete 0-4 hours
pub const MAX_EXTRA_HOURS: i32 = 4;

// ── Raw request payloads (wire shape) ───────────────────────────────

/// Quote/search query parameters
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteInput {
    pub date: Option<String>,
    pub guests: Option<i32>,
    #[serde(default)]
    pub extra_hours: Option<i32>,
    pub promo_code: Option<String>,
    pub staff_id: Option<String>,
    pub service_id: Option<String>,
}

/// One selected add-on item
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraSelectionInput {
    pub extra_id: String,
    pub quantity: i32,
}

/// Booking creation payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingInput {
    pub date: Option<String>,
    pub time: Option<String>,
    pub guests: Option<i32>,
    #[serde(default)]
    pub extra_hours: Option<i32>,
    pub promo_code: Option<String>,
    pub staff_id: Option<String>,
    pub service_id: Option<String>,
    pub first_name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub extras: Option<Vec<ExtraSelectionInput>>,
}

/// Customer-facing update payload (PENDING bookings only)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingInput {
    pub first_name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub extras: Option<Vec<ExtraSelectionInput>>,
}

// ── Normalized parameter sets ───────────────────────────────────────

/// Validated quote parameters
#[derive(Debug, Clone)]
pub struct QuoteParams {
    pub date: NaiveDate,
    pub guests: i32,
    pub extra_hours: i32,
    pub promo_code: Option<String>,
    pub staff_id: Option<String>,
    pub service_id: Option<String>,
}

/// Validated booking-creation parameters
#[derive(Debug, Clone)]
pub struct CreateParams {
    pub quote: QuoteParams,
    pub start_time: NaiveTime,
    pub customer: CustomerInput,
    pub extras: Vec<ExtraSelectionInput>,
}

/// Customer contact fields, pre-trim
#[derive(Debug, Clone, Default)]
pub struct CustomerInput {
    pub first_name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

// ── Normalization ───────────────────────────────────────────────────

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Normalize and validate a quote/search request
pub fn normalize_quote(input: &QuoteInput) -> Result<QuoteParams, FieldErrors> {
    let mut errors = FieldErrors::new();

    let date = match non_empty(&input.date) {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d").ok().or_else(|| {
            errors.insert("date".into(), format!("Invalid date: {}", raw));
            None
        }),
        None => {
            errors.insert("date".into(), "Date is required".into());
            None
        }
    };

    let guests = match input.guests {
        Some(g) if (1..=MAX_GUESTS).contains(&g) => Some(g),
        Some(g) => {
            errors.insert("guests".into(), format!("Invalid guest count: {}", g));
            None
        }
        None => {
            errors.insert("guests".into(), "Guest count is required".into());
            None
        }
    };

    let extra_hours = match input.extra_hours.unwrap_or(0) {
        h if (0..=MAX_EXTRA_HOURS).contains(&h) => Some(h),
        h => {
            errors.insert("extraHours".into(), format!("Invalid extra hours: {}", h));
            None
        }
    };

    let promo_code = non_empty(&input.promo_code);
    if let Some(code) = &promo_code
        && code.len() > MAX_SHORT_TEXT_LEN
    {
        errors.insert("promoCode".into(), "Promo code is too long".into());
    }

    match (date, guests, extra_hours, errors.is_empty()) {
        (Some(date), Some(guests), Some(extra_hours), true) => Ok(QuoteParams {
            date,
            guests,
            extra_hours,
            promo_code,
            staff_id: non_empty(&input.staff_id),
            service_id: non_empty(&input.service_id),
        }),
        _ => Err(errors),
    }
}

/// Normalize and validate a booking-creation request
pub fn normalize_create(input: &CreateBookingInput) -> Result<CreateParams, FieldErrors> {
    let quote_input = QuoteInput {
        date: input.date.clone(),
        guests: input.guests,
        extra_hours: input.extra_hours,
        promo_code: input.promo_code.clone(),
        staff_id: input.staff_id.clone(),
        service_id: input.service_id.clone(),
    };

    let mut errors = FieldErrors::new();
    let quote = match normalize_quote(&quote_input) {
        Ok(q) => Some(q),
        Err(e) => {
            errors.extend(e);
            None
        }
    };

    let start_time = match non_empty(&input.time) {
        Some(raw) => NaiveTime::parse_from_str(&raw, "%H:%M").ok().or_else(|| {
            errors.insert("time".into(), format!("Invalid time: {}", raw));
            None
        }),
        None => {
            errors.insert("time".into(), "Start time is required".into());
            None
        }
    };

    let customer = CustomerInput {
        first_name: non_empty(&input.first_name),
        surname: non_empty(&input.surname),
        email: non_empty(&input.email),
        phone: non_empty(&input.phone),
        notes: non_empty(&input.notes),
    };
    errors.extend(validate_customer(&customer, false).err().unwrap_or_default());

    let extras = input.extras.clone().unwrap_or_default();
    for sel in &extras {
        if sel.quantity < 1 || sel.quantity > 99 {
            errors.insert("extras".into(), format!("Invalid quantity: {}", sel.quantity));
        }
    }

    match (quote, start_time, errors.is_empty()) {
        (Some(quote), Some(start_time), true) => Ok(CreateParams {
            quote,
            start_time,
            customer,
            extras,
        }),
        _ => Err(errors),
    }
}

// ── Customer field validation ───────────────────────────────────────

/// Validate customer contact fields.
///
/// `strict` is the confirmation-time mode: every required field must be
/// present and well-formed. Non-strict (creation/update) only checks the
/// shape of fields that were supplied.
pub fn validate_customer(customer: &CustomerInput, strict: bool) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    check_name(&mut errors, "firstName", &customer.first_name, strict);
    check_name(&mut errors, "surname", &customer.surname, strict);

    match &customer.email {
        Some(email) => {
            if email.len() > MAX_EMAIL_LEN || !email.validate_email() {
                errors.insert("email".into(), format!("Invalid email: {}", email));
            }
        }
        None if strict => {
            errors.insert("email".into(), "Email is required".into());
        }
        None => {}
    }

    match &customer.phone {
        Some(phone) => {
            let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
            if phone.len() > MAX_SHORT_TEXT_LEN || digits < 7 {
                errors.insert("phone".into(), format!("Invalid phone number: {}", phone));
            }
        }
        None if strict => {
            errors.insert("phone".into(), "Phone number is required".into());
        }
        None => {}
    }

    if let Some(notes) = &customer.notes
        && notes.len() > MAX_NOTE_LEN
    {
        errors.insert("notes".into(), "Notes are too long".into());
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn check_name(errors: &mut FieldErrors, field: &str, value: &Option<String>, strict: bool) {
    match value {
        Some(v) if v.len() > MAX_NAME_LEN => {
            errors.insert(field.into(), format!("{} is too long", field));
        }
        None if strict => {
            errors.insert(field.into(), format!("{} is required", field));
        }
        _ => {}
    }
}

// ── Venue-configuration checks (tier universe, extension options) ───

/// Guest counts must fall inside the configured tier universe
pub fn validate_guests_against_tiers(guests: i32, tiers: &[PricingTier]) -> Result<(), FieldErrors> {
    if tiers
        .iter()
        .any(|t| guests >= t.min_guests && guests <= t.max_guests)
    {
        Ok(())
    } else {
        let mut errors = FieldErrors::new();
        errors.insert(
            "guests".into(),
            format!("No pricing available for {} guests", guests),
        );
        Err(errors)
    }
}

/// The extension choice must exist in the configured option set
pub fn validate_extra_hours_option(
    extra_hours: i32,
    options: &[ExtraHoursOption],
) -> Result<(), FieldErrors> {
    if options.iter().any(|o| o.hours == extra_hours) {
        Ok(())
    } else {
        let mut errors = FieldErrors::new();
        errors.insert(
            "extraHours".into(),
            format!("Unsupported extension: {} hours", extra_hours),
        );
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(min: i32, max: i32, price: i64) -> PricingTier {
        PricingTier {
            id: None,
            min_guests: min,
            max_guests: max,
            price,
        }
    }

    #[test]
    fn quote_requires_date_and_guests() {
        let errors = normalize_quote(&QuoteInput::default()).unwrap_err();
        assert!(errors.contains_key("date"));
        assert!(errors.contains_key("guests"));
    }

    #[test]
    fn quote_accepts_minimal_input() {
        let params = normalize_quote(&QuoteInput {
            date: Some("2026-09-01".into()),
            guests: Some(10),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(params.guests, 10);
        assert_eq!(params.extra_hours, 0);
        assert!(params.promo_code.is_none());
    }

    #[test]
    fn quote_rejects_out_of_range_extra_hours() {
        let errors = normalize_quote(&QuoteInput {
            date: Some("2026-09-01".into()),
            guests: Some(10),
            extra_hours: Some(7),
            ..Default::default()
        })
        .unwrap_err();
        assert!(errors.contains_key("extraHours"));
    }

    #[test]
    fn blank_promo_code_is_treated_as_absent() {
        let params = normalize_quote(&QuoteInput {
            date: Some("2026-09-01".into()),
            guests: Some(10),
            promo_code: Some("   ".into()),
            ..Default::default()
        })
        .unwrap();
        assert!(params.promo_code.is_none());
    }

    #[test]
    fn strict_customer_validation_requires_contact_set() {
        let errors = validate_customer(&CustomerInput::default(), true).unwrap_err();
        assert!(errors.contains_key("firstName"));
        assert!(errors.contains_key("surname"));
        assert!(errors.contains_key("email"));
        assert!(errors.contains_key("phone"));
    }

    #[test]
    fn lenient_customer_validation_checks_shape_only() {
        assert!(validate_customer(&CustomerInput::default(), false).is_ok());

        let errors = validate_customer(
            &CustomerInput {
                email: Some("not-an-email".into()),
                ..Default::default()
            },
            false,
        )
        .unwrap_err();
        assert!(errors.contains_key("email"));
    }

    #[test]
    fn guests_outside_tier_universe_are_rejected() {
        let tiers = vec![tier(8, 12, 152), tier(13, 20, 220)];
        assert!(validate_guests_against_tiers(8, &tiers).is_ok());
        assert!(validate_guests_against_tiers(20, &tiers).is_ok());
        assert!(validate_guests_against_tiers(7, &tiers).is_err());
        assert!(validate_guests_against_tiers(21, &tiers).is_err());
    }
}
