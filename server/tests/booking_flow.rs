//! Booking lifecycle integration tests over an in-memory database
//!
//! Exercises the full repository + engine stack: creation with allocation
//! and pricing, the PENDING hold, customer updates, idempotent
//! confirmation, cancellation, payment outcomes and the extras snapshot.

use std::sync::Arc;

use chrono::{Duration, Utc};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

use encore_server::core::LeaseRegistry;
use encore_server::db::models::{
    BookingStatus, Extra, OperatingWindow, PricingMode, Room, VenueSettings,
};
use encore_server::db::repository::{
    BookingRepository, HoursRepository, PricingRepository, RoomRepository, SettingsRepository,
};
use encore_server::db::seed;
use encore_server::engine::{BookingLifecycle, LifecycleError, PaymentOutcome};
use encore_server::utils::validation::{
    CreateBookingInput, ExtraSelectionInput, UpdateBookingInput,
};

async fn test_db() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.expect("in-memory db");
    db.use_ns("encore").use_db("venue").await.expect("namespace");
    db
}

async fn setup_venue(db: &Surreal<Db>, rooms: usize) {
    seed::seed_defaults(db).await.expect("seed defaults");

    let room_repo = RoomRepository::new(db.clone());
    for i in 0..rooms {
        room_repo
            .create(Room {
                id: None,
                code: format!("R{i}"),
                name: format!("Room {i}"),
                min_guests: 1,
                max_guests: 30,
                sort: i as i32,
                is_active: true,
            })
            .await
            .expect("create room");
    }

    // Open every day of the week 10:00-23:00
    let hours = HoursRepository::new(db.clone());
    for day_of_week in 0..7u8 {
        hours
            .create_window(OperatingWindow {
                id: None,
                day_of_week,
                open: "10:00".into(),
                close: "23:00".into(),
                enabled: true,
            })
            .await
            .expect("create window");
    }
}

fn lifecycle(db: &Surreal<Db>) -> BookingLifecycle {
    BookingLifecycle::new(db.clone(), chrono_tz::UTC, Arc::new(LeaseRegistry::new()), 15)
}

/// A date comfortably past any lead-time requirement
fn future_date() -> String {
    (Utc::now() + Duration::days(30)).date_naive().to_string()
}

fn create_input(date: &str, time: &str, guests: i32) -> CreateBookingInput {
    CreateBookingInput {
        date: Some(date.to_string()),
        time: Some(time.to_string()),
        guests: Some(guests),
        ..Default::default()
    }
}

fn contact_update() -> UpdateBookingInput {
    UpdateBookingInput {
        first_name: Some("Nina".into()),
        surname: Some("Vale".into()),
        email: Some("nina@example.com".into()),
        phone: Some("07700900123".into()),
        ..Default::default()
    }
}

#[tokio::test]
async fn create_prices_and_holds_a_pending_booking() {
    let db = test_db().await;
    setup_venue(&db, 1).await;
    let lc = lifecycle(&db);
    let date = future_date();

    let booking = lc
        .create(&create_input(&date, "18:00", 10))
        .await
        .expect("create booking");

    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.base_price, 152);
    assert_eq!(booking.extra_hours_price, 0);
    assert_eq!(booking.total_price, 152);
    assert!(booking.expires_at.is_some());
    assert!(!booking.manage_token.is_empty());
    assert_eq!(booking.end_at - booking.start_at, 60 * 60 * 1000);
}

#[tokio::test]
async fn a_held_slot_rejects_a_second_booking() {
    let db = test_db().await;
    setup_venue(&db, 1).await;
    let lc = lifecycle(&db);
    let date = future_date();

    lc.create(&create_input(&date, "18:00", 10))
        .await
        .expect("first booking");

    let second = lc.create(&create_input(&date, "18:00", 10)).await;
    assert!(matches!(second, Err(LifecycleError::NoAvailability)));

    // Touching intervals are fine: the hour after is bookable
    lc.create(&create_input(&date, "19:00", 10))
        .await
        .expect("adjacent booking");
}

#[tokio::test]
async fn concurrent_creates_for_the_same_slot_yield_one_booking() {
    let db = test_db().await;
    setup_venue(&db, 1).await;
    let lc = lifecycle(&db);
    let date = future_date();

    // Both requests see the same free snapshot; the room lease serializes
    // the re-check + insert so exactly one may win
    let (a, b) = tokio::join!(
        lc.create(&create_input(&date, "18:00", 10)),
        lc.create(&create_input(&date, "18:00", 10)),
    );

    let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    let loser = [a, b].into_iter().find(|r| r.is_err()).unwrap();
    assert!(matches!(loser, Err(LifecycleError::NoAvailability)));
}

#[tokio::test]
async fn a_second_room_absorbs_the_overlap() {
    let db = test_db().await;
    setup_venue(&db, 2).await;
    let lc = lifecycle(&db);
    let date = future_date();

    let first = lc.create(&create_input(&date, "18:00", 10)).await.unwrap();
    let second = lc.create(&create_input(&date, "18:00", 10)).await.unwrap();
    assert_ne!(first.room, second.room);
}

#[tokio::test]
async fn confirmation_requires_full_contact_details_and_is_idempotent() {
    let db = test_db().await;
    setup_venue(&db, 1).await;
    let lc = lifecycle(&db);
    let date = future_date();

    let booking = lc.create(&create_input(&date, "18:00", 10)).await.unwrap();
    let token = booking.manage_token.clone();

    // Missing contact details: a field-keyed validation error, not a crash
    match lc.confirm(&token).await {
        Err(LifecycleError::Validation(fields)) => {
            assert!(fields.contains_key("email"));
            assert!(fields.contains_key("firstName"));
        }
        other => panic!("expected validation failure, got {other:?}"),
    }

    lc.update(&token, &contact_update()).await.expect("update contact");

    let (confirmed, already) = lc.confirm(&token).await.expect("confirm");
    assert!(!already);
    assert_eq!(confirmed.status, BookingStatus::Confirmed);
    assert!(confirmed.confirmed_at.is_some());
    assert!(confirmed.expires_at.is_none());

    // Second confirmation: no-op success, same stored state
    let (again, already) = lc.confirm(&token).await.expect("confirm again");
    assert!(already);
    assert_eq!(again.status, BookingStatus::Confirmed);
    assert_eq!(again.confirmed_at, confirmed.confirmed_at);
}

#[tokio::test]
async fn updates_are_rejected_once_no_longer_pending() {
    let db = test_db().await;
    setup_venue(&db, 1).await;
    let lc = lifecycle(&db);
    let date = future_date();

    let booking = lc.create(&create_input(&date, "18:00", 10)).await.unwrap();
    let token = booking.manage_token.clone();

    lc.update(&token, &contact_update()).await.unwrap();
    lc.confirm(&token).await.unwrap();

    let result = lc.update(&token, &contact_update()).await;
    assert!(matches!(result, Err(LifecycleError::InvalidState(_))));
}

#[tokio::test]
async fn cancelling_frees_the_interval() {
    let db = test_db().await;
    setup_venue(&db, 1).await;
    let lc = lifecycle(&db);
    let date = future_date();

    let booking = lc.create(&create_input(&date, "18:00", 10)).await.unwrap();
    let cancelled = lc.cancel(&booking.manage_token).await.expect("cancel");
    assert_eq!(cancelled.status, BookingStatus::Cancelled);

    // Cancelling again is a quiet no-op
    lc.cancel(&booking.manage_token).await.expect("cancel again");

    // The slot is bookable again
    lc.create(&create_input(&date, "18:00", 10))
        .await
        .expect("rebook freed slot");
}

#[tokio::test]
async fn closed_dates_reject_creation_with_a_field_error() {
    let db = test_db().await;
    // Seed pricing but configure no operating hours at all
    seed::seed_defaults(&db).await.unwrap();
    RoomRepository::new(db.clone())
        .create(Room {
            id: None,
            code: "R0".into(),
            name: "Room 0".into(),
            min_guests: 1,
            max_guests: 30,
            sort: 0,
            is_active: true,
        })
        .await
        .unwrap();

    let lc = lifecycle(&db);
    let result = lc.create(&create_input(&future_date(), "18:00", 10)).await;
    match result {
        Err(LifecycleError::Validation(fields)) => {
            assert!(fields.contains_key("date"));
        }
        other => panic!("expected closed-date validation failure, got {other:?}"),
    }
}

#[tokio::test]
async fn extras_snapshot_survives_catalog_price_changes() {
    let db = test_db().await;
    setup_venue(&db, 1).await;

    let pricing = PricingRepository::new(db.clone());
    let cake = pricing
        .create_extra(Extra {
            id: None,
            name: "Birthday cake".into(),
            price: 25,
            pricing_mode: PricingMode::Flat,
            is_active: true,
        })
        .await
        .unwrap();
    let cake_id = cake.id.clone().unwrap();

    let lc = lifecycle(&db);
    let mut input = create_input(&future_date(), "18:00", 10);
    input.extras = Some(vec![ExtraSelectionInput {
        extra_id: cake_id.to_string(),
        quantity: 2,
    }]);

    let booking = lc.create(&input).await.expect("create with extras");
    assert_eq!(booking.extras_total, 50);
    assert_eq!(booking.total_price, 152 + 50);
    assert_eq!(booking.extras[0].unit_price, 25);

    // Reprice the catalog entry; the stored snapshot must not move
    pricing.update_extra_price(&cake_id, 99).await.unwrap();

    let stored = BookingRepository::new(db.clone())
        .find_by_token(&booking.manage_token)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.extras[0].unit_price, 25);
    assert_eq!(stored.extras[0].line_total, 50);
    assert_eq!(stored.extras_total, 50);
    assert_eq!(stored.total_price, 202);
}

#[tokio::test]
async fn payment_failure_policy_releases_or_keeps_the_hold() {
    let db = test_db().await;
    setup_venue(&db, 1).await;
    let lc = lifecycle(&db);
    let date = future_date();

    // Default policy: keep the hold for retry
    let booking = lc.create(&create_input(&date, "18:00", 10)).await.unwrap();
    let kept = lc
        .payment_outcome(&booking.manage_token, PaymentOutcome::Failure)
        .await
        .expect("failure with keep policy");
    assert_eq!(kept.status, BookingStatus::Pending);
    lc.cancel(&booking.manage_token).await.unwrap();

    // Release policy: failure frees the slot
    let settings_repo = SettingsRepository::new(db.clone());
    let settings = settings_repo.get_or_create().await.unwrap();
    settings_repo
        .save(VenueSettings {
            release_pending_on_payment_failure: true,
            ..settings
        })
        .await
        .unwrap();

    let booking = lc.create(&create_input(&date, "18:00", 10)).await.unwrap();
    let failed = lc
        .payment_outcome(&booking.manage_token, PaymentOutcome::Failure)
        .await
        .expect("failure with release policy");
    assert_eq!(failed.status, BookingStatus::Failed);

    // The failed hold no longer blocks the slot
    lc.create(&create_input(&date, "18:00", 10))
        .await
        .expect("rebook released slot");
}

#[tokio::test]
async fn payment_success_confirms_and_records_the_deposit() {
    let db = test_db().await;
    setup_venue(&db, 1).await;

    let settings_repo = SettingsRepository::new(db.clone());
    let settings = settings_repo.get_or_create().await.unwrap();
    settings_repo
        .save(VenueSettings {
            deposit_enabled: true,
            deposit_amount: 50,
            ..settings
        })
        .await
        .unwrap();

    let lc = lifecycle(&db);
    let mut input = create_input(&future_date(), "18:00", 10);
    input.first_name = Some("Nina".into());
    input.surname = Some("Vale".into());
    input.email = Some("nina@example.com".into());
    input.phone = Some("07700900123".into());

    let booking = lc.create(&input).await.unwrap();
    assert_eq!(booking.deposit_amount, 50);
    assert!(!booking.deposit_paid);

    let confirmed = lc
        .payment_outcome(&booking.manage_token, PaymentOutcome::Success)
        .await
        .expect("payment success");
    assert_eq!(confirmed.status, BookingStatus::Confirmed);
    assert!(confirmed.deposit_paid);
}
