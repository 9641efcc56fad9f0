//! Encore - karaoke venue booking server
//!
//! # Architecture
//!
//! The hard engineering lives in the availability & pricing engine: which
//! room/staff/time-slot combinations are free, and a deterministic,
//! auditable price that matches exactly between the quote a customer sees
//! and the breakdown persisted on the booking.
//!
//! # Module structure
//!
//! ```text
//! server/src/
//! ├── core/          # Config, state, HTTP server, background tasks
//! ├── db/            # Embedded SurrealDB models and repositories
//! ├── engine/        # Availability, pricing and the booking lifecycle
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # Errors, logging, time, the validation boundary
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod engine;
pub mod utils;

// Re-export public types
pub use crate::core::{Config, Server, ServerState};
pub use crate::engine::{BookingLifecycle, EngineContext};
pub use crate::utils::{AppError, AppResult};

// Re-export logger functions
pub use crate::utils::logger::{init_logger, init_logger_with_file};

/// Load `.env` and initialize logging
pub fn setup_environment() {
    let _ = dotenv::dotenv();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());
}

pub fn print_banner() {
    println!(
        r#"
    ______
   / ____/___  _________  ________
  / __/ / __ \/ ___/ __ \/ ___/ _ \
 / /___/ / / / /__/ /_/ / /  /  __/
/_____/_/ /_/\___/\____/_/   \___/
    "#
    );
}
