//! Core module - server configuration, state and lifecycle
//!
//! # Structure
//!
//! - [`Config`] - server configuration
//! - [`ServerState`] - shared request state
//! - [`Server`] - HTTP server
//! - [`tasks`] - background task management

pub mod config;
pub mod server;
pub mod state;
pub mod tasks;

pub use config::Config;
pub use server::Server;
pub use state::{LeaseRegistry, ServerState};
