//! Roombook - Coworking Room Reservation Service
//!
//! This library provides the core functionality for the Roombook service:
//! user accounts, room inventory and one-hour reservations with a set of
//! booking rules enforced on every request.
//!
//! # Features
//!
//! - Hour-aligned reservations inside configurable working hours
//! - Slot conflict detection backed by a SERIALIZABLE transaction
//! - Daily booking quotas and monthly cancellation penalties
//! - Role-based access control
//!
//! # Architecture
//!
//! The application follows a layered architecture:
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Services**: Orchestration, transactions and persistence of decisions
//! - **Policy**: Pure booking and cancellation rules
//! - **Repositories**: Database access
//! - **Models**: Domain models

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod policy;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use policy::{RejectionReason, ReservationPolicy};
pub use state::AppState;
