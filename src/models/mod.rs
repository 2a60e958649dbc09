//! Domain models
//!
//! This module contains all domain models used throughout the application.

pub mod penalty;
pub mod reservation;
pub mod room;
pub mod stats;
pub mod user;

pub use penalty::*;
pub use reservation::*;
pub use room::*;
pub use stats::*;
pub use user::*;
