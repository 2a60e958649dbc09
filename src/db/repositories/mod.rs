//! Database repositories
//!
//! Repositories handle all direct database interactions.

pub mod penalty_repo;
pub mod reservation_repo;
pub mod room_repo;
pub mod user_repo;

pub use penalty_repo::PenaltyRepository;
pub use reservation_repo::{ReservationFilter, ReservationRepository};
pub use room_repo::RoomRepository;
pub use user_repo::UserRepository;
