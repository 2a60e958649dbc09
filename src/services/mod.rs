//! Business logic services

pub mod auth_service;
pub mod report_service;
pub mod reservation_service;
pub mod room_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use report_service::ReportService;
pub use reservation_service::ReservationService;
pub use room_service::RoomService;
pub use user_service::UserService;
