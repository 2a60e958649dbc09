//! Reservation request DTOs

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use validator::Validate;

use crate::{
    constants::MAX_CANCEL_REASON_LENGTH,
    db::repositories::ReservationFilter,
    error::{AppError, AppResult},
    utils::parse_time,
};

/// Create reservation request; times are `HH:MM`
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReservationRequest {
    #[validate(range(min = 1))]
    pub room_id: i64,

    pub reservation_date: NaiveDate,

    pub start_time: String,

    pub end_time: String,
}

impl CreateReservationRequest {
    /// Parsed start and end times
    pub fn times(&self) -> AppResult<(NaiveTime, NaiveTime)> {
        let parse = |field: &str, raw: &str| {
            parse_time(raw).ok_or_else(|| {
                AppError::Validation(format!("{} must be a time in HH:MM format", field))
            })
        };
        Ok((
            parse("start_time", &self.start_time)?,
            parse("end_time", &self.end_time)?,
        ))
    }
}

/// Cancel reservation request
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CancelReservationRequest {
    #[validate(length(max = MAX_CANCEL_REASON_LENGTH))]
    pub reason: Option<String>,
}

/// List reservations query parameters
#[derive(Debug, Deserialize)]
pub struct ListReservationsQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub status: Option<String>,
    pub room_id: Option<i64>,
    /// Ignored on the personal listing
    pub user_id: Option<i64>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl ListReservationsQuery {
    pub fn filter(&self) -> ReservationFilter {
        ReservationFilter {
            user_id: self.user_id,
            room_id: self.room_id,
            status: self.status.clone(),
            date_from: self.date_from,
            date_to: self.date_to,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(start: &str, end: &str) -> CreateReservationRequest {
        CreateReservationRequest {
            room_id: 1,
            reservation_date: NaiveDate::from_ymd_opt(2024, 2, 15).unwrap(),
            start_time: start.to_string(),
            end_time: end.to_string(),
        }
    }

    #[test]
    fn test_times_parse() {
        let (start, end) = request("09:00", "10:00").times().unwrap();
        assert_eq!(start, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(end, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
    }

    #[test]
    fn test_bad_time_is_a_validation_error() {
        assert!(matches!(
            request("nine", "10:00").times(),
            Err(AppError::Validation(msg)) if msg.contains("start_time")
        ));
    }

    #[test]
    fn test_cancel_reason_length() {
        let ok = CancelReservationRequest { reason: Some("Meeting moved".to_string()) };
        assert!(ok.validate().is_ok());

        let long = CancelReservationRequest { reason: Some("x".repeat(201)) };
        assert!(long.validate().is_err());
    }
}
