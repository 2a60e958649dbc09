//! Cancellation and penalty rules

use chrono::{Days, NaiveDate};

use crate::models::{Reservation, ReservationStatus};

use super::{CancelApproval, RejectionReason, ReservationPolicy, Requester};

/// Decide whether `requester` may cancel `reservation`.
///
/// `cancellations_this_month` is the number of cancellations the owner has
/// already made in the current calendar month. Exceeding the monthly cap does
/// not block the cancellation; it sets `penalty_until` on the approval instead.
/// Admins cancelling someone else's booking never trigger a penalty.
pub fn evaluate_cancel(
    reservation: &Reservation,
    requester: &Requester,
    cancellations_this_month: u32,
    policy: &ReservationPolicy,
    today: NaiveDate,
) -> Result<CancelApproval, RejectionReason> {
    let is_owner = reservation.user_id == requester.user_id;
    if !is_owner && !requester.is_admin {
        return Err(RejectionReason::InsufficientPermissions(
            "cancel this reservation".to_string(),
        ));
    }

    match reservation.status() {
        Some(status) if status.can_transition_to(ReservationStatus::Cancelled) => {}
        Some(ReservationStatus::Cancelled) => {
            return Err(RejectionReason::CannotCancelReservation(
                "This reservation is already cancelled".to_string(),
            ));
        }
        _ => {
            return Err(RejectionReason::CannotCancelReservation(format!(
                "A reservation in status '{}' cannot be cancelled",
                reservation.status
            )));
        }
    }

    let over_cap = cancellations_this_month.saturating_add(1) > policy.max_cancellations_per_month;
    let penalty_until = if is_owner && over_cap {
        today.checked_add_days(Days::new(u64::from(policy.penalty_days)))
    } else {
        None
    };

    Ok(CancelApproval {
        reservation_id: reservation.id,
        new_status: ReservationStatus::Cancelled,
        penalty_until,
    })
}

/// Refuse new bookings while a penalty is still running
pub fn check_penalty(
    penalty_until: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<(), RejectionReason> {
    match penalty_until {
        Some(until) if until > today => Err(RejectionReason::UserPenalized { until }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::test_support::{date, reservation};

    const OWNER: i64 = 7;

    fn today() -> NaiveDate {
        date(2024, 2, 1)
    }

    fn owner() -> Requester {
        Requester { user_id: OWNER, is_admin: false }
    }

    fn confirmed() -> Reservation {
        reservation(5, OWNER, 1, date(2024, 2, 10), (9, 0), (10, 0), "confirmed")
    }

    #[test]
    fn test_owner_can_cancel() {
        let approval =
            evaluate_cancel(&confirmed(), &owner(), 0, &ReservationPolicy::default(), today()).unwrap();
        assert_eq!(approval.reservation_id, 5);
        assert_eq!(approval.new_status, ReservationStatus::Cancelled);
        assert_eq!(approval.penalty_until, None);
    }

    #[test]
    fn test_stranger_cannot_cancel() {
        let stranger = Requester { user_id: 8, is_admin: false };
        assert!(matches!(
            evaluate_cancel(&confirmed(), &stranger, 0, &ReservationPolicy::default(), today()),
            Err(RejectionReason::InsufficientPermissions(_))
        ));
    }

    #[test]
    fn test_admin_can_cancel_without_penalising_owner() {
        let admin = Requester { user_id: 1, is_admin: true };
        let approval =
            evaluate_cancel(&confirmed(), &admin, 10, &ReservationPolicy::default(), today()).unwrap();
        assert_eq!(approval.penalty_until, None);
    }

    #[test]
    fn test_cancelled_reservation_cannot_be_cancelled_again() {
        let mut cancelled = confirmed();
        cancelled.status = "cancelled".to_string();

        for requester in [owner(), Requester { user_id: 1, is_admin: true }] {
            assert!(matches!(
                evaluate_cancel(&cancelled, &requester, 0, &ReservationPolicy::default(), today()),
                Err(RejectionReason::CannotCancelReservation(_))
            ));
        }
    }

    #[test]
    fn test_cancel_follows_status_lifecycle() {
        let mut pending = confirmed();
        pending.status = "pending".to_string();
        assert!(evaluate_cancel(&pending, &owner(), 0, &ReservationPolicy::default(), today()).is_ok());

        let mut unknown = confirmed();
        unknown.status = "archived".to_string();
        assert!(matches!(
            evaluate_cancel(&unknown, &owner(), 0, &ReservationPolicy::default(), today()),
            Err(RejectionReason::CannotCancelReservation(msg)) if msg.contains("archived")
        ));
    }

    #[test]
    fn test_penalty_applies_once_monthly_cap_is_exceeded() {
        let policy = ReservationPolicy::default();

        let third = evaluate_cancel(&confirmed(), &owner(), 2, &policy, today()).unwrap();
        assert_eq!(third.penalty_until, None);

        let fourth = evaluate_cancel(&confirmed(), &owner(), 3, &policy, today()).unwrap();
        assert_eq!(fourth.penalty_until, Some(date(2024, 2, 8)));
    }

    #[test]
    fn test_check_penalty() {
        assert!(check_penalty(None, today()).is_ok());
        assert!(check_penalty(Some(date(2024, 2, 1)), today()).is_ok());
        assert_eq!(
            check_penalty(Some(date(2024, 2, 8)), today()),
            Err(RejectionReason::UserPenalized { until: date(2024, 2, 8) })
        );
    }
}
