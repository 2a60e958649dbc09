//! Booking rules

use chrono::{Days, NaiveDate, NaiveTime, TimeDelta, Timelike};

use crate::models::{Reservation, ReservationStatus};

use super::{RejectionReason, ReservationPolicy, ReservationProposal, TimeSlot, ValidatedReservation};

/// Decide whether `proposal` may be booked.
///
/// `existing_for_room` should hold the reservations of the proposed room on the
/// proposed date, `existing_for_user` those of the requesting user on that date.
/// Cancelled entries in either set are ignored, so callers may pass unfiltered
/// query results.
pub fn evaluate_create(
    proposal: &ReservationProposal,
    existing_for_room: &[Reservation],
    existing_for_user: &[Reservation],
    policy: &ReservationPolicy,
    today: NaiveDate,
) -> Result<ValidatedReservation, RejectionReason> {
    // A past date is reported whatever the times look like
    check_not_past(proposal.date, today)?;
    check_block_length(proposal.start, proposal.end, policy)?;
    check_alignment(proposal.start, proposal.end)?;
    check_working_hours(proposal.start, proposal.end, policy)?;
    check_advance_window(proposal.date, today, policy)?;
    check_conflicts(proposal, existing_for_room)?;
    check_daily_quota(existing_for_user, policy)?;

    Ok(ValidatedReservation {
        user_id: proposal.user_id,
        room_id: proposal.room_id,
        date: proposal.date,
        start: proposal.start,
        end: proposal.end,
        status: ReservationStatus::Confirmed,
    })
}

fn check_block_length(
    start: NaiveTime,
    end: NaiveTime,
    policy: &ReservationPolicy,
) -> Result<(), RejectionReason> {
    if end - start != TimeDelta::minutes(i64::from(policy.block_minutes)) {
        return Err(RejectionReason::InvalidTimeBlock(format!(
            "Reservations must last exactly {} minutes",
            policy.block_minutes
        )));
    }
    Ok(())
}

fn is_on_the_hour(t: NaiveTime) -> bool {
    t.minute() == 0 && t.second() == 0 && t.nanosecond() == 0
}

fn check_alignment(start: NaiveTime, end: NaiveTime) -> Result<(), RejectionReason> {
    if !is_on_the_hour(start) || !is_on_the_hour(end) {
        return Err(RejectionReason::InvalidTimeBlock(
            "Reservations must start and end on the hour (e.g. 09:00-10:00)".to_string(),
        ));
    }
    Ok(())
}

fn check_working_hours(
    start: NaiveTime,
    end: NaiveTime,
    policy: &ReservationPolicy,
) -> Result<(), RejectionReason> {
    let (open, close) = policy.working_hours;
    if start.hour() < open || end.hour() > close {
        return Err(RejectionReason::InvalidTimeBlock(format!(
            "Reservations are only allowed between {:02}:00 and {:02}:00",
            open, close
        )));
    }
    Ok(())
}

fn check_not_past(date: NaiveDate, today: NaiveDate) -> Result<(), RejectionReason> {
    if date < today {
        return Err(RejectionReason::PastDateReservation);
    }
    Ok(())
}

fn check_advance_window(
    date: NaiveDate,
    today: NaiveDate,
    policy: &ReservationPolicy,
) -> Result<(), RejectionReason> {
    // An unrepresentable horizon is effectively unbounded
    let Some(horizon) = today.checked_add_days(Days::new(u64::from(policy.max_advance_days))) else {
        return Ok(());
    };

    if date > horizon {
        return Err(RejectionReason::AdvanceWindowExceeded {
            max_days: policy.max_advance_days,
        });
    }
    Ok(())
}

fn check_conflicts(
    proposal: &ReservationProposal,
    existing_for_room: &[Reservation],
) -> Result<(), RejectionReason> {
    let wanted = TimeSlot::new(proposal.start, proposal.end);

    let conflict = existing_for_room.iter().find(|r| {
        !r.is_cancelled()
            && r.room_id == proposal.room_id
            && r.reservation_date == proposal.date
            && wanted.overlaps(&TimeSlot::from(*r))
    });

    match conflict {
        Some(other) => Err(RejectionReason::TimeSlotNotAvailable {
            conflicting_id: Some(other.id),
            date: other.reservation_date,
            start: other.start_time,
            end: other.end_time,
        }),
        None => Ok(()),
    }
}

fn check_daily_quota(
    existing_for_user: &[Reservation],
    policy: &ReservationPolicy,
) -> Result<(), RejectionReason> {
    let active = existing_for_user.iter().filter(|r| !r.is_cancelled()).count();

    if active >= policy.max_daily_reservations as usize {
        return Err(RejectionReason::ReservationLimitExceeded {
            limit: policy.max_daily_reservations,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::test_support::{date, reservation, time};

    const USER: i64 = 7;
    const ROOM: i64 = 3;

    fn today() -> NaiveDate {
        date(2024, 2, 1)
    }

    fn proposal(day: NaiveDate, start: (u32, u32), end: (u32, u32)) -> ReservationProposal {
        ReservationProposal {
            user_id: USER,
            room_id: ROOM,
            date: day,
            start: time(start.0, start.1),
            end: time(end.0, end.1),
        }
    }

    fn evaluate(
        p: &ReservationProposal,
        room: &[Reservation],
        user: &[Reservation],
    ) -> Result<ValidatedReservation, RejectionReason> {
        evaluate_create(p, room, user, &ReservationPolicy::default(), today())
    }

    #[test]
    fn test_valid_proposal_is_confirmed() {
        let p = proposal(date(2024, 2, 15), (9, 0), (10, 0));
        let validated = evaluate(&p, &[], &[]).unwrap();

        assert_eq!(validated.status, ReservationStatus::Confirmed);
        assert_eq!(validated.user_id, USER);
        assert_eq!(validated.room_id, ROOM);
        assert_eq!(validated.start, time(9, 0));
        assert_eq!(validated.end, time(10, 0));
    }

    #[test]
    fn test_wrong_block_length_is_rejected() {
        let day = date(2024, 2, 15);
        for (start, end) in [((9, 0), (11, 0)), ((9, 0), (9, 30)), ((10, 0), (9, 0)), ((9, 0), (9, 0))] {
            let result = evaluate(&proposal(day, start, end), &[], &[]);
            assert!(
                matches!(result, Err(RejectionReason::InvalidTimeBlock(_))),
                "{start:?}-{end:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_off_the_hour_block_is_rejected() {
        let p = proposal(date(2024, 2, 15), (9, 15), (10, 15));
        assert!(matches!(
            evaluate(&p, &[], &[]),
            Err(RejectionReason::InvalidTimeBlock(_))
        ));
    }

    #[test]
    fn test_outside_working_hours_is_rejected() {
        let day = date(2024, 2, 15);
        for (start, end) in [((7, 0), (8, 0)), ((18, 0), (19, 0))] {
            assert!(matches!(
                evaluate(&proposal(day, start, end), &[], &[]),
                Err(RejectionReason::InvalidTimeBlock(_))
            ));
        }

        assert!(evaluate(&proposal(day, (8, 0), (9, 0)), &[], &[]).is_ok());
        assert!(evaluate(&proposal(day, (17, 0), (18, 0)), &[], &[]).is_ok());
    }

    #[test]
    fn test_past_date_is_rejected() {
        let p = proposal(date(2024, 1, 31), (9, 0), (10, 0));
        assert_eq!(evaluate(&p, &[], &[]), Err(RejectionReason::PastDateReservation));
    }

    #[test]
    fn test_past_date_wins_over_conflicts() {
        let past = date(2024, 1, 31);
        let room = vec![reservation(1, 99, ROOM, past, (9, 0), (10, 0), "confirmed")];
        let p = proposal(past, (9, 0), (10, 0));
        assert_eq!(evaluate(&p, &room, &[]), Err(RejectionReason::PastDateReservation));
    }

    #[test]
    fn test_past_date_wins_over_invalid_times() {
        let past = date(2024, 1, 31);
        for (start, end) in [((9, 15), (10, 15)), ((9, 0), (11, 0)), ((18, 0), (19, 0))] {
            assert_eq!(
                evaluate(&proposal(past, start, end), &[], &[]),
                Err(RejectionReason::PastDateReservation),
                "{start:?}-{end:?} on a past date"
            );
        }
    }

    #[test]
    fn test_today_is_bookable() {
        assert!(evaluate(&proposal(today(), (9, 0), (10, 0)), &[], &[]).is_ok());
    }

    #[test]
    fn test_advance_window() {
        let last_allowed = date(2024, 3, 2);
        assert!(evaluate(&proposal(last_allowed, (9, 0), (10, 0)), &[], &[]).is_ok());

        let too_far = date(2024, 3, 3);
        assert_eq!(
            evaluate(&proposal(too_far, (9, 0), (10, 0)), &[], &[]),
            Err(RejectionReason::AdvanceWindowExceeded { max_days: 30 })
        );
    }

    #[test]
    fn test_overlapping_slot_is_rejected() {
        let day = date(2024, 2, 15);
        let room = vec![reservation(11, 99, ROOM, day, (9, 0), (10, 0), "confirmed")];

        // Hour-aligned proposals can only overlap by coinciding
        let result = evaluate(&proposal(day, (9, 0), (10, 0)), &room, &[]);
        assert_eq!(
            result,
            Err(RejectionReason::TimeSlotNotAvailable {
                conflicting_id: Some(11),
                date: day,
                start: time(9, 0),
                end: time(10, 0),
            })
        );
    }

    #[test]
    fn test_half_hour_overlap_reports_invalid_block_first() {
        let day = date(2024, 2, 15);
        let room = vec![reservation(11, 99, ROOM, day, (9, 0), (10, 0), "confirmed")];

        assert!(matches!(
            evaluate(&proposal(day, (9, 30), (10, 30)), &room, &[]),
            Err(RejectionReason::InvalidTimeBlock(_))
        ));
    }

    #[test]
    fn test_conflict_rule_on_partial_overlap() {
        let day = date(2024, 2, 15);
        let room = vec![reservation(11, 99, ROOM, day, (9, 0), (10, 0), "confirmed")];

        assert!(matches!(
            check_conflicts(&proposal(day, (9, 30), (10, 30)), &room),
            Err(RejectionReason::TimeSlotNotAvailable { conflicting_id: Some(11), .. })
        ));
        assert!(check_conflicts(&proposal(day, (10, 0), (11, 0)), &room).is_ok());
    }

    #[test]
    fn test_adjacent_slot_is_accepted() {
        let day = date(2024, 2, 15);
        let room = vec![reservation(11, 99, ROOM, day, (9, 0), (10, 0), "confirmed")];
        assert!(evaluate(&proposal(day, (10, 0), (11, 0)), &room, &[]).is_ok());
        assert!(evaluate(&proposal(day, (8, 0), (9, 0)), &room, &[]).is_ok());
    }

    #[test]
    fn test_cancelled_reservations_do_not_conflict() {
        let day = date(2024, 2, 15);
        let room = vec![reservation(11, 99, ROOM, day, (9, 0), (10, 0), "cancelled")];
        assert!(evaluate(&proposal(day, (9, 0), (10, 0)), &room, &[]).is_ok());
    }

    #[test]
    fn test_other_rooms_do_not_conflict() {
        let day = date(2024, 2, 15);
        let room = vec![reservation(11, 99, ROOM + 1, day, (9, 0), (10, 0), "confirmed")];
        assert!(evaluate(&proposal(day, (9, 0), (10, 0)), &room, &[]).is_ok());
    }

    #[test]
    fn test_daily_quota_boundary() {
        let day = date(2024, 2, 15);
        let two = vec![
            reservation(1, USER, 1, day, (8, 0), (9, 0), "confirmed"),
            reservation(2, USER, 2, day, (9, 0), (10, 0), "confirmed"),
        ];
        assert!(evaluate(&proposal(day, (14, 0), (15, 0)), &[], &two).is_ok());

        let mut three = two.clone();
        three.push(reservation(3, USER, 4, day, (10, 0), (11, 0), "confirmed"));
        assert_eq!(
            evaluate(&proposal(day, (14, 0), (15, 0)), &[], &three),
            Err(RejectionReason::ReservationLimitExceeded { limit: 3 })
        );
    }

    #[test]
    fn test_quota_frees_up_after_cancellation() {
        let day = date(2024, 2, 15);
        let mut mine = vec![
            reservation(1, USER, 1, day, (8, 0), (9, 0), "confirmed"),
            reservation(2, USER, 2, day, (9, 0), (10, 0), "confirmed"),
            reservation(3, USER, 4, day, (10, 0), (11, 0), "confirmed"),
        ];
        let p = proposal(day, (14, 0), (15, 0));
        assert!(matches!(
            evaluate(&p, &[], &mine),
            Err(RejectionReason::ReservationLimitExceeded { .. })
        ));

        mine[1].status = "cancelled".to_string();
        assert!(evaluate(&p, &[], &mine).is_ok());
    }

    #[test]
    fn test_conflict_reported_before_quota() {
        let day = date(2024, 2, 15);
        let room = vec![reservation(11, 99, ROOM, day, (9, 0), (10, 0), "confirmed")];
        let mine = vec![
            reservation(1, USER, 1, day, (8, 0), (9, 0), "confirmed"),
            reservation(2, USER, 2, day, (10, 0), (11, 0), "confirmed"),
            reservation(3, USER, 4, day, (11, 0), (12, 0), "confirmed"),
        ];
        assert!(matches!(
            evaluate(&proposal(day, (9, 0), (10, 0)), &room, &mine),
            Err(RejectionReason::TimeSlotNotAvailable { .. })
        ));
    }

    #[test]
    fn test_custom_policy() {
        let policy = ReservationPolicy {
            block_minutes: 120,
            working_hours: (9, 17),
            max_advance_days: 7,
            max_daily_reservations: 1,
            ..Default::default()
        };
        let day = date(2024, 2, 5);

        assert!(evaluate_create(&proposal(day, (9, 0), (11, 0)), &[], &[], &policy, today()).is_ok());
        assert!(matches!(
            evaluate_create(&proposal(day, (9, 0), (10, 0)), &[], &[], &policy, today()),
            Err(RejectionReason::InvalidTimeBlock(_))
        ));
        assert!(matches!(
            evaluate_create(&proposal(day, (16, 0), (18, 0)), &[], &[], &policy, today()),
            Err(RejectionReason::InvalidTimeBlock(_))
        ));
        assert_eq!(
            evaluate_create(&proposal(date(2024, 2, 9), (9, 0), (11, 0)), &[], &[], &policy, today()),
            Err(RejectionReason::AdvanceWindowExceeded { max_days: 7 })
        );
    }
}
