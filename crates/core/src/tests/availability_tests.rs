// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    FailingBookings, FailingRules, FixedBookings, FixedRules, advance, draft_booking, durations,
    fleet, full_day_block,
};
use crate::{
    Availability, Booking, CapacityChecker, CoreError, UnavailabilityReason, count_overlapping,
};
use rutero_domain::{ReservationState, TimeWindow, window_for};
use time::macros::{date, time};

/// A confirmed sedan booking occupying [10:00, 11:00) on 2026-09-01.
fn confirmed_sedan() -> Booking {
    advance(
        draft_booking(
            "RB-2001",
            "Airport",
            "Downtown",
            date!(2026 - 09 - 01),
            time!(10:00),
            2,
        ),
        &[ReservationState::Pending, ReservationState::Confirmed],
    )
}

fn window(hour: u8, minute: u8) -> TimeWindow {
    window_for(
        date!(2026 - 09 - 01),
        time::Time::from_hms(hour, minute, 0).unwrap(),
        60,
    )
    .unwrap()
}

#[test]
fn test_overlapping_window_exhausts_single_sedan() {
    let rules = FixedRules(Vec::new());
    let bookings = FixedBookings(vec![confirmed_sedan()]);
    let fleet = fleet();
    let durations = durations();
    let checker = CapacityChecker::new(&rules, &bookings, &fleet, &durations);

    let result: Availability = checker.check_availability(&window(10, 30), 2).unwrap();
    assert!(!result.available);
    assert_eq!(
        result.reason,
        Some(UnavailabilityReason::NoVehicles {
            class: String::from("Sedan"),
        })
    );
}

#[test]
fn test_back_to_back_windows_do_not_collide() {
    let rules = FixedRules(Vec::new());
    let bookings = FixedBookings(vec![confirmed_sedan()]);
    let fleet = fleet();
    let durations = durations();
    let checker = CapacityChecker::new(&rules, &bookings, &fleet, &durations);

    // The held window ends at 11:00 exactly; a request starting then fits.
    let result: Availability = checker.check_availability(&window(11, 0), 2).unwrap();
    assert!(result.available);
    assert!(result.reason.is_none());
}

#[test]
fn test_check_is_idempotent_between_writes() {
    let rules = FixedRules(Vec::new());
    let bookings = FixedBookings(vec![confirmed_sedan()]);
    let fleet = fleet();
    let durations = durations();
    let checker = CapacityChecker::new(&rules, &bookings, &fleet, &durations);

    let first: Availability = checker.check_availability(&window(10, 30), 2).unwrap();
    let second: Availability = checker.check_availability(&window(10, 30), 2).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_other_class_is_unaffected_by_sedan_exhaustion() {
    let rules = FixedRules(Vec::new());
    let bookings = FixedBookings(vec![confirmed_sedan()]);
    let fleet = fleet();
    let durations = durations();
    let checker = CapacityChecker::new(&rules, &bookings, &fleet, &durations);

    // Seven passengers need a Van, and both Vans are free.
    let result: Availability = checker.check_availability(&window(10, 30), 7).unwrap();
    assert!(result.available);
}

#[test]
fn test_drafts_and_cancellations_hold_no_vehicle() {
    let draft: Booking = draft_booking(
        "RB-2002",
        "Airport",
        "Downtown",
        date!(2026 - 09 - 01),
        time!(10:00),
        2,
    );
    let cancelled: Booking = advance(
        draft_booking(
            "RB-2003",
            "Airport",
            "Downtown",
            date!(2026 - 09 - 01),
            time!(10:00),
            2,
        ),
        &[ReservationState::Pending, ReservationState::Cancelled],
    );

    let rules = FixedRules(Vec::new());
    let bookings = FixedBookings(vec![draft, cancelled]);
    let fleet = fleet();
    let durations = durations();
    let checker = CapacityChecker::new(&rules, &bookings, &fleet, &durations);

    let result: Availability = checker.check_availability(&window(10, 30), 2).unwrap();
    assert!(result.available);
}

#[test]
fn test_blocked_window_wins_over_free_vehicles() {
    let rules = FixedRules(vec![full_day_block(
        date!(2026 - 09 - 01),
        "Fleet maintenance day",
    )]);
    let bookings = FixedBookings(Vec::new());
    let fleet = fleet();
    let durations = durations();
    let checker = CapacityChecker::new(&rules, &bookings, &fleet, &durations);

    let result: Availability = checker.check_availability(&window(10, 0), 2).unwrap();
    assert_eq!(
        result.reason,
        Some(UnavailabilityReason::Blocked {
            reason: String::from("Fleet maintenance day"),
        })
    );
}

#[test]
fn test_unreachable_rule_source_fails_open() {
    let rules = FailingRules;
    let bookings = FixedBookings(Vec::new());
    let fleet = fleet();
    let durations = durations();
    let checker = CapacityChecker::new(&rules, &bookings, &fleet, &durations);

    let result: Availability = checker.check_availability(&window(10, 0), 2).unwrap();
    assert!(result.available);
}

#[test]
fn test_unreachable_booking_list_fails_closed() {
    let rules = FixedRules(Vec::new());
    let bookings = FailingBookings;
    let fleet = fleet();
    let durations = durations();
    let checker = CapacityChecker::new(&rules, &bookings, &fleet, &durations);

    let result = checker.check_availability(&window(10, 0), 2);
    assert!(matches!(
        result,
        Err(CoreError::BookingSourceUnavailable { .. })
    ));
}

#[test]
fn test_oversized_party_is_a_domain_error() {
    let rules = FixedRules(Vec::new());
    let bookings = FixedBookings(Vec::new());
    let fleet = fleet();
    let durations = durations();
    let checker = CapacityChecker::new(&rules, &bookings, &fleet, &durations);

    let result = checker.check_availability(&window(10, 0), 11);
    assert!(matches!(result, Err(CoreError::DomainViolation(_))));
}

#[test]
fn test_unclassifiable_booking_counts_against_the_requested_class() {
    // A stored booking whose passenger count the catalog cannot size must
    // still consume capacity rather than silently vanish from the count.
    let mut oversized: Booking = confirmed_sedan();
    oversized.trip.passengers = 99;

    let fleet = fleet();
    let durations = durations();
    let sedan = fleet.classes()[0].clone();
    let count: u32 = count_overlapping(
        &[oversized],
        &window(10, 30),
        &sedan,
        &fleet,
        &durations,
    );
    assert_eq!(count, 1);
}

#[test]
fn test_capacity_counts_all_reserving_states() {
    let pending: Booking = advance(
        draft_booking(
            "RB-2004",
            "Airport",
            "Downtown",
            date!(2026 - 09 - 01),
            time!(10:00),
            2,
        ),
        &[ReservationState::Pending],
    );
    let in_progress: Booking = advance(
        draft_booking(
            "RB-2005",
            "Airport",
            "Downtown",
            date!(2026 - 09 - 01),
            time!(10:15),
            2,
        ),
        &[
            ReservationState::Pending,
            ReservationState::Confirmed,
            ReservationState::Assigned,
            ReservationState::InProgress,
        ],
    );

    let fleet = fleet();
    let durations = durations();
    let sedan = fleet.classes()[0].clone();
    let count: u32 = count_overlapping(
        &[pending, in_progress],
        &window(10, 30),
        &sedan,
        &fleet,
        &durations,
    );
    assert_eq!(count, 2);
}
