// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    BlockRuleSource, Booking, BookingSource, SourceUnavailable, StaticDurationTable,
    StaticFleetCatalog, attempt_transition,
};
use rutero_audit::Actor;
use rutero_domain::{
    Assignment, BlockKind, BlockRule, ClientContact, Place, PricingBreakdown, PricingContext,
    ReservationState, Trip, VehicleClass, compute_breakdown,
};
use time::macros::datetime;
use time::{Date, Time};

pub fn operator() -> Actor {
    Actor::new(String::from("op-1"), String::from("operator"))
}

pub fn client(name: &str, email: &str) -> ClientContact {
    ClientContact::new(
        String::from(name),
        String::from(email),
        String::from("+56 9 1234 5678"),
    )
}

pub fn base_pricing() -> PricingBreakdown {
    compute_breakdown(30000, &[], &PricingContext::empty()).unwrap()
}

pub fn draft_booking(
    code: &str,
    origin: &str,
    destination: &str,
    date: Date,
    time: Time,
    passengers: u32,
) -> Booking {
    let trip: Trip = Trip::one_way(
        Place::new(origin),
        Place::new(destination),
        date,
        time,
        passengers,
    )
    .unwrap();
    Booking::new(
        String::from(code),
        client("Ada Lovelace", "ada@example.com"),
        trip,
        base_pricing(),
    )
    .unwrap()
}

/// Walks a booking through the given states, assigning a vehicle and
/// driver just before the `Assigned` step when none is set.
pub fn advance(mut booking: Booking, path: &[ReservationState]) -> Booking {
    for &target in path {
        if target == ReservationState::Assigned && booking.assignment.is_none() {
            booking.set_assignment(Assignment::new(1, 1));
        }
        booking = attempt_transition(
            &booking,
            target,
            operator(),
            datetime!(2026 - 09 - 01 08:00),
            None,
        )
        .unwrap()
        .new_booking;
    }
    booking
}

/// Standard two-class fleet: one Sedan (3 seats), two Vans (10 seats).
pub fn fleet() -> StaticFleetCatalog {
    StaticFleetCatalog::new(vec![
        VehicleClass::new(String::from("Sedan"), 3, 1),
        VehicleClass::new(String::from("Van"), 10, 2),
    ])
}

/// Duration table: trips to Downtown take one hour.
pub fn durations() -> StaticDurationTable {
    StaticDurationTable::new(vec![(Place::new("Downtown"), 60)])
}

pub fn full_day_block(date: Date, reason: &str) -> BlockRule {
    BlockRule {
        id: 1,
        kind: BlockKind::FullDay,
        date_start: date,
        date_end: None,
        time_start: None,
        time_end: None,
        active: true,
        reason: String::from(reason),
    }
}

pub struct FixedRules(pub Vec<BlockRule>);

impl BlockRuleSource for FixedRules {
    fn active_rules(&self) -> Result<Vec<BlockRule>, SourceUnavailable> {
        Ok(self.0.clone())
    }
}

pub struct FailingRules;

impl BlockRuleSource for FailingRules {
    fn active_rules(&self) -> Result<Vec<BlockRule>, SourceUnavailable> {
        Err(SourceUnavailable {
            source: "block_rules",
            detail: String::from("connection refused"),
        })
    }
}

pub struct FixedBookings(pub Vec<Booking>);

impl BookingSource for FixedBookings {
    fn active_bookings(&self) -> Result<Vec<Booking>, SourceUnavailable> {
        Ok(self.0.clone())
    }
}

pub struct FailingBookings;

impl BookingSource for FailingBookings {
    fn active_bookings(&self) -> Result<Vec<Booking>, SourceUnavailable> {
        Err(SourceUnavailable {
            source: "bookings",
            detail: String::from("connection refused"),
        })
    }
}
