// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Admission control over the fleet's time-window capacity.
//!
//! A request is admitted when its window is not blocked and at least one
//! vehicle of the class sized for the passenger count is free for the whole
//! window.
//!
//! ## Failure asymmetry
//!
//! The block-rule source fails **open**: availability must never be stuck
//! because ancillary blocking data is unreachable, so an unreadable rule
//! set counts as "not blocked" and surfaces a warning. The booking list
//! fails **closed**: undercounting concurrent bookings risks double-booking,
//! the worse failure, so an unreadable booking list makes the request
//! unavailable with an error.
//!
//! A plain `check_availability` is a read; the atomic check-and-reserve
//! critical section lives in the store, which calls [`count_overlapping`]
//! under its write lock.

use crate::booking::Booking;
use crate::error::CoreError;
use crate::sources::{BlockRuleSource, BookingSource, DurationTable, FleetCatalog};
use rutero_domain::{BlockDecision, TimeWindow, VehicleClass, is_window_blocked};
use serde::{Deserialize, Serialize};

/// Why a window is not bookable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum UnavailabilityReason {
    /// An operator block rule covers the window.
    Blocked {
        /// The blocking rule's reason.
        reason: String,
    },
    /// Every vehicle of the sized class overlaps the window.
    NoVehicles {
        /// The vehicle class that is exhausted.
        class: String,
    },
}

impl std::fmt::Display for UnavailabilityReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blocked { reason } => write!(f, "Blocked: {reason}"),
            Self::NoVehicles { class } => {
                write!(f, "No {class} vehicles free for the requested window")
            }
        }
    }
}

/// The outcome of an availability check.
///
/// Unavailability is a normal, expected outcome, not a fault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    /// Whether at least one vehicle is free for the window.
    pub available: bool,
    /// Why not, when unavailable.
    pub reason: Option<UnavailabilityReason>,
}

impl Availability {
    /// The "bookable" outcome.
    #[must_use]
    pub const fn open() -> Self {
        Self {
            available: true,
            reason: None,
        }
    }

    /// An "unavailable" outcome with its reason.
    #[must_use]
    pub const fn closed(reason: UnavailabilityReason) -> Self {
        Self {
            available: false,
            reason: Some(reason),
        }
    }
}

/// Counts the bookings that hold a vehicle of `class` during `window`.
///
/// Only bookings in vehicle-reserving states count (everything except
/// `Draft` and `Cancelled`). A booking whose passenger count the catalog
/// cannot size is counted against `class` rather than skipped, so a
/// misconfigured catalog can only over-reserve, never double-book.
pub fn count_overlapping(
    bookings: &[Booking],
    window: &TimeWindow,
    class: &VehicleClass,
    fleet: &dyn FleetCatalog,
    durations: &dyn DurationTable,
) -> u32 {
    let mut count: u32 = 0;
    for booking in bookings {
        if !booking.state().reserves_vehicle() {
            continue;
        }
        let same_class: bool = match fleet.class_for(booking.trip.passengers) {
            Ok(booked_class) => booked_class.name == class.name,
            Err(_) => true,
        };
        if !same_class {
            continue;
        }
        if booking
            .window(durations)
            .is_ok_and(|occupied| occupied.overlaps(window))
        {
            count += 1;
        }
    }
    count
}

/// Admission-control reads over injected reference data.
pub struct CapacityChecker<'a> {
    rules: &'a dyn BlockRuleSource,
    bookings: &'a dyn BookingSource,
    fleet: &'a dyn FleetCatalog,
    durations: &'a dyn DurationTable,
}

impl<'a> CapacityChecker<'a> {
    /// Creates a checker over the given sources.
    #[must_use]
    pub const fn new(
        rules: &'a dyn BlockRuleSource,
        bookings: &'a dyn BookingSource,
        fleet: &'a dyn FleetCatalog,
        durations: &'a dyn DurationTable,
    ) -> Self {
        Self {
            rules,
            bookings,
            fleet,
            durations,
        }
    }

    /// Determines whether at least one vehicle is free for `window`.
    ///
    /// Idempotent between writes: two calls with no intervening
    /// reservation return the same result.
    ///
    /// # Arguments
    ///
    /// * `window` - The requested occupation window
    /// * `passengers` - The passenger count the vehicle must seat
    ///
    /// # Errors
    ///
    /// * `CoreError::DomainViolation` if no vehicle class seats
    ///   `passengers`
    /// * `CoreError::BookingSourceUnavailable` if the booking list cannot
    ///   be read (fails closed)
    pub fn check_availability(
        &self,
        window: &TimeWindow,
        passengers: u32,
    ) -> Result<Availability, CoreError> {
        let class: VehicleClass = self.fleet.class_for(passengers)?;

        if let Some(reason) = self.blocked_reason(window) {
            return Ok(Availability::closed(UnavailabilityReason::Blocked {
                reason,
            }));
        }

        let bookings: Vec<Booking> =
            self.bookings
                .active_bookings()
                .map_err(|err| CoreError::BookingSourceUnavailable {
                    detail: err.to_string(),
                })?;

        let occupied: u32 =
            count_overlapping(&bookings, window, &class, self.fleet, self.durations);
        if occupied >= class.fleet_size {
            return Ok(Availability::closed(UnavailabilityReason::NoVehicles {
                class: class.name,
            }));
        }

        Ok(Availability::open())
    }

    /// Evaluates the block rules for `window`, failing open when the rule
    /// source is unreachable.
    fn blocked_reason(&self, window: &TimeWindow) -> Option<String> {
        match self.rules.active_rules() {
            Ok(rules) => {
                let decision: BlockDecision = is_window_blocked(&rules, window);
                if decision.blocked {
                    decision
                        .reason
                        .or_else(|| Some(String::from("blocked by an operator rule")))
                } else {
                    None
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "block rules unavailable, treating window as not blocked");
                None
            }
        }
    }
}
