// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read contracts for the reference data the engine consumes.
//!
//! The engine never owns fleet composition, trip durations, block rules, or
//! the booking list; external collaborators provide them behind these
//! traits. Implementations may be in-memory tables (tests, the bundled
//! store) or remote services.

use crate::booking::Booking;
use rutero_domain::{BlockRule, DomainError, Place, VehicleClass};

/// Estimated trip length used when no per-destination duration is
/// configured. Two hours covers the longest regular transfer routes.
pub const DEFAULT_TRIP_DURATION_MINUTES: i64 = 120;

/// A reference-data source could not be reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnavailable {
    /// The name of the source that failed.
    pub source: &'static str,
    /// Description of the transport failure.
    pub detail: String,
}

impl std::fmt::Display for SourceUnavailable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Source '{}' unavailable: {}", self.source, self.detail)
    }
}

impl std::error::Error for SourceUnavailable {}

/// Read access to the fleet's vehicle-class capacity table.
pub trait FleetCatalog {
    /// Returns the smallest vehicle class that seats `passengers`.
    ///
    /// # Errors
    ///
    /// Returns an error if `passengers` is zero or no class seats that many.
    fn class_for(&self, passengers: u32) -> Result<VehicleClass, DomainError>;
}

/// Read access to per-destination estimated trip durations.
pub trait DurationTable {
    /// Returns the configured duration for trips to `destination`, in
    /// minutes, or `None` when unconfigured.
    fn duration_minutes(&self, destination: &Place) -> Option<i64>;
}

/// Resolves a destination's trip duration, falling back to the documented
/// default when unconfigured.
pub fn resolve_duration(durations: &dyn DurationTable, destination: &Place) -> i64 {
    durations
        .duration_minutes(destination)
        .unwrap_or(DEFAULT_TRIP_DURATION_MINUTES)
}

/// Read access to the operator-defined block rules.
pub trait BlockRuleSource {
    /// Returns the currently active block rules.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store is unreachable. Callers of
    /// the availability path fail open on this error.
    fn active_rules(&self) -> Result<Vec<BlockRule>, SourceUnavailable>;
}

/// Read access to the current set of non-cancelled bookings.
pub trait BookingSource {
    /// Returns every booking not in the `Cancelled` state, with its trip
    /// fields populated.
    ///
    /// # Errors
    ///
    /// Returns an error when the booking list cannot be read. The capacity
    /// count fails closed on this error.
    fn active_bookings(&self) -> Result<Vec<Booking>, SourceUnavailable>;
}

/// An in-memory fleet catalog over a fixed class table.
///
/// Classes are kept sorted by seat capacity so `class_for` picks the
/// smallest class that fits.
#[derive(Debug, Clone, Default)]
pub struct StaticFleetCatalog {
    classes: Vec<VehicleClass>,
}

impl StaticFleetCatalog {
    /// Creates a catalog from a class table.
    #[must_use]
    pub fn new(mut classes: Vec<VehicleClass>) -> Self {
        classes.sort_by_key(|class| class.seats);
        Self { classes }
    }

    /// Returns the configured classes, smallest first.
    #[must_use]
    pub fn classes(&self) -> &[VehicleClass] {
        &self.classes
    }
}

impl FleetCatalog for StaticFleetCatalog {
    fn class_for(&self, passengers: u32) -> Result<VehicleClass, DomainError> {
        if passengers == 0 {
            return Err(DomainError::InvalidPassengerCount { count: passengers });
        }
        self.classes
            .iter()
            .find(|class| class.seats >= passengers)
            .cloned()
            .ok_or_else(|| DomainError::NoVehicleClassForPassengers {
                passengers,
                max_capacity: self.classes.last().map_or(0, |class| class.seats),
            })
    }
}

/// An in-memory duration table keyed by destination.
#[derive(Debug, Clone, Default)]
pub struct StaticDurationTable {
    entries: Vec<(Place, i64)>,
}

impl StaticDurationTable {
    /// Creates a table from `(destination, minutes)` pairs.
    #[must_use]
    pub fn new(entries: Vec<(Place, i64)>) -> Self {
        Self { entries }
    }
}

impl DurationTable for StaticDurationTable {
    fn duration_minutes(&self, destination: &Place) -> Option<i64> {
        self.entries
            .iter()
            .find(|(place, _)| place == destination)
            .map(|(_, minutes)| *minutes)
    }
}
