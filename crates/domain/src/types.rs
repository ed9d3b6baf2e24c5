// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use time::{Date, Time};

/// Represents a fixed point served by the fleet.
///
/// Places are normalized to uppercase so that route comparison is
/// case-insensitive. Two places are equal when their normalized names match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Place {
    /// The normalized place name.
    value: String,
}

impl Place {
    /// Creates a new `Place`.
    ///
    /// # Arguments
    ///
    /// * `value` - The place name (will be trimmed and normalized to uppercase)
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            value: value.trim().to_uppercase(),
        }
    }

    /// Returns the normalized place name.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns whether the place name is empty after normalization.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl std::fmt::Display for Place {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Contact details for the client holding a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientContact {
    /// The client's full name.
    pub name: String,
    /// The client's email address.
    pub email: String,
    /// The client's phone number.
    pub phone: String,
}

impl ClientContact {
    /// Creates a new `ClientContact`.
    ///
    /// # Arguments
    ///
    /// * `name` - The client's full name
    /// * `email` - The client's email address
    /// * `phone` - The client's phone number
    #[must_use]
    pub const fn new(name: String, email: String, phone: String) -> Self {
        Self { name, email, phone }
    }
}

/// A requested or booked trip between two fixed points.
///
/// The occupied time window is never stored on the trip; it is always
/// recomputed from `date` + `time` + the per-destination duration lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    /// The departure point.
    pub origin: Place,
    /// The arrival point.
    pub destination: Place,
    /// The departure date (local).
    pub date: Date,
    /// The departure time (local).
    pub time: Time,
    /// Number of passengers travelling.
    pub passengers: u32,
    /// Whether a return leg was requested.
    pub round_trip: bool,
    /// The return departure date, required when `round_trip` is set.
    pub return_date: Option<Date>,
    /// The return departure time, required when `round_trip` is set.
    pub return_time: Option<Time>,
}

impl Trip {
    /// Creates a one-way `Trip`.
    ///
    /// # Arguments
    ///
    /// * `origin` - The departure point
    /// * `destination` - The arrival point
    /// * `date` - The departure date
    /// * `time` - The departure time
    /// * `passengers` - Number of passengers
    ///
    /// # Errors
    ///
    /// Returns an error if `passengers` is zero or either endpoint is empty.
    pub fn one_way(
        origin: Place,
        destination: Place,
        date: Date,
        time: Time,
        passengers: u32,
    ) -> Result<Self, DomainError> {
        let trip = Self {
            origin,
            destination,
            date,
            time,
            passengers,
            round_trip: false,
            return_date: None,
            return_time: None,
        };
        trip.validate()?;
        Ok(trip)
    }

    /// Creates a round-trip `Trip` with a return leg.
    ///
    /// # Errors
    ///
    /// Returns an error if `passengers` is zero, either endpoint is empty,
    /// or the return date/time pair is incomplete.
    #[allow(clippy::too_many_arguments)]
    pub fn round_trip(
        origin: Place,
        destination: Place,
        date: Date,
        time: Time,
        passengers: u32,
        return_date: Date,
        return_time: Time,
    ) -> Result<Self, DomainError> {
        let trip = Self {
            origin,
            destination,
            date,
            time,
            passengers,
            round_trip: true,
            return_date: Some(return_date),
            return_time: Some(return_time),
        };
        trip.validate()?;
        Ok(trip)
    }

    /// Validates the trip's field constraints.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `passengers` is zero
    /// - origin or destination is empty
    /// - `round_trip` is set without both return fields
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.passengers == 0 {
            return Err(DomainError::InvalidPassengerCount {
                count: self.passengers,
            });
        }
        if self.origin.is_empty() {
            return Err(DomainError::EmptyField("origin"));
        }
        if self.destination.is_empty() {
            return Err(DomainError::EmptyField("destination"));
        }
        if self.round_trip && (self.return_date.is_none() || self.return_time.is_none()) {
            return Err(DomainError::IncompleteReturnLeg);
        }
        Ok(())
    }

    /// Returns whether `other` runs the mirrored route of this trip.
    ///
    /// A mirrored route swaps origin and destination: the other trip's
    /// vehicle ends up where this trip begins.
    #[must_use]
    pub fn mirrors(&self, other: &Self) -> bool {
        self.origin == other.destination && self.destination == other.origin
    }
}

/// Vehicle and driver assigned to a confirmed booking.
///
/// A booking either has no assignment or a complete one; vehicle and driver
/// are never set independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// The assigned vehicle's identifier.
    pub vehicle_id: i64,
    /// The assigned driver's identifier.
    pub driver_id: i64,
}

impl Assignment {
    /// Creates a new `Assignment`.
    #[must_use]
    pub const fn new(vehicle_id: i64, driver_id: i64) -> Self {
        Self {
            vehicle_id,
            driver_id,
        }
    }
}

/// A priced add-on attached to a booking (child seat, extra luggage, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extra {
    /// Human-readable label for the add-on.
    pub label: String,
    /// The add-on price in minor currency units.
    pub amount: i64,
}

impl Extra {
    /// Creates a new `Extra`.
    ///
    /// # Errors
    ///
    /// Returns an error if `amount` is negative.
    pub fn new(label: String, amount: i64) -> Result<Self, DomainError> {
        if amount < 0 {
            return Err(DomainError::NegativeAmount {
                field: "extra.amount",
                value: amount,
            });
        }
        Ok(Self { label, amount })
    }
}

/// A vehicle class in the fleet: seat capacity and how many vehicles exist.
///
/// Reference data, provided read-only by an external collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleClass {
    /// The class name (e.g., "Sedan", "Van").
    pub name: String,
    /// Maximum passengers one vehicle of this class seats.
    pub seats: u32,
    /// Number of vehicles of this class in the fleet.
    pub fleet_size: u32,
}

impl VehicleClass {
    /// Creates a new `VehicleClass`.
    #[must_use]
    pub const fn new(name: String, seats: u32, fleet_size: u32) -> Self {
        Self {
            name,
            seats,
            fleet_size,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use time::macros::{date, time};

    #[test]
    fn test_place_normalization() {
        let a: Place = Place::new("  santiago ");
        let b: Place = Place::new("SANTIAGO");
        assert_eq!(a, b);
        assert_eq!(a.value(), "SANTIAGO");
    }

    #[test]
    fn test_trip_rejects_zero_passengers() {
        let result = Trip::one_way(
            Place::new("A"),
            Place::new("B"),
            date!(2026 - 09 - 01),
            time!(10:00),
            0,
        );
        assert_eq!(result, Err(DomainError::InvalidPassengerCount { count: 0 }));
    }

    #[test]
    fn test_trip_rejects_empty_endpoints() {
        let result = Trip::one_way(
            Place::new("  "),
            Place::new("B"),
            date!(2026 - 09 - 01),
            time!(10:00),
            2,
        );
        assert_eq!(result, Err(DomainError::EmptyField("origin")));
    }

    #[test]
    fn test_round_trip_requires_return_fields() {
        let mut trip = Trip::one_way(
            Place::new("A"),
            Place::new("B"),
            date!(2026 - 09 - 01),
            time!(10:00),
            2,
        )
        .unwrap();
        trip.round_trip = true;
        assert_eq!(trip.validate(), Err(DomainError::IncompleteReturnLeg));
    }

    #[test]
    fn test_mirrored_route_detection() {
        let outbound = Trip::one_way(
            Place::new("Airport"),
            Place::new("Downtown"),
            date!(2026 - 09 - 01),
            time!(10:00),
            2,
        )
        .unwrap();
        let inbound = Trip::one_way(
            Place::new("downtown"),
            Place::new("airport"),
            date!(2026 - 09 - 01),
            time!(14:00),
            3,
        )
        .unwrap();
        assert!(outbound.mirrors(&inbound));
        assert!(inbound.mirrors(&outbound));
        assert!(!outbound.mirrors(&outbound));
    }

    #[test]
    fn test_extra_rejects_negative_amount() {
        let result = Extra::new(String::from("Child seat"), -100);
        assert!(result.is_err());
    }
}
