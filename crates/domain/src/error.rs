// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Trip duration must be strictly positive.
    InvalidDuration {
        /// The invalid duration in minutes.
        minutes: i64,
    },
    /// A time window must end after it starts.
    InvalidWindow {
        /// Description of the violation.
        reason: String,
    },
    /// Passenger count is outside the bookable range.
    InvalidPassengerCount {
        /// The invalid count value.
        count: u32,
    },
    /// No vehicle class can seat the requested passenger count.
    NoVehicleClassForPassengers {
        /// The requested passenger count.
        passengers: u32,
        /// The largest seat capacity available.
        max_capacity: u32,
    },
    /// A required text field is empty.
    EmptyField(&'static str),
    /// A block rule's fields violate its kind's constraints.
    InvalidBlockRule {
        /// The offending rule identifier.
        rule_id: i64,
        /// Description of the violation.
        reason: String,
    },
    /// Round-trip bookings require both return date and return time.
    IncompleteReturnLeg,
    /// A percentage rate is outside `[0.0, 1.0]`.
    InvalidRate {
        /// The name of the rate field.
        field: &'static str,
        /// The invalid value.
        value: f64,
    },
    /// A monetary amount must not be negative.
    NegativeAmount {
        /// The name of the amount field.
        field: &'static str,
        /// The invalid value in minor units.
        value: i64,
    },
    /// A reservation state string could not be parsed.
    InvalidState(String),
    /// A date/time could not be combined into a valid instant.
    DateTimeOutOfRange {
        /// Description of the failed operation.
        operation: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDuration { minutes } => {
                write!(f, "Trip duration must be positive, got {minutes} minutes")
            }
            Self::InvalidWindow { reason } => write!(f, "Invalid time window: {reason}"),
            Self::InvalidPassengerCount { count } => {
                write!(f, "Passenger count must be at least 1, got {count}")
            }
            Self::NoVehicleClassForPassengers {
                passengers,
                max_capacity,
            } => {
                write!(
                    f,
                    "No vehicle class seats {passengers} passengers (largest seats {max_capacity})"
                )
            }
            Self::EmptyField(field) => write!(f, "Field '{field}' cannot be empty"),
            Self::InvalidBlockRule { rule_id, reason } => {
                write!(f, "Block rule {rule_id} is invalid: {reason}")
            }
            Self::IncompleteReturnLeg => {
                write!(
                    f,
                    "Round-trip bookings require both a return date and a return time"
                )
            }
            Self::InvalidRate { field, value } => {
                write!(f, "Rate '{field}' must be within [0.0, 1.0], got {value}")
            }
            Self::NegativeAmount { field, value } => {
                write!(f, "Amount '{field}' must not be negative, got {value}")
            }
            Self::InvalidState(value) => write!(f, "Unknown reservation state: {value}"),
            Self::DateTimeOutOfRange { operation } => {
                write!(f, "Date/time out of range while {operation}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
