// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::booking_code::BookingCodeError;
use rutero::{CoreError, UnavailabilityReason};
use rutero_domain::DomainError;
use rutero_persistence::StoreError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The requested window cannot be booked.
    ///
    /// An expected refusal, not a fault: the caller is told why and may
    /// pick another window.
    NotBookable {
        /// Why the window is closed.
        reason: UnavailabilityReason,
    },
    /// Another writer changed the booking since the caller read it.
    Conflict {
        /// A human-readable description of the conflict.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::NotBookable { reason } => write!(f, "Not bookable: {reason}"),
            Self::Conflict { message } => write!(f, "Conflict: {message}"),
            Self::Internal { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<BookingCodeError> for ApiError {
    fn from(err: BookingCodeError) -> Self {
        Self::InvalidInput {
            field: String::from("code"),
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidDuration { minutes } => ApiError::InvalidInput {
            field: String::from("duration_minutes"),
            message: format!("Invalid trip duration: {minutes}. Must be positive"),
        },
        DomainError::InvalidWindow { reason } => ApiError::InvalidInput {
            field: String::from("window"),
            message: reason,
        },
        DomainError::InvalidPassengerCount { count } => ApiError::InvalidInput {
            field: String::from("passengers"),
            message: format!("Invalid passenger count: {count}. Must be at least 1"),
        },
        DomainError::NoVehicleClassForPassengers {
            passengers,
            max_capacity,
        } => ApiError::DomainRuleViolation {
            rule: String::from("fleet_capacity"),
            message: format!(
                "No vehicle class seats {passengers} passengers (largest class seats {max_capacity})"
            ),
        },
        DomainError::EmptyField(field) => ApiError::InvalidInput {
            field: field.to_string(),
            message: String::from("Must not be empty"),
        },
        DomainError::InvalidBlockRule { rule_id, reason } => ApiError::InvalidInput {
            field: String::from("block_rule"),
            message: format!("Block rule {rule_id} is invalid: {reason}"),
        },
        DomainError::IncompleteReturnLeg => ApiError::InvalidInput {
            field: String::from("return_date"),
            message: String::from("Round trips require both a return date and a return time"),
        },
        DomainError::InvalidRate { field, value } => ApiError::InvalidInput {
            field: field.to_string(),
            message: format!("Invalid rate: {value}. Must be between 0.0 and 1.0"),
        },
        DomainError::NegativeAmount { field, value } => ApiError::InvalidInput {
            field: field.to_string(),
            message: format!("Invalid amount: {value}. Must not be negative"),
        },
        DomainError::InvalidState(state) => ApiError::InvalidInput {
            field: String::from("state"),
            message: format!("Unknown lifecycle state: '{state}'"),
        },
        DomainError::DateTimeOutOfRange { operation } => ApiError::InvalidInput {
            field: String::from("date"),
            message: format!("Date arithmetic overflow while {operation}"),
        },
    }
}

/// Translates an engine error into an API error.
///
/// This translation is explicit and ensures engine errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::TransitionNotAllowed { from, to } => ApiError::DomainRuleViolation {
            rule: String::from("lifecycle_table"),
            message: format!("A booking in '{from}' cannot move to '{to}'"),
        },
        CoreError::PreconditionFailed { target, reason } => ApiError::DomainRuleViolation {
            rule: String::from("transition_precondition"),
            message: format!("Cannot enter '{target}': {reason}"),
        },
        CoreError::PricingFrozen { state } => ApiError::DomainRuleViolation {
            rule: String::from("pricing_freeze"),
            message: format!("Pricing is frozen once a booking is '{state}'"),
        },
        CoreError::BookingSourceUnavailable { detail } => ApiError::Internal {
            message: format!("Booking list unavailable: {detail}"),
        },
        CoreError::StaleState { expected, actual } => ApiError::Conflict {
            message: format!(
                "The booking changed underneath you (version {expected} is now {actual}); re-read and retry"
            ),
        },
        CoreError::BookingNotFound(code) => ApiError::ResourceNotFound {
            resource_type: String::from("Booking"),
            message: format!("No booking with code '{code}'"),
        },
    }
}

/// Translates a store error into an API error.
#[must_use]
pub fn translate_store_error(err: StoreError) -> ApiError {
    match err {
        StoreError::BookingNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Booking"),
            message: format!("No booking with id {id}"),
        },
        StoreError::CodeNotFound(code) => ApiError::ResourceNotFound {
            resource_type: String::from("Booking"),
            message: format!("No booking with code '{code}'"),
        },
        StoreError::DuplicateCode(code) => ApiError::Conflict {
            message: format!("A booking with code '{code}' already exists"),
        },
        StoreError::Unavailable(reason) => ApiError::NotBookable { reason },
        StoreError::Engine(core_err) => translate_core_error(core_err),
        StoreError::LockPoisoned => ApiError::Internal {
            message: String::from("Store lock poisoned"),
        },
    }
}
