// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rutero_domain::{DomainError, ReservationState};

/// Errors that can occur in the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// The requested transition is not in the lifecycle table.
    TransitionNotAllowed {
        /// The booking's current state.
        from: ReservationState,
        /// The requested target state.
        to: ReservationState,
    },
    /// The transition exists but its precondition is unmet.
    ///
    /// The booking is unchanged; no history entry is recorded.
    PreconditionFailed {
        /// The requested target state.
        target: ReservationState,
        /// The unmet precondition.
        reason: String,
    },
    /// Pricing is frozen and may no longer be recomputed.
    PricingFrozen {
        /// The state the booking is in.
        state: ReservationState,
    },
    /// The booking list could not be read.
    ///
    /// The capacity count fails closed on this: undercounting concurrent
    /// bookings risks double-booking, the worse failure.
    BookingSourceUnavailable {
        /// Description of the transport failure.
        detail: String,
    },
    /// A concurrent writer won the race; the caller holds stale data.
    ///
    /// The caller may retry the whole operation once with fresh data.
    StaleState {
        /// The version the caller based its write on.
        expected: u64,
        /// The version actually stored.
        actual: u64,
    },
    /// The booking was not found in the store.
    BookingNotFound(String),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::TransitionNotAllowed { from, to } => {
                write!(f, "Transition from '{from}' to '{to}' is not allowed")
            }
            Self::PreconditionFailed { target, reason } => {
                write!(f, "Cannot enter '{target}': {reason}")
            }
            Self::PricingFrozen { state } => {
                write!(f, "Pricing is frozen once a booking is '{state}'")
            }
            Self::BookingSourceUnavailable { detail } => {
                write!(f, "Booking list unavailable: {detail}")
            }
            Self::StaleState { expected, actual } => {
                write!(
                    f,
                    "Stale booking version: expected {expected}, found {actual}"
                )
            }
            Self::BookingNotFound(code) => write!(f, "Booking '{code}' not found"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
