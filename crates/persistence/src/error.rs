// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rutero::{CoreError, UnavailabilityReason};
use rutero_domain::DomainError;

/// Errors that can occur during store operations.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// No booking with the given identifier exists.
    BookingNotFound(i64),
    /// No booking with the given reference code exists.
    CodeNotFound(String),
    /// A booking with this reference code already exists.
    DuplicateCode(String),
    /// The reservation was refused at admission.
    ///
    /// This is the check-and-reserve critical section saying no: between
    /// the caller's read and this write, capacity ran out or a block rule
    /// landed.
    Unavailable(UnavailabilityReason),
    /// An engine error occurred (stale version, bad transition, ...).
    Engine(CoreError),
    /// The store lock was poisoned by a panicking writer.
    LockPoisoned,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BookingNotFound(id) => write!(f, "Booking not found: {id}"),
            Self::CodeNotFound(code) => write!(f, "Booking not found: '{code}'"),
            Self::DuplicateCode(code) => {
                write!(f, "A booking with code '{code}' already exists")
            }
            Self::Unavailable(reason) => write!(f, "Reservation refused: {reason}"),
            Self::Engine(err) => write!(f, "{err}"),
            Self::LockPoisoned => write!(f, "Store lock poisoned"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<CoreError> for StoreError {
    fn from(err: CoreError) -> Self {
        Self::Engine(err)
    }
}

impl From<DomainError> for StoreError {
    fn from(err: DomainError) -> Self {
        Self::Engine(CoreError::DomainViolation(err))
    }
}
