// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! In-memory booking store for the Rutero booking system.
//!
//! The store is the single writer for bookings: every mutation happens
//! under one lock, and the check-and-reserve admission runs its capacity
//! count inside that critical section so two concurrent requests can never
//! both take the last vehicle.
//!
//! ## Concurrency model
//!
//! - one `Mutex` over the whole booking table; writes serialize
//! - reads clone out of the lock, so stale reads are possible by design
//! - every write takes the caller's `expected_version` and refuses with
//!   `StaleState` when a concurrent writer got there first
//!
//! The availability read path (`CapacityChecker`) stays advisory; only the
//! admission performed here is authoritative.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;

pub use error::StoreError;

use rutero::{
    BlockRuleSource, Booking, BookingSource, CoreError, DurationTable, FleetCatalog,
    SourceUnavailable, UnavailabilityReason, attempt_transition, count_overlapping,
};
use rutero_audit::{Actor, StateEvent};
use rutero_domain::{
    BlockDecision, ReservationState, TimeWindow, VehicleClass, is_window_blocked,
};
use std::sync::{Mutex, MutexGuard};
use time::PrimitiveDateTime;

struct Inner {
    bookings: Vec<Booking>,
    next_id: i64,
}

/// The in-memory booking table and its single write lock.
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                bookings: Vec::new(),
                next_id: 1,
            }),
        }
    }

    fn locked(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Persists a new booking, assigning its canonical identifier.
    ///
    /// The booking must not have an identifier yet and its reference code
    /// must be unique.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is already taken or the booking was
    /// already persisted.
    pub fn create(&self, mut booking: Booking) -> Result<Booking, StoreError> {
        let mut inner = self.locked()?;
        if let Some(id) = booking.id {
            return Err(StoreError::Engine(CoreError::PreconditionFailed {
                target: booking.state(),
                reason: format!("booking {id} is already persisted"),
            }));
        }
        if inner
            .bookings
            .iter()
            .any(|existing| existing.code() == booking.code())
        {
            return Err(StoreError::DuplicateCode(booking.code().to_string()));
        }

        booking.id = Some(inner.next_id);
        inner.next_id += 1;
        inner.bookings.push(booking.clone());
        tracing::info!(id = booking.id, code = booking.code(), "booking created");
        Ok(booking)
    }

    /// Fetches a booking by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if no booking has this identifier.
    pub fn get(&self, id: i64) -> Result<Booking, StoreError> {
        let inner = self.locked()?;
        inner
            .bookings
            .iter()
            .find(|booking| booking.id == Some(id))
            .cloned()
            .ok_or(StoreError::BookingNotFound(id))
    }

    /// Fetches a booking by reference code.
    ///
    /// # Errors
    ///
    /// Returns an error if no booking carries this code.
    pub fn find_by_code(&self, code: &str) -> Result<Booking, StoreError> {
        let inner = self.locked()?;
        inner
            .bookings
            .iter()
            .find(|booking| booking.code() == code)
            .cloned()
            .ok_or_else(|| StoreError::CodeNotFound(code.to_string()))
    }

    /// Returns every stored booking in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error only if the lock is poisoned.
    pub fn all(&self) -> Result<Vec<Booking>, StoreError> {
        Ok(self.locked()?.bookings.clone())
    }

    /// Replaces a stored booking with a locally mutated copy.
    ///
    /// `expected_version` is the version the caller read before mutating;
    /// the write is refused when another writer has since moved it.
    ///
    /// # Errors
    ///
    /// Returns `StaleState` on a version mismatch, or not-found errors.
    pub fn save(&self, booking: Booking, expected_version: u64) -> Result<Booking, StoreError> {
        let mut inner = self.locked()?;
        let slot = find_mut(&mut inner, &booking)?;
        if slot.version() != expected_version {
            return Err(StoreError::Engine(CoreError::StaleState {
                expected: expected_version,
                actual: slot.version(),
            }));
        }
        *slot = booking.clone();
        Ok(booking)
    }

    /// Atomically admits a draft booking into the `Pending` state.
    ///
    /// This is the single-writer critical section: the capacity count and
    /// the state transition happen under one lock, so concurrent requests
    /// for the last vehicle serialize and exactly one wins.
    ///
    /// Block rules are evaluated fail-open and the booking list count
    /// needs no external read because the table itself is locked.
    ///
    /// # Errors
    ///
    /// * `StoreError::Unavailable` when a block rule covers the window or
    ///   every vehicle of the sized class is taken
    /// * `StoreError::Engine` on a stale version or disallowed transition
    #[allow(clippy::too_many_arguments)]
    pub fn check_and_reserve(
        &self,
        id: i64,
        expected_version: u64,
        rules: &dyn BlockRuleSource,
        fleet: &dyn FleetCatalog,
        durations: &dyn DurationTable,
        actor: Actor,
        at: PrimitiveDateTime,
    ) -> Result<Booking, StoreError> {
        let mut inner = self.locked()?;
        let index: usize = index_of(&inner, id)?;
        let current: &Booking = &inner.bookings[index];
        if current.version() != expected_version {
            return Err(StoreError::Engine(CoreError::StaleState {
                expected: expected_version,
                actual: current.version(),
            }));
        }

        let class: VehicleClass = fleet.class_for(current.trip.passengers)?;
        let window: TimeWindow = current.window(durations)?;

        if let Some(reason) = blocked_reason(rules, &window) {
            return Err(StoreError::Unavailable(UnavailabilityReason::Blocked {
                reason,
            }));
        }

        // The draft itself holds no vehicle, so no self-exclusion is
        // needed in the count.
        let occupied: u32 =
            count_overlapping(&inner.bookings, &window, &class, fleet, durations);
        if occupied >= class.fleet_size {
            return Err(StoreError::Unavailable(UnavailabilityReason::NoVehicles {
                class: class.name,
            }));
        }

        let result = attempt_transition(current, ReservationState::Pending, actor, at, None)?;
        inner.bookings[index] = result.new_booking.clone();
        tracing::info!(
            id,
            code = result.new_booking.code(),
            passengers = result.new_booking.trip.passengers,
            "reservation admitted"
        );
        Ok(result.new_booking)
    }

    /// Applies a lifecycle transition under the write lock.
    ///
    /// # Errors
    ///
    /// Returns `StaleState` on a version mismatch, or the engine's
    /// transition errors unchanged.
    pub fn apply_transition(
        &self,
        id: i64,
        expected_version: u64,
        target: ReservationState,
        actor: Actor,
        at: PrimitiveDateTime,
        note: Option<String>,
    ) -> Result<Booking, StoreError> {
        let mut inner = self.locked()?;
        let index: usize = index_of(&inner, id)?;
        let current: &Booking = &inner.bookings[index];
        if current.version() != expected_version {
            return Err(StoreError::Engine(CoreError::StaleState {
                expected: expected_version,
                actual: current.version(),
            }));
        }

        let result = attempt_transition(current, target, actor, at, note)?;
        inner.bookings[index] = result.new_booking.clone();
        tracing::info!(id, to = %target, "booking transitioned");
        Ok(result.new_booking)
    }

    /// Returns a booking's lifecycle history in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if no booking has this identifier.
    pub fn history(&self, id: i64) -> Result<Vec<StateEvent>, StoreError> {
        let inner = self.locked()?;
        inner
            .bookings
            .iter()
            .find(|booking| booking.id == Some(id))
            .map(|booking| booking.history().events().to_vec())
            .ok_or(StoreError::BookingNotFound(id))
    }
}

impl BookingSource for MemoryStore {
    fn active_bookings(&self) -> Result<Vec<Booking>, SourceUnavailable> {
        let inner = self.inner.lock().map_err(|_| SourceUnavailable {
            source: "memory_store",
            detail: String::from("lock poisoned"),
        })?;
        Ok(inner
            .bookings
            .iter()
            .filter(|booking| booking.state() != ReservationState::Cancelled)
            .cloned()
            .collect())
    }
}

fn index_of(inner: &Inner, id: i64) -> Result<usize, StoreError> {
    inner
        .bookings
        .iter()
        .position(|booking| booking.id == Some(id))
        .ok_or(StoreError::BookingNotFound(id))
}

fn find_mut<'a>(inner: &'a mut Inner, booking: &Booking) -> Result<&'a mut Booking, StoreError> {
    let id: i64 = booking
        .id
        .ok_or_else(|| StoreError::CodeNotFound(booking.code().to_string()))?;
    let index: usize = index_of(inner, id)?;
    Ok(&mut inner.bookings[index])
}

fn blocked_reason(rules: &dyn BlockRuleSource, window: &TimeWindow) -> Option<String> {
    match rules.active_rules() {
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
            tracing::warn!(error = %err, "block rules unavailable, admitting without them");
            None
        }
    }
}
