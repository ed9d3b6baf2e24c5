// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The booking aggregate.
//!
//! A booking owns its trip, pricing, assignment, lifecycle state, and
//! append-only history. Lifecycle state is an explicit field changed only
//! by the state machine; it is never inferred from assignment or any other
//! optional field.

use crate::error::CoreError;
use crate::sources::{DurationTable, resolve_duration};
use rutero_audit::History;
use rutero_domain::{
    Assignment, ClientContact, DomainError, Extra, PricingBreakdown, PricingContext,
    ReservationState, TimeWindow, Trip, compute_breakdown, window_for,
};
use serde::{Deserialize, Serialize};

/// The aggregate root for one reservation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Canonical identifier assigned by the store.
    /// `None` until first persisted.
    pub id: Option<i64>,
    /// Human-readable reference, immutable once assigned.
    code: String,
    /// The client holding the booking.
    pub client: ClientContact,
    /// The booked trip.
    pub trip: Trip,
    /// Vehicle and driver, set by the `Assigned` transition.
    /// Both fields are set together or not at all.
    pub assignment: Option<Assignment>,
    /// Priced add-ons.
    pub extras: Vec<Extra>,
    /// The itemized price. Frozen from `Confirmed` onward.
    pub pricing: PricingBreakdown,
    /// The explicit lifecycle state.
    state: ReservationState,
    /// Append-only lifecycle history.
    history: History,
    /// Optimistic-concurrency version, bumped on every accepted write.
    version: u64,
}

impl Booking {
    /// Creates a new booking in the initial `Draft` state.
    ///
    /// # Arguments
    ///
    /// * `code` - The human-readable reference
    /// * `client` - The client's contact details
    /// * `trip` - The requested trip
    /// * `pricing` - The initial pricing breakdown
    ///
    /// # Errors
    ///
    /// Returns an error if the code is empty or the trip fails validation.
    pub fn new(
        code: String,
        client: ClientContact,
        trip: Trip,
        pricing: PricingBreakdown,
    ) -> Result<Self, DomainError> {
        if code.trim().is_empty() {
            return Err(DomainError::EmptyField("code"));
        }
        trip.validate()?;
        Ok(Self {
            id: None,
            code,
            client,
            trip,
            assignment: None,
            extras: Vec::new(),
            pricing,
            state: ReservationState::Draft,
            history: History::new(),
            version: 0,
        })
    }

    /// Returns the booking's immutable reference code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> ReservationState {
        self.state
    }

    /// Returns the lifecycle history in insertion order.
    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    /// Returns the optimistic-concurrency version.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Computes the occupied time window for this booking's trip.
    ///
    /// # Errors
    ///
    /// Returns an error if the resolved duration is invalid or the window
    /// overflows the representable date range.
    pub fn window(&self, durations: &dyn DurationTable) -> Result<TimeWindow, DomainError> {
        let minutes: i64 = resolve_duration(durations, &self.trip.destination);
        window_for(self.trip.date, self.trip.time, minutes)
    }

    /// Recomputes the pricing breakdown from the trip's base fare, the
    /// attached extras, and the given context.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::PricingFrozen` once the booking is `Confirmed`
    /// or later, or a domain error if the inputs are invalid.
    pub fn reprice(&mut self, base_fare: i64, context: &PricingContext) -> Result<(), CoreError> {
        if !self.state.pricing_mutable() {
            return Err(CoreError::PricingFrozen { state: self.state });
        }
        self.pricing = compute_breakdown(base_fare, &self.extras, context)?;
        self.version += 1;
        Ok(())
    }

    /// Attaches an extra and leaves repricing to the caller.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::PricingFrozen` once pricing is frozen.
    pub fn add_extra(&mut self, extra: Extra) -> Result<(), CoreError> {
        if !self.state.pricing_mutable() {
            return Err(CoreError::PricingFrozen { state: self.state });
        }
        self.extras.push(extra);
        self.version += 1;
        Ok(())
    }

    /// Sets or replaces the vehicle/driver assignment.
    ///
    /// The assignment only takes lifecycle effect through the `Assigned`
    /// transition; setting it here does not change state.
    pub fn set_assignment(&mut self, assignment: Assignment) {
        self.assignment = Some(assignment);
        self.version += 1;
    }

    /// Clears the vehicle/driver assignment.
    pub fn clear_assignment(&mut self) {
        self.assignment = None;
        self.version += 1;
    }

    /// Applies an accepted transition: appends the event, updates state,
    /// bumps the version.
    ///
    /// Only the state machine calls this; it has already validated the
    /// table membership and preconditions.
    pub(crate) fn record_transition(
        &mut self,
        event: rutero_audit::StateEvent,
    ) -> Result<(), CoreError> {
        let target: ReservationState = event.to_state;
        self.history
            .append(event)
            .map_err(|err| CoreError::PreconditionFailed {
                target,
                reason: err.to_string(),
            })?;
        self.state = target;
        self.version += 1;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rutero_domain::Place;
    use time::macros::{date, time};

    fn booking() -> Booking {
        let trip = Trip::one_way(
            Place::new("Airport"),
            Place::new("Downtown"),
            date!(2026 - 09 - 01),
            time!(10:00),
            2,
        )
        .unwrap();
        Booking::new(
            String::from("RB-1001"),
            ClientContact::new(
                String::from("Ada Lovelace"),
                String::from("ada@example.com"),
                String::from("+56 9 1111 1111"),
            ),
            trip,
            compute_breakdown(30000, &[], &PricingContext::empty()).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_booking_starts_in_draft_with_empty_history() {
        let booking = booking();
        assert_eq!(booking.state(), ReservationState::Draft);
        assert!(booking.history().is_empty());
        assert_eq!(booking.version(), 0);
        assert!(booking.id.is_none());
    }

    #[test]
    fn test_empty_code_is_rejected() {
        let trip = Trip::one_way(
            Place::new("A"),
            Place::new("B"),
            date!(2026 - 09 - 01),
            time!(10:00),
            1,
        )
        .unwrap();
        let result = Booking::new(
            String::from("  "),
            ClientContact::new(String::new(), String::new(), String::new()),
            trip,
            compute_breakdown(0, &[], &PricingContext::empty()).unwrap(),
        );
        assert_eq!(result, Err(DomainError::EmptyField("code")));
    }

    #[test]
    fn test_reprice_updates_breakdown_in_draft() {
        let mut booking = booking();
        booking
            .add_extra(Extra::new(String::from("Child seat"), 2500).unwrap())
            .unwrap();
        booking.reprice(30000, &PricingContext::empty()).unwrap();
        assert_eq!(booking.pricing.extras_total, 2500);
        assert_eq!(booking.pricing.total, 32500);
    }

    #[test]
    fn test_assignment_is_all_or_nothing() {
        let mut booking = booking();
        booking.set_assignment(Assignment::new(7, 12));
        let assignment = booking.assignment.unwrap();
        assert_eq!((assignment.vehicle_id, assignment.driver_id), (7, 12));

        booking.clear_assignment();
        assert!(booking.assignment.is_none());
    }

    #[test]
    fn test_window_uses_duration_table() {
        use crate::sources::StaticDurationTable;
        let booking = booking();
        let table = StaticDurationTable::new(vec![(Place::new("Downtown"), 45)]);
        let window = booking.window(&table).unwrap();
        assert_eq!(window.end().time(), time!(10:45));
    }
}
