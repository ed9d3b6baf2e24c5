// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The reservation state machine.
//!
//! Transitions are atomic over an immutable input: the caller hands in the
//! current booking and receives either a new booking plus the recorded
//! event, or an error and no mutation anywhere. Table membership is checked
//! first, then the per-target preconditions; a rejected transition never
//! produces a history entry.

use crate::booking::Booking;
use crate::error::CoreError;
use rutero_audit::{Actor, StateEvent};
use rutero_domain::ReservationState;
use time::PrimitiveDateTime;

/// The result of an accepted transition.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionResult {
    /// The booking after the transition, version bumped.
    pub new_booking: Booking,
    /// The event appended to the history.
    pub event: StateEvent,
}

/// Attempts to move a booking to `target`.
///
/// # Arguments
///
/// * `booking` - The booking in its current state (not mutated)
/// * `target` - The requested lifecycle state
/// * `actor` - Who initiates the transition
/// * `at` - When the transition takes effect
/// * `note` - Optional free-form note recorded on the event
///
/// # Errors
///
/// * `CoreError::TransitionNotAllowed` when `current -> target` is not in
///   the lifecycle table
/// * `CoreError::PreconditionFailed` when the transition exists but its
///   precondition is unmet
///
/// On error the input booking is untouched and no event is recorded.
pub fn attempt_transition(
    booking: &Booking,
    target: ReservationState,
    actor: Actor,
    at: PrimitiveDateTime,
    note: Option<String>,
) -> Result<TransitionResult, CoreError> {
    let current: ReservationState = booking.state();

    if !current.can_transition_to(target) {
        return Err(CoreError::TransitionNotAllowed {
            from: current,
            to: target,
        });
    }

    check_precondition(booking, target)?;

    let event: StateEvent = StateEvent::new(current, target, at, actor, note);
    let mut new_booking: Booking = booking.clone();
    new_booking.record_transition(event.clone())?;

    Ok(TransitionResult { new_booking, event })
}

/// Checks the per-target preconditions beyond table membership.
fn check_precondition(booking: &Booking, target: ReservationState) -> Result<(), CoreError> {
    match target {
        ReservationState::Confirmed => {
            if booking.client.name.trim().is_empty() {
                return Err(CoreError::PreconditionFailed {
                    target,
                    reason: String::from("client name must be set"),
                });
            }
            if booking.trip.origin.is_empty() {
                return Err(CoreError::PreconditionFailed {
                    target,
                    reason: String::from("trip origin must be set"),
                });
            }
            if booking.trip.destination.is_empty() {
                return Err(CoreError::PreconditionFailed {
                    target,
                    reason: String::from("trip destination must be set"),
                });
            }
            Ok(())
        }
        ReservationState::Assigned => {
            if booking.assignment.is_none() {
                return Err(CoreError::PreconditionFailed {
                    target,
                    reason: String::from("vehicle and driver must both be assigned"),
                });
            }
            Ok(())
        }
        ReservationState::InProgress => {
            // Table membership already restricts the source to Assigned;
            // stated explicitly because it is a business rule, not a
            // table accident.
            if booking.state() != ReservationState::Assigned {
                return Err(CoreError::PreconditionFailed {
                    target,
                    reason: String::from("only an assigned booking can start"),
                });
            }
            Ok(())
        }
        ReservationState::Completed => {
            if booking.state() != ReservationState::InProgress {
                return Err(CoreError::PreconditionFailed {
                    target,
                    reason: String::from("only an in-progress booking can complete"),
                });
            }
            Ok(())
        }
        ReservationState::Draft | ReservationState::Pending | ReservationState::Cancelled => Ok(()),
    }
}
