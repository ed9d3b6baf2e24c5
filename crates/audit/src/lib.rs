// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

//! Append-only lifecycle history for bookings.
//!
//! Every accepted state transition produces exactly one [`StateEvent`];
//! rejected transitions produce none. Events are immutable once created and
//! the history is never edited or truncated after the fact.
//!
//! ## Invariants
//!
//! - `history[0].from_state` is always the initial state
//! - each event's `from_state` equals the previous event's `to_state`
//! - the booking's current state equals `history.last().to_state`

use rutero_domain::ReservationState;
use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

/// The entity performing a lifecycle action.
///
/// An actor is any identifiable entity that initiates a state change:
/// an operator, the client through self-service, or a system process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The type of actor (e.g., "operator", "client", "system").
    pub actor_type: String,
}

impl Actor {
    /// Creates a new `Actor`.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `actor_type` - The type of actor
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }

    /// Shorthand for a system-initiated action.
    #[must_use]
    pub fn system() -> Self {
        Self::new(String::from("system"), String::from("system"))
    }
}

/// An immutable record of one accepted state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateEvent {
    /// The state the booking left.
    pub from_state: ReservationState,
    /// The state the booking entered.
    pub to_state: ReservationState,
    /// When the transition was accepted.
    pub at: PrimitiveDateTime,
    /// Who initiated the transition.
    pub actor: Actor,
    /// Free-form note attached by the actor.
    pub note: Option<String>,
}

impl StateEvent {
    /// Creates a new `StateEvent`.
    ///
    /// Once created, a state event is immutable.
    #[must_use]
    pub const fn new(
        from_state: ReservationState,
        to_state: ReservationState,
        at: PrimitiveDateTime,
        actor: Actor,
        note: Option<String>,
    ) -> Self {
        Self {
            from_state,
            to_state,
            at,
            actor,
            note,
        }
    }
}

/// Errors raised when an append would break the history invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// The first event must leave the initial state.
    WrongInitialState {
        /// The state the offending event leaves.
        found: ReservationState,
    },
    /// The event does not chain onto the current state.
    BrokenChain {
        /// The current state of the history.
        current: ReservationState,
        /// The state the offending event leaves.
        found: ReservationState,
    },
}

impl std::fmt::Display for HistoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WrongInitialState { found } => {
                write!(
                    f,
                    "First history event must leave the '{}' state, found '{found}'",
                    ReservationState::default()
                )
            }
            Self::BrokenChain { current, found } => {
                write!(
                    f,
                    "History event leaves state '{found}' but the current state is '{current}'"
                )
            }
        }
    }
}

impl std::error::Error for HistoryError {}

/// The ordered, append-only lifecycle history of one booking.
///
/// Events can only be appended, never edited, reordered, or truncated.
/// Iteration always yields insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct History {
    events: Vec<StateEvent>,
}

impl History {
    /// Creates an empty history.
    #[must_use]
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Returns the state the history currently ends in.
    ///
    /// An empty history is in the initial state.
    #[must_use]
    pub fn current_state(&self) -> ReservationState {
        self.events
            .last()
            .map_or_else(ReservationState::default, |event| event.to_state)
    }

    /// Appends an event, enforcing the chain invariant.
    ///
    /// # Errors
    ///
    /// Returns an error if the event's `from_state` does not equal the
    /// current state (or the initial state for the first event).
    pub fn append(&mut self, event: StateEvent) -> Result<(), HistoryError> {
        let current: ReservationState = self.current_state();
        if event.from_state != current {
            if self.events.is_empty() {
                return Err(HistoryError::WrongInitialState {
                    found: event.from_state,
                });
            }
            return Err(HistoryError::BrokenChain {
                current,
                found: event.from_state,
            });
        }
        self.events.push(event);
        Ok(())
    }

    /// Returns the events in insertion order.
    #[must_use]
    pub fn events(&self) -> &[StateEvent] {
        &self.events
    }

    /// Returns the number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns whether no transition has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn event(from: ReservationState, to: ReservationState) -> StateEvent {
        StateEvent::new(
            from,
            to,
            datetime!(2026 - 09 - 01 10:00),
            Actor::new(String::from("op-1"), String::from("operator")),
            None,
        )
    }

    #[test]
    fn test_empty_history_is_in_initial_state() {
        let history: History = History::new();
        assert!(history.is_empty());
        assert_eq!(history.current_state(), ReservationState::Draft);
    }

    #[test]
    fn test_append_chains_states() {
        let mut history: History = History::new();
        history
            .append(event(ReservationState::Draft, ReservationState::Pending))
            .unwrap();
        history
            .append(event(ReservationState::Pending, ReservationState::Confirmed))
            .unwrap();

        assert_eq!(history.len(), 2);
        assert_eq!(history.current_state(), ReservationState::Confirmed);
        assert_eq!(history.events()[0].from_state, ReservationState::Draft);
    }

    #[test]
    fn test_first_event_must_leave_initial_state() {
        let mut history: History = History::new();
        let result = history.append(event(ReservationState::Pending, ReservationState::Confirmed));
        assert_eq!(
            result,
            Err(HistoryError::WrongInitialState {
                found: ReservationState::Pending
            })
        );
        assert!(history.is_empty());
    }

    #[test]
    fn test_broken_chain_is_rejected_without_mutation() {
        let mut history: History = History::new();
        history
            .append(event(ReservationState::Draft, ReservationState::Pending))
            .unwrap();

        let result = history.append(event(ReservationState::Confirmed, ReservationState::Assigned));
        assert_eq!(
            result,
            Err(HistoryError::BrokenChain {
                current: ReservationState::Pending,
                found: ReservationState::Confirmed
            })
        );
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_events_preserve_insertion_order() {
        let mut history: History = History::new();
        history
            .append(event(ReservationState::Draft, ReservationState::Pending))
            .unwrap();
        history
            .append(event(ReservationState::Pending, ReservationState::Cancelled))
            .unwrap();

        let transitions: Vec<(ReservationState, ReservationState)> = history
            .events()
            .iter()
            .map(|e| (e.from_state, e.to_state))
            .collect();
        assert_eq!(
            transitions,
            vec![
                (ReservationState::Draft, ReservationState::Pending),
                (ReservationState::Pending, ReservationState::Cancelled),
            ]
        );
    }

    #[test]
    fn test_event_note_and_actor_are_recorded() {
        let actor: Actor = Actor::new(String::from("client-9"), String::from("client"));
        let event: StateEvent = StateEvent::new(
            ReservationState::Draft,
            ReservationState::Cancelled,
            datetime!(2026 - 09 - 01 10:00),
            actor.clone(),
            Some(String::from("Changed plans")),
        );

        assert_eq!(event.actor, actor);
        assert_eq!(event.note.as_deref(), Some("Changed plans"));
    }
}
