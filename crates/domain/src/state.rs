// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reservation lifecycle states and the fixed transition graph.
//!
//! The table below is the only authority on which transitions exist;
//! per-transition preconditions (required fields, assignment completeness)
//! are enforced by the state machine in the core crate on top of table
//! membership. Lifecycle state is never derived from other fields.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The lifecycle state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReservationState {
    /// Initial state: quote captured, nothing reserved yet.
    #[default]
    Draft,
    /// Awaiting confirmation; reserves a vehicle.
    Pending,
    /// Confirmed by the operator or payment flow.
    Confirmed,
    /// Vehicle and driver assigned.
    Assigned,
    /// Service underway.
    InProgress,
    /// Service delivered. Terminal.
    Completed,
    /// Called off at any pre-terminal point. Terminal.
    Cancelled,
}

impl ReservationState {
    /// Returns the string representation of this state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns true if this state is terminal (no outgoing transitions).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Returns true if a booking in this state holds a vehicle for its
    /// trip window.
    ///
    /// Drafts reserve nothing; cancelled bookings release their slot.
    #[must_use]
    pub const fn reserves_vehicle(&self) -> bool {
        !matches!(self, Self::Draft | Self::Cancelled)
    }

    /// Returns true if pricing may still be recomputed in this state.
    ///
    /// From `Confirmed` onward the deposit has been taken and the breakdown
    /// is frozen; terminal states are frozen as well.
    #[must_use]
    pub const fn pricing_mutable(&self) -> bool {
        matches!(self, Self::Draft | Self::Pending)
    }

    /// Checks if a transition from this state to `target` is in the
    /// transition table.
    ///
    /// The table:
    /// - `Draft` → `Pending` | `Cancelled`
    /// - `Pending` → `Confirmed` | `Cancelled`
    /// - `Confirmed` → `Assigned` | `Cancelled`
    /// - `Assigned` → `InProgress` | `Confirmed` (unassign) | `Cancelled`
    /// - `InProgress` → `Completed` | `Cancelled`
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Draft, Self::Pending | Self::Cancelled)
                | (Self::Pending, Self::Confirmed | Self::Cancelled)
                | (Self::Confirmed, Self::Assigned | Self::Cancelled)
                | (
                    Self::Assigned,
                    Self::InProgress | Self::Confirmed | Self::Cancelled
                )
                | (Self::InProgress, Self::Completed | Self::Cancelled)
        )
    }
}

impl std::fmt::Display for ReservationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReservationState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "assigned" => Ok(Self::Assigned),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidState(s.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const ALL: [ReservationState; 7] = [
        ReservationState::Draft,
        ReservationState::Pending,
        ReservationState::Confirmed,
        ReservationState::Assigned,
        ReservationState::InProgress,
        ReservationState::Completed,
        ReservationState::Cancelled,
    ];

    #[test]
    fn test_state_string_round_trip() {
        for state in ALL {
            let parsed: ReservationState = state.as_str().parse().unwrap();
            assert_eq!(state, parsed);
        }
    }

    #[test]
    fn test_invalid_state_string() {
        assert!(ReservationState::from_str("booked").is_err());
    }

    #[test]
    fn test_terminal_states_have_no_outgoing_transitions() {
        for terminal in [ReservationState::Completed, ReservationState::Cancelled] {
            assert!(terminal.is_terminal());
            for target in ALL {
                assert!(!terminal.can_transition_to(target));
            }
        }
    }

    #[test]
    fn test_cancellation_allowed_from_every_live_state() {
        for state in ALL {
            if !state.is_terminal() {
                assert!(state.can_transition_to(ReservationState::Cancelled));
            }
        }
    }

    #[test]
    fn test_no_shortcuts_to_in_progress() {
        assert!(ReservationState::Assigned.can_transition_to(ReservationState::InProgress));
        assert!(!ReservationState::Confirmed.can_transition_to(ReservationState::InProgress));
        assert!(!ReservationState::Pending.can_transition_to(ReservationState::InProgress));
    }

    #[test]
    fn test_unassign_returns_to_confirmed() {
        assert!(ReservationState::Assigned.can_transition_to(ReservationState::Confirmed));
        assert!(!ReservationState::InProgress.can_transition_to(ReservationState::Confirmed));
    }

    #[test]
    fn test_vehicle_reserving_states() {
        assert!(!ReservationState::Draft.reserves_vehicle());
        assert!(!ReservationState::Cancelled.reserves_vehicle());
        for state in [
            ReservationState::Pending,
            ReservationState::Confirmed,
            ReservationState::Assigned,
            ReservationState::InProgress,
            ReservationState::Completed,
        ] {
            assert!(state.reserves_vehicle());
        }
    }

    #[test]
    fn test_pricing_frozen_from_confirmed_onward() {
        assert!(ReservationState::Draft.pricing_mutable());
        assert!(ReservationState::Pending.pricing_mutable());
        for state in [
            ReservationState::Confirmed,
            ReservationState::Assigned,
            ReservationState::InProgress,
            ReservationState::Completed,
            ReservationState::Cancelled,
        ] {
            assert!(!state.pricing_mutable());
        }
    }
}
