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

mod availability;
mod booking;
mod error;
mod machine;
mod matcher;
mod sources;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use availability::{
    Availability, CapacityChecker, UnavailabilityReason, count_overlapping,
};
pub use booking::Booking;
pub use error::CoreError;
pub use machine::{TransitionResult, attempt_transition};
pub use matcher::{
    ReturnOpportunity, ReturnOpportunityMatcher, SUGGESTION_OFFSETS_MINUTES, SuggestedDeparture,
    tier_for_departure,
};
pub use sources::{
    BlockRuleSource, BookingSource, DEFAULT_TRIP_DURATION_MINUTES, DurationTable, FleetCatalog,
    SourceUnavailable, StaticDurationTable, StaticFleetCatalog, resolve_duration,
};
