// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Empty-return opportunity matching.
//!
//! An existing booking's vehicle becomes free at the candidate trip's
//! origin when that booking runs the mirrored route. Departing shortly
//! after its estimated arrival turns the new trip into a subsidized
//! empty-leg fill.
//!
//! Two discovery modes share this one implementation:
//!
//! - **identified-client**: keyed by the client reference of an already
//!   active unrelated booking (the same traveler's earlier leg)
//! - **universal**: keyed purely by route + date, usable before any
//!   contact information is collected
//!
//! The tier math is identical in both modes; only the discovery trigger
//! differs. Absence of a match is an empty list, never an error.

use crate::booking::Booking;
use crate::sources::{BookingSource, DurationTable, resolve_duration};
use rutero_domain::{TierDecision, TimeWindow, Trip, discount_for, window_for};
use serde::{Deserialize, Serialize};
use time::{Duration, PrimitiveDateTime};

/// Fixed offsets from the source's estimated arrival at which departures
/// are suggested, in minutes.
pub const SUGGESTION_OFFSETS_MINUTES: [i64; 3] = [30, 45, 60];

/// A suggested departure instant inside a discount window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedDeparture {
    /// The suggested departure instant.
    pub departs_at: PrimitiveDateTime,
    /// Minutes after the source's estimated arrival.
    pub elapsed_minutes: i64,
    /// The tier awarded at this instant.
    pub tier: TierDecision,
}

/// One empty-return opportunity surfaced for a candidate trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnOpportunity {
    /// The source booking's identifier, when persisted.
    pub source_booking_id: Option<i64>,
    /// The source booking's reference code.
    pub source_code: String,
    /// When the source's vehicle is estimated to be free at the candidate
    /// origin.
    pub estimated_free_at: PrimitiveDateTime,
    /// Suggested discounted departures, soonest first.
    pub suggestions: Vec<SuggestedDeparture>,
}

/// Computes the tier for a concrete chosen departure against a source's
/// estimated arrival.
///
/// Both discovery modes funnel through this: the discount depends only on
/// the elapsed minutes.
#[must_use]
pub fn tier_for_departure(
    estimated_free_at: PrimitiveDateTime,
    departs_at: PrimitiveDateTime,
) -> TierDecision {
    let elapsed: Duration = departs_at - estimated_free_at;
    discount_for(elapsed.whole_minutes())
}

/// Read-only matcher over the booking list and duration table.
pub struct ReturnOpportunityMatcher<'a> {
    bookings: &'a dyn BookingSource,
    durations: &'a dyn DurationTable,
}

impl<'a> ReturnOpportunityMatcher<'a> {
    /// Creates a matcher over the given sources.
    #[must_use]
    pub const fn new(bookings: &'a dyn BookingSource, durations: &'a dyn DurationTable) -> Self {
        Self {
            bookings,
            durations,
        }
    }

    /// Universal discovery: mirrored route + date only.
    ///
    /// Usable before any contact information is collected.
    #[must_use]
    pub fn find_universal(&self, candidate: &Trip) -> Vec<ReturnOpportunity> {
        self.find_matching(candidate, |_| true)
    }

    /// Identified-client discovery: restricted to the given client's own
    /// active bookings.
    ///
    /// # Arguments
    ///
    /// * `client_email` - The client reference (email) of the earlier leg
    /// * `candidate` - The requested trip
    #[must_use]
    pub fn find_for_client(&self, client_email: &str, candidate: &Trip) -> Vec<ReturnOpportunity> {
        self.find_matching(candidate, |booking| {
            booking.client.email.eq_ignore_ascii_case(client_email)
        })
    }

    /// Shared matching over an extra source filter.
    ///
    /// The matcher is opportunistic: when the booking list is unreachable
    /// it surfaces a warning and no opportunities, because a lost discount
    /// is the safe failure here.
    fn find_matching(
        &self,
        candidate: &Trip,
        filter: impl Fn(&Booking) -> bool,
    ) -> Vec<ReturnOpportunity> {
        let sources: Vec<Booking> = match self.bookings.active_bookings() {
            Ok(bookings) => bookings,
            Err(err) => {
                tracing::warn!(error = %err, "booking list unavailable, no return opportunities");
                return Vec::new();
            }
        };

        let mut opportunities: Vec<ReturnOpportunity> = Vec::new();
        for source in sources {
            if !filter(&source) || !source.trip.mirrors(candidate) {
                continue;
            }
            let Ok(occupied) = self.source_window(&source) else {
                continue;
            };
            let estimated_free_at: PrimitiveDateTime = occupied.end();

            // Same day, or an arrival spilling onto the candidate's date;
            // adjacency never reaches further than one calendar day.
            let date_matches: bool = source.trip.date == candidate.date
                || estimated_free_at.date() == candidate.date;
            if !date_matches {
                continue;
            }

            opportunities.push(ReturnOpportunity {
                source_booking_id: source.id,
                source_code: source.code().to_string(),
                estimated_free_at,
                suggestions: suggest_departures(estimated_free_at),
            });
        }

        opportunities.sort_by_key(|opportunity| opportunity.estimated_free_at);
        opportunities
    }

    fn source_window(&self, source: &Booking) -> Result<TimeWindow, rutero_domain::DomainError> {
        let minutes: i64 = resolve_duration(self.durations, &source.trip.destination);
        window_for(source.trip.date, source.trip.time, minutes)
    }
}

/// Builds the fixed-offset departure suggestions for one estimated
/// arrival, skipping any offset that would overflow the date range.
fn suggest_departures(estimated_free_at: PrimitiveDateTime) -> Vec<SuggestedDeparture> {
    SUGGESTION_OFFSETS_MINUTES
        .iter()
        .filter_map(|&offset| {
            estimated_free_at
                .checked_add(Duration::minutes(offset))
                .map(|departs_at| SuggestedDeparture {
                    departs_at,
                    elapsed_minutes: offset,
                    tier: discount_for(offset),
                })
        })
        .collect()
}
