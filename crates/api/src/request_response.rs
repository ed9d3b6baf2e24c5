// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use rutero::{Booking, SuggestedDeparture};
use rutero_audit::StateEvent;
use rutero_domain::{DepositSplit, PricingBreakdown};
use time::{Date, PrimitiveDateTime, Time};

/// API request for an availability check.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CheckAvailabilityRequest {
    /// The departure point.
    pub origin: String,
    /// The arrival point.
    pub destination: String,
    /// The departure date.
    pub date: Date,
    /// The departure time.
    pub time: Time,
    /// Number of passengers travelling.
    pub passengers: u32,
}

/// API response for an availability check.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CheckAvailabilityResponse {
    /// Whether at least one vehicle is free for the window.
    pub available: bool,
    /// Why not, when unavailable.
    pub reason: Option<String>,
    /// The checked occupation window start.
    pub window_start: PrimitiveDateTime,
    /// The checked occupation window end (exclusive).
    pub window_end: PrimitiveDateTime,
    /// Nearby windows that are free, offered when the requested one is not.
    pub alternatives: Vec<AlternativeWindow>,
}

/// A free occupation window offered in place of an unavailable one.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AlternativeWindow {
    /// The alternative window's start.
    pub start: PrimitiveDateTime,
    /// The alternative window's end (exclusive).
    pub end: PrimitiveDateTime,
}

/// A priced add-on in a request.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExtraInput {
    /// Human-readable label for the add-on.
    pub label: String,
    /// The add-on price in minor currency units.
    pub amount: i64,
}

/// API request for a price quote.
///
/// At most one of the coupon fields may be set. When `return_gap_minutes`
/// carries a matched empty-return gap, the tiered discount replaces the
/// online-channel discount on the base fare.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct QuoteRequest {
    /// The base fare in minor units.
    pub base_fare: i64,
    /// Priced add-ons.
    pub extras: Vec<ExtraInput>,
    /// The pricing knobs to apply.
    pub pricing: QuotePricingInput,
    /// Requested upfront fraction of the total.
    pub deposit_rate: f64,
}

/// API response for a price quote.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QuoteResponse {
    /// The itemized price.
    pub breakdown: PricingBreakdown,
    /// The tier percentage applied through `return_gap_minutes`, if any.
    pub tier_percentage: Option<u8>,
    /// The upfront/balance split of the total.
    pub deposit: DepositSplit,
}

/// API request for empty-return opportunity discovery.
///
/// With `client_email` set, discovery is restricted to that client's own
/// active bookings; without it, any mirrored booking on the date matches.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReturnOpportunitiesRequest {
    /// The requested departure point.
    pub origin: String,
    /// The requested arrival point.
    pub destination: String,
    /// The requested departure date.
    pub date: Date,
    /// The requested departure time.
    pub time: Time,
    /// Number of passengers travelling.
    pub passengers: u32,
    /// The client reference for identified-client discovery.
    pub client_email: Option<String>,
}

/// One surfaced empty-return opportunity.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReturnOpportunityInfo {
    /// The source booking's reference code.
    pub source_code: String,
    /// When the source's vehicle is estimated to be free.
    pub estimated_free_at: PrimitiveDateTime,
    /// Suggested discounted departures, soonest first.
    pub suggestions: Vec<SuggestedDeparture>,
}

/// API response for empty-return opportunity discovery.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReturnOpportunitiesResponse {
    /// The matched opportunities, soonest first. Empty when none match.
    pub opportunities: Vec<ReturnOpportunityInfo>,
}

/// API request to create a booking in the `Draft` state.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CreateBookingRequest {
    /// The client's full name.
    pub client_name: String,
    /// The client's email address.
    pub client_email: String,
    /// The client's phone number.
    pub client_phone: String,
    /// The departure point.
    pub origin: String,
    /// The arrival point.
    pub destination: String,
    /// The departure date.
    pub date: Date,
    /// The departure time.
    pub time: Time,
    /// Number of passengers travelling.
    pub passengers: u32,
    /// The return departure date, for round trips.
    pub return_date: Option<Date>,
    /// The return departure time, for round trips.
    pub return_time: Option<Time>,
    /// The base fare in minor units.
    pub base_fare: i64,
    /// Priced add-ons.
    pub extras: Vec<ExtraInput>,
    /// The pricing knobs applied at creation.
    pub pricing: QuotePricingInput,
}

/// The pricing knobs shared by quotes and booking creation.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct QuotePricingInput {
    /// Online-channel discount rate, when configured.
    pub online_discount_rate: Option<f64>,
    /// Flat coupon amount in minor units.
    pub coupon_flat: Option<i64>,
    /// Percent coupon as a fraction of base plus extras.
    pub coupon_percent: Option<f64>,
    /// Club/loyalty benefit rate.
    pub club_benefit_rate: Option<f64>,
    /// Minutes between an empty-return match's estimated arrival and the
    /// requested departure.
    pub return_gap_minutes: Option<i64>,
    /// Tax rate applied to the discounted subtotal.
    pub tax_rate: f64,
    /// Lower clamp for the pre-tax subtotal, in minor units.
    pub floor: i64,
}

impl QuotePricingInput {
    /// A pricing input with no discounts, no taxes, and a zero floor.
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            online_discount_rate: None,
            coupon_flat: None,
            coupon_percent: None,
            club_benefit_rate: None,
            return_gap_minutes: None,
            tax_rate: 0.0,
            floor: 0,
        }
    }
}

/// API request to admit a draft booking into `Pending`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReserveBookingRequest {
    /// The booking's canonical identifier.
    pub booking_id: i64,
    /// The version the caller last read.
    pub expected_version: u64,
}

/// API request to apply a lifecycle transition.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TransitionBookingRequest {
    /// The booking's canonical identifier.
    pub booking_id: i64,
    /// The version the caller last read.
    pub expected_version: u64,
    /// The requested lifecycle state (e.g. "confirmed").
    pub target_state: String,
    /// Optional free-form note recorded on the event.
    pub note: Option<String>,
}

/// API request to set or clear a booking's vehicle/driver assignment.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AssignVehicleRequest {
    /// The booking's canonical identifier.
    pub booking_id: i64,
    /// The version the caller last read.
    pub expected_version: u64,
    /// The assigned vehicle, or `None` to clear the assignment.
    pub vehicle_id: Option<i64>,
    /// The assigned driver, or `None` to clear the assignment.
    pub driver_id: Option<i64>,
}

/// API request to recompute a draft or pending booking's price.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RepriceBookingRequest {
    /// The booking's canonical identifier.
    pub booking_id: i64,
    /// The version the caller last read.
    pub expected_version: u64,
    /// The base fare in minor units.
    pub base_fare: i64,
    /// The pricing knobs to apply.
    pub pricing: QuotePricingInput,
}

/// Full booking information as seen through the API.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BookingInfo {
    /// The canonical identifier.
    pub booking_id: i64,
    /// The immutable reference code.
    pub code: String,
    /// The current lifecycle state.
    pub state: String,
    /// The client's full name.
    pub client_name: String,
    /// The client's email address.
    pub client_email: String,
    /// The departure point.
    pub origin: String,
    /// The arrival point.
    pub destination: String,
    /// The departure date.
    pub date: Date,
    /// The departure time.
    pub time: Time,
    /// Number of passengers travelling.
    pub passengers: u32,
    /// The assigned vehicle, when assigned.
    pub vehicle_id: Option<i64>,
    /// The assigned driver, when assigned.
    pub driver_id: Option<i64>,
    /// The itemized price.
    pub pricing: PricingBreakdown,
    /// The optimistic-concurrency version.
    pub version: u64,
}

impl BookingInfo {
    /// Projects a stored booking into its API shape.
    ///
    /// # Panics
    ///
    /// Never panics for bookings that came out of the store; unpersisted
    /// bookings without an identifier are not representable here and map
    /// to id `0`.
    #[must_use]
    pub fn from_booking(booking: &Booking) -> Self {
        Self {
            booking_id: booking.id.unwrap_or(0),
            code: booking.code().to_string(),
            state: booking.state().to_string(),
            client_name: booking.client.name.clone(),
            client_email: booking.client.email.clone(),
            origin: booking.trip.origin.to_string(),
            destination: booking.trip.destination.to_string(),
            date: booking.trip.date,
            time: booking.trip.time,
            passengers: booking.trip.passengers,
            vehicle_id: booking.assignment.map(|assignment| assignment.vehicle_id),
            driver_id: booking.assignment.map(|assignment| assignment.driver_id),
            pricing: booking.pricing.clone(),
            version: booking.version(),
        }
    }
}

/// One lifecycle history entry as seen through the API.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StateEventInfo {
    /// The state the booking left.
    pub from_state: String,
    /// The state the booking entered.
    pub to_state: String,
    /// When the transition was accepted.
    pub at: PrimitiveDateTime,
    /// The initiating actor's identifier.
    pub actor_id: String,
    /// The initiating actor's type.
    pub actor_type: String,
    /// Free-form note attached by the actor.
    pub note: Option<String>,
}

impl StateEventInfo {
    /// Projects an audit event into its API shape.
    #[must_use]
    pub fn from_event(event: &StateEvent) -> Self {
        Self {
            from_state: event.from_state.to_string(),
            to_state: event.to_state.to_string(),
            at: event.at,
            actor_id: event.actor.id.clone(),
            actor_type: event.actor.actor_type.clone(),
            note: event.note.clone(),
        }
    }
}

/// API response for a booking's lifecycle history.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BookingHistoryResponse {
    /// The booking's canonical identifier.
    pub booking_id: i64,
    /// The lifecycle events in insertion order.
    pub events: Vec<StateEventInfo>,
}
