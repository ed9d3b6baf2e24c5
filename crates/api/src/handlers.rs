// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Handlers are pure over their inputs: reference data and the store come
//! in as arguments and the clock comes in as an explicit `at` instant, so
//! every operation is testable without ambient state.

use std::str::FromStr;

use rutero::{
    Availability, BlockRuleSource, Booking, BookingSource, CapacityChecker, DurationTable,
    FleetCatalog, ReturnOpportunityMatcher, SUGGESTION_OFFSETS_MINUTES, resolve_duration,
};
use rutero_audit::Actor;
use rutero_domain::{
    Assignment, ClientContact, Coupon, DepositSplit, Extra, Place, PricingBreakdown,
    PricingContext, ReservationState, TierDecision, TimeWindow, Trip, compute_breakdown,
    compute_deposit, discount_for, window_for,
};
use rutero_persistence::{MemoryStore, StoreError};
use time::{Duration, PrimitiveDateTime};

use crate::booking_code::generate_code;
use crate::error::{ApiError, translate_core_error, translate_domain_error, translate_store_error};
use crate::request_response::{
    AlternativeWindow, AssignVehicleRequest, BookingHistoryResponse, BookingInfo,
    CheckAvailabilityRequest, CheckAvailabilityResponse, CreateBookingRequest, QuotePricingInput,
    QuoteRequest,
    QuoteResponse, RepriceBookingRequest, ReserveBookingRequest, ReturnOpportunitiesRequest,
    ReturnOpportunitiesResponse, ReturnOpportunityInfo, StateEventInfo, TransitionBookingRequest,
};

/// How often booking creation retries on a reference-code collision.
const CODE_RETRY_LIMIT: u32 = 3;

/// Checks whether the requested trip can be admitted.
///
/// # Arguments
///
/// * `request` - The requested trip
/// * `rules` - The operator block-rule source
/// * `bookings` - The current booking list
/// * `fleet` - The fleet capacity table
/// * `durations` - The per-destination duration table
///
/// # Errors
///
/// Returns an error if the request fields are invalid, no vehicle class
/// fits the party, or the booking list cannot be read.
pub fn check_availability(
    request: &CheckAvailabilityRequest,
    rules: &dyn BlockRuleSource,
    bookings: &dyn BookingSource,
    fleet: &dyn FleetCatalog,
    durations: &dyn DurationTable,
) -> Result<CheckAvailabilityResponse, ApiError> {
    let destination: Place = Place::new(&request.destination);
    if Place::new(&request.origin).is_empty() || destination.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("origin"),
            message: String::from("Origin and destination must both be set"),
        });
    }

    let minutes: i64 = resolve_duration(durations, &destination);
    let window: TimeWindow =
        window_for(request.date, request.time, minutes).map_err(translate_domain_error)?;

    let checker: CapacityChecker<'_> = CapacityChecker::new(rules, bookings, fleet, durations);
    let outcome: Availability = checker
        .check_availability(&window, request.passengers)
        .map_err(translate_core_error)?;

    let alternatives: Vec<AlternativeWindow> = if outcome.available {
        Vec::new()
    } else {
        suggest_alternatives(&checker, &window, request.passengers)
    };

    Ok(CheckAvailabilityResponse {
        available: outcome.available,
        reason: outcome.reason.map(|reason| reason.to_string()),
        window_start: window.start(),
        window_end: window.end(),
        alternatives,
    })
}

/// Probes the matcher's standard offsets for free windows near a refused
/// one. A probe that errors is skipped rather than failing the check.
fn suggest_alternatives(
    checker: &CapacityChecker<'_>,
    window: &TimeWindow,
    passengers: u32,
) -> Vec<AlternativeWindow> {
    let mut found: Vec<AlternativeWindow> = Vec::new();
    for offset in SUGGESTION_OFFSETS_MINUTES {
        let shift: Duration = Duration::minutes(offset);
        let (Some(start), Some(end)) = (
            window.start().checked_add(shift),
            window.end().checked_add(shift),
        ) else {
            continue;
        };
        let Ok(shifted) = TimeWindow::new(start, end) else {
            continue;
        };
        if checker
            .check_availability(&shifted, passengers)
            .is_ok_and(|probe| probe.available)
        {
            found.push(AlternativeWindow { start, end });
        }
    }
    found
}

/// Computes an itemized quote plus its deposit split.
///
/// # Errors
///
/// Returns an error if the pricing inputs are invalid, both coupon forms
/// are set, or the empty-return gap is under the repositioning minimum.
pub fn quote(request: &QuoteRequest) -> Result<QuoteResponse, ApiError> {
    let extras: Vec<Extra> = convert_extras(&request.extras)?;
    let (context, tier_percentage) = build_pricing_context(&request.pricing)?;

    let breakdown: PricingBreakdown =
        compute_breakdown(request.base_fare, &extras, &context).map_err(translate_domain_error)?;
    let deposit: DepositSplit =
        compute_deposit(breakdown.total, request.deposit_rate).map_err(translate_domain_error)?;

    Ok(QuoteResponse {
        breakdown,
        tier_percentage,
        deposit,
    })
}

/// Finds empty-return opportunities for the requested trip.
///
/// # Errors
///
/// Returns an error if the trip fields are invalid.
pub fn find_return_opportunities(
    request: &ReturnOpportunitiesRequest,
    bookings: &dyn BookingSource,
    durations: &dyn DurationTable,
) -> Result<ReturnOpportunitiesResponse, ApiError> {
    let candidate: Trip = Trip::one_way(
        Place::new(&request.origin),
        Place::new(&request.destination),
        request.date,
        request.time,
        request.passengers,
    )
    .map_err(translate_domain_error)?;

    let matcher: ReturnOpportunityMatcher<'_> = ReturnOpportunityMatcher::new(bookings, durations);
    let found = match request.client_email.as_deref() {
        Some(email) => matcher.find_for_client(email, &candidate),
        None => matcher.find_universal(&candidate),
    };

    Ok(ReturnOpportunitiesResponse {
        opportunities: found
            .into_iter()
            .map(|opportunity| ReturnOpportunityInfo {
                source_code: opportunity.source_code,
                estimated_free_at: opportunity.estimated_free_at,
                suggestions: opportunity.suggestions,
            })
            .collect(),
    })
}

/// Creates a booking in the `Draft` state with a fresh reference code.
///
/// # Errors
///
/// Returns an error if the trip or pricing inputs are invalid, or code
/// generation keeps colliding.
pub fn create_booking(
    store: &MemoryStore,
    request: &CreateBookingRequest,
) -> Result<BookingInfo, ApiError> {
    let trip: Trip = build_trip(request)?;
    let extras: Vec<Extra> = convert_extras(&request.extras)?;
    let (context, _) = build_pricing_context(&request.pricing)?;
    let client: ClientContact = ClientContact::new(
        request.client_name.clone(),
        request.client_email.clone(),
        request.client_phone.clone(),
    );

    let breakdown: PricingBreakdown =
        compute_breakdown(request.base_fare, &extras, &context).map_err(translate_domain_error)?;

    for _ in 0..CODE_RETRY_LIMIT {
        let mut booking: Booking = Booking::new(
            generate_code(),
            client.clone(),
            trip.clone(),
            breakdown.clone(),
        )
        .map_err(translate_domain_error)?;
        for extra in &extras {
            booking
                .add_extra(extra.clone())
                .map_err(translate_core_error)?;
        }

        match store.create(booking) {
            Ok(stored) => {
                tracing::info!(code = stored.code(), "booking drafted");
                return Ok(BookingInfo::from_booking(&stored));
            }
            Err(StoreError::DuplicateCode(_)) => {}
            Err(err) => return Err(translate_store_error(err)),
        }
    }

    Err(ApiError::Internal {
        message: String::from("Could not generate a unique booking code"),
    })
}

/// Atomically admits a draft booking, moving it to `Pending`.
///
/// # Errors
///
/// Returns `NotBookable` when admission is refused, `Conflict` on a stale
/// version, and the usual translation of engine errors otherwise.
#[allow(clippy::too_many_arguments)]
pub fn reserve_booking(
    store: &MemoryStore,
    request: &ReserveBookingRequest,
    rules: &dyn BlockRuleSource,
    fleet: &dyn FleetCatalog,
    durations: &dyn DurationTable,
    actor: Actor,
    at: PrimitiveDateTime,
) -> Result<BookingInfo, ApiError> {
    let admitted: Booking = store
        .check_and_reserve(
            request.booking_id,
            request.expected_version,
            rules,
            fleet,
            durations,
            actor,
            at,
        )
        .map_err(translate_store_error)?;
    Ok(BookingInfo::from_booking(&admitted))
}

/// Applies a lifecycle transition to a stored booking.
///
/// # Errors
///
/// Returns an error if the target state is unknown, the transition is not
/// allowed, a precondition is unmet, or the version is stale.
pub fn transition_booking(
    store: &MemoryStore,
    request: &TransitionBookingRequest,
    actor: Actor,
    at: PrimitiveDateTime,
) -> Result<BookingInfo, ApiError> {
    let target: ReservationState =
        ReservationState::from_str(&request.target_state).map_err(translate_domain_error)?;

    let updated: Booking = store
        .apply_transition(
            request.booking_id,
            request.expected_version,
            target,
            actor,
            at,
            request.note.clone(),
        )
        .map_err(translate_store_error)?;
    Ok(BookingInfo::from_booking(&updated))
}

/// Sets or clears a booking's vehicle/driver assignment.
///
/// Both identifiers must be provided together; the lifecycle effect comes
/// later through the `assigned` transition.
///
/// # Errors
///
/// Returns an error on a half-set assignment, a missing booking, or a
/// stale version.
pub fn assign_vehicle(
    store: &MemoryStore,
    request: &AssignVehicleRequest,
) -> Result<BookingInfo, ApiError> {
    let mut booking: Booking = store
        .get(request.booking_id)
        .map_err(translate_store_error)?;

    match (request.vehicle_id, request.driver_id) {
        (Some(vehicle_id), Some(driver_id)) => {
            booking.set_assignment(Assignment::new(vehicle_id, driver_id));
        }
        (None, None) => booking.clear_assignment(),
        _ => {
            return Err(ApiError::InvalidInput {
                field: String::from("vehicle_id"),
                message: String::from("Vehicle and driver must be set together or not at all"),
            });
        }
    }

    let saved: Booking = store
        .save(booking, request.expected_version)
        .map_err(translate_store_error)?;
    Ok(BookingInfo::from_booking(&saved))
}

/// Recomputes a draft or pending booking's price.
///
/// # Errors
///
/// Returns an error once pricing is frozen, on invalid pricing inputs, or
/// on a stale version.
pub fn reprice_booking(
    store: &MemoryStore,
    request: &RepriceBookingRequest,
) -> Result<BookingInfo, ApiError> {
    let mut booking: Booking = store
        .get(request.booking_id)
        .map_err(translate_store_error)?;
    let (context, _) = build_pricing_context(&request.pricing)?;

    booking
        .reprice(request.base_fare, &context)
        .map_err(translate_core_error)?;

    let saved: Booking = store
        .save(booking, request.expected_version)
        .map_err(translate_store_error)?;
    Ok(BookingInfo::from_booking(&saved))
}

/// Fetches a booking by identifier.
///
/// # Errors
///
/// Returns an error if no booking has this identifier.
pub fn get_booking(store: &MemoryStore, booking_id: i64) -> Result<BookingInfo, ApiError> {
    let booking: Booking = store.get(booking_id).map_err(translate_store_error)?;
    Ok(BookingInfo::from_booking(&booking))
}

/// Fetches a booking's lifecycle history.
///
/// # Errors
///
/// Returns an error if no booking has this identifier.
pub fn booking_history(
    store: &MemoryStore,
    booking_id: i64,
) -> Result<BookingHistoryResponse, ApiError> {
    let events = store.history(booking_id).map_err(translate_store_error)?;
    Ok(BookingHistoryResponse {
        booking_id,
        events: events.iter().map(StateEventInfo::from_event).collect(),
    })
}

fn build_trip(request: &CreateBookingRequest) -> Result<Trip, ApiError> {
    let origin: Place = Place::new(&request.origin);
    let destination: Place = Place::new(&request.destination);
    match (request.return_date, request.return_time) {
        (Some(return_date), Some(return_time)) => Trip::round_trip(
            origin,
            destination,
            request.date,
            request.time,
            request.passengers,
            return_date,
            return_time,
        )
        .map_err(translate_domain_error),
        (None, None) => Trip::one_way(
            origin,
            destination,
            request.date,
            request.time,
            request.passengers,
        )
        .map_err(translate_domain_error),
        _ => Err(ApiError::InvalidInput {
            field: String::from("return_date"),
            message: String::from("Return date and time must be set together or not at all"),
        }),
    }
}

fn convert_extras(inputs: &[crate::request_response::ExtraInput]) -> Result<Vec<Extra>, ApiError> {
    inputs
        .iter()
        .map(|input| {
            Extra::new(input.label.clone(), input.amount).map_err(translate_domain_error)
        })
        .collect()
}

/// Builds the engine pricing context from the API's pricing knobs.
///
/// A gap under the repositioning minimum is refused here rather than
/// silently priced at zero discount.
fn build_pricing_context(
    input: &QuotePricingInput,
) -> Result<(PricingContext, Option<u8>), ApiError> {
    let coupon: Option<Coupon> = match (input.coupon_flat, input.coupon_percent) {
        (Some(_), Some(_)) => {
            return Err(ApiError::InvalidInput {
                field: String::from("coupon"),
                message: String::from("At most one coupon form may be set"),
            });
        }
        (Some(amount), None) => Some(Coupon::Flat(amount)),
        (None, Some(rate)) => Some(Coupon::Percent(rate)),
        (None, None) => None,
    };

    let mut tier_percentage: Option<u8> = None;
    let tiered_return: Option<TierDecision> = match input.return_gap_minutes {
        Some(gap) => {
            let decision: TierDecision = discount_for(gap);
            if let Some(rejection) = &decision.rejection {
                return Err(ApiError::DomainRuleViolation {
                    rule: String::from("min_reposition_gap"),
                    message: rejection.clone(),
                });
            }
            if decision.applies {
                tier_percentage = Some(decision.percentage);
            }
            Some(decision)
        }
        None => None,
    };

    let context: PricingContext = PricingContext {
        online_discount_rate: input.online_discount_rate,
        coupon,
        club_benefit_rate: input.club_benefit_rate,
        tiered_return,
        tax_rate: input.tax_rate,
        floor: input.floor,
    };
    context.validate().map_err(translate_domain_error)?;

    Ok((context, tier_percentage))
}
