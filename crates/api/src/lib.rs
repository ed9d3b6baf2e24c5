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
    clippy::all
)]

mod booking_code;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use booking_code::{BookingCodeError, CODE_PREFIX, generate_code, validate_code};
pub use error::{ApiError, translate_core_error, translate_domain_error, translate_store_error};
pub use handlers::{
    assign_vehicle, booking_history, check_availability, create_booking,
    find_return_opportunities, get_booking, quote, reprice_booking, reserve_booking,
    transition_booking,
};
pub use request_response::{
    AlternativeWindow, AssignVehicleRequest, BookingHistoryResponse, BookingInfo,
    CheckAvailabilityRequest,
    CheckAvailabilityResponse, CreateBookingRequest, ExtraInput, QuotePricingInput, QuoteRequest,
    QuoteResponse, RepriceBookingRequest, ReserveBookingRequest, ReturnOpportunitiesRequest,
    ReturnOpportunitiesResponse, ReturnOpportunityInfo, StateEventInfo, TransitionBookingRequest,
};
