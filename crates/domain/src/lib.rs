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

mod block_rule;
mod discount;
mod error;
mod pricing;
mod state;
mod time_window;
mod types;

// Re-export public types and functions
pub use block_rule::{BlockDecision, BlockKind, BlockRule, is_blocked, is_window_blocked};
pub use discount::{
    DISCOUNT_TIERS, DiscountTier, MIN_REPOSITION_MINUTES, TierDecision, TierLabel, discount_for,
};
pub use error::DomainError;
pub use pricing::{
    Coupon, DepositSplit, MIN_DEPOSIT_RATE, PricingBreakdown, PricingContext, compute_breakdown,
    compute_deposit,
};
pub use state::ReservationState;
pub use time_window::{TimeWindow, window_for};
pub use types::{Assignment, ClientContact, Extra, Place, Trip, VehicleClass};
