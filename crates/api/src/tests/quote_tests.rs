// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::ApiError;
use crate::handlers::quote;
use crate::request_response::{ExtraInput, QuotePricingInput, QuoteRequest};

fn plain_quote(base_fare: i64) -> QuoteRequest {
    QuoteRequest {
        base_fare,
        extras: Vec::new(),
        pricing: QuotePricingInput::plain(),
        deposit_rate: 0.5,
    }
}

#[test]
fn test_plain_quote_splits_the_deposit() {
    let response = quote(&plain_quote(30000)).unwrap();
    assert_eq!(response.breakdown.total, 30000);
    assert_eq!(response.tier_percentage, None);
    assert_eq!(response.deposit.amount, 15000);
    assert_eq!(response.deposit.remainder, 15000);
}

#[test]
fn test_return_gap_awards_a_tier_and_excludes_the_online_rate() {
    let request = QuoteRequest {
        pricing: QuotePricingInput {
            online_discount_rate: Some(0.05),
            return_gap_minutes: Some(45),
            ..QuotePricingInput::plain()
        },
        ..plain_quote(30000)
    };
    let response = quote(&request).unwrap();
    assert_eq!(response.tier_percentage, Some(30));
    assert_eq!(response.breakdown.tiered_return_discount_value, 9000);
    assert_eq!(response.breakdown.online_discount_value, 0);
    assert_eq!(response.breakdown.total, 21000);
}

#[test]
fn test_gap_under_the_minimum_is_refused() {
    let request = QuoteRequest {
        pricing: QuotePricingInput {
            return_gap_minutes: Some(29),
            ..QuotePricingInput::plain()
        },
        ..plain_quote(30000)
    };
    let result = quote(&request);
    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation { ref rule, .. }) if rule == "min_reposition_gap"
    ));
}

#[test]
fn test_gap_beyond_the_tiers_falls_back_to_the_online_rate() {
    let request = QuoteRequest {
        pricing: QuotePricingInput {
            online_discount_rate: Some(0.05),
            return_gap_minutes: Some(61),
            ..QuotePricingInput::plain()
        },
        ..plain_quote(30000)
    };
    let response = quote(&request).unwrap();
    assert_eq!(response.tier_percentage, None);
    assert_eq!(response.breakdown.online_discount_value, 1500);
    assert_eq!(response.breakdown.tiered_return_discount_value, 0);
}

#[test]
fn test_extras_and_percent_coupon() {
    let request = QuoteRequest {
        extras: vec![ExtraInput {
            label: String::from("Child seat"),
            amount: 10000,
        }],
        pricing: QuotePricingInput {
            coupon_percent: Some(0.10),
            ..QuotePricingInput::plain()
        },
        ..plain_quote(30000)
    };
    let response = quote(&request).unwrap();
    assert_eq!(response.breakdown.extras_total, 10000);
    assert_eq!(response.breakdown.coupon_value, 4000);
    assert_eq!(response.breakdown.total, 36000);
}

#[test]
fn test_both_coupon_forms_are_rejected() {
    let request = QuoteRequest {
        pricing: QuotePricingInput {
            coupon_flat: Some(2000),
            coupon_percent: Some(0.10),
            ..QuotePricingInput::plain()
        },
        ..plain_quote(30000)
    };
    assert!(matches!(
        quote(&request),
        Err(ApiError::InvalidInput { ref field, .. }) if field == "coupon"
    ));
}

#[test]
fn test_out_of_range_rate_is_invalid_input() {
    let request = QuoteRequest {
        pricing: QuotePricingInput {
            online_discount_rate: Some(1.5),
            ..QuotePricingInput::plain()
        },
        ..plain_quote(30000)
    };
    assert!(matches!(quote(&request), Err(ApiError::InvalidInput { .. })));
}

#[test]
fn test_low_deposit_rate_clamps_to_the_minimum() {
    let request = QuoteRequest {
        deposit_rate: 0.05,
        ..plain_quote(10000)
    };
    let response = quote(&request).unwrap();
    assert_eq!(response.deposit.amount, 2000);
    assert_eq!(response.deposit.remainder, 8000);
}

#[test]
fn test_taxes_apply_to_the_discounted_subtotal() {
    let request = QuoteRequest {
        pricing: QuotePricingInput {
            return_gap_minutes: Some(60),
            tax_rate: 0.19,
            ..QuotePricingInput::plain()
        },
        ..plain_quote(30000)
    };
    let response = quote(&request).unwrap();
    assert_eq!(response.breakdown.taxes, 4560);
    assert_eq!(response.breakdown.total, 28560);
}
