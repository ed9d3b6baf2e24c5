// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Pricing breakdown and deposit calculation.
//!
//! All monetary amounts are integer minor currency units (`i64`). Rates are
//! fractions in `[0.0, 1.0]` and every rate application rounds half-up to
//! the nearest minor unit before entering the sum, so a breakdown is always
//! exactly reconstructible from its parts.
//!
//! ## Discount combination rules
//!
//! Exactly one of {tiered-return discount, online-channel discount} applies
//! to the base fare: the tiered-return discount already assumes an
//! online/self-service channel. Coupon and club benefits combine additively
//! with either. All discount values are summed and subtracted once; no
//! percentage compounds on an already-discounted base.

use crate::discount::TierDecision;
use crate::error::DomainError;
use crate::types::Extra;
use serde::{Deserialize, Serialize};

/// A coupon attached to a booking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Coupon {
    /// A flat amount off, in minor units.
    Flat(i64),
    /// A fraction off `base_fare + extras_total`.
    Percent(f64),
}

/// The closed set of pricing inputs recognized by the engine.
///
/// Every recognized discount source is an explicit field so each
/// combination is exhaustively testable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingContext {
    /// Discount rate for the online channel, when configured.
    pub online_discount_rate: Option<f64>,
    /// Coupon applied to this booking, if any.
    pub coupon: Option<Coupon>,
    /// Club/loyalty benefit rate off the base fare, if the client is a member.
    pub club_benefit_rate: Option<f64>,
    /// Tiered empty-return decision for this booking, if one was matched.
    pub tiered_return: Option<TierDecision>,
    /// Tax rate applied to the discounted subtotal; `0.0` disables taxes.
    pub tax_rate: f64,
    /// Lower clamp for the pre-tax subtotal, in minor units. Never negative.
    pub floor: i64,
}

impl PricingContext {
    /// A context with no discounts, no taxes, and a zero floor.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            online_discount_rate: None,
            coupon: None,
            club_benefit_rate: None,
            tiered_return: None,
            tax_rate: 0.0,
            floor: 0,
        }
    }

    /// Validates every rate and amount in the context.
    ///
    /// # Errors
    ///
    /// Returns an error if any rate is outside `[0.0, 1.0]`, a flat coupon
    /// is negative, or the floor is negative.
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(rate) = self.online_discount_rate {
            validate_rate("online_discount_rate", rate)?;
        }
        if let Some(rate) = self.club_benefit_rate {
            validate_rate("club_benefit_rate", rate)?;
        }
        validate_rate("tax_rate", self.tax_rate)?;
        match self.coupon {
            Some(Coupon::Flat(amount)) if amount < 0 => {
                return Err(DomainError::NegativeAmount {
                    field: "coupon",
                    value: amount,
                });
            }
            Some(Coupon::Percent(rate)) => validate_rate("coupon", rate)?,
            _ => {}
        }
        if self.floor < 0 {
            return Err(DomainError::NegativeAmount {
                field: "floor",
                value: self.floor,
            });
        }
        Ok(())
    }
}

fn validate_rate(field: &'static str, value: f64) -> Result<(), DomainError> {
    if !(0.0..=1.0).contains(&value) || value.is_nan() {
        return Err(DomainError::InvalidRate { field, value });
    }
    Ok(())
}

/// A fully itemized price for one booking.
///
/// Invariant: `total = base_fare + extras_total - (sum of discount values)
/// + taxes`, with the pre-tax subtotal clamped at the configured floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingBreakdown {
    /// The base fare in minor units.
    pub base_fare: i64,
    /// Sum of all extras.
    pub extras_total: i64,
    /// Online-channel discount value (zero when the tiered discount applies).
    pub online_discount_value: i64,
    /// Coupon value.
    pub coupon_value: i64,
    /// Club/loyalty benefit value.
    pub club_benefit_value: i64,
    /// Tiered empty-return discount value.
    pub tiered_return_discount_value: i64,
    /// Taxes on the discounted subtotal.
    pub taxes: i64,
    /// The final total.
    pub total: i64,
}

impl PricingBreakdown {
    /// Sum of every discount value in the breakdown.
    #[must_use]
    pub const fn total_discounts(&self) -> i64 {
        self.online_discount_value
            + self.coupon_value
            + self.club_benefit_value
            + self.tiered_return_discount_value
    }
}

/// Applies a rate to an amount, rounding half-up to the nearest minor unit.
#[allow(clippy::cast_possible_truncation)]
fn apply_rate(amount: i64, rate: f64) -> i64 {
    // Minor-unit amounts stay far below 2^52, so the f64 round trip is exact.
    #[allow(clippy::cast_precision_loss)]
    let value: f64 = (amount as f64) * rate;
    value.round() as i64
}

/// Composes base fare, extras, and every applicable discount plus taxes into
/// a final total.
///
/// # Arguments
///
/// * `base_fare` - The base fare in minor units
/// * `extras` - Priced add-ons attached to the booking
/// * `context` - The closed discount/tax configuration
///
/// # Errors
///
/// Returns an error if `base_fare` is negative or the context fails
/// validation.
pub fn compute_breakdown(
    base_fare: i64,
    extras: &[Extra],
    context: &PricingContext,
) -> Result<PricingBreakdown, DomainError> {
    if base_fare < 0 {
        return Err(DomainError::NegativeAmount {
            field: "base_fare",
            value: base_fare,
        });
    }
    context.validate()?;

    let extras_total: i64 = extras.iter().map(|extra| extra.amount).sum();

    // At most one base-fare discount: a matched tier wins over the
    // configured online rate.
    let tiered_applies: bool = context
        .tiered_return
        .as_ref()
        .is_some_and(|decision| decision.applies);

    let tiered_return_discount_value: i64 = if tiered_applies {
        let percentage: u8 = context
            .tiered_return
            .as_ref()
            .map_or(0, |decision| decision.percentage);
        apply_rate(base_fare, f64::from(percentage) / 100.0)
    } else {
        0
    };

    let online_discount_value: i64 = if tiered_applies {
        0
    } else {
        context
            .online_discount_rate
            .map_or(0, |rate| apply_rate(base_fare, rate))
    };

    let coupon_value: i64 = match context.coupon {
        Some(Coupon::Flat(amount)) => amount,
        Some(Coupon::Percent(rate)) => apply_rate(base_fare + extras_total, rate),
        None => 0,
    };

    let club_benefit_value: i64 = context
        .club_benefit_rate
        .map_or(0, |rate| apply_rate(base_fare, rate));

    let total_discounts: i64 = online_discount_value
        + coupon_value
        + club_benefit_value
        + tiered_return_discount_value;

    let subtotal: i64 = (base_fare + extras_total - total_discounts).max(context.floor);

    let taxes: i64 = if context.tax_rate > 0.0 {
        apply_rate(subtotal, context.tax_rate)
    } else {
        0
    };

    Ok(PricingBreakdown {
        base_fare,
        extras_total,
        online_discount_value,
        coupon_value,
        club_benefit_value,
        tiered_return_discount_value,
        taxes,
        total: subtotal + taxes,
    })
}

/// The upfront/balance split of a total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositSplit {
    /// Amount collected upfront.
    pub amount: i64,
    /// Balance due later. Zero in pay-in-full mode.
    pub remainder: i64,
}

/// Lowest accepted deposit fraction.
pub const MIN_DEPOSIT_RATE: f64 = 0.2;

/// Splits a total into deposit and balance.
///
/// `deposit_rate` is clamped to `[0.2, 1.0]`; `1.0` is the pay-in-full mode
/// and yields a zero remainder. The deposit rounds half-up and the remainder
/// takes the residue, so `amount + remainder == total` exactly.
///
/// # Arguments
///
/// * `total` - The booking total in minor units
/// * `deposit_rate` - The requested upfront fraction
///
/// # Errors
///
/// Returns an error if `total` is negative.
pub fn compute_deposit(total: i64, deposit_rate: f64) -> Result<DepositSplit, DomainError> {
    if total < 0 {
        return Err(DomainError::NegativeAmount {
            field: "total",
            value: total,
        });
    }

    let rate: f64 = deposit_rate.clamp(MIN_DEPOSIT_RATE, 1.0);
    let amount: i64 = apply_rate(total, rate).min(total);

    Ok(DepositSplit {
        amount,
        remainder: total - amount,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::discount::discount_for;

    #[test]
    fn test_plain_fare_without_discounts() {
        let breakdown = compute_breakdown(30000, &[], &PricingContext::empty()).unwrap();
        assert_eq!(breakdown.total, 30000);
        assert_eq!(breakdown.total_discounts(), 0);
        assert_eq!(breakdown.taxes, 0);
    }

    #[test]
    fn test_extras_are_summed() {
        let extras = vec![
            Extra::new(String::from("Child seat"), 2500).unwrap(),
            Extra::new(String::from("Extra luggage"), 1500).unwrap(),
        ];
        let breakdown = compute_breakdown(30000, &extras, &PricingContext::empty()).unwrap();
        assert_eq!(breakdown.extras_total, 4000);
        assert_eq!(breakdown.total, 34000);
    }

    #[test]
    fn test_tiered_return_excludes_online_discount() {
        // Both configured; only the tiered 30% may reach the total.
        let context = PricingContext {
            online_discount_rate: Some(0.05),
            tiered_return: Some(discount_for(45)),
            ..PricingContext::empty()
        };
        let breakdown = compute_breakdown(30000, &[], &context).unwrap();
        assert_eq!(breakdown.tiered_return_discount_value, 9000);
        assert_eq!(breakdown.online_discount_value, 0);
        assert_eq!(breakdown.total, 21000);
    }

    #[test]
    fn test_online_discount_used_when_no_tier_matched() {
        let context = PricingContext {
            online_discount_rate: Some(0.05),
            tiered_return: Some(discount_for(61)),
            ..PricingContext::empty()
        };
        let breakdown = compute_breakdown(30000, &[], &context).unwrap();
        assert_eq!(breakdown.online_discount_value, 1500);
        assert_eq!(breakdown.tiered_return_discount_value, 0);
        assert_eq!(breakdown.total, 28500);
    }

    #[test]
    fn test_discounts_are_additive_not_compounded() {
        // 30% tier + 10% club, both off the same 30000 base: 9000 + 3000,
        // never 30% of an already-discounted base.
        let context = PricingContext {
            tiered_return: Some(discount_for(45)),
            club_benefit_rate: Some(0.10),
            ..PricingContext::empty()
        };
        let breakdown = compute_breakdown(30000, &[], &context).unwrap();
        assert_eq!(breakdown.total_discounts(), 12000);
        assert_eq!(breakdown.total, 18000);
    }

    #[test]
    fn test_percent_coupon_applies_to_base_plus_extras() {
        let extras = vec![Extra::new(String::from("Wait time"), 10000).unwrap()];
        let context = PricingContext {
            coupon: Some(Coupon::Percent(0.10)),
            ..PricingContext::empty()
        };
        let breakdown = compute_breakdown(30000, &extras, &context).unwrap();
        assert_eq!(breakdown.coupon_value, 4000);
        assert_eq!(breakdown.total, 36000);
    }

    #[test]
    fn test_flat_coupon_combines_with_online_discount() {
        let context = PricingContext {
            online_discount_rate: Some(0.05),
            coupon: Some(Coupon::Flat(2000)),
            ..PricingContext::empty()
        };
        let breakdown = compute_breakdown(30000, &[], &context).unwrap();
        assert_eq!(breakdown.online_discount_value, 1500);
        assert_eq!(breakdown.coupon_value, 2000);
        assert_eq!(breakdown.total, 26500);
    }

    #[test]
    fn test_total_clamped_at_floor_never_negative() {
        let context = PricingContext {
            coupon: Some(Coupon::Flat(50000)),
            ..PricingContext::empty()
        };
        let breakdown = compute_breakdown(30000, &[], &context).unwrap();
        assert_eq!(breakdown.total, 0);

        let floored = PricingContext {
            coupon: Some(Coupon::Flat(50000)),
            floor: 5000,
            ..PricingContext::empty()
        };
        let breakdown = compute_breakdown(30000, &[], &floored).unwrap();
        assert_eq!(breakdown.total, 5000);
    }

    #[test]
    fn test_taxes_on_discounted_subtotal() {
        let context = PricingContext {
            tiered_return: Some(discount_for(60)),
            tax_rate: 0.19,
            ..PricingContext::empty()
        };
        // 30000 - 6000 = 24000, taxed at 19% = 4560
        let breakdown = compute_breakdown(30000, &[], &context).unwrap();
        assert_eq!(breakdown.taxes, 4560);
        assert_eq!(breakdown.total, 28560);
    }

    #[test]
    fn test_breakdown_invariant_reconstructs_total() {
        let context = PricingContext {
            online_discount_rate: Some(0.05),
            coupon: Some(Coupon::Percent(0.10)),
            club_benefit_rate: Some(0.08),
            tax_rate: 0.19,
            ..PricingContext::empty()
        };
        let extras = vec![Extra::new(String::from("Stopover"), 8000).unwrap()];
        let breakdown = compute_breakdown(42000, &extras, &context).unwrap();
        let subtotal: i64 =
            breakdown.base_fare + breakdown.extras_total - breakdown.total_discounts();
        assert_eq!(breakdown.total, subtotal.max(0) + breakdown.taxes);
    }

    #[test]
    fn test_invalid_rates_are_rejected() {
        let context = PricingContext {
            online_discount_rate: Some(1.5),
            ..PricingContext::empty()
        };
        assert!(compute_breakdown(30000, &[], &context).is_err());

        let context = PricingContext {
            coupon: Some(Coupon::Flat(-10)),
            ..PricingContext::empty()
        };
        assert!(compute_breakdown(30000, &[], &context).is_err());
    }

    #[test]
    fn test_deposit_split_half_up_rounding() {
        let split = compute_deposit(30001, 0.5).unwrap();
        assert_eq!(split.amount, 15001);
        assert_eq!(split.remainder, 15000);
        assert_eq!(split.amount + split.remainder, 30001);
    }

    #[test]
    fn test_deposit_rate_clamped_to_minimum() {
        let split = compute_deposit(10000, 0.05).unwrap();
        assert_eq!(split.amount, 2000);
        assert_eq!(split.remainder, 8000);
    }

    #[test]
    fn test_pay_in_full_mode() {
        let split = compute_deposit(10000, 1.0).unwrap();
        assert_eq!(split.amount, 10000);
        assert_eq!(split.remainder, 0);

        // Rates above 1.0 clamp down to pay-in-full
        let split = compute_deposit(10000, 1.7).unwrap();
        assert_eq!(split.remainder, 0);
    }

    #[test]
    fn test_deposit_of_zero_total() {
        let split = compute_deposit(0, 0.5).unwrap();
        assert_eq!(split.amount, 0);
        assert_eq!(split.remainder, 0);
    }
}
