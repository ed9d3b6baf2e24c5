// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tiered empty-return discount calculation.
//!
//! When a new trip departs shortly after another trip's estimated completion
//! on the mirrored route, the otherwise empty return leg subsidizes the new
//! trip. The discount depends only on the elapsed minutes between the
//! reference service's estimated end and the candidate departure.
//!
//! The tier table is a fixed domain constant, not runtime-editable.
//! Boundaries are inclusive and evaluated in ascending order; first match
//! wins.

use serde::{Deserialize, Serialize};

/// Minimum repositioning gap. Anything tighter than this is refused
/// outright: the preceding service cannot plausibly finish and the vehicle
/// reposition in time, and a tighter request may indicate a scheduling
/// error upstream.
pub const MIN_REPOSITION_MINUTES: i64 = 30;

/// The name of a discount tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierLabel {
    /// 50% discount at exactly the minimum gap.
    Maximum,
    /// 30% discount.
    Intermediate,
    /// 20% discount.
    Basic,
    /// No tier applies.
    None,
}

impl TierLabel {
    /// Returns the string representation of this label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Maximum => "maximum",
            Self::Intermediate => "intermediate",
            Self::Basic => "basic",
            Self::None => "none",
        }
    }
}

/// One row of the discount tier table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscountTier {
    /// Inclusive lower bound in elapsed minutes.
    pub min_minutes: i64,
    /// Inclusive upper bound in elapsed minutes.
    pub max_minutes_inclusive: i64,
    /// The awarded discount percentage.
    pub percentage: u8,
    /// The tier's label.
    pub label: TierLabel,
}

/// The fixed, ordered tier table.
///
/// `== 30` minutes earns the maximum discount; the benefit decays as the
/// vehicle would otherwise idle longer before the return leg.
pub const DISCOUNT_TIERS: [DiscountTier; 3] = [
    DiscountTier {
        min_minutes: 30,
        max_minutes_inclusive: 30,
        percentage: 50,
        label: TierLabel::Maximum,
    },
    DiscountTier {
        min_minutes: 31,
        max_minutes_inclusive: 45,
        percentage: 30,
        label: TierLabel::Intermediate,
    },
    DiscountTier {
        min_minutes: 46,
        max_minutes_inclusive: 60,
        percentage: 20,
        label: TierLabel::Basic,
    },
];

/// The outcome of a tier lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierDecision {
    /// Whether a discount applies at all.
    pub applies: bool,
    /// The awarded percentage (0 when no tier applies).
    pub percentage: u8,
    /// The matched tier's label.
    pub label: TierLabel,
    /// Why the request was refused, for the "too soon" outcome.
    ///
    /// "Too soon" is a distinct outcome from "no discount available": a gap
    /// under the repositioning minimum is not offered even at zero discount.
    pub rejection: Option<String>,
}

impl TierDecision {
    const fn awarded(tier: &DiscountTier) -> Self {
        Self {
            applies: true,
            percentage: tier.percentage,
            label: tier.label,
            rejection: None,
        }
    }

    fn too_soon(elapsed_minutes: i64) -> Self {
        Self {
            applies: false,
            percentage: 0,
            label: TierLabel::None,
            rejection: Some(format!(
                "too soon: {elapsed_minutes} minutes is under the {MIN_REPOSITION_MINUTES} minute repositioning minimum"
            )),
        }
    }

    const fn beyond_tiers() -> Self {
        Self {
            applies: false,
            percentage: 0,
            label: TierLabel::None,
            rejection: None,
        }
    }
}

/// Maps elapsed minutes to a discount tier.
///
/// Pure and total for any `elapsed_minutes`, negatives included (treated as
/// "too soon").
///
/// # Arguments
///
/// * `elapsed_minutes` - Minutes between the reference service's estimated
///   end and the candidate departure
#[must_use]
pub fn discount_for(elapsed_minutes: i64) -> TierDecision {
    if elapsed_minutes < MIN_REPOSITION_MINUTES {
        return TierDecision::too_soon(elapsed_minutes);
    }

    for tier in &DISCOUNT_TIERS {
        if elapsed_minutes >= tier.min_minutes && elapsed_minutes <= tier.max_minutes_inclusive {
            return TierDecision::awarded(tier);
        }
    }

    TierDecision::beyond_tiers()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_under_minimum_is_rejected_as_too_soon() {
        let decision = discount_for(29);
        assert!(!decision.applies);
        assert!(decision.rejection.is_some());
        assert_eq!(decision.label, TierLabel::None);
    }

    #[test]
    fn test_negative_elapsed_is_too_soon() {
        let decision = discount_for(-45);
        assert!(!decision.applies);
        assert!(decision.rejection.is_some());
    }

    #[test]
    fn test_exactly_thirty_is_maximum_tier() {
        let decision = discount_for(30);
        assert!(decision.applies);
        assert_eq!(decision.percentage, 50);
        assert_eq!(decision.label, TierLabel::Maximum);
    }

    #[test]
    fn test_intermediate_tier_boundaries() {
        let low = discount_for(31);
        assert_eq!((low.percentage, low.label), (30, TierLabel::Intermediate));

        let high = discount_for(45);
        assert_eq!((high.percentage, high.label), (30, TierLabel::Intermediate));
    }

    #[test]
    fn test_basic_tier_boundaries() {
        let low = discount_for(46);
        assert_eq!((low.percentage, low.label), (20, TierLabel::Basic));

        let high = discount_for(60);
        assert_eq!((high.percentage, high.label), (20, TierLabel::Basic));
    }

    #[test]
    fn test_beyond_sixty_no_discount_but_not_rejected() {
        let decision = discount_for(61);
        assert!(!decision.applies);
        assert_eq!(decision.percentage, 0);
        // Distinct from "too soon": no rejection reason
        assert!(decision.rejection.is_none());
    }

    #[test]
    fn test_tier_table_is_contiguous_and_ordered() {
        let mut previous_end: i64 = MIN_REPOSITION_MINUTES - 1;
        for tier in &DISCOUNT_TIERS {
            assert_eq!(tier.min_minutes, previous_end + 1);
            assert!(tier.max_minutes_inclusive >= tier.min_minutes);
            previous_end = tier.max_minutes_inclusive;
        }
    }
}
