// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Operator-defined blackout rules and their evaluation.
//!
//! Rules are created and maintained by an operator (external collaborator)
//! and consumed read-only here. Evaluation is pure: given a slice of rules
//! and an instant or window, decide whether new bookings are blocked and
//! surface the blocking rule's reason.
//!
//! ## Evaluation order
//!
//! 1. `SpecificDate` and `FullDay` rules short-circuit on a date match
//! 2. `DateRange` rules check date containment
//! 3. `TimeRange` rules check time-of-day containment within their date scope
//!
//! Inactive rules are always ignored.

use crate::error::DomainError;
use crate::time_window::TimeWindow;
use serde::{Deserialize, Serialize};
use time::{Date, PrimitiveDateTime, Time};

/// The shape of a blackout rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// The whole of `date_start` is blocked.
    FullDay,
    /// Every date in `[date_start, date_end]` is blocked.
    DateRange,
    /// The `[time_start, time_end)` slice of `date_start` is blocked.
    TimeRange,
    /// Exactly `date_start` is blocked (operator shorthand for `FullDay`).
    SpecificDate,
}

/// An operator-defined blackout preventing new bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRule {
    /// The rule's identifier.
    pub id: i64,
    /// The rule kind.
    pub kind: BlockKind,
    /// First (or only) blocked date.
    pub date_start: Date,
    /// Last blocked date, required for `DateRange`.
    pub date_end: Option<Date>,
    /// Start of the blocked time slice, required for `TimeRange`.
    pub time_start: Option<Time>,
    /// End of the blocked time slice, required for `TimeRange`.
    pub time_end: Option<Time>,
    /// Whether the rule is currently in force.
    pub active: bool,
    /// Operator-facing reason shown when the rule blocks a request.
    pub reason: String,
}

impl BlockRule {
    /// Validates the rule's kind-specific field constraints.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - a `TimeRange` rule is missing times or has `time_start >= time_end`
    /// - a `DateRange` rule is missing `date_end` or has `date_end < date_start`
    pub fn validate(&self) -> Result<(), DomainError> {
        match self.kind {
            BlockKind::TimeRange => match (self.time_start, self.time_end) {
                (Some(start), Some(end)) if start < end => Ok(()),
                (Some(_), Some(_)) => Err(DomainError::InvalidBlockRule {
                    rule_id: self.id,
                    reason: String::from("time_start must be before time_end"),
                }),
                _ => Err(DomainError::InvalidBlockRule {
                    rule_id: self.id,
                    reason: String::from("TimeRange rules require time_start and time_end"),
                }),
            },
            BlockKind::DateRange => match self.date_end {
                Some(end) if end >= self.date_start => Ok(()),
                Some(_) => Err(DomainError::InvalidBlockRule {
                    rule_id: self.id,
                    reason: String::from("date_end must not precede date_start"),
                }),
                None => Err(DomainError::InvalidBlockRule {
                    rule_id: self.id,
                    reason: String::from("DateRange rules require date_end"),
                }),
            },
            BlockKind::FullDay | BlockKind::SpecificDate => Ok(()),
        }
    }

    /// Returns whether this rule blocks the given instant.
    ///
    /// Inactive rules never block.
    #[must_use]
    pub fn blocks(&self, instant: PrimitiveDateTime) -> bool {
        if !self.active {
            return false;
        }
        match self.kind {
            BlockKind::FullDay | BlockKind::SpecificDate => instant.date() == self.date_start,
            BlockKind::DateRange => self.date_end.is_some_and(|end| {
                instant.date() >= self.date_start && instant.date() <= end
            }),
            BlockKind::TimeRange => {
                if instant.date() != self.date_start {
                    return false;
                }
                match (self.time_start, self.time_end) {
                    (Some(start), Some(end)) => instant.time() >= start && instant.time() < end,
                    _ => false,
                }
            }
        }
    }

    /// Returns whether this rule intersects any instant of the given window.
    #[must_use]
    pub fn blocks_window(&self, window: &TimeWindow) -> bool {
        if !self.active {
            return false;
        }
        match self.kind {
            BlockKind::FullDay | BlockKind::SpecificDate => {
                date_range_touches_window(self.date_start, self.date_start, window)
            }
            BlockKind::DateRange => self
                .date_end
                .is_some_and(|end| date_range_touches_window(self.date_start, end, window)),
            BlockKind::TimeRange => match (self.time_start, self.time_end) {
                (Some(start), Some(end)) => {
                    let blocked = TimeWindow::new(
                        PrimitiveDateTime::new(self.date_start, start),
                        PrimitiveDateTime::new(self.date_start, end),
                    );
                    blocked.is_ok_and(|b| b.overlaps(window))
                }
                _ => false,
            },
        }
    }
}

/// Returns whether any date in `[first, last]` falls inside the window.
fn date_range_touches_window(first: Date, last: Date, window: &TimeWindow) -> bool {
    // A blocked day covers [00:00 of the day, 00:00 of the next day).
    window.start().date() <= last && window.end().date() >= first
        // The window may end at exactly midnight of `first`, which does not
        // touch the blocked day under half-open semantics.
        && !(window.end().date() == first && window.end().time() == Time::MIDNIGHT)
}

/// The outcome of a block lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDecision {
    /// Whether the instant/window is blocked.
    pub blocked: bool,
    /// The blocking rule's reason, when blocked.
    pub reason: Option<String>,
}

impl BlockDecision {
    /// The "not blocked" decision.
    #[must_use]
    pub const fn clear() -> Self {
        Self {
            blocked: false,
            reason: None,
        }
    }

    fn because(rule: &BlockRule) -> Self {
        Self {
            blocked: true,
            reason: Some(rule.reason.clone()),
        }
    }
}

/// Sorts rules into the documented evaluation order.
///
/// `SpecificDate`/`FullDay` first, then `DateRange`, then `TimeRange`.
fn evaluation_order(kind: BlockKind) -> u8 {
    match kind {
        BlockKind::SpecificDate | BlockKind::FullDay => 0,
        BlockKind::DateRange => 1,
        BlockKind::TimeRange => 2,
    }
}

/// Checks whether an instant is blocked by any active rule.
///
/// # Arguments
///
/// * `rules` - The operator-defined rules to evaluate
/// * `instant` - The instant to check
#[must_use]
pub fn is_blocked(rules: &[BlockRule], instant: PrimitiveDateTime) -> BlockDecision {
    let mut ordered: Vec<&BlockRule> = rules.iter().collect();
    ordered.sort_by_key(|rule| evaluation_order(rule.kind));

    for rule in ordered {
        if rule.blocks(instant) {
            return BlockDecision::because(rule);
        }
    }
    BlockDecision::clear()
}

/// Checks whether any instant of a window is blocked by any active rule.
///
/// # Arguments
///
/// * `rules` - The operator-defined rules to evaluate
/// * `window` - The requested occupation window
#[must_use]
pub fn is_window_blocked(rules: &[BlockRule], window: &TimeWindow) -> BlockDecision {
    let mut ordered: Vec<&BlockRule> = rules.iter().collect();
    ordered.sort_by_key(|rule| evaluation_order(rule.kind));

    for rule in ordered {
        if rule.blocks_window(window) {
            return BlockDecision::because(rule);
        }
    }
    BlockDecision::clear()
}
