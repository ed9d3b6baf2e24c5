// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Half-open time windows over local date/times.
//!
//! A window `[start, end)` is the interval a vehicle is occupied by one
//! trip. Windows are derived data: they are always recomputed from a trip's
//! date + time + duration lookup and never persisted independently.
//!
//! ## Invariants
//!
//! - `end > start` for every constructed window
//! - Overlap uses half-open semantics: a trip ending exactly when another
//!   starts does not overlap it

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use time::{Date, Duration, PrimitiveDateTime, Time};

/// A half-open interval `[start, end)` during which a vehicle is occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Inclusive window start.
    start: PrimitiveDateTime,
    /// Exclusive window end.
    end: PrimitiveDateTime,
}

impl TimeWindow {
    /// Creates a `TimeWindow` from explicit endpoints.
    ///
    /// # Errors
    ///
    /// Returns an error if `end <= start`.
    pub fn new(start: PrimitiveDateTime, end: PrimitiveDateTime) -> Result<Self, DomainError> {
        if end <= start {
            return Err(DomainError::InvalidWindow {
                reason: format!("end {end} is not after start {start}"),
            });
        }
        Ok(Self { start, end })
    }

    /// Returns the inclusive start of the window.
    #[must_use]
    pub const fn start(&self) -> PrimitiveDateTime {
        self.start
    }

    /// Returns the exclusive end of the window.
    #[must_use]
    pub const fn end(&self) -> PrimitiveDateTime {
        self.end
    }

    /// Returns whether this window overlaps `other`.
    ///
    /// Half-open semantics: `a.start < b.end && b.start < a.end`, so
    /// back-to-back windows do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Returns whether `instant` falls inside the window.
    #[must_use]
    pub fn contains(&self, instant: PrimitiveDateTime) -> bool {
        instant >= self.start && instant < self.end
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Computes the occupied window for a departure at `date` + `time` lasting
/// `duration_minutes`.
///
/// # Arguments
///
/// * `date` - The departure date (local)
/// * `time` - The departure time (local)
/// * `duration_minutes` - The estimated trip duration in minutes
///
/// # Errors
///
/// Returns an error if:
/// - `duration_minutes <= 0` (contract violation, fails fast)
/// - adding the duration overflows the representable date range
pub fn window_for(date: Date, time: Time, duration_minutes: i64) -> Result<TimeWindow, DomainError> {
    if duration_minutes <= 0 {
        return Err(DomainError::InvalidDuration {
            minutes: duration_minutes,
        });
    }

    let start: PrimitiveDateTime = PrimitiveDateTime::new(date, time);
    let end: PrimitiveDateTime = start
        .checked_add(Duration::minutes(duration_minutes))
        .ok_or_else(|| DomainError::DateTimeOutOfRange {
            operation: format!("adding {duration_minutes} minutes to {start}"),
        })?;

    TimeWindow::new(start, end)
}
