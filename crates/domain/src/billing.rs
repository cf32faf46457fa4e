// Copyright (C) 2026 Tokendesk Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Metered-billing arithmetic for consultation sessions.
//!
//! All money math is integer-only. Rates are expressed in centitokens per
//! minute (one token = 100 centitokens) and surge multipliers as whole
//! percentages, so no floating point ever touches a balance.
//!
//! ## Invariants
//!
//! - Partial minutes always round up (a 1m01s session bills 2 minutes).
//! - Token totals round up to the next whole token.
//! - Both roundings favor the consultant, mirroring the platform billing
//!   policy.

use crate::error::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A surge pricing multiplier, expressed as a whole percentage.
///
/// `100` means no surge. Values below 100 are rejected: surge pricing never
/// discounts a consultant's rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurgeMultiplier {
    /// The multiplier percentage (>= 100).
    percent: u16,
}

impl SurgeMultiplier {
    /// The identity multiplier (no surge).
    pub const NONE: Self = Self { percent: 100 };

    /// Creates a new `SurgeMultiplier`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSurgeMultiplier` if `percent` is below 100.
    pub const fn new(percent: u16) -> Result<Self, DomainError> {
        if percent >= 100 {
            Ok(Self { percent })
        } else {
            Err(DomainError::InvalidSurgeMultiplier { percent })
        }
    }

    /// Returns the multiplier percentage.
    #[must_use]
    pub const fn percent(self) -> u16 {
        self.percent
    }
}

impl Default for SurgeMultiplier {
    fn default() -> Self {
        Self::NONE
    }
}

/// A per-minute consultation rate in centitokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RatePerMinute {
    /// The rate in centitokens per minute.
    centitokens: u32,
}

impl RatePerMinute {
    /// Creates a rate from a centitoken-per-minute value.
    #[must_use]
    pub const fn from_centitokens(centitokens: u32) -> Self {
        Self { centitokens }
    }

    /// Creates a rate from a whole-token-per-minute value.
    #[must_use]
    pub const fn from_tokens(tokens: u32) -> Self {
        Self {
            centitokens: tokens * 100,
        }
    }

    /// Returns the rate in centitokens per minute.
    #[must_use]
    pub const fn centitokens(self) -> u32 {
        self.centitokens
    }

    /// Applies a surge multiplier, rounding up to the next centitoken.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn with_multiplier(self, multiplier: SurgeMultiplier) -> Self {
        let scaled: u64 = self.centitokens as u64 * multiplier.percent as u64;
        // Round up so surge never undercuts the nominal rate.
        Self {
            centitokens: scaled.div_ceil(100) as u32,
        }
    }

    /// Computes the whole tokens due for a number of billable minutes,
    /// rounding up to the next token.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn tokens_due(self, minutes: u32) -> i64 {
        let centitokens: u64 = minutes as u64 * self.centitokens as u64;
        centitokens.div_ceil(100) as i64
    }
}

/// The figures computed when a session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingSummary {
    /// Elapsed minutes, partial minutes rounded up.
    pub duration_minutes: u32,
    /// Whole tokens due at the session's snapshot rate.
    pub tokens_due: i64,
}

/// Computes the billable minutes between two instants, rounding partial
/// minutes up.
///
/// # Errors
///
/// Returns `DomainError::InvalidBillingPeriod` if `ended_at` precedes
/// `started_at`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn billable_minutes(
    started_at: DateTime<Utc>,
    ended_at: DateTime<Utc>,
) -> Result<u32, DomainError> {
    let seconds: i64 = (ended_at - started_at).num_seconds();
    if seconds < 0 {
        return Err(DomainError::InvalidBillingPeriod {
            reason: format!("session ended at {ended_at} before it started at {started_at}"),
        });
    }
    Ok((seconds as u64).div_ceil(60) as u32)
}

/// Computes the billing figures for a session at its snapshot rate.
///
/// The rate is expected to already include any surge multiplier: it is
/// snapshotted onto the consultation when the consultation is created.
///
/// # Errors
///
/// Returns `DomainError::InvalidBillingPeriod` if `ended_at` precedes
/// `started_at`.
pub fn compute_bill(
    started_at: DateTime<Utc>,
    ended_at: DateTime<Utc>,
    rate: RatePerMinute,
) -> Result<BillingSummary, DomainError> {
    let duration_minutes: u32 = billable_minutes(started_at, ended_at)?;
    Ok(BillingSummary {
        duration_minutes,
        tokens_due: rate.tokens_due(duration_minutes),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, h, m, s).unwrap()
    }

    #[test]
    fn test_partial_minutes_round_up() {
        // 1 minute 1 second bills 2 minutes.
        let minutes = billable_minutes(at(9, 0, 0), at(9, 1, 1)).unwrap();
        assert_eq!(minutes, 2);
    }

    #[test]
    fn test_exact_minutes_do_not_round() {
        let minutes = billable_minutes(at(9, 0, 0), at(9, 12, 0)).unwrap();
        assert_eq!(minutes, 12);
    }

    #[test]
    fn test_twelve_and_a_half_minutes_bills_thirteen() {
        let summary = compute_bill(at(9, 0, 0), at(9, 12, 30), RatePerMinute::from_tokens(1))
            .unwrap();
        assert_eq!(summary.duration_minutes, 13);
        assert_eq!(summary.tokens_due, 13);
    }

    #[test]
    fn test_zero_length_session_bills_nothing() {
        let summary = compute_bill(at(9, 0, 0), at(9, 0, 0), RatePerMinute::from_tokens(2))
            .unwrap();
        assert_eq!(summary.duration_minutes, 0);
        assert_eq!(summary.tokens_due, 0);
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let result = billable_minutes(at(10, 0, 0), at(9, 59, 59));
        assert!(matches!(
            result.unwrap_err(),
            DomainError::InvalidBillingPeriod { .. }
        ));
    }

    #[test]
    fn test_fractional_rate_rounds_tokens_up() {
        // 1.5 tokens/min for 3 minutes = 4.5 tokens, billed as 5.
        let rate = RatePerMinute::from_centitokens(150);
        assert_eq!(rate.tokens_due(3), 5);
    }

    #[test]
    fn test_surge_multiplier_scales_rate() {
        let rate = RatePerMinute::from_tokens(2).with_multiplier(SurgeMultiplier::new(150).unwrap());
        assert_eq!(rate.centitokens(), 300);
    }

    #[test]
    fn test_surge_multiplier_rounds_up() {
        // 1.01 tokens/min at 150% = 1.515, stored as 152 centitokens.
        let rate =
            RatePerMinute::from_centitokens(101).with_multiplier(SurgeMultiplier::new(150).unwrap());
        assert_eq!(rate.centitokens(), 152);
    }

    #[test]
    fn test_multiplier_below_hundred_is_rejected() {
        assert!(matches!(
            SurgeMultiplier::new(99).unwrap_err(),
            DomainError::InvalidSurgeMultiplier { percent: 99 }
        ));
    }
}
