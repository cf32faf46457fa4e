// Copyright (C) 2026 Tokendesk Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Consultant availability windows and surge opt-in arithmetic.
//!
//! Availability is declared as per-weekday wall-clock ranges in a named IANA
//! timezone. A consultant is available at an instant if at least one active
//! rule covers it (union semantics; overlapping rules are permitted).
//!
//! The surge window is the complement: a surge-enabled consultant is
//! surge-eligible precisely when no regular rule covers the instant, surge
//! existing to fill the gaps in regular hours. A declared preferred-hours
//! window further narrows surge eligibility.
//!
//! ## Invariants
//!
//! - Rule times are wall-clock times in the rule's declared timezone.
//! - An instant that is ambiguous or non-existent in the rule's timezone
//!   (DST transitions) is treated as not covered.
//! - Absent rules mean unavailable; there are no error conditions at query
//!   time. Timezones are validated when rules are constructed.

use crate::billing::SurgeMultiplier;
use crate::error::DomainError;
use chrono::{DateTime, Datelike, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// A single weekly availability rule for a consultant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityRule {
    /// The weekday the rule applies to, in the rule's timezone.
    weekday: Weekday,
    /// Wall-clock start of the window (inclusive).
    start_time: NaiveTime,
    /// Wall-clock end of the window (exclusive).
    end_time: NaiveTime,
    /// IANA timezone name the times are declared in.
    timezone: String,
    /// Inactive rules are retained but never cover anything.
    active: bool,
}

impl AvailabilityRule {
    /// Creates a new `AvailabilityRule`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimezone` if `timezone` is not a
    /// recognized IANA timezone, or `DomainError::InvalidAvailabilityRule`
    /// if the window is empty or inverted.
    pub fn new(
        weekday: Weekday,
        start_time: NaiveTime,
        end_time: NaiveTime,
        timezone: &str,
        active: bool,
    ) -> Result<Self, DomainError> {
        if timezone.parse::<Tz>().is_err() {
            return Err(DomainError::InvalidTimezone(timezone.to_owned()));
        }
        if start_time >= end_time {
            return Err(DomainError::InvalidAvailabilityRule {
                reason: format!("window start {start_time} is not before end {end_time}"),
            });
        }
        Ok(Self {
            weekday,
            start_time,
            end_time,
            timezone: timezone.to_owned(),
            active,
        })
    }

    /// Returns the weekday this rule applies to.
    #[must_use]
    pub const fn weekday(&self) -> Weekday {
        self.weekday
    }

    /// Returns whether this rule is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Returns true if this rule covers the given instant.
    ///
    /// The instant is localized to the rule's timezone before the weekday
    /// and time-range comparison. The start is inclusive, the end exclusive.
    #[must_use]
    pub fn covers(&self, instant: DateTime<Utc>) -> bool {
        if !self.active {
            return false;
        }
        // Timezone validity is established at construction.
        let Ok(tz) = self.timezone.parse::<Tz>() else {
            return false;
        };
        let local = instant.with_timezone(&tz);
        let time: NaiveTime = local.time();
        local.weekday() == self.weekday && time >= self.start_time && time < self.end_time
    }
}

/// A preferred-hours window for surge invitations, applying to every weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferredHours {
    /// Wall-clock start of the window (inclusive).
    start_time: NaiveTime,
    /// Wall-clock end of the window (exclusive).
    end_time: NaiveTime,
    /// IANA timezone name the times are declared in.
    timezone: String,
}

impl PreferredHours {
    /// Creates a new `PreferredHours` window.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimezone` if `timezone` is not a
    /// recognized IANA timezone, or `DomainError::InvalidAvailabilityRule`
    /// if the window is empty or inverted.
    pub fn new(
        start_time: NaiveTime,
        end_time: NaiveTime,
        timezone: &str,
    ) -> Result<Self, DomainError> {
        if timezone.parse::<Tz>().is_err() {
            return Err(DomainError::InvalidTimezone(timezone.to_owned()));
        }
        if start_time >= end_time {
            return Err(DomainError::InvalidAvailabilityRule {
                reason: format!(
                    "preferred-hours start {start_time} is not before end {end_time}"
                ),
            });
        }
        Ok(Self {
            start_time,
            end_time,
            timezone: timezone.to_owned(),
        })
    }

    /// Returns true if the instant falls inside the window on any weekday.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        let Ok(tz) = self.timezone.parse::<Tz>() else {
            return false;
        };
        let time: NaiveTime = instant.with_timezone(&tz).time();
        time >= self.start_time && time < self.end_time
    }
}

/// A consultant's surge pricing opt-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurgeOptIn {
    /// Whether surge invitations may be issued to this consultant.
    pub enabled: bool,
    /// The price multiplier applied to surge invitations.
    pub multiplier: SurgeMultiplier,
    /// Optional preferred hours narrowing when surge invitations are welcome.
    pub preferred_hours: Option<PreferredHours>,
}

impl SurgeOptIn {
    /// Creates a new `SurgeOptIn`.
    #[must_use]
    pub const fn new(
        enabled: bool,
        multiplier: SurgeMultiplier,
        preferred_hours: Option<PreferredHours>,
    ) -> Self {
        Self {
            enabled,
            multiplier,
            preferred_hours,
        }
    }
}

/// Returns true if at least one active rule covers the instant.
#[must_use]
pub fn is_available(rules: &[AvailabilityRule], instant: DateTime<Utc>) -> bool {
    rules.iter().any(|rule| rule.covers(instant))
}

/// Returns true if the consultant is eligible for a surge invitation at the
/// instant.
///
/// Surge eligibility requires the opt-in to be enabled, the instant to fall
/// outside every active regular rule, and — when preferred hours are
/// declared — the instant to fall inside them.
#[must_use]
pub fn is_in_surge_window(
    surge: Option<&SurgeOptIn>,
    rules: &[AvailabilityRule],
    instant: DateTime<Utc>,
) -> bool {
    let Some(surge) = surge else {
        return false;
    };
    if !surge.enabled || is_available(rules, instant) {
        return false;
    }
    surge
        .preferred_hours
        .as_ref()
        .is_none_or(|hours| hours.contains(instant))
}
