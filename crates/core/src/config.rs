// Copyright (C) 2026 Tokendesk Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::Duration;
use serde::Deserialize;

/// Engine tunables.
///
/// Deployments load this from any serde front-end; every field has a
/// default matching the platform policy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How long an invitation stays open before lazy expiry, in minutes.
    pub invitation_ttl_minutes: u32,
    /// How many seeker-initiated shuffles a request allows.
    pub max_shuffles: u8,
    /// The shuffle window measured from session start, in minutes.
    pub shuffle_window_minutes: u32,
    /// How long a request may sit in `matching` with no open invitation
    /// before the sweep re-attempts it, in minutes.
    pub sweep_grace_minutes: u32,
}

impl EngineConfig {
    /// Returns the invitation TTL as a duration.
    #[must_use]
    pub fn invitation_ttl(&self) -> Duration {
        Duration::minutes(i64::from(self.invitation_ttl_minutes))
    }

    /// Returns the shuffle window as a duration.
    #[must_use]
    pub fn shuffle_window(&self) -> Duration {
        Duration::minutes(i64::from(self.shuffle_window_minutes))
    }

    /// Returns the sweep grace period as a duration.
    #[must_use]
    pub fn sweep_grace(&self) -> Duration {
        Duration::minutes(i64::from(self.sweep_grace_minutes))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            invitation_ttl_minutes: 10,
            max_shuffles: 2,
            shuffle_window_minutes: 5,
            sweep_grace_minutes: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_platform_policy() {
        let config = EngineConfig::default();

        assert_eq!(config.invitation_ttl_minutes, 10);
        assert_eq!(config.max_shuffles, 2);
        assert_eq!(config.shuffle_window_minutes, 5);
        assert_eq!(config.sweep_grace_minutes, 5);
        assert_eq!(config.shuffle_window(), Duration::minutes(5));
    }
}
