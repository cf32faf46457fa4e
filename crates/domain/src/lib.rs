// Copyright (C) 2026 Tokendesk Contributors
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

mod availability;
mod billing;
mod error;
mod ids;
mod ledger;
mod types;

#[cfg(test)]
mod tests;

pub use availability::{
    AvailabilityRule, PreferredHours, SurgeOptIn, is_available, is_in_surge_window,
};
pub use billing::{BillingSummary, RatePerMinute, SurgeMultiplier, billable_minutes, compute_bill};
pub use error::DomainError;
pub use ids::{ConsultantId, ConsultationId, InvitationId, RequestId, SeekerId};
pub use ledger::{DebitOutcome, TokenLedger, TokenTransaction};
pub use types::{
    Consultant, Consultation, ConsultationRequest, ConsultationStatus, Invitation,
    InvitationStatus, RequestStatus, TechTag, Urgency,
};
