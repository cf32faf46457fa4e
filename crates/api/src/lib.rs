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
    clippy::all
)]

//! API boundary layer for the Tokendesk consultation marketplace.
//!
//! Operations authorize the authenticated actor, translate request DTOs
//! into domain types, drive the core engine under per-request locks, and
//! translate domain errors into the API contract.

mod auth;
mod clock;
mod error;
mod marketplace;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthorizationService, Role};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ApiError, translate_core_error, translate_domain_error};
pub use marketplace::Marketplace;
pub use request_response::{
    AcceptInvitationRequest, AcceptInvitationResponse, AvailabilityRuleSpec, BalanceResponse,
    CancelRequestRequest, CancelRequestResponse, CreditTokensRequest, CreditTokensResponse,
    DeclineInvitationRequest, DeclineInvitationResponse, EndSessionRequest, EndSessionResponse,
    InvitationInfo, PreferredHoursSpec, RegisterConsultantRequest, RegisterConsultantResponse,
    RequestInfoResponse, SetAvailabilityRequest, SetAvailabilityResponse, ShuffleRequest,
    ShuffleResponse, StartSessionRequest, StartSessionResponse, SubmitRequestRequest,
    SubmitRequestResponse, SurgeSpec, SweepResponse,
};
