// Copyright (C) 2026 Tokendesk Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Requests carry plain strings and numbers; parsing into domain types
//! happens at the boundary so every validation error surfaces as an
//! `ApiError::InvalidInput` naming the offending field.

/// One weekly availability window, as submitted over the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityRuleSpec {
    /// Weekday name (e.g. "monday" or "mon").
    pub weekday: String,
    /// Wall-clock start, "HH:MM".
    pub start_time: String,
    /// Wall-clock end, "HH:MM" (exclusive).
    pub end_time: String,
    /// IANA timezone name the times are declared in.
    pub timezone: String,
    /// Whether the rule is active.
    pub active: bool,
}

/// A preferred-hours window for surge invitations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferredHoursSpec {
    /// Wall-clock start, "HH:MM".
    pub start_time: String,
    /// Wall-clock end, "HH:MM" (exclusive).
    pub end_time: String,
    /// IANA timezone name.
    pub timezone: String,
}

/// Surge pricing opt-in, as submitted over the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurgeSpec {
    /// Whether surge invitations may be issued.
    pub enabled: bool,
    /// The multiplier percentage (>= 100).
    pub multiplier_percent: u16,
    /// Optional preferred hours narrowing surge eligibility.
    pub preferred_hours: Option<PreferredHoursSpec>,
}

/// API request to register a consultant in the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterConsultantRequest {
    /// The consultant identifier.
    pub consultant_id: i64,
    /// Display name.
    pub display_name: String,
    /// Whether the platform has approved this consultant.
    pub approved: bool,
    /// Specialization tags.
    pub specializations: Vec<String>,
    /// Base rate in centitokens per minute.
    pub rate_centitokens_per_minute: u32,
    /// Weekly availability windows.
    pub availability_rules: Vec<AvailabilityRuleSpec>,
    /// Surge pricing opt-in, if any.
    pub surge: Option<SurgeSpec>,
}

/// API response for a successful consultant registration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RegisterConsultantResponse {
    /// The consultant identifier.
    pub consultant_id: i64,
    /// A success message.
    pub message: String,
}

/// API request to flip a consultant's self-availability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetAvailabilityRequest {
    /// The consultant identifier.
    pub consultant_id: i64,
    /// The new availability flag.
    pub available: bool,
}

/// API response after flipping self-availability.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SetAvailabilityResponse {
    /// The consultant identifier.
    pub consultant_id: i64,
    /// The availability flag now in effect.
    pub available: bool,
    /// A success message.
    pub message: String,
}

/// API request to record a token purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditTokensRequest {
    /// The seeker whose ledger is credited.
    pub seeker_id: i64,
    /// The token amount (must be positive).
    pub amount: i64,
    /// External purchase reference, if any.
    pub reference: Option<String>,
}

/// API response after crediting tokens.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreditTokensResponse {
    /// The seeker identifier.
    pub seeker_id: i64,
    /// The balance after the credit.
    pub balance: i64,
    /// A success message.
    pub message: String,
}

/// API request to submit a consultation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRequestRequest {
    /// Free-text problem description.
    pub description: String,
    /// Technology tags describing the problem's stack.
    pub tech_stack: Vec<String>,
    /// Urgency tier: "low", "medium", or "high".
    pub urgency: String,
    /// Optional pasted error log.
    pub error_log: Option<String>,
}

/// Summary of an open invitation, included in responses that may issue one.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct InvitationInfo {
    /// The invitation identifier.
    pub invitation_id: i64,
    /// The request being offered.
    pub request_id: i64,
    /// The addressed consultant.
    pub consultant_id: i64,
    /// When the invitation lapses (RFC 3339).
    pub expires_at: String,
    /// Whether this is a surge-priced invitation.
    pub is_surge: bool,
    /// The surge multiplier percentage (100 when not surge).
    pub surge_multiplier_percent: u16,
}

/// API response for a submitted request.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SubmitRequestResponse {
    /// The allocated request identifier.
    pub request_id: i64,
    /// The request's status after the initial matching pass.
    pub status: String,
    /// The invitation issued by the initial matching pass, if any.
    pub invitation: Option<InvitationInfo>,
    /// A success message.
    pub message: String,
}

/// API request for a consultant to accept an invitation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptInvitationRequest {
    /// The request the invitation belongs to.
    pub request_id: i64,
    /// The invitation being accepted.
    pub invitation_id: i64,
}

/// API response for an accepted invitation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AcceptInvitationResponse {
    /// The request identifier.
    pub request_id: i64,
    /// The created consultation.
    pub consultation_id: i64,
    /// The accepting consultant.
    pub consultant_id: i64,
    /// The snapshotted session rate in centitokens per minute.
    pub rate_centitokens_per_minute: u32,
    /// A success message.
    pub message: String,
}

/// API request for a consultant to decline an invitation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclineInvitationRequest {
    /// The request the invitation belongs to.
    pub request_id: i64,
    /// The invitation being declined.
    pub invitation_id: i64,
}

/// API response for a declined invitation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeclineInvitationResponse {
    /// The request identifier.
    pub request_id: i64,
    /// The invitation issued to the next candidate, if one was found.
    pub next_invitation: Option<InvitationInfo>,
    /// A success message.
    pub message: String,
}

/// API request for a seeker to shuffle away the current consultant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShuffleRequest {
    /// The request identifier.
    pub request_id: i64,
}

/// API response for a shuffle.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ShuffleResponse {
    /// The request identifier.
    pub request_id: i64,
    /// Shuffles still available after this one.
    pub shuffles_remaining: u8,
    /// The invitation issued by the follow-up matching pass, if any.
    pub invitation: Option<InvitationInfo>,
    /// A success message.
    pub message: String,
}

/// API request for a seeker to cancel a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelRequestRequest {
    /// The request identifier.
    pub request_id: i64,
}

/// API response for a cancelled request.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CancelRequestResponse {
    /// The request identifier.
    pub request_id: i64,
    /// The terminal status ("cancelled").
    pub status: String,
    /// A success message.
    pub message: String,
}

/// API request for a seeker to start the scheduled session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartSessionRequest {
    /// The request identifier.
    pub request_id: i64,
}

/// API response for a started session.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StartSessionResponse {
    /// The request identifier.
    pub request_id: i64,
    /// The running consultation.
    pub consultation_id: i64,
    /// When metering began (RFC 3339).
    pub started_at: String,
    /// A success message.
    pub message: String,
}

/// API request to end a running session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndSessionRequest {
    /// The request identifier.
    pub request_id: i64,
}

/// API response for an ended (settled) session.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EndSessionResponse {
    /// The request identifier.
    pub request_id: i64,
    /// The settled consultation.
    pub consultation_id: i64,
    /// Billable minutes, partial minutes rounded up.
    pub duration_minutes: u32,
    /// Tokens actually debited.
    pub tokens_charged: i64,
    /// Tokens due but not covered by the balance.
    pub tokens_shortfall: i64,
    /// The seeker's balance after settlement.
    pub balance: i64,
    /// True if the session had already been settled and these are the
    /// originally recorded figures.
    pub already_settled: bool,
    /// A success message.
    pub message: String,
}

/// API response for a balance read.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BalanceResponse {
    /// The seeker identifier.
    pub seeker_id: i64,
    /// The current balance.
    pub balance: i64,
    /// How many ledger entries exist.
    pub transaction_count: usize,
}

/// API response describing a request's current state.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RequestInfoResponse {
    /// The request identifier.
    pub request_id: i64,
    /// The request's lifecycle status.
    pub status: String,
    /// The matched consultant, if any.
    pub matched_consultant: Option<i64>,
    /// Seeker-initiated shuffles used so far.
    pub shuffle_count: u8,
    /// Consultants already tried for this request.
    pub excluded_consultants: Vec<i64>,
    /// The open invitation, if any.
    pub invitation: Option<InvitationInfo>,
}

/// API response for a sweep pass over stalled requests.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SweepResponse {
    /// Requests a new matching pass was run for.
    pub reattempted: Vec<i64>,
    /// A summary message.
    pub message: String,
}
