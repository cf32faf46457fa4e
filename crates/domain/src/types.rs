// Copyright (C) 2026 Tokendesk Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Core aggregate types and their lifecycle tables.
//!
//! Every aggregate status is a closed enum with a single
//! `validate_transition` table; call sites never compare status strings.

use crate::availability::{AvailabilityRule, SurgeOptIn};
use crate::billing::RatePerMinute;
use crate::error::DomainError;
use crate::ids::{ConsultantId, ConsultationId, InvitationId, RequestId, SeekerId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Urgency tier of a consultation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    /// No immediate pressure.
    Low,
    /// Blocking but not on fire.
    Medium,
    /// Production is down.
    High,
}

impl Urgency {
    /// Returns the string representation of the urgency tier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parses an urgency tier from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidUrgency` if the string is not recognized.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(DomainError::InvalidUrgency(s.to_owned())),
        }
    }
}

impl FromStr for Urgency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle states of a seeker-visible consultation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Submitted, not yet queued for matching.
    Pending,
    /// The matching engine owns the request; an invitation may be open.
    Matching,
    /// A consultant accepted; a session is scheduled but not started.
    Matched,
    /// The session is running and metered.
    InProgress,
    /// The session ended and was billed. Terminal.
    Completed,
    /// Cancelled by the seeker or by shuffle exhaustion handling. Terminal.
    Cancelled,
}

impl RequestStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Matching => "matching",
            Self::Matched => "matched",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRequestStatus` if the string is not a
    /// valid status.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending" => Ok(Self::Pending),
            "matching" => Ok(Self::Matching),
            "matched" => Ok(Self::Matched),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidRequestStatus {
                status: s.to_owned(),
            }),
        }
    }

    /// Returns true if this status is terminal (the request is immutable).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Checks if a transition from this status to another is in the
    /// lifecycle table.
    ///
    /// Valid transitions are:
    /// - `pending` → `matching` (queued for matching)
    /// - `matching` → `matched` (invitation accepted)
    /// - `matched` → `in_progress` (session started)
    /// - `in_progress` → `completed` (session ended)
    /// - `matching`/`matched`/`in_progress` → `cancelled` (explicit cancel)
    /// - `matched`/`in_progress` → `matching` (shuffle)
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Matching)
                | (Self::Matching, Self::Matched)
                | (Self::Matched, Self::InProgress)
                | (Self::InProgress, Self::Completed)
                | (
                    Self::Matching | Self::Matched | Self::InProgress,
                    Self::Cancelled
                )
                | (Self::Matched | Self::InProgress, Self::Matching)
        )
    }

    /// Validates a transition against the lifecycle table.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` identifying the current and
    /// requested states if the transition is not permitted.
    pub fn validate_transition(&self, target: Self) -> Result<(), DomainError> {
        if self.can_transition_to(target) {
            Ok(())
        } else {
            Err(DomainError::InvalidTransition {
                aggregate: "consultation_request",
                from: self.as_str().to_owned(),
                requested: target.as_str().to_owned(),
            })
        }
    }
}

impl FromStr for RequestStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle states of an invitation. Every non-pending state is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    /// Awaiting the consultant's response.
    Pending,
    /// The consultant accepted. Terminal.
    Accepted,
    /// The consultant declined. Terminal.
    Declined,
    /// The TTL elapsed without a response. Terminal.
    Expired,
}

impl InvitationStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::Expired => "expired",
        }
    }

    /// Parses a status from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidInvitationStatus` if the string is not a
    /// valid status.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "declined" => Ok(Self::Declined),
            "expired" => Ok(Self::Expired),
            _ => Err(DomainError::InvalidInvitationStatus {
                status: s.to_owned(),
            }),
        }
    }

    /// Returns true if the invitation has been settled.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Checks if a transition from this status to another is valid.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Accepted | Self::Declined | Self::Expired)
        )
    }

    /// Validates a transition against the lifecycle table.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` if the transition is not
    /// permitted.
    pub fn validate_transition(&self, target: Self) -> Result<(), DomainError> {
        if self.can_transition_to(target) {
            Ok(())
        } else {
            Err(DomainError::InvalidTransition {
                aggregate: "invitation",
                from: self.as_str().to_owned(),
                requested: target.as_str().to_owned(),
            })
        }
    }
}

impl FromStr for InvitationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle states of a billable consultation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsultationStatus {
    /// Created on invitation acceptance; not yet started.
    Scheduled,
    /// Running and metered.
    InProgress,
    /// Ended and billed exactly once. Terminal.
    Completed,
    /// Abandoned without billing (shuffle or cancel). Terminal.
    Cancelled,
}

impl ConsultationStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidConsultationStatus` if the string is not
    /// a valid status.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidConsultationStatus {
                status: s.to_owned(),
            }),
        }
    }

    /// Returns true if the consultation has reached a terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Checks if a transition from this status to another is valid.
    ///
    /// Valid transitions are:
    /// - `scheduled` → `in_progress` (session start)
    /// - `in_progress` → `completed` (session end, billed)
    /// - `scheduled`/`in_progress` → `cancelled` (shuffle or cancel, unbilled)
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Scheduled, Self::InProgress)
                | (Self::InProgress, Self::Completed)
                | (Self::Scheduled | Self::InProgress, Self::Cancelled)
        )
    }

    /// Validates a transition against the lifecycle table.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` if the transition is not
    /// permitted.
    pub fn validate_transition(&self, target: Self) -> Result<(), DomainError> {
        if self.can_transition_to(target) {
            Ok(())
        } else {
            Err(DomainError::InvalidTransition {
                aggregate: "consultation",
                from: self.as_str().to_owned(),
                requested: target.as_str().to_owned(),
            })
        }
    }
}

impl FromStr for ConsultationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for ConsultationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A technology/specialization tag.
///
/// Tags are normalized to lowercase so matching is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TechTag {
    /// The normalized tag value.
    value: String,
}

impl TechTag {
    /// Creates a new `TechTag`, trimming and lowercasing the value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTechTag` if the trimmed value is empty.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        let normalized = value.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(DomainError::InvalidTechTag(value.to_owned()));
        }
        Ok(Self { value: normalized })
    }

    /// Returns the normalized tag value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for TechTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A seeker's submitted problem awaiting (or holding) a matched consultant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsultationRequest {
    /// The request identifier.
    pub request_id: RequestId,
    /// The seeker who owns this request.
    pub seeker_id: SeekerId,
    /// Free-text problem description.
    pub description: String,
    /// Technology tags describing the problem's stack.
    pub tech_stack: Vec<TechTag>,
    /// Urgency tier.
    pub urgency: Urgency,
    /// Optional free-text error log pasted by the seeker.
    pub error_log: Option<String>,
    /// Lifecycle status; transitions only through the lifecycle table.
    pub status: RequestStatus,
    /// Consultants already tried (declined, expired, or shuffled away).
    pub excluded_consultants: Vec<ConsultantId>,
    /// How many seeker-initiated shuffles have been used.
    pub shuffle_count: u8,
    /// The currently open invitation, if any.
    pub current_invitation: Option<InvitationId>,
    /// The consultant the request is matched to, if any.
    pub matched_consultant: Option<ConsultantId>,
    /// When the request was submitted.
    pub submitted_at: DateTime<Utc>,
    /// When the request last changed; drives the stalled-request sweep.
    pub updated_at: DateTime<Utc>,
}

impl ConsultationRequest {
    /// Creates a newly submitted request in `pending` status.
    #[must_use]
    pub const fn new(
        request_id: RequestId,
        seeker_id: SeekerId,
        description: String,
        tech_stack: Vec<TechTag>,
        urgency: Urgency,
        error_log: Option<String>,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            request_id,
            seeker_id,
            description,
            tech_stack,
            urgency,
            error_log,
            status: RequestStatus::Pending,
            excluded_consultants: Vec::new(),
            shuffle_count: 0,
            current_invitation: None,
            matched_consultant: None,
            submitted_at,
            updated_at: submitted_at,
        }
    }

    /// Returns true if the consultant has already been tried for this
    /// request.
    #[must_use]
    pub fn is_excluded(&self, consultant_id: ConsultantId) -> bool {
        self.excluded_consultants.contains(&consultant_id)
    }

    /// Adds a consultant to the exclusion set (idempotent).
    pub fn exclude(&mut self, consultant_id: ConsultantId) {
        if !self.is_excluded(consultant_id) {
            self.excluded_consultants.push(consultant_id);
        }
    }
}

/// A time-boxed offer of a specific request to a specific consultant.
///
/// Once settled (accepted, declined, or expired) an invitation is immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitation {
    /// The invitation identifier.
    pub invitation_id: InvitationId,
    /// The request being offered.
    pub request_id: RequestId,
    /// The consultant the offer is addressed to.
    pub consultant_id: ConsultantId,
    /// Lifecycle status.
    pub status: InvitationStatus,
    /// When the invitation was issued.
    pub issued_at: DateTime<Utc>,
    /// When the invitation lapses (`issued_at` + TTL).
    pub expires_at: DateTime<Utc>,
    /// When the consultant responded, if they did.
    pub responded_at: Option<DateTime<Utc>>,
    /// Whether this is a surge-priced invitation.
    pub is_surge: bool,
    /// The surge multiplier (identity when not surge).
    pub surge_multiplier: crate::billing::SurgeMultiplier,
}

impl Invitation {
    /// Creates a new pending invitation with a TTL measured from `issued_at`.
    #[must_use]
    pub fn new(
        invitation_id: InvitationId,
        request_id: RequestId,
        consultant_id: ConsultantId,
        issued_at: DateTime<Utc>,
        ttl: Duration,
        is_surge: bool,
        surge_multiplier: crate::billing::SurgeMultiplier,
    ) -> Self {
        Self {
            invitation_id,
            request_id,
            consultant_id,
            status: InvitationStatus::Pending,
            issued_at,
            expires_at: issued_at + ttl,
            responded_at: None,
            is_surge,
            surge_multiplier,
        }
    }

    /// Returns true if the TTL has elapsed at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Returns true if the invitation is pending and not yet expired at
    /// `now`.
    #[must_use]
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.status == InvitationStatus::Pending && !self.is_expired(now)
    }
}

/// The billable session created when an invitation is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consultation {
    /// The consultation identifier.
    pub consultation_id: ConsultationId,
    /// The originating request.
    pub request_id: RequestId,
    /// The billed seeker.
    pub seeker_id: SeekerId,
    /// The consultant rendering the session.
    pub consultant_id: ConsultantId,
    /// Lifecycle status.
    pub status: ConsultationStatus,
    /// Effective rate snapshotted at creation, surge multiplier included.
    pub rate_per_minute: RatePerMinute,
    /// When the session started, if it did.
    pub started_at: Option<DateTime<Utc>>,
    /// When the session ended, if it did.
    pub ended_at: Option<DateTime<Utc>>,
    /// Billable minutes; written exactly once at completion.
    pub duration_minutes: Option<u32>,
    /// Tokens actually debited; written exactly once at completion.
    pub tokens_charged: Option<i64>,
    /// Tokens due but not covered by the seeker's balance at completion.
    pub tokens_shortfall: Option<i64>,
}

impl Consultation {
    /// Creates a scheduled consultation with its rate snapshot.
    #[must_use]
    pub const fn new(
        consultation_id: ConsultationId,
        request_id: RequestId,
        seeker_id: SeekerId,
        consultant_id: ConsultantId,
        rate_per_minute: RatePerMinute,
    ) -> Self {
        Self {
            consultation_id,
            request_id,
            seeker_id,
            consultant_id,
            status: ConsultationStatus::Scheduled,
            rate_per_minute,
            started_at: None,
            ended_at: None,
            duration_minutes: None,
            tokens_charged: None,
            tokens_shortfall: None,
        }
    }
}

/// A consultant's directory entry: everything matching needs to rank and
/// invite them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consultant {
    /// The consultant identifier.
    pub consultant_id: ConsultantId,
    /// Display name (informational, not unique).
    pub display_name: String,
    /// Whether the platform has approved this consultant.
    pub approved: bool,
    /// Whether the consultant currently marks themselves available.
    pub self_available: bool,
    /// Specialization tags, normalized.
    pub specializations: Vec<TechTag>,
    /// Base rate in centitokens per minute (before any surge multiplier).
    pub rate_per_minute: RatePerMinute,
    /// How many sessions the consultant currently has live.
    pub active_sessions: u32,
    /// When the consultant was last assigned a request.
    pub last_assigned_at: Option<DateTime<Utc>>,
    /// Weekly availability rules (union semantics).
    pub availability_rules: Vec<AvailabilityRule>,
    /// Surge pricing opt-in, if any.
    pub surge: Option<SurgeOptIn>,
}

impl Consultant {
    /// Creates a new directory entry with no live sessions.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        consultant_id: ConsultantId,
        display_name: String,
        approved: bool,
        self_available: bool,
        specializations: Vec<TechTag>,
        rate_per_minute: RatePerMinute,
        availability_rules: Vec<AvailabilityRule>,
        surge: Option<SurgeOptIn>,
    ) -> Self {
        Self {
            consultant_id,
            display_name,
            approved,
            self_available,
            specializations,
            rate_per_minute,
            active_sessions: 0,
            last_assigned_at: None,
            availability_rules,
            surge,
        }
    }

    /// Counts how many of the consultant's specializations intersect the
    /// request's tech stack.
    #[must_use]
    pub fn specialization_overlap(&self, tech_stack: &[TechTag]) -> usize {
        self.specializations
            .iter()
            .filter(|tag| tech_stack.contains(tag))
            .count()
    }
}
