// Copyright (C) 2026 Tokendesk Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation and state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A state machine transition outside the lifecycle table was attempted.
    InvalidTransition {
        /// The aggregate whose lifecycle was violated
        /// (`consultation_request`, `invitation`, or `consultation`).
        aggregate: &'static str,
        /// The current state.
        from: String,
        /// The requested state.
        requested: String,
    },
    /// The responding consultant is not the invitation's addressee.
    NotInvitationAddressee {
        /// The invitation identifier.
        invitation_id: i64,
        /// The consultant who attempted to respond.
        consultant_id: i64,
    },
    /// The acting party is neither the seeker nor the consultant of the aggregate.
    NotRequestParticipant {
        /// The request identifier.
        request_id: i64,
        /// The identifier of the actor who attempted the action.
        actor_id: i64,
    },
    /// The invitation has already been accepted, declined, or expired.
    AlreadyResponded {
        /// The invitation identifier.
        invitation_id: i64,
        /// The settled status of the invitation.
        status: String,
    },
    /// The invitation's TTL has elapsed.
    InvitationExpired {
        /// The invitation identifier.
        invitation_id: i64,
        /// When the invitation expired (RFC 3339).
        expired_at: String,
    },
    /// A shuffle was refused because the window closed or the cap was reached.
    ShuffleNotAllowed {
        /// Why the shuffle was refused.
        reason: String,
        /// How many shuffles remain available to the seeker.
        remaining: u8,
    },
    /// No invitation with the given identifier exists on the request.
    InvitationNotFound {
        /// The invitation identifier.
        invitation_id: i64,
    },
    /// No consultant with the given identifier exists in the directory.
    ConsultantNotFound {
        /// The consultant identifier.
        consultant_id: i64,
    },
    /// A consultant with the given identifier is already registered.
    DuplicateConsultant {
        /// The consultant identifier.
        consultant_id: i64,
    },
    /// The request has no consultation in a state the operation applies to.
    ConsultationNotFound {
        /// The request identifier.
        request_id: i64,
    },
    /// The request is matched but carries no consultant reference.
    NoMatchedConsultant {
        /// The request identifier.
        request_id: i64,
    },
    /// Urgency string is not one of `low`, `medium`, `high`.
    InvalidUrgency(String),
    /// Request status string is not a known lifecycle state.
    InvalidRequestStatus {
        /// The unrecognized status string.
        status: String,
    },
    /// Invitation status string is not a known lifecycle state.
    InvalidInvitationStatus {
        /// The unrecognized status string.
        status: String,
    },
    /// Consultation status string is not a known lifecycle state.
    InvalidConsultationStatus {
        /// The unrecognized status string.
        status: String,
    },
    /// Tech tag is empty or invalid.
    InvalidTechTag(String),
    /// Timezone name is not a recognized IANA timezone.
    InvalidTimezone(String),
    /// Availability rule fields are inconsistent.
    InvalidAvailabilityRule {
        /// Description of the validation failure.
        reason: String,
    },
    /// Surge multiplier is below 100 percent.
    InvalidSurgeMultiplier {
        /// The rejected percentage value.
        percent: u16,
    },
    /// A ledger operation was given a non-positive amount.
    InvalidTokenAmount {
        /// The rejected amount.
        amount: i64,
    },
    /// Billing period endpoints are inconsistent.
    InvalidBillingPeriod {
        /// Description of the inconsistency.
        reason: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTransition {
                aggregate,
                from,
                requested,
            } => {
                write!(
                    f,
                    "Invalid {aggregate} transition from '{from}' to '{requested}'"
                )
            }
            Self::NotInvitationAddressee {
                invitation_id,
                consultant_id,
            } => {
                write!(
                    f,
                    "Consultant {consultant_id} is not the addressee of invitation {invitation_id}"
                )
            }
            Self::NotRequestParticipant {
                request_id,
                actor_id,
            } => {
                write!(
                    f,
                    "Actor {actor_id} is not a participant of request {request_id}"
                )
            }
            Self::AlreadyResponded {
                invitation_id,
                status,
            } => {
                write!(
                    f,
                    "Invitation {invitation_id} has already been settled as '{status}'"
                )
            }
            Self::InvitationExpired {
                invitation_id,
                expired_at,
            } => {
                write!(f, "Invitation {invitation_id} expired at {expired_at}")
            }
            Self::ShuffleNotAllowed { reason, remaining } => {
                write!(
                    f,
                    "Shuffle not allowed: {reason} ({remaining} shuffle(s) remaining)"
                )
            }
            Self::InvitationNotFound { invitation_id } => {
                write!(f, "Invitation {invitation_id} not found")
            }
            Self::ConsultantNotFound { consultant_id } => {
                write!(f, "Consultant {consultant_id} not found")
            }
            Self::DuplicateConsultant { consultant_id } => {
                write!(f, "Consultant {consultant_id} is already registered")
            }
            Self::ConsultationNotFound { request_id } => {
                write!(f, "Request {request_id} has no applicable consultation")
            }
            Self::NoMatchedConsultant { request_id } => {
                write!(f, "Request {request_id} has no matched consultant")
            }
            Self::InvalidUrgency(value) => {
                write!(f, "Invalid urgency '{value}': must be low, medium, or high")
            }
            Self::InvalidRequestStatus { status } => {
                write!(f, "Invalid consultation request status: '{status}'")
            }
            Self::InvalidInvitationStatus { status } => {
                write!(f, "Invalid invitation status: '{status}'")
            }
            Self::InvalidConsultationStatus { status } => {
                write!(f, "Invalid consultation status: '{status}'")
            }
            Self::InvalidTechTag(value) => {
                write!(f, "Invalid tech tag: '{value}'")
            }
            Self::InvalidTimezone(name) => {
                write!(f, "Invalid timezone: '{name}'")
            }
            Self::InvalidAvailabilityRule { reason } => {
                write!(f, "Invalid availability rule: {reason}")
            }
            Self::InvalidSurgeMultiplier { percent } => {
                write!(
                    f,
                    "Invalid surge multiplier: {percent}%. Must be at least 100"
                )
            }
            Self::InvalidTokenAmount { amount } => {
                write!(f, "Invalid token amount: {amount}. Must be positive")
            }
            Self::InvalidBillingPeriod { reason } => {
                write!(f, "Invalid billing period: {reason}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
