// Copyright (C) 2026 Tokendesk Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.
//!
//! Domain and core errors are translated explicitly so the domain's
//! internals never leak through the API contract.

use thiserror::Error;
use tokendesk::CoreError;
use tokendesk_domain::DomainError;

/// API-level errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Authorization failed - the actor does not have permission.
    #[error("Unauthorized: '{action}' requires {required_role} role")]
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// A domain rule was violated.
    #[error("Domain rule violation ({rule}): {message}")]
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    #[error("Invalid input for field '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    #[error("{resource_type} not found: {message}")]
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked
/// directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidTransition { .. } => ApiError::DomainRuleViolation {
            rule: String::from("lifecycle"),
            message: err.to_string(),
        },
        DomainError::NotInvitationAddressee { .. } => ApiError::Unauthorized {
            action: String::from("respond_to_invitation"),
            required_role: String::from("invited consultant"),
        },
        DomainError::NotRequestParticipant { .. } => ApiError::Unauthorized {
            action: String::from("act_on_request"),
            required_role: String::from("request participant"),
        },
        DomainError::AlreadyResponded { .. } => ApiError::DomainRuleViolation {
            rule: String::from("invitation_single_response"),
            message: err.to_string(),
        },
        DomainError::InvitationExpired { .. } => ApiError::DomainRuleViolation {
            rule: String::from("invitation_ttl"),
            message: err.to_string(),
        },
        DomainError::ShuffleNotAllowed { .. } => ApiError::DomainRuleViolation {
            rule: String::from("shuffle_policy"),
            message: err.to_string(),
        },
        DomainError::InvitationNotFound { invitation_id } => ApiError::ResourceNotFound {
            resource_type: String::from("Invitation"),
            message: format!("Invitation {invitation_id} does not exist on this request"),
        },
        DomainError::ConsultantNotFound { consultant_id } => ApiError::ResourceNotFound {
            resource_type: String::from("Consultant"),
            message: format!("Consultant {consultant_id} is not registered"),
        },
        DomainError::DuplicateConsultant { consultant_id } => ApiError::DomainRuleViolation {
            rule: String::from("unique_consultant"),
            message: format!("Consultant {consultant_id} is already registered"),
        },
        DomainError::ConsultationNotFound { request_id } => ApiError::ResourceNotFound {
            resource_type: String::from("Consultation"),
            message: format!("Request {request_id} has no session this applies to"),
        },
        DomainError::NoMatchedConsultant { request_id } => ApiError::DomainRuleViolation {
            rule: String::from("match_required"),
            message: format!("Request {request_id} is not matched to a consultant"),
        },
        DomainError::InvalidUrgency(ref value) => ApiError::InvalidInput {
            field: String::from("urgency"),
            message: format!("'{value}' is not one of low, medium, high"),
        },
        DomainError::InvalidRequestStatus { .. }
        | DomainError::InvalidInvitationStatus { .. }
        | DomainError::InvalidConsultationStatus { .. } => ApiError::InvalidInput {
            field: String::from("status"),
            message: err.to_string(),
        },
        DomainError::InvalidTechTag(ref value) => ApiError::InvalidInput {
            field: String::from("tech_stack"),
            message: format!("'{value}' is not a usable technology tag"),
        },
        DomainError::InvalidTimezone(ref name) => ApiError::InvalidInput {
            field: String::from("timezone"),
            message: format!("'{name}' is not a recognized IANA timezone"),
        },
        DomainError::InvalidAvailabilityRule { ref reason } => ApiError::InvalidInput {
            field: String::from("availability_rules"),
            message: reason.clone(),
        },
        DomainError::InvalidSurgeMultiplier { percent } => ApiError::InvalidInput {
            field: String::from("surge_multiplier"),
            message: format!("{percent}% is below the 100% minimum"),
        },
        DomainError::InvalidTokenAmount { amount } => ApiError::InvalidInput {
            field: String::from("amount"),
            message: format!("{amount} is not a positive token amount"),
        },
        DomainError::InvalidBillingPeriod { ref reason } => ApiError::Internal {
            message: reason.clone(),
        },
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
    }
}
