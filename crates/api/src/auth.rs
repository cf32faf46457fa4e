// Copyright (C) 2026 Tokendesk Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Actor roles and authorization checks.
//!
//! Authorization is enforced at the API boundary before any command is
//! built: role checks here, participant checks (is this seeker the owner,
//! is this consultant the addressee) in the domain layer where the
//! aggregate is visible.

use crate::error::ApiError;

/// Actor roles for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// A seeker: submits requests, shuffles, starts and ends sessions.
    Seeker,
    /// A consultant: responds to invitations and ends their own sessions.
    Consultant,
    /// An administrator: registers consultants and records token purchases.
    Admin,
    /// The scheduled sweep job re-attempting stalled requests.
    Scheduler,
}

impl Role {
    /// Returns the role name used in error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Seeker => "seeker",
            Self::Consultant => "consultant",
            Self::Admin => "admin",
            Self::Scheduler => "scheduler",
        }
    }
}

/// An authenticated actor with an associated role.
///
/// The id is the actor's domain identifier: a seeker id for seekers, a
/// consultant id for consultants. Admin and scheduler ids are
/// informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The actor's domain identifier.
    pub id: i64,
    /// The role assigned to this actor.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new `AuthenticatedActor`.
    #[must_use]
    pub const fn new(id: i64, role: Role) -> Self {
        Self { id, role }
    }
}

/// Role-based authorization checks, one per guarded action.
pub struct AuthorizationService;

impl AuthorizationService {
    fn require(actor: &AuthenticatedActor, required: Role, action: &str) -> Result<(), ApiError> {
        if actor.role == required {
            Ok(())
        } else {
            Err(ApiError::Unauthorized {
                action: action.to_owned(),
                required_role: required.as_str().to_owned(),
            })
        }
    }

    /// Only admins register or update consultants.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` if the actor is not an admin.
    pub fn authorize_register_consultant(actor: &AuthenticatedActor) -> Result<(), ApiError> {
        Self::require(actor, Role::Admin, "register_consultant")
    }

    /// Only admins record token purchases.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` if the actor is not an admin.
    pub fn authorize_credit_tokens(actor: &AuthenticatedActor) -> Result<(), ApiError> {
        Self::require(actor, Role::Admin, "credit_tokens")
    }

    /// Consultants flip their own availability; admins may flip anyone's.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` if the actor is neither an admin nor
    /// the consultant named in the request.
    pub fn authorize_set_availability(
        actor: &AuthenticatedActor,
        consultant_id: i64,
    ) -> Result<(), ApiError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Consultant if actor.id == consultant_id => Ok(()),
            _ => Err(ApiError::Unauthorized {
                action: String::from("set_consultant_availability"),
                required_role: String::from("consultant (self) or admin"),
            }),
        }
    }

    /// Seeker-only actions: submitting, shuffling, cancelling, starting.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` if the actor is not a seeker.
    pub fn authorize_seeker_action(
        actor: &AuthenticatedActor,
        action: &str,
    ) -> Result<(), ApiError> {
        Self::require(actor, Role::Seeker, action)
    }

    /// Consultant-only actions: responding to invitations.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` if the actor is not a consultant.
    pub fn authorize_consultant_action(
        actor: &AuthenticatedActor,
        action: &str,
    ) -> Result<(), ApiError> {
        Self::require(actor, Role::Consultant, action)
    }

    /// Session settlement: either session party may end it.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` if the actor is neither a seeker nor
    /// a consultant.
    pub fn authorize_end_session(actor: &AuthenticatedActor) -> Result<(), ApiError> {
        match actor.role {
            Role::Seeker | Role::Consultant => Ok(()),
            Role::Admin | Role::Scheduler => Err(ApiError::Unauthorized {
                action: String::from("end_session"),
                required_role: String::from("seeker or consultant"),
            }),
        }
    }

    /// The stalled-request sweep: the scheduler, or an admin running it by
    /// hand.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` for seekers and consultants.
    pub fn authorize_sweep(actor: &AuthenticatedActor) -> Result<(), ApiError> {
        match actor.role {
            Role::Scheduler | Role::Admin => Ok(()),
            Role::Seeker | Role::Consultant => Err(ApiError::Unauthorized {
                action: String::from("sweep_stalled_requests"),
                required_role: String::from("scheduler or admin"),
            }),
        }
    }

    /// Balance reads: the seeker themselves, or an admin.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` otherwise.
    pub fn authorize_balance_read(
        actor: &AuthenticatedActor,
        seeker_id: i64,
    ) -> Result<(), ApiError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Seeker if actor.id == seeker_id => Ok(()),
            _ => Err(ApiError::Unauthorized {
                action: String::from("get_balance"),
                required_role: String::from("seeker (self) or admin"),
            }),
        }
    }
}
