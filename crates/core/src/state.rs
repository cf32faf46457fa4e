// Copyright (C) 2026 Tokendesk Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::{DateTime, Utc};
use tokendesk_domain::{
    BillingSummary, Consultant, ConsultantId, Consultation, ConsultationRequest,
    ConsultationStatus, DomainError, Invitation, InvitationId, InvitationStatus, TokenLedger,
};
use tokendesk_events::Notification;

/// The consultant pool the matching engine draws from.
///
/// This is global system metadata, separate from the per-request scoped
/// state: registration, self-availability, and live-session bookkeeping
/// live here.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConsultantDirectory {
    /// All registered consultants.
    consultants: Vec<Consultant>,
}

impl ConsultantDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            consultants: Vec::new(),
        }
    }

    /// Registers a consultant.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DuplicateConsultant` if the id is already
    /// registered.
    pub fn register(&mut self, consultant: Consultant) -> Result<(), DomainError> {
        if self.get(consultant.consultant_id).is_some() {
            return Err(DomainError::DuplicateConsultant {
                consultant_id: consultant.consultant_id.value(),
            });
        }
        self.consultants.push(consultant);
        Ok(())
    }

    /// Looks up a consultant by id.
    #[must_use]
    pub fn get(&self, consultant_id: ConsultantId) -> Option<&Consultant> {
        self.consultants
            .iter()
            .find(|c| c.consultant_id == consultant_id)
    }

    /// Returns all registered consultants.
    #[must_use]
    pub fn consultants(&self) -> &[Consultant] {
        &self.consultants
    }

    /// Sets a consultant's self-availability flag.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ConsultantNotFound` if the id is unknown.
    pub fn set_self_available(
        &mut self,
        consultant_id: ConsultantId,
        available: bool,
    ) -> Result<(), DomainError> {
        let consultant = self.get_mut(consultant_id)?;
        consultant.self_available = available;
        Ok(())
    }

    /// Records an assignment: bumps the live-session count and the
    /// last-assignment instant used by the fairness tie-break.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ConsultantNotFound` if the id is unknown.
    pub fn record_assignment(
        &mut self,
        consultant_id: ConsultantId,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let consultant = self.get_mut(consultant_id)?;
        consultant.active_sessions += 1;
        consultant.last_assigned_at = Some(now);
        Ok(())
    }

    /// Releases an assignment when a session ends or is abandoned.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ConsultantNotFound` if the id is unknown.
    pub fn release_assignment(&mut self, consultant_id: ConsultantId) -> Result<(), DomainError> {
        let consultant = self.get_mut(consultant_id)?;
        consultant.active_sessions = consultant.active_sessions.saturating_sub(1);
        Ok(())
    }

    fn get_mut(&mut self, consultant_id: ConsultantId) -> Result<&mut Consultant, DomainError> {
        self.consultants
            .iter_mut()
            .find(|c| c.consultant_id == consultant_id)
            .ok_or(DomainError::ConsultantNotFound {
                consultant_id: consultant_id.value(),
            })
    }
}

/// The complete state of one consultation request aggregate.
///
/// State is scoped to a single request: the request itself, every
/// invitation ever issued for it, and every consultation created from it.
/// Writes are serialized per aggregate by the hosting layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestState {
    /// The seeker-visible request.
    pub request: ConsultationRequest,
    /// All invitations issued for this request, oldest first.
    pub invitations: Vec<Invitation>,
    /// All consultations created for this request, oldest first.
    /// Earlier entries can only be `cancelled` (shuffled away).
    pub consultations: Vec<Consultation>,
}

impl RequestState {
    /// Creates the aggregate for a newly submitted request.
    #[must_use]
    pub const fn new(request: ConsultationRequest) -> Self {
        Self {
            request,
            invitations: Vec::new(),
            consultations: Vec::new(),
        }
    }

    /// Looks up an invitation by id.
    #[must_use]
    pub fn invitation(&self, invitation_id: InvitationId) -> Option<&Invitation> {
        self.invitations
            .iter()
            .find(|inv| inv.invitation_id == invitation_id)
    }

    /// Returns the invitation still marked pending, if any.
    ///
    /// This includes a pending invitation whose TTL has lapsed but which
    /// has not yet been settled by a lazy-expiry pass.
    #[must_use]
    pub fn pending_invitation(&self) -> Option<&Invitation> {
        self.invitations
            .iter()
            .find(|inv| inv.status == InvitationStatus::Pending)
    }

    /// Returns the pending invitation if it is still within its TTL at
    /// `now`.
    #[must_use]
    pub fn open_invitation(&self, now: DateTime<Utc>) -> Option<&Invitation> {
        self.pending_invitation().filter(|inv| !inv.is_expired(now))
    }

    /// Returns the consultation that is not yet terminal, if any.
    #[must_use]
    pub fn active_consultation(&self) -> Option<&Consultation> {
        self.consultations
            .iter()
            .find(|c| !c.status.is_terminal())
    }

    /// Returns the most recently created consultation, if any.
    #[must_use]
    pub fn latest_consultation(&self) -> Option<&Consultation> {
        self.consultations.last()
    }

    pub(crate) fn invitation_mut(
        &mut self,
        invitation_id: InvitationId,
    ) -> Result<&mut Invitation, DomainError> {
        self.invitations
            .iter_mut()
            .find(|inv| inv.invitation_id == invitation_id)
            .ok_or(DomainError::InvitationNotFound {
                invitation_id: invitation_id.value(),
            })
    }

    pub(crate) fn active_consultation_mut(&mut self) -> Option<&mut Consultation> {
        self.consultations
            .iter_mut()
            .find(|c| !c.status.is_terminal())
    }

    pub(crate) fn in_progress_consultation_mut(&mut self) -> Option<&mut Consultation> {
        self.consultations
            .iter_mut()
            .find(|c| c.status == ConsultationStatus::InProgress)
    }
}

/// The result of a successful state transition.
///
/// Transitions are atomic: they either succeed completely or fail without
/// side effects. Notifications describe what external collaborators should
/// be told after the transition commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The new aggregate state after the transition.
    pub new_state: RequestState,
    /// The directory after any assignment bookkeeping.
    pub new_directory: ConsultantDirectory,
    /// Fire-and-forget events to hand to the dispatcher after commit.
    pub notifications: Vec<Notification>,
}

/// The result of a session settlement.
///
/// Settlement additionally carries the seeker's ledger because the debit
/// and the completed-transition are one atomic unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementResult {
    /// The new aggregate state after the transition.
    pub new_state: RequestState,
    /// The directory after releasing the consultant's assignment.
    pub new_directory: ConsultantDirectory,
    /// The seeker's ledger after the debit.
    pub new_ledger: TokenLedger,
    /// The billed figures (duration and tokens due).
    pub summary: BillingSummary,
    /// Tokens due but not covered by the seeker's balance.
    pub shortfall: i64,
    /// True if the session had already been settled and this call was a
    /// no-op returning the original figures.
    pub already_settled: bool,
    /// Fire-and-forget events to hand to the dispatcher after commit.
    pub notifications: Vec<Notification>,
}
