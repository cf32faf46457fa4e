// Copyright (C) 2026 Tokendesk Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The state transition engine.
//!
//! `apply` is a pure function: it takes the current aggregate state, the
//! directory, and a command, and returns the complete new state or an
//! error. It never performs I/O and never mutates its inputs, which is
//! what makes transitions atomic: the hosting layer swaps the returned
//! state in under the aggregate's lock, or discards it on error.
//!
//! Session settlement goes through `apply_settlement`, a second entry
//! point that also carries the seeker's ledger: the debit and the
//! completed-transition are one atomic unit and must commit together.
//!
//! ## Invariants
//!
//! - A request has at most one open invitation at any time.
//! - Expiry is lazy: an expired invitation is settled by the next
//!   matching pass, never by a background timer.
//! - A consultation is billed exactly once; settlement is idempotent and
//!   re-settling returns the original figures.

use chrono::{DateTime, Utc};
use tokendesk_domain::{
    BillingSummary, Consultation, ConsultationStatus, DomainError, Invitation, InvitationStatus,
    RatePerMinute, RequestStatus, SeekerId, TokenLedger, compute_bill,
};
use tokendesk_events::Notification;

use crate::command::{Command, SessionParty};
use crate::config::EngineConfig;
use crate::error::CoreError;
use crate::matching::{MatchCandidate, select_candidate};
use crate::state::{ConsultantDirectory, RequestState, SettlementResult, TransitionResult};

/// Applies a command to a request aggregate, producing the new state.
///
/// # Arguments
///
/// * `directory` - The consultant directory at the time of the command
/// * `state` - The current aggregate state
/// * `command` - The command to apply
/// * `config` - Engine tunables (TTL, shuffle policy)
/// * `now` - The instant the command is applied at
///
/// # Returns
///
/// The complete new state plus the notifications to dispatch after commit.
///
/// # Errors
///
/// Returns `CoreError::DomainViolation` when the command breaks a lifecycle
/// rule, an authorization rule, or a shuffle constraint. On error nothing
/// has changed.
pub fn apply(
    directory: &ConsultantDirectory,
    state: &RequestState,
    command: &Command,
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> Result<TransitionResult, CoreError> {
    match command {
        Command::StartMatching { invitation_id } => {
            apply_start_matching(directory, state, *invitation_id, config, now)
        }
        Command::AcceptInvitation {
            invitation_id,
            consultant_id,
            consultation_id,
        } => apply_accept(
            directory,
            state,
            *invitation_id,
            *consultant_id,
            *consultation_id,
            now,
        ),
        Command::DeclineInvitation {
            invitation_id,
            consultant_id,
        } => apply_decline(directory, state, *invitation_id, *consultant_id, now),
        Command::Shuffle { requested_by } => {
            apply_shuffle(directory, state, *requested_by, config, now)
        }
        Command::CancelRequest { requested_by } => {
            apply_cancel(directory, state, *requested_by, now)
        }
        Command::StartSession { started_by } => {
            apply_start_session(directory, state, *started_by, now)
        }
    }
}

/// Settles an in-progress session: bills the seeker, completes the
/// consultation and the request, and releases the consultant.
///
/// Settlement is idempotent. Ending an already-completed session returns
/// the originally recorded figures with `already_settled` set and changes
/// nothing.
///
/// The debit is clamped at the seeker's balance; any uncovered remainder
/// is recorded on the consultation as a shortfall and reported, never
/// blocking completion.
///
/// # Errors
///
/// Returns `CoreError::DomainViolation` if the acting party is not a
/// participant, if no session is in progress, or if the billing period is
/// inconsistent. On error nothing has changed.
pub fn apply_settlement(
    directory: &ConsultantDirectory,
    state: &RequestState,
    ledger: &TokenLedger,
    ended_by: SessionParty,
    now: DateTime<Utc>,
) -> Result<SettlementResult, CoreError> {
    let mut new_state: RequestState = state.clone();
    let mut new_directory: ConsultantDirectory = directory.clone();

    // Idempotent re-settlement: hand back the recorded figures.
    if let Some(settled) = new_state
        .consultations
        .iter()
        .find(|c| c.status == ConsultationStatus::Completed)
    {
        ensure_session_party(state, settled.consultant_id.value(), ended_by)?;
        let shortfall: i64 = settled.tokens_shortfall.unwrap_or_default();
        let summary = BillingSummary {
            duration_minutes: settled.duration_minutes.unwrap_or_default(),
            tokens_due: settled.tokens_charged.unwrap_or_default() + shortfall,
        };
        return Ok(SettlementResult {
            new_state,
            new_directory,
            new_ledger: ledger.clone(),
            summary,
            shortfall,
            already_settled: true,
            notifications: Vec::new(),
        });
    }

    let request_id: i64 = new_state.request.request_id.value();
    // A scheduled-but-unstarted session is a lifecycle misuse, not a
    // missing aggregate: report it as an invalid transition.
    if let Some(scheduled) = state.active_consultation()
        && scheduled.status == ConsultationStatus::Scheduled
    {
        ensure_session_party(state, scheduled.consultant_id.value(), ended_by)?;
        scheduled
            .status
            .validate_transition(ConsultationStatus::Completed)?;
    }
    let Some(session) = new_state.in_progress_consultation_mut() else {
        return Err(DomainError::ConsultationNotFound { request_id }.into());
    };
    ensure_session_party(state, session.consultant_id.value(), ended_by)?;

    let started_at: DateTime<Utc> =
        session
            .started_at
            .ok_or_else(|| DomainError::InvalidBillingPeriod {
                reason: format!("in-progress session on request {request_id} has no start instant"),
            })?;
    let rate: RatePerMinute = session.rate_per_minute;
    let summary: BillingSummary = compute_bill(started_at, now, rate).map_err(CoreError::from)?;

    let mut new_ledger: TokenLedger = ledger.clone();
    let (charged, shortfall) = if summary.tokens_due > 0 {
        let outcome = new_ledger
            .debit(summary.tokens_due, Some(session.consultation_id), now)
            .map_err(CoreError::from)?;
        (outcome.charged, outcome.shortfall)
    } else {
        (0, 0)
    };

    session
        .status
        .validate_transition(ConsultationStatus::Completed)?;
    session.status = ConsultationStatus::Completed;
    session.ended_at = Some(now);
    session.duration_minutes = Some(summary.duration_minutes);
    session.tokens_charged = Some(charged);
    session.tokens_shortfall = Some(shortfall);

    let consultation_id: i64 = session.consultation_id.value();
    let consultant_id = session.consultant_id;

    new_state
        .request
        .status
        .validate_transition(RequestStatus::Completed)?;
    new_state.request.status = RequestStatus::Completed;
    new_state.request.updated_at = now;

    new_directory.release_assignment(consultant_id)?;

    let notifications = vec![Notification::SessionEnded {
        consultation_id,
        request_id,
        duration_minutes: summary.duration_minutes,
        tokens_charged: charged,
        tokens_shortfall: shortfall,
    }];

    Ok(SettlementResult {
        new_state,
        new_directory,
        new_ledger,
        summary,
        shortfall,
        already_settled: false,
        notifications,
    })
}

// ============================================================
// Command handlers
// ============================================================

fn apply_start_matching(
    directory: &ConsultantDirectory,
    state: &RequestState,
    invitation_id: tokendesk_domain::InvitationId,
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> Result<TransitionResult, CoreError> {
    let mut new_state: RequestState = state.clone();
    let mut notifications: Vec<Notification> = Vec::new();

    match new_state.request.status {
        RequestStatus::Pending => {
            new_state
                .request
                .status
                .validate_transition(RequestStatus::Matching)?;
            new_state.request.status = RequestStatus::Matching;
        }
        RequestStatus::Matching => {}
        other => {
            return Err(DomainError::InvalidTransition {
                aggregate: "consultation_request",
                from: other.as_str().to_owned(),
                requested: RequestStatus::Matching.as_str().to_owned(),
            }
            .into());
        }
    }

    // An unexpired open invitation makes this pass a no-op.
    if new_state.open_invitation(now).is_some() {
        return Ok(TransitionResult {
            new_state,
            new_directory: directory.clone(),
            notifications,
        });
    }

    // Lazy expiry: settle the lapsed invitation and exclude its addressee
    // before selecting the next candidate.
    if let Some(lapsed) = new_state.pending_invitation() {
        let lapsed_id = lapsed.invitation_id;
        let lapsed_consultant = lapsed.consultant_id;
        let invitation = new_state.invitation_mut(lapsed_id)?;
        invitation.status.validate_transition(InvitationStatus::Expired)?;
        invitation.status = InvitationStatus::Expired;
        new_state.request.exclude(lapsed_consultant);
        new_state.request.current_invitation = None;
        new_state.request.updated_at = now;
    }

    let Some(candidate): Option<MatchCandidate> =
        select_candidate(directory, &new_state.request, now)
    else {
        // Nobody eligible right now. The request stays parked in
        // `matching` for the sweep to retry.
        new_state.request.updated_at = now;
        return Ok(TransitionResult {
            new_state,
            new_directory: directory.clone(),
            notifications,
        });
    };

    let invitation = Invitation::new(
        invitation_id,
        new_state.request.request_id,
        candidate.consultant_id,
        now,
        config.invitation_ttl(),
        candidate.is_surge,
        candidate.multiplier,
    );
    notifications.push(Notification::InvitationIssued {
        invitation_id: invitation.invitation_id.value(),
        request_id: invitation.request_id.value(),
        consultant_id: invitation.consultant_id.value(),
        is_surge: invitation.is_surge,
    });
    new_state.request.current_invitation = Some(invitation.invitation_id);
    new_state.request.updated_at = now;
    new_state.invitations.push(invitation);

    Ok(TransitionResult {
        new_state,
        new_directory: directory.clone(),
        notifications,
    })
}

fn apply_accept(
    directory: &ConsultantDirectory,
    state: &RequestState,
    invitation_id: tokendesk_domain::InvitationId,
    consultant_id: tokendesk_domain::ConsultantId,
    consultation_id: tokendesk_domain::ConsultationId,
    now: DateTime<Utc>,
) -> Result<TransitionResult, CoreError> {
    let mut new_state: RequestState = state.clone();
    let mut new_directory: ConsultantDirectory = directory.clone();

    check_invitation_response(state, invitation_id, consultant_id, now)?;

    let (is_surge, multiplier) = {
        let invitation = new_state.invitation_mut(invitation_id)?;
        invitation
            .status
            .validate_transition(InvitationStatus::Accepted)?;
        invitation.status = InvitationStatus::Accepted;
        invitation.responded_at = Some(now);
        (invitation.is_surge, invitation.surge_multiplier)
    };

    new_state
        .request
        .status
        .validate_transition(RequestStatus::Matched)?;

    // Snapshot the effective rate now: later profile edits never change
    // what an accepted session bills at.
    let profile = directory
        .get(consultant_id)
        .ok_or(DomainError::ConsultantNotFound {
            consultant_id: consultant_id.value(),
        })?;
    let rate: RatePerMinute = if is_surge {
        profile.rate_per_minute.with_multiplier(multiplier)
    } else {
        profile.rate_per_minute
    };

    let consultation = Consultation::new(
        consultation_id,
        new_state.request.request_id,
        new_state.request.seeker_id,
        consultant_id,
        rate,
    );

    new_state.request.status = RequestStatus::Matched;
    new_state.request.matched_consultant = Some(consultant_id);
    new_state.request.current_invitation = None;
    new_state.request.updated_at = now;
    new_state.consultations.push(consultation);

    new_directory.record_assignment(consultant_id, now)?;

    let notifications = vec![Notification::RequestMatched {
        request_id: new_state.request.request_id.value(),
        consultant_id: consultant_id.value(),
        consultation_id: consultation_id.value(),
    }];

    Ok(TransitionResult {
        new_state,
        new_directory,
        notifications,
    })
}

fn apply_decline(
    directory: &ConsultantDirectory,
    state: &RequestState,
    invitation_id: tokendesk_domain::InvitationId,
    consultant_id: tokendesk_domain::ConsultantId,
    now: DateTime<Utc>,
) -> Result<TransitionResult, CoreError> {
    let mut new_state: RequestState = state.clone();

    check_invitation_response(state, invitation_id, consultant_id, now)?;

    let invitation = new_state.invitation_mut(invitation_id)?;
    invitation
        .status
        .validate_transition(InvitationStatus::Declined)?;
    invitation.status = InvitationStatus::Declined;
    invitation.responded_at = Some(now);

    new_state.request.exclude(consultant_id);
    new_state.request.current_invitation = None;
    new_state.request.updated_at = now;

    Ok(TransitionResult {
        new_state,
        new_directory: directory.clone(),
        notifications: Vec::new(),
    })
}

fn apply_shuffle(
    directory: &ConsultantDirectory,
    state: &RequestState,
    requested_by: SeekerId,
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> Result<TransitionResult, CoreError> {
    let mut new_state: RequestState = state.clone();
    let mut new_directory: ConsultantDirectory = directory.clone();

    ensure_owner(state, requested_by)?;
    new_state
        .request
        .status
        .validate_transition(RequestStatus::Matching)?;

    let remaining: u8 = config
        .max_shuffles
        .saturating_sub(new_state.request.shuffle_count);
    if remaining == 0 {
        return Err(DomainError::ShuffleNotAllowed {
            reason: format!("shuffle limit of {} reached", config.max_shuffles),
            remaining: 0,
        }
        .into());
    }

    // The window is measured from session start. A matched-but-unstarted
    // session can be shuffled at any time.
    if let Some(session) = new_state.active_consultation()
        && let Some(started_at) = session.started_at
        && now - started_at > config.shuffle_window()
    {
        return Err(DomainError::ShuffleNotAllowed {
            reason: format!(
                "shuffle window of {} minute(s) from session start has closed",
                config.shuffle_window_minutes
            ),
            remaining,
        }
        .into());
    }

    let discarded = new_state.request.matched_consultant.ok_or(
        DomainError::NoMatchedConsultant {
            request_id: new_state.request.request_id.value(),
        },
    )?;

    // The shuffled-away session is abandoned unbilled.
    if let Some(session) = new_state.active_consultation_mut() {
        session
            .status
            .validate_transition(ConsultationStatus::Cancelled)?;
        session.status = ConsultationStatus::Cancelled;
    }
    new_directory.release_assignment(discarded)?;

    new_state.request.exclude(discarded);
    new_state.request.matched_consultant = None;
    new_state.request.shuffle_count += 1;
    new_state.request.status = RequestStatus::Matching;
    new_state.request.updated_at = now;

    Ok(TransitionResult {
        new_state,
        new_directory,
        notifications: Vec::new(),
    })
}

fn apply_cancel(
    directory: &ConsultantDirectory,
    state: &RequestState,
    requested_by: SeekerId,
    now: DateTime<Utc>,
) -> Result<TransitionResult, CoreError> {
    let mut new_state: RequestState = state.clone();
    let mut new_directory: ConsultantDirectory = directory.clone();

    ensure_owner(state, requested_by)?;
    new_state
        .request
        .status
        .validate_transition(RequestStatus::Cancelled)?;

    // An open invitation dies with the request.
    if let Some(open) = new_state.pending_invitation() {
        let open_id = open.invitation_id;
        let invitation = new_state.invitation_mut(open_id)?;
        invitation.status.validate_transition(InvitationStatus::Expired)?;
        invitation.status = InvitationStatus::Expired;
    }
    new_state.request.current_invitation = None;

    if let Some(session) = new_state.active_consultation_mut() {
        session
            .status
            .validate_transition(ConsultationStatus::Cancelled)?;
        session.status = ConsultationStatus::Cancelled;
    }
    if let Some(matched) = new_state.request.matched_consultant {
        new_directory.release_assignment(matched)?;
    }

    new_state.request.status = RequestStatus::Cancelled;
    new_state.request.updated_at = now;

    Ok(TransitionResult {
        new_state,
        new_directory,
        notifications: Vec::new(),
    })
}

fn apply_start_session(
    directory: &ConsultantDirectory,
    state: &RequestState,
    started_by: SeekerId,
    now: DateTime<Utc>,
) -> Result<TransitionResult, CoreError> {
    let mut new_state: RequestState = state.clone();

    ensure_owner(state, started_by)?;
    new_state
        .request
        .status
        .validate_transition(RequestStatus::InProgress)?;

    let request_id: i64 = new_state.request.request_id.value();
    let Some(session) = new_state.active_consultation_mut() else {
        return Err(DomainError::ConsultationNotFound { request_id }.into());
    };
    session
        .status
        .validate_transition(ConsultationStatus::InProgress)?;
    session.status = ConsultationStatus::InProgress;
    session.started_at = Some(now);
    let consultation_id: i64 = session.consultation_id.value();

    new_state.request.status = RequestStatus::InProgress;
    new_state.request.updated_at = now;

    let notifications = vec![Notification::SessionStarted {
        consultation_id,
        request_id,
    }];

    Ok(TransitionResult {
        new_state,
        new_directory: directory.clone(),
        notifications,
    })
}

// ============================================================
// Shared checks
// ============================================================

/// Validates a consultant's response to an invitation: the invitation must
/// exist, be addressed to the responder, be unsettled, and be within its
/// TTL.
fn check_invitation_response(
    state: &RequestState,
    invitation_id: tokendesk_domain::InvitationId,
    consultant_id: tokendesk_domain::ConsultantId,
    now: DateTime<Utc>,
) -> Result<(), DomainError> {
    let invitation = state
        .invitation(invitation_id)
        .ok_or(DomainError::InvitationNotFound {
            invitation_id: invitation_id.value(),
        })?;
    if invitation.consultant_id != consultant_id {
        return Err(DomainError::NotInvitationAddressee {
            invitation_id: invitation_id.value(),
            consultant_id: consultant_id.value(),
        });
    }
    if invitation.status.is_terminal() {
        return Err(DomainError::AlreadyResponded {
            invitation_id: invitation_id.value(),
            status: invitation.status.as_str().to_owned(),
        });
    }
    if invitation.is_expired(now) {
        // The response loses the race against the TTL. The lapsed
        // invitation itself is settled by the next matching pass.
        return Err(DomainError::InvitationExpired {
            invitation_id: invitation_id.value(),
            expired_at: invitation.expires_at.to_rfc3339(),
        });
    }
    Ok(())
}

fn ensure_owner(state: &RequestState, seeker_id: SeekerId) -> Result<(), DomainError> {
    if state.request.seeker_id == seeker_id {
        Ok(())
    } else {
        Err(DomainError::NotRequestParticipant {
            request_id: state.request.request_id.value(),
            actor_id: seeker_id.value(),
        })
    }
}

/// Validates that the acting party is the session's seeker or consultant.
fn ensure_session_party(
    state: &RequestState,
    session_consultant: i64,
    party: SessionParty,
) -> Result<(), DomainError> {
    let (actor_id, is_participant) = match party {
        SessionParty::Seeker(id) => (id.value(), state.request.seeker_id == id),
        SessionParty::Consultant(id) => (id.value(), session_consultant == id.value()),
    };
    if is_participant {
        Ok(())
    } else {
        Err(DomainError::NotRequestParticipant {
            request_id: state.request.request_id.value(),
            actor_id,
        })
    }
}
