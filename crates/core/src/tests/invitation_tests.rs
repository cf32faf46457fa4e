// Copyright (C) 2026 Tokendesk Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    available_consultant, directory_of, monday_utc, new_request_state, run_matching,
    surge_consultant, test_config,
};
use crate::{Command, ConsultantDirectory, CoreError, RequestState, TransitionResult, apply};
use tokendesk_domain::{
    ConsultantId, ConsultationId, ConsultationStatus, DomainError, InvitationId, InvitationStatus,
    RequestStatus,
};
use tokendesk_events::Notification;

// ============================================================
// Matching passes and invitation issuance
// ============================================================

#[test]
fn test_matching_pass_issues_invitation() {
    let directory: ConsultantDirectory = directory_of(vec![available_consultant(1, &["rust"])]);
    let state: RequestState = new_request_state(10, 50, &["rust"]);

    let transition: TransitionResult = run_matching(&directory, &state, 100, monday_utc(9, 0, 0));

    assert_eq!(transition.new_state.request.status, RequestStatus::Matching);
    let invitation = transition.new_state.pending_invitation().unwrap();
    assert_eq!(invitation.invitation_id, InvitationId::new(100));
    assert_eq!(invitation.consultant_id, ConsultantId::new(1));
    assert_eq!(invitation.expires_at, monday_utc(9, 10, 0));
    assert_eq!(
        transition.new_state.request.current_invitation,
        Some(InvitationId::new(100))
    );
    assert_eq!(
        transition.notifications,
        vec![Notification::InvitationIssued {
            invitation_id: 100,
            request_id: 10,
            consultant_id: 1,
            is_surge: false,
        }]
    );
}

#[test]
fn test_matching_is_a_noop_while_invitation_is_open() {
    let directory: ConsultantDirectory = directory_of(vec![
        available_consultant(1, &["rust"]),
        available_consultant(2, &["rust"]),
    ]);
    let state: RequestState = new_request_state(10, 50, &["rust"]);

    let first: TransitionResult = run_matching(&directory, &state, 100, monday_utc(9, 0, 0));
    let second: TransitionResult =
        run_matching(&first.new_directory, &first.new_state, 101, monday_utc(9, 5, 0));

    assert_eq!(second.new_state.invitations.len(), 1);
    assert!(second.notifications.is_empty());
}

#[test]
fn test_lapsed_invitation_is_settled_lazily_and_addressee_excluded() {
    let directory: ConsultantDirectory = directory_of(vec![
        available_consultant(1, &["rust"]),
        available_consultant(2, &["rust"]),
    ]);
    let state: RequestState = new_request_state(10, 50, &["rust"]);

    let first: TransitionResult = run_matching(&directory, &state, 100, monday_utc(9, 0, 0));
    // TTL is 10 minutes; 09:11 is past it.
    let second: TransitionResult =
        run_matching(&first.new_directory, &first.new_state, 101, monday_utc(9, 11, 0));

    let lapsed = second.new_state.invitation(InvitationId::new(100)).unwrap();
    assert_eq!(lapsed.status, InvitationStatus::Expired);
    assert!(second.new_state.request.is_excluded(ConsultantId::new(1)));

    let reissued = second.new_state.pending_invitation().unwrap();
    assert_eq!(reissued.invitation_id, InvitationId::new(101));
    assert_eq!(reissued.consultant_id, ConsultantId::new(2));
}

#[test]
fn test_matching_with_nobody_eligible_parks_the_request() {
    let directory: ConsultantDirectory = ConsultantDirectory::new();
    let state: RequestState = new_request_state(10, 50, &["rust"]);

    let transition: TransitionResult = run_matching(&directory, &state, 100, monday_utc(9, 0, 0));

    assert_eq!(transition.new_state.request.status, RequestStatus::Matching);
    assert!(transition.new_state.pending_invitation().is_none());
    assert!(transition.notifications.is_empty());
}

#[test]
fn test_matching_on_matched_request_is_rejected() {
    let directory: ConsultantDirectory = directory_of(vec![available_consultant(1, &["rust"])]);
    let state: RequestState = new_request_state(10, 50, &["rust"]);
    let (matched_state, matched_directory) =
        crate::tests::helpers::drive_to_matched(&directory, &state);

    let result: Result<TransitionResult, CoreError> = apply(
        &matched_directory,
        &matched_state,
        &Command::StartMatching {
            invitation_id: InvitationId::new(101),
        },
        &test_config(),
        monday_utc(9, 5, 0),
    );

    assert!(matches!(
        result.unwrap_err(),
        CoreError::DomainViolation(DomainError::InvalidTransition { .. })
    ));
}

// ============================================================
// Accepting
// ============================================================

#[test]
fn test_accept_matches_request_and_creates_consultation() {
    let directory: ConsultantDirectory = directory_of(vec![available_consultant(1, &["rust"])]);
    let state: RequestState = new_request_state(10, 50, &["rust"]);
    let invited: TransitionResult = run_matching(&directory, &state, 100, monday_utc(9, 0, 0));

    let transition: TransitionResult = apply(
        &invited.new_directory,
        &invited.new_state,
        &Command::AcceptInvitation {
            invitation_id: InvitationId::new(100),
            consultant_id: ConsultantId::new(1),
            consultation_id: ConsultationId::new(200),
        },
        &test_config(),
        monday_utc(9, 1, 0),
    )
    .unwrap();

    assert_eq!(transition.new_state.request.status, RequestStatus::Matched);
    assert_eq!(
        transition.new_state.request.matched_consultant,
        Some(ConsultantId::new(1))
    );
    assert_eq!(transition.new_state.request.current_invitation, None);

    let invitation = transition.new_state.invitation(InvitationId::new(100)).unwrap();
    assert_eq!(invitation.status, InvitationStatus::Accepted);
    assert_eq!(invitation.responded_at, Some(monday_utc(9, 1, 0)));

    let consultation = transition.new_state.active_consultation().unwrap();
    assert_eq!(consultation.consultation_id, ConsultationId::new(200));
    assert_eq!(consultation.status, ConsultationStatus::Scheduled);
    assert_eq!(consultation.rate_per_minute.centitokens(), 200);

    let consultant = transition.new_directory.get(ConsultantId::new(1)).unwrap();
    assert_eq!(consultant.active_sessions, 1);
    assert_eq!(consultant.last_assigned_at, Some(monday_utc(9, 1, 0)));

    assert_eq!(
        transition.notifications,
        vec![Notification::RequestMatched {
            request_id: 10,
            consultant_id: 1,
            consultation_id: 200,
        }]
    );
}

#[test]
fn test_surge_acceptance_snapshots_the_multiplied_rate() {
    let directory: ConsultantDirectory = directory_of(vec![surge_consultant(1, &["rust"], 150)]);
    let state: RequestState = new_request_state(10, 50, &["rust"]);
    let invited: TransitionResult = run_matching(&directory, &state, 100, monday_utc(9, 0, 0));
    assert!(invited.new_state.pending_invitation().unwrap().is_surge);

    let transition: TransitionResult = apply(
        &invited.new_directory,
        &invited.new_state,
        &Command::AcceptInvitation {
            invitation_id: InvitationId::new(100),
            consultant_id: ConsultantId::new(1),
            consultation_id: ConsultationId::new(200),
        },
        &test_config(),
        monday_utc(9, 1, 0),
    )
    .unwrap();

    // 2 tokens/min at 150% = 3 tokens/min.
    let consultation = transition.new_state.active_consultation().unwrap();
    assert_eq!(consultation.rate_per_minute.centitokens(), 300);
}

#[test]
fn test_accept_by_wrong_consultant_is_rejected() {
    let directory: ConsultantDirectory = directory_of(vec![
        available_consultant(1, &["rust"]),
        available_consultant(2, &["rust"]),
    ]);
    let state: RequestState = new_request_state(10, 50, &["rust"]);
    let invited: TransitionResult = run_matching(&directory, &state, 100, monday_utc(9, 0, 0));

    let result: Result<TransitionResult, CoreError> = apply(
        &invited.new_directory,
        &invited.new_state,
        &Command::AcceptInvitation {
            invitation_id: InvitationId::new(100),
            consultant_id: ConsultantId::new(2),
            consultation_id: ConsultationId::new(200),
        },
        &test_config(),
        monday_utc(9, 1, 0),
    );

    assert!(matches!(
        result.unwrap_err(),
        CoreError::DomainViolation(DomainError::NotInvitationAddressee {
            invitation_id: 100,
            consultant_id: 2,
        })
    ));
}

#[test]
fn test_accept_after_ttl_is_rejected() {
    let directory: ConsultantDirectory = directory_of(vec![available_consultant(1, &["rust"])]);
    let state: RequestState = new_request_state(10, 50, &["rust"]);
    let invited: TransitionResult = run_matching(&directory, &state, 100, monday_utc(9, 0, 0));

    let result: Result<TransitionResult, CoreError> = apply(
        &invited.new_directory,
        &invited.new_state,
        &Command::AcceptInvitation {
            invitation_id: InvitationId::new(100),
            consultant_id: ConsultantId::new(1),
            consultation_id: ConsultationId::new(200),
        },
        &test_config(),
        monday_utc(9, 10, 1),
    );

    assert!(matches!(
        result.unwrap_err(),
        CoreError::DomainViolation(DomainError::InvitationExpired { invitation_id: 100, .. })
    ));
}

#[test]
fn test_accept_exactly_at_ttl_still_succeeds() {
    let directory: ConsultantDirectory = directory_of(vec![available_consultant(1, &["rust"])]);
    let state: RequestState = new_request_state(10, 50, &["rust"]);
    let invited: TransitionResult = run_matching(&directory, &state, 100, monday_utc(9, 0, 0));

    // Expiry is strict: `now > expires_at`. At the boundary the response wins.
    let result: Result<TransitionResult, CoreError> = apply(
        &invited.new_directory,
        &invited.new_state,
        &Command::AcceptInvitation {
            invitation_id: InvitationId::new(100),
            consultant_id: ConsultantId::new(1),
            consultation_id: ConsultationId::new(200),
        },
        &test_config(),
        monday_utc(9, 10, 0),
    );

    assert!(result.is_ok());
}

// ============================================================
// Declining
// ============================================================

#[test]
fn test_decline_settles_invitation_and_excludes_consultant() {
    let directory: ConsultantDirectory = directory_of(vec![available_consultant(1, &["rust"])]);
    let state: RequestState = new_request_state(10, 50, &["rust"]);
    let invited: TransitionResult = run_matching(&directory, &state, 100, monday_utc(9, 0, 0));

    let transition: TransitionResult = apply(
        &invited.new_directory,
        &invited.new_state,
        &Command::DeclineInvitation {
            invitation_id: InvitationId::new(100),
            consultant_id: ConsultantId::new(1),
        },
        &test_config(),
        monday_utc(9, 2, 0),
    )
    .unwrap();

    let invitation = transition.new_state.invitation(InvitationId::new(100)).unwrap();
    assert_eq!(invitation.status, InvitationStatus::Declined);
    assert_eq!(invitation.responded_at, Some(monday_utc(9, 2, 0)));
    assert!(transition.new_state.request.is_excluded(ConsultantId::new(1)));
    assert_eq!(transition.new_state.request.status, RequestStatus::Matching);
    assert_eq!(transition.new_state.request.current_invitation, None);
}

#[test]
fn test_responding_twice_is_rejected() {
    let directory: ConsultantDirectory = directory_of(vec![available_consultant(1, &["rust"])]);
    let state: RequestState = new_request_state(10, 50, &["rust"]);
    let invited: TransitionResult = run_matching(&directory, &state, 100, monday_utc(9, 0, 0));

    let declined: TransitionResult = apply(
        &invited.new_directory,
        &invited.new_state,
        &Command::DeclineInvitation {
            invitation_id: InvitationId::new(100),
            consultant_id: ConsultantId::new(1),
        },
        &test_config(),
        monday_utc(9, 2, 0),
    )
    .unwrap();

    let result: Result<TransitionResult, CoreError> = apply(
        &declined.new_directory,
        &declined.new_state,
        &Command::AcceptInvitation {
            invitation_id: InvitationId::new(100),
            consultant_id: ConsultantId::new(1),
            consultation_id: ConsultationId::new(200),
        },
        &test_config(),
        monday_utc(9, 3, 0),
    );

    let error: CoreError = result.unwrap_err();
    assert!(matches!(
        error,
        CoreError::DomainViolation(DomainError::AlreadyResponded { invitation_id: 100, .. })
    ));
    assert_eq!(
        error.to_string(),
        "Domain violation: Invitation 100 has already been settled as 'declined'"
    );
}

#[test]
fn test_unknown_invitation_is_rejected() {
    let directory: ConsultantDirectory = directory_of(vec![available_consultant(1, &["rust"])]);
    let state: RequestState = new_request_state(10, 50, &["rust"]);
    let invited: TransitionResult = run_matching(&directory, &state, 100, monday_utc(9, 0, 0));

    let result: Result<TransitionResult, CoreError> = apply(
        &invited.new_directory,
        &invited.new_state,
        &Command::DeclineInvitation {
            invitation_id: InvitationId::new(999),
            consultant_id: ConsultantId::new(1),
        },
        &test_config(),
        monday_utc(9, 2, 0),
    );

    assert!(matches!(
        result.unwrap_err(),
        CoreError::DomainViolation(DomainError::InvitationNotFound { invitation_id: 999 })
    ));
}
