// Copyright (C) 2026 Tokendesk Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    available_consultant, directory_of, monday_utc, new_request_state, surge_consultant,
    surge_consultant_with_preferred_hours,
};
use crate::{ConsultantDirectory, MatchCandidate, RequestState, select_candidate};
use tokendesk_domain::{Consultant, ConsultantId};

#[test]
fn test_highest_specialization_overlap_wins() {
    let directory: ConsultantDirectory = directory_of(vec![
        available_consultant(1, &["rust"]),
        available_consultant(2, &["rust", "postgres"]),
    ]);
    let state: RequestState = new_request_state(10, 50, &["rust", "postgres"]);

    let candidate: MatchCandidate =
        select_candidate(&directory, &state.request, monday_utc(9, 0, 0)).unwrap();

    assert_eq!(candidate.consultant_id, ConsultantId::new(2));
    assert!(!candidate.is_surge);
}

#[test]
fn test_tag_matching_is_case_insensitive() {
    let directory: ConsultantDirectory =
        directory_of(vec![available_consultant(1, &["Rust", "POSTGRES"])]);
    let state: RequestState = new_request_state(10, 50, &["rust", "postgres"]);

    let candidate: MatchCandidate =
        select_candidate(&directory, &state.request, monday_utc(9, 0, 0)).unwrap();

    assert_eq!(candidate.consultant_id, ConsultantId::new(1));
}

#[test]
fn test_excluded_consultant_is_never_selected() {
    let directory: ConsultantDirectory = directory_of(vec![
        available_consultant(1, &["rust"]),
        available_consultant(2, &["rust"]),
    ]);
    let mut state: RequestState = new_request_state(10, 50, &["rust"]);
    state.request.exclude(ConsultantId::new(1));

    let candidate: MatchCandidate =
        select_candidate(&directory, &state.request, monday_utc(9, 0, 0)).unwrap();

    assert_eq!(candidate.consultant_id, ConsultantId::new(2));
}

#[test]
fn test_unapproved_consultant_is_filtered() {
    let mut unapproved: Consultant = available_consultant(1, &["rust"]);
    unapproved.approved = false;
    let directory: ConsultantDirectory = directory_of(vec![unapproved]);
    let state: RequestState = new_request_state(10, 50, &["rust"]);

    let candidate: Option<MatchCandidate> =
        select_candidate(&directory, &state.request, monday_utc(9, 0, 0));

    assert!(candidate.is_none());
}

#[test]
fn test_self_unavailable_consultant_is_filtered() {
    let mut away: Consultant = available_consultant(1, &["rust"]);
    away.self_available = false;
    let directory: ConsultantDirectory = directory_of(vec![away]);
    let state: RequestState = new_request_state(10, 50, &["rust"]);

    let candidate: Option<MatchCandidate> =
        select_candidate(&directory, &state.request, monday_utc(9, 0, 0));

    assert!(candidate.is_none());
}

#[test]
fn test_no_specialist_falls_back_to_whole_pool() {
    // Nobody knows erlang, so a generalist still gets the request.
    let directory: ConsultantDirectory = directory_of(vec![available_consultant(1, &["rust"])]);
    let state: RequestState = new_request_state(10, 50, &["erlang"]);

    let candidate: MatchCandidate =
        select_candidate(&directory, &state.request, monday_utc(9, 0, 0)).unwrap();

    assert_eq!(candidate.consultant_id, ConsultantId::new(1));
}

#[test]
fn test_one_specialist_excludes_generalists() {
    let directory: ConsultantDirectory = directory_of(vec![
        available_consultant(1, &["python"]),
        available_consultant(2, &["erlang"]),
    ]);
    let state: RequestState = new_request_state(10, 50, &["erlang"]);

    let candidate: MatchCandidate =
        select_candidate(&directory, &state.request, monday_utc(9, 0, 0)).unwrap();

    assert_eq!(candidate.consultant_id, ConsultantId::new(2));
}

#[test]
fn test_equal_overlap_breaks_on_lower_load() {
    let mut busy: Consultant = available_consultant(1, &["rust"]);
    busy.active_sessions = 3;
    let directory: ConsultantDirectory =
        directory_of(vec![busy, available_consultant(2, &["rust"])]);
    let state: RequestState = new_request_state(10, 50, &["rust"]);

    let candidate: MatchCandidate =
        select_candidate(&directory, &state.request, monday_utc(9, 0, 0)).unwrap();

    assert_eq!(candidate.consultant_id, ConsultantId::new(2));
}

#[test]
fn test_equal_load_breaks_on_least_recently_assigned() {
    let mut recent: Consultant = available_consultant(1, &["rust"]);
    recent.last_assigned_at = Some(monday_utc(8, 30, 0));
    let mut stale: Consultant = available_consultant(2, &["rust"]);
    stale.last_assigned_at = Some(monday_utc(7, 0, 0));
    let directory: ConsultantDirectory = directory_of(vec![recent, stale]);
    let state: RequestState = new_request_state(10, 50, &["rust"]);

    let candidate: MatchCandidate =
        select_candidate(&directory, &state.request, monday_utc(9, 0, 0)).unwrap();

    assert_eq!(candidate.consultant_id, ConsultantId::new(2));
}

#[test]
fn test_never_assigned_ranks_before_previously_assigned() {
    let mut veteran: Consultant = available_consultant(1, &["rust"]);
    veteran.last_assigned_at = Some(monday_utc(7, 0, 0));
    let directory: ConsultantDirectory =
        directory_of(vec![veteran, available_consultant(2, &["rust"])]);
    let state: RequestState = new_request_state(10, 50, &["rust"]);

    let candidate: MatchCandidate =
        select_candidate(&directory, &state.request, monday_utc(9, 0, 0)).unwrap();

    assert_eq!(candidate.consultant_id, ConsultantId::new(2));
}

#[test]
fn test_full_tie_breaks_on_lowest_id() {
    let directory: ConsultantDirectory = directory_of(vec![
        available_consultant(7, &["rust"]),
        available_consultant(3, &["rust"]),
    ]);
    let state: RequestState = new_request_state(10, 50, &["rust"]);

    let candidate: MatchCandidate =
        select_candidate(&directory, &state.request, monday_utc(9, 0, 0)).unwrap();

    assert_eq!(candidate.consultant_id, ConsultantId::new(3));
}

#[test]
fn test_regular_availability_beats_surge() {
    let directory: ConsultantDirectory = directory_of(vec![
        surge_consultant(1, &["rust"], 150),
        available_consultant(2, &["rust"]),
    ]);
    let state: RequestState = new_request_state(10, 50, &["rust"]);

    let candidate: MatchCandidate =
        select_candidate(&directory, &state.request, monday_utc(9, 0, 0)).unwrap();

    assert_eq!(candidate.consultant_id, ConsultantId::new(2));
    assert!(!candidate.is_surge);
}

#[test]
fn test_surge_pass_runs_when_nobody_is_in_regular_hours() {
    let directory: ConsultantDirectory = directory_of(vec![surge_consultant(1, &["rust"], 150)]);
    let state: RequestState = new_request_state(10, 50, &["rust"]);

    let candidate: MatchCandidate =
        select_candidate(&directory, &state.request, monday_utc(9, 0, 0)).unwrap();

    assert_eq!(candidate.consultant_id, ConsultantId::new(1));
    assert!(candidate.is_surge);
    assert_eq!(candidate.multiplier.percent(), 150);
}

#[test]
fn test_surge_respects_preferred_hours() {
    let directory: ConsultantDirectory =
        directory_of(vec![surge_consultant_with_preferred_hours(1, &["rust"], 150)]);
    let state: RequestState = new_request_state(10, 50, &["rust"]);

    // 09:00 is outside the 18:00-22:00 preferred window.
    assert!(select_candidate(&directory, &state.request, monday_utc(9, 0, 0)).is_none());
    // 19:00 is inside it.
    let candidate: MatchCandidate =
        select_candidate(&directory, &state.request, monday_utc(19, 0, 0)).unwrap();
    assert!(candidate.is_surge);
}

#[test]
fn test_empty_directory_selects_nobody() {
    let directory: ConsultantDirectory = ConsultantDirectory::new();
    let state: RequestState = new_request_state(10, 50, &["rust"]);

    assert!(select_candidate(&directory, &state.request, monday_utc(9, 0, 0)).is_none());
}
