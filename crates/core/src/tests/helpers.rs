// Copyright (C) 2026 Tokendesk Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    Command, ConsultantDirectory, EngineConfig, RequestState, TransitionResult, apply,
};
use chrono::{DateTime, NaiveTime, TimeZone, Utc, Weekday};
use tokendesk_domain::{
    AvailabilityRule, Consultant, ConsultantId, ConsultationId, ConsultationRequest, InvitationId,
    PreferredHours, RatePerMinute, RequestId, SeekerId, SurgeMultiplier, SurgeOptIn, TechTag,
    Urgency,
};

/// An instant on Monday 2026-03-02, the fixed "now" most tests run at.
pub fn monday_utc(h: u32, m: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, h, m, s).unwrap()
}

pub fn test_config() -> EngineConfig {
    EngineConfig::default()
}

pub fn tag(value: &str) -> TechTag {
    TechTag::new(value).unwrap()
}

pub fn tags(values: &[&str]) -> Vec<TechTag> {
    values.iter().map(|v| tag(v)).collect()
}

/// Active rules covering every weekday, 00:00 to 23:59 UTC.
pub fn full_week_rules() -> Vec<AvailabilityRule> {
    let weekdays: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];
    weekdays
        .iter()
        .map(|&weekday| {
            AvailabilityRule::new(
                weekday,
                NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(23, 59, 0).unwrap(),
                "UTC",
                true,
            )
            .unwrap()
        })
        .collect()
}

/// An approved, self-available consultant inside regular hours all week,
/// billing 2 tokens per minute.
pub fn available_consultant(id: i64, specializations: &[&str]) -> Consultant {
    Consultant::new(
        ConsultantId::new(id),
        format!("Consultant {id}"),
        true,
        true,
        tags(specializations),
        RatePerMinute::from_tokens(2),
        full_week_rules(),
        None,
    )
}

/// An approved, self-available consultant with no regular hours who has
/// opted into surge at the given multiplier.
pub fn surge_consultant(id: i64, specializations: &[&str], percent: u16) -> Consultant {
    Consultant::new(
        ConsultantId::new(id),
        format!("Consultant {id}"),
        true,
        true,
        tags(specializations),
        RatePerMinute::from_tokens(2),
        Vec::new(),
        Some(SurgeOptIn::new(
            true,
            SurgeMultiplier::new(percent).unwrap(),
            None,
        )),
    )
}

/// A surge consultant whose preferred hours are 18:00-22:00 UTC.
pub fn surge_consultant_with_preferred_hours(
    id: i64,
    specializations: &[&str],
    percent: u16,
) -> Consultant {
    let hours: PreferredHours = PreferredHours::new(
        NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
        "UTC",
    )
    .unwrap();
    Consultant::new(
        ConsultantId::new(id),
        format!("Consultant {id}"),
        true,
        true,
        tags(specializations),
        RatePerMinute::from_tokens(2),
        Vec::new(),
        Some(SurgeOptIn::new(
            true,
            SurgeMultiplier::new(percent).unwrap(),
            Some(hours),
        )),
    )
}

pub fn directory_of(consultants: Vec<Consultant>) -> ConsultantDirectory {
    let mut directory: ConsultantDirectory = ConsultantDirectory::new();
    for consultant in consultants {
        directory.register(consultant).unwrap();
    }
    directory
}

/// A freshly submitted request in `pending` status.
pub fn new_request_state(request_id: i64, seeker_id: i64, tech_stack: &[&str]) -> RequestState {
    RequestState::new(ConsultationRequest::new(
        RequestId::new(request_id),
        SeekerId::new(seeker_id),
        String::from("Production API returns 500s under load"),
        tags(tech_stack),
        Urgency::Medium,
        Some(String::from("thread 'main' panicked at src/handler.rs:42")),
        monday_utc(8, 0, 0),
    ))
}

/// Runs a matching pass, panicking on error.
pub fn run_matching(
    directory: &ConsultantDirectory,
    state: &RequestState,
    invitation_id: i64,
    now: DateTime<Utc>,
) -> TransitionResult {
    apply(
        directory,
        state,
        &Command::StartMatching {
            invitation_id: InvitationId::new(invitation_id),
        },
        &test_config(),
        now,
    )
    .unwrap()
}

/// Drives a request to `matched`: one matching pass at 09:00, then the
/// invited consultant accepts at 09:01.
///
/// Identifiers are allocated from the aggregate's history (invitations
/// from 100, consultations from 200), so repeated rounds stay unique.
pub fn drive_to_matched(
    directory: &ConsultantDirectory,
    state: &RequestState,
) -> (RequestState, ConsultantDirectory) {
    let invitation_id: i64 = 100 + i64::try_from(state.invitations.len()).unwrap();
    let consultation_id: i64 = 200 + i64::try_from(state.consultations.len()).unwrap();
    let matched: TransitionResult =
        run_matching(directory, state, invitation_id, monday_utc(9, 0, 0));
    let invited: ConsultantId = matched.new_state.pending_invitation().unwrap().consultant_id;
    let accepted: TransitionResult = apply(
        &matched.new_directory,
        &matched.new_state,
        &Command::AcceptInvitation {
            invitation_id: InvitationId::new(invitation_id),
            consultant_id: invited,
            consultation_id: ConsultationId::new(consultation_id),
        },
        &test_config(),
        monday_utc(9, 1, 0),
    )
    .unwrap();
    (accepted.new_state, accepted.new_directory)
}

/// Drives a fresh request to an in-progress session started at
/// `session_start`.
pub fn drive_to_in_progress(
    directory: &ConsultantDirectory,
    state: &RequestState,
    session_start: DateTime<Utc>,
) -> (RequestState, ConsultantDirectory) {
    let (matched_state, matched_directory) = drive_to_matched(directory, state);
    let started: TransitionResult = apply(
        &matched_directory,
        &matched_state,
        &Command::StartSession {
            started_by: matched_state.request.seeker_id,
        },
        &test_config(),
        session_start,
    )
    .unwrap();
    (started.new_state, started.new_directory)
}
