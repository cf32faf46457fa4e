// Copyright (C) 2026 Tokendesk Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    AcceptInvitationRequest, AuthenticatedActor, AvailabilityRuleSpec, CreditTokensRequest,
    ManualClock, Marketplace, RegisterConsultantRequest, Role, StartSessionRequest,
    SubmitRequestRequest, SubmitRequestResponse,
};
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use tokendesk::EngineConfig;
use tokendesk_events::RecordingSink;

pub fn monday_utc(h: u32, m: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, h, m, s).unwrap()
}

pub fn admin() -> AuthenticatedActor {
    AuthenticatedActor::new(1000, Role::Admin)
}

pub fn scheduler() -> AuthenticatedActor {
    AuthenticatedActor::new(1001, Role::Scheduler)
}

pub fn seeker(id: i64) -> AuthenticatedActor {
    AuthenticatedActor::new(id, Role::Seeker)
}

pub fn consultant(id: i64) -> AuthenticatedActor {
    AuthenticatedActor::new(id, Role::Consultant)
}

/// A marketplace on a manual clock starting Monday 09:00 UTC, with a
/// recording sink for notification assertions.
pub struct TestMarketplace {
    pub marketplace: Marketplace,
    pub clock: Arc<ManualClock>,
    pub sink: Arc<RecordingSink>,
}

pub fn test_marketplace() -> TestMarketplace {
    let clock: Arc<ManualClock> = Arc::new(ManualClock::new(monday_utc(9, 0, 0)));
    let sink: Arc<RecordingSink> = Arc::new(RecordingSink::new());
    let marketplace: Marketplace = Marketplace::new(
        EngineConfig::default(),
        Arc::clone(&clock) as Arc<dyn crate::Clock>,
        Arc::clone(&sink) as Arc<dyn tokendesk_events::NotificationSink>,
    );
    TestMarketplace {
        marketplace,
        clock,
        sink,
    }
}

pub fn full_week_specs() -> Vec<AvailabilityRuleSpec> {
    ["mon", "tue", "wed", "thu", "fri", "sat", "sun"]
        .iter()
        .map(|weekday| AvailabilityRuleSpec {
            weekday: (*weekday).to_owned(),
            start_time: String::from("00:00"),
            end_time: String::from("23:59"),
            timezone: String::from("UTC"),
            active: true,
        })
        .collect()
}

/// Registers an always-available approved consultant at 2 tokens/min.
pub fn register_consultant(market: &TestMarketplace, consultant_id: i64, tags: &[&str]) {
    market
        .marketplace
        .register_consultant(
            &admin(),
            RegisterConsultantRequest {
                consultant_id,
                display_name: format!("Consultant {consultant_id}"),
                approved: true,
                specializations: tags.iter().map(|t| (*t).to_owned()).collect(),
                rate_centitokens_per_minute: 200,
                availability_rules: full_week_specs(),
                surge: None,
            },
        )
        .unwrap();
}

pub fn credit(market: &TestMarketplace, seeker_id: i64, amount: i64) {
    market
        .marketplace
        .credit_tokens(
            &admin(),
            CreditTokensRequest {
                seeker_id,
                amount,
                reference: None,
            },
        )
        .unwrap();
}

pub fn submit(market: &TestMarketplace, seeker_id: i64, tags: &[&str]) -> SubmitRequestResponse {
    market
        .marketplace
        .submit_request(
            &seeker(seeker_id),
            SubmitRequestRequest {
                description: String::from("Deadlock in connection pool under load"),
                tech_stack: tags.iter().map(|t| (*t).to_owned()).collect(),
                urgency: String::from("high"),
                error_log: None,
            },
        )
        .unwrap()
}

/// Submits, accepts with the invited consultant, and starts the session.
/// Returns the request id.
pub fn drive_to_in_progress(market: &TestMarketplace, seeker_id: i64, tags: &[&str]) -> i64 {
    let submitted: SubmitRequestResponse = submit(market, seeker_id, tags);
    let invitation = submitted.invitation.unwrap();
    market
        .marketplace
        .accept_invitation(
            &consultant(invitation.consultant_id),
            AcceptInvitationRequest {
                request_id: submitted.request_id,
                invitation_id: invitation.invitation_id,
            },
        )
        .unwrap();
    market
        .marketplace
        .start_session(
            &seeker(seeker_id),
            StartSessionRequest {
                request_id: submitted.request_id,
            },
        )
        .unwrap();
    submitted.request_id
}
