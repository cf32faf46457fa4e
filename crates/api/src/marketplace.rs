// Copyright (C) 2026 Tokendesk Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The marketplace service: the API boundary over the core engine.
//!
//! Each operation authorizes the actor, parses the request DTO into
//! domain types, applies a core command under the aggregate's lock, and
//! dispatches notifications after the transition commits.
//!
//! ## Locking
//!
//! Writes to one request are serialized by that request's own mutex, so
//! two concurrent commands against the same aggregate apply one after the
//! other and the loser revalidates against the winner's state. Locks are
//! always taken in the same order: requests map, then the request
//! aggregate, then the directory, then the ledgers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, NaiveTime, Utc, Weekday};
use tokendesk::{
    Command, ConsultantDirectory, EngineConfig, RequestState, SessionParty, SettlementResult,
    TransitionResult, apply, apply_settlement,
};
use tokendesk_domain::{
    AvailabilityRule, Consultant, ConsultantId, ConsultationId, ConsultationRequest, Invitation,
    InvitationId, PreferredHours, RatePerMinute, RequestId, RequestStatus, SeekerId,
    SurgeMultiplier, SurgeOptIn, TechTag, TokenLedger, Urgency,
};
use tokendesk_events::{Notification, NotificationSink};

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::clock::Clock;
use crate::error::{ApiError, translate_core_error, translate_domain_error};
use crate::request_response::{
    AcceptInvitationRequest, AcceptInvitationResponse, AvailabilityRuleSpec, BalanceResponse,
    CancelRequestRequest, CancelRequestResponse, CreditTokensRequest, CreditTokensResponse,
    DeclineInvitationRequest, DeclineInvitationResponse, EndSessionRequest, EndSessionResponse,
    InvitationInfo, PreferredHoursSpec, RegisterConsultantRequest, RegisterConsultantResponse,
    RequestInfoResponse, SetAvailabilityRequest, SetAvailabilityResponse, ShuffleRequest,
    ShuffleResponse, StartSessionRequest, StartSessionResponse, SubmitRequestRequest,
    SubmitRequestResponse, SurgeSpec, SweepResponse,
};

/// The in-memory marketplace service.
pub struct Marketplace {
    config: EngineConfig,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn NotificationSink>,
    directory: Mutex<ConsultantDirectory>,
    requests: Mutex<HashMap<i64, Arc<Mutex<RequestState>>>>,
    ledgers: Mutex<HashMap<i64, TokenLedger>>,
    next_id: AtomicI64,
}

fn lock<'a, T>(mutex: &'a Mutex<T>, what: &str) -> Result<MutexGuard<'a, T>, ApiError> {
    mutex.lock().map_err(|_| ApiError::Internal {
        message: format!("{what} lock poisoned"),
    })
}

fn invitation_info(invitation: &Invitation) -> InvitationInfo {
    InvitationInfo {
        invitation_id: invitation.invitation_id.value(),
        request_id: invitation.request_id.value(),
        consultant_id: invitation.consultant_id.value(),
        expires_at: invitation.expires_at.to_rfc3339(),
        is_surge: invitation.is_surge,
        surge_multiplier_percent: invitation.surge_multiplier.percent(),
    }
}

impl Marketplace {
    /// Creates an empty marketplace.
    #[must_use]
    pub fn new(config: EngineConfig, clock: Arc<dyn Clock>, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            config,
            clock,
            sink,
            directory: Mutex::new(ConsultantDirectory::new()),
            requests: Mutex::new(HashMap::new()),
            ledgers: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    fn dispatch(&self, notifications: &[Notification]) {
        for notification in notifications {
            self.sink.dispatch(notification);
        }
    }

    fn request_handle(&self, request_id: i64) -> Result<Arc<Mutex<RequestState>>, ApiError> {
        let requests = lock(&self.requests, "requests")?;
        requests
            .get(&request_id)
            .cloned()
            .ok_or_else(|| ApiError::ResourceNotFound {
                resource_type: String::from("Request"),
                message: format!("Request {request_id} does not exist"),
            })
    }

    /// Runs one matching pass on a locked aggregate, committing on
    /// success.
    ///
    /// Returns the invitation now open, if the pass issued one.
    fn run_matching_locked(
        &self,
        state: &mut RequestState,
        directory: &mut ConsultantDirectory,
        now: DateTime<Utc>,
    ) -> Result<Option<InvitationInfo>, ApiError> {
        let invitation_id: i64 = self.allocate_id();
        let transition: TransitionResult = apply(
            directory,
            state,
            &Command::StartMatching {
                invitation_id: InvitationId::new(invitation_id),
            },
            &self.config,
            now,
        )
        .map_err(translate_core_error)?;

        *state = transition.new_state;
        *directory = transition.new_directory;
        self.dispatch(&transition.notifications);

        Ok(state.open_invitation(now).map(invitation_info))
    }

    // ============================================================
    // Directory and ledger administration
    // ============================================================

    /// Registers a consultant in the directory. Admin only.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not an admin, a field fails
    /// validation, or the consultant id is already registered.
    pub fn register_consultant(
        &self,
        actor: &AuthenticatedActor,
        request: RegisterConsultantRequest,
    ) -> Result<RegisterConsultantResponse, ApiError> {
        AuthorizationService::authorize_register_consultant(actor)?;

        let specializations: Vec<TechTag> = request
            .specializations
            .iter()
            .map(|tag| TechTag::new(tag).map_err(translate_domain_error))
            .collect::<Result<_, _>>()?;
        let availability_rules: Vec<AvailabilityRule> = request
            .availability_rules
            .iter()
            .map(parse_rule)
            .collect::<Result<_, _>>()?;
        let surge: Option<SurgeOptIn> = request.surge.as_ref().map(parse_surge).transpose()?;

        let consultant = Consultant::new(
            ConsultantId::new(request.consultant_id),
            request.display_name,
            request.approved,
            true,
            specializations,
            RatePerMinute::from_centitokens(request.rate_centitokens_per_minute),
            availability_rules,
            surge,
        );

        let mut directory = lock(&self.directory, "directory")?;
        directory
            .register(consultant)
            .map_err(translate_domain_error)?;
        drop(directory);

        tracing::info!(consultant_id = request.consultant_id, "consultant registered");
        Ok(RegisterConsultantResponse {
            consultant_id: request.consultant_id,
            message: format!("Successfully registered consultant {}", request.consultant_id),
        })
    }

    /// Flips a consultant's self-availability.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is neither the consultant nor an
    /// admin, or if the consultant is unknown.
    pub fn set_consultant_availability(
        &self,
        actor: &AuthenticatedActor,
        request: SetAvailabilityRequest,
    ) -> Result<SetAvailabilityResponse, ApiError> {
        AuthorizationService::authorize_set_availability(actor, request.consultant_id)?;

        let mut directory = lock(&self.directory, "directory")?;
        directory
            .set_self_available(ConsultantId::new(request.consultant_id), request.available)
            .map_err(translate_domain_error)?;
        drop(directory);

        Ok(SetAvailabilityResponse {
            consultant_id: request.consultant_id,
            available: request.available,
            message: format!(
                "Consultant {} is now {}",
                request.consultant_id,
                if request.available { "available" } else { "unavailable" }
            ),
        })
    }

    /// Records a token purchase on a seeker's ledger. Admin only.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not an admin or the amount is not
    /// positive.
    pub fn credit_tokens(
        &self,
        actor: &AuthenticatedActor,
        request: CreditTokensRequest,
    ) -> Result<CreditTokensResponse, ApiError> {
        AuthorizationService::authorize_credit_tokens(actor)?;

        let now: DateTime<Utc> = self.clock.now();
        let mut ledgers = lock(&self.ledgers, "ledgers")?;
        let ledger: &mut TokenLedger = ledgers
            .entry(request.seeker_id)
            .or_insert_with(|| TokenLedger::new(SeekerId::new(request.seeker_id)));
        ledger
            .credit(request.amount, request.reference.clone(), now)
            .map_err(translate_domain_error)?;
        let balance: i64 = ledger.balance();
        drop(ledgers);

        tracing::info!(seeker_id = request.seeker_id, amount = request.amount, "tokens credited");
        Ok(CreditTokensResponse {
            seeker_id: request.seeker_id,
            balance,
            message: format!("Credited {} token(s) to seeker {}", request.amount, request.seeker_id),
        })
    }

    // ============================================================
    // Request lifecycle
    // ============================================================

    /// Submits a consultation request and runs the initial matching pass.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not a seeker or a field fails
    /// validation.
    pub fn submit_request(
        &self,
        actor: &AuthenticatedActor,
        request: SubmitRequestRequest,
    ) -> Result<SubmitRequestResponse, ApiError> {
        AuthorizationService::authorize_seeker_action(actor, "submit_request")?;

        let urgency: Urgency = Urgency::parse(&request.urgency).map_err(translate_domain_error)?;
        let tech_stack: Vec<TechTag> = request
            .tech_stack
            .iter()
            .map(|tag| TechTag::new(tag).map_err(translate_domain_error))
            .collect::<Result<_, _>>()?;

        let now: DateTime<Utc> = self.clock.now();
        let request_id: i64 = self.allocate_id();
        let mut state = RequestState::new(ConsultationRequest::new(
            RequestId::new(request_id),
            SeekerId::new(actor.id),
            request.description,
            tech_stack,
            urgency,
            request.error_log,
            now,
        ));

        // Submission queues matching immediately.
        let mut directory = lock(&self.directory, "directory")?;
        let invitation: Option<InvitationInfo> =
            self.run_matching_locked(&mut state, &mut directory, now)?;
        drop(directory);

        let status: String = state.request.status.to_string();
        let mut requests = lock(&self.requests, "requests")?;
        requests.insert(request_id, Arc::new(Mutex::new(state)));
        drop(requests);

        tracing::info!(request_id, seeker_id = actor.id, "request submitted");
        Ok(SubmitRequestResponse {
            request_id,
            status,
            invitation,
            message: format!("Successfully submitted request {request_id}"),
        })
    }

    /// Accepts an invitation on behalf of the authenticated consultant.
    ///
    /// If the invitation's TTL has lapsed, the acceptance is rejected and
    /// a fresh matching pass is run so the request moves on to the next
    /// candidate.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not the addressed consultant, the
    /// invitation is settled or expired, or the request is not in
    /// `matching`.
    pub fn accept_invitation(
        &self,
        actor: &AuthenticatedActor,
        request: AcceptInvitationRequest,
    ) -> Result<AcceptInvitationResponse, ApiError> {
        AuthorizationService::authorize_consultant_action(actor, "accept_invitation")?;

        let handle = self.request_handle(request.request_id)?;
        let mut state = lock(&handle, "request")?;
        let mut directory = lock(&self.directory, "directory")?;
        let now: DateTime<Utc> = self.clock.now();
        let consultation_id: i64 = self.allocate_id();

        let result: Result<TransitionResult, ApiError> = apply(
            &directory,
            &state,
            &Command::AcceptInvitation {
                invitation_id: InvitationId::new(request.invitation_id),
                consultant_id: ConsultantId::new(actor.id),
                consultation_id: ConsultationId::new(consultation_id),
            },
            &self.config,
            now,
        )
        .map_err(translate_core_error);

        let transition: TransitionResult = match result {
            Ok(transition) => transition,
            Err(err) => {
                // A lapsed invitation is settled on the spot so the
                // request does not sit waiting for the sweep.
                if state.open_invitation(now).is_none()
                    && state.request.status == RequestStatus::Matching
                {
                    self.run_matching_locked(&mut state, &mut directory, now)?;
                }
                return Err(err);
            }
        };

        *state = transition.new_state;
        *directory = transition.new_directory;
        let rate: u32 = state
            .latest_consultation()
            .map_or(0, |c| c.rate_per_minute.centitokens());
        drop(directory);
        drop(state);
        self.dispatch(&transition.notifications);

        tracing::info!(
            request_id = request.request_id,
            consultant_id = actor.id,
            "invitation accepted"
        );
        Ok(AcceptInvitationResponse {
            request_id: request.request_id,
            consultation_id,
            consultant_id: actor.id,
            rate_centitokens_per_minute: rate,
            message: format!("Successfully accepted invitation {}", request.invitation_id),
        })
    }

    /// Declines an invitation and immediately offers the request to the
    /// next candidate.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not the addressed consultant or
    /// the invitation is settled or expired.
    pub fn decline_invitation(
        &self,
        actor: &AuthenticatedActor,
        request: DeclineInvitationRequest,
    ) -> Result<DeclineInvitationResponse, ApiError> {
        AuthorizationService::authorize_consultant_action(actor, "decline_invitation")?;

        let handle = self.request_handle(request.request_id)?;
        let mut state = lock(&handle, "request")?;
        let mut directory = lock(&self.directory, "directory")?;
        let now: DateTime<Utc> = self.clock.now();

        let result: Result<TransitionResult, ApiError> = apply(
            &directory,
            &state,
            &Command::DeclineInvitation {
                invitation_id: InvitationId::new(request.invitation_id),
                consultant_id: ConsultantId::new(actor.id),
            },
            &self.config,
            now,
        )
        .map_err(translate_core_error);

        let transition: TransitionResult = match result {
            Ok(transition) => transition,
            Err(err) => {
                // A lapsed invitation is settled on the spot so the
                // request does not sit waiting for the sweep.
                if state.open_invitation(now).is_none()
                    && state.request.status == RequestStatus::Matching
                {
                    self.run_matching_locked(&mut state, &mut directory, now)?;
                }
                return Err(err);
            }
        };
        *state = transition.new_state;
        *directory = transition.new_directory;

        let next_invitation: Option<InvitationInfo> =
            self.run_matching_locked(&mut state, &mut directory, now)?;
        drop(directory);
        drop(state);

        Ok(DeclineInvitationResponse {
            request_id: request.request_id,
            next_invitation,
            message: format!("Declined invitation {}", request.invitation_id),
        })
    }

    /// Shuffles away the matched consultant and re-enters matching.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not own the request, the shuffle
    /// allowance is exhausted, or the shuffle window has closed.
    pub fn shuffle(
        &self,
        actor: &AuthenticatedActor,
        request: ShuffleRequest,
    ) -> Result<ShuffleResponse, ApiError> {
        AuthorizationService::authorize_seeker_action(actor, "shuffle")?;

        let handle = self.request_handle(request.request_id)?;
        let mut state = lock(&handle, "request")?;
        let mut directory = lock(&self.directory, "directory")?;
        let now: DateTime<Utc> = self.clock.now();

        let transition: TransitionResult = apply(
            &directory,
            &state,
            &Command::Shuffle {
                requested_by: SeekerId::new(actor.id),
            },
            &self.config,
            now,
        )
        .map_err(translate_core_error)?;
        *state = transition.new_state;
        *directory = transition.new_directory;

        let invitation: Option<InvitationInfo> =
            self.run_matching_locked(&mut state, &mut directory, now)?;
        let shuffles_remaining: u8 = self
            .config
            .max_shuffles
            .saturating_sub(state.request.shuffle_count);
        drop(directory);
        drop(state);

        tracing::info!(request_id = request.request_id, "consultant shuffled");
        Ok(ShuffleResponse {
            request_id: request.request_id,
            shuffles_remaining,
            invitation,
            message: format!("Shuffled request {}", request.request_id),
        })
    }

    /// Cancels a request outright.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not own the request or the
    /// request is already terminal.
    pub fn cancel_request(
        &self,
        actor: &AuthenticatedActor,
        request: CancelRequestRequest,
    ) -> Result<CancelRequestResponse, ApiError> {
        AuthorizationService::authorize_seeker_action(actor, "cancel_request")?;

        let handle = self.request_handle(request.request_id)?;
        let mut state = lock(&handle, "request")?;
        let mut directory = lock(&self.directory, "directory")?;
        let now: DateTime<Utc> = self.clock.now();

        let transition: TransitionResult = apply(
            &directory,
            &state,
            &Command::CancelRequest {
                requested_by: SeekerId::new(actor.id),
            },
            &self.config,
            now,
        )
        .map_err(translate_core_error)?;
        *state = transition.new_state;
        *directory = transition.new_directory;
        let status: String = state.request.status.to_string();
        drop(directory);
        drop(state);

        tracing::info!(request_id = request.request_id, "request cancelled");
        Ok(CancelRequestResponse {
            request_id: request.request_id,
            status,
            message: format!("Cancelled request {}", request.request_id),
        })
    }

    /// Starts the scheduled session; metering begins at the clock's now.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not own the request or the
    /// request is not `matched`.
    pub fn start_session(
        &self,
        actor: &AuthenticatedActor,
        request: StartSessionRequest,
    ) -> Result<StartSessionResponse, ApiError> {
        AuthorizationService::authorize_seeker_action(actor, "start_session")?;

        let handle = self.request_handle(request.request_id)?;
        let mut state = lock(&handle, "request")?;
        let mut directory = lock(&self.directory, "directory")?;
        let now: DateTime<Utc> = self.clock.now();

        let transition: TransitionResult = apply(
            &directory,
            &state,
            &Command::StartSession {
                started_by: SeekerId::new(actor.id),
            },
            &self.config,
            now,
        )
        .map_err(translate_core_error)?;
        *state = transition.new_state;
        *directory = transition.new_directory;
        let consultation_id: i64 = state
            .latest_consultation()
            .map_or(0, |c| c.consultation_id.value());
        drop(directory);
        drop(state);
        self.dispatch(&transition.notifications);

        tracing::info!(request_id = request.request_id, "session started");
        Ok(StartSessionResponse {
            request_id: request.request_id,
            consultation_id,
            started_at: now.to_rfc3339(),
            message: format!("Session started for request {}", request.request_id),
        })
    }

    /// Ends the running session and settles it: duration is rounded up to
    /// whole minutes, billed at the snapshotted rate, and debited from the
    /// seeker's ledger (clamped at the balance).
    ///
    /// Idempotent: re-ending a settled session returns the original
    /// figures.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not a session party or no session
    /// is in progress.
    pub fn end_session(
        &self,
        actor: &AuthenticatedActor,
        request: EndSessionRequest,
    ) -> Result<EndSessionResponse, ApiError> {
        AuthorizationService::authorize_end_session(actor)?;
        let party: SessionParty = match actor.role {
            crate::auth::Role::Consultant => SessionParty::Consultant(ConsultantId::new(actor.id)),
            _ => SessionParty::Seeker(SeekerId::new(actor.id)),
        };

        let handle = self.request_handle(request.request_id)?;
        let mut state = lock(&handle, "request")?;
        let mut directory = lock(&self.directory, "directory")?;
        let mut ledgers = lock(&self.ledgers, "ledgers")?;
        let now: DateTime<Utc> = self.clock.now();

        let seeker_id: i64 = state.request.seeker_id.value();
        let ledger: &mut TokenLedger = ledgers
            .entry(seeker_id)
            .or_insert_with(|| TokenLedger::new(SeekerId::new(seeker_id)));

        let result: SettlementResult =
            apply_settlement(&directory, &state, ledger, party, now).map_err(translate_core_error)?;

        *state = result.new_state;
        *directory = result.new_directory;
        *ledger = result.new_ledger;
        let balance: i64 = ledger.balance();
        let consultation_id: i64 = state
            .latest_consultation()
            .map_or(0, |c| c.consultation_id.value());
        let tokens_charged: i64 = result.summary.tokens_due - result.shortfall;
        drop(ledgers);
        drop(directory);
        drop(state);
        self.dispatch(&result.notifications);

        if result.shortfall > 0 {
            tracing::warn!(
                request_id = request.request_id,
                shortfall = result.shortfall,
                "session settled with uncovered balance"
            );
        } else {
            tracing::info!(
                request_id = request.request_id,
                tokens_charged,
                "session settled"
            );
        }

        Ok(EndSessionResponse {
            request_id: request.request_id,
            consultation_id,
            duration_minutes: result.summary.duration_minutes,
            tokens_charged,
            tokens_shortfall: result.shortfall,
            balance,
            already_settled: result.already_settled,
            message: format!("Session settled for request {}", request.request_id),
        })
    }

    // ============================================================
    // Reads and the sweep
    // ============================================================

    /// Returns a seeker's balance and ledger size.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor is the seeker themselves or an
    /// admin.
    pub fn get_balance(
        &self,
        actor: &AuthenticatedActor,
        seeker_id: i64,
    ) -> Result<BalanceResponse, ApiError> {
        AuthorizationService::authorize_balance_read(actor, seeker_id)?;

        let ledgers = lock(&self.ledgers, "ledgers")?;
        let (balance, transaction_count): (i64, usize) = ledgers
            .get(&seeker_id)
            .map_or((0, 0), |ledger| (ledger.balance(), ledger.transactions().len()));
        drop(ledgers);

        Ok(BalanceResponse {
            seeker_id,
            balance,
            transaction_count,
        })
    }

    /// Returns a request's current state.
    ///
    /// # Errors
    ///
    /// Returns an error if the request does not exist or the actor is not
    /// a participant or admin.
    pub fn get_request_info(
        &self,
        actor: &AuthenticatedActor,
        request_id: i64,
    ) -> Result<RequestInfoResponse, ApiError> {
        let handle = self.request_handle(request_id)?;
        let state = lock(&handle, "request")?;

        let is_participant: bool = match actor.role {
            crate::auth::Role::Admin | crate::auth::Role::Scheduler => true,
            crate::auth::Role::Seeker => state.request.seeker_id.value() == actor.id,
            crate::auth::Role::Consultant => {
                state.request.matched_consultant == Some(ConsultantId::new(actor.id))
                    || state
                        .invitations
                        .iter()
                        .any(|inv| inv.consultant_id.value() == actor.id)
            }
        };
        if !is_participant {
            return Err(ApiError::Unauthorized {
                action: String::from("get_request_info"),
                required_role: String::from("request participant or admin"),
            });
        }

        let now: DateTime<Utc> = self.clock.now();
        Ok(RequestInfoResponse {
            request_id,
            status: state.request.status.to_string(),
            matched_consultant: state.request.matched_consultant.map(ConsultantId::value),
            shuffle_count: state.request.shuffle_count,
            excluded_consultants: state
                .request
                .excluded_consultants
                .iter()
                .map(|id| id.value())
                .collect(),
            invitation: state.open_invitation(now).map(invitation_info),
        })
    }

    /// Re-attempts matching for stalled requests: requests sitting in
    /// `matching` with no open invitation for longer than the sweep grace
    /// period.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor is the scheduler or an admin.
    pub fn sweep_stalled(&self, actor: &AuthenticatedActor) -> Result<SweepResponse, ApiError> {
        AuthorizationService::authorize_sweep(actor)?;

        let handles: Vec<(i64, Arc<Mutex<RequestState>>)> = {
            let requests = lock(&self.requests, "requests")?;
            requests
                .iter()
                .map(|(id, handle)| (*id, Arc::clone(handle)))
                .collect()
        };

        let mut reattempted: Vec<i64> = Vec::new();
        for (request_id, handle) in handles {
            let mut state = lock(&handle, "request")?;
            let now: DateTime<Utc> = self.clock.now();
            let stalled: bool = state.request.status == RequestStatus::Matching
                && state.open_invitation(now).is_none()
                && now - state.request.updated_at >= self.config.sweep_grace();
            if !stalled {
                continue;
            }
            let mut directory = lock(&self.directory, "directory")?;
            self.run_matching_locked(&mut state, &mut directory, now)?;
            drop(directory);
            reattempted.push(request_id);
        }
        reattempted.sort_unstable();

        if !reattempted.is_empty() {
            tracing::info!(count = reattempted.len(), "stalled requests re-attempted");
        }
        let message: String = format!("Re-attempted {} stalled request(s)", reattempted.len());
        Ok(SweepResponse {
            reattempted,
            message,
        })
    }
}

fn parse_time(value: &str, field: &str) -> Result<NaiveTime, ApiError> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| ApiError::InvalidInput {
        field: field.to_owned(),
        message: format!("'{value}' is not a valid HH:MM time"),
    })
}

fn parse_rule(spec: &AvailabilityRuleSpec) -> Result<AvailabilityRule, ApiError> {
    let weekday: Weekday = spec.weekday.parse().map_err(|_| ApiError::InvalidInput {
        field: String::from("weekday"),
        message: format!("'{}' is not a weekday name", spec.weekday),
    })?;
    let start_time: NaiveTime = parse_time(&spec.start_time, "start_time")?;
    let end_time: NaiveTime = parse_time(&spec.end_time, "end_time")?;
    AvailabilityRule::new(weekday, start_time, end_time, &spec.timezone, spec.active)
        .map_err(translate_domain_error)
}

fn parse_preferred_hours(spec: &PreferredHoursSpec) -> Result<PreferredHours, ApiError> {
    let start_time: NaiveTime = parse_time(&spec.start_time, "start_time")?;
    let end_time: NaiveTime = parse_time(&spec.end_time, "end_time")?;
    PreferredHours::new(start_time, end_time, &spec.timezone).map_err(translate_domain_error)
}

fn parse_surge(spec: &SurgeSpec) -> Result<SurgeOptIn, ApiError> {
    let multiplier: SurgeMultiplier =
        SurgeMultiplier::new(spec.multiplier_percent).map_err(translate_domain_error)?;
    let preferred_hours: Option<PreferredHours> = spec
        .preferred_hours
        .as_ref()
        .map(parse_preferred_hours)
        .transpose()?;
    Ok(SurgeOptIn::new(spec.enabled, multiplier, preferred_hours))
}
