// Copyright (C) 2026 Tokendesk Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! Fire-and-forget notification events emitted by committed state
//! transitions.
//!
//! The external notification dispatcher (and the real-time media layer)
//! consume these after a transition has committed. Delivery failure must
//! never roll back a transition, so the sink interface is infallible:
//! implementations swallow or retry their own failures.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// A fire-and-forget event carrying the aggregate ids an external
/// collaborator needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Notification {
    /// An invitation was issued to a consultant.
    InvitationIssued {
        /// The invitation identifier.
        invitation_id: i64,
        /// The request being offered.
        request_id: i64,
        /// The addressed consultant.
        consultant_id: i64,
        /// Whether this is a surge-priced invitation.
        is_surge: bool,
    },
    /// A request was matched: an invitation was accepted and a consultation
    /// created.
    RequestMatched {
        /// The request identifier.
        request_id: i64,
        /// The accepting consultant.
        consultant_id: i64,
        /// The created consultation.
        consultation_id: i64,
    },
    /// A session transitioned to in-progress; the media layer should
    /// provision a room.
    SessionStarted {
        /// The consultation identifier.
        consultation_id: i64,
        /// The originating request.
        request_id: i64,
    },
    /// A session ended and was billed.
    SessionEnded {
        /// The consultation identifier.
        consultation_id: i64,
        /// The originating request.
        request_id: i64,
        /// Billable minutes.
        duration_minutes: u32,
        /// Tokens actually debited.
        tokens_charged: i64,
        /// Tokens due but not covered by the seeker's balance.
        tokens_shortfall: i64,
    },
}

impl Notification {
    /// Returns the event name used by the external dispatcher.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::InvitationIssued { .. } => "invitation_issued",
            Self::RequestMatched { .. } => "request_matched",
            Self::SessionStarted { .. } => "session_started",
            Self::SessionEnded { .. } => "session_ended",
        }
    }

    /// Returns the request id the event concerns.
    #[must_use]
    pub const fn request_id(&self) -> i64 {
        match self {
            Self::InvitationIssued { request_id, .. }
            | Self::RequestMatched { request_id, .. }
            | Self::SessionStarted { request_id, .. }
            | Self::SessionEnded { request_id, .. } => *request_id,
        }
    }
}

/// The external notification dispatcher interface.
///
/// Dispatch is infallible by contract: the core has already committed its
/// transition when a notification is handed over.
pub trait NotificationSink: Send + Sync {
    /// Delivers one notification. Implementations must not panic.
    fn dispatch(&self, notification: &Notification);
}

/// A sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn dispatch(&self, _notification: &Notification) {}
}

/// A sink that records every notification, for tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    recorded: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    /// Creates an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything dispatched so far.
    #[must_use]
    pub fn recorded(&self) -> Vec<Notification> {
        self.recorded
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl NotificationSink for RecordingSink {
    fn dispatch(&self, notification: &Notification) {
        if let Ok(mut guard) = self.recorded.lock() {
            guard.push(notification.clone());
        }
    }
}
