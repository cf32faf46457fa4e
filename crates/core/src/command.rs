// Copyright (C) 2026 Tokendesk Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use tokendesk_domain::{ConsultantId, ConsultationId, InvitationId, SeekerId};

/// The party acting on a session.
///
/// Settlement and session control are restricted to the aggregate's own
/// seeker or consultant; the authenticated id arrives from the hosting
/// layer and is checked here at the domain level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionParty {
    /// The seeker who owns the request.
    Seeker(SeekerId),
    /// The consultant rendering the session.
    Consultant(ConsultantId),
}

/// A command represents user or system intent as data only.
///
/// Commands are the only way to request state changes. Identifiers for
/// aggregates a command may create are allocated by the hosting layer and
/// passed in; they are used only if the command succeeds and creates the
/// aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run one matching attempt for the request.
    ///
    /// Settles an expired outstanding invitation first (lazy expiry), then
    /// selects a candidate and issues a new invitation. A no-op while an
    /// unexpired invitation is outstanding. Finding nobody is a normal
    /// outcome, not an error: the request stays in `matching` for the sweep.
    StartMatching {
        /// The identifier to assign if an invitation is issued.
        invitation_id: InvitationId,
    },
    /// The addressed consultant accepts the outstanding invitation.
    ///
    /// On success the request becomes `matched` and a consultation is
    /// created in the same transition.
    AcceptInvitation {
        /// The invitation being answered.
        invitation_id: InvitationId,
        /// The responding consultant (must be the addressee).
        consultant_id: ConsultantId,
        /// The identifier to assign to the created consultation.
        consultation_id: ConsultationId,
    },
    /// The addressed consultant declines the outstanding invitation.
    DeclineInvitation {
        /// The invitation being answered.
        invitation_id: InvitationId,
        /// The responding consultant (must be the addressee).
        consultant_id: ConsultantId,
    },
    /// The seeker discards the current consultant and re-enters matching.
    Shuffle {
        /// The seeker requesting the shuffle (must own the request).
        requested_by: SeekerId,
    },
    /// The seeker cancels the request outright.
    CancelRequest {
        /// The seeker cancelling (must own the request).
        requested_by: SeekerId,
    },
    /// The seeker starts the scheduled session; metering begins.
    StartSession {
        /// The seeker starting the session (must own the request).
        started_by: SeekerId,
    },
}
