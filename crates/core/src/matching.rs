// Copyright (C) 2026 Tokendesk Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Candidate selection for consultation requests.
//!
//! Selection is a pure function of the directory, the request, and the
//! current instant. It runs in two passes over one ranked ordering:
//! regular availability first, surge eligibility second. Surge is only
//! reached when nobody is inside their regular hours, so a surge
//! invitation always means the platform is paying extra for off-hours
//! coverage.
//!
//! ## Invariants
//!
//! - Excluded consultants (declined, expired, or shuffled away) are never
//!   offered the same request twice.
//! - When any candidate shares a tag with the request, tag-less candidates
//!   are not considered; when nobody shares a tag, the whole pool is.
//! - Ranking is total: overlap, then load, then least-recently-assigned,
//!   then id, so selection is deterministic.

use chrono::{DateTime, Utc};
use tokendesk_domain::{
    Consultant, ConsultantId, ConsultationRequest, SurgeMultiplier, is_available,
    is_in_surge_window,
};

use crate::state::ConsultantDirectory;

/// The consultant chosen by a matching pass, with the pricing terms the
/// invitation must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchCandidate {
    /// The selected consultant.
    pub consultant_id: ConsultantId,
    /// True if the selection came from the surge pass.
    pub is_surge: bool,
    /// The multiplier to snapshot onto the invitation.
    pub multiplier: SurgeMultiplier,
}

/// Selects the consultant to invite for a request, or `None` if nobody is
/// eligible right now.
///
/// Pass one takes the best-ranked candidate inside their regular
/// availability. Pass two, reached only when pass one is empty, takes the
/// best-ranked surge-eligible candidate at their declared multiplier.
#[must_use]
pub fn select_candidate(
    directory: &ConsultantDirectory,
    request: &ConsultationRequest,
    now: DateTime<Utc>,
) -> Option<MatchCandidate> {
    let ranked: Vec<&Consultant> = ranked_pool(directory, request);

    if let Some(consultant) = ranked
        .iter()
        .find(|c| is_available(&c.availability_rules, now))
    {
        return Some(MatchCandidate {
            consultant_id: consultant.consultant_id,
            is_surge: false,
            multiplier: SurgeMultiplier::NONE,
        });
    }

    ranked
        .iter()
        .find(|c| is_in_surge_window(c.surge.as_ref(), &c.availability_rules, now))
        .map(|consultant| MatchCandidate {
            consultant_id: consultant.consultant_id,
            is_surge: true,
            multiplier: consultant
                .surge
                .as_ref()
                .map_or(SurgeMultiplier::NONE, |s| s.multiplier),
        })
}

/// Builds the eligible pool for a request and ranks it.
///
/// Eligibility: approved, self-marked available, and not excluded. If any
/// eligible consultant shares a specialization with the request, the pool
/// narrows to those; otherwise every eligible consultant stays in
/// (the no-specialist fallback).
fn ranked_pool<'a>(
    directory: &'a ConsultantDirectory,
    request: &ConsultationRequest,
) -> Vec<&'a Consultant> {
    let mut pool: Vec<&Consultant> = directory
        .consultants()
        .iter()
        .filter(|c| c.approved && c.self_available && !request.is_excluded(c.consultant_id))
        .collect();

    if pool
        .iter()
        .any(|c| c.specialization_overlap(&request.tech_stack) > 0)
    {
        pool.retain(|c| c.specialization_overlap(&request.tech_stack) > 0);
    }

    pool.sort_by(|a, b| {
        let overlap_a = a.specialization_overlap(&request.tech_stack);
        let overlap_b = b.specialization_overlap(&request.tech_stack);
        overlap_b
            .cmp(&overlap_a)
            .then_with(|| a.active_sessions.cmp(&b.active_sessions))
            .then_with(|| a.last_assigned_at.cmp(&b.last_assigned_at))
            .then_with(|| a.consultant_id.cmp(&b.consultant_id))
    });
    pool
}
