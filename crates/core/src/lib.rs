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

//! The Tokendesk matching, invitation, and billing engine.
//!
//! State transitions are pure functions over per-request aggregates: the
//! hosting layer holds the aggregate under a lock, calls [`apply`] (or
//! [`apply_settlement`] for billing), and swaps in the returned state on
//! success. All side effects — id allocation, clocks, notification
//! delivery — live outside this crate.

mod apply;
mod command;
mod config;
mod error;
mod matching;
mod state;

#[cfg(test)]
mod tests;

pub use apply::{apply, apply_settlement};
pub use command::{Command, SessionParty};
pub use config::EngineConfig;
pub use error::CoreError;
pub use matching::{MatchCandidate, select_candidate};
pub use state::{
    ConsultantDirectory, RequestState, SettlementResult, TransitionResult,
};
