// Copyright (C) 2026 Tokendesk Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The prepaid token ledger.
//!
//! The transaction log is the single source of truth for a user's balance.
//! The "current balance" is a read model: by definition it is the latest
//! transaction's `resulting_balance`, never a separately written field.
//!
//! ## Invariants
//!
//! - Transactions are append-only and immutable once recorded.
//! - Each transaction's `resulting_balance` equals the previous balance plus
//!   its signed amount.
//! - Debits are clamped so the balance never goes negative; any uncovered
//!   remainder is reported as a shortfall, not applied.

use crate::error::DomainError;
use crate::ids::{ConsultationId, SeekerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An immutable ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTransaction {
    /// The user the entry belongs to.
    pub user_id: SeekerId,
    /// Signed token amount: positive for credits, non-positive for debits.
    pub amount: i64,
    /// The balance after this entry was applied.
    pub resulting_balance: i64,
    /// The consultation this entry settles, if any.
    pub consultation_id: Option<ConsultationId>,
    /// External reference (e.g. a purchase confirmation id), if any.
    pub reference: Option<String>,
    /// When the entry was recorded.
    pub recorded_at: DateTime<Utc>,
}

/// The outcome of a clamped debit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebitOutcome {
    /// Tokens actually removed from the balance.
    pub charged: i64,
    /// Tokens requested but not covered by the balance.
    pub shortfall: i64,
    /// The balance after the debit.
    pub resulting_balance: i64,
}

/// A user's token ledger: the append-only transaction log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenLedger {
    /// The user this ledger belongs to.
    user_id: SeekerId,
    /// The transaction log, oldest first.
    transactions: Vec<TokenTransaction>,
}

impl TokenLedger {
    /// Creates an empty ledger for a user.
    #[must_use]
    pub const fn new(user_id: SeekerId) -> Self {
        Self {
            user_id,
            transactions: Vec::new(),
        }
    }

    /// Returns the user this ledger belongs to.
    #[must_use]
    pub const fn user_id(&self) -> SeekerId {
        self.user_id
    }

    /// Returns the current balance: the latest transaction's resulting
    /// balance, or zero for an empty ledger.
    #[must_use]
    pub fn balance(&self) -> i64 {
        self.transactions
            .last()
            .map_or(0, |tx| tx.resulting_balance)
    }

    /// Returns the transaction log, oldest first.
    #[must_use]
    pub fn transactions(&self) -> &[TokenTransaction] {
        &self.transactions
    }

    /// Appends a credit and returns the recorded transaction.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTokenAmount` if `amount` is not positive.
    pub fn credit(
        &mut self,
        amount: i64,
        reference: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<TokenTransaction, DomainError> {
        if amount <= 0 {
            return Err(DomainError::InvalidTokenAmount { amount });
        }
        let resulting_balance: i64 = self.balance() + amount;
        let transaction = TokenTransaction {
            user_id: self.user_id,
            amount,
            resulting_balance,
            consultation_id: None,
            reference,
            recorded_at: now,
        };
        self.transactions.push(transaction.clone());
        Ok(transaction)
    }

    /// Appends a debit clamped at the current balance and returns the
    /// outcome.
    ///
    /// The debit is recorded even when fully clamped (a zero-amount entry),
    /// so the ledger shows that a billing event occurred and what it failed
    /// to cover.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTokenAmount` if `requested` is not
    /// positive.
    pub fn debit(
        &mut self,
        requested: i64,
        consultation_id: Option<ConsultationId>,
        now: DateTime<Utc>,
    ) -> Result<DebitOutcome, DomainError> {
        if requested <= 0 {
            return Err(DomainError::InvalidTokenAmount { amount: requested });
        }
        let balance: i64 = self.balance();
        let charged: i64 = requested.min(balance.max(0));
        let shortfall: i64 = requested - charged;
        let resulting_balance: i64 = balance - charged;
        self.transactions.push(TokenTransaction {
            user_id: self.user_id,
            amount: -charged,
            resulting_balance,
            consultation_id,
            reference: None,
            recorded_at: now,
        });
        Ok(DebitOutcome {
            charged,
            shortfall,
            resulting_balance,
        })
    }

    /// Verifies the ledger invariant: every entry's resulting balance is the
    /// running sum of amounts, and the cached balance equals the latest
    /// entry's resulting balance.
    #[must_use]
    pub fn balance_matches_log(&self) -> bool {
        let mut running: i64 = 0;
        for tx in &self.transactions {
            running += tx.amount;
            if tx.resulting_balance != running {
                return false;
            }
        }
        self.balance() == running
    }
}
