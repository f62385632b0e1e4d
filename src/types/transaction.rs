//! Transaction-related types for the points engine
//!
//! This module defines the transaction kinds, the immutable history record
//! appended after every committed mutation, and the parsed operation record
//! consumed by the service.

use serde::{Deserialize, Serialize};

use super::error::PointError;

/// User identifier
///
/// Zero is not a valid user ID and is rejected at the service boundary.
pub type UserId = u64;

/// Operations supported by the points engine
///
/// Each variant represents one direction of balance movement. Credits
/// increase a balance, debits decrease it; both append exactly one
/// history record when they commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Add points to a balance
    ///
    /// Increases the balance by the transaction amount. Materializes a
    /// zero balance first if the user has none.
    Credit,

    /// Spend points from a balance
    ///
    /// Decreases the balance by the transaction amount. Requires the
    /// current balance to cover the full amount.
    Debit,
}

/// Immutable record of one committed charge or use
///
/// Records are created with a placeholder id of 0 and receive their
/// store-assigned sequence number when appended to the history store.
/// Once appended they are never mutated or removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    /// Store-assigned sequence number (0 until appended)
    pub id: i64,

    /// The user whose balance changed
    pub user_id: UserId,

    /// Points moved by this transaction (always positive)
    pub amount: i64,

    /// Whether points were added or spent
    pub kind: TransactionKind,

    /// Commit time in milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl TransactionRecord {
    /// Create an unappended credit record
    pub fn credit(user_id: UserId, amount: i64, timestamp: i64) -> Self {
        TransactionRecord {
            id: 0,
            user_id,
            amount,
            kind: TransactionKind::Credit,
            timestamp,
        }
    }

    /// Create an unappended debit record
    pub fn debit(user_id: UserId, amount: i64, timestamp: i64) -> Self {
        TransactionRecord {
            id: 0,
            user_id,
            amount,
            kind: TransactionKind::Debit,
            timestamp,
        }
    }

    /// Check the record invariants
    ///
    /// The history store calls this before assigning an id and appending.
    ///
    /// # Returns
    ///
    /// `Ok(())` when the user id, amount, and timestamp are all positive,
    /// otherwise the matching `PointError` variant.
    pub fn validate(&self) -> Result<(), PointError> {
        if self.user_id == 0 {
            return Err(PointError::invalid_user_id(self.user_id));
        }
        if self.amount <= 0 {
            return Err(PointError::invalid_amount(self.amount));
        }
        if self.timestamp <= 0 {
            return Err(PointError::invalid_timestamp(self.timestamp));
        }
        Ok(())
    }

    /// Signed contribution of this record to the balance
    ///
    /// Positive for credits, negative for debits. Summing this over a
    /// user's history in append order reproduces the balance.
    pub fn signed_amount(&self) -> i64 {
        match self.kind {
            TransactionKind::Credit => self.amount,
            TransactionKind::Debit => -self.amount,
        }
    }

    /// Whether this record was a credit
    pub fn is_credit(&self) -> bool {
        self.kind == TransactionKind::Credit
    }

    /// Whether this record was a debit
    pub fn is_debit(&self) -> bool {
        self.kind == TransactionKind::Debit
    }
}

/// One parsed input operation awaiting processing
///
/// Produced by the CSV reader. Amounts are deliberately not validated
/// here; the domain logic rejects non-positive values so that invalid
/// rows surface as typed errors rather than parse failures.
#[derive(Debug, Clone)]
pub struct OperationRecord {
    /// The operation to perform (credit or debit)
    pub kind: TransactionKind,

    /// The user the operation targets
    pub user_id: UserId,

    /// Requested point delta (validated by the domain logic)
    pub amount: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::valid_credit(TransactionRecord::credit(1, 100, 1_700_000_000_000), true)]
    #[case::valid_debit(TransactionRecord::debit(42, 1, 1), true)]
    #[case::zero_user(TransactionRecord::credit(0, 100, 1_700_000_000_000), false)]
    #[case::zero_amount(TransactionRecord::credit(1, 0, 1_700_000_000_000), false)]
    #[case::negative_amount(TransactionRecord::debit(1, -5, 1_700_000_000_000), false)]
    #[case::zero_timestamp(TransactionRecord::credit(1, 100, 0), false)]
    #[case::negative_timestamp(TransactionRecord::credit(1, 100, -1), false)]
    fn test_record_validation(#[case] record: TransactionRecord, #[case] valid: bool) {
        assert_eq!(record.validate().is_ok(), valid);
    }

    #[test]
    fn test_factories_use_placeholder_id() {
        let credit = TransactionRecord::credit(7, 500, 1_700_000_000_000);
        let debit = TransactionRecord::debit(7, 200, 1_700_000_000_001);

        assert_eq!(credit.id, 0);
        assert_eq!(debit.id, 0);
        assert!(credit.is_credit());
        assert!(debit.is_debit());
    }

    #[rstest]
    #[case::credit(TransactionRecord::credit(1, 300, 1), 300)]
    #[case::debit(TransactionRecord::debit(1, 300, 1), -300)]
    fn test_signed_amount(#[case] record: TransactionRecord, #[case] expected: i64) {
        assert_eq!(record.signed_amount(), expected);
    }
}
