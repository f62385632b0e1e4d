//! Balance types for the points engine
//!
//! This module defines the Balance value object and the pure domain
//! logic that computes new balances from charge and use operations.

use super::error::PointError;
use super::transaction::UserId;

/// A user's point balance at a moment in time
///
/// Balances are immutable value objects: every successful operation
/// produces a new instance rather than mutating in place. A committed
/// balance amount is never negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Balance {
    /// The user this balance belongs to
    pub user_id: UserId,

    /// Current point total (never negative once committed)
    pub amount: i64,

    /// Time of the last committed mutation, in milliseconds since the
    /// Unix epoch
    pub last_updated: i64,
}

impl Balance {
    /// Materialize the zero balance for a user with no stored balance
    ///
    /// # Arguments
    ///
    /// * `user_id` - The user ID for this balance
    /// * `now` - Current time in milliseconds since the Unix epoch
    pub fn empty(user_id: UserId, now: i64) -> Self {
        Balance {
            user_id,
            amount: 0,
            last_updated: now,
        }
    }

    /// Validate an operation amount
    ///
    /// Both charge and use require a strictly positive amount.
    pub fn validate_amount(amount: i64) -> Result<(), PointError> {
        if amount <= 0 {
            return Err(PointError::invalid_amount(amount));
        }
        Ok(())
    }

    /// Compute the balance after a charge
    ///
    /// Returns a new Balance with `amount` added and `last_updated` set
    /// to `now`. The stored balance is untouched.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` when `amount` is zero or negative
    /// - `ArithmeticOverflow` when the addition would wrap
    /// - `LimitExceeded` when `limit` is configured and the new total
    ///   would exceed it
    pub fn credit(&self, amount: i64, limit: Option<i64>, now: i64) -> Result<Balance, PointError> {
        Self::validate_amount(amount)?;

        let new_amount = self
            .amount
            .checked_add(amount)
            .ok_or_else(|| PointError::arithmetic_overflow("charge", self.user_id))?;

        if let Some(limit) = limit {
            if new_amount > limit {
                return Err(PointError::limit_exceeded(self.user_id, new_amount, limit));
            }
        }

        Ok(Balance {
            user_id: self.user_id,
            amount: new_amount,
            last_updated: now,
        })
    }

    /// Compute the balance after a use
    ///
    /// Returns a new Balance with `amount` subtracted and `last_updated`
    /// set to `now`. Negativity is checked both before the subtraction
    /// and on its result.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` when `amount` is zero or negative
    /// - `InsufficientBalance` when the balance cannot cover the amount
    pub fn debit(&self, amount: i64, now: i64) -> Result<Balance, PointError> {
        Self::validate_amount(amount)?;

        if self.amount < amount {
            return Err(PointError::insufficient_balance(
                self.user_id,
                self.amount,
                amount,
            ));
        }

        let new_amount = self
            .amount
            .checked_sub(amount)
            .filter(|remaining| *remaining >= 0)
            .ok_or_else(|| {
                PointError::insufficient_balance(self.user_id, self.amount, amount)
            })?;

        Ok(Balance {
            user_id: self.user_id,
            amount: new_amount,
            last_updated: now,
        })
    }

    /// Whether a use of `amount` would succeed against this balance
    pub fn can_use(&self, amount: i64) -> bool {
        amount > 0 && self.amount >= amount
    }

    /// Whether a charge of `amount` would succeed under the given ceiling
    pub fn can_charge(&self, amount: i64, limit: Option<i64>) -> bool {
        if amount <= 0 {
            return false;
        }
        match (self.amount.checked_add(amount), limit) {
            (Some(total), Some(limit)) => total <= limit,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}
