//! Error types for the points engine
//!
//! This module defines all error types that can occur while processing
//! charge and use operations. Errors are typed result values carrying
//! enough context to diagnose the rejected operation; no failure path
//! panics.
//!
//! # Error Categories
//!
//! - **Validation Errors**: invalid amount, user id, or timestamp
//! - **Balance Errors**: insufficient balance, balance limit exceeded
//! - **Arithmetic Errors**: overflow in balance calculations
//! - **Store Errors**: the underlying store rejected a read or write

use thiserror::Error;

use super::transaction::UserId;

/// Main error type for the points engine
///
/// This enum represents all possible errors that can occur while
/// processing charge and use operations. Every variant is detected
/// before any state is committed, except `StoreUnavailable`, which can
/// surface mid-operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PointError {
    /// Operation amount is zero or negative
    ///
    /// This is a recoverable error - the operation is rejected and
    /// neither the balance nor the history changes.
    #[error("Invalid amount {amount}: amount must be positive")]
    InvalidAmount {
        /// The rejected amount
        amount: i64,
    },

    /// User identifier is zero
    ///
    /// This is a recoverable error - the operation is rejected before
    /// any lock is taken or state is read.
    #[error("Invalid user id {user_id}: user id must be positive")]
    InvalidUserId {
        /// The rejected user id
        user_id: UserId,
    },

    /// History record carries a non-positive timestamp
    ///
    /// This is a recoverable error - the record is rejected by the
    /// history store before an id is assigned.
    #[error("Invalid timestamp {timestamp}: timestamp must be positive")]
    InvalidTimestamp {
        /// The rejected timestamp in milliseconds
        timestamp: i64,
    },

    /// Use would drive the balance negative
    ///
    /// This is a recoverable error - the use is rejected and the
    /// balance remains unchanged.
    #[error("Insufficient balance for user {user_id}: balance {balance}, requested {requested}")]
    InsufficientBalance {
        /// User id
        user_id: UserId,
        /// Balance at the time of the rejected use
        balance: i64,
        /// Requested use amount
        requested: i64,
    },

    /// Charge would exceed the configured maximum balance
    ///
    /// Only produced when a ceiling is configured. This is a
    /// recoverable error - the charge is rejected.
    #[error("Balance limit exceeded for user {user_id}: would reach {requested}, limit {limit}")]
    LimitExceeded {
        /// User id
        user_id: UserId,
        /// Balance the charge would have produced
        requested: i64,
        /// Configured maximum balance
        limit: i64,
    },

    /// Arithmetic overflow would occur
    ///
    /// This is a recoverable error - the operation is rejected to keep
    /// the balance intact.
    #[error("Arithmetic overflow in {operation} for user {user_id}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// User id
        user_id: UserId,
    },

    /// Underlying store rejected a read or write
    ///
    /// Surfaced to the caller as-is; the service does not retry.
    #[error("Store unavailable: {message}")]
    StoreUnavailable {
        /// Description of the store failure
        message: String,
    },
}

// Helper functions for creating common errors

impl PointError {
    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: i64) -> Self {
        PointError::InvalidAmount { amount }
    }

    /// Create an InvalidUserId error
    pub fn invalid_user_id(user_id: UserId) -> Self {
        PointError::InvalidUserId { user_id }
    }

    /// Create an InvalidTimestamp error
    pub fn invalid_timestamp(timestamp: i64) -> Self {
        PointError::InvalidTimestamp { timestamp }
    }

    /// Create an InsufficientBalance error
    pub fn insufficient_balance(user_id: UserId, balance: i64, requested: i64) -> Self {
        PointError::InsufficientBalance {
            user_id,
            balance,
            requested,
        }
    }

    /// Create a LimitExceeded error
    pub fn limit_exceeded(user_id: UserId, requested: i64, limit: i64) -> Self {
        PointError::LimitExceeded {
            user_id,
            requested,
            limit,
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, user_id: UserId) -> Self {
        PointError::ArithmeticOverflow {
            operation: operation.to_string(),
            user_id,
        }
    }

    /// Create a StoreUnavailable error
    pub fn store_unavailable(message: &str) -> Self {
        PointError::StoreUnavailable {
            message: message.to_string(),
        }
    }
}
