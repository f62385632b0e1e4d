//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `balance`: the Balance value object and its domain logic
//! - `transaction`: transaction kinds, history records, and operation records
//! - `error`: error types for the points engine
//! - `clock`: wall-clock timestamp source

pub mod balance;
pub mod clock;
pub mod error;
pub mod transaction;

pub use balance::Balance;
pub use error::PointError;
pub use transaction::{OperationRecord, TransactionKind, TransactionRecord, UserId};
