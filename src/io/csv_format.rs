//! CSV format handling for operation input and balance output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV rows to operation records
//! - Balance output serialization
//!
//! All functions are pure (no I/O) for easy testing.

use crate::types::{Balance, OperationRecord, TransactionKind, UserId};
use serde::Deserialize;
use std::io::Write;

/// CSV record structure for deserialization
///
/// Matches the input CSV format with columns: op, user, amount.
/// The amount is kept as a string so parse failures produce row-level
/// errors instead of aborting the whole file.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    pub op: String,
    pub user: UserId,
    pub amount: Option<String>,
}

/// Convert a CsvRecord to an OperationRecord
///
/// This function:
/// - Parses the operation string (`charge` or `use`, case-insensitive)
///   into a TransactionKind
/// - Parses the amount string into an i64
///
/// Zero and negative amounts convert successfully on purpose: amount
/// validation belongs to the domain logic, which rejects them with a
/// typed error instead of a parse failure.
///
/// # Arguments
///
/// * `csv_record` - The deserialized CSV row
///
/// # Returns
///
/// Result containing either:
/// - Ok(OperationRecord) - Successfully converted operation
/// - Err(String) - Error message describing the conversion failure
pub fn convert_operation(csv_record: CsvRecord) -> Result<OperationRecord, String> {
    let kind = match csv_record.op.to_lowercase().as_str() {
        "charge" => TransactionKind::Credit,
        "use" => TransactionKind::Debit,
        _ => {
            return Err(format!(
                "Invalid operation '{}' for user {}",
                csv_record.op, csv_record.user
            ))
        }
    };

    let amount = match csv_record.amount {
        Some(amount_str) if !amount_str.trim().is_empty() => {
            match amount_str.trim().parse::<i64>() {
                Ok(amount) => amount,
                Err(_) => {
                    return Err(format!(
                        "Invalid amount '{}' for user {}",
                        amount_str, csv_record.user
                    ))
                }
            }
        }
        _ => {
            return Err(format!(
                "Operation '{}' for user {} requires an amount",
                csv_record.op, csv_record.user
            ))
        }
    };

    Ok(OperationRecord {
        kind,
        user_id: csv_record.user,
        amount,
    })
}

/// Write final balances to CSV format
///
/// Writes balances with columns: user, amount. Rows are sorted by user
/// ID for deterministic output. The `last_updated` timestamp is omitted
/// because it is wall-clock dependent.
///
/// # Arguments
///
/// * `balances` - Slice of balances to write
/// * `output` - Mutable reference to a writer for outputting CSV
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(String)` if a write error occurred
pub fn write_balances_csv(balances: &[Balance], output: &mut dyn Write) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["user", "amount"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    // Sort balances by user ID for deterministic output
    let mut sorted_balances = balances.to_vec();
    sorted_balances.sort_by_key(|balance| balance.user_id);

    for balance in sorted_balances {
        writer
            .write_record(&[balance.user_id.to_string(), balance.amount.to_string()])
            .map_err(|e| format!("Failed to write balance record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("charge", TransactionKind::Credit)]
    #[case("use", TransactionKind::Debit)]
    #[case("CHARGE", TransactionKind::Credit)] // case insensitive
    #[case("Use", TransactionKind::Debit)]
    fn test_convert_operation_valid(#[case] op: &str, #[case] expected_kind: TransactionKind) {
        let csv_record = CsvRecord {
            op: op.to_string(),
            user: 1,
            amount: Some("100".to_string()),
        };

        let result = convert_operation(csv_record);
        assert!(result.is_ok());

        let record = result.unwrap();
        assert_eq!(record.kind, expected_kind);
        assert_eq!(record.user_id, 1);
        assert_eq!(record.amount, 100);
    }

    #[rstest]
    #[case::invalid_op("refund", Some("100"), "Invalid operation")]
    #[case::missing_amount("charge", None, "requires an amount")]
    #[case::empty_amount("charge", Some(""), "requires an amount")]
    #[case::whitespace_amount("use", Some("  "), "requires an amount")]
    #[case::non_numeric_amount("charge", Some("lots"), "Invalid amount")]
    #[case::fractional_amount("charge", Some("10.5"), "Invalid amount")]
    fn test_convert_operation_errors(
        #[case] op: &str,
        #[case] amount: Option<&str>,
        #[case] expected_error: &str,
    ) {
        let csv_record = CsvRecord {
            op: op.to_string(),
            user: 1,
            amount: amount.map(|s| s.to_string()),
        };

        let result = convert_operation(csv_record);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains(expected_error));
    }

    #[rstest]
    #[case::zero("0", 0)]
    #[case::negative("-5", -5)]
    #[case::whitespace("  250  ", 250)]
    fn test_convert_operation_passes_amounts_through(
        #[case] amount_str: &str,
        #[case] expected: i64,
    ) {
        // Zero and negative amounts are rejected by the domain logic,
        // not by the parser
        let csv_record = CsvRecord {
            op: "charge".to_string(),
            user: 1,
            amount: Some(amount_str.to_string()),
        };

        let result = convert_operation(csv_record);
        assert!(result.is_ok());
        assert_eq!(result.unwrap().amount, expected);
    }

    fn balance(user_id: UserId, amount: i64) -> Balance {
        Balance {
            user_id,
            amount,
            last_updated: 1_700_000_000_000,
        }
    }

    #[rstest]
    #[case::single_balance(
        vec![balance(1, 700)],
        "user,amount\n1,700\n"
    )]
    #[case::multiple_balances(
        vec![balance(1, 700), balance(2, 0)],
        "user,amount\n1,700\n2,0\n"
    )]
    #[case::sorted_by_user_id(
        vec![balance(3, 30), balance(1, 10), balance(2, 20)],
        "user,amount\n1,10\n2,20\n3,30\n"
    )]
    #[case::empty_balances(
        vec![],
        "user,amount\n"
    )]
    fn test_write_balances_csv(#[case] balances: Vec<Balance>, #[case] expected_output: &str) {
        let mut output = Vec::new();
        let result = write_balances_csv(&balances, &mut output);
        assert!(result.is_ok());

        let output_str = String::from_utf8(output).unwrap();
        assert_eq!(output_str, expected_output);
    }
}
