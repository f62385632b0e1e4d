//! I/O module
//!
//! Handles CSV parsing and output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (record conversion, output serialization)
//! - `reader` - Synchronous CSV reader with iterator and batch interfaces

pub mod csv_format;
pub mod reader;

pub use csv_format::{convert_operation, write_balances_csv, CsvRecord};
pub use reader::OperationReader;
