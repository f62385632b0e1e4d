//! Synchronous CSV reader with iterator and batch interfaces
//!
//! Provides a streaming iterator over operation records from a CSV file.
//! Delegates CSV format concerns to the csv_format module.
//!
//! # Design
//!
//! The OperationReader uses csv::Reader to read and deserialize CSV rows
//! sequentially, delegating parsing and conversion to the csv_format
//! module. It maintains streaming behavior by processing rows one at a
//! time without loading the entire file into memory.
//!
//! # Iterator Interface
//!
//! OperationReader implements the Iterator trait, yielding
//! Result<OperationRecord, String> for each CSV row:
//!
//! ```no_run
//! use points_engine::io::reader::OperationReader;
//! use std::path::Path;
//!
//! let reader = OperationReader::new(Path::new("operations.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(record) => println!("Processing operation: {:?}", record),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Individual row parsing errors are yielded as Err variants in the
//!   iterator; `read_batch` logs and skips them
//! - Line numbers are included in error messages for debugging

use crate::io::csv_format::{convert_operation, CsvRecord};
use crate::types::OperationRecord;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;
use tracing::warn;

/// Synchronous CSV operation reader
///
/// Provides an iterator interface over operation records plus a batch
/// interface for the replay pipeline. Maintains streaming behavior with
/// constant memory usage.
#[derive(Debug)]
pub struct OperationReader {
    reader: csv::Reader<File>,
    line_num: usize,
}

impl OperationReader {
    /// Create a new OperationReader from a file path
    ///
    /// Opens the CSV file and prepares it for streaming iteration.
    /// The CSV reader is configured to:
    /// - Trim whitespace from all fields
    /// - Allow flexible field counts
    /// - Use an 8KB buffer for efficient I/O
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the CSV file
    ///
    /// # Returns
    ///
    /// * `Ok(OperationReader)` if the file opened successfully
    /// * `Err(String)` if the file could not be opened
    pub fn new(path: &Path) -> Result<Self, String> {
        let file = File::open(path)
            .map_err(|e| format!("Failed to open file '{}': {}", path.display(), e))?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 0,
        })
    }

    /// Read up to `batch_size` operation records
    ///
    /// Malformed rows are logged and skipped so one bad line never
    /// aborts a replay.
    ///
    /// # Returns
    ///
    /// A vector of successfully converted operation records. Returns an
    /// empty vector when the end of the file is reached.
    pub fn read_batch(&mut self, batch_size: usize) -> Vec<OperationRecord> {
        let mut batch = Vec::with_capacity(batch_size);

        while batch.len() < batch_size {
            match self.next() {
                Some(Ok(record)) => batch.push(record),
                Some(Err(e)) => warn!("skipping row: {}", e),
                None => break,
            }
        }

        batch
    }
}

impl Iterator for OperationReader {
    type Item = Result<OperationRecord, String>;

    /// Get the next operation record from the CSV file
    ///
    /// # Returns
    ///
    /// * `Some(Ok(OperationRecord))` - Successfully parsed row
    /// * `Some(Err(String))` - Parse or conversion error with line number
    /// * `None` - End of file reached
    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<CsvRecord>();

        match deserializer.next()? {
            Ok(csv_record) => {
                self.line_num += 1;
                // Add line number context to any conversion errors
                Some(
                    convert_operation(csv_record)
                        .map_err(|e| format!("Line {}: {}", self.line_num + 1, e)),
                )
            }
            Err(e) => {
                self.line_num += 1;
                Some(Err(format!(
                    "Line {}: CSV parse error: {}",
                    self.line_num + 1,
                    e
                )))
            }
        }
    }
}
