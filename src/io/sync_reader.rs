//! Synchronous line reader with iterator interface
//!
//! Provides a streaming iterator over the lines of a fixed-width input
//! file. Decoding is left to the codec module; this reader only deals in
//! raw text and line numbers.
//!
//! # Design
//!
//! The LineReader wraps a buffered reader and yields one [`SourceLine`]
//! per physical line, keeping the 1-based line number alongside the text
//! so every downstream error can point back at the offending row. Lines
//! are processed one at a time without loading the entire file into
//! memory.
//!
//! # Iterator Interface
//!
//! LineReader implements the Iterator trait, yielding
//! `Result<SourceLine, ReportError>` for each row:
//!
//! ```no_run
//! use aml_reporting_engine::io::sync_reader::LineReader;
//! use std::path::Path;
//!
//! let reader = LineReader::open(Path::new("transactions.txt")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(line) => println!("line {}: {} chars", line.number, line.text.len()),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - A missing file is reported from `open()` as [`ReportError::FileNotFound`]
//! - Other I/O failures surface as Err items in the iterator
//! - Empty lines are skipped but still counted, so line numbers always
//!   match what an editor would show

use crate::types::ReportError;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Lines};
use std::path::Path;

/// One physical line of an input file, with its 1-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub number: u64,
    pub text: String,
}

/// Synchronous line reader
///
/// Provides an iterator interface over the raw lines of a fixed-width
/// file. Maintains streaming behavior with constant memory usage.
#[derive(Debug)]
pub struct LineReader {
    lines: Lines<BufReader<File>>,
    line_num: u64,
}

impl LineReader {
    /// Open a fixed-width file for streaming iteration.
    ///
    /// # Returns
    ///
    /// * `Ok(LineReader)` if the file opened successfully
    /// * `Err(ReportError::FileNotFound)` if the path does not exist
    /// * `Err(ReportError::Io)` for any other I/O failure
    pub fn open(path: &Path) -> Result<Self, ReportError> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                ReportError::file_not_found(path.display().to_string())
            } else {
                ReportError::io(format!("failed to open '{}': {}", path.display(), e))
            }
        })?;

        Ok(Self {
            lines: BufReader::new(file).lines(),
            line_num: 0,
        })
    }
}

impl Iterator for LineReader {
    type Item = Result<SourceLine, ReportError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            self.line_num += 1;
            match line {
                // Blank separator lines are not records; skip them but keep
                // counting so numbers stay aligned with the file.
                Ok(text) if text.is_empty() => {
                    log::debug!("skipping blank line {}", self.line_num);
                    continue;
                }
                Ok(text) => {
                    return Some(Ok(SourceLine {
                        number: self.line_num,
                        text,
                    }))
                }
                Err(e) => {
                    return Some(Err(ReportError::io(format!(
                        "read failed at line {}: {}",
                        self.line_num, e
                    ))))
                }
            }
        }
    }
}
