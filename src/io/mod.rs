//! I/O module
//!
//! Handles fixed-width input reading and report output.
//!
//! # Components
//!
//! - `sync_reader` - Synchronous line reader with iterator interface
//! - `async_reader` - Asynchronous line reader with batch reading interface
//! - `submission` - Fixed-width submission file rendering
//! - `report` - CSV audit report for failed and flagged rows

pub mod async_reader;
pub mod report;
pub mod submission;
pub mod sync_reader;

pub use async_reader::AsyncLineReader;
pub use report::write_error_report;
pub use submission::{render_submission, LineEnding, Submission, SUBMISSION_LINE_WIDTH};
pub use sync_reader::{LineReader, SourceLine};
