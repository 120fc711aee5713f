//! Asynchronous line reader with batch interface
//!
//! Provides batched reading over the lines of a fixed-width input file.
//! Decoding is left to the codec module.
//!
//! # Design
//!
//! The AsyncLineReader uses:
//! - tokio for async file I/O and buffering
//! - Batch reading so callers can fan decode work out per batch
//!
//! # Architecture
//!
//! ```text
//! Fixed-width file → AsyncLineReader → Batches of SourceLines
//!                          ↓
//!                    codec module
//!                    (decode_sourced)
//! ```

use crate::io::sync_reader::SourceLine;
use crate::types::ReportError;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};

/// Asynchronous line reader
///
/// Provides a batch reading interface over raw numbered lines.
/// Maintains streaming behavior with memory bounded by the batch size.
pub struct AsyncLineReader<R: AsyncRead + Unpin> {
    lines: Lines<BufReader<R>>,
    line_num: u64,
}

impl AsyncLineReader<File> {
    /// Open a fixed-width file for batched async reading.
    pub async fn open(path: &Path) -> Result<Self, ReportError> {
        let file = File::open(path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                ReportError::file_not_found(path.display().to_string())
            } else {
                ReportError::io(format!("failed to open '{}': {}", path.display(), e))
            }
        })?;
        Ok(Self::new(file))
    }
}

impl<R: AsyncRead + Unpin> AsyncLineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
            line_num: 0,
        }
    }

    /// Read up to `batch_size` non-empty lines.
    ///
    /// Blank lines are skipped but still counted so the numbers carried by
    /// the returned [`SourceLine`]s match the physical file. An empty
    /// vector signals end of file.
    pub async fn read_batch(&mut self, batch_size: usize) -> Result<Vec<SourceLine>, ReportError> {
        let mut batch = Vec::with_capacity(batch_size);

        while batch.len() < batch_size {
            match self.lines.next_line().await {
                Ok(Some(text)) => {
                    self.line_num += 1;
                    if text.is_empty() {
                        log::debug!("skipping blank line {}", self.line_num);
                        continue;
                    }
                    batch.push(SourceLine {
                        number: self.line_num,
                        text,
                    });
                }
                Ok(None) => break,
                Err(e) => {
                    return Err(ReportError::io(format!(
                        "read failed after line {}: {}",
                        self.line_num, e
                    )))
                }
            }
        }

        Ok(batch)
    }
}
