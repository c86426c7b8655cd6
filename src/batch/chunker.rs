//! Split a record source into bounded batches.
//!
//! `Batches` is a lazy, finite, single-pass iterator:
//! - file sources stream through `io::source` (a batch is ready as soon as
//!   `chunk_size` records have been parsed)
//! - in-memory sources are sliced into contiguous runs of `chunk_size`
//! - an empty or missing source yields exactly one empty batch

use std::path::PathBuf;

use serde_json::Value;

use crate::domain::RecordBatch;
use crate::error::AppError;
use crate::io::source::{BatchReceiver, spawn_file_reader};

/// Where the records of a run come from.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordSource {
    File(PathBuf),
    Memory(Vec<Value>),
    None,
}

impl RecordSource {
    /// Pick the source from optional inputs; a file path takes precedence.
    pub fn resolve(file: Option<PathBuf>, records: Option<Vec<Value>>) -> Self {
        match (file, records) {
            (Some(path), _) => RecordSource::File(path),
            (None, Some(records)) if !records.is_empty() => RecordSource::Memory(records),
            _ => RecordSource::None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, RecordSource::None)
    }
}

impl From<Vec<Value>> for RecordSource {
    fn from(records: Vec<Value>) -> Self {
        RecordSource::resolve(None, Some(records))
    }
}

#[derive(Debug, Clone)]
pub struct BatchChunker {
    source: RecordSource,
    chunk_size: usize,
    read_ahead: usize,
}

impl BatchChunker {
    pub fn new(source: RecordSource, chunk_size: usize) -> Self {
        Self {
            source,
            chunk_size: chunk_size.max(1),
            read_ahead: 4,
        }
    }

    /// Number of parsed batches a file reader may buffer ahead of the workers.
    pub fn with_read_ahead(mut self, read_ahead: usize) -> Self {
        self.read_ahead = read_ahead.max(1);
        self
    }

    /// Start producing batches.
    ///
    /// File configuration faults (missing/unreadable file) surface here,
    /// before the first batch.
    pub fn batches(self) -> Result<Batches, AppError> {
        let inner = match self.source {
            RecordSource::File(path) => {
                BatchesInner::Stream(spawn_file_reader(&path, self.chunk_size, self.read_ahead)?)
            }
            RecordSource::Memory(records) if !records.is_empty() => BatchesInner::Memory {
                records: records.into_iter(),
                chunk_size: self.chunk_size,
            },
            RecordSource::Memory(_) | RecordSource::None => BatchesInner::Single(Some(Vec::new())),
        };
        Ok(Batches { inner })
    }
}

/// Lazy batch sequence. Items are `Err` only for file sources that turn out
/// to be malformed mid-stream.
pub struct Batches {
    inner: BatchesInner,
}

enum BatchesInner {
    Stream(BatchReceiver),
    Memory {
        records: std::vec::IntoIter<Value>,
        chunk_size: usize,
    },
    Single(Option<RecordBatch>),
}

impl Iterator for Batches {
    type Item = Result<RecordBatch, AppError>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            BatchesInner::Stream(rx) => rx.recv().ok(),
            BatchesInner::Memory {
                records,
                chunk_size,
            } => {
                let batch: RecordBatch = records.by_ref().take(*chunk_size).collect();
                (!batch.is_empty()).then_some(Ok(batch))
            }
            BatchesInner::Single(batch) => batch.take().map(Ok),
        }
    }
}
