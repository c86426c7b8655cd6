//! Streaming record source for file-backed runs.
//!
//! Supported layouts:
//! - a JSON document `{"mortgages": [ {...}, {...} ]}` (other top-level keys
//!   are skipped without being materialized)
//! - JSON Lines (`.jsonl` / `.ndjson`): one record per line
//!
//! Records are parsed on a dedicated reader thread and handed over in
//! `chunk_size` batches through a bounded channel, so the whole file is never
//! held in memory. Malformed JSON is a source fault: it is delivered as an
//! `Err` item and the reader stops.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::mpsc::{Receiver, SyncSender, sync_channel};
use std::thread;

use serde::de::{DeserializeSeed, Error as _, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde_json::Value;

use crate::domain::RecordBatch;
use crate::error::AppError;

/// Top-level key holding the record array in document files.
pub const RECORDS_KEY: &str = "mortgages";

pub type BatchReceiver = Receiver<Result<RecordBatch, AppError>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Document,
    JsonLines,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("jsonl" | "ndjson") => SourceFormat::JsonLines,
            _ => SourceFormat::Document,
        }
    }
}

/// Open `path` and start streaming batches from it.
///
/// A missing or unreadable file is reported here, before any batch exists.
pub fn spawn_file_reader(
    path: &Path,
    chunk_size: usize,
    read_ahead: usize,
) -> Result<BatchReceiver, AppError> {
    if !path.exists() {
        return Err(AppError::new(2, format!("File not found: {}", path.display())));
    }
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open '{}': {e}", path.display())))?;

    let (tx, rx) = sync_channel(read_ahead.max(1));
    let format = SourceFormat::from_path(path);
    let display = path.display().to_string();

    thread::Builder::new()
        .name("mrate-reader".to_string())
        .spawn(move || {
            let mut emitter = BatchEmitter::new(tx, chunk_size);
            let reader = BufReader::new(file);
            let outcome = match format {
                SourceFormat::Document => read_document(reader, &mut emitter),
                SourceFormat::JsonLines => read_json_lines(reader, &mut emitter),
            };
            match outcome {
                Ok(()) => emitter.finish(),
                Err(ReadError::Disconnected) => {}
                Err(ReadError::Malformed(message)) => {
                    let _ = emitter.tx.send(Err(AppError::new(
                        2,
                        format!("Malformed JSON in '{display}': {message}"),
                    )));
                }
            }
        })
        .map_err(|e| AppError::new(4, format!("Failed to start reader thread: {e}")))?;

    Ok(rx)
}

enum ReadError {
    /// The consumer hung up; stop quietly.
    Disconnected,
    Malformed(String),
}

#[derive(Debug)]
struct Disconnected;

impl fmt::Display for Disconnected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("batch consumer disconnected")
    }
}

struct BatchEmitter {
    tx: SyncSender<Result<RecordBatch, AppError>>,
    chunk_size: usize,
    buffer: RecordBatch,
    disconnected: bool,
}

impl BatchEmitter {
    fn new(tx: SyncSender<Result<RecordBatch, AppError>>, chunk_size: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            tx,
            chunk_size,
            buffer: Vec::with_capacity(chunk_size),
            disconnected: false,
        }
    }

    fn push(&mut self, record: Value) -> Result<(), Disconnected> {
        self.buffer.push(record);
        if self.buffer.len() >= self.chunk_size {
            let batch = std::mem::replace(&mut self.buffer, Vec::with_capacity(self.chunk_size));
            self.send(batch)?;
        }
        Ok(())
    }

    fn send(&mut self, batch: RecordBatch) -> Result<(), Disconnected> {
        self.tx.send(Ok(batch)).map_err(|_| {
            self.disconnected = true;
            Disconnected
        })
    }

    fn finish(mut self) {
        if !self.buffer.is_empty() {
            let batch = std::mem::take(&mut self.buffer);
            let _ = self.send(batch);
        }
    }
}

fn read_document<R: Read>(reader: R, emitter: &mut BatchEmitter) -> Result<(), ReadError> {
    let mut de = serde_json::Deserializer::from_reader(reader);
    let outcome = MortgagesDocument { emitter: &mut *emitter }
        .deserialize(&mut de)
        .and_then(|()| de.end());

    match outcome {
        Ok(()) => Ok(()),
        Err(_) if emitter.disconnected => Err(ReadError::Disconnected),
        Err(e) => Err(ReadError::Malformed(e.to_string())),
    }
}

fn read_json_lines<R: Read>(reader: R, emitter: &mut BatchEmitter) -> Result<(), ReadError> {
    for item in serde_json::Deserializer::from_reader(reader).into_iter::<Value>() {
        let record = item.map_err(|e| ReadError::Malformed(e.to_string()))?;
        emitter.push(record).map_err(|_| ReadError::Disconnected)?;
    }
    Ok(())
}

struct MortgagesDocument<'a> {
    emitter: &'a mut BatchEmitter,
}

impl<'de> DeserializeSeed<'de> for MortgagesDocument<'_> {
    type Value = ();

    fn deserialize<D: serde::Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for MortgagesDocument<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a JSON object with a `{RECORDS_KEY}` array")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<(), A::Error> {
        let emitter = self.emitter;
        while let Some(key) = map.next_key::<String>()? {
            if key == RECORDS_KEY {
                map.next_value_seed(RecordArray {
                    emitter: &mut *emitter,
                })?;
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(())
    }
}

struct RecordArray<'a> {
    emitter: &'a mut BatchEmitter,
}

impl<'de> DeserializeSeed<'de> for RecordArray<'_> {
    type Value = ();

    fn deserialize<D: serde::Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_seq(self)
    }
}

impl<'de> Visitor<'de> for RecordArray<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{RECORDS_KEY}` to be an array")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<(), A::Error> {
        while let Some(record) = seq.next_element::<Value>()? {
            self.emitter.push(record).map_err(A::Error::custom)?;
        }
        Ok(())
    }
}
