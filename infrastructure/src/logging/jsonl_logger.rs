//! Append-only JSONL audit trail of trip activity.
//!
//! One [`ActivityRecord`] per line:
//!
//! ```text
//! {"seq":0,"type":"vote_cast","timestamp":"2026-10-19T09:12:03.120Z","trip":"lisbon","candidate":"h1","voter":"ana","decision":"like"}
//! ```
//!
//! `seq` numbers the records written by one logger instance, so lines logged
//! from concurrent votes keep a total order even when timestamps collide.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;
use tripvote_application::ports::activity_logger::{ActivityEvent, ActivityLogger};

/// Line layout of the activity log
#[derive(Debug, Serialize)]
struct ActivityRecord<'a> {
    seq: u64,
    #[serde(rename = "type")]
    kind: &'a str,
    timestamp: DateTime<Utc>,
    /// Trip the activity belongs to, hoisted from the payload
    #[serde(skip_serializing_if = "Option::is_none")]
    trip: Option<Value>,
    #[serde(flatten)]
    detail: Map<String, Value>,
}

impl<'a> ActivityRecord<'a> {
    fn new(seq: u64, event: &'a ActivityEvent) -> Self {
        let mut detail = match &event.payload {
            Value::Object(fields) => fields.clone(),
            Value::Null => Map::new(),
            other => Map::from_iter([("data".to_string(), other.clone())]),
        };
        let trip = detail.remove("trip");

        Self {
            seq,
            kind: event.event_type,
            timestamp: Utc::now(),
            trip,
            detail,
        }
    }
}

/// [`ActivityLogger`] writing [`ActivityRecord`] lines to a file
pub struct JsonlActivityLogger {
    writer: Mutex<BufWriter<File>>,
    next_seq: AtomicU64,
    path: PathBuf,
}

fn open_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

impl JsonlActivityLogger {
    /// Open `path` for appending, creating it and its directories.
    /// `None` when the file cannot be opened; the caller runs without a log.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        match open_append(path) {
            Ok(file) => Some(Self {
                writer: Mutex::new(BufWriter::new(file)),
                next_seq: AtomicU64::new(0),
                path: path.to_path_buf(),
            }),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cannot open activity log");
                None
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, record: &ActivityRecord<'_>) -> io::Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| io::Error::other("activity log lock poisoned"))?;
        serde_json::to_writer(&mut *writer, record)?;
        writer.write_all(b"\n")?;
        writer.flush()
    }
}

impl ActivityLogger for JsonlActivityLogger {
    fn log(&self, event: ActivityEvent) {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let record = ActivityRecord::new(seq, &event);
        if let Err(e) = self.append(&record) {
            warn!(kind = record.kind, error = %e, "Dropped activity record");
        }
    }
}
