//! Recent scan history.
//!
//! Keeps the last few decoded barcodes so the operator can go back to one
//! without rescanning. Newest entries come first and the list is capped.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{ScanRecord, Symbology};
use crate::{Error, Result, current_timestamp};

/// Default number of scans kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Bounded, newest-first list of scans.
#[derive(Debug, Clone)]
pub struct ScanHistory {
    entries: VecDeque<ScanRecord>,
    limit: usize,
}

#[derive(Serialize)]
struct ExportedScan<'a> {
    code: &'a str,
    symbology: Symbology,
    scanned_at: String,
}

impl ScanHistory {
    /// Creates a history holding at most `limit` scans (minimum 1).
    #[must_use]
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            entries: VecDeque::with_capacity(limit),
            limit,
        }
    }

    /// Rebuilds a history from saved records, newest first.
    ///
    /// Records beyond `limit` are dropped.
    #[must_use]
    pub fn from_records(limit: usize, records: impl IntoIterator<Item = ScanRecord>) -> Self {
        let mut history = Self::new(limit);
        history.entries.extend(records.into_iter().take(history.limit));
        history
    }

    /// Records a scan and returns it.
    ///
    /// The oldest entry is dropped once the limit is reached.
    pub fn record(&mut self, code: impl Into<String>, symbology: Symbology) -> &ScanRecord {
        self.entries.push_front(ScanRecord {
            id: uuid::Uuid::new_v4().to_string(),
            code: code.into(),
            symbology,
            scanned_at: current_timestamp(),
        });
        self.entries.truncate(self.limit);
        tracing::debug!(entries = self.entries.len(), "Recorded scan");
        &self.entries[0]
    }

    /// Removes a scan by ID. Returns whether it was present.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Removes every scan.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the scans, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &ScanRecord> {
        self.entries.iter()
    }

    /// Returns the number of scans held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no scans are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the configured limit.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Exports the history as a pretty JSON array with RFC 3339 timestamps.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn export_json(&self) -> Result<String> {
        let exported: Vec<ExportedScan<'_>> = self
            .entries
            .iter()
            .map(|e| ExportedScan {
                code: &e.code,
                symbology: e.symbology,
                scanned_at: i64::try_from(e.scanned_at)
                    .ok()
                    .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
                    .unwrap_or_default()
                    .to_rfc3339(),
            })
            .collect();

        serde_json::to_string_pretty(&exported).map_err(|e| Error::OperationFailed {
            operation: "export_scan_history".to_string(),
            cause: e.to_string(),
        })
    }
}

impl Default for ScanHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}
