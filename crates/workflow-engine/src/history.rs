//! Undo/redo history using compressed snapshots
//!
//! Every structural edit records a full snapshot of nodes, edges and
//! viewport. Snapshots are serialized to JSON and zstd-compressed, so a
//! long history of small graphs stays cheap to hold.
//!
//! The stack is linear: `past`, one `present`, and `future`. Recording a new
//! snapshot clears `future`. `present` always mirrors the live editor state,
//! so undo restores the top of `past` and redo the front of `future`.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::{Result, WorkflowEngineError};
use crate::types::{Viewport, WorkflowEdge, WorkflowNode};

/// Kind of edit that produced a history record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryAction {
    Add,
    Delete,
    Update,
    Move,
}

/// Editor state captured by a history record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub nodes: Vec<WorkflowNode>,
    pub edges: Vec<WorkflowEdge>,
    pub viewport: Viewport,
}

/// An immutable, compressed snapshot
#[derive(Debug, Clone)]
pub struct HistoryRecord {
    pub id: String,
    pub action: HistoryAction,
    pub timestamp: DateTime<Utc>,
    data: Vec<u8>,
}

impl HistoryRecord {
    fn capture(action: HistoryAction, snapshot: &Snapshot, level: i32) -> Result<Self> {
        let json = serde_json::to_vec(snapshot)?;
        let data = zstd::encode_all(&json[..], level)
            .map_err(|e| WorkflowEngineError::Compression(e.to_string()))?;

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            action,
            timestamp: Utc::now(),
            data,
        })
    }

    /// Decompress the captured state
    pub fn snapshot(&self) -> Result<Snapshot> {
        let json = zstd::decode_all(&self.data[..])
            .map_err(|e| WorkflowEngineError::Compression(e.to_string()))?;
        Ok(serde_json::from_slice(&json)?)
    }

    pub fn compressed_size(&self) -> usize {
        self.data.len()
    }
}

/// Bounded undo/redo stack
pub struct History {
    past: VecDeque<HistoryRecord>,
    present: HistoryRecord,
    future: VecDeque<HistoryRecord>,
    limit: usize,
    compression_level: i32,
}

impl History {
    /// Start a history whose present is `initial`
    pub fn new(initial: &Snapshot, config: &EngineConfig) -> Result<Self> {
        Self::with_limit(initial, config.history_limit, config.snapshot_compression_level)
    }

    pub fn with_limit(initial: &Snapshot, limit: usize, compression_level: i32) -> Result<Self> {
        Ok(Self {
            past: VecDeque::new(),
            present: HistoryRecord::capture(HistoryAction::Add, initial, compression_level)?,
            future: VecDeque::new(),
            limit,
            compression_level,
        })
    }

    /// Record the state after an edit
    ///
    /// The old present moves onto `past` (oldest evicted past the limit) and
    /// the redo branch is discarded.
    pub fn record(&mut self, action: HistoryAction, snapshot: &Snapshot) -> Result<()> {
        let record = HistoryRecord::capture(action, snapshot, self.compression_level)?;
        let previous = std::mem::replace(&mut self.present, record);

        self.past.push_back(previous);
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
        self.future.clear();

        log::trace!(
            "History: recorded {:?} ({} undo, {} bytes)",
            action,
            self.past.len(),
            self.compressed_size()
        );
        Ok(())
    }

    /// Step back one record
    ///
    /// Returns the state to restore, or None if there is nothing to undo.
    pub fn undo(&mut self) -> Option<Result<Snapshot>> {
        let snapshot = match self.past.back()?.snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) => return Some(Err(e)),
        };
        let previous = self.past.pop_back()?;
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push_front(current);
        Some(Ok(snapshot))
    }

    /// Step forward one record
    ///
    /// Returns the state to restore, or None if there is nothing to redo.
    pub fn redo(&mut self) -> Option<Result<Snapshot>> {
        let snapshot = match self.future.front()?.snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) => return Some(Err(e)),
        };
        let next = self.future.pop_front()?;
        let current = std::mem::replace(&mut self.present, next);
        self.past.push_back(current);
        Some(Ok(snapshot))
    }

    /// Hard reset to a single present record
    ///
    /// Not undoable.
    pub fn reset(&mut self, snapshot: &Snapshot) -> Result<()> {
        self.present = HistoryRecord::capture(HistoryAction::Add, snapshot, self.compression_level)?;
        self.past.clear();
        self.future.clear();
        Ok(())
    }

    pub fn present(&self) -> &HistoryRecord {
        &self.present
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.past.len()
    }

    pub fn redo_len(&self) -> usize {
        self.future.len()
    }

    /// Total compressed size of all records
    pub fn compressed_size(&self) -> usize {
        self.past
            .iter()
            .chain(std::iter::once(&self.present))
            .chain(self.future.iter())
            .map(HistoryRecord::compressed_size)
            .sum()
    }
}
