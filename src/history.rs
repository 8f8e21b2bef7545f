// ===============================
// src/history.rs
// ===============================
use std::collections::VecDeque;

use crate::domain::SwapRecord;

pub const DEFAULT_HISTORY_CAP: usize = 5;

/// Riwayat swap terbatas, terbaru di depan. Kelebihan -> buang yang paling lama masuk.
#[derive(Debug, Clone)]
pub struct SwapHistory {
    records: VecDeque<SwapRecord>,
    cap: usize,
}

impl Default for SwapHistory {
    fn default() -> Self { Self::with_capacity(DEFAULT_HISTORY_CAP) }
}

impl SwapHistory {
    pub fn with_capacity(cap: usize) -> Self {
        let cap = cap.max(1);
        Self { records: VecDeque::with_capacity(cap + 1), cap }
    }

    /// Returns the evicted record, if any.
    pub fn push(&mut self, rec: SwapRecord) -> Option<SwapRecord> {
        self.records.push_front(rec);
        if self.records.len() > self.cap { self.records.pop_back() } else { None }
    }

    pub fn len(&self) -> usize { self.records.len() }

    /// Most-recent-first.
    pub fn to_vec(&self) -> Vec<SwapRecord> { self.records.iter().cloned().collect() }
}
