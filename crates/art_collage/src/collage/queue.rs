//! Sequential load queue.
use std::thread;
use std::time::Duration;

use crate::manifest::ImageRecord;

/// Yields shuffled manifest records one at a time, pausing `pacing` before each.
///
/// Dropping the queue, or simply no longer pulling from it, cancels the remaining loads.
#[derive(Debug, Clone)]
pub struct LoadQueue {
    records: Vec<ImageRecord>,
    cursor: usize,
    pacing: Duration,
}

impl LoadQueue {
    pub fn new(records: Vec<ImageRecord>, pacing: Duration) -> Self {
        Self {
            records,
            cursor: 0,
            pacing,
        }
    }

    /// Total number of queued records, including those already yielded.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records not yet yielded.
    pub fn remaining(&self) -> usize {
        self.records.len() - self.cursor
    }

    /// Records in load order.
    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }
}

impl Iterator for LoadQueue {
    /// Index in load order and the record to load.
    type Item = (usize, ImageRecord);

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.get(self.cursor)?.clone();
        if !self.pacing.is_zero() {
            thread::sleep(self.pacing);
        }
        let index = self.cursor;
        self.cursor += 1;
        Some((index, record))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for LoadQueue {}
