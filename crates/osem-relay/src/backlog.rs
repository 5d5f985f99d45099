// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bounded record backlog between the producer and the upload worker.
//!
//! `push` never blocks: when the backlog is full the oldest record is
//! evicted. `stop` ends consumption at once, `close` lets the worker drain
//! what is already queued first.

use crate::record::Record;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Notify;

/// Result of [`Backlog::push`].
#[derive(Debug, Clone, PartialEq)]
pub enum PushOutcome {
    /// Queued with room to spare.
    Queued,
    /// Queued; the oldest record was evicted to make room.
    Evicted(Record),
    /// Not queued: the backlog is stopped or closed.
    Rejected(Record),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Open,
    Closing,
    Stopped,
}

struct Inner {
    queue: VecDeque<Record>,
    mode: Mode,
}

/// Bounded FIFO of records awaiting upload.
pub struct Backlog {
    inner: Mutex<Inner>,
    capacity: usize,
    available: Notify,
    stop_signal: Notify,
    evicted: AtomicU64,
}

impl Backlog {
    /// Create a backlog holding at most `capacity` records (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Mutex::new(Inner {
                queue: VecDeque::with_capacity(capacity.min(1024)),
                mode: Mode::Open,
            }),
            capacity,
            available: Notify::new(),
            stop_signal: Notify::new(),
            evicted: AtomicU64::new(0),
        }
    }

    /// Enqueue a record without blocking.
    pub fn push(&self, record: Record) -> PushOutcome {
        let outcome = {
            let mut inner = self.inner.lock();
            if inner.mode != Mode::Open {
                return PushOutcome::Rejected(record);
            }
            let evicted = if inner.queue.len() >= self.capacity {
                inner.queue.pop_front()
            } else {
                None
            };
            inner.queue.push_back(record);
            match evicted {
                Some(old) => {
                    self.evicted.fetch_add(1, Ordering::Relaxed);
                    PushOutcome::Evicted(old)
                }
                None => PushOutcome::Queued,
            }
        };
        self.available.notify_one();
        outcome
    }

    /// Wait for the next record.
    ///
    /// Returns `None` once stopped, or once closed and drained.
    pub async fn pop(&self) -> Option<Record> {
        loop {
            let notified = self.available.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut inner = self.inner.lock();
                if inner.mode == Mode::Stopped {
                    return None;
                }
                if let Some(record) = inner.queue.pop_front() {
                    return Some(record);
                }
                if inner.mode == Mode::Closing {
                    return None;
                }
            }

            notified.await;
        }
    }

    /// Stop consumption now. Queued records are discarded; returns how many.
    pub fn stop(&self) -> usize {
        let dropped = {
            let mut inner = self.inner.lock();
            inner.mode = Mode::Stopped;
            let dropped = inner.queue.len();
            inner.queue.clear();
            dropped
        };
        self.available.notify_waiters();
        self.stop_signal.notify_waiters();
        dropped
    }

    /// Refuse new records and let the consumer drain the rest.
    pub fn close(&self) {
        {
            let mut inner = self.inner.lock();
            if inner.mode == Mode::Open {
                inner.mode = Mode::Closing;
            }
        }
        self.available.notify_waiters();
    }

    /// Check if [`stop`](Self::stop) was called.
    pub fn is_stopped(&self) -> bool {
        self.inner.lock().mode == Mode::Stopped
    }

    /// Check if new records are refused.
    pub fn is_closed(&self) -> bool {
        self.inner.lock().mode != Mode::Open
    }

    /// Resolve once [`stop`](Self::stop) has been called.
    pub async fn stopped(&self) {
        loop {
            let notified = self.stop_signal.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.is_stopped() {
                return;
            }
            notified.await;
        }
    }

    /// Number of queued records.
    pub fn len(&self) -> usize {
        self.inner.lock().queue.len()
    }

    /// Check if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().queue.is_empty()
    }

    /// Maximum number of queued records.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records evicted by overflow so far.
    pub fn evicted(&self) -> u64 {
        self.evicted.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for Backlog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("Backlog")
            .field("len", &inner.queue.len())
            .field("capacity", &self.capacity)
            .field("mode", &inner.mode)
            .field("evicted", &self.evicted())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osem_units::UnitSystem;
    use std::sync::Arc;
    use std::time::Duration;

    fn rec(t: i64) -> Record {
        Record::new(t, UnitSystem::Metric)
    }

    #[tokio::test]
    async fn test_backlog_fifo_order() {
        let backlog = Backlog::new(10);
        backlog.push(rec(1));
        backlog.push(rec(2));
        backlog.push(rec(3));

        assert_eq!(backlog.pop().await.map(|r| r.date_time), Some(1));
        assert_eq!(backlog.pop().await.map(|r| r.date_time), Some(2));
        assert_eq!(backlog.pop().await.map(|r| r.date_time), Some(3));
        assert!(backlog.is_empty());
    }

    #[test]
    fn test_backlog_evicts_oldest_when_full() {
        let backlog = Backlog::new(2);
        assert_eq!(backlog.push(rec(1)), PushOutcome::Queued);
        assert_eq!(backlog.push(rec(2)), PushOutcome::Queued);

        match backlog.push(rec(3)) {
            PushOutcome::Evicted(old) => assert_eq!(old.date_time, 1),
            other => panic!("expected eviction, got {:?}", other),
        }
        assert_eq!(backlog.len(), 2);
        assert_eq!(backlog.evicted(), 1);
    }

    #[test]
    fn test_backlog_zero_capacity_is_clamped() {
        let backlog = Backlog::new(0);
        assert_eq!(backlog.capacity(), 1);
    }

    #[tokio::test]
    async fn test_backlog_pop_waits_for_push() {
        let backlog = Arc::new(Backlog::new(4));
        let consumer = {
            let backlog = Arc::clone(&backlog);
            tokio::spawn(async move { backlog.pop().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        backlog.push(rec(42));

        let got = tokio::time::timeout(Duration::from_secs(1), consumer)
            .await
            .expect("pop timed out")
            .expect("join");
        assert_eq!(got.map(|r| r.date_time), Some(42));
    }

    #[tokio::test]
    async fn test_backlog_stop_wakes_waiting_consumer() {
        let backlog = Arc::new(Backlog::new(4));
        let consumer = {
            let backlog = Arc::clone(&backlog);
            tokio::spawn(async move { backlog.pop().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        backlog.stop();

        let got = tokio::time::timeout(Duration::from_secs(1), consumer)
            .await
            .expect("pop timed out")
            .expect("join");
        assert!(got.is_none());
    }

    #[tokio::test]
    async fn test_backlog_stop_discards_queued_records() {
        let backlog = Backlog::new(4);
        backlog.push(rec(1));
        backlog.push(rec(2));

        assert_eq!(backlog.stop(), 2);
        assert!(backlog.pop().await.is_none());
        assert!(matches!(backlog.push(rec(3)), PushOutcome::Rejected(_)));
    }

    #[tokio::test]
    async fn test_backlog_close_drains_then_ends() {
        let backlog = Backlog::new(4);
        backlog.push(rec(1));
        backlog.push(rec(2));
        backlog.close();

        assert!(matches!(backlog.push(rec(3)), PushOutcome::Rejected(_)));
        assert_eq!(backlog.pop().await.map(|r| r.date_time), Some(1));
        assert_eq!(backlog.pop().await.map(|r| r.date_time), Some(2));
        assert!(backlog.pop().await.is_none());
    }

    #[tokio::test]
    async fn test_backlog_stopped_resolves() {
        let backlog = Arc::new(Backlog::new(1));
        let waiter = {
            let backlog = Arc::clone(&backlog);
            tokio::spawn(async move { backlog.stopped().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!backlog.is_stopped());
        backlog.stop();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("stopped() timed out")
            .expect("join");
    }
}
