//! Bounded set of event ids already handled, evicting the oldest mark first.
//!
//! The event source may redeliver an event it believes was not acknowledged.
//! This cache is a best-effort guard against acting twice: once more than
//! `capacity` distinct ids have been marked, the oldest are forgotten and a
//! late redelivery would be processed again.

use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use tokio::time::Instant;

/// Thread-safe deduplication cache.
///
/// This is trivially cloneable; clones share the same underlying set.
#[derive(Clone)]
pub struct DedupCache {
    inner: Arc<Mutex<DedupState>>,
}

struct DedupEntry {
    tick: u64,
    marked_at: Instant,
}

struct DedupState {
    capacity: usize,
    ttl: Option<Duration>,
    next_tick: u64,
    entries: HashMap<String, DedupEntry>,
    /// Insertion order: lowest tick was marked longest ago.
    order: BTreeMap<u64, String>,
}

impl DedupCache {
    /// Creates a cache holding at most `capacity` ids (minimum 1), optionally forgetting ids older than `ttl`.
    pub fn new(capacity: usize, ttl: Option<Duration>) -> Self {
        let state = DedupState {
            capacity: capacity.max(1),
            ttl,
            next_tick: 0,
            entries: HashMap::new(),
            order: BTreeMap::new(),
        };

        Self { inner: Arc::new(Mutex::new(state)) }
    }

    /// Returns `true` if `event_id` was already marked; otherwise marks it and returns `false`.
    ///
    /// The check and the mark happen under one lock, so two concurrent callers
    /// can never both see the same id as new.
    pub fn seen_or_mark(&self, event_id: &str) -> bool {
        let mut state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        state.seen_or_mark(event_id, Instant::now())
    }

    /// Number of ids currently remembered.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).capacity
    }
}

impl DedupState {
    fn seen_or_mark(&mut self, event_id: &str, now: Instant) -> bool {
        if let Some(entry) = self.entries.get(event_id) {
            let expired = self.ttl.is_some_and(|ttl| now.duration_since(entry.marked_at) >= ttl);

            // A hit leaves the entry's position untouched.
            if !expired {
                return true;
            }

            let stale_tick = entry.tick;
            self.order.remove(&stale_tick);
            self.entries.remove(event_id);
        }

        let tick = self.next_tick;
        self.next_tick += 1;

        while self.entries.len() >= self.capacity {
            let Some((_, oldest)) = self.order.pop_first() else {
                break;
            };
            self.entries.remove(&oldest);
        }

        self.entries.insert(event_id.to_string(), DedupEntry { tick, marked_at: now });
        self.order.insert(tick, event_id.to_string());

        false
    }
}
