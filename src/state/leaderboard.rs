use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

/// Number of ranked entries kept when no size is configured.
pub const DEFAULT_CAPACITY: usize = 10;

/// Largest board the config layer accepts.
pub const MAX_CAPACITY: usize = 10_000;

/// A single accepted score.
///
/// Entries are built only by [`Leaderboard::submit`] and never change afterwards;
/// the fields are read through accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    name: String,
    score: u64,
    created_at: DateTime<Utc>,
}

impl Entry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Moment the store accepted this entry.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[derive(Debug, Default)]
struct Inner {
    /// Sorted by score, highest first; equal scores keep submission order.
    entries: Vec<Entry>,
    last_stamp: Option<DateTime<Utc>>,
}

/// Bounded, ranked score store.
///
/// Holds at most `capacity` entries. A single `RwLock` guards the whole
/// sequence: `snapshot` callers share it, `submit` takes it exclusively.
#[derive(Debug)]
pub struct Leaderboard {
    inner: RwLock<Inner>,
    capacity: usize,
}

/// Shared store handle passed to the HTTP layer.
pub type SharedLeaderboard = Arc<Leaderboard>;

/// Create a new, empty shared leaderboard.
pub fn new_leaderboard(capacity: usize) -> SharedLeaderboard {
    Arc::new(Leaderboard::with_capacity(capacity))
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// `capacity` must be at least 1; a zero-sized board drops every submission.
    /// Storage grows on demand, so an oversized `capacity` reserves nothing up front.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: RwLock::new(Inner {
                entries: Vec::with_capacity(capacity.min(DEFAULT_CAPACITY) + 1),
                last_stamp: None,
            }),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Insert a new score at its rank and evict whatever falls past `capacity`.
    ///
    /// On equal scores the earlier submission ranks higher, so a newcomer that
    /// only ties the last place of a full board is evicted straight away.
    /// Returns the entry as it was stamped.
    pub fn submit(&self, name: impl Into<String>, score: u64) -> Entry {
        let mut inner = self.write();

        // Wall clock may step back; stamps must not.
        let now = Utc::now();
        let created_at = match inner.last_stamp {
            Some(last) if last > now => last,
            _ => now,
        };
        inner.last_stamp = Some(created_at);

        let entry = Entry {
            name: name.into(),
            score,
            created_at,
        };

        let rank = inner.entries.partition_point(|e| e.score >= score);
        inner.entries.insert(rank, entry.clone());
        inner.entries.truncate(self.capacity);

        entry
    }

    /// Owned copy of the current ranking, highest score first.
    pub fn snapshot(&self) -> Vec<Entry> {
        self.read().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panic while holding the lock cannot leave the vector half-sorted:
    // every mutation is a single insert followed by a truncate.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}
