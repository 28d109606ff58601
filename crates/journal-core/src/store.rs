//! Bounded entry buffer with append notifications.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  EntryStore                                                 │
//! │  ├── entries: VecDeque<JournalEntry>                        │
//! │  │   └── Ring of at most MAX_ENTRIES, oldest evicted first  │
//! │  │                                                          │
//! │  └── observers: Vec<(SubscriptionId, Observer)>             │
//! │      └── Called synchronously in registration order         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store is owned by a single thread of control and does no locking.

use std::collections::VecDeque;

use tokio::sync::broadcast;

use crate::entry::JournalEntry;

/// Maximum number of entries kept in memory.
pub const MAX_ENTRIES: usize = 100;

/// Callback invoked for every appended entry.
pub type Observer = Box<dyn FnMut(&JournalEntry)>;

/// Handle returned by [`EntryStore::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// In-memory ring of the most recent journal entries.
///
/// # Example
///
/// ```ignore
/// let mut store = EntryStore::new();
/// let id = store.subscribe(Box::new(|entry| println!("{}", entry.to_line())));
///
/// store.push(entry);
///
/// for entry in store.iter() {
///     render(entry);
/// }
///
/// store.unsubscribe(id);
/// ```
pub struct EntryStore {
    entries: VecDeque<JournalEntry>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl EntryStore {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(MAX_ENTRIES),
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Append an entry, evicting the oldest one if the store is full, then
    /// notify every observer with the stored entry.
    ///
    /// A panicking observer unwinds through this call; observers registered
    /// after it are not notified for this entry.
    pub fn push(&mut self, entry: JournalEntry) -> &JournalEntry {
        if self.entries.len() >= MAX_ENTRIES {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);

        let stored = &self.entries[self.entries.len() - 1];
        for (_, observer) in self.observers.iter_mut() {
            observer(stored);
        }
        stored
    }

    /// Register an observer. Observers run in registration order.
    pub fn subscribe(&mut self, observer: Observer) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, observer));
        id
    }

    /// Subscribe through a tokio broadcast channel.
    ///
    /// Each appended entry is cloned into the channel. If the receiver falls
    /// behind by more than `capacity` entries, the oldest ones are dropped.
    pub fn subscribe_channel(
        &mut self,
        capacity: usize,
    ) -> (SubscriptionId, broadcast::Receiver<JournalEntry>) {
        let (tx, rx) = broadcast::channel(capacity.max(1));
        let id = self.subscribe(Box::new(move |entry| {
            // No receivers left is not an error for the store
            let _ = tx.send(entry.clone());
        }));
        (id, rx)
    }

    /// Remove an observer. Returns false if the id was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Remove every entry. Observers stay registered.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in insertion order (oldest first).
    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, JournalEntry> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&JournalEntry> {
        self.entries.get(index)
    }

    /// Most recently appended entry.
    pub fn latest(&self) -> Option<&JournalEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for EntryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EntryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryStore")
            .field("len", &self.entries.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}
