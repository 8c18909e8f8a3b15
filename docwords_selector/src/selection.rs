// Copyright 2025 the Docwords Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared selection: which choice each group currently shows.
//!
//! ## Model
//!
//! [`Selection`] is an immutable snapshot mapping group names to choice
//! indices; absent groups read as `0`. Writes never edit a snapshot in place:
//! [`Selection::with`] returns a replacement.
//!
//! [`SelectionStore`] is the page-wide cell every widget shares. It holds the
//! current snapshot, a revision counter, and a list of subscribers. Each
//! [`SelectionStore::write`] installs a full replacement, bumps the revision,
//! and notifies subscribers in subscription order with the new snapshot.
//!
//! ```
//! use docwords_selector::SelectionStore;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let store = SelectionStore::new();
//! let seen = Rc::new(Cell::new(usize::MAX));
//! let sink = seen.clone();
//! let _sub = store.subscribe(move |s| sink.set(s.read("PROJECT")));
//!
//! assert_eq!(store.read("PROJECT"), 0);
//! store.write("PROJECT", 1);
//! assert_eq!(seen.get(), 1);
//! ```
//!
//! The store is single-threaded (`Rc`); writes happen inside UI callbacks and
//! cannot interleave.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

/// An immutable group → index mapping.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Selection {
    entries: Rc<BTreeMap<String, usize>>,
}

impl fmt::Debug for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl Selection {
    /// An empty selection; every group reads as `0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected index for `group`, defaulting to `0`.
    pub fn read(&self, group: &str) -> usize {
        self.get(group).unwrap_or(0)
    }

    /// Selected index for `group` if one was ever written.
    pub fn get(&self, group: &str) -> Option<usize> {
        self.entries.get(group).copied()
    }

    /// A replacement snapshot with `group` set to `index`.
    pub fn with(&self, group: &str, index: usize) -> Self {
        let mut entries = (*self.entries).clone();
        entries.insert(group.into(), index);
        Self {
            entries: Rc::new(entries),
        }
    }

    /// Explicit entries in group order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of explicit entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no group was ever written.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, usize)> for Selection {
    fn from_iter<I: IntoIterator<Item = (S, usize)>>(iter: I) -> Self {
        Self {
            entries: Rc::new(iter.into_iter().map(|(k, v)| (k.into(), v)).collect()),
        }
    }
}

type Callback = Rc<dyn Fn(&Selection)>;

struct Subscriber {
    id: u64,
    // Cleared by the guard's drop, even when the store is borrowed.
    live: Rc<Cell<bool>>,
    callback: Callback,
}

struct StoreInner {
    current: Selection,
    revision: u64,
    next_subscriber: u64,
    subscribers: Vec<Subscriber>,
}

/// The page-wide selection cell. Cloning yields another handle to the same store.
#[derive(Clone)]
pub struct SelectionStore {
    inner: Rc<RefCell<StoreInner>>,
}

impl fmt::Debug for SelectionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("SelectionStore")
            .field("current", &inner.current)
            .field("revision", &inner.revision)
            .field("subscribers", &inner.live_count())
            .finish()
    }
}

impl Default for SelectionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionStore {
    /// A store holding an empty selection.
    pub fn new() -> Self {
        Self::with_selection(Selection::new())
    }

    /// A store starting from `initial`.
    pub fn with_selection(initial: Selection) -> Self {
        Self {
            inner: Rc::new(RefCell::new(StoreInner {
                current: initial,
                revision: 0,
                next_subscriber: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Selection {
        self.inner.borrow().current.clone()
    }

    /// Selected index for `group` in the current snapshot.
    pub fn read(&self, group: &str) -> usize {
        self.inner.borrow().current.read(group)
    }

    /// Number of writes so far.
    pub fn revision(&self) -> u64 {
        self.inner.borrow().revision
    }

    /// Set `group` to `index`, install the replacement, and notify subscribers.
    pub fn write(&self, group: &str, index: usize) -> Selection {
        let next = self.snapshot().with(group, index);
        tracing::debug!(group, index, "selection write");
        self.replace(next.clone());
        next
    }

    /// Install `next` as the current snapshot and notify subscribers.
    ///
    /// A subscription dropped during notification is not called afterwards.
    pub fn replace(&self, next: Selection) {
        let callbacks: Vec<(Rc<Cell<bool>>, Callback)> = {
            let mut inner = self.inner.borrow_mut();
            inner.current = next.clone();
            inner.revision += 1;
            inner.subscribers.retain(|s| s.live.get());
            inner
                .subscribers
                .iter()
                .map(|s| (s.live.clone(), s.callback.clone()))
                .collect()
        };
        // Callbacks may read the store, so no borrow is held here.
        for (live, cb) in callbacks {
            if live.get() {
                cb(&next);
            }
        }
    }

    /// Register `callback` for every future write.
    ///
    /// The callback stays registered until the returned [`Subscription`] is
    /// dropped.
    pub fn subscribe(&self, callback: impl Fn(&Selection) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_subscriber;
        inner.next_subscriber += 1;
        let live = Rc::new(Cell::new(true));
        inner.subscribers.push(Subscriber {
            id,
            live: live.clone(),
            callback: Rc::new(callback),
        });
        Subscription {
            store: Rc::downgrade(&self.inner),
            live,
            id,
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().live_count()
    }

    /// Whether two handles refer to the same store.
    pub fn same_store(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl StoreInner {
    fn live_count(&self) -> usize {
        self.subscribers.iter().filter(|s| s.live.get()).count()
    }
}

/// Guard returned by [`SelectionStore::subscribe`]; unsubscribes on drop.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    store: Weak<RefCell<StoreInner>>,
    live: Rc<Cell<bool>>,
    id: u64,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("live", &(self.store.strong_count() > 0))
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.live.set(false);
        let Some(store) = self.store.upgrade() else {
            return;
        };
        if let Ok(mut inner) = store.try_borrow_mut() {
            inner.subscribers.retain(|s| s.id != self.id);
        } else {
            tracing::warn!(id = self.id, "selection store busy; subscriber pruned on next write");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn missing_groups_default_to_zero() {
        let s = Selection::new();
        assert_eq!(s.read("PROJECT"), 0);
        assert_eq!(s.get("PROJECT"), None);
        assert!(s.is_empty());
    }

    #[test]
    fn with_is_copy_on_write() {
        let a: Selection = [("PROJECT", 2)].into_iter().collect();
        let b = a.with("PROJECT", 1).with("ORG", 3);
        assert_eq!(a.read("PROJECT"), 2);
        assert_eq!(a.len(), 1);
        assert_eq!(b.iter().collect::<Vec<_>>(), vec![("ORG", 3), ("PROJECT", 1)]);
    }

    #[test]
    fn write_replaces_and_bumps_revision() {
        let store = SelectionStore::new();
        let before = store.snapshot();
        let after = store.write("PROJECT", 1);
        assert_eq!(store.revision(), 1);
        assert_eq!(store.read("PROJECT"), 1);
        assert_eq!(after, store.snapshot());
        assert_eq!(before.read("PROJECT"), 0);
    }

    #[test]
    fn clones_share_one_store() {
        let a = SelectionStore::new();
        let b = a.clone();
        b.write("PROJECT", 4);
        assert_eq!(a.read("PROJECT"), 4);
        assert!(a.same_store(&b));
        assert!(!a.same_store(&SelectionStore::new()));
    }

    #[test]
    fn subscribers_see_each_write_in_order() {
        let store = SelectionStore::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let l1 = log.clone();
        let l2 = log.clone();
        let _s1 = store.subscribe(move |s| l1.borrow_mut().push(("first", s.read("G"))));
        let _s2 = store.subscribe(move |s| l2.borrow_mut().push(("second", s.read("G"))));
        store.write("G", 2);
        store.write("G", 2);
        assert_eq!(
            *log.borrow(),
            vec![("first", 2), ("second", 2), ("first", 2), ("second", 2)]
        );
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let store = SelectionStore::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let sub = store.subscribe(move |_| h.set(h.get() + 1));
        store.write("G", 1);
        assert_eq!(store.subscriber_count(), 1);
        drop(sub);
        store.write("G", 2);
        assert_eq!(hits.get(), 1);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn subscription_dropped_during_borrow_stops_firing() {
        let store = SelectionStore::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let sub = store.subscribe(move |_| h.set(h.get() + 1));
        {
            let _busy = store.inner.borrow();
            drop(sub);
        }
        assert_eq!(store.subscriber_count(), 0);
        store.write("G", 1);
        assert_eq!(hits.get(), 0);
        assert!(store.inner.borrow().subscribers.is_empty());
    }

    #[test]
    fn subscription_dropped_by_earlier_callback_is_skipped() {
        let store = SelectionStore::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let second: Rc<RefCell<Option<Subscription>>> = Rc::default();
        let victim = second.clone();
        let _first = store.subscribe(move |_| drop(victim.borrow_mut().take()));
        *second.borrow_mut() = Some(store.subscribe(move |_| h.set(h.get() + 1)));
        store.write("G", 1);
        assert_eq!(hits.get(), 0);
        assert_eq!(store.subscriber_count(), 1);
    }

    #[test]
    fn callbacks_may_read_the_store() {
        let store = SelectionStore::new();
        let reader = store.clone();
        let seen = Rc::new(Cell::new(0));
        let s = seen.clone();
        let _sub = store.subscribe(move |_| s.set(reader.read("G")));
        store.write("G", 7);
        assert_eq!(seen.get(), 7);
    }
}
