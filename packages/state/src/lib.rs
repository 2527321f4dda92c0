#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Selection store with observer notification for the linked charts.
//!
//! [`SelectionStore`] holds the single [`SelectionState`] of a dashboard
//! session. It is created by the orchestrator and handed to every view by
//! reference; the only way to change the state is [`SelectionStore::merge`],
//! which applies a whole patch and then notifies each registered
//! [`StateObserver`] synchronously.
//!
//! Everything runs on one thread, so the store uses `Rc`/`RefCell` and never
//! holds a borrow while an observer runs. Observers may merge or unsubscribe
//! from inside their callback.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::rc::{Rc, Weak};

use tourism_map_dashboard_models::{SelectionPatch, SelectionState};

/// Receives the post-merge state after every [`SelectionStore::merge`].
pub trait StateObserver {
    /// Called once per merge with the state after the whole patch applied.
    fn on_state_changed(&self, state: &SelectionState);
}

impl<F> StateObserver for F
where
    F: Fn(&SelectionState),
{
    fn on_state_changed(&self, state: &SelectionState) {
        self(state);
    }
}

/// Identifies one registration with a [`SelectionStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

/// The dashboard's selection state plus its observer set.
pub struct SelectionStore {
    state: RefCell<SelectionState>,
    observers: RefCell<BTreeMap<SubscriptionId, Rc<dyn StateObserver>>>,
    next_id: Cell<u64>,
    /// States produced by merges that ran while a pass was in progress.
    pending: RefCell<VecDeque<SelectionState>>,
    notifying: Cell<bool>,
}

impl std::fmt::Debug for SelectionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionStore")
            .field("state", &self.state.borrow())
            .field("observers", &self.observers.borrow().len())
            .finish_non_exhaustive()
    }
}

impl SelectionStore {
    /// Creates a store holding `initial`.
    #[must_use]
    pub fn new(initial: SelectionState) -> Rc<Self> {
        Rc::new(Self {
            state: RefCell::new(initial),
            observers: RefCell::new(BTreeMap::new()),
            next_id: Cell::new(0),
            pending: RefCell::new(VecDeque::new()),
            notifying: Cell::new(false),
        })
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> SelectionState {
        self.state.borrow().clone()
    }

    /// Applies `patch` and notifies every observer with the new state.
    ///
    /// All patch fields are applied before any observer runs. A merge issued
    /// by an observer during a notification pass is applied right away, but
    /// its own pass is queued until the current one has finished, so every
    /// observer sees each post-merge state exactly once and in merge order.
    pub fn merge(&self, patch: SelectionPatch) {
        log::debug!("Merging selection patch {patch:?}");
        {
            let mut state = self.state.borrow_mut();
            state.apply(patch);
            self.pending.borrow_mut().push_back(state.clone());
        }

        if self.notifying.get() {
            log::trace!("Notification pass in progress, queued follow-up pass");
            return;
        }

        let _guard = NotifyingGuard::enter(&self.notifying);
        loop {
            let Some(state) = self.pending.borrow_mut().pop_front() else {
                break;
            };
            self.notify(&state);
        }
    }

    /// Registers `observer` and returns the handle that keeps it registered.
    pub fn subscribe(self: &Rc<Self>, observer: Rc<dyn StateObserver>) -> Subscription {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.observers.borrow_mut().insert(id, observer);
        log::trace!("Registered state observer {id:?}");

        Subscription {
            store: Rc::downgrade(self),
            id,
        }
    }

    /// Registers a closure as an observer.
    pub fn subscribe_fn(
        self: &Rc<Self>,
        callback: impl Fn(&SelectionState) + 'static,
    ) -> Subscription {
        self.subscribe(Rc::new(callback))
    }

    /// Removes the observer registered under `id`.
    ///
    /// Returns `false` if it was already gone. Safe to call during a
    /// notification pass: an observer removed before its turn is skipped.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.observers.borrow_mut().remove(&id);
        if removed.is_some() {
            log::trace!("Unregistered state observer {id:?}");
        }
        removed.is_some()
    }

    /// Number of registered observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }

    /// Runs one notification pass over a snapshot of the observer ids.
    fn notify(&self, state: &SelectionState) {
        let ids: Vec<SubscriptionId> = self.observers.borrow().keys().copied().collect();
        log::trace!("Notifying {} observers", ids.len());

        for id in ids {
            let observer = self.observers.borrow().get(&id).cloned();
            if let Some(observer) = observer {
                observer.on_state_changed(state);
            }
        }
    }
}

/// Clears the `notifying` flag even if an observer panics.
struct NotifyingGuard<'a>(&'a Cell<bool>);

impl<'a> NotifyingGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for NotifyingGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Keeps an observer registered. Dropping it unsubscribes.
#[must_use = "dropping a Subscription immediately unsubscribes the observer"]
#[derive(Debug)]
pub struct Subscription {
    store: Weak<SelectionStore>,
    id: SubscriptionId,
}

impl Subscription {
    /// The registration id.
    #[must_use]
    pub const fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Unsubscribes now. Equivalent to dropping the handle.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(store) = self.store.upgrade() {
            store.unsubscribe(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tourism_map_dashboard_models::Metric;

    fn recorder() -> (Rc<RefCell<Vec<SelectionState>>>, impl Fn(&SelectionState) + 'static) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, move |state: &SelectionState| {
            sink.borrow_mut().push(state.clone());
        })
    }

    #[test]
    fn successive_merges_accumulate() {
        let store = SelectionStore::new(SelectionState::default());
        store.merge(SelectionPatch::new().year(2022));
        store.merge(SelectionPatch::new().month(5));

        let state = store.snapshot();
        assert_eq!(state.year, Some(2022));
        assert_eq!(state.month, 5);
    }

    #[test]
    fn every_observer_sees_each_merge_once() {
        let store = SelectionStore::new(SelectionState::default());
        let (first, first_cb) = recorder();
        let (second, second_cb) = recorder();
        let _a = store.subscribe_fn(first_cb);
        let _b = store.subscribe_fn(second_cb);

        store.merge(SelectionPatch::new().year(2023).month(6));
        store.merge(SelectionPatch::new().metric(Metric::Nights));

        for seen in [&first, &second] {
            let seen = seen.borrow();
            assert_eq!(seen.len(), 2);
            assert_eq!(seen[0].year, Some(2023));
            assert_eq!(seen[0].month, 6);
            assert_eq!(seen[0].metric, Metric::Arrivals);
            assert_eq!(seen[1].metric, Metric::Nights);
        }
    }

    #[test]
    fn observers_never_see_partial_patches() {
        let store = SelectionStore::new(SelectionState::default());
        let (seen, cb) = recorder();
        let _sub = store.subscribe_fn(cb);

        store.merge(
            SelectionPatch::new()
                .year(2021)
                .month(8)
                .metric(Metric::Nights)
                .region("istarska"),
        );

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].year, Some(2021));
        assert_eq!(seen[0].month, 8);
        assert_eq!(seen[0].metric, Metric::Nights);
        assert_eq!(seen[0].region(), Some("istarska"));
    }

    #[test]
    fn dropped_subscription_receives_nothing() {
        let store = SelectionStore::new(SelectionState::default());
        let (seen, cb) = recorder();
        let sub = store.subscribe_fn(cb);

        store.merge(SelectionPatch::new().month(2));
        sub.unsubscribe();
        store.merge(SelectionPatch::new().month(3));

        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(store.observer_count(), 0);
    }

    #[test]
    fn unsubscribing_a_later_observer_mid_pass_skips_only_it() {
        let store = SelectionStore::new(SelectionState::default());
        let calls = Rc::new(RefCell::new(Vec::<&'static str>::new()));
        let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let first_calls = Rc::clone(&calls);
        let first_victim = Rc::clone(&victim);
        let _first = store.subscribe_fn(move |_| {
            first_calls.borrow_mut().push("first");
            first_victim.borrow_mut().take();
        });

        let second_calls = Rc::clone(&calls);
        *victim.borrow_mut() = Some(store.subscribe_fn(move |_| {
            second_calls.borrow_mut().push("second");
        }));

        let third_calls = Rc::clone(&calls);
        let _third = store.subscribe_fn(move |_| {
            third_calls.borrow_mut().push("third");
        });

        store.merge(SelectionPatch::new().month(4));
        assert_eq!(*calls.borrow(), vec!["first", "third"]);

        store.merge(SelectionPatch::new().month(5));
        assert_eq!(*calls.borrow(), vec!["first", "third", "first", "third"]);
    }

    #[test]
    fn observer_may_unsubscribe_itself() {
        let store = SelectionStore::new(SelectionState::default());
        let count = Rc::new(Cell::new(0));
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let cb_count = Rc::clone(&count);
        let cb_slot = Rc::clone(&slot);
        *slot.borrow_mut() = Some(store.subscribe_fn(move |_| {
            cb_count.set(cb_count.get() + 1);
            cb_slot.borrow_mut().take();
        }));

        store.merge(SelectionPatch::new().month(7));
        store.merge(SelectionPatch::new().month(8));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn reentrant_merges_are_delivered_in_order() {
        let store = SelectionStore::new(SelectionState::default());

        // Clamps any month above 6 back to 6 by merging from inside the pass.
        let weak = Rc::downgrade(&store);
        let _clamp = store.subscribe_fn(move |state| {
            if state.month > 6
                && let Some(store) = weak.upgrade()
            {
                store.merge(SelectionPatch::new().month(6));
            }
        });
        let (seen, cb) = recorder();
        let _log = store.subscribe_fn(cb);

        store.merge(SelectionPatch::new().month(9));

        let months: Vec<u8> = seen.borrow().iter().map(|s| s.month).collect();
        assert_eq!(months, vec![9, 6]);
        assert_eq!(store.snapshot().month, 6);
    }

    #[test]
    fn subscription_outliving_store_is_harmless() {
        let store = SelectionStore::new(SelectionState::default());
        let sub = store.subscribe_fn(|_| {});
        drop(store);
        drop(sub);
    }
}
