use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, Weak},
    time::Duration,
};

use tokio::sync::broadcast;

use crate::{
    settings::ToastConfig,
    toasts::{
        events::{CloseReason, ToastEvent},
        handle::ToastHandle,
        types::{Toast, ToastOptions},
    },
};

/// Callback registered through [`ToastStore::subscribe`]. Receives the full
/// ordered snapshot after every mutation.
pub type Observer = dyn Fn(&[Toast]) + Send + Sync;

/// The set of currently visible toasts for this process.
///
/// One store is constructed at startup and shared by `Arc` with everything
/// that publishes or renders toasts. Mutations are serialized by an interior
/// lock; observer fan-out runs after the lock is released, so observers are
/// free to call back into the store.
pub struct ToastStore {
    limit: usize,
    timeout: Duration,
    state: Mutex<StoreState>,
    events_tx: broadcast::Sender<ToastEvent>,
    _events_rx: broadcast::Receiver<ToastEvent>,
}

struct StoreState {
    toasts: Vec<Toast>,
    next_id: u64,
    observers: BTreeMap<u64, Arc<Observer>>,
    next_subscription: u64,
}

impl StoreState {
    fn observer_list(&self) -> Vec<Arc<Observer>> {
        self.observers.values().cloned().collect()
    }
}

impl ToastStore {
    pub fn new(config: ToastConfig) -> Self {
        let (events_tx, events_rx) = broadcast::channel(32);

        Self {
            limit: config.max_toasts,
            timeout: Duration::from_millis(config.timeout_ms),
            state: Mutex::new(StoreState {
                toasts: Vec::new(),
                next_id: 1,
                observers: BTreeMap::new(),
                next_subscription: 1,
            }),
            events_tx,
            _events_rx: events_rx,
        }
    }

    /// Publishes a new toast at the front of the sequence and returns a
    /// handle for updating or dismissing it later.
    ///
    /// If the cap is already full, the oldest toast is silently dropped; it
    /// gets no closed event and simply stops appearing in snapshots. Unless
    /// auto-dismiss is disabled, an expiry timer is scheduled on the tokio
    /// runtime, anchored at publish time; later updates to the toast do not
    /// extend it.
    pub fn publish(self: &Arc<Self>, options: ToastOptions) -> ToastHandle {
        let (toast, snapshot, observers) = {
            let mut state = self.state.lock().unwrap();

            let id = state.next_id;
            state.next_id = advance_id(id);

            let toast = Toast::from_options(id, options);
            state.toasts.insert(0, toast.clone());
            state.toasts.truncate(self.limit);

            (toast, state.toasts.clone(), state.observer_list())
        };

        log::debug!("published toast {}", toast.id);

        let _ = self.events_tx.send(ToastEvent::Published(toast.clone()));
        notify(&observers, &snapshot);

        if !self.timeout.is_zero() {
            // anchor the deadline now so a late first poll of the task can't
            // stretch the toast's lifetime
            let deadline = tokio::time::Instant::now() + self.timeout;
            let store = Arc::downgrade(self);
            let id = toast.id;

            tokio::spawn(async move {
                tokio::time::sleep_until(deadline).await;

                // the toast may be long gone by now; close() is a no-op then
                if let Some(store) = store.upgrade() {
                    store.close(id, CloseReason::Expired);
                }
            });
        }

        ToastHandle::new(toast.id, Arc::downgrade(self))
    }

    /// Merges new content into a live toast, keeping its id and position.
    /// If the toast was already removed, the update is silently dropped.
    pub fn update(&self, id: u64, options: ToastOptions) {
        let mut state = self.state.lock().unwrap();

        let Some(toast) = state.toasts.iter_mut().find(|t| t.id == id) else {
            log::debug!("update for absent toast {id} dropped");
            return;
        };

        toast.merge(options);
        let toast = toast.clone();
        let snapshot = state.toasts.clone();
        let observers = state.observer_list();
        drop(state);

        let _ = self.events_tx.send(ToastEvent::Updated(toast));
        notify(&observers, &snapshot);
    }

    /// Removes the toast and re-notifies observers. Dismissing an id that is
    /// no longer live is a no-op, so calling this twice is harmless.
    pub fn dismiss(&self, id: u64) {
        self.close(id, CloseReason::Dismissed);
    }

    /// Deletes the toast unconditionally; absent ids are a no-op.
    pub fn remove(&self, id: u64) {
        self.close(id, CloseReason::Removed);
    }

    /// Removes every live toast at once. Observers see a single empty
    /// snapshot; each toast still gets its own closed event.
    pub fn dismiss_all(&self) {
        let mut state = self.state.lock().unwrap();
        if state.toasts.is_empty() {
            return;
        }

        let closed: Vec<u64> = state.toasts.iter().map(|t| t.id).collect();
        state.toasts.clear();
        let snapshot = state.toasts.clone();
        let observers = state.observer_list();
        drop(state);

        log::debug!("dismissed all {} toast(s)", closed.len());

        for id in closed {
            let _ = self.events_tx.send(ToastEvent::Closed {
                id,
                reason: CloseReason::Dismissed,
            });
        }
        notify(&observers, &snapshot);
    }

    /// Registers an observer called with the full snapshot after every
    /// mutation. The observer is not called at registration time; read
    /// [`snapshot`](Self::snapshot) for the initial state.
    ///
    /// Delivery happens to follow registration order, but callers must not
    /// rely on that.
    pub fn subscribe(
        self: &Arc<Self>,
        observer: impl Fn(&[Toast]) + Send + Sync + 'static,
    ) -> Subscription {
        let mut state = self.state.lock().unwrap();
        let id = state.next_subscription;
        state.next_subscription += 1;
        state.observers.insert(id, Arc::new(observer));

        Subscription {
            id,
            store: Arc::downgrade(self),
        }
    }

    /// Returns a receiver for the mutation event stream.
    pub fn events(&self) -> broadcast::Receiver<ToastEvent> {
        self.events_tx.subscribe()
    }

    /// Clone of the current ordered state, newest first.
    pub fn snapshot(&self) -> Vec<Toast> {
        self.state.lock().unwrap().toasts.clone()
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().unwrap().toasts.is_empty()
    }

    fn close(&self, id: u64, reason: CloseReason) {
        let mut state = self.state.lock().unwrap();

        let before = state.toasts.len();
        state.toasts.retain(|t| t.id != id);
        if state.toasts.len() == before {
            // already gone; expiry and dismissal race here and both are fine
            return;
        }

        let snapshot = state.toasts.clone();
        let observers = state.observer_list();
        drop(state);

        log::debug!("closed toast {id} ({reason:?})");

        let _ = self.events_tx.send(ToastEvent::Closed { id, reason });
        notify(&observers, &snapshot);
    }

    fn unsubscribe(&self, subscription: u64) {
        self.state.lock().unwrap().observers.remove(&subscription);
    }
}

impl Default for ToastStore {
    fn default() -> Self {
        Self::new(ToastConfig::default())
    }
}

/// Handle for a registered observer. Dropping it without calling
/// [`unsubscribe`](Self::unsubscribe) leaves the observer registered for the
/// life of the store.
#[derive(Debug)]
#[must_use = "dropping a subscription does not deregister the observer"]
pub struct Subscription {
    id: u64,
    store: Weak<ToastStore>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        if let Some(store) = self.store.upgrade() {
            store.unsubscribe(self.id);
        }
    }
}

fn notify(observers: &[Arc<Observer>], snapshot: &[Toast]) {
    for observer in observers {
        observer(snapshot);
    }
}

/// Ids wrap to 1, never 0, so an id can always be told apart from "unset".
fn advance_id(id: u64) -> u64 {
    id.checked_add(1).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toasts::types::ToastVariant;

    // auto-dismiss is off so none of these need a runtime
    fn test_store() -> Arc<ToastStore> {
        Arc::new(ToastStore::new(ToastConfig {
            max_toasts: 5,
            timeout_ms: 0,
        }))
    }

    fn titles(toasts: &[Toast]) -> Vec<&str> {
        toasts.iter().filter_map(|t| t.title.as_deref()).collect()
    }

    #[test]
    fn publish_prepends_newest_first() {
        let store = test_store();
        store.publish(ToastOptions::new().title("first"));
        store.publish(ToastOptions::new().title("second"));

        let snapshot = store.snapshot();
        assert_eq!(titles(&snapshot), vec!["second", "first"]);
    }

    #[test]
    fn cap_evicts_oldest() {
        let store = test_store();
        for n in 1..=6 {
            store.publish(ToastOptions::new().title(n.to_string()));
        }

        let snapshot = store.snapshot();
        assert_eq!(titles(&snapshot), vec!["6", "5", "4", "3", "2"]);
    }

    #[test]
    fn ids_are_unique_and_monotonic() {
        let store = test_store();
        let first = store.publish(ToastOptions::new().title("a"));
        let second = store.publish(ToastOptions::new().title("b"));

        assert_ne!(first.id(), second.id());
        assert!(second.id() > first.id());
    }

    #[test]
    fn id_counter_wraps_past_max_to_one() {
        assert_eq!(advance_id(1), 2);
        assert_eq!(advance_id(u64::MAX - 1), u64::MAX);
        assert_eq!(advance_id(u64::MAX), 1);
    }

    #[test]
    fn dismiss_removes_and_is_idempotent() {
        let store = test_store();
        let handle = store.publish(ToastOptions::new().title("bye"));

        store.dismiss(handle.id());
        assert!(store.is_empty());

        // second dismissal of the same id must be a silent no-op
        store.dismiss(handle.id());
        assert!(store.is_empty());
    }

    #[test]
    fn remove_unknown_id_is_noop() {
        let store = test_store();
        store.publish(ToastOptions::new().title("keep"));

        store.remove(9999);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_merges_content_in_place() {
        let store = test_store();
        let target = store.publish(ToastOptions::new().title("old").description("stale"));
        store.publish(ToastOptions::new().title("newer"));

        target.update(ToastOptions::new().description("fresh"));

        let snapshot = store.snapshot();
        // position and id unchanged, only the given field replaced
        assert_eq!(snapshot[1].id, target.id());
        assert_eq!(snapshot[1].title.as_deref(), Some("old"));
        assert_eq!(snapshot[1].description.as_deref(), Some("fresh"));
    }

    #[test]
    fn update_after_removal_is_dropped() {
        let store = test_store();
        let handle = store.publish(ToastOptions::new().title("gone"));
        handle.dismiss();

        handle.update(ToastOptions::new().title("zombie"));
        assert!(store.is_empty());
    }

    #[test]
    fn update_can_change_variant() {
        let store = test_store();
        let handle = store.publish(ToastOptions::new().title("soft"));
        handle.update(ToastOptions::new().variant(ToastVariant::Destructive));

        assert_eq!(store.snapshot()[0].variant, ToastVariant::Destructive);
    }

    #[test]
    fn observers_see_every_mutation_but_not_registration() {
        let store = test_store();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let subscription = store.subscribe({
            let seen = seen.clone();
            move |toasts| seen.lock().unwrap().push(toasts.to_vec())
        });

        // nothing delivered at registration time
        assert!(seen.lock().unwrap().is_empty());

        let handle = store.publish(ToastOptions::new().title("one"));
        handle.dismiss();

        let calls = seen.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(titles(&calls[0]), vec!["one"]);
        assert!(calls[1].is_empty());
        drop(calls);

        subscription.unsubscribe();
    }

    #[test]
    fn unsubscribed_observer_receives_nothing() {
        let store = test_store();
        let seen = Arc::new(Mutex::new(0usize));

        let subscription = store.subscribe({
            let seen = seen.clone();
            move |_| *seen.lock().unwrap() += 1
        });
        subscription.unsubscribe();

        store.publish(ToastOptions::new().title("unheard"));
        assert_eq!(*seen.lock().unwrap(), 0);
    }

    #[test]
    fn both_live_subscribers_receive_a_publish() {
        let store = test_store();
        let first = Arc::new(Mutex::new(0usize));
        let second = Arc::new(Mutex::new(0usize));

        let keep_first = store.subscribe({
            let first = first.clone();
            move |_| *first.lock().unwrap() += 1
        });
        let keep_second = store.subscribe({
            let second = second.clone();
            move |_| *second.lock().unwrap() += 1
        });

        store.publish(ToastOptions::new().title("fanout"));

        assert_eq!(*first.lock().unwrap(), 1);
        assert_eq!(*second.lock().unwrap(), 1);

        keep_first.unsubscribe();
        keep_second.unsubscribe();
    }

    #[test]
    fn dismiss_all_clears_everything() {
        let store = test_store();
        for n in 0..3 {
            store.publish(ToastOptions::new().title(n.to_string()));
        }

        store.dismiss_all();
        assert!(store.is_empty());

        // and again on an empty store
        store.dismiss_all();
        assert!(store.is_empty());
    }

    #[test]
    fn handle_outliving_store_degrades_to_noop() {
        let store = test_store();
        let handle = store.publish(ToastOptions::new().title("orphan"));
        drop(store);

        // nothing to do but also nothing to panic about
        handle.dismiss();
        handle.update(ToastOptions::new().title("still orphaned"));
    }
}
