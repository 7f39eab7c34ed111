use std::{
    fmt,
    ops::Deref,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Result, SortVizError};

/// Whether a sort run currently owns the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunStatus {
    #[default]
    Idle,
    Running,
}

/// Immutable point-in-time copy of a sequence. Cloning is cheap and never
/// copies the values.
#[derive(Clone, PartialEq)]
pub struct Snapshot(Arc<[f64]>);

impl Snapshot {
    pub fn new(values: &[f64]) -> Self {
        Self(Arc::from(values))
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.0.to_vec()
    }
}

impl Deref for Snapshot {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

impl From<Vec<f64>> for Snapshot {
    fn from(values: Vec<f64>) -> Self {
        Self(Arc::from(values))
    }
}

impl From<&[f64]> for Snapshot {
    fn from(values: &[f64]) -> Self {
        Self::new(values)
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

/// What kind of mutation triggered a [`StoreEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Initialized,
    Published,
    Shuffled,
    StatusChanged,
}

/// Notification pushed to every listener after the store changes.
#[derive(Debug, Clone)]
pub struct StoreEvent {
    pub change: Change,
    pub sequence: Snapshot,
    pub status: RunStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn(&StoreEvent) + Send + Sync>;

struct StoreState {
    sequence: Snapshot,
    status: RunStatus,
}

/// Single source of truth for the observable sequence and its run status.
///
/// Every mutation notifies the registered listeners synchronously, in
/// registration order, after the internal lock has been released so that
/// listeners may read back from the store.
pub struct SequenceStore {
    state: Mutex<StoreState>,
    listeners: Mutex<Vec<(ListenerId, Listener)>>,
    next_listener: AtomicU64,
}

impl SequenceStore {
    pub fn new() -> Self {
        Self::with_values(Vec::new())
    }

    pub fn with_values(values: Vec<f64>) -> Self {
        Self {
            state: Mutex::new(StoreState {
                sequence: Snapshot::from(values),
                status: RunStatus::Idle,
            }),
            listeners: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(0),
        }
    }

    pub fn status(&self) -> RunStatus {
        self.lock_state_lossy().status
    }

    pub fn is_running(&self) -> bool {
        self.status() == RunStatus::Running
    }

    /// Returns the currently observable sequence.
    pub fn sequence(&self) -> Snapshot {
        self.lock_state_lossy().sequence.clone()
    }

    /// Registers a listener that is invoked after every change.
    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&StoreEvent) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.lock_listeners().push((id, Arc::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` when the id was unknown.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.lock_listeners();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Replaces the sequence while idle.
    pub fn initialize(&self, values: Vec<f64>) -> Result<()> {
        let event = {
            let mut state = self.lock_state()?;
            if state.status == RunStatus::Running {
                return Err(SortVizError::invalid_state(
                    "cannot initialise the sequence while a sort is running",
                ));
            }
            state.sequence = Snapshot::from(values);
            Self::event(Change::Initialized, &state)
        };
        self.notify(&event);
        Ok(())
    }

    /// Replaces the observable sequence with `snapshot`.
    ///
    /// Only accepted while a run is active; a publish arriving while idle is
    /// dropped and logged. Returns whether the snapshot was accepted.
    pub fn publish(&self, snapshot: Snapshot) -> bool {
        let event = {
            let mut state = match self.lock_state() {
                Ok(state) => state,
                Err(err) => {
                    tracing::warn!(%err, "dropping snapshot");
                    return false;
                }
            };
            if state.status != RunStatus::Running {
                tracing::warn!(len = snapshot.len(), "ignoring publish outside of a run");
                return false;
            }
            state.sequence = snapshot;
            Self::event(Change::Published, &state)
        };
        tracing::trace!(sequence = ?event.sequence, "published snapshot");
        self.notify(&event);
        true
    }

    /// Shuffles the sequence using the thread-local RNG.
    pub fn shuffle(&self) -> Result<()> {
        self.shuffle_with(&mut rand::thread_rng())
    }

    /// Replaces the sequence with a uniformly random permutation of itself
    /// (Fisher-Yates).
    pub fn shuffle_with<R: Rng>(&self, rng: &mut R) -> Result<()> {
        let event = {
            let mut state = self.lock_state()?;
            if state.status == RunStatus::Running {
                return Err(SortVizError::invalid_state(
                    "cannot shuffle while a sort is running",
                ));
            }
            let mut values = state.sequence.to_vec();
            for i in (1..values.len()).rev() {
                let j = rng.gen_range(0..=i);
                values.swap(i, j);
            }
            state.sequence = Snapshot::from(values);
            Self::event(Change::Shuffled, &state)
        };
        self.notify(&event);
        Ok(())
    }

    /// Atomically flips the store from idle to running.
    ///
    /// Returns `None` when a run is already active. Dropping the returned
    /// guard restores [`RunStatus::Idle`], including during unwinding.
    pub fn begin_run(&self) -> Option<RunGuard<'_>> {
        let event = {
            let mut state = self.lock_state_lossy();
            if state.status == RunStatus::Running {
                return None;
            }
            state.status = RunStatus::Running;
            Self::event(Change::StatusChanged, &state)
        };
        self.notify(&event);
        Some(RunGuard { store: self })
    }

    fn finish_run(&self) {
        let event = {
            let mut state = self.lock_state_lossy();
            state.status = RunStatus::Idle;
            Self::event(Change::StatusChanged, &state)
        };
        self.notify(&event);
    }

    fn event(change: Change, state: &StoreState) -> StoreEvent {
        StoreEvent {
            change,
            sequence: state.sequence.clone(),
            status: state.status,
        }
    }

    fn notify(&self, event: &StoreEvent) {
        let listeners: Vec<Listener> = self
            .lock_listeners()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(event);
        }
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, StoreState>> {
        self.state
            .lock()
            .map_err(|_| SortVizError::invalid_state("sequence store has been poisoned"))
    }

    // Status flips must never be skipped, so these recover from poisoning.
    fn lock_state_lossy(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_listeners(&self) -> MutexGuard<'_, Vec<(ListenerId, Listener)>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SequenceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SequenceStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock_state_lossy();
        f.debug_struct("SequenceStore")
            .field("sequence", &state.sequence)
            .field("status", &state.status)
            .field("listeners", &self.lock_listeners().len())
            .finish()
    }
}

/// Scoped ownership of a run. Restores the store to idle when dropped.
#[must_use = "dropping the guard immediately ends the run"]
pub struct RunGuard<'a> {
    store: &'a SequenceStore,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.store.finish_run();
    }
}

impl fmt::Debug for RunGuard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunGuard").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn recorder(store: &SequenceStore) -> Arc<Mutex<Vec<StoreEvent>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        store.subscribe(move |event| sink.lock().unwrap().push(event.clone()));
        events
    }

    fn sorted(values: &[f64]) -> Vec<f64> {
        let mut values = values.to_vec();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap());
        values
    }

    #[test]
    fn publish_outside_a_run_is_ignored() {
        let store = SequenceStore::with_values(vec![3.0, 1.0, 2.0]);
        let events = recorder(&store);

        assert!(!store.publish(Snapshot::new(&[1.0, 2.0, 3.0])));
        assert_eq!(store.sequence().values(), &[3.0, 1.0, 2.0]);
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn publish_during_a_run_notifies_listeners() {
        let store = SequenceStore::with_values(vec![2.0, 1.0]);
        let events = recorder(&store);

        {
            let _run = store.begin_run().expect("store should be idle");
            assert!(store.publish(Snapshot::new(&[1.0, 2.0])));
        }

        let events = events.lock().unwrap();
        let changes: Vec<Change> = events.iter().map(|event| event.change).collect();
        assert_eq!(
            changes,
            vec![Change::StatusChanged, Change::Published, Change::StatusChanged]
        );
        assert_eq!(events[1].sequence.values(), &[1.0, 2.0]);
        assert_eq!(events[1].status, RunStatus::Running);
        assert_eq!(events[2].status, RunStatus::Idle);
    }

    #[test]
    fn begin_run_is_exclusive_until_the_guard_drops() {
        let store = SequenceStore::new();
        let guard = store.begin_run();
        assert!(guard.is_some());
        assert!(store.begin_run().is_none());
        assert!(store.is_running());

        drop(guard);
        assert_eq!(store.status(), RunStatus::Idle);
        assert!(store.begin_run().is_some());
    }

    #[test]
    fn shuffle_preserves_the_multiset() {
        let values: Vec<f64> = vec![5.0, 1.0, 1.0, 4.0, 2.0, 9.0, 3.0];
        let store = SequenceStore::with_values(values.clone());
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..10 {
            store.shuffle_with(&mut rng).unwrap();
            assert_eq!(sorted(&store.sequence()), sorted(&values));
        }
    }

    #[test]
    fn shuffle_and_initialize_are_rejected_while_running() {
        let store = SequenceStore::with_values(vec![1.0, 2.0, 3.0]);
        let _run = store.begin_run().unwrap();

        assert!(store.shuffle().unwrap_err().is_invalid_state());
        assert!(store.initialize(vec![4.0]).unwrap_err().is_invalid_state());
        assert_eq!(store.sequence().values(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn unsubscribed_listeners_stop_receiving_events() {
        let store = SequenceStore::new();
        let events = Arc::new(Mutex::new(0usize));
        let counter = events.clone();
        let id = store.subscribe(move |_| *counter.lock().unwrap() += 1);

        store.initialize(vec![1.0]).unwrap();
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.initialize(vec![2.0]).unwrap();

        assert_eq!(*events.lock().unwrap(), 1);
    }

    #[test]
    fn listeners_can_read_back_from_the_store() {
        let store = Arc::new(SequenceStore::with_values(vec![1.0, 2.0]));
        let seen = Arc::new(Mutex::new(None));
        let (reader, sink) = (store.clone(), seen.clone());
        store.subscribe(move |_| *sink.lock().unwrap() = Some(reader.status()));

        store.shuffle().unwrap();
        assert_eq!(*seen.lock().unwrap(), Some(RunStatus::Idle));
    }
}
