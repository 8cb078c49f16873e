//! In-memory remote task store for sync tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, RwLockWriteGuard};
use std::time::Duration;

use crate::sync::{
    domain::{ActionKind, Alias, AliasedTask, NewRemoteTask, RemoteTask, SyncAction, TaskSet},
    ports::{RemoteTaskStore, RemoteTaskStoreError, RemoteTaskStoreResult},
};

/// Thread-safe in-memory remote store.
///
/// Mutations are applied to the store's own todo list, so a later fetch
/// observes them. Every mutation call is logged in arrival order, including
/// calls that fail.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRemoteTaskStore {
    state: Arc<RwLock<InMemoryRemoteState>>,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
}

#[derive(Debug, Default)]
struct InMemoryRemoteState {
    todos: Vec<RemoteTask>,
    calls: Vec<SyncAction>,
    fetches: usize,
    failures: HashMap<(ActionKind, Alias), RemoteTaskStoreError>,
    fetch_failure: Option<RemoteTaskStoreError>,
    latency: Option<Duration>,
}

impl InMemoryRemoteTaskStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `todos`. Duplicate aliases are kept as given
    /// and reported by [`RemoteTaskStore::fetch_tasks`].
    #[must_use]
    pub fn with_todos(todos: impl IntoIterator<Item = RemoteTask>) -> Self {
        let store = Self::new();
        store.replace_todos(todos);
        store
    }

    /// Replaces the stored todos.
    pub fn replace_todos(&self, todos: impl IntoIterator<Item = RemoteTask>) {
        self.write().todos = todos.into_iter().collect();
    }

    /// Makes the next and all later `kind` calls for `alias` fail with
    /// `error`. The call is still logged.
    pub fn fail_on(&self, kind: ActionKind, alias: Alias, error: RemoteTaskStoreError) {
        self.write().failures.insert((kind, alias), error);
    }

    /// Makes subsequent fetches fail with `error`.
    pub fn fail_fetch_with(&self, error: RemoteTaskStoreError) {
        self.write().fetch_failure = Some(error);
    }

    /// Delays every mutation by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        self.write().latency = Some(latency);
    }

    /// Returns the current todos.
    #[must_use]
    pub fn todos(&self) -> Vec<RemoteTask> {
        self.read_state(|state| state.todos.clone())
    }

    /// Returns mutation calls in arrival order.
    #[must_use]
    pub fn calls(&self) -> Vec<SyncAction> {
        self.read_state(|state| state.calls.clone())
    }

    /// Returns how many times the todo list was fetched.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.read_state(|state| state.fetches)
    }

    /// Returns how many mutations are in flight now.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Returns the highest number of mutations observed in flight at once.
    #[must_use]
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn write(&self) -> RwLockWriteGuard<'_, InMemoryRemoteState> {
        self.state
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn read_state<T>(&self, read: impl FnOnce(&InMemoryRemoteState) -> T) -> T {
        let state = self
            .state
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        read(&state)
    }

    async fn mutate(
        &self,
        call: SyncAction,
        apply: impl FnOnce(&mut Vec<RemoteTask>) -> RemoteTaskStoreResult<()>,
    ) -> RemoteTaskStoreResult<()> {
        let guard = InFlightGuard::enter(&self.in_flight);
        self.peak_in_flight.fetch_max(guard.count, Ordering::SeqCst);

        let latency = self.read_state(|state| state.latency);
        if let Some(delay) = latency {
            tokio::time::sleep(delay).await;
        }

        let result = self.state.write().map_err(|err| {
            RemoteTaskStoreError::unavailable(std::io::Error::other(err.to_string()))
        });
        let outcome = result.and_then(|mut state| {
            let key = (call.kind(), call.alias().clone());
            state.calls.push(call);
            if let Some(error) = state.failures.get(&key).cloned() {
                return Err(error);
            }
            apply(&mut state.todos)
        });

        drop(guard);
        outcome
    }
}

/// Counts one mutation as in flight until dropped, including when the
/// mutation future is cancelled mid-call.
struct InFlightGuard<'a> {
    counter: &'a AtomicUsize,
    count: usize,
}

impl<'a> InFlightGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        let count = counter.fetch_add(1, Ordering::SeqCst) + 1;
        Self { counter, count }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

fn position(todos: &[RemoteTask], alias: &Alias) -> RemoteTaskStoreResult<usize> {
    todos
        .iter()
        .position(|todo| todo.alias() == alias)
        .ok_or_else(|| RemoteTaskStoreError::NotFound(alias.clone()))
}

#[async_trait]
impl RemoteTaskStore for InMemoryRemoteTaskStore {
    async fn fetch_tasks(&self) -> RemoteTaskStoreResult<TaskSet<RemoteTask>> {
        let mut state = self.state.write().map_err(|err| {
            RemoteTaskStoreError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        state.fetches += 1;
        if let Some(error) = &state.fetch_failure {
            return Err(error.clone());
        }
        Ok(TaskSet::from_tasks(state.todos.iter().cloned())?)
    }

    async fn create_task(&self, task: &NewRemoteTask) -> RemoteTaskStoreResult<()> {
        self.mutate(SyncAction::Create(task.clone()), |todos| {
            if todos.iter().any(|todo| todo.alias() == task.alias()) {
                return Err(RemoteTaskStoreError::Status {
                    status: 400,
                    body: format!("alias {} is already in use", task.alias()),
                });
            }
            todos.push(task.to_remote());
            Ok(())
        })
        .await
    }

    async fn complete_task(&self, alias: &Alias) -> RemoteTaskStoreResult<()> {
        self.mutate(SyncAction::Complete(alias.clone()), |todos| {
            let index = position(todos, alias)?;
            if let Some(todo) = todos.get_mut(index) {
                *todo = RemoteTask::new(alias.clone(), todo.text().to_owned(), true);
            }
            Ok(())
        })
        .await
    }

    async fn delete_task(&self, alias: &Alias) -> RemoteTaskStoreResult<()> {
        self.mutate(SyncAction::Delete(alias.clone()), |todos| {
            let index = position(todos, alias)?;
            todos.remove(index);
            Ok(())
        })
        .await
    }
}
