use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use shared::{domain::Customers, error::ApiError};
use tokio::{runtime::Handle, sync::watch, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{api::CustomersApi, error::FetchError};

/// What the list view should show right now.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchState {
    #[default]
    Loading,
    Error(ApiError),
    Ready(Arc<Customers>),
}

/// Fetch state plus the last collection that loaded successfully.
///
/// `last_good` survives failed fetches and is what a refresh falls back to
/// while it is in flight, so an existing table never blanks out during a
/// revalidation.
#[derive(Debug, Clone, Default)]
pub struct ListSnapshot {
    pub state: FetchState,
    pub last_good: Option<Arc<Customers>>,
    pub in_flight: usize,
    /// Fetches started since the store was created.
    pub fetches_started: u64,
}

impl ListSnapshot {
    pub fn is_loading(&self) -> bool {
        matches!(self.state, FetchState::Loading)
    }

    pub fn is_validating(&self) -> bool {
        self.in_flight > 0
    }

    pub fn customers(&self) -> Option<&Arc<Customers>> {
        match &self.state {
            FetchState::Ready(customers) => Some(customers),
            FetchState::Loading | FetchState::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ApiError> {
        match &self.state {
            FetchState::Error(err) => Some(err),
            FetchState::Loading | FetchState::Ready(_) => None,
        }
    }

    fn begin(&mut self) {
        self.in_flight += 1;
        self.fetches_started += 1;
        self.state = match &self.last_good {
            Some(customers) => FetchState::Ready(Arc::clone(customers)),
            None => FetchState::Loading,
        };
    }

    fn abandon(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    fn resolve(&mut self, outcome: Result<Arc<Customers>, ApiError>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match outcome {
            Ok(customers) => {
                self.last_good = Some(Arc::clone(&customers));
                self.state = FetchState::Ready(customers);
            }
            Err(err) => self.state = FetchState::Error(err),
        }
    }
}

struct ListStoreInner {
    api: Arc<dyn CustomersApi>,
    runtime: Handle,
    state: watch::Sender<ListSnapshot>,
    next_fetch_id: AtomicU64,
}

/// One started fetch. Dropped unsettled (aborted task, dropped `refresh`
/// future), it still gives back its `in_flight` slot.
struct FetchTicket {
    inner: Arc<ListStoreInner>,
    fetch_id: u64,
    settled: bool,
}

impl FetchTicket {
    fn settle(mut self, outcome: Result<Arc<Customers>, ApiError>) {
        self.settled = true;
        self.inner
            .state
            .send_modify(|snapshot| snapshot.resolve(outcome));
    }
}

impl Drop for FetchTicket {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        debug!(fetch_id = self.fetch_id, "customers fetch abandoned");
        self.inner.state.send_modify(ListSnapshot::abandon);
    }
}

/// Cache of the last customers fetch, refreshed on demand.
///
/// Overlapping fetches are never cancelled; each applies its result when it
/// resolves, so the response that arrives last is the one displayed.
#[derive(Clone)]
pub struct ListStore {
    inner: Arc<ListStoreInner>,
}

impl ListStore {
    pub fn new(api: Arc<dyn CustomersApi>, runtime: Handle) -> Self {
        let (state, _) = watch::channel(ListSnapshot::default());
        Self {
            inner: Arc::new(ListStoreInner {
                api,
                runtime,
                state,
                next_fetch_id: AtomicU64::new(1),
            }),
        }
    }

    /// Creates the store and starts the initial fetch.
    pub fn mount(api: Arc<dyn CustomersApi>, runtime: Handle) -> Self {
        let store = Self::new(api, runtime);
        let _ = store.revalidate();
        store
    }

    pub fn snapshot(&self) -> ListSnapshot {
        self.inner.state.borrow().clone()
    }

    pub fn fetch_state(&self) -> FetchState {
        self.inner.state.borrow().state.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListSnapshot> {
        self.inner.state.subscribe()
    }

    /// Schedules a background fetch. Safe to call repeatedly.
    pub fn revalidate(&self) -> JoinHandle<()> {
        let ticket = self.begin_fetch();
        let store = self.clone();
        self.inner.runtime.spawn(async move {
            let _ = store.run_fetch(ticket).await;
        })
    }

    /// Fetches in the caller's task and returns the outcome as well as publishing it.
    pub async fn refresh(&self) -> Result<Arc<Customers>, FetchError> {
        let ticket = self.begin_fetch();
        self.run_fetch(ticket).await
    }

    /// Resolves once no fetch is in flight.
    pub async fn wait_idle(&self) {
        let mut rx = self.subscribe();
        let _ = rx.wait_for(|snapshot| !snapshot.is_validating()).await;
    }

    fn begin_fetch(&self) -> FetchTicket {
        let fetch_id = self.inner.next_fetch_id.fetch_add(1, Ordering::Relaxed);
        self.inner.state.send_modify(ListSnapshot::begin);
        debug!(fetch_id, "customers fetch started");
        FetchTicket {
            inner: Arc::clone(&self.inner),
            fetch_id,
            settled: false,
        }
    }

    async fn run_fetch(&self, ticket: FetchTicket) -> Result<Arc<Customers>, FetchError> {
        let fetch_id = ticket.fetch_id;
        let result = self
            .inner
            .api
            .list_customers()
            .await
            .map(Arc::new)
            .map_err(|err| {
                warn!(fetch_id, error = %err, "customers fetch failed");
                FetchError::from_request(&err)
            });

        if let Ok(customers) = &result {
            info!(fetch_id, count = customers.len(), "customers fetch resolved");
        }

        let published = result
            .as_ref()
            .map(Arc::clone)
            .map_err(|err| err.api_error().clone());
        ticket.settle(published);
        result
    }
}

#[cfg(test)]
#[path = "tests/list_store_tests.rs"]
mod tests;
