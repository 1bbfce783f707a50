//! HTTP polling data source.
//!
//! Fetches a JSON collection on a fixed schedule and keeps the latest
//! result in a [`Snapshot`].

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::fetch::HttpFetcher;
use super::{DataSource, Snapshot};
use crate::error::FetchError;

/// State shared between a source and its polling tasks.
struct Shared<T> {
    snapshot: Snapshot<T>,
    /// Requests issued but not yet settled.
    in_flight: usize,
    /// Set on teardown. Nothing mutates `snapshot` once this is true.
    stopped: bool,
}

type SharedState<T> = Arc<Mutex<Shared<T>>>;

/// A data source that polls `GET {base_url}{endpoint}` every `interval`.
///
/// The first poll fires immediately. Ticks keep a fixed schedule and do not
/// wait for the previous request, so a slow backend can have several
/// requests in flight; their results are applied in completion order.
///
/// A failed poll keeps the last good data and records the error message.
/// [`stop`](DataSource::stop) (also run on drop) aborts the schedule and
/// every in-flight request, and guarantees that no result lands afterwards.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use voipwatch::{CallLogEntry, DataSource, HttpFetcher, PollingSource};
///
/// # tokio_test::block_on(async {
/// let fetcher = HttpFetcher::new("http://localhost:8000", Duration::from_secs(5)).unwrap();
/// let mut calls: PollingSource<CallLogEntry> =
///     PollingSource::start(fetcher, "/calls", Duration::from_secs(3));
///
/// let snapshot = calls.snapshot();
/// println!("{} calls, loading: {}", snapshot.data.len(), snapshot.loading);
/// calls.stop();
/// # });
/// ```
pub struct PollingSource<T> {
    fetcher: HttpFetcher,
    endpoint: String,
    interval: Duration,
    description: String,
    shared: SharedState<T>,
    task: Option<JoinHandle<()>>,
}

impl<T> PollingSource<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    /// Start polling `endpoint` every `interval`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(fetcher: HttpFetcher, endpoint: impl Into<String>, interval: Duration) -> Self {
        let endpoint = endpoint.into();
        let description = format!("{} every {}ms", fetcher.url(&endpoint), interval.as_millis());

        let mut source = Self {
            fetcher,
            endpoint,
            interval,
            description,
            shared: new_shared(),
            task: None,
        };
        source.spawn();
        source
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    fn spawn(&mut self) {
        info!(endpoint = %self.endpoint, interval_ms = self.interval.as_millis() as u64, "starting poller");
        self.task = Some(tokio::spawn(run_schedule(
            self.fetcher.clone(),
            self.endpoint.clone(),
            self.interval,
            Arc::clone(&self.shared),
        )));
    }
}

impl<T> PollingSource<T> {
    fn teardown(&mut self) {
        // Flip the flag under the lock first: any settlement racing with us
        // either already applied or will observe `stopped` and bail.
        self.shared.lock().stopped = true;
        if let Some(task) = self.task.take() {
            // Aborting the scheduler drops its JoinSet, which aborts every
            // in-flight request.
            task.abort();
            info!(endpoint = %self.endpoint, "stopped poller");
        }
    }
}

impl<T> DataSource<T> for PollingSource<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    fn snapshot(&self) -> Snapshot<T> {
        self.shared.lock().snapshot.clone()
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn restart(&mut self) {
        self.teardown();
        self.shared = new_shared();
        self.spawn();
    }

    fn stop(&mut self) {
        self.teardown();
    }
}

impl<T> Drop for PollingSource<T> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<T> fmt::Debug for PollingSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollingSource")
            .field("endpoint", &self.endpoint)
            .field("interval", &self.interval)
            .field("running", &self.task.is_some())
            .finish()
    }
}

fn new_shared<T>() -> SharedState<T> {
    Arc::new(Mutex::new(Shared {
        snapshot: Snapshot::loading(),
        in_flight: 0,
        stopped: false,
    }))
}

/// Fire a poll cycle on every tick. Runs until aborted.
async fn run_schedule<T>(
    fetcher: HttpFetcher,
    endpoint: String,
    period: Duration,
    shared: SharedState<T>,
) where
    T: DeserializeOwned + Send + Sync + 'static,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                in_flight.spawn(poll_once(fetcher.clone(), endpoint.clone(), Arc::clone(&shared)));
            }
            Some(joined) = in_flight.join_next() => {
                if let Err(e) = joined {
                    if e.is_panic() {
                        warn!(endpoint = %endpoint, "poll cycle panicked");
                    }
                }
            }
        }
    }
}

/// One polling cycle: mark loading, fetch, apply.
async fn poll_once<T>(fetcher: HttpFetcher, endpoint: String, shared: SharedState<T>)
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    let Some(guard) = InFlight::begin(&shared) else {
        return;
    };
    debug!(endpoint = %endpoint, "poll cycle started");
    let result = fetcher.get_json::<Vec<T>>(&endpoint).await;
    guard.settle(&endpoint, result);
}

/// One outstanding request.
///
/// Dropping it without [`settle`](InFlight::settle) (a panic or an abort
/// mid-fetch) still releases its in-flight slot, so `loading` cannot stick.
struct InFlight<T> {
    shared: SharedState<T>,
    settled: bool,
}

impl<T> InFlight<T> {
    fn begin(shared: &SharedState<T>) -> Option<Self> {
        begin_cycle(shared).then(|| Self {
            shared: Arc::clone(shared),
            settled: false,
        })
    }

    fn settle(mut self, endpoint: &str, result: Result<Vec<T>, FetchError>) {
        self.settled = true;
        apply_result(&self.shared, endpoint, result);
    }
}

impl<T> Drop for InFlight<T> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut state = self.shared.lock();
        if state.stopped {
            return;
        }
        state.in_flight = state.in_flight.saturating_sub(1);
        state.snapshot.loading = state.in_flight > 0;
    }
}

/// Mark a request as in flight. Returns false if the source was stopped.
fn begin_cycle<T>(shared: &SharedState<T>) -> bool {
    let mut state = shared.lock();
    if state.stopped {
        return false;
    }
    state.in_flight += 1;
    state.snapshot.loading = true;
    true
}

/// Apply a settled request to the snapshot unless the source was stopped.
fn apply_result<T>(shared: &SharedState<T>, endpoint: &str, result: Result<Vec<T>, FetchError>) {
    let mut state = shared.lock();
    if state.stopped {
        return;
    }
    state.in_flight = state.in_flight.saturating_sub(1);
    state.snapshot.loading = state.in_flight > 0;

    match result {
        Ok(data) => {
            debug!(endpoint = %endpoint, items = data.len(), "poll cycle succeeded");
            state.snapshot.data = Arc::new(data);
            state.snapshot.error = None;
            state.snapshot.updated_at = Some(Instant::now());
        }
        Err(e) => {
            warn!(endpoint = %endpoint, error = %e, "poll cycle failed");
            state.snapshot.error = Some(e.to_string());
        }
    }
}
