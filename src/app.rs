//! Application state: the two live sources, derived graph, and UI flags.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{error, info};

use crate::data::{CallGraph, CallLogEntry, GraphCache, QosMetric};
use crate::source::{DataSource, Snapshot};
use crate::ui::Theme;

/// Default number of call log rows in the table.
pub const DEFAULT_TABLE_ROWS: usize = 5;

/// What a panel should show for a given snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelState<'a, T> {
    /// First fetch still in flight.
    Loading,
    /// Nothing has loaded yet and the last fetch failed.
    Failed(&'a str),
    /// Data has loaded at least once. `error` is set while the data is stale.
    Ready { data: &'a [T], error: Option<&'a str> },
}

impl<'a, T> PanelState<'a, T> {
    pub fn of(snapshot: &'a Snapshot<T>) -> Self {
        if snapshot.has_loaded() {
            return PanelState::Ready {
                data: &snapshot.data,
                error: snapshot.error.as_deref(),
            };
        }
        match snapshot.error.as_deref() {
            Some(error) => PanelState::Failed(error),
            None => PanelState::Loading,
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,

    // Data sources
    calls_source: Box<dyn DataSource<CallLogEntry>>,
    qos_source: Box<dyn DataSource<QosMetric>>,

    /// Latest call log snapshot, refreshed by [`App::refresh`].
    pub calls: Snapshot<CallLogEntry>,
    /// Latest QoS snapshot, refreshed by [`App::refresh`].
    pub qos: Snapshot<QosMetric>,
    /// Call graph projected from `calls`.
    pub graph: Arc<CallGraph>,
    graph_cache: GraphCache,

    /// Set when rendering panicked; the whole view is replaced until reload.
    pub fatal: Option<String>,

    // Display options
    pub backend_url: String,
    pub table_rows: usize,
    pub theme: Theme,
    pub started: Instant,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App reading from the given sources.
    pub fn new(
        calls_source: Box<dyn DataSource<CallLogEntry>>,
        qos_source: Box<dyn DataSource<QosMetric>>,
    ) -> Self {
        let mut app = Self {
            running: true,
            show_help: false,
            calls_source,
            qos_source,
            calls: Snapshot::loading(),
            qos: Snapshot::loading(),
            graph: Arc::default(),
            graph_cache: GraphCache::new(),
            fatal: None,
            backend_url: String::new(),
            table_rows: DEFAULT_TABLE_ROWS,
            theme: Theme::default(),
            started: Instant::now(),
            status_message: None,
        };
        app.refresh();
        app
    }

    /// Set the backend URL shown in the header.
    pub fn with_backend_url(mut self, url: impl Into<String>) -> Self {
        self.backend_url = url.into();
        self
    }

    /// Set how many call log rows the table shows.
    pub fn with_table_rows(mut self, rows: usize) -> Self {
        self.table_rows = rows.max(1);
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Descriptions of the calls and QoS sources.
    pub fn source_descriptions(&self) -> (&str, &str) {
        (self.calls_source.description(), self.qos_source.description())
    }

    /// Pull the latest snapshots from both sources.
    ///
    /// The call graph is only re-projected when the call data changed.
    pub fn refresh(&mut self) {
        self.calls = self.calls_source.snapshot();
        self.qos = self.qos_source.snapshot();
        self.graph = self.graph_cache.get(&self.calls.data);
    }

    /// The call log rows shown in the table: the first `table_rows` entries
    /// in backend order.
    pub fn visible_calls(&self) -> &[CallLogEntry] {
        let end = self.table_rows.min(self.calls.data.len());
        &self.calls.data[..end]
    }

    /// Number of calls reported as active.
    pub fn active_call_count(&self) -> usize {
        self.calls.data.iter().filter(|c| c.is_active()).count()
    }

    /// True when both sources are failing at the same time.
    pub fn connection_lost(&self) -> bool {
        self.calls.error.is_some() && self.qos.error.is_some()
    }

    pub fn calls_state(&self) -> PanelState<'_, CallLogEntry> {
        PanelState::of(&self.calls)
    }

    pub fn qos_state(&self) -> PanelState<'_, QosMetric> {
        PanelState::of(&self.qos)
    }

    /// Record a rendering failure. The view shows the reload prompt until
    /// [`App::reload`] is called.
    pub fn record_fatal(&mut self, message: String) {
        error!(error = %message, "dashboard render failed");
        self.fatal = Some(message);
    }

    /// Restart both sources from scratch and clear any fatal error.
    pub fn reload(&mut self) {
        info!("reloading dashboard");
        self.calls_source.restart();
        self.qos_source.restart();
        self.graph_cache.clear();
        self.fatal = None;
        self.refresh();
        self.set_status_message("Reloaded".to_string());
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit and stop polling.
    pub fn quit(&mut self) {
        self.calls_source.stop();
        self.qos_source.stop();
        self.running = false;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::source::ChannelSource;
    use tokio::sync::watch;

    pub(crate) struct Harness {
        pub app: App,
        pub calls_tx: watch::Sender<Snapshot<CallLogEntry>>,
        pub qos_tx: watch::Sender<Snapshot<QosMetric>>,
    }

    pub(crate) fn harness() -> Harness {
        let (calls_tx, calls) = ChannelSource::create("calls");
        let (qos_tx, qos) = ChannelSource::create("qos");
        Harness {
            app: App::new(Box::new(calls), Box::new(qos)).with_backend_url("http://test:8000"),
            calls_tx,
            qos_tx,
        }
    }

    pub(crate) fn sample_calls() -> Vec<CallLogEntry> {
        (0..7)
            .map(|i| CallLogEntry {
                call_id: Some(format!("call-{}", i)),
                caller: Some(format!("sip:user{}@example.com", i)),
                callee: Some(format!("sip:peer{}@example.com", i)),
                status: if i % 2 == 0 { "Active" } else { "Ended" }.to_string(),
                ..Default::default()
            })
            .collect()
    }

    pub(crate) fn sample_qos() -> Vec<QosMetric> {
        vec![
            QosMetric { metric: "Jitter (ms)".to_string(), value: 12.5 },
            QosMetric { metric: "Latency (ms)".to_string(), value: 120.0 },
            QosMetric { metric: "Packet Loss (%)".to_string(), value: 1.2 },
        ]
    }

    #[test]
    fn test_starts_loading() {
        let h = harness();
        assert_eq!(h.app.calls_state(), PanelState::Loading);
        assert_eq!(h.app.qos_state(), PanelState::Loading);
        assert!(h.app.graph.is_empty());
        assert!(!h.app.connection_lost());
    }

    #[test]
    fn test_visible_calls_is_front_slice() {
        let mut h = harness();
        h.calls_tx.send(Snapshot::ready(sample_calls())).unwrap();
        h.app.refresh();

        let visible = h.app.visible_calls();
        assert_eq!(visible.len(), DEFAULT_TABLE_ROWS);
        assert_eq!(visible[0].call_id(), Some("call-0"));
        assert_eq!(visible[4].call_id(), Some("call-4"));
        assert_eq!(h.app.active_call_count(), 4);

        let app = h.app.with_table_rows(10);
        assert_eq!(app.visible_calls().len(), 7);
    }

    #[test]
    fn test_graph_memoized_until_data_changes() {
        let mut h = harness();
        h.calls_tx.send(Snapshot::ready(sample_calls())).unwrap();
        h.app.refresh();
        let first = Arc::clone(&h.app.graph);
        assert_eq!(first.nodes().count(), 14);
        assert_eq!(first.edges().count(), 7);

        h.app.refresh();
        assert!(Arc::ptr_eq(&first, &h.app.graph));

        h.calls_tx.send(Snapshot::ready(sample_calls()[..2].to_vec())).unwrap();
        h.app.refresh();
        assert_eq!(h.app.graph.edges().count(), 2);
    }

    #[test]
    fn test_connection_lost_requires_both_errors() {
        let mut h = harness();
        h.calls_tx.send(Snapshot::failed("Network Error")).unwrap();
        h.app.refresh();
        assert!(!h.app.connection_lost());
        assert_eq!(h.app.calls_state(), PanelState::Failed("Network Error"));

        h.qos_tx.send(Snapshot::failed("timeout of 5000ms exceeded")).unwrap();
        h.app.refresh();
        assert!(h.app.connection_lost());

        h.calls_tx.send(Snapshot::ready(sample_calls())).unwrap();
        h.app.refresh();
        assert!(!h.app.connection_lost());
    }

    #[test]
    fn test_stale_data_stays_ready() {
        let mut h = harness();
        let mut snapshot = Snapshot::ready(sample_qos());
        snapshot.error = Some("Network Error".to_string());
        snapshot.loading = true;
        h.qos_tx.send(snapshot).unwrap();
        h.app.refresh();

        match h.app.qos_state() {
            PanelState::Ready { data, error } => {
                assert_eq!(data.len(), 3);
                assert_eq!(error, Some("Network Error"));
            }
            other => panic!("expected Ready, got {:?}", other),
        }
    }

    #[test]
    fn test_reload_clears_fatal() {
        let mut h = harness();
        h.app.record_fatal("index out of bounds".to_string());
        assert!(h.app.fatal.is_some());

        h.app.reload();
        assert!(h.app.fatal.is_none());
        assert_eq!(h.app.get_status_message(), Some("Reloaded"));
    }

    #[test]
    fn test_quit() {
        let mut h = harness();
        h.app.quit();
        assert!(!h.app.running);
    }
}
