//! # voipwatch
//!
//! A terminal dashboard and library for monitoring a VoIP backend.
//!
//! Two independent pollers keep the call log and the QoS metrics fresh.
//! The call log is also projected into a caller/callee graph. Everything
//! is drawn in an interactive terminal UI.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐  │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│  │
//! │  │ (state) │    │ (graph)  │    │(render) │    │         │  │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘  │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐                                                │
//! │  │ source  │◀── PollingSource (/calls, /qos) | ChannelSource│
//! │  │ (input) │                                                │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state and the actions behind each key
//! - **[`source`]**: The [`DataSource`] trait, HTTP polling and channel sources
//! - **[`data`]**: Wire types and the call graph projection
//! - **[`ui`]**: Terminal rendering using ratatui
//! - **[`settings`]**: Layered configuration (defaults, TOML file, environment)
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Poll a local backend with default intervals
//! voipwatch --backend-url http://localhost:8000
//!
//! # Faster call polling, log to a file
//! voipwatch --calls-interval 1s --log-file voipwatch.log
//! ```
//!
//! ### As a library with HTTP polling
//!
//! ```no_run
//! use std::time::Duration;
//! use voipwatch::{App, CallLogEntry, HttpFetcher, PollingSource, QosMetric};
//!
//! # tokio_test::block_on(async {
//! let fetcher = HttpFetcher::new("http://localhost:8000", Duration::from_secs(5)).unwrap();
//! let calls = PollingSource::<CallLogEntry>::start(
//!     fetcher.clone(),
//!     "/calls",
//!     Duration::from_secs(3),
//! );
//! let qos = PollingSource::<QosMetric>::start(fetcher, "/qos", Duration::from_secs(5));
//! let app = App::new(Box::new(calls), Box::new(qos));
//! # });
//! ```
//!
//! ### As a library with channel sources
//!
//! ```
//! use voipwatch::{App, CallLogEntry, ChannelSource, QosMetric, Snapshot};
//!
//! let (calls_tx, calls) = ChannelSource::<CallLogEntry>::create("synthetic calls");
//! let (_qos_tx, qos) = ChannelSource::<QosMetric>::create("synthetic qos");
//! let mut app = App::new(Box::new(calls), Box::new(qos));
//!
//! calls_tx.send(Snapshot::ready(Vec::new())).unwrap();
//! app.refresh();
//! assert!(app.graph.is_empty());
//! ```

pub mod app;
pub mod data;
pub mod error;
pub mod events;
pub mod settings;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, PanelState};
pub use data::{project, CallGraph, CallLogEntry, GraphCache, GraphElement, QosMetric};
pub use error::{FetchError, SettingsError};
pub use settings::Settings;
pub use source::{ChannelSource, DataSource, HttpFetcher, PollingSource, Snapshot};
