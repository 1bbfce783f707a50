//! Data source abstraction for the dashboard's live collections.
//!
//! A data source owns one [`Snapshot`] and keeps it up to date. The view
//! only reads snapshots; it never mutates them.

mod channel;
mod fetch;
mod polling;
mod snapshot;

pub use channel::ChannelSource;
pub use fetch::{HttpFetcher, DEFAULT_TIMEOUT};
pub use polling::PollingSource;
pub use snapshot::Snapshot;

use std::fmt::Debug;

/// Trait for anything that can provide a live [`Snapshot`] of a collection.
///
/// Implementations provide snapshots from different backends: HTTP polling
/// ([`PollingSource`]) or an in-memory channel ([`ChannelSource`]).
///
/// # Example
///
/// ```
/// use voipwatch::{CallLogEntry, ChannelSource, DataSource};
///
/// let (_tx, source) = ChannelSource::<CallLogEntry>::create("example");
/// let snapshot = source.snapshot();
/// if snapshot.loading {
///     println!("waiting for {}", source.description());
/// }
/// ```
pub trait DataSource<T>: Send + Debug {
    /// The current snapshot. Non-blocking.
    fn snapshot(&self) -> Snapshot<T>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// Tear down and start over with a fresh snapshot.
    fn restart(&mut self);

    /// Tear down. After this returns the snapshot no longer changes.
    ///
    /// Calling `stop` more than once is a no-op.
    fn stop(&mut self);
}
