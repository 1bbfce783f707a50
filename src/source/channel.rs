//! Channel-based data source.
//!
//! Receives snapshots via a tokio watch channel. Useful when another part
//! of an application already has the data (a bridge from a message bus,
//! synthetic data, tests) and just needs the dashboard to display it.

use std::fmt;

use tokio::sync::watch;

use super::{DataSource, Snapshot};

/// A data source that exposes whatever was last sent on a watch channel.
///
/// # Example
///
/// ```
/// use voipwatch::{ChannelSource, DataSource, QosMetric, Snapshot};
///
/// let (tx, source) = ChannelSource::<QosMetric>::create("synthetic");
/// tx.send(Snapshot::ready(vec![QosMetric { metric: "Jitter (ms)".into(), value: 3.5 }]))
///     .unwrap();
///
/// assert_eq!(source.snapshot().data.len(), 1);
/// ```
pub struct ChannelSource<T> {
    receiver: watch::Receiver<Snapshot<T>>,
    description: String,
}

impl<T> ChannelSource<T> {
    /// Wrap the receiving end of a watch channel.
    ///
    /// `source_description` names where the snapshots come from and is
    /// shown in the status bar.
    pub fn new(receiver: watch::Receiver<Snapshot<T>>, source_description: &str) -> Self {
        Self {
            receiver,
            description: format!("channel: {}", source_description),
        }
    }

    /// Create a channel pair. The source starts out in the loading state.
    pub fn create(source_description: &str) -> (watch::Sender<Snapshot<T>>, Self) {
        let (tx, rx) = watch::channel(Snapshot::loading());
        (tx, Self::new(rx, source_description))
    }
}

impl<T> DataSource<T> for ChannelSource<T>
where
    T: Send + Sync + 'static,
{
    fn snapshot(&self) -> Snapshot<T> {
        self.receiver.borrow().clone()
    }

    fn description(&self) -> &str {
        &self.description
    }

    // The producer owns the data; there is no schedule to restart or stop.
    fn restart(&mut self) {}

    fn stop(&mut self) {}
}

impl<T> fmt::Debug for ChannelSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelSource")
            .field("description", &self.description)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CallLogEntry;

    #[test]
    fn test_channel_source_snapshot() {
        let (tx, source) = ChannelSource::<CallLogEntry>::create("test");

        // Initially loading with no data
        let snapshot = source.snapshot();
        assert!(snapshot.loading);
        assert!(snapshot.data.is_empty());
        assert_eq!(source.description(), "channel: test");

        // Send a new snapshot
        tx.send(Snapshot::ready(vec![CallLogEntry::default()])).unwrap();
        let snapshot = source.snapshot();
        assert!(!snapshot.loading);
        assert_eq!(snapshot.data.len(), 1);

        // Errors pass through untouched
        tx.send(Snapshot::failed("Network Error")).unwrap();
        assert_eq!(source.snapshot().error.as_deref(), Some("Network Error"));
    }
}
