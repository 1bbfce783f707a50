//! The state one data source exposes to the view.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Current state of a data source: the latest data plus loading/error status.
///
/// `data` is shared and replaced wholesale on every successful fetch, so
/// consumers can tell whether anything changed with [`Arc::ptr_eq`].
pub struct Snapshot<T> {
    /// Last successfully fetched collection. Empty until the first success.
    pub data: Arc<Vec<T>>,
    /// True while a fetch for this source is in flight.
    pub loading: bool,
    /// Message of the most recent failure, cleared by the next success.
    pub error: Option<String>,
    /// When `data` was last replaced.
    pub updated_at: Option<Instant>,
}

impl<T> Snapshot<T> {
    /// The state of a source that has not completed a fetch yet.
    pub fn loading() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    /// A loaded snapshot holding `data`.
    pub fn ready(data: Vec<T>) -> Self {
        Self {
            data: Arc::new(data),
            loading: false,
            error: None,
            updated_at: Some(Instant::now()),
        }
    }

    /// A failed snapshot with no data.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Whether at least one fetch has succeeded.
    pub fn has_loaded(&self) -> bool {
        self.updated_at.is_some()
    }
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self {
            data: Arc::new(Vec::new()),
            loading: false,
            error: None,
            updated_at: None,
        }
    }
}

// Manual impls: `T` itself never needs to be `Clone` or `Debug` since the
// data sits behind an `Arc`.
impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            loading: self.loading,
            error: self.error.clone(),
            updated_at: self.updated_at,
        }
    }
}

impl<T> fmt::Debug for Snapshot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("len", &self.data.len())
            .field("loading", &self.loading)
            .field("error", &self.error)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let s: Snapshot<u32> = Snapshot::loading();
        assert!(s.loading);
        assert!(!s.has_loaded());
        assert!(s.data.is_empty());

        let s = Snapshot::ready(vec![1, 2, 3]);
        assert!(!s.loading);
        assert!(s.has_loaded());
        assert_eq!(s.data.len(), 3);

        let s: Snapshot<u32> = Snapshot::failed("Network Error");
        assert_eq!(s.error.as_deref(), Some("Network Error"));
        assert!(!s.loading);
    }

    #[test]
    fn test_clone_shares_data() {
        let s = Snapshot::ready(vec!["a".to_string()]);
        let c = s.clone();
        assert!(Arc::ptr_eq(&s.data, &c.data));
    }
}
