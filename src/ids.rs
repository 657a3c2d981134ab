//! Identifier sources for anomalies, patterns and insights.
//!
//! Components never mint identifiers themselves; they draw suffixes from an
//! injected [`IdSource`]. Production runs use [`RandomIds`], tests use
//! [`SequentialIds`] for reproducible output. Sharing one source across
//! detectors keeps suffixes unique across instances.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Yields unique identifier suffixes.
pub trait IdSource: Send + Sync {
    /// Next suffix. Never repeats for the lifetime of the source.
    fn next_suffix(&self) -> String;
}

/// Shared handle passed to every component.
pub type SharedIds = Arc<dyn IdSource>;

/// Monotonic counter rendered as 8 zero-padded digits.
#[derive(Debug, Default)]
pub struct SequentialIds {
    counter: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedIds {
        Arc::new(Self::new())
    }
}

impl IdSource for SequentialIds {
    fn next_suffix(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{n:08}")
    }
}

/// First 8 hex characters of a v4 UUID.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl RandomIds {
    pub fn shared() -> SharedIds {
        Arc::new(Self)
    }
}

impl IdSource for RandomIds {
    fn next_suffix(&self) -> String {
        let mut simple = uuid::Uuid::new_v4().simple().to_string();
        simple.truncate(8);
        simple
    }
}
