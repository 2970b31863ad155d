use parking_lot::Mutex;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// A single cancel-and-replace timer.
///
/// Arming aborts whatever timer was armed before, so at most one action per
/// slot is ever waiting. Once the delay elapses the action runs as its own
/// task and later `arm` or `cancel` calls no longer reach it.
pub struct DebounceSlot {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl DebounceSlot {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Run `action` once `delay` passes without another `arm` or `cancel`.
    /// Must be called from within a tokio runtime.
    pub fn arm<F>(&self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(action);
        });

        if let Some(previous) = self.pending.lock().replace(handle) {
            previous.abort();
        }
    }

    pub fn cancel(&self) {
        if let Some(previous) = self.pending.lock().take() {
            previous.abort();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for DebounceSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Backend suggestions first, then up to `recent_limit` recent queries not
/// already listed, truncated to `max`.
pub fn merge_suggestions(
    backend: Vec<String>,
    recent: Vec<String>,
    recent_limit: usize,
    max: usize,
) -> Vec<String> {
    let mut merged = backend;
    let mut added = 0;
    for query in recent {
        if added == recent_limit {
            break;
        }
        if !merged.contains(&query) {
            merged.push(query);
            added += 1;
        }
    }
    merged.truncate(max);
    merged
}

/// Result of a suggestion lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionLookup {
    /// Served from cache, nothing was scheduled
    Ready(Vec<String>),
    /// A debounced fetch is armed; the result arrives on the suggestion channel
    Pending,
}

/// Published whenever a debounced fetch completes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionUpdate {
    pub query: String,
    pub suggestions: Vec<String>,
}
