//! Keystroke debouncing for the search field
//!
//! Each keystroke arms a delayed fire; a newer keystroke supersedes any
//! pending one. The generation counter makes superseding cheap: a sleeper
//! that wakes up and finds itself outdated simply reports that it lost.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Delay between the last keystroke and the search call.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Generation-counter debouncer.
#[derive(Clone)]
pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Arm the debouncer for one keystroke and wait out the delay.
    ///
    /// Returns `true` if this keystroke is still the latest when the delay
    /// elapses, `false` if a newer keystroke superseded it.
    pub async fn fire(&self) -> bool {
        let my_generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;
        self.generation.load(Ordering::SeqCst) == my_generation
    }

    /// Invalidate any pending fire without arming a new one.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_single_fire_wins() {
        let debouncer = Debouncer::new(Duration::from_millis(10));
        assert!(debouncer.fire().await);
    }

    #[tokio::test]
    async fn test_new_keystroke_supersedes_pending() {
        let debouncer = Debouncer::new(Duration::from_millis(50));
        let older = debouncer.clone();
        let first = tokio::spawn(async move { older.fire().await });

        tokio::time::sleep(Duration::from_millis(10)).await;
        let second = debouncer.fire();

        let (first, second) = (first.await.unwrap(), second.await);
        assert!(!first);
        assert!(second);
    }

    #[tokio::test]
    async fn test_cancel_invalidates_pending() {
        let debouncer = Debouncer::new(Duration::from_millis(50));
        let armed = debouncer.clone();
        let pending = tokio::spawn(async move { armed.fire().await });

        tokio::time::sleep(Duration::from_millis(10)).await;
        debouncer.cancel();

        assert!(!pending.await.unwrap());
    }
}
