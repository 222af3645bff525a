use std::{
    fmt,
    sync::atomic::{AtomicUsize, Ordering},
};

use crossbeam::utils::Backoff;
use log::trace;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::{
    accessor::ReadDelegate,
    identity::PropertyIdentity,
    utils::{conf::DelegateConfig, error::DelegateResult},
};

const STATE_UNINITIALIZED: usize = 0; // Initializer never completed
const STATE_INITIALIZING: usize = 1; // An initializer is running (other synchronized readers wait)
const STATE_INITIALIZED: usize = 2; // Value is published and never changes again

/// Coordination strategy of a [`LazyCache`] during its first read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LazyMode {
    /// The initializer runs exactly once. Readers arriving while it runs wait for it.
    #[default]
    Synchronized,
    /// Concurrent first readers may each run the initializer; the first published value wins
    /// and every reader observes that one. The initializer must be free of side effects.
    #[serde(rename = "publication")]
    PublicationSafe,
    /// No coordination at all. Only valid when first access cannot happen concurrently or the
    /// initializer is pure: concurrent first readers each run the initializer (the
    /// unsynchronized-race hazard), and readers still agree on the single value kept.
    None,
}

/// Observable lifecycle of a [`LazyCache`].
///
/// Every mode goes `Uninitialized -> Initializing -> Initialized`, and falls back to
/// `Uninitialized` when the initializer unwinds before any value was published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LazyState {
    Uninitialized,
    Initializing,
    Initialized,
}

impl LazyState {
    fn from_raw(raw: usize) -> Self {
        match raw {
            STATE_UNINITIALIZED => LazyState::Uninitialized,
            STATE_INITIALIZING => LazyState::Initializing,
            _ => LazyState::Initialized,
        }
    }
}

/// Puts the state back to uninitialized if the initializer unwinds before anyone published.
struct ResetOnUnwind<'a> {
    state: &'a AtomicUsize,
}

impl Drop for ResetOnUnwind<'_> {
    fn drop(&mut self) {
        let _ = self.state.compare_exchange(
            STATE_INITIALIZING,
            STATE_UNINITIALIZED,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }
}

/// Read-only delegate that computes its value on first read and caches it forever.
///
/// The initializer is supplied once at construction. Once the cache is initialized its value
/// never changes and the initializer is never called again. If the initializer panics the cache
/// stays uninitialized and the next read tries again. A synchronized initializer must not read
/// its own cache: that read waits for itself forever.
///
/// ```rust
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use hydelegate::LazyCache;
///
/// let calls = AtomicUsize::new(0);
/// let value = LazyCache::new(|| {
///     calls.fetch_add(1, Ordering::SeqCst);
///     "lazyval".to_string()
/// });
///
/// assert_eq!(value.get(), "lazyval");
/// assert_eq!(value.get(), "lazyval");
/// assert_eq!(calls.load(Ordering::SeqCst), 1);
/// ```
pub struct LazyCache<V, F = fn() -> V> {
    value: OnceCell<V>,
    state: AtomicUsize,
    mode: LazyMode,
    init: F,
}

impl<V, F: Fn() -> V> LazyCache<V, F> {
    /// Synchronized lazy value, the safe default.
    pub const fn new(init: F) -> Self {
        Self::with_mode(LazyMode::Synchronized, init)
    }

    pub const fn with_mode(mode: LazyMode, init: F) -> Self {
        Self {
            value: OnceCell::new(),
            state: AtomicUsize::new(STATE_UNINITIALIZED),
            mode,
            init,
        }
    }

    /// Lazy value using the mode configured in `config`.
    pub fn with_config(config: &DelegateConfig, init: F) -> Self {
        Self::with_mode(config.lazy.mode, init)
    }

    pub fn mode(&self) -> LazyMode {
        self.mode
    }

    pub fn state(&self) -> LazyState {
        LazyState::from_raw(self.state.load(Ordering::Acquire))
    }

    pub fn is_initialized(&self) -> bool {
        self.value.get().is_some()
    }

    /// The cached value, without triggering initialization.
    pub fn get_if_initialized(&self) -> Option<&V> {
        self.value.get()
    }

    /// The cached value, running the initializer first if needed.
    pub fn get(&self) -> &V {
        if let Some(value) = self.value.get() {
            return value;
        }

        match self.mode {
            LazyMode::Synchronized => self.init_synchronized(),
            LazyMode::PublicationSafe => self.init_publication(),
            LazyMode::None => self.init_unsynchronized(),
        }
    }

    fn init_synchronized(&self) -> &V {
        // - If a value is published, return it
        // - If nobody is initializing, claim the slot and run the initializer
        // - Otherwise wait for the running initializer to publish (or to unwind)
        let backoff = Backoff::new();

        loop {
            if let Some(value) = self.value.get() {
                return value;
            }

            if self
                .state
                .compare_exchange(
                    STATE_UNINITIALIZED,
                    STATE_INITIALIZING,
                    Ordering::AcqRel,
                    Ordering::Acquire,
                )
                .is_ok()
            {
                let reset = ResetOnUnwind { state: &self.state };
                trace!("running synchronized lazy initializer");
                let value = (self.init)();
                let stored = self.publish(value);
                std::mem::forget(reset);
                return stored;
            }

            backoff.snooze();
        }
    }

    fn init_publication(&self) -> &V {
        // Claiming the state is bookkeeping only, losers still run their own initializer
        let claimed = self
            .state
            .compare_exchange(
                STATE_UNINITIALIZED,
                STATE_INITIALIZING,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok();

        trace!("running publication-safe lazy initializer (claimed: {claimed})");
        let value = if claimed {
            let reset = ResetOnUnwind { state: &self.state };
            let value = (self.init)();
            std::mem::forget(reset);
            value
        } else {
            (self.init)()
        };

        self.publish(value)
    }

    fn init_unsynchronized(&self) -> &V {
        // Reporting only: nobody waits on this state in this mode
        let claimed = self
            .state
            .compare_exchange(
                STATE_UNINITIALIZED,
                STATE_INITIALIZING,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok();

        let value = if claimed {
            let reset = ResetOnUnwind { state: &self.state };
            let value = (self.init)();
            std::mem::forget(reset);
            value
        } else {
            (self.init)()
        };

        self.publish(value)
    }

    fn publish(&self, value: V) -> &V {
        let stored = match self.value.try_insert(value) {
            Ok(stored) => {
                trace!("lazy value published");
                stored
            }
            Err((stored, _discarded)) => {
                trace!("lazy value already published, discarding duplicate");
                stored
            }
        };
        self.state.store(STATE_INITIALIZED, Ordering::Release);
        stored
    }
}

impl<V: Clone, F: Fn() -> V> ReadDelegate<V> for LazyCache<V, F> {
    fn read(&self, _property: &PropertyIdentity) -> DelegateResult<V> {
        Ok(self.get().clone())
    }
}

impl<V: fmt::Debug, F> fmt::Debug for LazyCache<V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyCache")
            .field("mode", &self.mode)
            .field(
                "state",
                &LazyState::from_raw(self.state.load(Ordering::Acquire)),
            )
            .field("value", &self.value.get())
            .finish()
    }
}
