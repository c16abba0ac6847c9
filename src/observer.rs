//! Observation hooks for resolution and environment events.
//!
//! Observers see every `get` (including cache hits) and every environment
//! activation. They run after the container has released its internal
//! locks, so an observer may call back into the container.

use std::sync::Arc;
use std::time::Duration;

use crate::lifetime::Lifetime;

/// Observer trait for container events.
///
/// # Examples
///
/// ```
/// use bowl::{Container, ContainerObserver, Lifetime};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct CountingObserver {
///     hits: AtomicUsize,
/// }
///
/// impl ContainerObserver for CountingObserver {
///     fn resolving(&self, _name: &str) {}
///
///     fn resolved(&self, _name: &str, _lifetime: Lifetime, cache_hit: bool, _duration: Duration) {
///         if cache_hit {
///             self.hits.fetch_add(1, Ordering::SeqCst);
///         }
///     }
/// }
///
/// let observer = Arc::new(CountingObserver::default());
/// let container = Container::new();
/// container.add_observer(observer.clone());
/// container.share("clock", &[], |_| Ok(42u64)).unwrap();
///
/// container.get::<u64>("clock").unwrap();
/// container.get::<u64>("clock").unwrap();
/// assert_eq!(observer.hits.load(Ordering::SeqCst), 1);
/// ```
pub trait ContainerObserver: Send + Sync {
    /// Called when a resolution starts, before the cache is consulted.
    fn resolving(&self, name: &str);

    /// Called when a resolution completes successfully.
    ///
    /// `cache_hit` is `true` when a shared instance was returned from the
    /// cache without running the factory or extensions.
    fn resolved(&self, name: &str, lifetime: Lifetime, cache_hit: bool, duration: Duration);

    /// Called once an environment has been activated and its configuration
    /// callback has run.
    fn environment_activated(&self, _name: &str) {}
}

#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn ContainerObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self { observers: Vec::new() }
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn ContainerObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    pub(crate) fn resolving(&self, name: &str) {
        for observer in &self.observers {
            observer.resolving(name);
        }
    }

    pub(crate) fn resolved(&self, name: &str, lifetime: Lifetime, cache_hit: bool, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(name, lifetime, cache_hit, duration);
        }
    }

    pub(crate) fn environment_activated(&self, name: &str) {
        for observer in &self.observers {
            observer.environment_activated(name);
        }
    }
}

/// Built-in observer that forwards events to `tracing`.
///
/// ```
/// use bowl::{Container, TracingObserver};
/// use std::sync::Arc;
///
/// let container = Container::new();
/// container.add_observer(Arc::new(TracingObserver::with_prefix("app")));
/// ```
#[derive(Debug, Clone)]
pub struct TracingObserver {
    prefix: String,
}

impl TracingObserver {
    pub fn new() -> Self {
        Self {
            prefix: "bowl".to_string(),
        }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerObserver for TracingObserver {
    fn resolving(&self, name: &str) {
        tracing::trace!(prefix = %self.prefix, service = name, "resolving");
    }

    fn resolved(&self, name: &str, lifetime: Lifetime, cache_hit: bool, duration: Duration) {
        tracing::debug!(
            prefix = %self.prefix,
            service = name,
            %lifetime,
            cache_hit,
            ?duration,
            "resolved"
        );
    }

    fn environment_activated(&self, name: &str) {
        tracing::info!(prefix = %self.prefix, environment = name, "environment activated");
    }
}
