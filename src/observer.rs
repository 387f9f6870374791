//! Diagnostic observers for bean resolution.
//!
//! Observers receive a callback for every component the resolver builds,
//! enabling structured tracing, timing and post-mortem analysis of a failed
//! initialization pass.

use std::sync::Arc;
use std::time::Duration;

use crate::error::BeanError;
use crate::key::TypeKey;

/// Observer trait for resolution events.
///
/// Calls are made synchronously from inside the resolver, so implementations
/// should stay lightweight. Memoized lookups (a component that is already in
/// the registry) do not produce events.
///
/// # Examples
///
/// ```
/// use bean_factory::{BeanFactory, ComponentCatalog, ResolutionObserver, TypeKey};
/// use std::sync::{Arc, Mutex};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Recorder {
///     built: Mutex<Vec<&'static str>>,
/// }
///
/// impl ResolutionObserver for Recorder {
///     fn resolving(&self, _key: &TypeKey) {}
///
///     fn resolved(&self, key: &TypeKey, _duration: Duration) {
///         self.built.lock().unwrap().push(key.short_name());
///     }
///
///     fn factory_panic(&self, _key: &TypeKey, _message: &str) {}
/// }
///
/// struct Clock;
///
/// let mut catalog = ComponentCatalog::new();
/// catalog.component::<Clock>().constructor(|()| Clock).register();
///
/// let recorder = Arc::new(Recorder::default());
/// let factory = BeanFactory::builder(catalog)
///     .observer(recorder.clone())
///     .initialize([TypeKey::of::<Clock>()])
///     .unwrap();
///
/// assert!(factory.contains::<Clock>());
/// assert_eq!(*recorder.built.lock().unwrap(), vec!["Clock"]);
/// ```
pub trait ResolutionObserver: Send + Sync {
    /// Called before a component's parameters are resolved.
    fn resolving(&self, key: &TypeKey);

    /// Called after a component was built and stored.
    ///
    /// `duration` spans from `resolving` to `resolved`, including the time
    /// spent building the component's dependencies.
    fn resolved(&self, key: &TypeKey, duration: Duration);

    /// Called when a constructor panics. The panic is converted into a
    /// [`BeanError::Instantiation`] after this call.
    fn factory_panic(&self, key: &TypeKey, message: &str);

    /// Called when resolving `key` failed. Fired once per component on the
    /// failing chain, innermost first.
    fn failed(&self, key: &TypeKey, error: &BeanError) {
        let _ = (key, error);
    }
}

/// Collection of observers held by a factory.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn ResolutionObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn ResolutionObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }

    #[inline]
    pub(crate) fn resolving(&self, key: &TypeKey) {
        for observer in &self.observers {
            observer.resolving(key);
        }
    }

    #[inline]
    pub(crate) fn resolved(&self, key: &TypeKey, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(key, duration);
        }
    }

    #[inline]
    pub(crate) fn factory_panic(&self, key: &TypeKey, message: &str) {
        for observer in &self.observers {
            observer.factory_panic(key, message);
        }
    }

    #[inline]
    pub(crate) fn failed(&self, key: &TypeKey, error: &BeanError) {
        for observer in &self.observers {
            observer.failed(key, error);
        }
    }
}

/// Built-in observer that forwards events to `tracing`.
///
/// Resolution progress is logged at `debug`, completions at `debug` with the
/// elapsed time, failures at `warn` and constructor panics at `error`.
///
/// ```
/// use bean_factory::{BeanFactory, ComponentCatalog, LoggingObserver};
/// use std::sync::Arc;
///
/// let factory = BeanFactory::builder(ComponentCatalog::new())
///     .observer(Arc::new(LoggingObserver::with_prefix("app")))
///     .build();
/// assert!(factory.is_empty());
/// ```
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    /// Creates a new logging observer with default prefix.
    pub fn new() -> Self {
        Self {
            prefix: "bean-factory".to_string(),
        }
    }

    /// Creates a new logging observer with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionObserver for LoggingObserver {
    fn resolving(&self, key: &TypeKey) {
        tracing::debug!(prefix = %self.prefix, component = key.name(), "resolving");
    }

    fn resolved(&self, key: &TypeKey, duration: Duration) {
        tracing::debug!(
            prefix = %self.prefix,
            component = key.name(),
            elapsed_us = duration.as_micros() as u64,
            "resolved"
        );
    }

    fn factory_panic(&self, key: &TypeKey, message: &str) {
        tracing::error!(prefix = %self.prefix, component = key.name(), panic = message, "constructor panicked");
    }

    fn failed(&self, key: &TypeKey, error: &BeanError) {
        tracing::warn!(prefix = %self.prefix, component = key.name(), %error, "resolution failed");
    }
}
