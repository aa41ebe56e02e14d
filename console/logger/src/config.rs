//! Logger configuration and its live-reload plumbing.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use arc_swap::ArcSwap;
use parking_lot::{Mutex, ReentrantMutex};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use ves_console_common::color::Color;
use ves_console_common::log::LogLevel;

use crate::error::{Error, Result};

/// The configuration shared by all loggers of a provider.
///
/// A configuration is never modified in place. A reload replaces the whole value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfiguration {
    /// Only events with this id are written. `0` writes all events.
    pub event_id: i32,
    /// The color for each enabled level. Levels without a color are disabled.
    pub level_colors: HashMap<LogLevel, Color>,
}

impl LoggerConfiguration {
    /// Creates a configuration that writes all events of the provided levels.
    pub fn with_colors(level_colors: impl IntoIterator<Item = (LogLevel, Color)>) -> Self {
        Self {
            event_id: 0,
            level_colors: level_colors.into_iter().collect(),
        }
    }

    /// Retrieves the color of a level, if the level is enabled.
    pub fn color(&self, level: LogLevel) -> Option<&Color> {
        self.level_colors.get(&level)
    }

    /// Loads a configuration from a `.ron` or `.json` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        load_file(path.as_ref())
    }
}

impl Default for LoggerConfiguration {
    fn default() -> Self {
        Self::with_colors([(LogLevel::Information, Color::GREEN)])
    }
}

/// Deserializes a file, choosing the format by extension.
pub(crate) fn load_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let read = || {
        std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_owned(),
            source,
        })
    };

    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("ron") => {
            ron::de::from_str(&read()?).map_err(|source| Error::Ron {
                path: path.to_owned(),
                source,
            })
        }
        Some(ext) if ext.eq_ignore_ascii_case("json") => {
            serde_json::from_str(&read()?).map_err(|source| Error::Json {
                path: path.to_owned(),
                source,
            })
        }
        _ => Err(Error::UnsupportedFormat(path.to_owned())),
    }
}

type Listener<T> = Arc<dyn Fn(Arc<T>) + Send + Sync>;

struct MonitorInner<T> {
    current: ArcSwap<T>,
    // Held while a value is stored and delivered, so listeners see values in store order.
    notify: ReentrantMutex<()>,
    listeners: Mutex<Vec<(u64, Listener<T>)>>,
    next_id: AtomicU64,
}

impl<T> MonitorInner<T> {
    fn unsubscribe(&self, id: u64) {
        self.listeners.lock().retain(|(listener_id, _)| *listener_id != id);
    }
}

/// Holds the current value of a configuration and notifies subscribers when it is replaced.
///
/// Cloning a monitor yields a handle to the same value.
pub struct ConfigMonitor<T> {
    inner: Arc<MonitorInner<T>>,
}

impl<T> ConfigMonitor<T>
where
    T: Send + Sync + 'static,
{
    /// Creates a new instance.
    ///
    /// # Arguments
    ///
    /// * `initial`: The initial value.
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(MonitorInner {
                current: ArcSwap::from_pointee(initial),
                notify: ReentrantMutex::new(()),
                listeners: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Retrieves the current value.
    pub fn current(&self) -> Arc<T> {
        self.inner.current.load_full()
    }

    /// Replaces the current value and notifies all subscribers.
    ///
    /// Concurrent calls are serialized, so every subscriber sees the values in the order they were
    /// stored. A subscriber may call `set` itself; the remaining subscribers then receive the newer
    /// value.
    pub fn set(&self, value: T) {
        let _notify = self.inner.notify.lock();
        self.inner.current.store(Arc::new(value));

        let listeners: Vec<Listener<T>> = self
            .inner
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(self.inner.current.load_full());
        }
    }

    /// Subscribes to changes.
    ///
    /// The callback is called with the new value every time [`ConfigMonitor::set()`] is called,
    /// until the returned [`ChangeSubscription`] is dropped or disposed.
    pub fn on_change(&self, listener: impl Fn(Arc<T>) + Send + Sync + 'static) -> ChangeSubscription {
        let _notify = self.inner.notify.lock();
        self.subscribe(Arc::new(listener))
    }

    /// Subscribes to changes and calls the callback once with the current value right away.
    ///
    /// No `set` can slip in between reading the current value and subscribing, so the last value
    /// the callback receives is always the monitor's current value.
    pub fn watch(&self, listener: impl Fn(Arc<T>) + Send + Sync + 'static) -> ChangeSubscription {
        let _notify = self.inner.notify.lock();
        let listener: Listener<T> = Arc::new(listener);
        let subscription = self.subscribe(Arc::clone(&listener));
        listener(self.inner.current.load_full());
        subscription
    }

    fn subscribe(&self, listener: Listener<T>) -> ChangeSubscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.listeners.lock().push((id, listener));

        let inner: Weak<MonitorInner<T>> = Arc::downgrade(&self.inner);
        ChangeSubscription {
            unsubscribe: Some(Box::new(move || {
                if let Some(inner) = inner.upgrade() {
                    inner.unsubscribe(id);
                }
            })),
        }
    }

    /// Returns the number of active subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.lock().len()
    }
}

impl ConfigMonitor<LoggerConfiguration> {
    /// Replaces the current configuration with the contents of a `.ron` or `.json` file.
    ///
    /// On error the current configuration stays in place.
    pub fn reload_from_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let config = LoggerConfiguration::from_file(path)?;
        self.set(config);
        Ok(())
    }
}

impl<T> Clone for ConfigMonitor<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for ConfigMonitor<T>
where
    T: Default + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> std::fmt::Debug for ConfigMonitor<T>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigMonitor")
            .field("current", &self.inner.current.load_full())
            .finish()
    }
}

/// A subscription to a [`ConfigMonitor`]. Dropping it unsubscribes.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct ChangeSubscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl ChangeSubscription {
    /// Unsubscribes.
    pub fn dispose(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for ChangeSubscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for ChangeSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeSubscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}
