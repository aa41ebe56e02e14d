use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use ves_cache::{IgnoreCase, KeyedCache};
use ves_console_common::console::ConsoleSink;

use crate::config::{ChangeSubscription, ConfigMonitor, LoggerConfiguration};
use crate::logger::ConsoleLogger;

/// The lifecycle state of a [`ConsoleLoggerProvider`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProviderState {
    /// Hands out cached loggers and applies configuration changes.
    Active,
    /// Terminal state after [`ConsoleLoggerProvider::dispose()`].
    Disposed,
}

/// Creates [`ConsoleLogger`]s and keeps them up to date with the configuration.
///
/// There is at most one logger per category; category names are compared without regard to case.
pub struct ConsoleLoggerProvider {
    config: Arc<ArcSwap<LoggerConfiguration>>,
    loggers: KeyedCache<IgnoreCase, Arc<ConsoleLogger>>,
    sink: Arc<dyn ConsoleSink>,
    subscription: Mutex<Option<ChangeSubscription>>,
    disposed: AtomicBool,
}

impl ConsoleLoggerProvider {
    /// Creates a new instance.
    ///
    /// # Arguments
    ///
    /// * `monitor`: The source of the configuration. The provider starts out with its current value
    ///              and follows every change until it is disposed.
    /// * `sink`: The console that all loggers write to.
    pub fn new(monitor: &ConfigMonitor<LoggerConfiguration>, sink: Arc<dyn ConsoleSink>) -> Self {
        let config = Arc::new(ArcSwap::new(monitor.current()));

        let subscription = {
            let config = Arc::clone(&config);
            monitor.watch(move |updated| config.store(updated))
        };

        Self {
            config,
            loggers: KeyedCache::new(),
            sink,
            subscription: Mutex::new(Some(subscription)),
            disposed: AtomicBool::new(false),
        }
    }

    /// Retrieves the logger for a category, creating it on first use.
    ///
    /// After [`ConsoleLoggerProvider::dispose()`] a fresh logger is returned on every call. It uses
    /// the last configuration the provider saw and is not cached.
    pub fn create_logger(&self, category: &str) -> Arc<ConsoleLogger> {
        if self.state() == ProviderState::Disposed {
            return Arc::new(self.new_logger(category));
        }

        self.loggers
            .get_or_insert_with(IgnoreCase::from(category), |key| {
                Arc::new(self.new_logger(key.as_str()))
            })
    }

    fn new_logger(&self, category: &str) -> ConsoleLogger {
        ConsoleLogger::new(category, Arc::clone(&self.config), Arc::clone(&self.sink))
    }

    /// Retrieves the configuration that loggers currently use.
    pub fn current_configuration(&self) -> Arc<LoggerConfiguration> {
        self.config.load_full()
    }

    /// Returns the number of cached loggers.
    pub fn logger_count(&self) -> usize {
        self.loggers.len()
    }

    /// Retrieves the lifecycle state.
    pub fn state(&self) -> ProviderState {
        if self.disposed.load(Ordering::Acquire) {
            ProviderState::Disposed
        } else {
            ProviderState::Active
        }
    }

    /// Clears the logger cache and stops following configuration changes.
    ///
    /// Calling this more than once has no further effect.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.loggers.clear();
        if let Some(subscription) = self.subscription.lock().take() {
            subscription.dispose();
        }
    }
}

impl Drop for ConsoleLoggerProvider {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for ConsoleLoggerProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleLoggerProvider")
            .field("state", &self.state())
            .field("loggers", &self.logger_count())
            .field("config", &self.config.load_full())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use std::sync::Barrier;
    use ves_console_common::color::Color;
    use ves_console_common::log::{EventId, LogLevel};

    fn setup() -> (ConfigMonitor<LoggerConfiguration>, ConsoleLoggerProvider, Arc<MemorySink>) {
        let monitor = ConfigMonitor::new(LoggerConfiguration::default());
        let sink = Arc::new(MemorySink::new());
        let provider = ConsoleLoggerProvider::new(&monitor, sink.clone());
        (monitor, provider, sink)
    }

    #[test]
    fn test_create_logger_is_cached() {
        let (_monitor, provider, _) = setup();
        let a = provider.create_logger("A");
        let again = provider.create_logger("A");
        let lower = provider.create_logger("a");
        let other = provider.create_logger("B");

        assert!(Arc::ptr_eq(&a, &again));
        assert!(Arc::ptr_eq(&a, &lower));
        assert!(!Arc::ptr_eq(&a, &other));
        assert_eq!("A", lower.name());
        assert_eq!(2, provider.logger_count());
    }

    #[test]
    fn test_configuration_change_reaches_existing_loggers() {
        let (monitor, provider, sink) = setup();
        let logger = provider.create_logger("Physics");
        assert!(!logger.is_enabled(LogLevel::Warning));

        let mut updated = LoggerConfiguration::with_colors([(LogLevel::Warning, Color::YELLOW)]);
        updated.event_id = 3;
        monitor.set(updated);

        assert!(logger.is_enabled(LogLevel::Warning));
        assert!(!logger.is_enabled(LogLevel::Information));
        assert_eq!(3, provider.current_configuration().event_id);

        logger.log(LogLevel::Warning, EventId::new(3), None, format_args!("fast"), None);
        assert_eq!(vec!["<color=#FFEB04>Warning: </color> fast".to_string()], sink.texts());
    }

    #[test]
    fn test_configuration_is_replaced_not_merged() {
        let (monitor, provider, _) = setup();
        monitor.set(LoggerConfiguration::with_colors([(LogLevel::Error, Color::RED)]));
        let config = provider.current_configuration();
        assert_eq!(1, config.level_colors.len());
        assert_eq!(None, config.color(LogLevel::Information));
    }

    #[test]
    fn test_dispose() {
        let (monitor, provider, _) = setup();
        let before = provider.create_logger("Audio");
        assert_eq!(ProviderState::Active, provider.state());
        assert_eq!(1, monitor.subscriber_count());

        provider.dispose();
        provider.dispose();
        assert_eq!(ProviderState::Disposed, provider.state());
        assert_eq!(0, provider.logger_count());
        assert_eq!(0, monitor.subscriber_count());

        monitor.set(LoggerConfiguration::with_colors([(LogLevel::Error, Color::RED)]));
        assert!(before.is_enabled(LogLevel::Information));
        assert!(!before.is_enabled(LogLevel::Error));

        let after = provider.create_logger("Audio");
        assert!(!Arc::ptr_eq(&after, &provider.create_logger("Audio")));
        assert_eq!(0, provider.logger_count());
    }

    #[test]
    fn test_drop_unsubscribes() {
        let (monitor, provider, _) = setup();
        drop(provider);
        assert_eq!(0, monitor.subscriber_count());
    }

    #[test]
    fn test_follows_concurrent_sets() {
        let monitor = ConfigMonitor::new(LoggerConfiguration::default());
        // Runs ahead of the provider's own subscription.
        let _slow = monitor.on_change(|config: Arc<LoggerConfiguration>| {
            if config.event_id == 1 {
                std::thread::sleep(std::time::Duration::from_millis(100));
            }
        });
        let provider = ConsoleLoggerProvider::new(&monitor, Arc::new(MemorySink::new()));

        let first = {
            let monitor = monitor.clone();
            std::thread::spawn(move || {
                let mut config = LoggerConfiguration::default();
                config.event_id = 1;
                monitor.set(config);
            })
        };
        std::thread::sleep(std::time::Duration::from_millis(20));
        let mut config = LoggerConfiguration::default();
        config.event_id = 2;
        monitor.set(config);
        first.join().unwrap();

        assert_eq!(monitor.current(), provider.current_configuration());
    }

    #[test]
    fn test_new_during_concurrent_sets() {
        for _ in 0..50 {
            let monitor = ConfigMonitor::new(LoggerConfiguration::default());
            let setter = {
                let monitor = monitor.clone();
                std::thread::spawn(move || {
                    for event_id in 1..=20 {
                        let mut config = LoggerConfiguration::default();
                        config.event_id = event_id;
                        monitor.set(config);
                    }
                })
            };
            let provider = ConsoleLoggerProvider::new(&monitor, Arc::new(MemorySink::new()));
            setter.join().unwrap();

            assert_eq!(20, provider.current_configuration().event_id);
        }
    }

    #[test]
    fn test_concurrent_create_logger() {
        const THREADS: usize = 8;
        let (_monitor, provider, _) = setup();
        let provider = Arc::new(provider);
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|i| {
                let provider = Arc::clone(&provider);
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    let name = if i % 2 == 0 { "Renderer" } else { "RENDERER" };
                    provider.create_logger(name)
                })
            })
            .collect();

        let loggers: Vec<Arc<ConsoleLogger>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(loggers.iter().all(|logger| Arc::ptr_eq(logger, &loggers[0])));
        assert_eq!(1, provider.logger_count());
    }
}
