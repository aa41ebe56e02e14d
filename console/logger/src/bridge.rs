//! Registration of the console logger with the `log` framework.

use std::sync::Arc;

use log::{LevelFilter, Log, Metadata, Record};
use ves_console_common::console::ConsoleSink;
use ves_console_common::log::{EventId, LogLevel};

use crate::config::{ConfigMonitor, LoggerConfiguration};
use crate::error::Result;
use crate::filter::CategoryFilter;
use crate::provider::ConsoleLoggerProvider;

/// Forwards records of the `log` framework to a [`ConsoleLoggerProvider`].
///
/// The record target is used as the category. Records carry no event id, so they are written with
/// event id `0`.
#[derive(Clone, Debug)]
pub struct LogBridge {
    provider: Arc<ConsoleLoggerProvider>,
    filter: Arc<CategoryFilter>,
}

impl LogBridge {
    /// Creates a new instance.
    pub fn new(provider: Arc<ConsoleLoggerProvider>, filter: Arc<CategoryFilter>) -> Self {
        Self { provider, filter }
    }

    fn passes(&self, category: &str, level: LogLevel) -> bool {
        self.filter.allows(category, level)
    }
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let level = LogLevel::from(metadata.level());
        self.passes(metadata.target(), level)
            && self.provider.create_logger(metadata.target()).is_enabled(level)
    }

    fn log(&self, record: &Record) {
        let level = LogLevel::from(record.level());
        if !self.passes(record.target(), level) {
            return;
        }

        self.provider.create_logger(record.target()).log(
            level,
            EventId::default(),
            None,
            *record.args(),
            None,
        );
    }

    fn flush(&self) {
        // Do nothing
    }
}

/// Sets up a [`ConsoleLoggerProvider`] and, optionally, registers it with the `log` framework.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use ves_console_logger::{Color, ConsoleLoggingBuilder, LogLevel, Markup, WriterSink};
///
/// let logging = ConsoleLoggingBuilder::new(Arc::new(WriterSink::stdout(Markup::Ansi)))
///     .configure(|config| {
///         config.level_colors.insert(LogLevel::Warning, Color::YELLOW);
///     })
///     .init()
///     .unwrap();
///
/// log::warn!("Frame budget exceeded.");
/// logging.provider().dispose();
/// ```
pub struct ConsoleLoggingBuilder {
    sink: Arc<dyn ConsoleSink>,
    monitor: Option<ConfigMonitor<LoggerConfiguration>>,
    configure: Vec<Box<dyn FnOnce(&mut LoggerConfiguration)>>,
    filter: CategoryFilter,
}

impl ConsoleLoggingBuilder {
    /// Creates a new instance.
    ///
    /// # Arguments
    ///
    /// * `sink`: The console to write to.
    pub fn new(sink: Arc<dyn ConsoleSink>) -> Self {
        Self {
            sink,
            monitor: None,
            configure: Vec::new(),
            filter: CategoryFilter::new(),
        }
    }

    /// Uses an existing configuration monitor. Without one, a monitor holding the default
    /// configuration is created.
    pub fn monitor(mut self, monitor: ConfigMonitor<LoggerConfiguration>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    /// Adjusts the initial configuration. Callbacks run in the order they were added.
    pub fn configure(mut self, configure: impl FnOnce(&mut LoggerConfiguration) + 'static) -> Self {
        self.configure.push(Box::new(configure));
        self
    }

    /// Sets the per-category filter.
    pub fn filter(mut self, filter: CategoryFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Creates the provider without touching the global logger.
    pub fn build(self) -> ConsoleLogging {
        let monitor = self.monitor.unwrap_or_default();
        if !self.configure.is_empty() {
            let mut config = LoggerConfiguration::clone(&monitor.current());
            for configure in self.configure {
                configure(&mut config);
            }
            monitor.set(config);
        }

        let provider = Arc::new(ConsoleLoggerProvider::new(&monitor, self.sink));
        ConsoleLogging {
            provider,
            monitor,
            filter: Arc::new(self.filter),
        }
    }

    /// Creates the provider and installs it as the global logger of the `log` framework.
    ///
    /// This fails if a global logger has already been installed.
    pub fn init(self) -> Result<ConsoleLogging> {
        let logging = self.build();
        log::set_boxed_logger(Box::new(logging.bridge()))?;
        log::set_max_level(LevelFilter::Trace);
        Ok(logging)
    }
}

/// A configured console logger setup.
#[derive(Debug)]
pub struct ConsoleLogging {
    provider: Arc<ConsoleLoggerProvider>,
    monitor: ConfigMonitor<LoggerConfiguration>,
    filter: Arc<CategoryFilter>,
}

impl ConsoleLogging {
    /// Retrieves the provider.
    pub fn provider(&self) -> &Arc<ConsoleLoggerProvider> {
        &self.provider
    }

    /// Retrieves the configuration monitor. Setting a new configuration on it reconfigures all
    /// loggers.
    pub fn monitor(&self) -> &ConfigMonitor<LoggerConfiguration> {
        &self.monitor
    }

    /// Retrieves the category filter.
    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    /// Creates a `log` framework adapter for the provider.
    pub fn bridge(&self) -> LogBridge {
        LogBridge::new(Arc::clone(&self.provider), Arc::clone(&self.filter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{ConsoleEntry, MemorySink};
    use ves_console_common::color::Color;
    use ves_console_common::log::DisplayClass;

    fn record_log(bridge: &LogBridge, target: &str, level: log::Level, message: &str) {
        bridge.log(
            &Record::builder()
                .target(target)
                .level(level)
                .args(format_args!("{message}"))
                .build(),
        );
    }

    #[test]
    fn test_configure() {
        let logging = ConsoleLoggingBuilder::new(Arc::new(MemorySink::new()))
            .configure(|config| {
                config.level_colors.insert(LogLevel::Warning, Color::YELLOW);
            })
            .configure(|config| config.event_id = 8)
            .build();

        let config = logging.provider().current_configuration();
        assert_eq!(8, config.event_id);
        assert_eq!(Some(&Color::GREEN), config.color(LogLevel::Information));
        assert_eq!(Some(&Color::YELLOW), config.color(LogLevel::Warning));
        assert_eq!(config, logging.monitor().current());
    }

    #[test]
    fn test_bridge_forwards_records() {
        let sink = Arc::new(MemorySink::new());
        let logging = ConsoleLoggingBuilder::new(sink.clone())
            .configure(|config| {
                config.level_colors.insert(LogLevel::Error, Color::RED);
            })
            .build();
        let bridge = logging.bridge();

        record_log(&bridge, "game::save", log::Level::Info, "saved");
        record_log(&bridge, "game::save", log::Level::Debug, "not enabled");
        record_log(&bridge, "game::save", log::Level::Error, "disk full");

        assert_eq!(
            vec![
                ConsoleEntry::Message {
                    class: DisplayClass::Info,
                    tag: "game::save".into(),
                    text: "<color=#00FF00>Information: </color> saved".into(),
                    has_context: false,
                },
                ConsoleEntry::Message {
                    class: DisplayClass::Error,
                    tag: "game::save".into(),
                    text: "<color=#FF0000>Error: </color> disk full".into(),
                    has_context: false,
                },
            ],
            sink.entries()
        );
    }

    #[test]
    fn test_bridge_applies_category_filter() {
        let sink = Arc::new(MemorySink::new());
        let logging = ConsoleLoggingBuilder::new(sink.clone())
            .filter(CategoryFilter::new().with_rule("noisy", LogLevel::Warning))
            .build();
        let bridge = logging.bridge();

        fn info(target: &str) -> Metadata<'_> {
            Metadata::builder().target(target).level(log::Level::Info).build()
        }
        assert!(!bridge.enabled(&info("noisy::ticker")));
        assert!(bridge.enabled(&info("quiet")));

        record_log(&bridge, "noisy::ticker", log::Level::Info, "tick");
        record_log(&bridge, "quiet", log::Level::Info, "hello");
        assert_eq!(vec!["<color=#00FF00>Information: </color> hello".to_string()], sink.texts());
    }

    #[test]
    fn test_shared_monitor() {
        let monitor = ConfigMonitor::new(LoggerConfiguration::default());
        let logging = ConsoleLoggingBuilder::new(Arc::new(MemorySink::new()))
            .monitor(monitor.clone())
            .build();

        monitor.set(LoggerConfiguration::with_colors([(LogLevel::Trace, Color::GREY)]));
        let logger = logging.provider().create_logger("Any");
        assert!(logger.is_enabled(LogLevel::Trace));
        assert!(!logger.is_enabled(LogLevel::Information));
    }
}
