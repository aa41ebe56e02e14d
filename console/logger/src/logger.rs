use std::error::Error;
use std::fmt::{Arguments, Write};
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use ves_console_common::console::{ConsoleSink, LogContext};
use ves_console_common::log::{DisplayClass, EventId, LogLevel};

use crate::config::LoggerConfiguration;
use crate::markup;

/// A logger for one category.
///
/// Loggers are created by a [`ConsoleLoggerProvider`](crate::ConsoleLoggerProvider). They do not
/// keep a copy of the configuration but look at the provider's current configuration on every call,
/// so a reload takes effect without creating new loggers.
pub struct ConsoleLogger {
    name: String,
    config: Arc<ArcSwap<LoggerConfiguration>>,
    sink: Arc<dyn ConsoleSink>,
    buffer: Mutex<String>,
}

/// A logging scope. The console has no notion of scopes, so none are ever created.
#[derive(Debug)]
pub enum LoggerScope {}

impl ConsoleLogger {
    /// Creates a new instance.
    ///
    /// # Arguments
    ///
    /// * `name`: The category name.
    /// * `config`: The configuration accessor shared with the provider.
    /// * `sink`: The console to write to.
    pub(crate) fn new(
        name: impl Into<String>,
        config: Arc<ArcSwap<LoggerConfiguration>>,
        sink: Arc<dyn ConsoleSink>,
    ) -> Self {
        Self {
            name: name.into(),
            config,
            sink,
            buffer: Mutex::new(String::new()),
        }
    }

    /// Retrieves the category name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Determines whether messages of a level are written.
    ///
    /// A level is enabled exactly when the current configuration has a color for it.
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        self.config.load().level_colors.contains_key(&level)
    }

    /// Determines whether a message of a level and event would be written, given the current
    /// configuration.
    pub fn is_event_enabled(&self, level: LogLevel, event_id: &EventId) -> bool {
        let config = self.config.load();
        config.level_colors.contains_key(&level) && passes_event_filter(&config, event_id)
    }

    /// Begins a logging scope. Always returns `None`.
    pub fn begin_scope<S>(&self, _state: S) -> Option<LoggerScope> {
        None
    }

    /// Writes a message.
    ///
    /// # Arguments
    ///
    /// * `level`: The level.
    /// * `event_id`: The event id.
    /// * `context`: The object the message applies to.
    /// * `args`: The message.
    /// * `error`: An error to report. If present, only the error is reported and the message is
    ///            discarded.
    pub fn log(
        &self,
        level: LogLevel,
        event_id: EventId,
        context: LogContext<'_>,
        args: Arguments<'_>,
        error: Option<&(dyn Error + 'static)>,
    ) {
        self.write(level, &event_id, context, error, |buffer| {
            let _ = buffer.write_fmt(args);
        });
    }

    /// Writes a message that is rendered from a state value.
    ///
    /// The formatter is only called if the message is actually written. Since errors are reported
    /// separately, the formatter always receives `None` for the error.
    pub fn log_state<S, F>(
        &self,
        level: LogLevel,
        event_id: EventId,
        context: LogContext<'_>,
        state: S,
        error: Option<&(dyn Error + 'static)>,
        formatter: F,
    ) where
        F: FnOnce(&S, Option<&(dyn Error + 'static)>) -> String,
    {
        self.write(level, &event_id, context, error, |buffer| {
            buffer.push_str(&formatter(&state, None));
        });
    }

    fn write(
        &self,
        level: LogLevel,
        event_id: &EventId,
        context: LogContext<'_>,
        error: Option<&(dyn Error + 'static)>,
        render: impl FnOnce(&mut String),
    ) {
        let config = self.config.load();
        let color = match config.level_colors.get(&level) {
            Some(color) => color,
            None => return,
        };

        if let Some(error) = error {
            self.sink.log_exception(error);
            return;
        }

        if !passes_event_filter(&config, event_id) {
            return;
        }

        let class = DisplayClass::for_level(level);

        // A re-entrant or concurrent call gets a buffer of its own.
        let mut local = String::new();
        let mut guard = self.buffer.try_lock();
        let buffer = match guard.as_deref_mut() {
            Some(buffer) => buffer,
            None => &mut local,
        };

        buffer.clear();
        let _ = markup::write_open_tag(&mut *buffer, color);
        buffer.push_str(level.name());
        buffer.push_str(": ");
        buffer.push_str(markup::CLOSE_TAG);
        buffer.push(' ');
        render(&mut *buffer);

        self.sink.log(class, &self.name, buffer.as_str(), context);
    }
}

fn passes_event_filter(config: &LoggerConfiguration, event_id: &EventId) -> bool {
    config.event_id == 0 || config.event_id == event_id.id()
}

impl std::fmt::Debug for ConsoleLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleLogger")
            .field("name", &self.name)
            .field("config", &self.config.load_full())
            .finish()
    }
}
