//! Shorthands for logging at a fixed level.
//!
//! Every shorthand forwards to [`ConsoleLoggerExt::log_message()`]. For each level there are five
//! variants:
//!
//! * `log_<level>(args)`
//! * `log_<level>_ctx(context, args)`
//! * `log_<level>_with_error(error, context, args)`
//! * `log_<level>_event(event_id, context, args)`
//! * `log_<level>_event_with_error(event_id, error, context, args)`
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use ves_console_logger::{ConfigMonitor, ConsoleLoggerExt, ConsoleLoggerProvider, MemorySink};
//!
//! let monitor = ConfigMonitor::default();
//! let provider = ConsoleLoggerProvider::new(&monitor, Arc::new(MemorySink::new()));
//! let logger = provider.create_logger("Game");
//! logger.log_information(format_args!("Loaded level {}", 3));
//! ```

use std::error::Error;
use std::fmt::Arguments;

use ves_console_common::console::LogContext;
use ves_console_common::log::{EventId, LogLevel};

use crate::logger::ConsoleLogger;

macro_rules! level_shorthands {
    ($($level:ident => $name:ident),* $(,)?) => {
        paste::paste! {
            /// Level shorthands for [`ConsoleLogger`].
            pub trait ConsoleLoggerExt {
                /// Writes a message. This is what all shorthands forward to.
                fn log_message(
                    &self,
                    level: LogLevel,
                    event_id: EventId,
                    error: Option<&(dyn Error + 'static)>,
                    context: LogContext<'_>,
                    args: Arguments<'_>,
                );

                $(
                    #[doc = "Writes a `" $level "` message."]
                    #[inline]
                    fn [<log_ $name>](&self, args: Arguments<'_>) {
                        self.log_message(LogLevel::$level, EventId::default(), None, None, args);
                    }

                    #[doc = "Writes a `" $level "` message that applies to an object."]
                    #[inline]
                    fn [<log_ $name _ctx>](&self, context: LogContext<'_>, args: Arguments<'_>) {
                        self.log_message(LogLevel::$level, EventId::default(), None, context, args);
                    }

                    #[doc = "Reports an error at `" $level "` level."]
                    #[inline]
                    fn [<log_ $name _with_error>](
                        &self,
                        error: &(dyn Error + 'static),
                        context: LogContext<'_>,
                        args: Arguments<'_>,
                    ) {
                        self.log_message(LogLevel::$level, EventId::default(), Some(error), context, args);
                    }

                    #[doc = "Writes a `" $level "` message for an event."]
                    #[inline]
                    fn [<log_ $name _event>](
                        &self,
                        event_id: impl Into<EventId>,
                        context: LogContext<'_>,
                        args: Arguments<'_>,
                    ) {
                        self.log_message(LogLevel::$level, event_id.into(), None, context, args);
                    }

                    #[doc = "Reports an error for an event at `" $level "` level."]
                    #[inline]
                    fn [<log_ $name _event_with_error>](
                        &self,
                        event_id: impl Into<EventId>,
                        error: &(dyn Error + 'static),
                        context: LogContext<'_>,
                        args: Arguments<'_>,
                    ) {
                        self.log_message(LogLevel::$level, event_id.into(), Some(error), context, args);
                    }
                )*
            }
        }
    };
}

level_shorthands!(
    Trace => trace,
    Debug => debug,
    Information => information,
    Warning => warning,
    Error => error,
    Critical => critical,
);

impl ConsoleLoggerExt for ConsoleLogger {
    fn log_message(
        &self,
        level: LogLevel,
        event_id: EventId,
        error: Option<&(dyn Error + 'static)>,
        context: LogContext<'_>,
        args: Arguments<'_>,
    ) {
        self.log(level, event_id, context, args, error);
    }
}

/// Writes a message to a [`ConsoleLogger`] with `format!`-style arguments.
///
/// # Examples
///
/// ```ignore
/// console_log!(logger, LogLevel::Warning, "Frame took {} ms", 40);
/// console_log!(logger, LogLevel::Information, event: 12, "Scene {} loaded", name);
/// ```
#[macro_export]
macro_rules! console_log {
    ($logger:expr, $level:expr, event: $event:expr, $($arg:tt)+) => {{
        use $crate::ConsoleLoggerExt as _;
        $logger.log_message(
            $level,
            ::core::convert::Into::into($event),
            None,
            None,
            format_args!($($arg)+),
        )
    }};
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        use $crate::ConsoleLoggerExt as _;
        $logger.log_message(
            $level,
            $crate::EventId::default(),
            None,
            None,
            format_args!($($arg)+),
        )
    }};
}

#[macro_export]
macro_rules! console_trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::console_log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

#[macro_export]
macro_rules! console_debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::console_log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! console_info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::console_log!($logger, $crate::LogLevel::Information, $($arg)+)
    };
}

#[macro_export]
macro_rules! console_warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::console_log!($logger, $crate::LogLevel::Warning, $($arg)+)
    };
}

#[macro_export]
macro_rules! console_error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::console_log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

#[macro_export]
macro_rules! console_critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::console_log!($logger, $crate::LogLevel::Critical, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigMonitor, LoggerConfiguration};
    use crate::provider::ConsoleLoggerProvider;
    use crate::sink::{ConsoleEntry, MemorySink};
    use std::sync::Arc;
    use ves_console_common::color::Color;
    use ves_console_common::log::DisplayClass;

    #[derive(Debug)]
    struct Timeout;

    impl std::fmt::Display for Timeout {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("timed out")
        }
    }

    impl Error for Timeout {}

    fn setup(event_id: i32) -> (ConfigMonitor<LoggerConfiguration>, ConsoleLoggerProvider, Arc<MemorySink>) {
        let mut config = LoggerConfiguration::with_colors(
            LogLevel::ALL.into_iter().map(|level| (level, Color::WHITE)),
        );
        config.event_id = event_id;
        let monitor = ConfigMonitor::new(config);
        let sink = Arc::new(MemorySink::new());
        let provider = ConsoleLoggerProvider::new(&monitor, sink.clone());
        (monitor, provider, sink)
    }

    #[test]
    fn test_level_shorthands() {
        let (_monitor, provider, sink) = setup(0);
        let logger = provider.create_logger("Game");

        logger.log_trace(format_args!("t"));
        logger.log_debug(format_args!("d"));
        logger.log_information(format_args!("i"));
        logger.log_warning(format_args!("w"));
        logger.log_error(format_args!("e"));
        logger.log_critical(format_args!("c"));

        assert_eq!(
            vec![
                "<color=#FFFFFF>Trace: </color> t",
                "<color=#FFFFFF>Debug: </color> d",
                "<color=#FFFFFF>Information: </color> i",
                "<color=#FFFFFF>Warning: </color> w",
                "<color=#FFFFFF>Error: </color> e",
                "<color=#FFFFFF>Critical: </color> c",
            ],
            sink.texts()
        );
    }

    #[test]
    fn test_context_and_error_variants() {
        let (_monitor, provider, sink) = setup(0);
        let logger = provider.create_logger("Net");
        let session = String::from("session-1");

        logger.log_warning_ctx(Some(&session), format_args!("lagging"));
        logger.log_error_with_error(&Timeout, None, format_args!("dropped"));

        assert_eq!(
            vec![
                ConsoleEntry::Message {
                    class: DisplayClass::Warning,
                    tag: "Net".into(),
                    text: "<color=#FFFFFF>Warning: </color> lagging".into(),
                    has_context: true,
                },
                ConsoleEntry::Exception {
                    description: "timed out".into(),
                },
            ],
            sink.entries()
        );
    }

    #[test]
    fn test_event_variants() {
        let (_monitor, provider, sink) = setup(4);
        let logger = provider.create_logger("Save");

        logger.log_information_event(3, None, format_args!("skipped"));
        logger.log_information_event(EventId::with_name(4, "Saved"), None, format_args!("saved"));
        logger.log_critical_event_with_error(3, &Timeout, None, format_args!("lost"));

        assert_eq!(2, sink.len());
        assert_eq!(vec!["<color=#FFFFFF>Information: </color> saved".to_string()], sink.texts());
    }

    #[test]
    fn test_macros() {
        let (_monitor, provider, sink) = setup(0);
        let logger = provider.create_logger("Macro");

        crate::console_log!(logger, LogLevel::Debug, "{} + {}", 1, 2);
        crate::console_info!(logger, "frame {}", 60);
        crate::console_warn!(logger, event: 9, "late by {}ms", 4);
        crate::console_critical!(&logger, "out of memory");

        assert_eq!(
            vec![
                "<color=#FFFFFF>Debug: </color> 1 + 2",
                "<color=#FFFFFF>Information: </color> frame 60",
                "<color=#FFFFFF>Warning: </color> late by 4ms",
                "<color=#FFFFFF>Critical: </color> out of memory",
            ],
            sink.texts()
        );
    }
}
