//! A logger that writes colored, level-tagged messages to a host console.
//!
//! A [`ConsoleLoggerProvider`] hands out one [`ConsoleLogger`] per category. A level is enabled
//! exactly when the current [`LoggerConfiguration`] assigns it a color, and every message is
//! written as `<color=#RRGGBB>Level: </color> message` to a [`ConsoleSink`]. Configuration changes
//! published through a [`ConfigMonitor`] reach all existing loggers.
//!
//! To route the `log` macros through the console, use [`ConsoleLoggingBuilder::init()`].

mod assets;
mod bridge;
mod config;
mod error;
mod ext;
mod filter;
mod logger;
pub mod markup;
mod provider;
mod sink;

pub use assets::{LogFilter, LogFilterAsset, LogLevelColor, LogLevelColorAsset};
pub use bridge::{ConsoleLogging, ConsoleLoggingBuilder, LogBridge};
pub use config::{ChangeSubscription, ConfigMonitor, LoggerConfiguration};
pub use error::{Error, Result};
pub use ext::ConsoleLoggerExt;
pub use filter::{CategoryFilter, FilterRule};
pub use logger::{ConsoleLogger, LoggerScope};
pub use markup::Markup;
pub use provider::{ConsoleLoggerProvider, ProviderState};
pub use sink::{
    describe_error, ConsoleEntry, ConsoleExceptionFn, ConsoleLogFn, ExternSink, MemorySink,
    WriterSink,
};
pub use ves_console_common::color::Color;
pub use ves_console_common::console::{ConsoleSink, LogContext};
pub use ves_console_common::log::{DisplayClass, EventId, LogLevel};
