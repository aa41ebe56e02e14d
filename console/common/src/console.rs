use std::any::Any;
use std::error::Error;

use crate::log::DisplayClass;

/// An object that a console line applies to, like a scene object the engine can highlight when the
/// line is selected.
///
/// The logger never inspects the context; it is handed to the [`ConsoleSink`] unchanged.
pub type LogContext<'a> = Option<&'a (dyn Any + Send + Sync)>;

/// The console API of the engine.
///
/// Implementations must be `Send + Sync`, since one sink is shared by every logger of a provider.
pub trait ConsoleSink: Send + Sync {
    /// Writes a line to the console.
    ///
    /// # Arguments
    ///
    /// * `class`: How the console should badge the line.
    /// * `tag`: The tag of the line. This is the category of the logger.
    /// * `text`: The text, including color markup.
    /// * `context`: The object the line applies to.
    fn log(&self, class: DisplayClass, tag: &str, text: &str, context: LogContext<'_>);

    /// Reports an error through the console's dedicated exception path.
    ///
    /// # Arguments
    ///
    /// * `error`: The error, including its chain of sources.
    fn log_exception(&self, error: &(dyn Error + 'static));
}
