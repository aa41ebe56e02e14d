//! [`ConsoleSink`] implementations.

use std::error::Error;
use std::io::Write;

use parking_lot::Mutex;
use ves_console_common::console::{ConsoleSink, LogContext};
use ves_console_common::log::DisplayClass;

use crate::markup::{self, Markup};

/// Engine function for writing a console line.
///
/// # Arguments
///
/// * `class`: The [`DisplayClass`] code.
/// * `tag_ptr`: A pointer to the start of the tag.
/// * `tag_len`: The length of the tag in bytes.
/// * `text_ptr`: A pointer to the start of the text.
/// * `text_len`: The length of the text in bytes.
pub type ConsoleLogFn = unsafe extern "C" fn(
    class: u32,
    tag_ptr: *const u8,
    tag_len: usize,
    text_ptr: *const u8,
    text_len: usize,
);

/// Engine function for reporting an exception.
///
/// # Arguments
///
/// * `ptr`: A pointer to the start of the exception text.
/// * `len`: The length of the text in bytes.
pub type ConsoleExceptionFn = unsafe extern "C" fn(ptr: *const u8, len: usize);

/// A sink that calls into the engine console through function pointers.
///
/// The context object is not forwarded; the engine has no way to interpret a Rust object.
#[derive(Clone, Copy, Debug)]
pub struct ExternSink {
    log_fn: ConsoleLogFn,
    exception_fn: ConsoleExceptionFn,
}

impl ExternSink {
    /// Creates a new instance.
    ///
    /// # Arguments
    ///
    /// * `log_fn`: The function pointer for writing console lines.
    /// * `exception_fn`: The function pointer for reporting exceptions.
    pub fn new(log_fn: ConsoleLogFn, exception_fn: ConsoleExceptionFn) -> Self {
        Self {
            log_fn,
            exception_fn,
        }
    }
}

impl ConsoleSink for ExternSink {
    fn log(&self, class: DisplayClass, tag: &str, text: &str, _context: LogContext<'_>) {
        unsafe {
            (self.log_fn)(
                class.into(),
                tag.as_ptr(),
                tag.len(),
                text.as_ptr(),
                text.len(),
            );
        }
    }

    fn log_exception(&self, error: &(dyn Error + 'static)) {
        let text = describe_error(error);
        unsafe {
            (self.exception_fn)(text.as_ptr(), text.len());
        }
    }
}

/// Renders an error with its chain of sources, one per line.
pub fn describe_error(error: &(dyn Error + 'static)) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        text.push_str("\ncaused by: ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

/// A sink that writes lines to an [`std::io::Write`], such as a terminal.
///
/// Lines look like `[warning] Physics: <text>`. Write errors are ignored, as there is nowhere left
/// to report them.
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: Mutex<W>,
    markup: Markup,
}

impl<W> WriterSink<W>
where
    W: Write + Send,
{
    /// Creates a new instance.
    ///
    /// # Arguments
    ///
    /// * `writer`: The target.
    /// * `markup`: What to do with color markup in the text.
    pub fn new(writer: W, markup: Markup) -> Self {
        Self {
            writer: Mutex::new(writer),
            markup,
        }
    }

    /// Consumes this instance and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl WriterSink<std::io::Stdout> {
    /// Creates a sink that writes to standard output.
    pub fn stdout(markup: Markup) -> Self {
        Self::new(std::io::stdout(), markup)
    }
}

impl<W> ConsoleSink for WriterSink<W>
where
    W: Write + Send,
{
    fn log(&self, class: DisplayClass, tag: &str, text: &str, _context: LogContext<'_>) {
        let text = markup::render(text, self.markup);
        let mut writer = self.writer.lock();
        let _ = writeln!(writer, "[{class}] {tag}: {text}");
        let _ = writer.flush();
    }

    fn log_exception(&self, error: &(dyn Error + 'static)) {
        let mut writer = self.writer.lock();
        let _ = writeln!(writer, "[exception] {}", describe_error(error));
        let _ = writer.flush();
    }
}

/// An entry recorded by a [`MemorySink`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConsoleEntry {
    Message {
        class: DisplayClass,
        tag: String,
        text: String,
        has_context: bool,
    },
    Exception {
        description: String,
    },
}

/// A sink that keeps everything in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<ConsoleEntry>>,
}

impl MemorySink {
    /// Creates a new instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieves a copy of all entries recorded so far.
    pub fn entries(&self) -> Vec<ConsoleEntry> {
        self.entries.lock().clone()
    }

    /// Removes and returns all entries recorded so far.
    pub fn take(&self) -> Vec<ConsoleEntry> {
        std::mem::take(&mut *self.entries.lock())
    }

    /// Retrieves the texts of all recorded messages.
    pub fn texts(&self) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .filter_map(|entry| match entry {
                ConsoleEntry::Message { text, .. } => Some(text.clone()),
                ConsoleEntry::Exception { .. } => None,
            })
            .collect()
    }

    /// Returns the number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl ConsoleSink for MemorySink {
    fn log(&self, class: DisplayClass, tag: &str, text: &str, context: LogContext<'_>) {
        self.entries.lock().push(ConsoleEntry::Message {
            class,
            tag: tag.to_owned(),
            text: text.to_owned(),
            has_context: context.is_some(),
        });
    }

    fn log_exception(&self, error: &(dyn Error + 'static)) {
        self.entries.lock().push(ConsoleEntry::Exception {
            description: describe_error(error),
        });
    }
}
