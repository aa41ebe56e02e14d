use std::borrow::Cow;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[cfg_attr(
    feature = "serde_support",
    derive(serde::Serialize, serde::Deserialize)
)]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum LogLevel {
    /// The "trace" level.
    ///
    /// Designates very low priority, often extremely verbose, information.
    Trace,
    /// The "debug" level.
    ///
    /// Designates lower priority information.
    Debug,
    /// The "information" level.
    ///
    /// Designates useful information.
    Information,
    /// The "warning" level.
    ///
    /// Designates hazardous situations.
    Warning,
    /// The "error" level.
    ///
    /// Designates very serious errors.
    Error,
    /// The "critical" level.
    ///
    /// Designates failures that require immediate attention.
    Critical,
    /// Not a level to log at. Used as a minimum level to switch a category off entirely.
    None,
}

impl LogLevel {
    /// All levels that messages can be logged at, from least to most severe.
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Information,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Critical,
    ];

    /// Retrieves the level name as it appears in console output.
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Trace => "Trace",
            LogLevel::Debug => "Debug",
            LogLevel::Information => "Information",
            LogLevel::Warning => "Warning",
            LogLevel::Error => "Error",
            LogLevel::Critical => "Critical",
            LogLevel::None => "None",
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    /// Parses a level from its name. Both the full names and the short names of the `log` crate
    /// are accepted, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level = match s.trim().to_ascii_lowercase().as_str() {
            "trace" => LogLevel::Trace,
            "debug" => LogLevel::Debug,
            "information" | "info" => LogLevel::Information,
            "warning" | "warn" => LogLevel::Warning,
            "error" => LogLevel::Error,
            "critical" => LogLevel::Critical,
            "none" => LogLevel::None,
            _ => return Err(format!("Invalid LogLevel name: {s}.")),
        };
        Ok(level)
    }
}

impl TryFrom<u32> for LogLevel {
    type Error = String;
    fn try_from(val: u32) -> Result<Self, <LogLevel as TryFrom<u32>>::Error> {
        match val {
            0 => Ok(LogLevel::Trace),
            1 => Ok(LogLevel::Debug),
            2 => Ok(LogLevel::Information),
            3 => Ok(LogLevel::Warning),
            4 => Ok(LogLevel::Error),
            5 => Ok(LogLevel::Critical),
            6 => Ok(LogLevel::None),
            val => Err(format!("Invalid LogLevel value: {val}.")),
        }
    }
}

impl From<LogLevel> for u32 {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => 0,
            LogLevel::Debug => 1,
            LogLevel::Information => 2,
            LogLevel::Warning => 3,
            LogLevel::Error => 4,
            LogLevel::Critical => 5,
            LogLevel::None => 6,
        }
    }
}

impl From<::log::Level> for LogLevel {
    fn from(level: ::log::Level) -> Self {
        match level {
            ::log::Level::Error => LogLevel::Error,
            ::log::Level::Warn => LogLevel::Warning,
            ::log::Level::Info => LogLevel::Information,
            ::log::Level::Debug => LogLevel::Debug,
            ::log::Level::Trace => LogLevel::Trace,
        }
    }
}

impl From<LogLevel> for ::log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => ::log::LevelFilter::Trace,
            LogLevel::Debug => ::log::LevelFilter::Debug,
            LogLevel::Information => ::log::LevelFilter::Info,
            LogLevel::Warning => ::log::LevelFilter::Warn,
            LogLevel::Error | LogLevel::Critical => ::log::LevelFilter::Error,
            LogLevel::None => ::log::LevelFilter::Off,
        }
    }
}

/// Identifies a logging event.
///
/// The numeric id is what event filtering looks at; the name is informational.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct EventId {
    id: i32,
    name: Option<Cow<'static, str>>,
}

impl EventId {
    /// Creates a new instance without a name.
    pub const fn new(id: i32) -> Self {
        Self { id, name: None }
    }

    /// Creates a new named instance.
    pub fn with_name(id: i32, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            id,
            name: Some(name.into()),
        }
    }

    /// Retrieves the numeric id.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Retrieves the name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl From<i32> for EventId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl Display for EventId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}({})", self.id, name),
            None => write!(f, "{}", self.id),
        }
    }
}

/// How the console badges a line.
///
/// This is independent of the color markup inside the text.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum DisplayClass {
    Info,
    Warning,
    Error,
}

impl DisplayClass {
    /// Determines the display class for a level.
    ///
    /// `Error` and `Critical` are shown as errors, `Warning` as a warning and everything else as
    /// plain information.
    pub fn for_level(level: LogLevel) -> Self {
        match level {
            LogLevel::Error | LogLevel::Critical => DisplayClass::Error,
            LogLevel::Warning => DisplayClass::Warning,
            _ => DisplayClass::Info,
        }
    }
}

impl Display for DisplayClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let string = match self {
            DisplayClass::Info => "info",
            DisplayClass::Warning => "warning",
            DisplayClass::Error => "error",
        };
        f.write_str(string)
    }
}

impl From<LogLevel> for DisplayClass {
    fn from(level: LogLevel) -> Self {
        Self::for_level(level)
    }
}

/// The log type codes of the engine console.
impl From<DisplayClass> for u32 {
    fn from(class: DisplayClass) -> Self {
        match class {
            DisplayClass::Error => 0,
            DisplayClass::Warning => 2,
            DisplayClass::Info => 3,
        }
    }
}



#[cfg(test)]
mod tests_display_class {
    use super::{DisplayClass, LogLevel};

    #[test]
    fn test_for_level() {
        assert_eq!(DisplayClass::Info, DisplayClass::for_level(LogLevel::Trace));
        assert_eq!(DisplayClass::Info, DisplayClass::for_level(LogLevel::Debug));
        assert_eq!(DisplayClass::Info, DisplayClass::for_level(LogLevel::Information));
        assert_eq!(DisplayClass::Warning, DisplayClass::for_level(LogLevel::Warning));
        assert_eq!(DisplayClass::Error, DisplayClass::for_level(LogLevel::Error));
        assert_eq!(DisplayClass::Error, DisplayClass::for_level(LogLevel::Critical));
    }

    #[test]
    fn test_codes() {
        assert_eq!(0u32, u32::from(DisplayClass::Error));
        assert_eq!(2u32, u32::from(DisplayClass::Warning));
        assert_eq!(3u32, u32::from(DisplayClass::Info));
    }
}
