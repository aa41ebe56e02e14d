//! Designer-authored assets for the console logger.
//!
//! Assets are plain data. They are loaded once from `.ron` or `.json` files and converted into a
//! [`LoggerConfiguration`] or a [`CategoryFilter`]; the loggers never look at them directly.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use ves_console_common::color::Color;
use ves_console_common::log::LogLevel;

use crate::config::{load_file, LoggerConfiguration};
use crate::error::Result;
use crate::filter::CategoryFilter;

/// The color of one level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogLevelColor {
    #[serde(alias = "logLevel")]
    pub log_level: LogLevel,
    pub color: Color,
}

/// A list of level colors. Levels that are not listed are disabled.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LogLevelColorAsset {
    #[serde(default)]
    pub colors: Vec<LogLevelColor>,
}

impl LogLevelColorAsset {
    /// Loads the asset from a `.ron` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        load_file(path.as_ref())
    }

    /// Collects the colors into a map. For a level that is listed more than once, the last entry
    /// wins.
    pub fn level_colors(&self) -> HashMap<LogLevel, Color> {
        self.colors
            .iter()
            .map(|entry| (entry.log_level, entry.color))
            .collect()
    }

    /// Creates a configuration from this asset.
    ///
    /// # Arguments
    ///
    /// * `event_id`: The event id filter. `0` writes all events.
    pub fn to_configuration(&self, event_id: i32) -> LoggerConfiguration {
        LoggerConfiguration {
            event_id,
            level_colors: self.level_colors(),
        }
    }
}

/// The minimum level of one category.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct LogFilter {
    pub category: String,
    #[serde(alias = "logLevel")]
    pub log_level: LogLevel,
}

/// A list of category filters.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct LogFilterAsset {
    #[serde(default)]
    pub filters: Vec<LogFilter>,
}

impl LogFilterAsset {
    /// Loads the asset from a `.ron` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        load_file(path.as_ref())
    }

    /// Creates a [`CategoryFilter`] from this asset.
    pub fn to_filter(&self) -> CategoryFilter {
        CategoryFilter::from(self)
    }
}
