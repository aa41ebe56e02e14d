//! Replaying log scripts.
//!
//! A script has one message per line: `level category event-id message`. Blank lines and lines
//! starting with `#` are skipped. A line `@colors <path>` loads a color asset and makes it the
//! current configuration, which all loggers pick up from the next line on.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use ves_console_logger::{ConsoleLogging, EventId, LogLevel, LogLevelColorAsset};

/// One parsed script line.
#[derive(Debug, Eq, PartialEq)]
pub enum ScriptLine<'a> {
    Skip,
    Colors(&'a str),
    Message {
        level: LogLevel,
        category: &'a str,
        event_id: i32,
        message: &'a str,
    },
}

/// Splits off the first whitespace-separated field.
fn next_field(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();
    if text.is_empty() {
        return None;
    }
    Some(match text.split_once(char::is_whitespace) {
        Some((field, rest)) => (field, rest.trim_start()),
        None => (text, ""),
    })
}

/// Parses a script line.
pub fn parse_line(line: &str) -> anyhow::Result<ScriptLine<'_>> {
    let line = line.trim_end();
    if line.trim_start().is_empty() || line.trim_start().starts_with('#') {
        return Ok(ScriptLine::Skip);
    }

    let (first, rest) = next_field(line).ok_or_else(|| anyhow!("empty line"))?;
    if first == "@colors" {
        if rest.is_empty() {
            bail!("@colors needs a path");
        }
        return Ok(ScriptLine::Colors(rest));
    }

    let level = first
        .parse::<LogLevel>()
        .map_err(|e| anyhow!("invalid level {first:?}: {e}"))?;
    let (category, rest) = next_field(rest).ok_or_else(|| anyhow!("missing category"))?;
    let (event_id, message) = next_field(rest).ok_or_else(|| anyhow!("missing event id"))?;
    let event_id = event_id
        .parse::<i32>()
        .with_context(|| format!("invalid event id {event_id:?}"))?;

    Ok(ScriptLine::Message {
        level,
        category,
        event_id,
        message,
    })
}

/// Counters for a finished replay.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ReplayStats {
    /// Messages that reached the console.
    pub written: usize,
    /// Messages rejected by the category filter.
    pub filtered: usize,
    /// Messages whose level has no color or whose event id does not match.
    pub disabled: usize,
    pub reloads: usize,
    pub invalid: usize,
}

/// Plays a script through the loggers of a [`ConsoleLogging`] setup.
///
/// Messages that are not written, whether through the category filter or the configuration, are
/// counted separately. Invalid lines are reported and skipped. A failing `@colors` reload keeps the current
/// configuration.
///
/// # Arguments
///
/// * `script`: The script source.
/// * `logging`: The logger setup to write to.
/// * `event_id`: The event id filter to use with reloaded color assets.
/// * `base_dir`: The directory that relative `@colors` paths are resolved against.
pub fn replay(
    script: impl BufRead,
    logging: &ConsoleLogging,
    event_id: i32,
    base_dir: &Path,
) -> anyhow::Result<ReplayStats> {
    let mut stats = ReplayStats::default();

    for (index, line) in script.lines().enumerate() {
        let line = line.context("could not read the script")?;
        let number = index + 1;

        match parse_line(&line) {
            Ok(ScriptLine::Skip) => {}
            Ok(ScriptLine::Colors(path)) => {
                let path = resolve(base_dir, path);
                match LogLevelColorAsset::load(&path) {
                    Ok(asset) => {
                        logging.monitor().set(asset.to_configuration(event_id));
                        stats.reloads += 1;
                        log::info!("Line {number}: loaded colors from {}.", path.display());
                    }
                    Err(e) => {
                        stats.invalid += 1;
                        log::warn!("Line {number}: {e}");
                    }
                }
            }
            Ok(ScriptLine::Message {
                level,
                category,
                event_id,
                message,
            }) => {
                if !logging.filter().allows(category, level) {
                    stats.filtered += 1;
                    continue;
                }
                let logger = logging.provider().create_logger(category);
                let event_id = EventId::new(event_id);
                if !logger.is_event_enabled(level, &event_id) {
                    stats.disabled += 1;
                    continue;
                }
                logger.log(level, event_id, None, format_args!("{message}"), None);
                stats.written += 1;
            }
            Err(e) => {
                stats.invalid += 1;
                log::warn!("Line {number}: {e:#}");
            }
        }
    }

    Ok(stats)
}

fn resolve(base_dir: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}
