mod replay;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::{Args, Parser, Subcommand};
use ves_console_logger::{
    CategoryFilter, ConfigMonitor, ConsoleLogging, ConsoleLoggingBuilder, EventId,
    LogFilterAsset, LogLevel, LogLevelColorAsset, LoggerConfiguration, Markup, WriterSink,
};

/// Tool for trying out console logger assets in a terminal.
#[derive(Parser, Debug)]
#[clap(version)]
struct ConsoleCli {
    #[clap(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    Emit(EmitArgs),
    Replay(ReplayArgs),
    Check(CheckArgs),
}

/// Options shared by all commands that write to the console.
#[derive(Args, Debug)]
struct SetupArgs {
    /// The level color asset (`.ron` or `.json`). Without it, only `Information` is enabled.
    #[clap(long)]
    colors: Option<PathBuf>,
    /// The category filter asset (`.ron` or `.json`).
    #[clap(long)]
    filters: Option<PathBuf>,
    /// Only write messages with this event id. `0` writes all.
    #[clap(long, default_value_t = 0, allow_hyphen_values = true)]
    event_id: i32,
    /// What to do with color markup: keep, strip or ansi.
    #[clap(long, default_value = "ansi")]
    markup: Markup,
}

/// Writes a single message.
#[derive(Args, Debug)]
struct EmitArgs {
    #[clap(flatten)]
    setup: SetupArgs,
    /// The message level.
    #[clap(long, default_value = "information")]
    level: LogLevel,
    /// The logger category.
    #[clap(long, default_value = "Console")]
    category: String,
    /// The event id of the message.
    #[clap(long, default_value_t = 0, allow_hyphen_values = true)]
    event: i32,
    /// The message text.
    #[clap(name = "MESSAGE", required = true)]
    message: Vec<String>,
}

/// Plays a log script. Each line reads `level category event-id message`.
#[derive(Args, Debug)]
struct ReplayArgs {
    #[clap(flatten)]
    setup: SetupArgs,
    /// The script to play.
    #[clap(name = "FILE")]
    path: PathBuf,
}

/// Validates assets and prints what they configure.
#[derive(Args, Debug)]
struct CheckArgs {
    /// The level color asset.
    #[clap(long)]
    colors: Option<PathBuf>,
    /// The category filter asset.
    #[clap(long)]
    filters: Option<PathBuf>,
}

fn load_configuration(path: Option<&Path>, event_id: i32) -> anyhow::Result<LoggerConfiguration> {
    Ok(match path {
        Some(path) => LogLevelColorAsset::load(path)
            .with_context(|| format!("could not load colors from {}", path.display()))?
            .to_configuration(event_id),
        None => LoggerConfiguration {
            event_id,
            ..LoggerConfiguration::default()
        },
    })
}

fn load_filter(path: Option<&Path>) -> anyhow::Result<CategoryFilter> {
    Ok(match path {
        Some(path) => LogFilterAsset::load(path)
            .with_context(|| format!("could not load filters from {}", path.display()))?
            .to_filter(),
        None => CategoryFilter::new(),
    })
}

fn init_logging(setup: &SetupArgs) -> anyhow::Result<ConsoleLogging> {
    let monitor = ConfigMonitor::new(load_configuration(setup.colors.as_deref(), setup.event_id)?);
    let logging = ConsoleLoggingBuilder::new(Arc::new(WriterSink::stdout(setup.markup)))
        .monitor(monitor)
        .filter(load_filter(setup.filters.as_deref())?)
        .init()?;
    Ok(logging)
}

fn emit(args: &EmitArgs) -> anyhow::Result<()> {
    let logging = init_logging(&args.setup)?;
    let message = args.message.join(" ");

    if !logging.filter().allows(&args.category, args.level) {
        log::debug!("Category {} filters out {} messages.", args.category, args.level);
        return Ok(());
    }

    let logger = logging.provider().create_logger(&args.category);
    let event_id = EventId::new(args.event);
    if !logger.is_event_enabled(args.level, &event_id) {
        log::debug!("{} messages with event id {} are disabled.", args.level, args.event);
    }
    logger.log(args.level, event_id, None, format_args!("{message}"), None);
    Ok(())
}

fn replay_file(args: &ReplayArgs) -> anyhow::Result<()> {
    let logging = init_logging(&args.setup)?;
    let file = File::open(&args.path)
        .with_context(|| format!("could not open {}", args.path.display()))?;
    let base_dir = args.path.parent().unwrap_or_else(|| Path::new("."));

    let stats = replay::replay(BufReader::new(file), &logging, args.setup.event_id, base_dir)?;
    log::info!(
        "Wrote {} messages ({} filtered, {} disabled, {} reloads, {} invalid lines).",
        stats.written,
        stats.filtered,
        stats.disabled,
        stats.reloads,
        stats.invalid
    );
    logging.provider().dispose();
    Ok(())
}

fn check(args: &CheckArgs) -> anyhow::Result<()> {
    if args.colors.is_none() && args.filters.is_none() {
        return Err(anyhow!("nothing to check; pass --colors and/or --filters"));
    }

    if let Some(path) = &args.colors {
        let config = load_configuration(Some(path.as_path()), 0)?;
        println!("{}: {} enabled levels", path.display(), config.level_colors.len());
        for level in LogLevel::ALL {
            match config.color(level) {
                Some(color) => println!("  {:<12} #{}", level.name(), color.to_html_rgb()),
                None => println!("  {:<12} disabled", level.name()),
            }
        }
    }

    if let Some(path) = &args.filters {
        let filter = load_filter(Some(path.as_path()))?;
        println!("{}: {} rules", path.display(), filter.rules().len());
        for rule in filter.rules() {
            let category = match rule.category() {
                "" => "(default)",
                category => category,
            };
            println!("  {category:<24} >= {}", rule.min_level().name());
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli_args: ConsoleCli = ConsoleCli::parse();

    match cli_args.command {
        CliCommand::Emit(args) => emit(&args)?,
        CliCommand::Replay(args) => replay_file(&args)?,
        CliCommand::Check(args) => check(&args)?,
    }

    Ok(())
}
