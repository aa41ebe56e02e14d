use std::sync::Arc;

use ves_console_logger::{
    CategoryFilter, Color, ConsoleEntry, ConsoleLoggingBuilder, DisplayClass, Error, LogLevel,
    LoggerConfiguration, MemorySink,
};

// The global logger can only be installed once per process, so everything runs in one test.
#[test]
fn test_global_logger() {
    let sink = Arc::new(MemorySink::new());
    let logging = ConsoleLoggingBuilder::new(sink.clone())
        .configure(|config| {
            config.level_colors.insert(LogLevel::Warning, Color::YELLOW);
        })
        .filter(CategoryFilter::new().with_rule("global_logger::noisy", LogLevel::Error))
        .init()
        .unwrap();

    log::info!("started");
    log::warn!(target: "global_logger::noisy", "dropped by the filter");
    log::debug!("no color for debug");
    log::warn!("{} frames late", 3);

    assert_eq!(
        vec![
            ConsoleEntry::Message {
                class: DisplayClass::Info,
                tag: "global_logger".into(),
                text: "<color=#00FF00>Information: </color> started".into(),
                has_context: false,
            },
            ConsoleEntry::Message {
                class: DisplayClass::Warning,
                tag: "global_logger".into(),
                text: "<color=#FFEB04>Warning: </color> 3 frames late".into(),
                has_context: false,
            },
        ],
        sink.take()
    );

    // Reconfiguring through the monitor affects the global logger as well.
    logging
        .monitor()
        .set(LoggerConfiguration::with_colors([(LogLevel::Debug, Color::GREY)]));
    log::info!("disabled now");
    log::debug!("enabled now");
    assert_eq!(vec!["<color=#808080>Debug: </color> enabled now".to_string()], sink.texts());

    let second = ConsoleLoggingBuilder::new(Arc::new(MemorySink::new())).init();
    assert!(matches!(second, Err(Error::SetLogger(_))));
}
