/*
================================================================================
                            spritepack logging
================================================================================

Console logging through the `log` facade (debug!, info!, ...), formatted by
env_logger.

**Log Levels**:
- RUST_LOG, when set, wins over everything else
- Otherwise the level passed by the CLI (`-v` / `-q`) is used
- Without either: DEBUG in debug builds, INFO in release builds
- Logs from other crates (resvg, usvg, ...) are only shown at WARN and above

**Format**: `<UTC timestamp> <LEVEL> <module:line> <message>`, with coloured
level and dimmed metadata when writing to a terminal.

================================================================================
*/

use std::io::Write;
use env_logger::fmt::{Color, Formatter};
use log::{Level, LevelFilter, Record};
use chrono::Utc;

pub const LOG_TARGET: &str = "spritepack";

/// Default level for this crate when neither RUST_LOG nor the CLI says otherwise
pub fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

pub fn setup_logger(level: Option<LevelFilter>) {
    let mut builder = env_logger::Builder::new();

    // First check if RUST_LOG is set - if so, use that configuration
    if std::env::var("RUST_LOG").is_ok() {
        builder.parse_env("RUST_LOG");
    } else {
        builder.filter(None, LevelFilter::Warn);
        builder.filter(Some(LOG_TARGET), level.unwrap_or_else(default_level));
    }

    builder.format(|buf: &mut Formatter, record: &Record| {
        let timestamp = Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ");

        // Create the module:line part
        let module_info = match (record.module_path(), record.line()) {
            (Some(module), Some(line)) => format!("{module}:{line}"),
            (Some(module), None) => module.to_string(),
            (None, Some(line)) => format!("line:{line}"),
            (None, None) => "unknown".to_string(),
        };

        let mut level_style = buf.style();
        let mut meta_style = buf.style();

        match record.level() {
            Level::Error => level_style.set_color(Color::Red).set_bold(true),
            Level::Warn => level_style.set_color(Color::Yellow).set_bold(true),
            Level::Info => level_style.set_color(Color::Green).set_bold(true),
            Level::Debug => level_style.set_color(Color::Blue).set_bold(true),
            Level::Trace => level_style.set_color(Color::White),
        };

        #[cfg(target_os = "macos")]
        {
            // Color::Rgb does not work on macOS, so we use Color::Blue as a workaround
            meta_style.set_color(Color::Blue);
        }

        #[cfg(not(target_os = "macos"))]
        {
            meta_style.set_color(Color::Rgb(120, 120, 120));
        }

        writeln!(
            buf,
            "{} {:<5} {} {}",
            meta_style.value(timestamp),
            level_style.value(record.level()),
            meta_style.value(module_info),
            record.args()
        )
    });

    // try_init: a second call (tests, embedding) keeps the first logger
    if let Err(e) = builder.try_init() {
        eprintln!("Logger already initialized: {e}");
    }
}
