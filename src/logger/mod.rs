//! Structured logging for foliotrack
//!
//! Provides tagged, leveled log output with:
//! - Standard log levels (Error/Warning/Info/Debug/Verbose)
//! - Per-module debug control via --debug-<module> flags
//! - Dual output: colored console + optional file persistence
//!
//! ## Usage
//!
//! ```rust
//! use foliotrack::logger::{self, LogTag};
//!
//! logger::info(LogTag::Cache, "Entry stored");
//! logger::warning(LogTag::Fetch, "Rate limit approaching");
//! logger::debug(LogTag::Preload, "Task details: ..."); // Only if --debug-preload
//! ```
//!
//! Call `logger::init()` once at startup (tools do this in main).

mod config;
mod file;
mod format;
mod levels;
mod tags;

pub use config::{ get_logger_config, init_from_args, set_logger_config, LoggerConfig };
pub use file::init_file_logging;
pub use levels::LogLevel;
pub use tags::LogTag;

/// Initialize the logger system from command-line arguments
pub fn init() {
    config::init_from_args();
    file::init_file_logging();
}

/// Check if a log message should be displayed
///
/// Filtering rules:
/// 1. Errors are always shown
/// 2. Check against minimum log level threshold
/// 3. Debug level requires --debug-<module> flag for that tag
fn should_log(tag: &LogTag, level: LogLevel) -> bool {
    let cfg = config::get_logger_config();

    if level == LogLevel::Error {
        return true;
    }

    if level == LogLevel::Debug {
        return config::is_debug_enabled_for_tag(tag);
    }

    level <= cfg.min_level
}

/// Log with an explicit type string (e.g. "SUCCESS", "START")
///
/// The type string is matched against the known levels for filtering;
/// unknown types log at Info.
pub fn log(tag: LogTag, log_type: &str, message: &str) {
    let level = LogLevel::parse(log_type);
    if !should_log(&tag, level) {
        return;
    }
    format::format_and_log(tag, log_type, message);
}

/// Log at ERROR level (always shown, critical issues)
pub fn error(tag: LogTag, message: &str) {
    log_internal(tag, LogLevel::Error, message);
}

/// Log at WARNING level (important issues)
pub fn warning(tag: LogTag, message: &str) {
    log_internal(tag, LogLevel::Warning, message);
}

/// Log at INFO level (standard operations)
pub fn info(tag: LogTag, message: &str) {
    log_internal(tag, LogLevel::Info, message);
}

/// Log at DEBUG level (only with --debug-<module>)
pub fn debug(tag: LogTag, message: &str) {
    log_internal(tag, LogLevel::Debug, message);
}

/// Force flush all pending log writes
pub fn flush() {
    file::flush_file_logging();
}

fn log_internal(tag: LogTag, level: LogLevel, message: &str) {
    if !should_log(&tag, level) {
        return;
    }
    format::format_and_log(tag, level.as_str(), message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    // Single test because the logger config is process-global state
    #[test]
    fn test_filtering_rules() {
        set_logger_config(LoggerConfig {
            min_level: LogLevel::Error,
            debug_tags: HashSet::new(),
        });
        assert!(should_log(&LogTag::System, LogLevel::Error));
        assert!(!should_log(&LogTag::System, LogLevel::Info));

        let mut debug_tags = HashSet::new();
        debug_tags.insert("cache".to_string());
        set_logger_config(LoggerConfig {
            min_level: LogLevel::Info,
            debug_tags,
        });
        assert!(should_log(&LogTag::Cache, LogLevel::Debug));
        assert!(!should_log(&LogTag::Fetch, LogLevel::Debug));

        set_logger_config(LoggerConfig::default());
    }
}
