//! Log formatting and output with ANSI colors
//!
//! Handles:
//! - Colorized console output with aligned tag and level columns
//! - Dual output (console + optional file)

use super::file::write_to_file;
use super::tags::LogTag;
use chrono::Local;
use colored::*;

/// Log format widths for alignment
const TAG_WIDTH: usize = 8;
const LOG_TYPE_WIDTH: usize = 8;

/// Format and output a log message
pub fn format_and_log(tag: LogTag, log_type: &str, message: &str) {
    let now = Local::now();
    let time = now.format("%H:%M:%S").to_string();

    let prefix = format!("{} ", time).dimmed();
    let tag_str = format_tag(&tag);
    let log_type_str = format_log_type(log_type);

    println!("{}[{}] [{}] {}", prefix, tag_str, log_type_str, message);

    let timestamp = now.format("%Y-%m-%d %H:%M:%S").to_string();
    let file_line = format!(
        "{} [{}] [{}] {}",
        timestamp,
        tag.to_plain_string(),
        log_type,
        message
    );
    write_to_file(&file_line);
}

/// Format a tag with appropriate color
fn format_tag(tag: &LogTag) -> ColoredString {
    let padded = format!("{:<width$}", tag.to_plain_string(), width = TAG_WIDTH);
    match tag {
        LogTag::System => padded.bright_yellow().bold(),
        LogTag::Cache => padded.bright_cyan().bold(),
        LogTag::Fetch => padded.bright_blue().bold(),
        LogTag::Preload => padded.bright_magenta().bold(),
    }
}

/// Format a log level / type with appropriate color
fn format_log_type(log_type: &str) -> ColoredString {
    let padded = format!("{:<width$}", log_type, width = LOG_TYPE_WIDTH);
    match log_type {
        "ERROR" => padded.bright_red().bold(),
        "WARNING" | "WARN" => padded.bright_yellow(),
        "SUCCESS" => padded.bright_green(),
        "DEBUG" | "VERBOSE" => padded.dimmed(),
        _ => padded.normal(),
    }
}
