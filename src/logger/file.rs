/// Optional file sink for log persistence
///
/// Disabled until init_file_logging() is called; the console path never
/// depends on it.

use chrono::Local;
use once_cell::sync::Lazy;
use std::fs::{ create_dir_all, File, OpenOptions };
use std::io::Write;
use std::sync::Mutex;

static LOG_FILE: Lazy<Mutex<Option<File>>> = Lazy::new(|| Mutex::new(None));

/// Open (or create) logs/foliotrack_<date>.log for appending
pub fn init_file_logging() {
    let date = Local::now().format("%Y-%m-%d").to_string();
    let path = format!("logs/foliotrack_{}.log", date);

    if create_dir_all("logs").is_err() {
        return;
    }

    if let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) {
        let mut guard = LOG_FILE.lock().unwrap();
        *guard = Some(file);
    }
}

/// Append one line to the log file, if file logging is active
pub fn write_to_file(line: &str) {
    let mut guard = LOG_FILE.lock().unwrap();
    if let Some(file) = guard.as_mut() {
        let _ = writeln!(file, "{}", line);
    }
}

/// Flush pending writes (call during shutdown)
pub fn flush_file_logging() {
    let mut guard = LOG_FILE.lock().unwrap();
    if let Some(file) = guard.as_mut() {
        let _ = file.flush();
    }
}
