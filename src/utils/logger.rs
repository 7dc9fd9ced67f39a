//! Logging Infrastructure
//!
//! Tracing setup with optional daily-rolling file output. File output is only
//! enabled when the target directory already exists, so a missing LOG_DIR
//! degrades to console-only logging instead of failing startup.

use std::path::Path;

/// Initialize the logger
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize the logger with optional file output
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let level = log_level
        .and_then(|l| l.parse().ok())
        .unwrap_or(tracing::Level::INFO);

    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false);

    // 目录存在才挂文件输出，否则只留控制台
    match log_dir.map(Path::new).filter(|p| p.exists()) {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "library-server");
            builder.with_writer(appender).init();
        }
        None => builder.init(),
    }
}
