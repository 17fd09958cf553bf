//! Panic hook
//!
//! Every panic is logged through `tracing` with the request span still
//! attached. The server additionally appends a crash report next to its
//! log file; CLI commands only print a one-line message.

use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::Write;
use std::panic::{self, PanicHookInfo};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use colored::Colorize;
use tracing::error;

use crate::config::LoggingConfig;

pub const CRASH_LOG_FILE: &str = "crash.log";

/// How a panic is reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    Server { crash_log: PathBuf },
    Cli,
}

impl RunMode {
    /// Server mode writing its crash reports beside the configured log file
    pub fn server(logging: &LoggingConfig) -> Self {
        RunMode::Server {
            crash_log: crash_log_path(logging),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            RunMode::Server { .. } => "serve",
            RunMode::Cli => "cli",
        }
    }
}

/// `crash.log` in the directory of `logging.file`, or the working directory
pub fn crash_log_path(logging: &LoggingConfig) -> PathBuf {
    logging
        .file
        .as_deref()
        .filter(|f| !f.is_empty())
        .and_then(|f| Path::new(f).parent())
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(CRASH_LOG_FILE))
        .unwrap_or_else(|| PathBuf::from(CRASH_LOG_FILE))
}

/// One captured panic
#[derive(Debug, Clone)]
pub struct CrashReport {
    pub timestamp: DateTime<Utc>,
    pub mode: &'static str,
    pub thread: String,
    pub message: String,
    pub location: String,
}

impl CrashReport {
    fn capture(info: &PanicHookInfo<'_>, mode: &RunMode) -> Self {
        let payload = info.payload();
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic payload".to_string());

        Self {
            timestamp: Utc::now(),
            mode: mode.label(),
            thread: std::thread::current()
                .name()
                .unwrap_or("<unnamed>")
                .to_string(),
            message,
            location: info
                .location()
                .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()))
                .unwrap_or_else(|| "unknown".to_string()),
        }
    }

    /// Plain-text report as appended to the crash log
    pub fn render(&self, backtrace: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "--- geolocator v{} crash at {} ---",
            env!("CARGO_PKG_VERSION"),
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        );
        let _ = writeln!(out, "mode:     {}", self.mode);
        let _ = writeln!(out, "thread:   {}", self.thread);
        let _ = writeln!(out, "message:  {}", self.message);
        let _ = writeln!(out, "location: {}", self.location);
        if !backtrace.is_empty() {
            let _ = writeln!(out, "backtrace:\n{}", backtrace.trim_end());
        }
        out
    }
}

/// Install the process-wide panic hook
pub fn install_panic_hook(mode: RunMode) {
    panic::set_hook(Box::new(move |info| {
        let report = CrashReport::capture(info, &mode);
        error!(
            thread = %report.thread,
            location = %report.location,
            "panic: {}",
            report.message
        );

        match &mode {
            RunMode::Server { crash_log } => {
                let backtrace = std::backtrace::Backtrace::force_capture().to_string();
                match append_report(crash_log, &report.render(&backtrace)) {
                    Ok(()) => eprintln!(
                        "{} {} ({})\n  report written to {}",
                        "panic:".red().bold(),
                        report.message,
                        report.location,
                        crash_log.display().to_string().cyan()
                    ),
                    Err(e) => eprintln!(
                        "{}{}\n  failed to write {}: {}",
                        "panic: ".red().bold(),
                        report.render(&backtrace),
                        crash_log.display(),
                        e
                    ),
                }
            }
            RunMode::Cli => eprintln!("geolocator panicked: {}", report.message),
        }
    }));
}

fn append_report(path: &Path, report: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", report)
}
