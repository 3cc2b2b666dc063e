//! Logging for beampy-setup
//!
//! A [`Logger`] is built once at startup and handed by reference to every
//! component. It filters by [`Level`] and writes to exactly one sink: the
//! console (stderr), a log file, or an in-memory [`LogBuffer`] used by tests.

use colored::Colorize;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::process::Output;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

/// Severity of a log message, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Level {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Level::Debug),
            "INFO" => Ok(Level::Info),
            "WARNING" | "WARN" => Ok(Level::Warning),
            "ERROR" => Ok(Level::Error),
            other => Err(format!(
                "Invalid log level: {} (expected DEBUG, INFO, WARNING or ERROR)",
                other
            )),
        }
    }
}

/// Shared in-memory log sink
#[derive(Debug, Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<String>>>);

impl LogBuffer {
    /// All recorded lines, formatted as `LEVEL message`
    pub fn lines(&self) -> Vec<String> {
        self.0.lock().map(|lines| lines.clone()).unwrap_or_default()
    }

    /// Whether any recorded line contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }

    /// Lines recorded at exactly `level`
    pub fn at_level(&self, level: Level) -> Vec<String> {
        let prefix = format!("{} ", level.as_str());
        self.lines()
            .into_iter()
            .filter_map(|line| line.strip_prefix(&prefix).map(str::to_string))
            .collect()
    }

    fn push(&self, line: String) {
        if let Ok(mut lines) = self.0.lock() {
            lines.push(line);
        }
    }
}

#[derive(Debug)]
enum Sink {
    Console,
    File(Mutex<File>),
    Memory(LogBuffer),
}

/// Explicitly constructed diagnostic sink
#[derive(Debug)]
pub struct Logger {
    level: Level,
    sink: Sink,
}

impl Logger {
    /// Log to stderr
    pub fn console(level: Level) -> Self {
        Self {
            level,
            sink: Sink::Console,
        }
    }

    /// Log to `path`, truncating any previous content
    pub fn to_file(path: &Path, level: Level) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        Ok(Self {
            level,
            sink: Sink::File(Mutex::new(file)),
        })
    }

    /// Log into memory; the returned buffer observes every accepted line
    pub fn memory(level: Level) -> (Self, LogBuffer) {
        let buffer = LogBuffer::default();
        let logger = Self {
            level,
            sink: Sink::Memory(buffer.clone()),
        };
        (logger, buffer)
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn enabled(&self, level: Level) -> bool {
        level >= self.level
    }

    pub fn debug(&self, message: &str) {
        self.log(Level::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(Level::Warning, message);
    }

    pub fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }

    /// Record a finished child process: exit code, stdout and stderr
    pub fn capture_output(&self, command_name: &str, output: &Output) {
        if !self.enabled(Level::Debug) {
            return;
        }
        self.debug(&format!(
            "COMMAND: {} (exit code: {:?})",
            command_name,
            output.status.code()
        ));

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            self.debug(&format!("  STDOUT:\n{}", stdout.trim_end()));
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            self.debug(&format!("  STDERR:\n{}", stderr.trim_end()));
        }
    }

    pub fn log(&self, level: Level, message: &str) {
        if !self.enabled(level) {
            return;
        }
        match &self.sink {
            Sink::Console => write_console(level, message),
            Sink::File(file) => {
                if let Ok(mut file) = file.lock() {
                    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
                    let _ = writeln!(file, "[{}] {} {}", timestamp, level, message);
                }
            }
            Sink::Memory(buffer) => buffer.push(format!("{} {}", level, message)),
        }
    }
}

fn write_console(level: Level, message: &str) {
    match level {
        Level::Debug => eprintln!("{} {}", "DEBUG:".blue().bold(), message),
        Level::Info => eprintln!("{}", message),
        Level::Warning => eprintln!("{} {}", "warning:".yellow().bold(), message),
        Level::Error => eprintln!("{} {}", "Error:".red().bold(), message),
    }
}
