use crate::config::CategorySpec;
use chrono::Local;
use std::collections::HashMap;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Unknown log level: {0}")]
    InvalidLevel(String),
    #[error("Duplicate logger category: {0}")]
    DuplicateCategory(String),
    #[error("Unknown logger category: {0}")]
    UnknownCategory(String),
    #[error("Failed to open log file {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Ordered severity threshold. Lines below a category's level are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

impl FromStr for Level {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Level::Debug),
            "INFO" => Ok(Level::Info),
            "WARN" => Ok(Level::Warn),
            "ERROR" => Ok(Level::Error),
            _ => Err(LoggerError::InvalidLevel(s.to_string())),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only log file writer with size-triggered rotation.
///
/// When a line would push the active file past `max_size` bytes, the rotated
/// copies `<path>.1` .. `<path>.backup` shift by one (the oldest is
/// discarded), the active file becomes `<path>.1` and a fresh file is opened.
/// With `backup == 0` the active file is truncated instead.
#[derive(Debug)]
struct RotatingWriter {
    path: PathBuf,
    max_size: u64,
    backup: u32,
    file: File,
    size: u64,
}

impl RotatingWriter {
    fn open(path: &Path, max_size: u64, backup: u32) -> Result<Self, LoggerError> {
        let file = open_append(path)?;
        let size = file.metadata()?.len();
        Ok(Self {
            path: path.to_path_buf(),
            max_size,
            backup,
            file,
            size,
        })
    }

    fn write_line(&mut self, line: &str) -> Result<(), LoggerError> {
        if self.size > 0 && self.size + line.len() as u64 > self.max_size {
            self.rotate()?;
        }
        self.file.write_all(line.as_bytes())?;
        self.size += line.len() as u64;
        Ok(())
    }

    fn rotate(&mut self) -> Result<(), LoggerError> {
        self.file.flush()?;
        if self.backup == 0 {
            self.file = File::create(&self.path).map_err(|source| LoggerError::Open {
                path: self.path.display().to_string(),
                source,
            })?;
            self.size = 0;
            return Ok(());
        }
        for n in (1..self.backup).rev() {
            // A missing older copy is fine; rotation may not have reached it yet.
            match fs::rename(rotated_path(&self.path, n), rotated_path(&self.path, n + 1)) {
                Ok(()) => {}
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => return Err(LoggerError::Io(err)),
            }
        }
        fs::rename(&self.path, rotated_path(&self.path, 1))?;
        self.file = open_append(&self.path)?;
        self.size = 0;
        Ok(())
    }
}

fn open_append(path: &Path) -> Result<File, LoggerError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggerError::Open {
            path: path.display().to_string(),
            source,
        })
}

fn rotated_path(path: &Path, n: u32) -> PathBuf {
    let mut rotated = path.as_os_str().to_os_string();
    rotated.push(format!(".{}", n));
    PathBuf::from(rotated)
}

#[derive(Debug)]
struct Category {
    level: Level,
    writer: Mutex<RotatingWriter>,
}

/// Explicit registry of logger categories, built once at startup and handed
/// by reference to whatever needs to emit log lines. Registration is
/// fail-fast: the first bad category aborts the whole bootstrap.
#[derive(Debug, Default)]
pub struct LoggerRegistry {
    categories: HashMap<String, Category>,
}

impl LoggerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from discovered category specs.
    pub fn bootstrap(specs: &[CategorySpec]) -> Result<Self, LoggerError> {
        let mut registry = Self::new();
        for spec in specs {
            registry.add_category(spec)?;
        }
        Ok(registry)
    }

    pub fn add_category(&mut self, spec: &CategorySpec) -> Result<(), LoggerError> {
        if self.categories.contains_key(&spec.name) {
            return Err(LoggerError::DuplicateCategory(spec.name.clone()));
        }
        let level = spec.config.level.parse::<Level>()?;
        let writer = RotatingWriter::open(
            Path::new(&spec.config.path),
            spec.config.max_size,
            spec.config.backup,
        )?;
        tracing::debug!(
            "Registered logger category {} -> {}",
            spec.name,
            spec.config.path
        );
        self.categories.insert(
            spec.name.clone(),
            Category {
                level,
                writer: Mutex::new(writer),
            },
        );
        Ok(())
    }

    /// Borrow a handle for one registered category.
    pub fn logger(&self, name: &str) -> Result<Logger<'_>, LoggerError> {
        let category = self
            .categories
            .get(name)
            .ok_or_else(|| LoggerError::UnknownCategory(name.to_string()))?;
        Ok(Logger { category })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.categories.contains_key(name)
    }
}

/// Handle for emitting lines to one category's rotating log file.
#[derive(Debug)]
pub struct Logger<'a> {
    category: &'a Category,
}

impl Logger<'_> {
    pub fn debug(&self, msg: &str) -> Result<(), LoggerError> {
        self.log(Level::Debug, msg)
    }

    pub fn info(&self, msg: &str) -> Result<(), LoggerError> {
        self.log(Level::Info, msg)
    }

    pub fn warn(&self, msg: &str) -> Result<(), LoggerError> {
        self.log(Level::Warn, msg)
    }

    pub fn error(&self, msg: &str) -> Result<(), LoggerError> {
        self.log(Level::Error, msg)
    }

    fn log(&self, level: Level, msg: &str) -> Result<(), LoggerError> {
        if level < self.category.level {
            return Ok(());
        }
        let line = format!(
            "{} [{}] {}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            level,
            msg
        );
        let mut writer = self
            .category
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        writer.write_line(&line)
    }
}
