//! Logging setup: console + size-rotated daily log file.
//!
//! There is no process-global logger. [`install`] builds a subscriber from an
//! explicit [`LogConfig`] and makes it the default for the current thread; the
//! returned [`LogGuard`] uninstalls it when dropped. The dashboard is
//! single-threaded, so the guard held by `app::run` covers every component.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDate};
use tracing::Level;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::{Layer, SubscriberExt};

use crate::error::AppError;

pub const DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;
pub const DEFAULT_MAX_BACKUPS: usize = 5;

/// Sinks, levels and rotation policy.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Directory holding the log files (created if missing).
    pub dir: PathBuf,
    /// File name prefix; the file is `<prefix>_<YYYY-MM-DD>.log`.
    pub file_prefix: String,
    /// Console threshold. `None` disables the console sink (used by the TUI).
    pub console_level: Option<Level>,
    pub file_level: Level,
    /// Rotate once the active file would grow past this many bytes.
    pub max_bytes: u64,
    /// Number of rotated files kept next to the active one.
    pub max_backups: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
            file_prefix: "app".to_string(),
            console_level: Some(Level::INFO),
            file_level: Level::DEBUG,
            max_bytes: DEFAULT_MAX_BYTES,
            max_backups: DEFAULT_MAX_BACKUPS,
        }
    }
}

impl LogConfig {
    pub fn file_path(&self, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("{}_{}.log", self.file_prefix, date.format("%Y-%m-%d")))
    }
}

/// Keeps the subscriber installed for as long as it is alive.
pub struct LogGuard {
    _default: DefaultGuard,
}

/// Build the subscriber described by `config` and install it for this thread.
pub fn install(config: &LogConfig) -> Result<LogGuard, AppError> {
    fs::create_dir_all(&config.dir).map_err(|e| {
        AppError::config(format!(
            "Failed to create log directory '{}': {e}",
            config.dir.display()
        ))
    })?;

    let path = config.file_path(Local::now().date_naive());
    let file = RotatingFile::open(&path, config.max_bytes, config.max_backups).map_err(|e| {
        AppError::config(format!("Failed to open log file '{}': {e}", path.display()))
    })?;

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(RotatingWriter::new(file))
        .with_filter(LevelFilter::from_level(config.file_level));

    let console_layer = config.console_level.map(|level| {
        fmt::layer()
            .with_writer(io::stderr)
            .without_time()
            .with_target(false)
            .with_filter(LevelFilter::from_level(level))
    });

    let subscriber = tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer);
    let default = tracing::subscriber::set_default(subscriber);

    tracing::info!(path = %path.display(), "Logging initialized");

    Ok(LogGuard { _default: default })
}

/// Append-only file that rolls over to numbered backups by size.
///
/// Rollover shifts `name.log.(n-1)` to `name.log.n`, moves the active file to
/// `name.log.1`, and discards anything past `max_backups`.
#[derive(Debug)]
pub struct RotatingFile {
    path: PathBuf,
    max_bytes: u64,
    max_backups: usize,
    file: File,
    len: u64,
}

impl RotatingFile {
    pub fn open(path: &Path, max_bytes: u64, max_backups: usize) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let len = file.metadata()?.len();
        Ok(Self {
            path: path.to_path_buf(),
            max_bytes,
            max_backups,
            file,
            len,
        })
    }

    fn backup_path(&self, n: usize) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(format!(".{n}"));
        PathBuf::from(name)
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        if self.max_backups == 0 {
            self.file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&self.path)?;
            self.len = 0;
            return Ok(());
        }

        let oldest = self.backup_path(self.max_backups);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for n in (1..self.max_backups).rev() {
            let src = self.backup_path(n);
            if src.exists() {
                fs::rename(&src, self.backup_path(n + 1))?;
            }
        }
        fs::rename(&self.path, self.backup_path(1))?;

        self.file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        self.len = 0;
        Ok(())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.max_bytes > 0 && self.len > 0 && self.len + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        let n = self.file.write(buf)?;
        self.len += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// Shareable handle so the fmt layer can hand out writers per event.
#[derive(Debug, Clone)]
pub struct RotatingWriter {
    inner: Arc<Mutex<RotatingFile>>,
}

impl RotatingWriter {
    pub fn new(file: RotatingFile) -> Self {
        Self {
            inner: Arc::new(Mutex::new(file)),
        }
    }
}

impl Write for RotatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut file = self
            .inner
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut file = self
            .inner
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        file.flush()
    }
}

impl<'a> MakeWriter<'a> for RotatingWriter {
    type Writer = RotatingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
