// src/progress.rs

//! Progress reporting for batch runs
//!
//! The `ProgressReporter` trait is told about each package just before its
//! conversion starts. Implementations:
//! - `LineProgress`: one bare package name per line (stdout by default)
//! - `LogProgress`: reports through tracing
//! - `SilentProgress`: counts but prints nothing

use crate::batch::BatchSummary;
use crate::error::Result;
use crate::package::Package;
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tracing::info;

/// Receives batch lifecycle events
pub trait ProgressReporter: Send + Sync {
    /// Called once with the number of packages found
    fn start(&self, _total: usize) {}

    /// Called for each package, before its conversion begins
    fn package(&self, package: &Package) -> Result<()>;

    /// Called once after the last package
    fn finish(&self, _summary: &BatchSummary) {}

    /// Number of packages reported so far
    fn reported(&self) -> u64;
}

/// Writes each package name on its own line
pub struct LineProgress<W: Write + Send> {
    out: Mutex<W>,
    reported: AtomicU64,
}

impl<W: Write + Send> LineProgress<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            reported: AtomicU64::new(0),
        }
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl LineProgress<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> ProgressReporter for LineProgress<W> {
    fn package(&self, package: &Package) -> Result<()> {
        let mut out = self
            .out
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        writeln!(out, "{}", package.display_name())?;
        // Must reach the terminal before the child starts writing
        out.flush()?;
        self.reported.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn reported(&self) -> u64 {
        self.reported.load(Ordering::Relaxed)
    }
}

/// Logs progress through tracing
#[derive(Debug, Default)]
pub struct LogProgress {
    total: AtomicU64,
    reported: AtomicU64,
}

impl LogProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressReporter for LogProgress {
    fn start(&self, total: usize) {
        self.total.store(total as u64, Ordering::Relaxed);
        info!("Converting {} packages", total);
    }

    fn package(&self, package: &Package) -> Result<()> {
        let position = self.reported.fetch_add(1, Ordering::Relaxed) + 1;
        let total = self.total.load(Ordering::Relaxed);
        info!("[{}/{}] {}", position, total, package);
        Ok(())
    }

    fn finish(&self, summary: &BatchSummary) {
        info!("{}", summary);
    }

    fn reported(&self) -> u64 {
        self.reported.load(Ordering::Relaxed)
    }
}

/// No-op reporter for quiet mode
#[derive(Debug, Default)]
pub struct SilentProgress {
    reported: AtomicU64,
}

impl SilentProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressReporter for SilentProgress {
    fn package(&self, _package: &Package) -> Result<()> {
        self.reported.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn reported(&self) -> u64 {
        self.reported.load(Ordering::Relaxed)
    }
}
