// src/batch.rs

//! The batch conversion loop
//!
//! `Start -> (for each package: report -> convert) -> Done`. Only a failed
//! enumeration or a missing tool aborts the run; each conversion is
//! isolated, and its outcome is recorded in the [`BatchSummary`].

use crate::config::{BatchConfig, NamePolicy};
use crate::enumerate::list_packages;
use crate::error::Result;
use crate::invoke::{resolve_tool, ConversionCommand, ConversionOutcome, Converter};
use crate::package::Package;
use crate::progress::ProgressReporter;
use std::fmt;
use tracing::{debug, info, warn};

/// A package whose conversion did not succeed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedConversion {
    pub package: String,
    pub outcome: ConversionOutcome,
}

/// A package that was never handed to the tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPackage {
    pub package: String,
    pub reason: String,
}

/// Per-package results, in processing order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: Vec<String>,
    pub failed: Vec<FailedConversion>,
    pub skipped: Vec<SkippedPackage>,
}

impl BatchSummary {
    /// Packages seen, including skipped ones
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len() + self.skipped.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Whether the run should end with a success status
    ///
    /// Failed conversions only count when `fail_on_error` is set.
    pub fn exit_ok(&self, fail_on_error: bool) -> bool {
        !(fail_on_error && self.has_failures())
    }

    fn record(&mut self, package: &Package, outcome: ConversionOutcome) {
        let name = package.display_name().into_owned();
        if outcome.is_success() {
            self.succeeded.push(name);
        } else {
            self.failed.push(FailedConversion {
                package: name,
                outcome,
            });
        }
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} packages: {} succeeded, {} failed, {} skipped",
            self.total(),
            self.succeeded.len(),
            self.failed.len(),
            self.skipped.len()
        )
    }
}

/// Drives one batch: enumerate, then report and convert each package in turn
pub struct BatchRunner<'a> {
    config: &'a BatchConfig,
    converter: &'a dyn Converter,
    progress: &'a dyn ProgressReporter,
}

impl<'a> BatchRunner<'a> {
    pub fn new(
        config: &'a BatchConfig,
        converter: &'a dyn Converter,
        progress: &'a dyn ProgressReporter,
    ) -> Self {
        Self {
            config,
            converter,
            progress,
        }
    }

    /// Run the batch to completion
    ///
    /// Conversions run strictly one after another; each child is waited on
    /// before the next package is reported.
    pub fn run(&self) -> Result<BatchSummary> {
        let packages = list_packages(&self.config.source_root, self.config.order)?;
        info!(
            "Converting {} packages from {} into {}",
            packages.len(),
            self.config.source_root.display(),
            self.config.destination_root.display()
        );

        if !packages.is_empty() && self.converter.requires_tool() {
            let tool = resolve_tool(&self.config.tool)?;
            debug!("Using {} at {}", self.config.tool, tool.display());
        }

        self.progress.start(packages.len());
        let mut summary = BatchSummary::default();

        for package in &packages {
            if self.config.name_policy == NamePolicy::Strict
                && let Err(e) = Package::validated(package.name())
            {
                warn!("Skipping package: {}", e);
                summary.skipped.push(SkippedPackage {
                    package: package.display_name().into_owned(),
                    reason: e.to_string(),
                });
                continue;
            }

            self.progress.package(package)?;

            let command = ConversionCommand::build(self.config, package);
            let outcome = self.converter.convert(&command);
            if !outcome.is_success() {
                warn!("Conversion of {} {}", package, outcome);
            }
            summary.record(package, outcome);
        }

        self.progress.finish(&summary);
        Ok(summary)
    }
}
