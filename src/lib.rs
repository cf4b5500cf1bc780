// src/lib.rs

//! Batch package conversion
//!
//! Applies an external source-transformation tool (by default
//! `flow-remove-types --pretty`) to every entry of a source directory,
//! writing each result into a mirrored destination directory.
//!
//! # Architecture
//!
//! - Enumerator: lists the entries directly under the source root
//! - Invoker: builds `<tool> <args> --out-dir <dest>/<name> <src>/<name>` and runs it
//! - Batch loop: reports each name, then converts, strictly one at a time
//!
//! Only enumeration failures and a missing tool abort a run. Individual
//! conversion failures are collected into a [`BatchSummary`].

pub mod batch;
pub mod config;
pub mod enumerate;
mod error;
pub mod invoke;
pub mod package;
pub mod progress;

pub use batch::{BatchRunner, BatchSummary, FailedConversion, SkippedPackage};
pub use config::{BatchConfig, NamePolicy, PackageOrder};
pub use enumerate::list_packages;
pub use error::{Error, Result};
pub use invoke::{
    resolve_tool, ConversionCommand, ConversionOutcome, Converter, DryRunConverter, ToolConverter,
};
pub use package::Package;
pub use progress::{LineProgress, LogProgress, ProgressReporter, SilentProgress};
