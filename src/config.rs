// src/config.rs

//! Batch configuration
//!
//! Every field defaults to the classic layout, so an empty configuration
//! converts `./packages/*` into `./packages-without-types/*` with
//! `flow-remove-types --pretty`. Values can come from a TOML file:
//!
//! ```toml
//! source_root = "vendor/packages"
//! destination_root = "build/stripped"
//! tool = "flow-remove-types"
//! tool_args = ["--pretty"]
//! order = "sorted"
//! name_policy = "strict"
//! timeout_secs = 300
//! ```

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Order in which packages are processed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageOrder {
    /// Whatever order the directory listing returns
    #[default]
    Listing,
    /// Byte-wise ascending by name
    Sorted,
}

impl fmt::Display for PackageOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageOrder::Listing => write!(f, "listing"),
            PackageOrder::Sorted => write!(f, "sorted"),
        }
    }
}

/// How package names are checked before building paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamePolicy {
    /// Names are passed through untouched
    #[default]
    Verbatim,
    /// Names failing validation are skipped and reported
    Strict,
}

impl fmt::Display for NamePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamePolicy::Verbatim => write!(f, "verbatim"),
            NamePolicy::Strict => write!(f, "strict"),
        }
    }
}

/// Configuration for one batch run
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchConfig {
    /// Directory whose entries are the packages to convert
    #[serde(default = "default_source_root")]
    pub source_root: PathBuf,

    /// Directory that receives one output directory per package
    #[serde(default = "default_destination_root")]
    pub destination_root: PathBuf,

    /// External transformation tool
    #[serde(default = "default_tool")]
    pub tool: String,

    /// Flags passed to the tool ahead of the output-directory flag
    #[serde(default = "default_tool_args")]
    pub tool_args: Vec<String>,

    /// Flag that takes the destination path
    #[serde(default = "default_out_dir_flag")]
    pub out_dir_flag: String,

    #[serde(default)]
    pub order: PackageOrder,

    #[serde(default)]
    pub name_policy: NamePolicy,

    /// Per-conversion limit; the child is killed when it is exceeded
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Route the tool's stdout/stderr into the log instead of the terminal
    #[serde(default)]
    pub capture_output: bool,

    /// Report failure through the exit status when any conversion fails
    #[serde(default)]
    pub fail_on_error: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            source_root: default_source_root(),
            destination_root: default_destination_root(),
            tool: default_tool(),
            tool_args: default_tool_args(),
            out_dir_flag: default_out_dir_flag(),
            order: PackageOrder::default(),
            name_policy: NamePolicy::default(),
            timeout_secs: None,
            capture_output: false,
            fail_on_error: false,
        }
    }
}

fn default_source_root() -> PathBuf {
    PathBuf::from("./packages")
}

fn default_destination_root() -> PathBuf {
    PathBuf::from("./packages-without-types")
}

fn default_tool() -> String {
    "flow-remove-types".to_string()
}

fn default_tool_args() -> Vec<String> {
    vec!["--pretty".to_string()]
}

fn default_out_dir_flag() -> String {
    "--out-dir".to_string()
}

impl BatchConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: BatchConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.tool.trim().is_empty() {
            return Err(Error::Config("tool must not be empty".to_string()));
        }
        if self.out_dir_flag.trim().is_empty() {
            return Err(Error::Config("out_dir_flag must not be empty".to_string()));
        }
        if self.timeout_secs == Some(0) {
            return Err(Error::Config(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.source_root.as_os_str().is_empty() || self.destination_root.as_os_str().is_empty()
        {
            return Err(Error::Config("roots must not be empty paths".to_string()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
