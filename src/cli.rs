// src/cli.rs

//! Command-line definitions
//!
//! Flags override values loaded from `--config`; anything left unset keeps
//! the file value or the built-in default.

use clap::{ArgAction, Parser};
use remove_types::{BatchConfig, NamePolicy, PackageOrder};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "remove-types")]
#[command(author = "remove-types Contributors")]
#[command(version)]
#[command(
    about = "Run a source transformation tool over every package in a directory",
    long_about = None
)]
pub struct Cli {
    /// Directory whose entries are converted (default: ./packages)
    #[arg(short, long, value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Directory receiving one output directory per package (default: ./packages-without-types)
    #[arg(short, long, value_name = "DIR")]
    pub dest: Option<PathBuf>,

    /// Transformation tool to run (default: flow-remove-types)
    #[arg(short, long, value_name = "PROG")]
    pub tool: Option<String>,

    /// Flag passed to the tool before the output-directory flag (repeatable, replaces --pretty)
    #[arg(long = "tool-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub tool_args: Vec<String>,

    /// Flag that takes the destination path (default: --out-dir)
    #[arg(long, value_name = "FLAG", allow_hyphen_values = true)]
    pub out_dir_flag: Option<String>,

    /// Process packages in sorted order instead of directory listing order
    #[arg(long)]
    pub sort: bool,

    /// Skip package names that are not a single safe path segment
    #[arg(long)]
    pub strict_names: bool,

    /// Kill a conversion that runs longer than this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Send the tool's output to the log instead of the terminal
    #[arg(long)]
    pub capture_output: bool,

    /// Exit with a failure status if any conversion fails
    #[arg(long)]
    pub fail_on_error: bool,

    /// Load settings from a TOML file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the commands that would run without running them
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Do not print package names (with -v, log them with their position instead)
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Apply command-line overrides on top of `config`
    pub fn apply(&self, mut config: BatchConfig) -> BatchConfig {
        if let Some(source) = &self.source {
            config.source_root = source.clone();
        }
        if let Some(dest) = &self.dest {
            config.destination_root = dest.clone();
        }
        if let Some(tool) = &self.tool {
            config.tool = tool.clone();
        }
        if !self.tool_args.is_empty() {
            config.tool_args = self.tool_args.clone();
        }
        if let Some(flag) = &self.out_dir_flag {
            config.out_dir_flag = flag.clone();
        }
        if self.sort {
            config.order = PackageOrder::Sorted;
        }
        if self.strict_names {
            config.name_policy = NamePolicy::Strict;
        }
        if self.timeout.is_some() {
            config.timeout_secs = self.timeout;
        }
        config.capture_output |= self.capture_output;
        config.fail_on_error |= self.fail_on_error;
        config
    }

    /// Log filter implied by `-v`
    ///
    /// Captured tool output is logged at info, so capturing raises the
    /// floor to info.
    pub fn log_level(&self, capture_output: bool) -> &'static str {
        match self.verbose {
            0 if !capture_output => "warn",
            0 | 1 => "info",
            _ => "debug",
        }
    }

    /// Report progress through the log instead of stdout
    pub fn log_progress(&self) -> bool {
        self.quiet && self.verbose > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_flags_keeps_config() {
        let cli = Cli::parse_from(["remove-types"]);
        let config = cli.apply(BatchConfig::default());
        assert_eq!(config.source_root, PathBuf::from("./packages"));
        assert_eq!(config.tool_args, vec!["--pretty"]);
        assert_eq!(config.order, PackageOrder::Listing);
        assert_eq!(cli.log_level(false), "warn");
        assert!(!cli.log_progress());
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "remove-types",
            "--source",
            "/in",
            "--dest",
            "/out",
            "--tool",
            "babel",
            "--tool-arg",
            "--no-babelrc",
            "--tool-arg",
            "--quiet",
            "--out-dir-flag",
            "-d",
            "--sort",
            "--strict-names",
            "--timeout",
            "60",
            "--fail-on-error",
            "-vv",
        ]);
        let config = cli.apply(BatchConfig::default());

        assert_eq!(config.source_root, PathBuf::from("/in"));
        assert_eq!(config.destination_root, PathBuf::from("/out"));
        assert_eq!(config.tool, "babel");
        assert_eq!(config.tool_args, vec!["--no-babelrc", "--quiet"]);
        assert_eq!(config.out_dir_flag, "-d");
        assert_eq!(config.order, PackageOrder::Sorted);
        assert_eq!(config.name_policy, NamePolicy::Strict);
        assert_eq!(config.timeout_secs, Some(60));
        assert!(config.fail_on_error);
        assert!(!config.capture_output);
        assert_eq!(cli.log_level(true), "debug");
    }

    #[test]
    fn test_capture_output_raises_log_level() {
        let cli = Cli::parse_from(["remove-types", "--capture-output"]);
        let config = cli.apply(BatchConfig::default());
        assert_eq!(cli.log_level(config.capture_output), "info");

        let cli = Cli::parse_from(["remove-types"]);
        let from_file = BatchConfig::parse("capture_output = true").unwrap();
        assert_eq!(cli.log_level(cli.apply(from_file).capture_output), "info");
    }

    #[test]
    fn test_quiet_verbose_selects_log_progress() {
        assert!(Cli::parse_from(["remove-types", "-q", "-v"]).log_progress());
        assert!(!Cli::parse_from(["remove-types", "-q"]).log_progress());
        assert!(!Cli::parse_from(["remove-types", "-v"]).log_progress());
    }
}
