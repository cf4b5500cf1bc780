// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Boolean switch
fn flag(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).action(ArgAction::SetTrue).help(help)
}

fn build_cli() -> Command {
    Command::new("remove-types")
        .version(env!("CARGO_PKG_VERSION"))
        .author("remove-types Contributors")
        .about("Run a source transformation tool over every package in a directory")
        .arg(
            Arg::new("source")
                .short('s')
                .long("source")
                .value_name("DIR")
                .help("Directory whose entries are converted (default: ./packages)"),
        )
        .arg(
            Arg::new("dest")
                .short('d')
                .long("dest")
                .value_name("DIR")
                .help("Directory receiving one output directory per package (default: ./packages-without-types)"),
        )
        .arg(
            Arg::new("tool")
                .short('t')
                .long("tool")
                .value_name("PROG")
                .help("Transformation tool to run (default: flow-remove-types)"),
        )
        .arg(
            Arg::new("tool-arg")
                .long("tool-arg")
                .value_name("ARG")
                .action(ArgAction::Append)
                .help("Flag passed to the tool before the output-directory flag (repeatable, replaces --pretty)"),
        )
        .arg(
            Arg::new("out-dir-flag")
                .long("out-dir-flag")
                .value_name("FLAG")
                .help("Flag that takes the destination path (default: --out-dir)"),
        )
        .arg(flag("sort", "Process packages in sorted order instead of directory listing order"))
        .arg(flag("strict-names", "Skip package names that are not a single safe path segment"))
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .value_name("SECS")
                .help("Kill a conversion that runs longer than this many seconds"),
        )
        .arg(flag("capture-output", "Send the tool's output to the log instead of the terminal"))
        .arg(flag("fail-on-error", "Exit with a failure status if any conversion fails"))
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Load settings from a TOML file"),
        )
        .arg(flag("dry-run", "Print the commands that would run without running them").short('n'))
        .arg(flag("quiet", "Do not print package names (with -v, log them with their position instead)").short('q'))
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Increase log verbosity (-v info, -vv debug)"),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("remove-types.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
