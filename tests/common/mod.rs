// tests/common/mod.rs

//! Shared helpers for batch integration tests.

#![allow(dead_code)]

use remove_types::BatchConfig;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

/// POSIX shell stand-in for the transformation tool.
///
/// Invoked as `sh <script> --pretty --out-dir <dest> <src>`. It appends the
/// source path to `calls.log`, copies regular files from the source into the
/// destination with a header line, and misbehaves on purpose for packages
/// named `fail-*` (exit 3) and `slow-*` (sleep).
const STUB_TOOL: &str = r#"#!/bin/sh
[ "$1" = "--pretty" ] || exit 64
[ "$2" = "--out-dir" ] || exit 64
dest="$3"
src="$4"
echo "$src" >> "__LOG__"
case "$(basename "$src")" in
  fail-*) echo "stub: cannot convert $src" >&2; exit 3 ;;
  slow-*) sleep 5 ;;
esac
mkdir -p "$dest"
for f in "$src"/*; do
  if [ -f "$f" ]; then
    { echo "// stripped"; cat "$f"; } > "$dest/$(basename "$f")"
  fi
done
exit 0
"#;

/// Scratch workspace with a source tree, destination root, and stub tool.
pub struct Workspace {
    pub temp: TempDir,
    pub source: PathBuf,
    pub dest: PathBuf,
    pub script: PathBuf,
    pub log: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let temp = tempfile::tempdir().unwrap();
        let source = temp.path().join("packages");
        let dest = temp.path().join("packages-without-types");
        let script = temp.path().join("stub-tool.sh");
        let log = temp.path().join("calls.log");

        fs::create_dir(&source).unwrap();
        fs::write(&script, STUB_TOOL.replace("__LOG__", &log.to_string_lossy())).unwrap();

        Self {
            temp,
            source,
            dest,
            script,
            log,
        }
    }

    /// Add a package directory containing one JS file.
    pub fn add_package(&self, name: &str) {
        let dir = self.source.join(name);
        fs::create_dir(&dir).unwrap();
        fs::write(
            dir.join("index.js"),
            format!("// @flow\nexport const name: string = '{}';\n", name),
        )
        .unwrap();
    }

    /// Config pointing the batch at this workspace and the stub tool.
    ///
    /// The script is run through `/bin/sh` rather than executed directly.
    pub fn config(&self) -> BatchConfig {
        BatchConfig {
            source_root: self.source.clone(),
            destination_root: self.dest.clone(),
            tool: "/bin/sh".to_string(),
            tool_args: vec![
                self.script.to_string_lossy().into_owned(),
                "--pretty".to_string(),
            ],
            ..BatchConfig::default()
        }
    }

    /// Source paths the stub was invoked with, in call order.
    pub fn calls(&self) -> Vec<String> {
        match fs::read_to_string(&self.log) {
            Ok(content) => content.lines().map(str::to_string).collect(),
            Err(_) => Vec::new(),
        }
    }
}

/// Relative path -> contents for every file under `root`.
pub fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    WalkDir::new(root)
        .into_iter()
        .map(|entry| entry.unwrap())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            let rel = entry.path().strip_prefix(root).unwrap().to_path_buf();
            (rel, fs::read(entry.path()).unwrap())
        })
        .collect()
}

/// Names of the entries directly under `root`, sorted.
pub fn entry_names(root: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(root)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
