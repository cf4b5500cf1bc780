// src/enumerate.rs

//! Package discovery
//!
//! Lists the immediate entries of the source root. Files and directories
//! are treated alike, nothing is filtered, and there is no recursion.

use crate::config::PackageOrder;
use crate::error::{Error, Result};
use crate::package::Package;
use std::path::Path;
use tracing::debug;

/// List every entry directly under `source_root` as a package
///
/// Fails with [`Error::Filesystem`] when the root is missing, unreadable,
/// or not a directory. An empty root yields an empty list.
pub fn list_packages(source_root: &Path, order: PackageOrder) -> Result<Vec<Package>> {
    let fs_error = |source| Error::Filesystem {
        path: source_root.to_path_buf(),
        source,
    };

    let mut packages = Vec::new();
    for entry in std::fs::read_dir(source_root).map_err(fs_error)? {
        let entry = entry.map_err(fs_error)?;
        packages.push(Package::new(entry.file_name()));
    }

    if order == PackageOrder::Sorted {
        packages.sort();
    }

    debug!(
        "Found {} packages under {} ({} order)",
        packages.len(),
        source_root.display(),
        order
    );
    Ok(packages)
}
