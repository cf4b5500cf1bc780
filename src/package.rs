// src/package.rs

//! Package identity and derived paths
//!
//! A package is nothing more than an entry name under the source root. Its
//! source and destination paths are derived by appending the name to the
//! two roots; nothing else is stored.

use crate::error::{Error, Result};
use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

/// One unit of conversion, identified by its directory entry name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Package {
    name: OsString,
}

impl Package {
    /// Wrap a name without checking it
    pub fn new(name: impl Into<OsString>) -> Self {
        Self { name: name.into() }
    }

    /// Wrap a name after checking it is a single safe path segment
    pub fn validated(name: impl Into<OsString>) -> Result<Self> {
        let name = name.into();
        Self::validate_name(&name)?;
        Ok(Self { name })
    }

    /// Check that a name is usable as exactly one path segment
    ///
    /// Rejects:
    /// - names that are not valid UTF-8
    /// - empty names
    /// - `.`, `..`, and anything starting with `..`
    /// - names containing `/` or `\`
    /// - names containing NUL
    pub fn validate_name(name: &OsStr) -> Result<()> {
        let lossy = name.to_string_lossy();
        let Some(text) = name.to_str() else {
            return Err(Error::invalid_name(lossy, "not valid UTF-8"));
        };

        if text.is_empty() {
            return Err(Error::invalid_name(text, "empty name"));
        }
        if text == "." {
            return Err(Error::invalid_name(text, "refers to the current directory"));
        }
        if text.starts_with("..") {
            return Err(Error::invalid_name(text, "leading '..'"));
        }
        if text.contains(['/', '\\']) {
            return Err(Error::invalid_name(text, "contains a path separator"));
        }
        if text.contains('\0') {
            return Err(Error::invalid_name(text, "contains a NUL byte"));
        }

        Ok(())
    }

    pub fn name(&self) -> &OsStr {
        &self.name
    }

    /// Name for printing; lossy for non-UTF-8 names
    pub fn display_name(&self) -> Cow<'_, str> {
        self.name.to_string_lossy()
    }

    /// `<source_root>/<name>`
    pub fn source_path(&self, source_root: &Path) -> PathBuf {
        concat_segment(source_root, &self.name)
    }

    /// `<destination_root>/<name>`
    pub fn destination_path(&self, destination_root: &Path) -> PathBuf {
        concat_segment(destination_root, &self.name)
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

// Plain concatenation rather than Path::join: an absolute name must not
// replace the root.
fn concat_segment(root: &Path, name: &OsStr) -> PathBuf {
    let mut joined = root.as_os_str().to_os_string();
    joined.push("/");
    joined.push(name);
    PathBuf::from(joined)
}
