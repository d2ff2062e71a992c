//! File name matching
//!
//! This module provides the filters the finder uses to decide which
//! entries are reported.

use std::ffi::OsStr;

use walkdir::DirEntry;

use crate::errors::{FindError, FindResult};

/// Trait for file filters
pub trait FileFilter {
    /// Check if the entry matches the filter
    fn matches(&self, entry: &DirEntry) -> bool;

    /// Get the filter description
    fn description(&self) -> String;
}

/// Matches file entries whose final path segment equals a target name
#[derive(Debug, Clone)]
pub struct NameFilter {
    name: String,
    folded: String,
    ignore_case: bool,
}

impl NameFilter {
    /// Create a new case-sensitive NameFilter
    ///
    /// Fails with [`FindError::InvalidName`] if `name` is empty, is `.` or
    /// `..`, or contains a path separator, since such a name can never be
    /// the last segment of a path.
    pub fn new(name: &str) -> FindResult<Self> {
        validate_name(name)?;
        Ok(Self {
            name: name.to_string(),
            folded: name.to_lowercase(),
            ignore_case: false,
        })
    }

    /// Create a new case-insensitive NameFilter
    pub fn new_ignore_case(name: &str) -> FindResult<Self> {
        let mut filter = Self::new(name)?;
        filter.ignore_case = true;
        Ok(filter)
    }

    /// The name being searched for
    pub fn name(&self) -> &str {
        &self.name
    }

    fn name_matches(&self, candidate: &OsStr) -> bool {
        if !self.ignore_case {
            return candidate == OsStr::new(&self.name);
        }
        match candidate.to_str() {
            Some(candidate) => candidate.to_lowercase() == self.folded,
            None => false,
        }
    }
}

impl FileFilter for NameFilter {
    fn matches(&self, entry: &DirEntry) -> bool {
        // The walk root is the search directory itself, never a result.
        if entry.depth() == 0 {
            return false;
        }
        self.name_matches(entry.file_name()) && is_file_entry(entry)
    }

    fn description(&self) -> String {
        if self.ignore_case {
            format!("name (ignore case) equals '{}'", self.name)
        } else {
            format!("name equals '{}'", self.name)
        }
    }
}

/// Regular files, and symlinks whose target is not a directory.
///
/// When links are followed walkdir already reports the target's type.
fn is_file_entry(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    if file_type.is_file() {
        return true;
    }
    if file_type.is_symlink() {
        return std::fs::metadata(entry.path())
            .map(|meta| !meta.is_dir())
            .unwrap_or(false);
    }
    false
}

fn validate_name(name: &str) -> FindResult<()> {
    let has_separator = name.chars().any(std::path::is_separator);
    if name.is_empty() || name == "." || name == ".." || has_separator {
        return Err(FindError::InvalidName(name.to_string()));
    }
    Ok(())
}
