use std::path::{Path, PathBuf};

use log::debug;

use crate::errors::FindResult;
use crate::finder::{FindOptions, Finder};

/// Find every file named `name` below `root`
///
/// Uses default options: exact, case-sensitive matching, symbolic links
/// not followed, sequential traversal in sorted order. Unreadable
/// subdirectories are skipped.
pub fn find<P: AsRef<Path>>(name: &str, root: P) -> FindResult<Vec<PathBuf>> {
    debug!("Searching for {} in {}", name, root.as_ref().display());
    Finder::new(FindOptions::default()).find(name, root)
}
