//! Options for file finding
//!
//! This module provides options for configuring the file finding process.

use crate::cli::Cli;

/// Options for configuring the file finding process
#[derive(Debug, Clone)]
pub struct FindOptions {
    /// Maximum depth to search, 1 being the direct children of the root
    pub max_depth: Option<usize>,

    /// Whether to descend into symlinked directories
    pub follow_links: bool,

    /// Whether names are compared case-insensitively
    pub ignore_case: bool,

    /// Whether top-level subdirectories are searched in parallel
    pub parallel: bool,

    /// Lower bound on worker threads for parallel searches
    pub min_threads: usize,

    /// Upper bound on worker threads for parallel searches
    pub max_threads: usize,

    /// Top-level subdirectories handled per worker when auto-sizing
    pub dirs_per_thread: usize,

    /// Whether the worker count follows the workload
    pub auto_adjust: bool,
}

impl FindOptions {
    /// Create a new FindOptions with default values
    pub fn new() -> Self {
        Self {
            max_depth: None,
            follow_links: false,
            ignore_case: false,
            parallel: false,
            min_threads: 2,
            max_threads: num_cpus::get(),
            dirs_per_thread: 4,
            auto_adjust: true,
        }
    }

    /// Set the maximum depth to search
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set whether to follow symbolic links
    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    /// Set whether to compare names case-insensitively
    pub fn with_ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    /// Set whether to search subdirectories in parallel
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the bounds of the worker pool
    pub fn with_thread_bounds(mut self, min_threads: usize, max_threads: usize) -> Self {
        self.min_threads = min_threads.max(1);
        self.max_threads = max_threads.max(self.min_threads);
        self
    }

    /// Set how many top-level subdirectories each worker handles
    pub fn with_dirs_per_thread(mut self, dirs_per_thread: usize) -> Self {
        self.dirs_per_thread = dirs_per_thread.max(1);
        self
    }

    /// Set whether the worker count follows the workload
    pub fn with_auto_adjust(mut self, auto_adjust: bool) -> Self {
        self.auto_adjust = auto_adjust;
        self
    }

    /// Use exactly `threads` workers for parallel searches
    pub fn with_threads(self, threads: usize) -> Self {
        self.with_thread_bounds(threads, threads).with_auto_adjust(false)
    }

    /// Create FindOptions from CLI arguments
    pub fn from_cli(cli: &Cli) -> Self {
        let options = Self::new()
            .with_max_depth(cli.max_depth)
            .with_follow_links(cli.follow_links)
            .with_ignore_case(cli.ignore_case)
            .with_parallel(cli.parallel || cli.threads.is_some());

        match cli.threads {
            Some(threads) => options.with_threads(threads),
            None => options,
        }
    }
}

impl Default for FindOptions {
    fn default() -> Self {
        Self::new()
    }
}
